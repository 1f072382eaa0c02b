use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::arch::loss::Metric;

/// The configuration of an `SgdTrainer`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub epochs: NonZeroUsize,
    pub mini_batch_size: NonZeroUsize,
    #[serde(default)]
    pub metric: Metric,
    /// Stop once every parallel run went this many epochs without improving.
    #[serde(default)]
    pub epochs_without_progress: Option<NonZeroUsize>,
    /// Fail on the first non-finite metric instead of warning about it.
    #[serde(default)]
    pub strict: bool,
    /// `None` seeds from the operating system.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl TrainingConfig {
    pub fn new(epochs: NonZeroUsize, mini_batch_size: NonZeroUsize) -> Self {
        Self {
            epochs,
            mini_batch_size,
            metric: Metric::default(),
            epochs_without_progress: None,
            strict: false,
            seed: None,
        }
    }
}
