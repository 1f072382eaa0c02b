use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use super::{CrossEntropy, LossFn, Mse};

/// The built-in metrics, selectable from a configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Mse,
    CrossEntropy,
}

impl LossFn for Metric {
    fn loss(&self, y_pred: ArrayView2<f64>, y: ArrayView2<f64>) -> f64 {
        match self {
            Metric::Mse => Mse.loss(y_pred, y),
            Metric::CrossEntropy => CrossEntropy.loss(y_pred, y),
        }
    }
}
