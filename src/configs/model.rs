use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// The configuration of an activation function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActFnConfig {
    #[default]
    Sigmoid,
    Relu,
    LeakyRelu {
        #[serde(default = "default_slope")]
        slope: f64,
    },
    Identity,
    Softmax,
}

fn default_slope() -> f64 {
    crate::arch::activations::LeakyRelu::DEFAULT_SLOPE
}

/// The configuration of an output layer's delta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaConfig {
    #[default]
    SquaredError,
    CrossEntropy,
}

/// A hidden or output layer, the input layer is sized after the data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    pub height: usize,
    #[serde(default)]
    pub activation: ActFnConfig,
    /// Only valid on the last layer.
    #[serde(default, alias = "d_func")]
    pub delta: Option<DeltaConfig>,
}

/// Either a constant learning rate or a decaying schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LearningRateConfig {
    Constant(f64),
    Schedule {
        base: f64,
        #[serde(default)]
        decay: f64,
        #[serde(default)]
        ramp_up: usize,
        total_steps: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchitectureConfig {
    Ols,
    Ridge {
        #[serde(alias = "_lambda")]
        lambda: f64,
    },
    NeuralNetwork {
        layers: Vec<LayerConfig>,
    },
}

/// The configuration of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub architecture: ArchitectureConfig,
    /// `(samples, features)` of the design matrix the model will be trained on.
    pub x_shape: (usize, usize),
    #[serde(alias = "init_conds")]
    pub parallel_runs: NonZeroUsize,
    #[serde(default)]
    pub momentum: f64,
    pub learning_rate: LearningRateConfig,
}
