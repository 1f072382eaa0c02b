use ndarray::{ArrayView2, Zip};

use super::LossFn;

/// Categorical cross entropy between predicted class probabilities and one-hot targets,
/// averaged over the samples.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrossEntropy;

impl CrossEntropy {
    /// Smallest probability fed to the logarithm.
    const EPSILON: f64 = 1e-12;

    /// Returns a new `CrossEntropy`.
    pub fn new() -> Self {
        Self
    }
}

impl LossFn for CrossEntropy {
    fn loss(&self, y_pred: ArrayView2<f64>, y: ArrayView2<f64>) -> f64 {
        let samples = y.nrows().max(1) as f64;

        let total = Zip::from(&y_pred).and(&y).fold(0., |acc, &p, &t| {
            acc - t * p.clamp(Self::EPSILON, 1.).ln()
        });

        total / samples
    }
}
