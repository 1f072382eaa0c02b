use ndarray::{Array1, Array3, ArrayD, ArrayView2, ArrayView3};
use rand::Rng;

use super::{shared::LinearCore, solve};
use crate::{Result, arch::Model, optimization::LearningRate};

/// Ordinary least squares trained by gradient descent on the mean squared error.
#[derive(Debug, Clone)]
pub struct OrdinaryLeastSquares {
    core: LinearCore,
}

impl OrdinaryLeastSquares {
    /// Creates a new `OrdinaryLeastSquares` with standard normal coefficients.
    ///
    /// # Arguments
    /// * `features` - The amount of columns of the design matrix.
    /// * `parallel_runs` - The amount of independent initializations to train together.
    /// * `momentum` - The momentum of the gradient descent, in `[0, 1)`.
    /// * `learning_rate` - A constant rate or a compiled schedule.
    /// * `rng` - The random number generator used to draw the coefficients.
    ///
    /// # Returns
    /// A new model or an error if any argument is out of range.
    pub fn new<L, R>(
        features: usize,
        parallel_runs: usize,
        momentum: f64,
        learning_rate: L,
        rng: &mut R,
    ) -> Result<Self>
    where
        L: Into<LearningRate>,
        R: Rng + ?Sized,
    {
        let core = LinearCore::new(features, parallel_runs, momentum, learning_rate.into(), rng)?;
        Ok(Self { core })
    }

    /// The coefficients, one column per parallel run.
    pub fn beta(&self) -> ArrayView2<'_, f64> {
        self.core.beta()
    }

    /// Computes the closed-form least squares coefficients `(XᵗX)⁻¹Xᵗy`.
    ///
    /// Used to check what gradient descent should converge to, the model isn't modified.
    pub fn fit(x: ArrayView2<f64>, y: ArrayView2<f64>) -> Result<Array1<f64>> {
        solve::normal_equations(x, y, 0.)
    }
}

impl Model for OrdinaryLeastSquares {
    fn parallel_runs(&self) -> usize {
        self.core.parallel_runs()
    }

    fn learning_rate(&self) -> LearningRate {
        self.core.learning_rate()
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Array3<f64>> {
        self.core.predict(x)
    }

    fn update_parameters(
        &mut self,
        x: ArrayView2<f64>,
        y: ArrayView2<f64>,
        y_tilde: ArrayView3<f64>,
        step: usize,
    ) -> Result<()> {
        let grad = self.core.mse_gradient(x, y, y_tilde)?;
        self.core.descend(grad, step);
        Ok(())
    }

    fn reset_velocity(&mut self) {
        self.core.reset_velocity();
    }

    fn parameter_snapshot(&self) -> Vec<ArrayD<f64>> {
        self.core.snapshot()
    }
}
