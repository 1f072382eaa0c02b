use ndarray::{Array1, Array3, ArrayD, ArrayView2, ArrayView3};
use rand::Rng;

use super::{shared::LinearCore, solve};
use crate::{MlErr, Result, arch::Model, optimization::LearningRate};

/// Least squares with an L2 penalty `λ·‖β‖²` on the coefficients.
#[derive(Debug, Clone)]
pub struct RidgeRegression {
    core: LinearCore,
    lambda: f64,
}

impl RidgeRegression {
    /// Creates a new `RidgeRegression` with standard normal coefficients.
    ///
    /// # Arguments
    /// * `features` - The amount of columns of the design matrix.
    /// * `parallel_runs` - The amount of independent initializations to train together.
    /// * `momentum` - The momentum of the gradient descent, in `[0, 1)`.
    /// * `learning_rate` - A constant rate or a compiled schedule.
    /// * `lambda` - The non negative penalty, `0` behaves exactly like least squares.
    /// * `rng` - The random number generator used to draw the coefficients.
    ///
    /// # Returns
    /// A new model or an error if any argument is out of range.
    pub fn new<L, R>(
        features: usize,
        parallel_runs: usize,
        momentum: f64,
        learning_rate: L,
        lambda: f64,
        rng: &mut R,
    ) -> Result<Self>
    where
        L: Into<LearningRate>,
        R: Rng + ?Sized,
    {
        validate_lambda(lambda)?;
        let core = LinearCore::new(features, parallel_runs, momentum, learning_rate.into(), rng)?;
        Ok(Self { core, lambda })
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// The coefficients, one column per parallel run.
    pub fn beta(&self) -> ArrayView2<'_, f64> {
        self.core.beta()
    }

    /// Computes the closed-form ridge coefficients `(XᵗX + λI)⁻¹Xᵗy`.
    pub fn fit(x: ArrayView2<f64>, y: ArrayView2<f64>, lambda: f64) -> Result<Array1<f64>> {
        validate_lambda(lambda)?;
        solve::normal_equations(x, y, lambda)
    }
}

fn validate_lambda(lambda: f64) -> Result<()> {
    if !lambda.is_finite() || lambda < 0. {
        return Err(MlErr::config(format!(
            "the ridge penalty must be non negative, got {lambda}"
        )));
    }

    Ok(())
}

impl Model for RidgeRegression {
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
        let mut grad = self.core.mse_gradient(x, y, y_tilde)?;
        grad.scaled_add(2. * self.lambda, &self.core.beta());
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
