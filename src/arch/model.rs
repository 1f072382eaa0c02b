use ndarray::{Array3, ArrayD, ArrayView2, ArrayView3};

use crate::{Result, optimization::LearningRate};

/// A trainable model carrying `parallel_runs` independent parameter sets, all advanced in
/// lock-step by the same batches.
///
/// Predictions are shaped `(parallel_runs, samples, outputs)`.
pub trait Model {
    /// Returns the amount of independent initializations trained together.
    fn parallel_runs(&self) -> usize;

    /// Returns the learning rate every update is taken with.
    fn learning_rate(&self) -> LearningRate;

    /// Computes the prediction of every parallel run for `x`.
    ///
    /// # Arguments
    /// * `x` - The input data, shaped `(samples, features)`.
    ///
    /// # Returns
    /// The predictions or an error if `x` doesn't fit the model.
    fn predict(&self, x: ArrayView2<f64>) -> Result<Array3<f64>>;

    /// Computes the gradient of the model's loss over a batch and takes a momentum step.
    /// **The parameters and velocities get updated.**
    ///
    /// # Arguments
    /// * `x` - The batch input, shaped `(batch, features)`.
    /// * `y` - The batch targets, shaped `(batch, outputs)`.
    /// * `y_tilde` - The model's prediction for `x`, as returned by `predict`.
    /// * `step` - The global optimization step, used to evaluate the learning rate.
    fn update_parameters(
        &mut self,
        x: ArrayView2<f64>,
        y: ArrayView2<f64>,
        y_tilde: ArrayView3<f64>,
        step: usize,
    ) -> Result<()>;

    /// Zeroes every momentum velocity. Called at the start of every epoch.
    fn reset_velocity(&mut self);

    /// Returns a copy of every parameter tensor, parallel run axis included.
    fn parameter_snapshot(&self) -> Vec<ArrayD<f64>>;
}

impl<M: Model + ?Sized> Model for Box<M> {
    fn parallel_runs(&self) -> usize {
        (**self).parallel_runs()
    }

    fn learning_rate(&self) -> LearningRate {
        (**self).learning_rate()
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Array3<f64>> {
        (**self).predict(x)
    }

    fn update_parameters(
        &mut self,
        x: ArrayView2<f64>,
        y: ArrayView2<f64>,
        y_tilde: ArrayView3<f64>,
        step: usize,
    ) -> Result<()> {
        (**self).update_parameters(x, y, y_tilde, step)
    }

    fn reset_velocity(&mut self) {
        (**self).reset_velocity()
    }

    fn parameter_snapshot(&self) -> Vec<ArrayD<f64>> {
        (**self).parameter_snapshot()
    }
}
