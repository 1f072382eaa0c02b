use ndarray::{Array3, ArrayView3};

use crate::arch::activations::ActFn;

/// A user supplied output delta, called with the output activations, the targets and the
/// pre-activations, all shaped `(runs, batch, outputs)`.
pub type CustomDelta = fn(ArrayView3<f64>, ArrayView3<f64>, ArrayView3<f64>) -> Array3<f64>;

/// How the output layer turns its prediction and the targets into the first delta of the
/// backward pass.
///
/// Deltas point along `target - prediction`, so parameters are updated by adding them.
#[derive(Debug, Clone, Copy, Default)]
pub enum DeltaFn {
    /// `2·(y − a) ⊙ f'(z)`, the delta of the squared error.
    #[default]
    SquaredError,
    /// `y − a`, the delta of the cross entropy through a softmax or sigmoid output.
    CrossEntropy,
    Custom(CustomDelta),
}

impl DeltaFn {
    pub(crate) fn delta(
        &self,
        a: ArrayView3<f64>,
        y: ArrayView3<f64>,
        z: ArrayView3<f64>,
        act_fn: &ActFn,
    ) -> Array3<f64> {
        match self {
            Self::SquaredError => (&y - &a) * 2. * act_fn.df(z),
            Self::CrossEntropy => &y - &a,
            Self::Custom(f) => f(a, y, z),
        }
    }
}
