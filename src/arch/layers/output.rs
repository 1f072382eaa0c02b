use ndarray::ArrayView2;

use super::{Dense, DeltaFn};
use crate::{MlErr, Result, arch::activations::ActFn};

/// The last layer of a network, a `Dense` layer whose delta comes from the targets.
#[derive(Debug, Clone)]
pub struct Output {
    dense: Dense,
    delta: DeltaFn,
}

impl Output {
    pub fn new(height: usize, act_fn: ActFn, delta: DeltaFn) -> Self {
        Self {
            dense: Dense::new(height, act_fn),
            delta,
        }
    }

    pub fn dense(&self) -> &Dense {
        &self.dense
    }

    pub(crate) fn dense_mut(&mut self) -> &mut Dense {
        &mut self.dense
    }

    /// Computes the output delta from the cached prediction and the batch targets.
    ///
    /// # Arguments
    /// * `y` - The targets, shaped `(batch, outputs)`, shared by every parallel run.
    pub(crate) fn backward(&mut self, y: ArrayView2<f64>) -> Result<()> {
        let a = self.dense.activations();
        let (_, batch, height) = a.dim();

        if y.ncols() != height {
            return Err(MlErr::SizeMismatch {
                a: "targets",
                b: "output layer height",
                got: y.ncols(),
                expected: height,
            });
        }

        if y.nrows() != batch {
            return Err(MlErr::SizeMismatch {
                a: "targets",
                b: "batch samples",
                got: y.nrows(),
                expected: batch,
            });
        }

        let y = y.broadcast(a.raw_dim()).ok_or(MlErr::SizeMismatch {
            a: "targets",
            b: "prediction",
            got: y.len(),
            expected: a.len(),
        })?;

        let act_fn = self.dense.act_fn();
        let d = self
            .delta
            .delta(a, y, self.dense.pre_activations(), &act_fn);

        self.dense.set_delta(d);
        Ok(())
    }
}
