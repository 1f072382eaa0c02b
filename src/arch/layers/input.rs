use ndarray::{Array3, ArrayView2, ArrayView3};

use crate::{MlErr, Result};

/// The first layer of a network, it only holds the batch it was fed with, broadcast over the
/// parallel runs.
#[derive(Debug, Clone)]
pub struct Input {
    height: usize,
    a: Array3<f64>,
}

impl Input {
    pub fn new(height: usize) -> Self {
        Self {
            height,
            a: Array3::zeros((0, 0, height)),
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub(crate) fn activations(&self) -> ArrayView3<'_, f64> {
        self.a.view()
    }

    /// Copies `x` once per parallel run.
    pub(crate) fn forward(&mut self, x: ArrayView2<f64>, parallel_runs: usize) -> Result<()> {
        let (samples, features) = x.dim();

        let a = x
            .broadcast((parallel_runs, samples, features))
            .ok_or(MlErr::SizeMismatch {
                a: "input columns",
                b: "input layer height",
                got: features,
                expected: self.height,
            })?;

        self.a = a.to_owned();
        Ok(())
    }
}
