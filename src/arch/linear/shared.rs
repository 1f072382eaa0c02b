use ndarray::{Array2, Array3, ArrayD, ArrayView2, ArrayView3, Axis, Ix2};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::{
    MlErr, Result,
    optimization::{self, LearningRate, Velocity},
};

/// The state shared by every linear model: one coefficient column per parallel run, its
/// velocity and the learning rate.
#[derive(Debug, Clone)]
pub(super) struct LinearCore {
    beta: Array2<f64>,
    velocity: Velocity<Ix2>,
    learning_rate: LearningRate,
}

impl LinearCore {
    /// Validates the arguments and draws the coefficients from a standard normal.
    pub(super) fn new<R: Rng + ?Sized>(
        features: usize,
        parallel_runs: usize,
        momentum: f64,
        learning_rate: LearningRate,
        rng: &mut R,
    ) -> Result<Self> {
        if features == 0 {
            return Err(MlErr::config("a linear model needs at least one feature"));
        }

        if parallel_runs == 0 {
            return Err(MlErr::config("the amount of parallel runs must be at least 1"));
        }

        optimization::validate_momentum(momentum)?;
        learning_rate.validate()?;

        let shape = (features, parallel_runs);

        Ok(Self {
            beta: Array2::random_using(shape, StandardNormal, rng),
            velocity: Velocity::zeros(momentum, shape),
            learning_rate,
        })
    }

    pub(super) fn beta(&self) -> ArrayView2<'_, f64> {
        self.beta.view()
    }

    pub(super) fn parallel_runs(&self) -> usize {
        self.beta.ncols()
    }

    pub(super) fn learning_rate(&self) -> LearningRate {
        self.learning_rate
    }

    pub(super) fn predict(&self, x: ArrayView2<f64>) -> Result<Array3<f64>> {
        self.check_features(x)?;

        // (samples, runs) -> (runs, samples, 1)
        Ok(x.dot(&self.beta).reversed_axes().insert_axis(Axis(2)))
    }

    /// Computes the mean squared error gradient `Xᵗ·(2/n)·(ŷ − y)` of every run, shaped like
    /// the coefficients.
    pub(super) fn mse_gradient(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView2<f64>,
        y_tilde: ArrayView3<f64>,
    ) -> Result<Array2<f64>> {
        self.check_features(x)?;

        let n = x.nrows();
        if n == 0 {
            return Err(MlErr::config("can't compute a gradient over an empty batch"));
        }

        if y.ncols() != 1 {
            return Err(MlErr::SizeMismatch {
                a: "targets",
                b: "linear model outputs",
                got: y.ncols(),
                expected: 1,
            });
        }

        if y.nrows() != n {
            return Err(MlErr::SizeMismatch {
                a: "targets",
                b: "batch samples",
                got: y.nrows(),
                expected: n,
            });
        }

        let expected = (self.parallel_runs(), n, 1);
        if y_tilde.dim() != expected {
            let (runs, samples, _) = y_tilde.dim();
            let (got, expected) = if runs != expected.0 {
                (runs, expected.0)
            } else if samples != n {
                (samples, n)
            } else {
                (y_tilde.len_of(Axis(2)), 1)
            };

            return Err(MlErr::SizeMismatch {
                a: "prediction",
                b: "linear model",
                got,
                expected,
            });
        }

        // (samples, runs)
        let residual = &y_tilde.index_axis(Axis(2), 0).t() - &y;
        Ok(x.t().dot(&residual) * (2. / n as f64))
    }

    /// Takes a momentum step against `grad`.
    pub(super) fn descend(&mut self, grad: Array2<f64>, step: usize) {
        let rate = self.learning_rate.rate(step);
        self.velocity.descend(&mut self.beta, grad.view(), rate);
    }

    pub(super) fn reset_velocity(&mut self) {
        self.velocity.reset();
    }

    pub(super) fn snapshot(&self) -> Vec<ArrayD<f64>> {
        vec![self.beta.clone().into_dyn()]
    }

    fn check_features(&self, x: ArrayView2<f64>) -> Result<()> {
        let features = self.beta.nrows();

        if x.ncols() != features {
            return Err(MlErr::SizeMismatch {
                a: "input columns",
                b: "model features",
                got: x.ncols(),
                expected: features,
            });
        }

        Ok(())
    }
}
