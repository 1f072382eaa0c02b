use ndarray::{Array2, Array3, ArrayD, ArrayView2, ArrayView3, Axis, Ix2, Ix3, linalg};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::{MlErr, Result, arch::activations::ActFn, optimization::Velocity};

/// The trainable state of a layer, drawn on compile.
#[derive(Debug, Clone)]
struct Params {
    /// `(runs, previous height, height)`
    weights: Array3<f64>,
    /// `(runs, height)`
    bias: Array2<f64>,
    v_weights: Velocity<Ix3>,
    v_bias: Velocity<Ix2>,
}

/// A fully connected layer, `a = f(a_prev · W + b)` for every parallel run.
#[derive(Debug, Clone)]
pub struct Dense {
    height: usize,
    act_fn: ActFn,
    params: Option<Params>,

    // Forward metadata, (runs, batch, height)
    z: Array3<f64>,
    a: Array3<f64>,

    // Backward metadata
    d: Array3<f64>,
}

impl Dense {
    /// Creates a new uncompiled `Dense` layer.
    ///
    /// # Arguments
    /// * `height` - The amount of neurons.
    /// * `act_fn` - The activation applied to the pre-activations.
    pub fn new(height: usize, act_fn: ActFn) -> Self {
        let empty = Array3::zeros((0, 0, height));

        Self {
            height,
            act_fn,
            params: None,
            z: empty.clone(),
            a: empty.clone(),
            d: empty,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn act_fn(&self) -> ActFn {
        self.act_fn
    }

    /// The weights, `None` until the network is compiled.
    pub fn weights(&self) -> Option<ArrayView3<'_, f64>> {
        self.params.as_ref().map(|p| p.weights.view())
    }

    /// The biases, `None` until the network is compiled.
    pub fn bias(&self) -> Option<ArrayView2<'_, f64>> {
        self.params.as_ref().map(|p| p.bias.view())
    }

    /// Draws standard normal weights and biases and zeroes the velocities, discarding any
    /// previous parameters.
    pub(crate) fn init<R: Rng + ?Sized>(
        &mut self,
        parallel_runs: usize,
        prev_height: usize,
        momentum: f64,
        rng: &mut R,
    ) {
        let w_shape = (parallel_runs, prev_height, self.height);
        let b_shape = (parallel_runs, self.height);

        self.params = Some(Params {
            weights: Array3::random_using(w_shape, StandardNormal, rng),
            bias: Array2::random_using(b_shape, StandardNormal, rng),
            v_weights: Velocity::zeros(momentum, w_shape),
            v_bias: Velocity::zeros(momentum, b_shape),
        });
    }

    pub(crate) fn activations(&self) -> ArrayView3<'_, f64> {
        self.a.view()
    }

    pub(crate) fn pre_activations(&self) -> ArrayView3<'_, f64> {
        self.z.view()
    }

    /// Computes the output of this layer without caching anything.
    pub(crate) fn predict(&self, a_prev: ArrayView3<f64>) -> Result<Array3<f64>> {
        let z = self.affine(self.params("predict")?, a_prev)?;
        Ok(self.act_fn.f(z.view()))
    }

    /// Computes and caches `z` and `a` for the backward pass.
    pub(crate) fn forward(&mut self, a_prev: ArrayView3<f64>) -> Result<()> {
        self.z = self.affine(self.params("feed forward")?, a_prev)?;
        self.a = self.act_fn.f(self.z.view());
        Ok(())
    }

    /// Computes the delta of an interior layer from the next layer's delta and its
    /// not yet updated weights:
    ///
    /// `d = (d_next · W_nextᵗ) ⊙ f'(z)`
    pub(crate) fn backward(&mut self, next: &Dense) -> Result<()> {
        let w_next = &next.params("back propagate")?.weights;
        let mut d = Array3::zeros(self.z.raw_dim());

        for ((mut d_run, d_next), w_run) in d
            .outer_iter_mut()
            .zip(next.d.outer_iter())
            .zip(w_next.outer_iter())
        {
            linalg::general_mat_mul(1., &d_next, &w_run.t(), 0., &mut d_run);
        }

        d *= &self.act_fn.df(self.z.view());
        self.d = d;
        Ok(())
    }

    pub(crate) fn set_delta(&mut self, d: Array3<f64>) {
        self.d = d;
    }

    /// Takes a momentum step along the cached delta:
    ///
    /// `∇W = a_prevᵗ · d` summed over the batch, `∇b = mean(d)` over the batch.
    pub(crate) fn update(&mut self, a_prev: ArrayView3<f64>, rate: f64) -> Result<()> {
        let params = self
            .params
            .as_mut()
            .ok_or(MlErr::NotCompiled { op: "update" })?;

        let mut grad_w = Array3::zeros(params.weights.raw_dim());
        for ((mut g, a), d) in grad_w
            .outer_iter_mut()
            .zip(a_prev.outer_iter())
            .zip(self.d.outer_iter())
        {
            linalg::general_mat_mul(1., &a.t(), &d, 0., &mut g);
        }

        let grad_b = self
            .d
            .mean_axis(Axis(1))
            .ok_or_else(|| MlErr::config("can't update a layer over an empty batch"))?;

        params
            .v_weights
            .ascend(&mut params.weights, grad_w.view(), rate);
        params.v_bias.ascend(&mut params.bias, grad_b.view(), rate);
        Ok(())
    }

    pub(crate) fn reset_velocity(&mut self) {
        if let Some(params) = &mut self.params {
            params.v_weights.reset();
            params.v_bias.reset();
        }
    }

    pub(crate) fn snapshot(&self) -> Vec<ArrayD<f64>> {
        self.params
            .iter()
            .flat_map(|p| [p.weights.clone().into_dyn(), p.bias.clone().into_dyn()])
            .collect()
    }

    fn params(&self, op: &'static str) -> Result<&Params> {
        self.params.as_ref().ok_or(MlErr::NotCompiled { op })
    }

    /// `z = a_prev · W + b` for every parallel run.
    fn affine(&self, params: &Params, a_prev: ArrayView3<f64>) -> Result<Array3<f64>> {
        let (runs, batch, prev_height) = a_prev.dim();
        let (w_runs, w_prev, _) = params.weights.dim();

        if (runs, prev_height) != (w_runs, w_prev) {
            let (got, expected) = if runs != w_runs {
                (runs, w_runs)
            } else {
                (prev_height, w_prev)
            };

            return Err(MlErr::SizeMismatch {
                a: "layer input",
                b: "layer weights",
                got,
                expected,
            });
        }

        let mut z = Array3::zeros((runs, batch, self.height));

        for (((mut z_run, a), w), b) in z
            .outer_iter_mut()
            .zip(a_prev.outer_iter())
            .zip(params.weights.outer_iter())
            .zip(params.bias.outer_iter())
        {
            linalg::general_mat_mul(1., &a, &w, 0., &mut z_run);
            z_run += &b;
        }

        Ok(z)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{Array3, array};
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn compiled(height: usize, act_fn: ActFn, runs: usize, prev: usize) -> Dense {
        let mut dense = Dense::new(height, act_fn);
        dense.init(runs, prev, 0., &mut StdRng::seed_from_u64(1));
        dense
    }

    #[test]
    fn uncompiled_layers_refuse_to_predict() {
        let dense = Dense::new(2, ActFn::identity());
        let a = Array3::<f64>::zeros((1, 1, 3));

        assert!(matches!(
            dense.predict(a.view()),
            Err(MlErr::NotCompiled { op: "predict" })
        ));
        assert!(dense.weights().is_none());
    }

    #[test]
    fn parameters_have_a_run_axis() {
        let dense = compiled(4, ActFn::relu(), 3, 2);

        assert_eq!(dense.weights().unwrap().dim(), (3, 2, 4));
        assert_eq!(dense.bias().unwrap().dim(), (3, 4));
        assert_eq!(dense.snapshot().len(), 2);
    }

    #[test]
    fn each_run_uses_its_own_parameters() {
        let dense = compiled(1, ActFn::identity(), 2, 2);
        let a_prev = array![[[1., 2.]], [[1., 2.]]];

        let a = dense.predict(a_prev.view()).unwrap();
        let (w, b) = (dense.weights().unwrap(), dense.bias().unwrap());

        for run in 0..2 {
            let expected = w[[run, 0, 0]] + 2. * w[[run, 1, 0]] + b[[run, 0]];
            assert!((a[[run, 0, 0]] - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn gradients_sum_weights_and_average_biases() {
        let mut dense = compiled(1, ActFn::identity(), 1, 1);
        let w = dense.weights().unwrap()[[0, 0, 0]];
        let b = dense.bias().unwrap()[[0, 0]];

        let a_prev = array![[[1.], [3.]]];
        dense.forward(a_prev.view()).unwrap();
        dense.set_delta(array![[[0.5], [1.]]]);
        dense.update(a_prev.view(), 0.1).unwrap();

        assert!((dense.weights().unwrap()[[0, 0, 0]] - (w + 0.1 * 3.5)).abs() < 1e-12);
        assert!((dense.bias().unwrap()[[0, 0]] - (b + 0.1 * 0.75)).abs() < 1e-12);
    }

    #[test]
    fn mismatched_inputs_are_rejected() {
        let dense = compiled(2, ActFn::sigmoid(), 2, 3);
        let a_prev = Array3::<f64>::zeros((2, 5, 4));

        assert!(matches!(
            dense.predict(a_prev.view()),
            Err(MlErr::SizeMismatch { got: 4, expected: 3, .. })
        ));
    }
}
