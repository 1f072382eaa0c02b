use std::fmt::{self, Display};

use log::debug;
use ndarray::{Array2, Array3, ArrayD, ArrayView2, ArrayView3, Axis};
use rand::Rng;

use super::{Model, layers::Layer};
use crate::{
    MlErr, Result,
    optimization::{self, LearningRate},
};

/// A feed forward neural network trained with backpropagation, carrying `parallel_runs`
/// independent sets of weights.
///
/// Layers are added with `add_layer` and the network has to be compiled before it can be used.
#[derive(Debug, Clone)]
pub struct NeuralNetwork {
    parallel_runs: usize,
    momentum: f64,
    learning_rate: LearningRate,
    layers: Vec<Layer>,
    compiled: bool,
}

impl NeuralNetwork {
    /// Creates a new empty `NeuralNetwork`.
    ///
    /// # Arguments
    /// * `parallel_runs` - The amount of independent initializations to train together.
    /// * `momentum` - The momentum of the gradient descent, in `[0, 1)`.
    /// * `learning_rate` - A constant rate or a compiled schedule.
    ///
    /// # Returns
    /// A new network or an error if any argument is out of range.
    pub fn new<L: Into<LearningRate>>(
        parallel_runs: usize,
        momentum: f64,
        learning_rate: L,
    ) -> Result<Self> {
        if parallel_runs == 0 {
            return Err(MlErr::config("the amount of parallel runs must be at least 1"));
        }

        optimization::validate_momentum(momentum)?;
        let learning_rate = learning_rate.into();
        learning_rate.validate()?;

        Ok(Self {
            parallel_runs,
            momentum,
            learning_rate,
            layers: Vec::new(),
            compiled: false,
        })
    }

    /// Appends a layer. The network has to be compiled again afterwards.
    pub fn add_layer(&mut self, layer: Layer) -> &mut Self {
        self.layers.push(layer);
        self.compiled = false;
        self
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// Checks the layer chain and draws fresh parameters for every layer.
    ///
    /// Compiling an already compiled network resets it. If the chain is invalid the network
    /// is left untouched.
    ///
    /// # Errors
    /// `MlErr::InvalidConfig` unless the network is an `Input` layer, any amount of `Dense`
    /// layers and an `Output` layer, all of them with a positive height.
    pub fn compile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        self.validate_layers()?;

        for i in 1..self.layers.len() {
            let (head, tail) = self.layers.split_at_mut(i);
            let prev_height = head[i - 1].height();

            if let Some(dense) = tail[0].as_dense_mut() {
                dense.init(self.parallel_runs, prev_height, self.momentum, rng);
            }
        }

        self.compiled = true;
        debug!(layers = self.layers.len(), parallel_runs = self.parallel_runs; "compiled network");
        Ok(())
    }

    fn validate_layers(&self) -> Result<()> {
        let n = self.layers.len();

        if n < 2 {
            return Err(MlErr::config(format!(
                "a network needs an input and an output layer, got {n} layers"
            )));
        }

        for (i, layer) in self.layers.iter().enumerate() {
            if layer.height() == 0 {
                return Err(MlErr::config(format!("layer {i} has no neurons")));
            }

            let valid = match layer {
                Layer::Input(_) => i == 0,
                Layer::Dense(_) => i != 0 && i != n - 1,
                Layer::Output(_) => i == n - 1,
            };

            if !valid {
                return Err(MlErr::config(format!(
                    "layer {i} ({layer}) is out of place, expected an input layer first and an output layer last"
                )));
            }
        }

        Ok(())
    }

    fn check_compiled(&self, op: &'static str) -> Result<()> {
        if !self.compiled {
            return Err(MlErr::NotCompiled { op });
        }

        Ok(())
    }

    fn input_height(&self) -> usize {
        self.layers.first().map_or(0, Layer::height)
    }

    fn output_height(&self) -> usize {
        self.layers.last().map_or(0, Layer::height)
    }

    fn check_input(&self, x: ArrayView2<f64>) -> Result<()> {
        let height = self.input_height();

        if x.ncols() != height {
            return Err(MlErr::SizeMismatch {
                a: "input columns",
                b: "input layer height",
                got: x.ncols(),
                expected: height,
            });
        }

        Ok(())
    }

    /// Feeds `x` through the network caching every layer's activations.
    ///
    /// # Arguments
    /// * `x` - The input batch, shaped `(batch, features)`.
    ///
    /// # Returns
    /// The output activations, shaped `(runs, batch, outputs)`.
    pub fn feed_forward(&mut self, x: ArrayView2<f64>) -> Result<ArrayView3<'_, f64>> {
        self.check_compiled("feed forward")?;
        self.check_input(x)?;

        if let Some(Layer::Input(input)) = self.layers.first_mut() {
            input.forward(x, self.parallel_runs)?;
        }

        for i in 1..self.layers.len() {
            let (head, tail) = self.layers.split_at_mut(i);

            if let Some(dense) = tail[0].as_dense_mut() {
                dense.forward(head[i - 1].activations())?;
            }
        }

        let output = self
            .layers
            .last()
            .ok_or(MlErr::NotCompiled { op: "feed forward" })?;

        Ok(output.activations())
    }

    /// Backpropagates the error of the last forward pass and updates every layer.
    ///
    /// Every delta is computed with the weights the forward pass used, then all the layers
    /// take a momentum step.
    ///
    /// # Arguments
    /// * `y` - The targets of the batch last fed forward, shaped `(batch, outputs)`.
    /// * `step` - The global optimization step, used to evaluate the learning rate.
    pub fn back_propagate(&mut self, y: ArrayView2<f64>, step: usize) -> Result<()> {
        self.check_compiled("back propagate")?;
        let n = self.layers.len();

        match self.layers.last_mut() {
            Some(Layer::Output(output)) => output.backward(y)?,
            _ => return Err(MlErr::NotCompiled { op: "back propagate" }),
        }

        for i in (1..n - 1).rev() {
            let (head, tail) = self.layers.split_at_mut(i + 1);

            if let (Some(dense), Some(next)) = (head[i].as_dense_mut(), tail[0].as_dense()) {
                dense.backward(next)?;
            }
        }

        let rate = self.learning_rate.rate(step);

        for i in 1..n {
            let (head, tail) = self.layers.split_at_mut(i);

            if let Some(dense) = tail[0].as_dense_mut() {
                dense.update(head[i - 1].activations(), rate)?;
            }
        }

        Ok(())
    }

    /// Predicts the class of every sample as the output with the highest activation.
    ///
    /// # Returns
    /// The class indices, shaped `(runs, samples)`.
    pub fn class_predict(&self, x: ArrayView2<f64>) -> Result<Array2<usize>> {
        let y_tilde = self.predict(x)?;

        Ok(y_tilde.map_axis(Axis(2), |scores| {
            scores
                .iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |(best, max), (i, &s)| {
                    if s > max { (i, s) } else { (best, max) }
                })
                .0
        }))
    }
}

impl Model for NeuralNetwork {
    fn parallel_runs(&self) -> usize {
        self.parallel_runs
    }

    fn learning_rate(&self) -> LearningRate {
        self.learning_rate
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Array3<f64>> {
        self.check_compiled("predict")?;
        self.check_input(x)?;

        let (samples, features) = x.dim();
        let mut a = x
            .broadcast((self.parallel_runs, samples, features))
            .ok_or(MlErr::SizeMismatch {
                a: "input columns",
                b: "input layer height",
                got: features,
                expected: self.input_height(),
            })?
            .to_owned();

        for dense in self.layers.iter().filter_map(Layer::as_dense) {
            a = dense.predict(a.view())?;
        }

        Ok(a)
    }

    fn update_parameters(
        &mut self,
        x: ArrayView2<f64>,
        y: ArrayView2<f64>,
        y_tilde: ArrayView3<f64>,
        step: usize,
    ) -> Result<()> {
        let expected = (self.parallel_runs, x.nrows(), self.output_height());

        if y_tilde.dim() != expected {
            return Err(MlErr::SizeMismatch {
                a: "prediction",
                b: "network output",
                got: y_tilde.len(),
                expected: expected.0 * expected.1 * expected.2,
            });
        }

        // the prediction carries no cached activations, so the batch is fed forward again
        self.feed_forward(x)?;
        self.back_propagate(y, step)
    }

    fn reset_velocity(&mut self) {
        for layer in &mut self.layers {
            if let Some(dense) = layer.as_dense_mut() {
                dense.reset_velocity();
            }
        }
    }

    fn parameter_snapshot(&self) -> Vec<ArrayD<f64>> {
        self.layers
            .iter()
            .filter_map(Layer::as_dense)
            .flat_map(|dense| dense.snapshot())
            .collect()
    }
}

impl Display for NeuralNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NeuralNetwork(runs: {}", self.parallel_runs)?;

        for (i, layer) in self.layers.iter().enumerate() {
            let sep = if i == 0 { "; " } else { " -> " };
            write!(f, "{sep}{layer}")?;
        }

        write!(f, ")")
    }
}
