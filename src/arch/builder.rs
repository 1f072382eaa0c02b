use rand::Rng;

use super::{
    Model, NeuralNetwork, OrdinaryLeastSquares, RidgeRegression,
    activations::ActFn,
    layers::{DeltaFn, Layer},
};
use crate::{
    MlErr, Result,
    configs::{
        ActFnConfig, ArchitectureConfig, DeltaConfig, LayerConfig, LearningRateConfig,
        ModelConfig,
    },
    optimization::{LearningRate, LearningRateSchedule},
};

/// Builds models given a configuration.
#[derive(Default)]
pub struct ModelBuilder;

impl ModelBuilder {
    /// Creates a new `ModelBuilder`.
    pub fn new() -> Self {
        Self
    }

    /// Builds a new model following a configuration.
    ///
    /// # Arguments
    /// * `config` - The configuration of the model.
    /// * `rng` - The random number generator used to draw the initial parameters.
    ///
    /// # Returns
    /// The model, ready to be trained, or an error if the configuration is invalid.
    pub fn build<R: Rng + ?Sized>(
        &self,
        config: &ModelConfig,
        rng: &mut R,
    ) -> Result<Box<dyn Model>> {
        let learning_rate = self.resolve_learning_rate(config.learning_rate)?;
        let features = config.x_shape.1;
        let runs = config.parallel_runs.get();
        let momentum = config.momentum;

        let model: Box<dyn Model> = match &config.architecture {
            ArchitectureConfig::Ols => Box::new(OrdinaryLeastSquares::new(
                features,
                runs,
                momentum,
                learning_rate,
                rng,
            )?),
            ArchitectureConfig::Ridge { lambda } => Box::new(RidgeRegression::new(
                features,
                runs,
                momentum,
                learning_rate,
                *lambda,
                rng,
            )?),
            ArchitectureConfig::NeuralNetwork { layers } => {
                let mut network = NeuralNetwork::new(runs, momentum, learning_rate)?;
                network.add_layer(Layer::input(features));

                for (i, layer) in layers.iter().enumerate() {
                    let last = i + 1 == layers.len();
                    network.add_layer(self.resolve_layer(i, layer, last)?);
                }

                network.compile(rng)?;
                Box::new(network)
            }
        };

        Ok(model)
    }

    fn resolve_learning_rate(&self, config: LearningRateConfig) -> Result<LearningRate> {
        match config {
            LearningRateConfig::Constant(rate) => Ok(LearningRate::from(rate)),
            LearningRateConfig::Schedule {
                base,
                decay,
                ramp_up,
                total_steps,
            } => {
                let schedule = LearningRateSchedule::new(base, decay)?
                    .ramp_up(ramp_up)
                    .compile(total_steps)?;

                Ok(LearningRate::from(schedule))
            }
        }
    }

    fn resolve_layer(&self, i: usize, config: &LayerConfig, last: bool) -> Result<Layer> {
        let act_fn = self.resolve_act_fn(config.activation);

        if !last {
            if config.delta.is_some() {
                return Err(MlErr::config(format!(
                    "layer {i} is hidden, only the output layer takes a delta"
                )));
            }

            return Ok(Layer::dense(config.height, act_fn));
        }

        let delta = match config.delta.unwrap_or_default() {
            DeltaConfig::SquaredError => DeltaFn::SquaredError,
            DeltaConfig::CrossEntropy => DeltaFn::CrossEntropy,
        };

        Ok(Layer::output_with_delta(config.height, act_fn, delta))
    }

    fn resolve_act_fn(&self, config: ActFnConfig) -> ActFn {
        match config {
            ActFnConfig::Sigmoid => ActFn::sigmoid(),
            ActFnConfig::Relu => ActFn::relu(),
            ActFnConfig::LeakyRelu { slope } => ActFn::leaky_relu(slope),
            ActFnConfig::Identity => ActFn::identity(),
            ActFnConfig::Softmax => ActFn::softmax(),
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn parse(json: &str) -> ModelConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn builds_linear_models() {
        let mut rng = StdRng::seed_from_u64(0);
        let config = parse(
            r#"{
                "architecture": { "ridge": { "_lambda": 0.1 } },
                "x_shape": [10, 3],
                "init_conds": 4,
                "momentum": 0.5,
                "learning_rate": 0.01
            }"#,
        );

        let model = ModelBuilder::new().build(&config, &mut rng).unwrap();
        assert_eq!(model.parallel_runs(), 4);
        assert_eq!(model.parameter_snapshot()[0].shape(), &[3, 4]);

        let y_tilde = model.predict(array![[1., 2., 3.]].view()).unwrap();
        assert_eq!(y_tilde.dim(), (4, 1, 1));
    }

    #[test]
    fn builds_networks_with_an_input_layer_sized_after_the_data() {
        let mut rng = StdRng::seed_from_u64(0);
        let config = parse(
            r#"{
                "architecture": { "neural_network": { "layers": [
                    { "height": 5, "activation": { "leaky_relu": {} } },
                    { "height": 3, "activation": "softmax", "d_func": "cross_entropy" }
                ] } },
                "x_shape": [8, 2],
                "parallel_runs": 2,
                "learning_rate": { "base": 0.1, "decay": 0.01, "ramp_up": 5, "total_steps": 100 }
            }"#,
        );

        let model = ModelBuilder::new().build(&config, &mut rng).unwrap();
        let y_tilde = model.predict(array![[1., 2.], [0., 0.]].view()).unwrap();

        assert_eq!(y_tilde.dim(), (2, 2, 3));
        for row in y_tilde.rows() {
            assert!((row.sum() - 1.).abs() < 1e-12);
        }
    }

    #[test]
    fn hidden_layers_can_not_take_a_delta() {
        let mut rng = StdRng::seed_from_u64(0);
        let config = parse(
            r#"{
                "architecture": { "neural_network": { "layers": [
                    { "height": 5, "d_func": "squared_error" },
                    { "height": 1, "activation": "identity" }
                ] } },
                "x_shape": [8, 2],
                "parallel_runs": 1,
                "learning_rate": 0.1
            }"#,
        );

        assert!(matches!(
            ModelBuilder::new().build(&config, &mut rng),
            Err(MlErr::InvalidConfig(_))
        ));
    }

    #[test]
    fn invalid_values_are_reported() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut config = parse(
            r#"{
                "architecture": "ols",
                "x_shape": [10, 1],
                "parallel_runs": 1,
                "momentum": 1.5,
                "learning_rate": 0.1
            }"#,
        );

        assert!(ModelBuilder::new().build(&config, &mut rng).is_err());

        config.momentum = 0.;
        config.learning_rate = LearningRateConfig::Schedule {
            base: 0.1,
            decay: 0.,
            ramp_up: 20,
            total_steps: 10,
        };
        assert!(ModelBuilder::new().build(&config, &mut rng).is_err());
    }

    #[test]
    fn empty_networks_are_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let config = parse(
            r#"{
                "architecture": { "neural_network": { "layers": [] } },
                "x_shape": [4, 2],
                "parallel_runs": 1,
                "learning_rate": 0.1
            }"#,
        );

        assert!(ModelBuilder::new().build(&config, &mut rng).is_err());
    }
}
