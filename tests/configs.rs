use std::num::NonZeroUsize;

use ndarray::{Array2, array};
use rand::{SeedableRng, rngs::StdRng};

use parallel_sgd::{
    MlErr,
    arch::{Model, ModelBuilder, loss::Metric},
    configs::{
        ActFnConfig, ArchitectureConfig, DeltaConfig, LayerConfig, LearningRateConfig,
        ModelConfig, TrainingConfig,
    },
    training::SgdTrainer,
};

#[test]
fn training_config_defaults() {
    let config: TrainingConfig =
        serde_json::from_str(r#"{ "epochs": 5, "mini_batch_size": 2 }"#).unwrap();

    assert_eq!(config.epochs.get(), 5);
    assert_eq!(config.metric, Metric::Mse);
    assert_eq!(config.epochs_without_progress, None);
    assert!(!config.strict);
    assert_eq!(config.seed, None);
}

#[test]
fn zero_counts_are_rejected_while_parsing() {
    let result = serde_json::from_str::<TrainingConfig>(r#"{ "epochs": 0, "mini_batch_size": 2 }"#);
    assert!(result.is_err());

    let err: MlErr = result.unwrap_err().into();
    assert!(matches!(err, MlErr::InvalidConfig(_)));
}

#[test]
fn model_configs_survive_a_round_trip() {
    let config = ModelConfig {
        architecture: ArchitectureConfig::NeuralNetwork {
            layers: vec![
                LayerConfig {
                    height: 3,
                    activation: ActFnConfig::LeakyRelu { slope: 0.2 },
                    delta: None,
                },
                LayerConfig {
                    height: 2,
                    activation: ActFnConfig::Softmax,
                    delta: Some(DeltaConfig::CrossEntropy),
                },
            ],
        },
        x_shape: (4, 2),
        parallel_runs: NonZeroUsize::new(2).unwrap(),
        momentum: 0.3,
        learning_rate: LearningRateConfig::Schedule {
            base: 0.5,
            decay: 0.1,
            ramp_up: 2,
            total_steps: 40,
        },
    };

    let json = serde_json::to_string(&config).unwrap();
    let parsed: ModelConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);

    let model = ModelBuilder::new()
        .build(&parsed, &mut StdRng::seed_from_u64(0))
        .unwrap();
    assert_eq!(model.parallel_runs(), 2);
    assert_eq!(model.parameter_snapshot().len(), 4);
}

#[test]
fn configured_models_train_with_configured_trainers() {
    let model_config: ModelConfig = serde_json::from_str(
        r#"{
            "architecture": "ols",
            "x_shape": [4, 2],
            "init_conds": 3,
            "learning_rate": 0.05
        }"#,
    )
    .unwrap();
    let training_config: TrainingConfig = serde_json::from_str(
        r#"{ "epochs": 10, "mini_batch_size": 2, "metric": "mse", "seed": 3, "strict": true }"#,
    )
    .unwrap();

    let x = array![[1., 0.], [1., 1.], [1., 2.], [1., 3.]];
    let y: Array2<f64> = array![[1.], [3.], [5.], [7.]];

    let mut model = ModelBuilder::new()
        .build(&model_config, &mut StdRng::seed_from_u64(1))
        .unwrap();
    let mut trainer = SgdTrainer::from_config(training_config);
    let log = trainer
        .train(&mut model, x.view(), y.view(), &training_config.metric)
        .unwrap();

    assert_eq!(log.errors().dim(), (3, 10));
    assert_eq!(trainer.config().seed, Some(3));
}

#[test]
fn configured_schedules_must_cover_the_whole_run() {
    let model_config: ModelConfig = serde_json::from_str(
        r#"{
            "architecture": { "ridge": { "lambda": 0.1 } },
            "x_shape": [4, 2],
            "parallel_runs": 2,
            "learning_rate": { "base": 0.05, "ramp_up": 2, "total_steps": 19 }
        }"#,
    )
    .unwrap();
    let training_config: TrainingConfig =
        serde_json::from_str(r#"{ "epochs": 10, "mini_batch_size": 2 }"#).unwrap();

    let x = array![[1., 0.], [1., 1.], [1., 2.], [1., 3.]];
    let y: Array2<f64> = array![[1.], [3.], [5.], [7.]];

    let mut model = ModelBuilder::new()
        .build(&model_config, &mut StdRng::seed_from_u64(1))
        .unwrap();
    assert_eq!(model.learning_rate().total_steps(), Some(19));

    let before = model.parameter_snapshot();
    let mut trainer = SgdTrainer::from_config(training_config);
    assert!(matches!(
        trainer.train(&mut model, x.view(), y.view(), &training_config.metric),
        Err(MlErr::InvalidConfig(_))
    ));
    assert_eq!(model.parameter_snapshot(), before);
}
