use log::info;
use ndarray::{Array1, Array2, Axis};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::StandardNormal;

use parallel_sgd::{
    Result,
    arch::{Model, ModelBuilder, OrdinaryLeastSquares},
    configs::{self, ModelConfig, TrainingConfig},
    training::SgdTrainer,
};

const MODEL: &str = r#"{
    "architecture": "ols",
    "x_shape": [200, 3],
    "parallel_runs": 8,
    "momentum": 0.5,
    "learning_rate": { "base": 0.01, "decay": 0.001, "ramp_up": 20, "total_steps": 4000 }
}"#;

const TRAINING: &str = r#"{
    "epochs": 200,
    "mini_batch_size": 10,
    "metric": "mse",
    "epochs_without_progress": 10,
    "seed": 7
}"#;

fn main() -> Result<()> {
    env_logger::init();

    let model_config: ModelConfig = serde_json::from_str(MODEL)?;
    let training_config: TrainingConfig = serde_json::from_str(TRAINING)?;
    let mut rng = configs::generate_rng(training_config.seed);

    let (x, y) = synthetic_data(model_config.x_shape, &mut rng);

    let mut model = ModelBuilder::new().build(&model_config, &mut rng)?;
    let mut trainer = SgdTrainer::new(training_config, rng);
    let log = trainer.train(&mut model, x.view(), y.view(), &training_config.metric)?;

    let final_mean = log.mean().iter().last().copied().unwrap_or(f64::NAN);
    info!(
        epochs = log.epochs(),
        best_run = log.best_run().unwrap_or_default(),
        final_mean = final_mean;
        "training summary"
    );

    let closed_form = OrdinaryLeastSquares::fit(x.view(), y.view())?;
    for (run, estimate) in model.parameter_snapshot()[0].axis_iter(Axis(1)).enumerate() {
        let distance = (&estimate - &closed_form).mapv(|d| d * d).sum().sqrt();
        info!(run = run, distance = distance; "distance to the closed-form estimate");
    }

    Ok(())
}

/// Draws a standard normal design matrix shaped `x_shape` and noisy linear targets, with one
/// coefficient per feature.
fn synthetic_data<R: Rng + ?Sized>(
    (samples, features): (usize, usize),
    rng: &mut R,
) -> (Array2<f64>, Array2<f64>) {
    let x: Array2<f64> = Array2::random_using((samples, features), StandardNormal, rng);
    let beta = Array1::linspace(1.5, -2., features);
    let noise = Array1::<f64>::random_using(samples, StandardNormal, rng) * 0.1;
    let y = (x.dot(&beta) + noise).insert_axis(Axis(1));

    (x, y)
}
