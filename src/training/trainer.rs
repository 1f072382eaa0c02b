use log::{debug, info, warn};
use ndarray::{Array1, Array2, ArrayView2, ArrayView3, Axis, s};
use rand::{Rng, rngs::StdRng};

use super::{ErrorLog, MiniBatches, early_stopping::EarlyStopping};
use crate::{
    MlErr, Result,
    arch::{Model, loss::LossFn},
    configs::{self, TrainingConfig},
};

/// Trains models with mini-batch stochastic gradient descent, every parallel run of a model
/// seeing the same mini-batches.
#[derive(Debug, Clone)]
pub struct SgdTrainer<R: Rng = StdRng> {
    config: TrainingConfig,
    rng: R,
}

impl SgdTrainer<StdRng> {
    /// Creates a new `SgdTrainer` seeded from the configuration.
    pub fn from_config(config: TrainingConfig) -> Self {
        let rng = configs::generate_rng(config.seed);
        Self::new(config, rng)
    }
}

impl<R: Rng> SgdTrainer<R> {
    /// Creates a new `SgdTrainer`.
    ///
    /// # Arguments
    /// * `config` - The training configuration.
    /// * `rng` - The random number generator used to shuffle the samples every epoch.
    pub fn new(config: TrainingConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Trains `model` on `x` and `y`.
    ///
    /// Every epoch first records `metric` for every run over the whole dataset, then takes one
    /// step per mini-batch. The step counter keeps growing across epochs.
    ///
    /// # Arguments
    /// * `model` - The model to train, it's left with the parameters of the last epoch run.
    /// * `x` - The design matrix, shaped `(samples, features)`.
    /// * `y` - The targets, shaped `(samples, outputs)`.
    /// * `metric` - How to measure each run's prediction against the targets.
    ///
    /// # Returns
    /// The metric of every run on every epoch run, or an error. Invalid arguments are reported
    /// before the model is touched.
    pub fn train<M, L>(
        &mut self,
        model: &mut M,
        x: ArrayView2<f64>,
        y: ArrayView2<f64>,
        metric: &L,
    ) -> Result<ErrorLog>
    where
        M: Model + ?Sized,
        L: LossFn,
    {
        let samples = x.nrows();

        if y.nrows() != samples {
            return Err(MlErr::SizeMismatch {
                a: "targets",
                b: "samples",
                got: y.nrows(),
                expected: samples,
            });
        }

        let runs = model.parallel_runs();
        if runs == 0 {
            return Err(MlErr::config("the model has no parallel runs"));
        }

        let mut batches = MiniBatches::new(samples, self.config.mini_batch_size)?;
        let epochs = self.config.epochs.get();
        let total_steps = epochs * batches.per_epoch();

        if let Some(bound) = model.learning_rate().total_steps() {
            if total_steps > bound {
                return Err(MlErr::config(format!(
                    "{epochs} epochs of {} mini-batches take {total_steps} steps, \
                     but the learning rate schedule only covers {bound}",
                    batches.per_epoch()
                )));
            }
        }

        let mut early_stopping = self
            .config
            .epochs_without_progress
            .map(|patience| EarlyStopping::new(patience.get(), runs));

        info!(
            samples = samples,
            features = x.ncols(),
            parallel_runs = runs,
            epochs = epochs,
            mini_batch_size = self.config.mini_batch_size.get(),
            steps = total_steps;
            "starting training"
        );

        let mut errors = Array2::from_elem((runs, epochs), f64::NAN);
        let mut epochs_run = 0;
        let mut step = 0;
        let mut warned = false;

        for epoch in 0..epochs {
            let y_tilde = model.predict(x)?;
            check_outputs(y_tilde.view(), y)?;
            let epoch_errors = evaluate(metric, y_tilde.view(), y);

            errors.column_mut(epoch).assign(&epoch_errors);
            epochs_run = epoch + 1;

            if epoch_errors.iter().any(|e| !e.is_finite()) {
                if self.config.strict {
                    return Err(MlErr::NonFinite {
                        what: "metric",
                        epoch,
                    });
                }

                if !warned {
                    warn!(epoch = epoch; "the metric of some run is no longer finite");
                    warned = true;
                }
            }

            debug!(
                epoch = epoch,
                step = step,
                mean = epoch_errors.sum() / runs as f64,
                min = epoch_errors.fold(f64::INFINITY, |m, &e| m.min(e));
                "epoch metric"
            );

            if let Some(early_stopping) = &mut early_stopping {
                if early_stopping.check(epoch, epoch_errors.view()) {
                    info!(
                        epoch = epoch,
                        patience = early_stopping.patience();
                        "every run stopped improving, stopping early"
                    );
                    break;
                }
            }

            model.reset_velocity();
            batches.shuffle(&mut self.rng);

            for batch in batches.iter() {
                let x_batch = x.select(Axis(0), batch);
                let y_batch = y.select(Axis(0), batch);

                let y_tilde = model.predict(x_batch.view())?;
                model.update_parameters(x_batch.view(), y_batch.view(), y_tilde.view(), step)?;
                step += 1;
            }
        }

        let errors = errors.slice_move(s![.., ..epochs_run]);
        let stalled_at = early_stopping
            .map(EarlyStopping::into_stalled_at)
            .unwrap_or_else(|| vec![None; runs]);

        info!(epochs = epochs_run, steps = step; "finished training");
        Ok(ErrorLog::new(errors, stalled_at))
    }
}

/// Checks that the model predicts as many outputs as there are target columns.
fn check_outputs(y_tilde: ArrayView3<f64>, y: ArrayView2<f64>) -> Result<()> {
    let outputs = y_tilde.len_of(Axis(2));

    if y.ncols() != outputs {
        return Err(MlErr::SizeMismatch {
            a: "targets",
            b: "model outputs",
            got: y.ncols(),
            expected: outputs,
        });
    }

    Ok(())
}

/// Computes the metric of every run.
fn evaluate<L: LossFn>(metric: &L, y_tilde: ArrayView3<f64>, y: ArrayView2<f64>) -> Array1<f64> {
    y_tilde
        .outer_iter()
        .map(|prediction| metric.loss(prediction, y))
        .collect()
}
