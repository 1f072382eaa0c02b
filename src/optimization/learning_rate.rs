use super::CompiledSchedule;
use crate::{MlErr, Result};

/// The learning rate used by a model on each update, either fixed or following a schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LearningRate {
    Constant(f64),
    Scheduled(CompiledSchedule),
}
use LearningRate::*;

impl LearningRate {
    /// Returns the learning rate for the given optimization step.
    pub fn rate(&self, step: usize) -> f64 {
        match self {
            Constant(rate) => *rate,
            Scheduled(schedule) => schedule.rate(step),
        }
    }

    /// Returns the amount of steps a schedule was compiled for, constant rates have no bound.
    pub fn total_steps(&self) -> Option<usize> {
        match self {
            Constant(_) => None,
            Scheduled(schedule) => Some(schedule.total_steps()),
        }
    }

    /// Checks that a constant rate is strictly positive, schedules are validated on creation.
    pub(crate) fn validate(&self) -> Result<()> {
        match *self {
            Constant(rate) if !rate.is_finite() || rate <= 0. => Err(MlErr::config(format!(
                "the learning rate must be positive, got {rate}"
            ))),
            _ => Ok(()),
        }
    }
}

/// Checks that `momentum` lies in `[0, 1)`.
pub(crate) fn validate_momentum(momentum: f64) -> Result<()> {
    if !(0.0..1.0).contains(&momentum) {
        return Err(MlErr::config(format!(
            "the momentum must lie in [0, 1), got {momentum}"
        )));
    }

    Ok(())
}

impl From<f64> for LearningRate {
    fn from(value: f64) -> Self {
        Constant(value)
    }
}

impl From<CompiledSchedule> for LearningRate {
    fn from(value: CompiledSchedule) -> Self {
        Scheduled(value)
    }
}
