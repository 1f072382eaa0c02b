use crate::{MlErr, Result};

/// A learning rate schedule with an optional linear warm-up followed by reciprocal decay.
///
/// The schedule itself can't be evaluated, it has to be compiled against the total amount of
/// optimization steps first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearningRateSchedule {
    base: f64,
    decay: f64,
    warm_up: usize,
}

impl LearningRateSchedule {
    /// Creates a new `LearningRateSchedule`.
    ///
    /// # Arguments
    /// * `base` - The peak learning rate, reached right after the warm-up.
    /// * `decay` - How fast the rate decays after the warm-up.
    ///
    /// # Returns
    /// An error if `base` is not strictly positive or `decay` is negative.
    pub fn new(base: f64, decay: f64) -> Result<Self> {
        if !base.is_finite() || base <= 0. {
            return Err(MlErr::config(format!(
                "the base learning rate must be positive, got {base}"
            )));
        }

        if !decay.is_finite() || decay < 0. {
            return Err(MlErr::config(format!(
                "the learning rate decay must be non negative, got {decay}"
            )));
        }

        Ok(Self {
            base,
            decay,
            warm_up: 0,
        })
    }

    /// Sets a linear warm-up of `steps` steps, going from 0 up to `base`.
    pub fn ramp_up(mut self, steps: usize) -> Self {
        self.warm_up = steps;
        self
    }

    /// Compiles the schedule into an evaluable rate function.
    ///
    /// # Arguments
    /// * `total_steps` - The amount of optimization steps the schedule will be used for.
    ///
    /// # Returns
    /// An error if the warm-up is longer than `total_steps`.
    pub fn compile(self, total_steps: usize) -> Result<CompiledSchedule> {
        if total_steps < self.warm_up {
            return Err(MlErr::config(format!(
                "the warm-up ({}) can't be longer than the total steps ({total_steps})",
                self.warm_up
            )));
        }

        Ok(CompiledSchedule {
            base: self.base,
            decay: self.decay,
            warm_up: self.warm_up,
            total_steps,
        })
    }
}

/// A compiled learning rate schedule, maps an optimization step to a learning rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompiledSchedule {
    base: f64,
    decay: f64,
    warm_up: usize,
    total_steps: usize,
}

impl CompiledSchedule {
    /// Evaluates the schedule at `step`.
    pub fn rate(&self, step: usize) -> f64 {
        let Self {
            base,
            decay,
            warm_up,
            ..
        } = *self;

        if step < warm_up {
            return base * step as f64 / warm_up as f64;
        }

        base / (1. + decay * (step - warm_up) as f64)
    }

    /// Returns the total amount of steps this schedule was compiled for.
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Returns the warm-up length.
    pub fn warm_up(&self) -> usize {
        self.warm_up
    }
}
