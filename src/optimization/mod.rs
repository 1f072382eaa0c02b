mod learning_rate;
mod momentum;
mod schedule;

pub(crate) use learning_rate::validate_momentum;
pub use learning_rate::LearningRate;
pub use momentum::Velocity;
pub use schedule::{CompiledSchedule, LearningRateSchedule};
