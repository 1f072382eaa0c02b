mod cross_entropy;
mod loss_fn;
mod metric;
mod mse;

pub use cross_entropy::CrossEntropy;
pub use loss_fn::LossFn;
pub use metric::Metric;
pub use mse::Mse;
