mod delta;
mod dense;
mod input;
mod layer;
mod output;

pub use delta::{CustomDelta, DeltaFn};
pub use dense::Dense;
pub use input::Input;
pub use layer::Layer;
pub use output::Output;
