pub mod arch;
pub mod configs;
pub mod error;
pub mod optimization;
pub mod training;

pub use error::{MlErr, Result};
