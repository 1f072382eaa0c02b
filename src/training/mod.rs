mod batches;
mod early_stopping;
mod error_log;
mod trainer;

pub use batches::MiniBatches;
pub use error_log::ErrorLog;
pub use trainer::SgdTrainer;
