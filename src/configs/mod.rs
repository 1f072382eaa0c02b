mod model;
mod training;

use rand::{SeedableRng, rngs::StdRng};

pub use model::{
    ActFnConfig, ArchitectureConfig, DeltaConfig, LayerConfig, LearningRateConfig, ModelConfig,
};
pub use training::TrainingConfig;

/// Creates the random number generator of a run, seeded from the OS when `seed` is `None`.
pub fn generate_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
