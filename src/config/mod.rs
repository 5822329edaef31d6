pub mod traits;
pub mod evolution;
pub mod music;
pub mod manager;

pub use manager::{AppConfig, ConfigManager};
pub use evolution::EvolutionConfig;
pub use music::{FitnessWeights, MusicConfig};
