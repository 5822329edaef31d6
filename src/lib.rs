pub mod config;
pub mod engines;
pub mod error;
pub mod export;
pub mod types;

pub use config::{AppConfig, ConfigManager, EvolutionConfig, FitnessWeights, MusicConfig};
pub use engines::evaluation::FitnessEvaluator;
pub use engines::generation::{
    best_of, EvolutionEngine, EvolutionOutcome, Individual, Population, ProgressCallback,
};
pub use error::{EvotuneError, Result};
pub use types::Note;
