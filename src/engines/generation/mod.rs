pub mod individual;
pub mod operators;
pub mod hall_of_fame;
pub mod evolution_engine;
pub mod progress;

pub use individual::{Individual, Population};
pub use operators::{
    best_of, tournament_selection, CompositeMutation, CrossoverDispatcher, CrossoverOp, MutationOp,
};
pub use hall_of_fame::{EliteMelody, HallOfFame};
pub use evolution_engine::{
    EvolutionEngine, EvolutionOutcome, GenerationStats, ProgressCallback,
};
pub use progress::ConsoleProgressCallback;
