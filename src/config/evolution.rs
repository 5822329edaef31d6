use super::traits::ConfigSection;
use crate::error::EvotuneError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub num_generations: usize,
    pub individual_length: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub tournament_size: usize,
    pub hall_of_fame_size: usize,
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            num_generations: 50,
            individual_length: 64,
            crossover_rate: 0.7,
            mutation_rate: 0.3,
            tournament_size: 4,
            hall_of_fame_size: 5,
            seed: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), EvotuneError> {
        if self.population_size < 2 {
            return Err(EvotuneError::Configuration(
                "Population size must be at least 2".to_string(),
            ));
        }
        if self.individual_length == 0 {
            return Err(EvotuneError::Configuration(
                "Individual length must be at least 1".to_string(),
            ));
        }
        if self.crossover_rate < 0.0 || self.crossover_rate > 1.0 {
            return Err(EvotuneError::Configuration(
                "Crossover rate must be between 0 and 1".to_string(),
            ));
        }
        if self.mutation_rate < 0.0 || self.mutation_rate > 1.0 {
            return Err(EvotuneError::Configuration(
                "Mutation rate must be between 0 and 1".to_string(),
            ));
        }
        if self.tournament_size == 0 {
            return Err(EvotuneError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }
        if self.tournament_size > self.population_size {
            return Err(EvotuneError::Configuration(
                "Tournament size cannot exceed population size".to_string(),
            ));
        }
        if self.hall_of_fame_size == 0 {
            return Err(EvotuneError::Configuration(
                "Hall of fame size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
