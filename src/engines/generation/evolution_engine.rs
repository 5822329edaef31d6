use crate::config::evolution::EvolutionConfig;
use crate::config::manager::AppConfig;
use crate::config::music::MusicConfig;
use crate::engines::evaluation::FitnessEvaluator;
use crate::engines::generation::hall_of_fame::HallOfFame;
use crate::engines::generation::individual::{Individual, Population};
use crate::engines::generation::operators::{
    best_of, tournament_selection, CompositeMutation, CrossoverDispatcher,
};
use crate::error::{EvotuneError, Result};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Per-generation summary, computed over the replaced population.
#[derive(Debug, Clone, Copy)]
pub struct GenerationStats {
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub min_fitness: f64,
    /// How many fitness evaluations this generation actually ran; untouched
    /// individuals keep their cached score and are never re-scored.
    pub evaluations: usize,
}

/// The final state of a completed run.
#[derive(Debug, Clone)]
pub struct EvolutionOutcome {
    pub population: Population,
    pub best: Individual,
}

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, stats: &GenerationStats, hall_of_fame_size: usize);
    fn on_individual_evaluated(&mut self, individual_num: usize, total: usize);
}

pub struct EvolutionEngine {
    evolution: EvolutionConfig,
    music: MusicConfig,
    evaluator: FitnessEvaluator,
    mutation: CompositeMutation,
    crossover: CrossoverDispatcher,
    hall_of_fame: HallOfFame,
    rng: StdRng,
    generation: usize,
}

impl EvolutionEngine {
    pub fn new(config: &AppConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.evolution.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            evolution: config.evolution.clone(),
            music: config.music.clone(),
            evaluator: FitnessEvaluator::new(&config.music),
            mutation: CompositeMutation::default(),
            crossover: CrossoverDispatcher::default(),
            hall_of_fame: HallOfFame::new(config.evolution.hall_of_fame_size),
            rng,
            generation: 0,
        })
    }

    /// Build a fresh population of random individuals, all fitness-invalid.
    pub fn initialize_population(&mut self) -> Population {
        (0..self.evolution.population_size)
            .map(|_| {
                Individual::random(self.evolution.individual_length, &self.music, &mut self.rng)
            })
            .collect()
    }

    /// Run the full evolution process
    pub fn run<C: ProgressCallback>(&mut self, callback: &mut C) -> Result<EvolutionOutcome> {
        let mut population = self.initialize_population();

        for generation in 0..self.evolution.num_generations {
            callback.on_generation_start(generation);
            let stats = self.run_generation_with(&mut population, callback);
            info!(
                "generation {}: best={:.4} mean={:.4} min={:.4} ({} evaluations)",
                generation + 1,
                stats.best_fitness,
                stats.mean_fitness,
                stats.min_fitness,
                stats.evaluations
            );
            callback.on_generation_complete(&stats, self.hall_of_fame.len());
        }

        let best = best_of(&population, 1)
            .first()
            .map(|individual| (*individual).clone())
            .ok_or_else(|| EvotuneError::Generation("empty population after run".to_string()))?;

        Ok(EvolutionOutcome { population, best })
    }

    /// Advance the population by exactly one generation: evaluate pending
    /// caches, select, recombine, mutate, re-evaluate what changed, then
    /// bulk-replace.
    pub fn run_generation(&mut self, population: &mut Population) -> GenerationStats {
        self.run_generation_with(population, &mut NoProgress)
    }

    pub fn run_generation_with<C: ProgressCallback>(
        &mut self,
        population: &mut Population,
        callback: &mut C,
    ) -> GenerationStats {
        // Covers the whole population on the first pass
        let mut evaluations = self.evaluate_invalid(population, callback);

        // Tournament selection, order preserved for the pairing below.
        // Winners are deep copies, so operators never touch the old
        // population through an alias.
        let mut offspring: Population = (0..population.len())
            .map(|_| {
                tournament_selection(population, self.evolution.tournament_size, &mut self.rng)
            })
            .collect();

        // Recombine adjacent pairs (2i, 2i+1)
        for pair in offspring.chunks_mut(2) {
            if pair.len() < 2 {
                continue;
            }
            if self.rng.gen::<f64>() < self.evolution.crossover_rate {
                let (left, right) = pair.split_at_mut(1);
                let op = self.crossover.apply(&mut left[0], &mut right[0], &mut self.rng);
                left[0].invalidate_fitness();
                right[0].invalidate_fitness();
                debug!("applied crossover {:?}", op);
            }
        }

        // Mutate
        for individual in offspring.iter_mut() {
            if self.rng.gen::<f64>() < self.evolution.mutation_rate {
                self.mutation.apply(individual, &self.music, &mut self.rng);
                individual.invalidate_fitness();
            }
        }

        // Re-evaluate only what the operators touched
        evaluations += self.evaluate_invalid(&mut offspring, callback);

        // Bulk generational replacement
        *population = offspring;

        for individual in population.iter() {
            self.hall_of_fame.try_add(individual);
        }

        let stats = self.collect_stats(population, evaluations);
        self.generation += 1;
        stats
    }

    /// Score every individual whose cache is invalid. Evaluation is pure
    /// per individual, so the scoring runs in parallel; results are written
    /// back sequentially.
    fn evaluate_invalid<C: ProgressCallback>(
        &self,
        population: &mut Population,
        callback: &mut C,
    ) -> usize {
        let pending: Vec<usize> = population
            .iter()
            .enumerate()
            .filter(|(_, individual)| !individual.fitness_valid())
            .map(|(i, _)| i)
            .collect();

        let scores: Vec<(usize, f64)> = {
            let snapshot: &Population = population;
            pending
                .par_iter()
                .map(|&i| (i, self.evaluator.evaluate(&snapshot[i])))
                .collect()
        };

        let total = scores.len();
        for (done, (i, fitness)) in scores.into_iter().enumerate() {
            population[i].set_fitness(fitness);
            callback.on_individual_evaluated(done + 1, total);
        }
        total
    }

    fn collect_stats(&self, population: &Population, evaluations: usize) -> GenerationStats {
        let mut best = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        let mut sum = 0.0;
        for individual in population.iter() {
            let fitness = individual.fitness();
            best = best.max(fitness);
            min = min.min(fitness);
            sum += fitness;
        }
        GenerationStats {
            generation: self.generation,
            best_fitness: best,
            mean_fitness: sum / population.len() as f64,
            min_fitness: min,
            evaluations,
        }
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn get_hall_of_fame(&self) -> &HallOfFame {
        &self.hall_of_fame
    }

    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }
}

/// Callback for callers that don't track progress.
struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_generation_start(&mut self, _generation: usize) {}
    fn on_generation_complete(&mut self, _stats: &GenerationStats, _hall_of_fame_size: usize) {}
    fn on_individual_evaluated(&mut self, _individual_num: usize, _total: usize) {}
}
