use evotune::config::{AppConfig, EvolutionConfig, MusicConfig};
use evotune::engines::generation::{
    best_of, EvolutionEngine, GenerationStats, ProgressCallback,
};

/// Simple progress callback for testing
struct TestProgressCallback {
    generations_completed: usize,
}

impl ProgressCallback for TestProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, stats: &GenerationStats, _hall_of_fame_size: usize) {
        self.generations_completed = stats.generation + 1;
    }

    fn on_individual_evaluated(&mut self, _individual_num: usize, _total: usize) {}
}

/// Create a small config for fast testing
fn test_config(seed: u64) -> AppConfig {
    AppConfig {
        evolution: EvolutionConfig {
            population_size: 20,
            num_generations: 5,
            individual_length: 16,
            crossover_rate: 0.7,
            mutation_rate: 0.3,
            tournament_size: 3,
            hall_of_fame_size: 5,
            seed: Some(seed),
        },
        music: MusicConfig::default(),
    }
}

#[test]
fn test_full_run_completes_and_tracks_best() {
    let config = test_config(42);
    let mut engine = EvolutionEngine::new(&config).unwrap();
    let mut callback = TestProgressCallback {
        generations_completed: 0,
    };

    let outcome = engine.run(&mut callback).unwrap();

    assert_eq!(callback.generations_completed, 5);
    assert_eq!(outcome.population.len(), 20);
    for individual in &outcome.population {
        assert_eq!(individual.len(), 16);
        assert!(individual.fitness_valid());
    }

    // The reported best matches the population's actual maximum
    let max = outcome
        .population
        .iter()
        .map(|i| i.fitness())
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(outcome.best.fitness(), max);

    // Hall of fame holds distinct evaluated melodies, best first
    let hof = engine.get_hall_of_fame();
    assert!(!hof.is_empty());
    assert!(hof.len() <= 5);
    assert!(hof.best().unwrap().fitness >= outcome.best.fitness());
}

#[test]
fn test_population_size_and_length_invariant_across_generations() {
    let config = test_config(7);
    let mut engine = EvolutionEngine::new(&config).unwrap();
    let mut population = engine.initialize_population();

    for _ in 0..10 {
        engine.run_generation(&mut population);
        assert_eq!(population.len(), 20);
        for individual in &population {
            assert_eq!(individual.len(), 16);
        }
    }
}

#[test]
fn test_generation_without_operators_preserves_scores() {
    // CXPB = 0 and MUTPB = 0: selection and replacement still happen, but
    // no operator fires, so every survivor keeps a score identical to one
    // from the pre-generation population.
    let mut config = test_config(11);
    config.evolution.population_size = 4;
    config.evolution.individual_length = 3;
    config.evolution.crossover_rate = 0.0;
    config.evolution.mutation_rate = 0.0;
    config.evolution.tournament_size = 2;
    config.music.pitch_min = 60;
    config.music.pitch_max = 64;
    config.music.durations = vec![240];

    let mut engine = EvolutionEngine::new(&config).unwrap();
    let mut population = engine.initialize_population();

    let first = engine.run_generation(&mut population);
    let scores_before: Vec<f64> = population.iter().map(|i| i.fitness()).collect();

    let second = engine.run_generation(&mut population);
    let scores_after: Vec<f64> = population.iter().map(|i| i.fitness()).collect();

    // First pass scored the whole fresh population; with no operators
    // firing, the second generation re-evaluates nothing
    assert_eq!(first.evaluations, 4);
    assert_eq!(second.evaluations, 0);

    for score in &scores_after {
        assert!(
            scores_before.contains(score),
            "score {} not present before the generation",
            score
        );
    }
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let run = |seed: u64| {
        let config = test_config(seed);
        let mut engine = EvolutionEngine::new(&config).unwrap();
        let mut population = engine.initialize_population();
        let mut stats = Vec::new();
        for _ in 0..5 {
            stats.push(engine.run_generation(&mut population));
        }
        (population, stats)
    };

    let (population_a, stats_a) = run(123);
    let (population_b, stats_b) = run(123);
    let (population_c, _) = run(456);

    assert_eq!(population_a, population_b);
    for (a, b) in stats_a.iter().zip(stats_b.iter()) {
        assert_eq!(a.best_fitness, b.best_fitness);
        assert_eq!(a.mean_fitness, b.mean_fitness);
        assert_eq!(a.evaluations, b.evaluations);
    }

    // A different seed diverges
    assert_ne!(population_a, population_c);
}

#[test]
fn test_best_of_returns_descending_fitness() {
    let config = test_config(99);
    let mut engine = EvolutionEngine::new(&config).unwrap();
    let mut population = engine.initialize_population();
    engine.run_generation(&mut population);

    let best = best_of(&population, 5);
    assert_eq!(best.len(), 5);
    for pair in best.windows(2) {
        assert!(pair[0].fitness() >= pair[1].fitness());
    }

    // The top individual dominates the whole population
    for individual in &population {
        assert!(best[0].fitness() >= individual.fitness());
    }
}

#[test]
fn test_engine_rejects_invalid_config() {
    let mut config = test_config(1);
    config.music.durations.clear();
    assert!(EvolutionEngine::new(&config).is_err());

    let mut config = test_config(1);
    config.evolution.tournament_size = 100;
    assert!(EvolutionEngine::new(&config).is_err());

    let mut config = test_config(1);
    config.music.weights.harmonic = 0.9;
    assert!(EvolutionEngine::new(&config).is_err());
}

#[test]
fn test_tiny_individuals_never_fail_a_generation() {
    // Below every operator's minimum window: windowed operators must
    // silently no-op while point mutations still work.
    let mut config = test_config(5);
    config.evolution.individual_length = 2;
    config.evolution.population_size = 6;
    config.evolution.tournament_size = 2;
    config.evolution.crossover_rate = 1.0;
    config.evolution.mutation_rate = 1.0;

    let mut engine = EvolutionEngine::new(&config).unwrap();
    let mut population = engine.initialize_population();

    for _ in 0..20 {
        engine.run_generation(&mut population);
        for individual in &population {
            assert_eq!(individual.len(), 2);
        }
    }
}

#[test]
fn test_pitches_stay_in_register_over_many_generations() {
    let config = test_config(21);
    let mut engine = EvolutionEngine::new(&config).unwrap();
    let mut population = engine.initialize_population();

    for _ in 0..15 {
        engine.run_generation(&mut population);
    }

    let music = MusicConfig::default();
    for individual in &population {
        for note in individual.notes() {
            assert!(note.pitch >= music.pitch_min && note.pitch <= music.pitch_max);
            assert!(music.durations.contains(&note.duration));
        }
    }
}
