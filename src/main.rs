use anyhow::Context;
use evotune::config::ConfigManager;
use evotune::engines::generation::{ConsoleProgressCallback, EvolutionEngine};
use evotune::export::write_midi;
use log::info;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next();
    let output_dir = PathBuf::from(args.next().unwrap_or_else(|| "midi_outputs".to_string()));

    let manager = ConfigManager::new();
    if let Some(path) = &config_path {
        manager
            .load_from_file(path)
            .with_context(|| format!("loading configuration from {}", path))?;
        info!("loaded configuration from {}", path);
    }
    let config = manager.get();

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let mut engine = EvolutionEngine::new(&config)?;
    println!("Starting evolution...");
    let outcome = engine.run(&mut ConsoleProgressCallback)?;

    println!("\nFinal best fitness: {:.4}", outcome.best.fitness());
    write_midi(&outcome.best, &output_dir.join("best_individual.mid"))?;

    for (i, elite) in engine.get_hall_of_fame().get_top_n(5).iter().enumerate() {
        let path = output_dir.join(format!("top_{}.mid", i + 1));
        write_midi(&elite.individual, &path)?;
        println!("Top {} fitness: {:.4} -> {}", i + 1, elite.fitness, path.display());
    }

    Ok(())
}
