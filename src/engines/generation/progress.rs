use super::evolution_engine::{GenerationStats, ProgressCallback};

pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        println!("Generation {} starting...", generation + 1);
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats, hall_of_fame_size: usize) {
        println!(
            "Generation {} complete. Best: {:.4}, Mean: {:.4}, Min: {:.4}, Hall of Fame size: {}",
            stats.generation + 1,
            stats.best_fitness,
            stats.mean_fitness,
            stats.min_fitness,
            hall_of_fame_size
        );
    }

    fn on_individual_evaluated(&mut self, individual_num: usize, total: usize) {
        if total >= 10 && (individual_num % 10 == 0 || individual_num == total) {
            println!("  Evaluated {}/{} individuals", individual_num, total);
        }
    }
}
