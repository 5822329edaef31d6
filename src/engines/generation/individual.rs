use crate::config::music::MusicConfig;
use crate::types::Note;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One candidate melody: a fixed-length note sequence plus a cached fitness.
///
/// The cache is `Some` only while the notes are unchanged since the last
/// evaluation. The sole mutable path to the notes goes through
/// [`Individual::notes_mut`], which clears the cache, so a stale score can
/// never survive a structural change. Reading the fitness of an individual
/// whose cache is empty is a contract violation and panics: it means an
/// evaluation pass was skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    notes: Vec<Note>,
    fitness: Option<f64>,
}

/// The full set of individuals evolved together. Order matters: crossover
/// pairs index 2i with 2i+1.
pub type Population = Vec<Individual>;

impl Individual {
    pub fn new(notes: Vec<Note>) -> Self {
        Self {
            notes,
            fitness: None,
        }
    }

    /// Build an individual of `length` random notes drawn from the
    /// configured register and duration set.
    pub fn random<R: Rng>(length: usize, music: &MusicConfig, rng: &mut R) -> Self {
        let notes = (0..length)
            .map(|_| Note {
                pitch: rng.gen_range(music.pitch_min..=music.pitch_max),
                duration: music.durations[rng.gen_range(0..music.durations.len())],
                velocity: music.velocity,
            })
            .collect();
        Self::new(notes)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Mutable access to the notes. Clears the fitness cache unconditionally:
    /// the caller may change any note, so the cached score can no longer be
    /// trusted.
    pub fn notes_mut(&mut self) -> &mut [Note] {
        self.fitness = None;
        &mut self.notes
    }

    /// Cached fitness. Panics if the cache is invalid.
    pub fn fitness(&self) -> f64 {
        match self.fitness {
            Some(fitness) => fitness,
            None => panic!("fitness read on an unevaluated individual (missed invalidation?)"),
        }
    }

    pub fn fitness_valid(&self) -> bool {
        self.fitness.is_some()
    }

    pub fn cached_fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    pub fn invalidate_fitness(&mut self) {
        self.fitness = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_individual_respects_config() {
        let music = MusicConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let individual = Individual::random(64, &music, &mut rng);

        assert_eq!(individual.len(), 64);
        for note in individual.notes() {
            assert!(note.pitch >= music.pitch_min && note.pitch <= music.pitch_max);
            assert!(music.durations.contains(&note.duration));
            assert_eq!(note.velocity, music.velocity);
        }
    }

    #[test]
    fn test_mutable_access_invalidates_cache() {
        let music = MusicConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut individual = Individual::random(8, &music, &mut rng);

        individual.set_fitness(0.5);
        assert!(individual.fitness_valid());

        let _ = individual.notes_mut();
        assert!(!individual.fitness_valid());
    }

    #[test]
    #[should_panic(expected = "unevaluated individual")]
    fn test_reading_invalid_fitness_panics() {
        let individual = Individual::new(vec![]);
        let _ = individual.fitness();
    }
}
