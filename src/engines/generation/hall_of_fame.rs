use crate::engines::generation::individual::Individual;
use crate::types::Note;
use std::collections::HashSet;

/// An archived melody together with the fitness it was admitted at.
#[derive(Clone, Debug)]
pub struct EliteMelody {
    pub individual: Individual,
    pub fitness: f64,
    pub signature: String,
}

/// Capped archive of the best individuals seen across all generations.
/// Duplicate note sequences are rejected so the archive holds distinct
/// melodies, not one melody repeated.
pub struct HallOfFame {
    melodies: Vec<EliteMelody>,
    max_size: usize,
    seen_signatures: HashSet<String>,
}

impl HallOfFame {
    pub fn new(max_size: usize) -> Self {
        Self {
            melodies: Vec::new(),
            max_size,
            seen_signatures: HashSet::new(),
        }
    }

    /// Attempt to add an individual. Requires a valid fitness cache.
    /// Returns false for duplicates.
    pub fn try_add(&mut self, individual: &Individual) -> bool {
        let signature = note_signature(individual.notes());
        if self.seen_signatures.contains(&signature) {
            return false;
        }

        self.seen_signatures.insert(signature.clone());
        self.melodies.push(EliteMelody {
            individual: individual.clone(),
            fitness: individual.fitness(),
            signature,
        });

        self.sort_and_trim();
        true
    }

    fn sort_and_trim(&mut self) {
        self.melodies.sort_by(|a, b| {
            b.fitness
                .partial_cmp(&a.fitness)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if self.melodies.len() > self.max_size {
            if let Some(removed) = self.melodies.pop() {
                self.seen_signatures.remove(&removed.signature);
            }
        }
    }

    pub fn get_all(&self) -> &[EliteMelody] {
        &self.melodies
    }

    pub fn get_top_n(&self, n: usize) -> &[EliteMelody] {
        &self.melodies[..n.min(self.melodies.len())]
    }

    pub fn best(&self) -> Option<&EliteMelody> {
        self.melodies.first()
    }

    pub fn len(&self) -> usize {
        self.melodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.melodies.is_empty()
    }
}

/// Canonical signature for deduplication
pub fn note_signature(notes: &[Note]) -> String {
    serde_json::to_string(notes).unwrap_or_else(|_| String::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn melody(pitch: u8, fitness: f64) -> Individual {
        let mut individual = Individual::new(vec![Note {
            pitch,
            duration: 240,
            velocity: 64,
        }]);
        individual.set_fitness(fitness);
        individual
    }

    #[test]
    fn test_keeps_best_and_respects_capacity() {
        let mut hof = HallOfFame::new(3);

        for (pitch, fitness) in [(60, 0.2), (61, 0.9), (62, 0.5), (63, 0.7), (64, 0.1)] {
            hof.try_add(&melody(pitch, fitness));
        }

        assert_eq!(hof.len(), 3);
        let fitnesses: Vec<f64> = hof.get_all().iter().map(|e| e.fitness).collect();
        assert_eq!(fitnesses, vec![0.9, 0.7, 0.5]);
    }

    #[test]
    fn test_rejects_duplicate_note_sequences() {
        let mut hof = HallOfFame::new(5);

        assert!(hof.try_add(&melody(60, 0.5)));
        assert!(!hof.try_add(&melody(60, 0.5)));
        assert_eq!(hof.len(), 1);
    }

    #[test]
    fn test_evicted_melody_can_reenter() {
        let mut hof = HallOfFame::new(1);

        assert!(hof.try_add(&melody(60, 0.2)));
        assert!(hof.try_add(&melody(61, 0.9)));
        assert_eq!(hof.len(), 1);

        // The pitch-60 melody was evicted, so its signature is free again
        assert!(hof.try_add(&melody(60, 0.2)));
        assert_eq!(hof.best().unwrap().fitness, 0.9);
    }

    #[test]
    fn test_top_n_clamps_to_len() {
        let mut hof = HallOfFame::new(5);
        hof.try_add(&melody(60, 0.5));
        assert_eq!(hof.get_top_n(10).len(), 1);
    }
}
