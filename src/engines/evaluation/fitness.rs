use crate::config::music::{FitnessWeights, MusicConfig};
use crate::engines::generation::individual::Individual;
use crate::types::Note;
use std::collections::HashSet;

/// Span (in semitones) at which the range score saturates: two octaves.
const RANGE_CAP: f64 = 24.0;

/// Scores individuals against five musical criteria and aggregates them
/// into one scalar via a convex weighted sum. Pure: depends only on the
/// note contents, never on evaluation order or RNG state.
pub struct FitnessEvaluator {
    key_notes: HashSet<u8>,
    duration_vocabulary: usize,
    weights: FitnessWeights,
}

impl FitnessEvaluator {
    pub fn new(music: &MusicConfig) -> Self {
        Self {
            key_notes: music.key_notes.iter().copied().collect(),
            duration_vocabulary: music.durations.len(),
            weights: music.weights,
        }
    }

    pub fn evaluate(&self, individual: &Individual) -> f64 {
        let notes = individual.notes();
        self.weights.harmonic * self.harmonic_score(notes)
            + self.weights.melodic * self.melodic_score(notes)
            + self.weights.rhythmic * self.rhythmic_score(notes)
            + self.weights.contour * self.contour_score(notes)
            + self.weights.range * self.range_score(notes)
    }

    /// Fraction of notes whose pitch belongs to the key set.
    pub fn harmonic_score(&self, notes: &[Note]) -> f64 {
        if notes.is_empty() {
            return 0.0;
        }
        let in_key = notes
            .iter()
            .filter(|note| self.key_notes.contains(&note.pitch))
            .count();
        in_key as f64 / notes.len() as f64
    }

    /// Rewards stepwise motion, discourages leaps. Intervals of two
    /// semitones or less earn +2, up to five +1, and anything beyond an
    /// octave costs 1. The running total is floored at zero before
    /// normalizing by length.
    pub fn melodic_score(&self, notes: &[Note]) -> f64 {
        if notes.len() < 2 {
            return 0.0;
        }
        let mut score: i64 = 0;
        for pair in notes.windows(2) {
            let interval = (pair[1].pitch as i64 - pair[0].pitch as i64).abs();
            if interval <= 2 {
                score += 2;
            } else if interval <= 5 {
                score += 1;
            } else if interval > 12 {
                score -= 1;
            }
        }
        score.max(0) as f64 / notes.len() as f64
    }

    /// Balances rhythmic repetition against variety: the mean of the
    /// adjacent-pair repetition rate and the fraction of the duration
    /// vocabulary actually used.
    pub fn rhythmic_score(&self, notes: &[Note]) -> f64 {
        if notes.is_empty() || self.duration_vocabulary == 0 {
            return 0.0;
        }
        let repetition = if notes.len() < 2 {
            0.0
        } else {
            let repeats = notes
                .windows(2)
                .filter(|pair| pair[0].duration == pair[1].duration)
                .count();
            repeats as f64 / (notes.len() - 1) as f64
        };
        let distinct: HashSet<u32> = notes.iter().map(|note| note.duration).collect();
        let variety = distinct.len() as f64 / self.duration_vocabulary as f64;
        (repetition + variety) / 2.0
    }

    /// Direction reversals (local maxima and minima) in the pitch sequence,
    /// normalized by the number of interior notes.
    pub fn contour_score(&self, notes: &[Note]) -> f64 {
        if notes.len() < 3 {
            return 0.0;
        }
        let mut changes = 0usize;
        for window in notes.windows(3) {
            let first = window[1].pitch as i32 - window[0].pitch as i32;
            let second = window[2].pitch as i32 - window[1].pitch as i32;
            if (first > 0 && second < 0) || (first < 0 && second > 0) {
                changes += 1;
            }
        }
        changes as f64 / (notes.len() - 2) as f64
    }

    /// Span between highest and lowest pitch, saturating at two octaves.
    pub fn range_score(&self, notes: &[Note]) -> f64 {
        let pitches = notes.iter().map(|note| note.pitch);
        match (pitches.clone().max(), pitches.min()) {
            (Some(max), Some(min)) => ((max - min) as f64 / RANGE_CAP).min(1.0),
            _ => 0.0,
        }
    }
}
