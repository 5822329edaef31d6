use super::traits::ConfigSection;
use crate::error::EvotuneError;
use serde::{Deserialize, Serialize};

/// Weights for the five fitness criteria. Must sum to 1 so the aggregate
/// score stays on the same scale as the sub-scores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FitnessWeights {
    pub harmonic: f64,
    pub melodic: f64,
    pub rhythmic: f64,
    pub contour: f64,
    pub range: f64,
}

impl FitnessWeights {
    pub fn sum(&self) -> f64 {
        self.harmonic + self.melodic + self.rhythmic + self.contour + self.range
    }
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            harmonic: 0.25,
            melodic: 0.25,
            rhythmic: 0.20,
            contour: 0.15,
            range: 0.15,
        }
    }
}

/// Musical reference data: the playable register, the allowed note lengths,
/// the in-key pitch set and the fixed velocity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicConfig {
    pub pitch_min: u8,
    pub pitch_max: u8,
    pub durations: Vec<u32>,
    pub key_notes: Vec<u8>,
    pub velocity: u8,
    pub weights: FitnessWeights,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            // C3..B5
            pitch_min: 48,
            pitch_max: 83,
            durations: vec![120, 240, 480, 960],
            // C major across the register
            key_notes: vec![
                48, 50, 52, 53, 55, 57, 59, 60, 62, 64, 65, 67, 69, 71, 72, 74, 76, 77, 79, 81,
                83,
            ],
            velocity: 64,
            weights: FitnessWeights::default(),
        }
    }
}

impl ConfigSection for MusicConfig {
    fn section_name() -> &'static str {
        "music"
    }

    fn validate(&self) -> Result<(), EvotuneError> {
        if self.pitch_min > self.pitch_max {
            return Err(EvotuneError::Configuration(
                "Pitch range is inverted".to_string(),
            ));
        }
        if self.pitch_max > 127 {
            return Err(EvotuneError::Configuration(
                "Pitch range must stay within MIDI range 0-127".to_string(),
            ));
        }
        if self.durations.is_empty() {
            return Err(EvotuneError::Configuration(
                "Duration set must not be empty".to_string(),
            ));
        }
        if self.durations.iter().any(|&d| d == 0) {
            return Err(EvotuneError::Configuration(
                "Durations must be positive tick counts".to_string(),
            ));
        }
        if self.velocity > 127 {
            return Err(EvotuneError::Configuration(
                "Velocity must stay within MIDI range 0-127".to_string(),
            ));
        }
        let w = &self.weights;
        for (name, value) in [
            ("harmonic", w.harmonic),
            ("melodic", w.melodic),
            ("rhythmic", w.rhythmic),
            ("contour", w.contour),
            ("range", w.range),
        ] {
            if value < 0.0 {
                return Err(EvotuneError::Configuration(format!(
                    "Fitness weight '{}' must not be negative",
                    name
                )));
            }
        }
        if (w.sum() - 1.0).abs() > 1e-6 {
            return Err(EvotuneError::Configuration(format!(
                "Fitness weights must sum to 1.0, got {}",
                w.sum()
            )));
        }
        Ok(())
    }
}
