use serde::{Deserialize, Serialize};

/// MIDI pitch number (0-127)
pub type Pitch = u8;

/// Note length in MIDI ticks
pub type Ticks = u32;

/// A single note event, the atomic unit of every candidate melody
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub pitch: Pitch,
    pub duration: Ticks,
    pub velocity: u8,
}
