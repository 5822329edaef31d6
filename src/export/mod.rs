pub mod midi;

pub use midi::write_midi;
