use crate::config::music::MusicConfig;
use crate::engines::generation::individual::Individual;
use crate::types::Note;
use rand::Rng;

/// Musically meaningful transposition intervals: fourths, fifths, octaves.
pub const TRANSPOSE_INTERVALS: [i16; 6] = [-12, -7, -5, 5, 7, 12];

/// Smallest section any windowed operator will touch. Below this the
/// operator is a silent no-op.
pub const MIN_WINDOW: usize = 4;

const TRANSPOSE_MAX_WINDOW: usize = 16;
const INVERT_MAX_WINDOW: usize = 12;
const RHYTHM_MAX_WINDOW: usize = 16;
const SEGMENT_MAX_WINDOW: usize = 16;
const INTERLEAVE_CHUNK: usize = 4;

/// One mutation operator. Each variant transforms an individual's notes in
/// place, stochastically; a call is not guaranteed to change anything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MutationOp {
    /// Per-note chance to redraw the pitch from the register
    Pitch { indpb: f64 },
    /// Per-note chance to redraw the duration from the allowed set
    Duration { indpb: f64 },
    /// Shift a random section by a fixed interval
    Transpose { prob: f64 },
    /// Mirror a random section around its first pitch
    Invert { prob: f64 },
    /// Rotate a random section's durations by one position
    RhythmShift { prob: f64 },
}

impl MutationOp {
    pub fn apply<R: Rng>(&self, individual: &mut Individual, music: &MusicConfig, rng: &mut R) {
        match *self {
            MutationOp::Pitch { indpb } => mutate_pitch(individual, music, indpb, rng),
            MutationOp::Duration { indpb } => mutate_duration(individual, music, indpb, rng),
            MutationOp::Transpose { prob } => mutate_transpose(individual, music, prob, rng),
            MutationOp::Invert { prob } => mutate_invert(individual, music, prob, rng),
            MutationOp::RhythmShift { prob } => mutate_rhythm_shift(individual, prob, rng),
        }
    }
}

/// The default mutator: every operator in fixed order, each gated by its
/// own probability.
#[derive(Debug, Clone)]
pub struct CompositeMutation {
    ops: Vec<MutationOp>,
}

impl Default for CompositeMutation {
    fn default() -> Self {
        Self {
            ops: vec![
                MutationOp::Pitch { indpb: 0.10 },
                MutationOp::Duration { indpb: 0.10 },
                MutationOp::Transpose { prob: 0.15 },
                MutationOp::Invert { prob: 0.08 },
                MutationOp::RhythmShift { prob: 0.12 },
            ],
        }
    }
}

impl CompositeMutation {
    pub fn new(ops: Vec<MutationOp>) -> Self {
        Self { ops }
    }

    pub fn apply<R: Rng>(&self, individual: &mut Individual, music: &MusicConfig, rng: &mut R) {
        for op in &self.ops {
            op.apply(individual, music, rng);
        }
    }
}

fn mutate_pitch<R: Rng>(individual: &mut Individual, music: &MusicConfig, indpb: f64, rng: &mut R) {
    for note in individual.notes_mut() {
        if rng.gen::<f64>() < indpb {
            note.pitch = rng.gen_range(music.pitch_min..=music.pitch_max);
        }
    }
}

fn mutate_duration<R: Rng>(
    individual: &mut Individual,
    music: &MusicConfig,
    indpb: f64,
    rng: &mut R,
) {
    for note in individual.notes_mut() {
        if rng.gen::<f64>() < indpb {
            note.duration = music.durations[rng.gen_range(0..music.durations.len())];
        }
    }
}

/// Pick a window of `min..=max` notes (clamped to the sequence) with
/// `start + len <= n`. Returns `None` when the sequence is too short.
fn random_window<R: Rng>(n: usize, max_window: usize, rng: &mut R) -> Option<(usize, usize)> {
    if n < MIN_WINDOW {
        return None;
    }
    let len = rng.gen_range(MIN_WINDOW..=max_window.min(n));
    let start = rng.gen_range(0..=n - len);
    Some((start, len))
}

fn mutate_transpose<R: Rng>(
    individual: &mut Individual,
    music: &MusicConfig,
    prob: f64,
    rng: &mut R,
) {
    if rng.gen::<f64>() >= prob {
        return;
    }
    let Some((start, len)) = random_window(individual.len(), TRANSPOSE_MAX_WINDOW, rng) else {
        return;
    };
    let interval = TRANSPOSE_INTERVALS[rng.gen_range(0..TRANSPOSE_INTERVALS.len())];
    let notes = individual.notes_mut();
    for note in &mut notes[start..start + len] {
        let shifted = note.pitch as i16 + interval;
        // Out-of-register results leave the note untouched: reject, not clamp
        if shifted >= music.pitch_min as i16 && shifted <= music.pitch_max as i16 {
            note.pitch = shifted as u8;
        }
    }
}

fn mutate_invert<R: Rng>(individual: &mut Individual, music: &MusicConfig, prob: f64, rng: &mut R) {
    if rng.gen::<f64>() >= prob {
        return;
    }
    let Some((start, len)) = random_window(individual.len(), INVERT_MAX_WINDOW, rng) else {
        return;
    };
    let notes = individual.notes_mut();
    let pivot = notes[start].pitch as i16;
    for note in &mut notes[start..start + len] {
        let mirrored = pivot - (note.pitch as i16 - pivot);
        if mirrored >= music.pitch_min as i16 && mirrored <= music.pitch_max as i16 {
            note.pitch = mirrored as u8;
        }
    }
}

fn mutate_rhythm_shift<R: Rng>(individual: &mut Individual, prob: f64, rng: &mut R) {
    if rng.gen::<f64>() >= prob {
        return;
    }
    let Some((start, len)) = random_window(individual.len(), RHYTHM_MAX_WINDOW, rng) else {
        return;
    };
    let notes = individual.notes_mut();
    // Rotate the window's durations left: the first moves to the end
    let first = notes[start].duration;
    for i in start..start + len - 1 {
        notes[i].duration = notes[i + 1].duration;
    }
    notes[start + len - 1].duration = first;
}

/// One crossover operator over two equal-length individuals. Notes are
/// swapped element-wise in place; both caches are cleared on any touch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrossoverOp {
    TwoPoint,
    Uniform { swap_prob: f64 },
    Segment,
    Interleave { chunk: usize },
}

impl CrossoverOp {
    pub fn apply<R: Rng>(&self, first: &mut Individual, second: &mut Individual, rng: &mut R) {
        match *self {
            CrossoverOp::TwoPoint => crossover_two_point(first, second, rng),
            CrossoverOp::Uniform { swap_prob } => crossover_uniform(first, second, swap_prob, rng),
            CrossoverOp::Segment => crossover_segment(first, second, rng),
            CrossoverOp::Interleave { chunk } => crossover_interleave(first, second, chunk),
        }
    }
}

fn swap_span(first: &mut [Note], second: &mut [Note], start: usize, end: usize) {
    for i in start..end {
        std::mem::swap(&mut first[i], &mut second[i]);
    }
}

fn crossover_two_point<R: Rng>(first: &mut Individual, second: &mut Individual, rng: &mut R) {
    let size = first.len().min(second.len());
    if size < 3 {
        return;
    }
    // 1 <= a < b <= size-1, so the swapped span never covers a whole parent
    let a = rng.gen_range(1..size - 1);
    let b = rng.gen_range(a + 1..size);
    swap_span(first.notes_mut(), second.notes_mut(), a, b);
}

fn crossover_uniform<R: Rng>(
    first: &mut Individual,
    second: &mut Individual,
    swap_prob: f64,
    rng: &mut R,
) {
    let size = first.len().min(second.len());
    if size == 0 {
        return;
    }
    let (left, right) = (first.notes_mut(), second.notes_mut());
    for i in 0..size {
        if rng.gen::<f64>() < swap_prob {
            std::mem::swap(&mut left[i], &mut right[i]);
        }
    }
}

fn crossover_segment<R: Rng>(first: &mut Individual, second: &mut Individual, rng: &mut R) {
    let size = first.len().min(second.len());
    let Some((start, len)) = random_window(size, SEGMENT_MAX_WINDOW, rng) else {
        return;
    };
    swap_span(first.notes_mut(), second.notes_mut(), start, start + len);
}

fn crossover_interleave(first: &mut Individual, second: &mut Individual, chunk: usize) {
    let size = first.len().min(second.len());
    if size == 0 || chunk == 0 {
        return;
    }
    let (left, right) = (first.notes_mut(), second.notes_mut());
    let mut start = 0;
    while start < size {
        let end = (start + chunk).min(size);
        swap_span(left, right, start, end);
        start += chunk * 2;
    }
}

/// Picks exactly one crossover operator per call with a single uniform
/// draw against cumulative thresholds; operators never combine.
#[derive(Debug, Clone)]
pub struct CrossoverDispatcher {
    two_point_below: f64,
    uniform_below: f64,
    segment_below: f64,
    uniform_swap_prob: f64,
    interleave_chunk: usize,
}

impl Default for CrossoverDispatcher {
    fn default() -> Self {
        // 30% two-point, 30% uniform, 25% segment, 15% interleave
        Self {
            two_point_below: 0.30,
            uniform_below: 0.60,
            segment_below: 0.85,
            uniform_swap_prob: 0.5,
            interleave_chunk: INTERLEAVE_CHUNK,
        }
    }
}

impl CrossoverDispatcher {
    /// Apply one randomly chosen operator to the pair, returning which ran.
    pub fn apply<R: Rng>(
        &self,
        first: &mut Individual,
        second: &mut Individual,
        rng: &mut R,
    ) -> CrossoverOp {
        let draw = rng.gen::<f64>();
        let op = if draw < self.two_point_below {
            CrossoverOp::TwoPoint
        } else if draw < self.uniform_below {
            CrossoverOp::Uniform {
                swap_prob: self.uniform_swap_prob,
            }
        } else if draw < self.segment_below {
            CrossoverOp::Segment
        } else {
            CrossoverOp::Interleave {
                chunk: self.interleave_chunk,
            }
        };
        op.apply(first, second, rng);
        op
    }
}

/// Tournament selection: the best of `tournament_size` uniformly sampled
/// individuals. Returns a deep copy, so operators applied to the winner
/// never alias the source population. Panics if any sampled individual has
/// an invalid fitness cache.
pub fn tournament_selection<R: Rng>(
    population: &[Individual],
    tournament_size: usize,
    rng: &mut R,
) -> Individual {
    let mut best_idx = rng.gen_range(0..population.len());
    let mut best_fitness = population[best_idx].fitness();

    for _ in 1..tournament_size {
        let idx = rng.gen_range(0..population.len());
        if population[idx].fitness() > best_fitness {
            best_idx = idx;
            best_fitness = population[idx].fitness();
        }
    }

    population[best_idx].clone()
}

/// The `k` highest-fitness individuals, ties broken by population order
/// (stable sort, never re-randomized).
pub fn best_of(population: &[Individual], k: usize) -> Vec<&Individual> {
    let mut ranked: Vec<&Individual> = population.iter().collect();
    ranked.sort_by(|a, b| {
        b.fitness()
            .partial_cmp(&a.fitness())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(k);
    ranked
}
