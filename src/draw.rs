//! Uniform random pick from a candidate list.

use rand::Rng;
use std::cell::Cell;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DrawError {
    #[error("no numbers are available to draw from, check the range and filter")]
    NoCandidates,
}

/// Source of randomness for a draw.
pub trait RandomSource {
    /// Return an index in `0..len`. Only called with `len > 0`.
    fn pick_index(&self, len: usize) -> usize;
}

/// Production source backed by `rand::thread_rng()`.
#[derive(Debug, Clone, Default)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn pick_index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Replays a fixed sequence of indices, cycling. Indices are wrapped into range.
#[derive(Debug)]
pub struct SequenceSource {
    indices: Vec<usize>,
    next: Cell<usize>,
}

impl SequenceSource {
    pub fn new(indices: Vec<usize>) -> Self {
        Self {
            indices,
            next: Cell::new(0),
        }
    }
}

impl RandomSource for SequenceSource {
    fn pick_index(&self, len: usize) -> usize {
        if self.indices.is_empty() {
            return 0;
        }
        let i = self.next.get();
        self.next.set((i + 1) % self.indices.len());
        self.indices[i] % len
    }
}

/// Pick one element of `candidates` uniformly at random.
pub fn draw(candidates: &[u64], rng: &dyn RandomSource) -> Result<u64, DrawError> {
    if candidates.is_empty() {
        return Err(DrawError::NoCandidates);
    }
    Ok(candidates[rng.pick_index(candidates.len())])
}
