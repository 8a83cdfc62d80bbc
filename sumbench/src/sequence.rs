//! Eager and lazy construction of random value sequences.
//!
//! [`EagerBuilder`] materializes all `n` values up front, so its footprint
//! grows with `n`. [`LazySequence`] is a pull-based state machine holding only
//! its generator, the value distribution and a countdown. It never allocates
//! and at most one value exists at a time.

use std::iter::FusedIterator;

use rand::{distributions::Uniform, Rng};

use crate::ValueRange;

pub struct EagerBuilder;

impl EagerBuilder {
    pub fn build<R: Rng>(len: usize, range: ValueRange, rng: &mut R) -> Vec<u32> {
        let dist = range.distribution();
        (0..len).map(|_| rng.sample(dist)).collect()
    }
}

/// One-shot, finite, lazily generated sequence.
///
/// Not `Clone`: once consumed it cannot be restarted.
pub struct LazySequence<R> {
    rng: R,
    dist: Uniform<u32>,
    remaining: usize,
}

impl<R: Rng> LazySequence<R> {
    pub fn new(len: usize, range: ValueRange, rng: R) -> Self {
        Self {
            rng,
            dist: range.distribution(),
            remaining: len,
        }
    }

    pub fn has_next(&self) -> bool {
        self.remaining > 0
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl<R: Rng> Iterator for LazySequence<R> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if !self.has_next() {
            return None;
        }
        self.remaining -= 1;
        Some(self.rng.sample(self.dist))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<R: Rng> ExactSizeIterator for LazySequence<R> {}

impl<R: Rng> FusedIterator for LazySequence<R> {}

/// Build the full collection and report how many elements it holds.
pub fn count_eager<R: Rng>(len: usize, range: ValueRange, rng: &mut R) -> usize {
    let values = EagerBuilder::build(len, range, rng);
    values.len()
}

/// Drain a lazy sequence one element at a time and report how many it produced.
pub fn count_lazy<R: Rng>(len: usize, range: ValueRange, rng: R) -> usize {
    let mut count = 0;
    for value in LazySequence::new(len, range, rng) {
        std::hint::black_box(value);
        count += 1;
    }
    count
}
