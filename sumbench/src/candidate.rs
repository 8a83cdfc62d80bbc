use std::fmt;
use std::hint::black_box;

use sumbench_macros::candidate;

use crate::InputDataset;

/// Signature shared by all summation candidates.
pub type CandidateFn = fn(&[u32]) -> anyhow::Result<u64>;

/// A named, pure operation under comparison.
///
/// Candidates only ever see a shared slice of the dataset, so they cannot mutate it.
#[derive(Clone, Copy)]
pub struct Candidate {
    name: &'static str,
    func: CandidateFn,
}

impl Candidate {
    pub const fn new(name: &'static str, func: CandidateFn) -> Self {
        Self { name, func }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Invoke the candidate once. Errors from the candidate are passed through untouched.
    pub fn invoke(&self, dataset: &InputDataset) -> anyhow::Result<u64> {
        (self.func)(dataset.as_slice())
    }
}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate").field("name", &self.name).finish()
    }
}

/// Sum with an explicit accumulation loop.
///
/// Every addition goes through `black_box`, so each element costs one
/// opaque step instead of being folded into a vectorised reduction.
#[candidate(name = "loop")]
pub fn sum_via_loop(data: &[u32]) -> anyhow::Result<u64> {
    let mut total: u64 = 0;
    for value in data {
        total = black_box(total + u64::from(*value));
    }
    Ok(total)
}

/// Sum with the standard library's `Iterator::sum`.
#[candidate(name = "builtin")]
pub fn sum_via_builtin(data: &[u32]) -> anyhow::Result<u64> {
    Ok(data.iter().map(|v| u64::from(*v)).sum())
}

/// The two summation strategies, slowest-expected first.
pub fn builtin_candidates() -> [Candidate; 2] {
    [SUM_VIA_LOOP, SUM_VIA_BUILTIN]
}
