//! Micro benchmarking of interchangeable summation candidates over a shared,
//! immutable dataset, plus peak-memory probing of eager vs. lazy construction.

extern crate self as sumbench;

mod bencher;
mod candidate;
mod compare;
mod config;
mod dataset;
pub mod probe;
pub mod record;
mod sequence;

pub use bencher::{BenchTimer, Bencher, BenchmarkResult, Measurement, MeasurementSeries};
pub use candidate::{
    builtin_candidates, sum_via_builtin, sum_via_loop, Candidate, CandidateFn,
};
pub use candidate::{SUM_VIA_BUILTIN, SUM_VIA_LOOP};
pub use compare::{compare, Comparison, Ratio, Speedup};
pub use config::{BenchConfig, ValueRange};
pub use dataset::InputDataset;
pub use sequence::{count_eager, count_lazy, EagerBuilder, LazySequence};
pub use std::hint::black_box;
pub use sumbench_macros::candidate;
