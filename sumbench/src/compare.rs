use std::fmt;

use crate::BenchmarkResult;

/// How many times slower one result is than another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ratio {
    Factor(f64),
    /// The faster side measured zero time, so no finite ratio exists.
    Incomparable,
}

impl Ratio {
    fn between(slower: &BenchmarkResult, faster: &BenchmarkResult) -> Self {
        if faster.duration.is_zero() {
            return Ratio::Incomparable;
        }
        Ratio::Factor(slower.duration.as_secs_f64() / faster.duration.as_secs_f64())
    }

    pub fn factor(&self) -> Option<f64> {
        match self {
            Ratio::Factor(f) => Some(*f),
            Ratio::Incomparable => None,
        }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Factor(x) => write!(f, "{:.2}x", x),
            Ratio::Incomparable => write!(f, "not comparable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Speedup {
    pub faster: String,
    pub slower: String,
    pub ratio: Ratio,
}

/// Results ranked fastest first, with the speedup of every pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub ranked: Vec<BenchmarkResult>,
    pub speedups: Vec<Speedup>,
}

impl Comparison {
    pub fn fastest(&self) -> Option<&BenchmarkResult> {
        self.ranked.first()
    }

    pub fn speedup(&self, faster: &str, slower: &str) -> Option<&Speedup> {
        self.speedups
            .iter()
            .find(|s| s.faster == faster && s.slower == slower)
    }
}

/// Rank `results` by ascending duration and compute `slower / faster` for each pair.
/// Ties keep their input order.
pub fn compare(results: impl IntoIterator<Item = BenchmarkResult>) -> Comparison {
    let mut ranked = results.into_iter().collect::<Vec<_>>();
    ranked.sort_by_key(|r| r.duration);
    let mut speedups = vec![];
    for (i, faster) in ranked.iter().enumerate() {
        for slower in &ranked[i + 1..] {
            speedups.push(Speedup {
                faster: faster.name.clone(),
                slower: slower.name.clone(),
                ratio: Ratio::between(slower, faster),
            });
        }
    }
    Comparison { ranked, speedups }
}
