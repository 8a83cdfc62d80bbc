use std::{
    cell::Cell,
    time::{Duration, Instant},
};

use crate::{probe::MemoryUsage, Candidate, InputDataset};

/// One wall-clock sample from a single candidate invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Measurement(Duration);

impl Measurement {
    pub fn new(elapsed: Duration) -> Self {
        Self(elapsed)
    }

    pub fn elapsed(&self) -> Duration {
        self.0
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0.as_secs_f64()
    }
}

/// Measurements from repeated trials of the same candidate, in trial order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasurementSeries {
    samples: Vec<Measurement>,
}

impl MeasurementSeries {
    pub fn samples(&self) -> &[Measurement] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The representative value of the series. Transient scheduler and cache
    /// interference only ever adds time, so the fastest trial is the least distorted.
    pub fn min(&self) -> Option<Duration> {
        self.samples.iter().map(|m| m.elapsed()).min()
    }

    pub fn max(&self) -> Option<Duration> {
        self.samples.iter().map(|m| m.elapsed()).max()
    }

    pub fn mean(&self) -> Option<Duration> {
        if self.samples.is_empty() {
            return None;
        }
        let total: Duration = self.samples.iter().map(|m| m.elapsed()).sum();
        Some(mean_of(total, self.samples.len()))
    }
}

fn mean_of(total: Duration, count: usize) -> Duration {
    match u32::try_from(count) {
        Ok(n) => total / n,
        Err(_) => total.div_f64(count as f64),
    }
}

impl FromIterator<Measurement> for MeasurementSeries {
    fn from_iter<I: IntoIterator<Item = Measurement>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

/// Representative outcome for one candidate. Created once all trials finish.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkResult {
    pub name: String,
    pub duration: Duration,
    pub trials: usize,
    pub peak_memory: Option<MemoryUsage>,
}

impl BenchmarkResult {
    pub fn new(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            duration,
            trials: 1,
            peak_memory: None,
        }
    }

    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_memory(mut self, usage: Option<MemoryUsage>) -> Self {
        self.peak_memory = usage;
        self
    }
}

/// Times candidates against a shared dataset.
pub struct Bencher {
    elapsed: Cell<Option<Duration>>,
    warmup: usize,
}

pub struct BenchTimer<'a> {
    start_time: Instant,
    bencher: &'a Bencher,
}

impl<'a> Drop for BenchTimer<'a> {
    fn drop(&mut self) {
        let elapsed = self.start_time.elapsed();
        let previous = self.bencher.elapsed.replace(Some(elapsed));
        assert!(previous.is_none(), "More than one benchmark timer detected");
    }
}

impl Default for Bencher {
    fn default() -> Self {
        Self::new()
    }
}

impl Bencher {
    pub fn new() -> Self {
        Self {
            elapsed: Cell::new(None),
            warmup: 0,
        }
    }

    /// Run `warmup` untimed invocations before the first recorded trial.
    pub fn with_warmup(mut self, warmup: usize) -> Self {
        self.warmup = warmup;
        self
    }

    pub fn start_timing(&self) -> BenchTimer {
        BenchTimer {
            start_time: Instant::now(),
            bencher: self,
        }
    }

    /// Time a single call of `f` and return its output with the elapsed time.
    pub fn time<T>(&self, f: impl FnOnce() -> T) -> (T, Measurement) {
        let output = {
            let _timer = self.start_timing();
            f()
        };
        let elapsed = self.elapsed.take();
        assert!(elapsed.is_some(), "No benchmark timer detected");
        (output, Measurement::new(elapsed.unwrap_or_default()))
    }

    /// Invoke `candidate` exactly once.
    pub fn time_once(
        &self,
        candidate: &Candidate,
        dataset: &InputDataset,
    ) -> anyhow::Result<(u64, Measurement)> {
        let (result, measurement) = self.time(|| candidate.invoke(dataset));
        Ok((result?, measurement))
    }

    /// Invoke `candidate` `trials` times, one measurement per trial.
    /// Warm-up invocations are not part of the series.
    pub fn time_repeated(
        &self,
        candidate: &Candidate,
        dataset: &InputDataset,
        trials: usize,
    ) -> anyhow::Result<MeasurementSeries> {
        anyhow::ensure!(trials > 0, "`trials` must be at least 1");
        for _ in 0..self.warmup {
            candidate.invoke(dataset)?;
        }
        (0..trials)
            .map(|_| self.time_once(candidate, dataset).map(|(_, m)| m))
            .collect()
    }

    /// Run all trials for `candidate` and reduce them to the minimum.
    pub fn run(
        &self,
        candidate: &Candidate,
        dataset: &InputDataset,
        trials: usize,
    ) -> anyhow::Result<BenchmarkResult> {
        let series = self.time_repeated(candidate, dataset, trials)?;
        let Some(min) = series.min() else {
            anyhow::bail!("No measurements recorded for `{}`", candidate.name());
        };
        Ok(BenchmarkResult::new(candidate.name(), min).with_trials(series.len()))
    }

    /// Check that every candidate computes the same sum on `dataset`, and return it.
    pub fn verify_agreement(
        &self,
        candidates: &[Candidate],
        dataset: &InputDataset,
    ) -> anyhow::Result<u64> {
        let Some((first, rest)) = candidates.split_first() else {
            anyhow::bail!("No candidates to verify");
        };
        let expected = first.invoke(dataset)?;
        for candidate in rest {
            let actual = candidate.invoke(dataset)?;
            if actual != expected {
                anyhow::bail!(
                    "Candidates disagree: `{}` = {}, `{}` = {}",
                    first.name(),
                    expected,
                    candidate.name(),
                    actual
                );
            }
        }
        Ok(expected)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use rand::{rngs::SmallRng, SeedableRng};

    use super::*;
    use crate::{ValueRange, SUM_VIA_BUILTIN, SUM_VIA_LOOP};

    fn dataset(len: usize) -> InputDataset {
        let range = ValueRange::new(1, 100).unwrap();
        InputDataset::generate(len, range, &mut SmallRng::seed_from_u64(42))
    }

    fn always_fails(_: &[u32]) -> anyhow::Result<u64> {
        anyhow::bail!("candidate failed")
    }

    fn first_element(data: &[u32]) -> anyhow::Result<u64> {
        match data.first() {
            Some(v) => Ok(u64::from(*v)),
            None => anyhow::bail!("empty input"),
        }
    }

    #[test]
    fn series_length_matches_trials() -> anyhow::Result<()> {
        let dataset = dataset(100);
        let bencher = Bencher::new();
        for trials in [1, 2, 5, 17] {
            let series = bencher.time_repeated(&SUM_VIA_BUILTIN, &dataset, trials)?;
            assert_eq!(series.len(), trials);
        }
        Ok(())
    }

    #[test]
    fn warmup_is_not_recorded() -> anyhow::Result<()> {
        let dataset = dataset(100);
        let series = Bencher::new()
            .with_warmup(3)
            .time_repeated(&SUM_VIA_LOOP, &dataset, 2)?;
        assert_eq!(series.len(), 2);
        Ok(())
    }

    #[test]
    fn zero_trials_rejected() {
        let dataset = dataset(10);
        assert!(Bencher::new()
            .time_repeated(&SUM_VIA_LOOP, &dataset, 0)
            .is_err());
    }

    #[test]
    fn thousand_elements_five_trials() -> anyhow::Result<()> {
        let dataset = dataset(1000);
        let bencher = Bencher::new();
        let builtin = bencher.time_repeated(&SUM_VIA_BUILTIN, &dataset, 5)?;
        let looped = bencher.time_repeated(&SUM_VIA_LOOP, &dataset, 5)?;
        assert_eq!(builtin.len(), 5);
        assert_eq!(looped.len(), 5);
        assert!(builtin.samples().iter().all(|m| m.as_secs_f64() >= 0.0));
        assert!(builtin.min() <= builtin.mean());
        assert!(builtin.mean() <= builtin.max());
        Ok(())
    }

    #[test]
    fn candidate_errors_propagate() {
        let dataset = dataset(10);
        let failing = Candidate::new("failing", always_fails);
        let bencher = Bencher::new();
        assert!(bencher.time_once(&failing, &dataset).is_err());
        assert!(bencher.time_repeated(&failing, &dataset, 3).is_err());
        assert!(bencher.run(&failing, &dataset, 3).is_err());
    }

    #[test]
    fn empty_input_failure_surfaces() {
        let empty = InputDataset::from_values(vec![]);
        let head = Candidate::new("head", first_element);
        let err = Bencher::new().time_once(&head, &empty).unwrap_err();
        assert_eq!(err.to_string(), "empty input");
    }

    #[test]
    fn time_once_returns_result() -> anyhow::Result<()> {
        let dataset = InputDataset::from_values(vec![1, 2, 3, 4]);
        let (sum, measurement) = Bencher::new().time_once(&SUM_VIA_LOOP, &dataset)?;
        assert_eq!(sum, 10);
        assert!(measurement.elapsed() >= Duration::ZERO);
        Ok(())
    }

    #[test]
    fn run_reduces_to_minimum() -> anyhow::Result<()> {
        let dataset = dataset(1000);
        let result = Bencher::new().run(&SUM_VIA_BUILTIN, &dataset, 4)?;
        assert_eq!(result.name, "builtin");
        assert_eq!(result.trials, 4);
        assert!(result.peak_memory.is_none());
        Ok(())
    }

    #[test]
    fn series_statistics() {
        let series = [3, 1, 2]
            .into_iter()
            .map(|ms| Measurement::new(Duration::from_millis(ms)))
            .collect::<MeasurementSeries>();
        assert_eq!(series.min(), Some(Duration::from_millis(1)));
        assert_eq!(series.max(), Some(Duration::from_millis(3)));
        assert_eq!(series.mean(), Some(Duration::from_millis(2)));
        assert_eq!(MeasurementSeries::default().min(), None);
        assert_eq!(MeasurementSeries::default().mean(), None);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn mean_beyond_u32_sample_count() {
        let count = u32::MAX as usize + 1;
        let total = Duration::from_secs(1 << 33);
        assert_eq!(mean_of(total, count), Duration::from_secs(2));
        assert_eq!(mean_of(Duration::from_millis(9), 3), Duration::from_millis(3));
    }

    #[test]
    fn agreement_check() -> anyhow::Result<()> {
        let dataset = InputDataset::from_values(vec![5, 5, 5]);
        let bencher = Bencher::new();
        assert_eq!(
            bencher.verify_agreement(&[SUM_VIA_LOOP, SUM_VIA_BUILTIN], &dataset)?,
            15
        );
        let head = Candidate::new("head", first_element);
        assert!(bencher
            .verify_agreement(&[SUM_VIA_LOOP, head], &dataset)
            .is_err());
        assert!(bencher.verify_agreement(&[], &dataset).is_err());
        Ok(())
    }

    #[test]
    fn time_runs_closure_once() {
        let calls = Cell::new(0);
        let (out, _) = Bencher::new().time(|| {
            calls.set(calls.get() + 1);
            "done"
        });
        assert_eq!(out, "done");
        assert_eq!(calls.get(), 1);
    }
}
