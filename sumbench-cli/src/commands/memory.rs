use clap::Parser;
use colored::Colorize;
use sumbench::{
    count_eager, count_lazy, probe::ProbeManager, BenchConfig, Bencher, BenchmarkResult,
};

use super::{fmt_secs, CommonArgs, Section};
use crate::utils::md::MarkdownPrinter;

/// Compare peak memory of eager collection vs. lazy sequence construction
#[derive(Parser, Debug, Default)]
pub struct MemoryArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

impl MemoryArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        self.common.execute(&[Section::Memory])
    }
}

/// Build `n` values eagerly, then lazily, sampling peak heap usage around each.
/// Timing and element-count checks run even when no memory sampler is available.
pub fn measure(config: &BenchConfig) -> anyhow::Result<Vec<BenchmarkResult>> {
    let mut probes = ProbeManager::detect();
    measure_with(config, &mut probes)
}

fn measure_with(
    config: &BenchConfig,
    probes: &mut ProbeManager,
) -> anyhow::Result<Vec<BenchmarkResult>> {
    let n = config.element_count;
    let range = config.value_range()?;
    let bencher = Bencher::new();

    let mut printer = MarkdownPrinter::new();
    printer.add(format!("\n# 2. Memory ({} elements)\n\n", n));
    if probes.available() {
        printer.add(format!("* Probe: `{}`\n", probes.probe_name()));
    } else {
        printer.add("* Probe: `none` (peak memory not reported)\n");
    }

    printer.add("\n## 2.1 Eager collection (O(N) memory)\n\n");
    let mut rng = config.rng();
    let ((eager_count, eager_time), eager_usage) =
        probes.sample(|| bencher.time(|| count_eager(n, range, &mut rng)));
    check_count("eager collection", eager_count, n)?;
    let eager = BenchmarkResult::new("eager", eager_time.elapsed()).with_memory(eager_usage);
    add_result(&mut printer, &eager, eager_count);

    printer.add("\n## 2.2 Lazy sequence (O(1) memory)\n\n");
    let rng = config.rng();
    let ((lazy_count, lazy_time), lazy_usage) =
        probes.sample(|| bencher.time(|| count_lazy(n, range, rng)));
    check_count("lazy sequence", lazy_count, n)?;
    let lazy = BenchmarkResult::new("lazy", lazy_time.elapsed()).with_memory(lazy_usage);
    add_result(&mut printer, &lazy, lazy_count);

    printer.add("\n## Conclusion\n\n");
    add_conclusion(&mut printer, &eager, &lazy);
    printer.dump();
    if !probes.available() {
        eprintln!(
            "{} {}",
            "•".bright_red(),
            "Memory sampler unavailable, only timings and element counts were reported.".red()
        );
    }
    Ok(vec![eager, lazy])
}

fn check_count(label: &str, produced: usize, expected: usize) -> anyhow::Result<()> {
    if produced != expected {
        anyhow::bail!(
            "The {} produced {} elements, expected {}",
            label,
            produced,
            expected
        );
    }
    Ok(())
}

fn add_result(printer: &mut MarkdownPrinter, result: &BenchmarkResult, count: usize) {
    printer.add(format!("* Elements produced: `{}`\n", count));
    printer.add(format!(
        "* Time: `{} s`\n",
        fmt_secs(result.duration.as_secs_f64())
    ));
    match result.peak_memory {
        Some(usage) => printer.add(format!("* Peak heap: `{}`\n", usage)),
        None => printer.add("* Peak heap: `n/a`\n"),
    }
}

fn add_conclusion(printer: &mut MarkdownPrinter, eager: &BenchmarkResult, lazy: &BenchmarkResult) {
    if let (Some(e), Some(l)) = (eager.peak_memory, lazy.peak_memory) {
        printer.add(format!(
            "* Eager peak exceeds lazy peak by `{}` bytes.\n",
            e.peak_bytes.saturating_sub(l.peak_bytes)
        ));
    }
    printer.add(
        "* The lazy sequence keeps memory constant, O(1), while the eager collection grows linearly, O(N).\n",
    );
}

#[cfg(test)]
mod tests {
    use sumbench::probe::{MemoryProbe, MemoryUsage, NoopProbe};

    use super::*;

    struct ScriptedProbe {
        peaks: Vec<u64>,
    }

    impl MemoryProbe for ScriptedProbe {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn end(&mut self) -> Option<MemoryUsage> {
            Some(MemoryUsage {
                peak_bytes: self.peaks.remove(0),
            })
        }
    }

    fn config(n: usize) -> BenchConfig {
        BenchConfig {
            element_count: n,
            seed: Some(3),
            ..Default::default()
        }
    }

    #[test]
    fn degrades_without_sampler() -> anyhow::Result<()> {
        let mut probes = ProbeManager::new(Box::new(NoopProbe));
        let results = measure_with(&config(1000), &mut probes)?;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.peak_memory.is_none()));
        Ok(())
    }

    #[test]
    fn attaches_probe_figures() -> anyhow::Result<()> {
        let mut probes = ProbeManager::new(Box::new(ScriptedProbe {
            peaks: vec![4000, 0],
        }));
        let results = measure_with(&config(1000), &mut probes)?;
        assert_eq!(results[0].name, "eager");
        assert_eq!(results[0].peak_memory.map(|u| u.peak_bytes), Some(4000));
        assert_eq!(results[1].name, "lazy");
        assert_eq!(results[1].peak_memory.map(|u| u.peak_bytes), Some(0));
        Ok(())
    }

    #[test]
    fn zero_elements() -> anyhow::Result<()> {
        let mut probes = ProbeManager::new(Box::new(NoopProbe));
        let results = measure_with(&config(0), &mut probes)?;
        assert_eq!(results.len(), 2);
        Ok(())
    }

    #[test]
    fn count_mismatch_is_an_error() {
        assert!(check_count("lazy sequence", 9, 10).is_err());
        assert!(check_count("lazy sequence", 10, 10).is_ok());
    }
}
