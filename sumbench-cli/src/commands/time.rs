use clap::Parser;
use sumbench::{
    builtin_candidates, compare, BenchConfig, Bencher, BenchmarkResult, Comparison, InputDataset,
    Ratio,
};

use super::{fmt_secs, CommonArgs, Section};
use crate::utils::md::MarkdownPrinter;

/// Time the loop and builtin summation strategies
#[derive(Parser, Debug, Default)]
pub struct TimeArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

impl TimeArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        self.common.execute(&[Section::Time])
    }
}

/// Generate one dataset, time every candidate against it and print the report section.
pub fn measure(config: &BenchConfig) -> anyhow::Result<Vec<BenchmarkResult>> {
    let range = config.value_range()?;
    let dataset = InputDataset::generate(config.element_count, range, &mut config.rng());
    let candidates = builtin_candidates();
    let bencher = Bencher::new().with_warmup(config.warmup);
    log::info!(
        "Timing {} candidates over {} elements",
        candidates.len(),
        dataset.len()
    );

    let mut printer = MarkdownPrinter::new();
    printer.add(format!(
        "\n# 1. Timing ({} elements)\n\n",
        dataset.len()
    ));
    let sum = bencher.verify_agreement(&candidates, &dataset)?;
    printer.add(format!("All candidates agree: sum = `{}`\n", sum));

    printer.add("\n## 1.1 Single measurement\n\n");
    let mut rows = vec![];
    for candidate in &candidates {
        let (result, measurement) = bencher.time_once(candidate, &dataset)?;
        rows.push(vec![
            candidate.name().to_owned(),
            result.to_string(),
            fmt_secs(measurement.as_secs_f64()),
        ]);
    }
    printer.add_table(&["candidate", "result", "time (s)"], &rows);

    printer.add(format!(
        "\n## 1.2 Repeated measurement ({} trials, minimum)\n\n",
        config.trials
    ));
    let mut rows = vec![];
    let mut results = vec![];
    for candidate in &candidates {
        let series = bencher.time_repeated(candidate, &dataset, config.trials)?;
        let (Some(min), Some(mean), Some(max)) = (series.min(), series.mean(), series.max())
        else {
            anyhow::bail!("No measurements recorded for `{}`", candidate.name());
        };
        log::debug!("{}: {:?}", candidate.name(), series.samples());
        rows.push(vec![
            candidate.name().to_owned(),
            fmt_secs(min.as_secs_f64()),
            fmt_secs(mean.as_secs_f64()),
            fmt_secs(max.as_secs_f64()),
        ]);
        results.push(BenchmarkResult::new(candidate.name(), min).with_trials(series.len()));
    }
    printer.add_table(&["candidate", "min (s)", "mean (s)", "max (s)"], &rows);

    let comparison = compare(results);
    printer.add("\n## Conclusion\n\n");
    add_conclusion(&mut printer, &comparison);
    printer.dump();
    Ok(comparison.ranked)
}

fn add_conclusion(printer: &mut MarkdownPrinter, comparison: &Comparison) {
    for speedup in &comparison.speedups {
        match speedup.ratio {
            Ratio::Factor(_) => printer.add(format!(
                "* `{}` is approximately **{}** faster than `{}`.\n",
                speedup.faster, speedup.ratio, speedup.slower
            )),
            Ratio::Incomparable => printer.add(format!(
                "* `{}` vs `{}`: {} (zero-duration measurement).\n",
                speedup.faster, speedup.slower, speedup.ratio
            )),
        }
    }
    printer.add(
        "* Both strategies are O(N) in the number of elements. \
         The gap is a constant factor per element, not an asymptotic one.\n",
    );
}
