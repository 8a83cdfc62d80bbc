use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use sumbench::{
    record::{self, Record},
    BenchConfig, BenchmarkResult,
};

use crate::{meta::RunInfo, utils::md::MarkdownPrinter};

pub mod memory;
pub mod run;
pub mod time;

/// Options shared by all commands. Flags override values from `--config`.
#[derive(Args, Debug, Default, Clone)]
pub struct CommonArgs {
    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Number of generated elements
    #[arg(short = 'n', long)]
    pub elements: Option<usize>,
    /// Inclusive lower bound of generated values
    #[arg(long)]
    pub min: Option<u32>,
    /// Inclusive upper bound of generated values
    #[arg(long)]
    pub max: Option<u32>,
    /// Number of timed trials per candidate
    #[arg(short = 't', long)]
    pub trials: Option<usize>,
    /// Untimed invocations before the first trial
    #[arg(long)]
    pub warmup: Option<usize>,
    /// RNG seed for a reproducible dataset
    #[arg(long)]
    pub seed: Option<u64>,
    /// Append results to this csv file
    #[arg(long)]
    pub output_csv: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Time,
    Memory,
}

impl Section {
    fn label(&self) -> &'static str {
        match self {
            Section::Time => "time",
            Section::Memory => "memory",
        }
    }
}

impl CommonArgs {
    pub fn load_config(&self) -> anyhow::Result<BenchConfig> {
        let mut config = match &self.config {
            Some(path) => BenchConfig::load(path)?,
            None => BenchConfig::default(),
        };
        if let Some(n) = self.elements {
            config.element_count = n;
        }
        if let Some(min) = self.min {
            config.value_min = min;
        }
        if let Some(max) = self.max {
            config.value_max = max;
        }
        if let Some(trials) = self.trials {
            config.trials = trials;
        }
        if let Some(warmup) = self.warmup {
            config.warmup = warmup;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }

    /// Print the run header, then measure and report each section in order.
    pub fn execute(&self, sections: &[Section]) -> anyhow::Result<()> {
        let config = self.load_config()?;
        let mut header = MarkdownPrinter::new();
        RunInfo::new(&config).add_to(&mut header);
        header.dump();
        let mut results: Vec<(Section, BenchmarkResult)> = vec![];
        for section in sections {
            let section_results = match section {
                Section::Time => time::measure(&config)?,
                Section::Memory => memory::measure(&config)?,
            };
            results.extend(section_results.into_iter().map(|r| (*section, r)));
        }
        if let Some(csv) = &self.output_csv {
            let records = results
                .iter()
                .map(|(section, result)| Record {
                    section: section.label(),
                    result,
                })
                .collect::<Vec<_>>();
            record::append_csv(csv, &records)?;
            print_md!("Raw results appended to `{}`\n", csv.display());
        }
        println!("{}", "✔ Benchmarking Finished.".green());
        Ok(())
    }
}

pub(crate) fn fmt_secs(secs: f64) -> String {
    format!("{:.6}", secs)
}
