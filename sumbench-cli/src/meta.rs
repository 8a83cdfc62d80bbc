use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use sumbench::BenchConfig;

use crate::utils::md::MarkdownPrinter;

#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub host: String,
    pub os: String,
    pub arch: String,
    pub cpu_model: String,
    /// Total memory in bytes
    pub memory_size: usize,
    pub rustc: String,
}

pub static SYSTEM_INFO: Lazy<SystemInfo> = Lazy::new(crate::utils::sys::get_current_system_info);

/// Metadata printed at the top of every report.
#[derive(Debug)]
pub struct RunInfo {
    pub start_time: DateTime<Local>,
    pub system: SystemInfo,
    pub config: BenchConfig,
}

impl RunInfo {
    pub fn new(config: &BenchConfig) -> Self {
        Self {
            start_time: Local::now(),
            system: SYSTEM_INFO.clone(),
            config: config.clone(),
        }
    }

    pub fn add_to(&self, printer: &mut MarkdownPrinter) {
        let config = &self.config;
        printer.add("# sumbench\n\n");
        printer.add(format!(
            "* Start Time: `{}`\n",
            self.start_time.format("%Y-%m-%d %H:%M:%S")
        ));
        printer.add(format!("* Host: `{}`\n", self.system.host));
        printer.add(format!(
            "* OS: `{}` (`{}`)\n",
            self.system.os, self.system.arch
        ));
        printer.add(format!("* CPU: `{}`\n", self.system.cpu_model));
        printer.add(format!("* Memory: `{} GB`\n", self.system.memory_size >> 30));
        printer.add(format!("* Rust: `{}`\n", self.system.rustc));
        printer.add(format!("* Elements: `{}`\n", config.element_count));
        printer.add(format!(
            "* Value Range: `[{}, {}]`\n",
            config.value_min, config.value_max
        ));
        printer.add(format!("* Trials: `{}`\n", config.trials));
        printer.add(format!("* Warmup: `{}`\n", config.warmup));
        match config.seed {
            Some(seed) => printer.add(format!("* Seed: `{}`\n", seed)),
            None => printer.add("* Seed: `entropy`\n"),
        }
    }
}
