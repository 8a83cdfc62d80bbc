use std::io::Write;
use std::{fs::OpenOptions, path::Path};

use crate::BenchmarkResult;

const CSV_HEADER: &str = "section,candidate,trials,min_secs,peak_bytes";

/// One result row, tagged with the report section it came from.
pub struct Record<'a> {
    pub section: &'a str,
    pub result: &'a BenchmarkResult,
}

impl<'a> Record<'a> {
    fn to_csv_row(&self) -> String {
        let peak = self
            .result
            .peak_memory
            .map(|m| m.peak_bytes.to_string())
            .unwrap_or_default();
        format!(
            "{},{},{},{:.9},{}",
            self.section,
            self.result.name,
            self.result.trials,
            self.result.duration.as_secs_f64(),
            peak
        )
    }
}

/// Append `records` to `csv`, writing the header first if the file is new.
pub fn append_csv(csv: &Path, records: &[Record]) -> anyhow::Result<()> {
    if !csv.exists() {
        std::fs::write(csv, format!("{CSV_HEADER}\n"))?;
    }
    let mut file = OpenOptions::new().append(true).open(csv)?;
    for record in records {
        writeln!(file, "{}", record.to_csv_row())?;
    }
    Ok(())
}
