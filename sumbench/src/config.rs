use std::path::Path;

use rand::{distributions::Uniform, rngs::SmallRng, SeedableRng};
use serde::{Deserialize, Serialize};

fn default_element_count() -> usize {
    1_000_000
}

fn default_value_min() -> u32 {
    1
}

fn default_value_max() -> u32 {
    100
}

fn default_trials() -> usize {
    5
}

/// Benchmark parameters. Every field may be omitted from the TOML file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Size of the generated dataset
    #[serde(default = "default_element_count")]
    pub element_count: usize,
    /// Inclusive lower bound of generated values
    #[serde(default = "default_value_min")]
    pub value_min: u32,
    /// Inclusive upper bound of generated values
    #[serde(default = "default_value_max")]
    pub value_max: u32,
    /// Number of timed trials per candidate
    #[serde(default = "default_trials")]
    pub trials: usize,
    /// Untimed invocations before the first trial
    #[serde(default)]
    pub warmup: usize,
    /// Fixed RNG seed. A fresh entropy seed is used when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            element_count: default_element_count(),
            value_min: default_value_min(),
            value_max: default_value_max(),
            trials: default_trials(),
            warmup: 0,
            seed: None,
        }
    }
}

impl BenchConfig {
    /// Parse a TOML file. The result is not validated, so callers can apply
    /// overrides first and call [`BenchConfig::validate`] on the final values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        let s = std::fs::read_to_string(path)?;
        Ok(toml::from_str::<BenchConfig>(&s)?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.trials == 0 {
            anyhow::bail!("`trials` must be at least 1");
        }
        ValueRange::new(self.value_min, self.value_max)?;
        Ok(())
    }

    pub fn value_range(&self) -> anyhow::Result<ValueRange> {
        ValueRange::new(self.value_min, self.value_max)
    }

    /// A new generator for this run. Seeded runs are reproducible.
    pub fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        }
    }
}

/// Non-empty inclusive range of positive values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRange {
    min: u32,
    max: u32,
}

impl ValueRange {
    pub fn new(min: u32, max: u32) -> anyhow::Result<Self> {
        if min == 0 {
            anyhow::bail!("`value_min` must be positive, got 0");
        }
        if min > max {
            anyhow::bail!("Empty value range: {} > {}", min, max);
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub(crate) fn distribution(&self) -> Uniform<u32> {
        Uniform::new_inclusive(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    #[test]
    fn defaults_match_reference_setup() {
        let config = BenchConfig::default();
        assert_eq!(config.element_count, 1_000_000);
        assert_eq!((config.value_min, config.value_max), (1, 100));
        assert_eq!(config.trials, 5);
        assert_eq!(config.warmup, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() -> anyhow::Result<()> {
        let dir = TempDir::new("sumbench")?;
        let path = dir.path().join("bench.toml");
        std::fs::write(&path, "element_count = 1000\ntrials = 3\nseed = 7\n")?;
        let config = BenchConfig::load(&path)?;
        assert_eq!(config.element_count, 1000);
        assert_eq!(config.trials, 3);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.value_max, 100);
        Ok(())
    }

    #[test]
    fn rejects_invalid_settings() {
        let zero_trials = BenchConfig {
            trials: 0,
            ..Default::default()
        };
        assert!(zero_trials.validate().is_err());
        let inverted = BenchConfig {
            value_min: 10,
            value_max: 5,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());
        let non_positive = BenchConfig {
            value_min: 0,
            ..Default::default()
        };
        assert!(non_positive.validate().is_err());
    }

    #[test]
    fn load_defers_validation() -> anyhow::Result<()> {
        let dir = TempDir::new("sumbench")?;
        let path = dir.path().join("bench.toml");
        std::fs::write(&path, "trials = 0\n")?;
        let mut config = BenchConfig::load(&path)?;
        assert_eq!(config.trials, 0);
        assert!(config.validate().is_err());
        config.trials = 3;
        assert!(config.validate().is_ok());
        Ok(())
    }

    #[test]
    fn malformed_toml_is_an_error() -> anyhow::Result<()> {
        let dir = TempDir::new("sumbench")?;
        let path = dir.path().join("bench.toml");
        std::fs::write(&path, "trials = \"many\"\n")?;
        assert!(BenchConfig::load(&path).is_err());
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(BenchConfig::load(Path::new("/nonexistent/sumbench.toml")).is_err());
    }

    #[test]
    fn seeded_generators_repeat() {
        use rand::Rng;
        let config = BenchConfig {
            seed: Some(3),
            ..Default::default()
        };
        let (mut a, mut b) = (config.rng(), config.rng());
        let a = (0..8).map(|_| a.gen::<u32>()).collect::<Vec<_>>();
        let b = (0..8).map(|_| b.gen::<u32>()).collect::<Vec<_>>();
        assert_eq!(a, b);
    }
}
