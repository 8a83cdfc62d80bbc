use rand::Rng;

use crate::{EagerBuilder, ValueRange};

/// Fixed-length sequence of bounded positive integers, generated once per run.
///
/// The dataset is never mutated after construction. Every competing candidate
/// receives the same instance through a shared reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDataset {
    values: Vec<u32>,
}

impl InputDataset {
    pub fn generate<R: Rng>(len: usize, range: ValueRange, rng: &mut R) -> Self {
        Self {
            values: EagerBuilder::build(len, range, rng),
        }
    }

    pub fn from_values(values: Vec<u32>) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl AsRef<[u32]> for InputDataset {
    fn as_ref(&self) -> &[u32] {
        self.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::SmallRng, SeedableRng};

    use super::*;

    #[test]
    fn generated_values_respect_bounds() -> anyhow::Result<()> {
        let range = ValueRange::new(1, 100)?;
        let mut rng = SmallRng::seed_from_u64(1);
        let dataset = InputDataset::generate(10_000, range, &mut rng);
        assert_eq!(dataset.len(), 10_000);
        assert!(dataset.as_slice().iter().all(|v| range.contains(*v)));
        Ok(())
    }

    #[test]
    fn degenerate_range_yields_constant_values() -> anyhow::Result<()> {
        let range = ValueRange::new(7, 7)?;
        let dataset = InputDataset::generate(100, range, &mut SmallRng::seed_from_u64(0));
        assert!(dataset.as_slice().iter().all(|v| *v == 7));
        Ok(())
    }

    #[test]
    fn same_seed_same_dataset() -> anyhow::Result<()> {
        let range = ValueRange::new(1, 100)?;
        let a = InputDataset::generate(1000, range, &mut SmallRng::seed_from_u64(9));
        let b = InputDataset::generate(1000, range, &mut SmallRng::seed_from_u64(9));
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn empty_dataset() {
        let dataset = InputDataset::from_values(vec![]);
        assert!(dataset.is_empty());
        assert_eq!(dataset.as_ref().len(), 0);
    }
}
