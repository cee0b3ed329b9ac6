use crate::error::{Result, SpecError};
use serde::Serialize;

/// One reproducibility trial: both samplers run with `seed` for `count` values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquivalenceCase {
    name: String,
    seed: u64,
    count: usize,
}

impl EquivalenceCase {
    pub fn new(name: impl Into<String>, seed: u64, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(SpecError::validation("count", "must be greater than 0"));
        }
        Ok(Self {
            name: name.into(),
            seed,
            count,
        })
    }

    /// Case named `seed_<seed>_count_<count>`.
    pub fn named_by_params(seed: u64, count: usize) -> Result<Self> {
        Self::new(format!("seed_{}_count_{}", seed, count), seed, count)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// Small and larger counts over varied seeds.
pub fn default_equivalence_cases() -> Vec<EquivalenceCase> {
    [(0, 1), (1, 5), (1023, 32), (20240607, 1000)]
        .into_iter()
        .map(|(seed, count)| EquivalenceCase {
            name: format!("seed_{}_count_{}", seed, count),
            seed,
            count,
        })
        .collect()
}
