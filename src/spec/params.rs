//! Parameter samplers for randomized spec construction.
//!
//! A sampler draws one finite, in-domain value per call. Samplers accept an
//! optional context of already drawn sibling parameters; the current samplers
//! ignore it, but family sampling specs always pass it so dependent samplers
//! can be introduced without changing call sites.

use crate::error::{Result, SpecError};
use crate::random::SeededSource;
use serde::Serialize;
use std::collections::BTreeMap;

/// Already drawn sibling parameters, keyed by field name.
pub type ParamContext = BTreeMap<String, f64>;

/// Samples a finite float uniformly from `[min_value, max_value]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniformFloatParamSampler {
    pub(super) name: String,
    pub(super) min_value: f64,
    pub(super) max_value: f64,
}

impl UniformFloatParamSampler {
    pub fn new(name: impl Into<String>, min_value: f64, max_value: f64) -> Result<Self> {
        let name = name.into();
        check_bounds(&name, min_value, max_value)?;
        Ok(Self {
            name,
            min_value,
            max_value,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sample(&self, rng: &mut SeededSource, _context: Option<&ParamContext>) -> Result<f64> {
        let value = rng.uniform_scalar(self.min_value, self.max_value);
        if !value.is_finite() {
            return Err(SpecError::Sampling(format!(
                "sampler '{}' produced a non-finite value",
                self.name
            )));
        }
        Ok(value)
    }
}

/// Samples a finite positive float log-uniformly from `[min_value, max_value]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogUniformPositiveFloatParamSampler {
    pub(super) name: String,
    pub(super) min_value: f64,
    pub(super) max_value: f64,
}

impl LogUniformPositiveFloatParamSampler {
    pub fn new(name: impl Into<String>, min_value: f64, max_value: f64) -> Result<Self> {
        let name = name.into();
        check_bounds(&name, min_value, max_value)?;
        if min_value <= 0.0 {
            return Err(SpecError::validation(
                format!("{}.min_value", name),
                format!("must be greater than 0, got {:?}", min_value),
            ));
        }
        Ok(Self {
            name,
            min_value,
            max_value,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sample(&self, rng: &mut SeededSource, _context: Option<&ParamContext>) -> Result<f64> {
        let log_min = self.min_value.ln();
        let log_max = self.max_value.ln();
        if !log_min.is_finite() || !log_max.is_finite() {
            return Err(SpecError::Sampling(format!(
                "sampler '{}' has invalid log-space bounds",
                self.name
            )));
        }

        let value = rng.uniform_scalar(log_min, log_max).exp();
        if !value.is_finite() {
            return Err(SpecError::Sampling(format!(
                "sampler '{}' produced a non-finite value",
                self.name
            )));
        }
        if value <= 0.0 {
            return Err(SpecError::Sampling(format!(
                "sampler '{}' produced a non-positive value",
                self.name
            )));
        }
        Ok(value)
    }
}

fn check_bounds(name: &str, min_value: f64, max_value: f64) -> Result<()> {
    for (side, v) in [("min_value", min_value), ("max_value", max_value)] {
        if !v.is_finite() {
            return Err(SpecError::validation(
                format!("{}.{}", name, side),
                format!("must be finite, got {:?}", v),
            ));
        }
    }
    if min_value >= max_value {
        return Err(SpecError::validation(
            format!("{}.min_value", name),
            "min_value must be less than max_value",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParamSampler {
    Uniform(UniformFloatParamSampler),
    LogUniformPositive(LogUniformPositiveFloatParamSampler),
}

impl ParamSampler {
    pub fn name(&self) -> &str {
        match self {
            Self::Uniform(s) => s.name(),
            Self::LogUniformPositive(s) => s.name(),
        }
    }

    pub fn sample(&self, rng: &mut SeededSource, context: Option<&ParamContext>) -> Result<f64> {
        match self {
            Self::Uniform(s) => s.sample(rng, context),
            Self::LogUniformPositive(s) => s.sample(rng, context),
        }
    }

    // Literal builders for family defaults; bounds are known valid.
    pub(super) fn uniform(name: &str, min_value: f64, max_value: f64) -> Self {
        Self::Uniform(UniformFloatParamSampler {
            name: name.to_string(),
            min_value,
            max_value,
        })
    }

    pub(super) fn log_uniform(name: &str, min_value: f64, max_value: f64) -> Self {
        Self::LogUniformPositive(LogUniformPositiveFloatParamSampler {
            name: name.to_string(),
            min_value,
            max_value,
        })
    }
}

impl From<UniformFloatParamSampler> for ParamSampler {
    fn from(s: UniformFloatParamSampler) -> Self {
        Self::Uniform(s)
    }
}

impl From<LogUniformPositiveFloatParamSampler> for ParamSampler {
    fn from(s: LogUniformPositiveFloatParamSampler) -> Self {
        Self::LogUniformPositive(s)
    }
}

/// Bundle of parameter samplers that synthesizes one spec of a family.
pub trait SamplingSpec {
    type Spec;

    fn sample_spec(&self, rng: &mut SeededSource) -> Result<Self::Spec>;

    fn sample_specs(&self, rng: &mut SeededSource, count: usize) -> Result<Vec<Self::Spec>> {
        if count == 0 {
            return Err(SpecError::validation("count", "must be greater than 0"));
        }
        (0..count).map(|_| self.sample_spec(rng)).collect()
    }
}
