//! Spec layer: validated, immutable parameter sets per family.
//!
//! This module owns:
//! - the `FamilySpec` trait every family implements
//! - the `FunctionSpec` tagged union used by the registry and the engine
//! - parameter samplers for randomized construction

pub mod bernoulli;
pub mod normal;
pub mod params;
pub mod uniform;

pub use bernoulli::{BernoulliSamplingSpec, BernoulliSpec};
pub use normal::{NormalSamplingSpec, NormalSpec};
pub use params::{
    LogUniformPositiveFloatParamSampler, ParamContext, ParamSampler, SamplingSpec,
    UniformFloatParamSampler,
};
pub use uniform::{UniformSamplingSpec, UniformSpec};

use crate::array::SampleArray;
use crate::checks::{OutputCheck, default_output_checks};
use crate::error::{Result, SpecError};
use crate::random::SeededSource;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Field name paired with its accessor; resolved by name at check time.
pub type FieldAccessor<S> = (&'static str, fn(&S) -> f64);

pub trait FamilySpec: Clone + std::fmt::Debug + Into<FunctionSpec> + 'static {
    /// Discriminator used by the registry and in payloads.
    const FAMILY: &'static str;

    const FIELDS: &'static [FieldAccessor<Self>];

    type Sampling: SamplingSpec<Spec = Self> + Default;

    /// Strict parse of a payload object; unknown fields are rejected.
    fn from_fields(payload: &Map<String, Value>) -> Result<Self>;

    /// Canonical sampler: `count` values through the family's declared draw.
    fn sample_dist(&self, rng: &mut SeededSource, count: usize) -> Result<SampleArray>;

    /// Self-contained `sample_dist` artifact with round-trip exact literals.
    fn render(&self) -> String;

    /// Checks added on top of the defaults.
    fn family_checks(&self) -> Vec<OutputCheck> {
        Vec::new()
    }

    /// Boundary instances for stress-testing the engine.
    fn edge_cases() -> Vec<Self>;

    fn field(&self, name: &str) -> Option<f64> {
        Self::FIELDS
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, get)| get(self))
    }

    fn output_checks(&self) -> Vec<OutputCheck> {
        let mut checks = default_output_checks();
        checks.extend(self.family_checks());
        checks
    }

    /// One randomized instance drawn with the family-default samplers.
    fn sample_spec(rng: &mut SeededSource) -> Result<Self> {
        Self::Sampling::default().sample_spec(rng)
    }

    fn sample_specs(rng: &mut SeededSource, count: usize) -> Result<Vec<Self>> {
        Self::Sampling::default().sample_specs(rng, count)
    }
}

/// Any family's spec. Serializes to the registry payload shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum FunctionSpec {
    Bernoulli(BernoulliSpec),
    Uniform(UniformSpec),
    Normal(NormalSpec),
}

macro_rules! each_family {
    ($spec:expr, $inner:ident => $body:expr) => {
        match $spec {
            FunctionSpec::Bernoulli($inner) => $body,
            FunctionSpec::Uniform($inner) => $body,
            FunctionSpec::Normal($inner) => $body,
        }
    };
}

impl FunctionSpec {
    pub fn family(&self) -> &'static str {
        match self {
            Self::Bernoulli(_) => BernoulliSpec::FAMILY,
            Self::Uniform(_) => UniformSpec::FAMILY,
            Self::Normal(_) => NormalSpec::FAMILY,
        }
    }

    pub fn field(&self, name: &str) -> Option<f64> {
        each_family!(self, s => s.field(name))
    }

    pub fn sample_dist(&self, rng: &mut SeededSource, count: usize) -> Result<SampleArray> {
        each_family!(self, s => s.sample_dist(rng, count))
    }

    pub fn render(&self) -> String {
        each_family!(self, s => s.render())
    }

    pub fn output_checks(&self) -> Vec<OutputCheck> {
        each_family!(self, s => s.output_checks())
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Edge cases of every built-in family.
    pub fn edge_cases() -> Vec<FunctionSpec> {
        let mut specs: Vec<FunctionSpec> = Vec::new();
        specs.extend(BernoulliSpec::edge_cases().into_iter().map(Into::into));
        specs.extend(UniformSpec::edge_cases().into_iter().map(Into::into));
        specs.extend(NormalSpec::edge_cases().into_iter().map(Into::into));
        specs
    }

    /// `per_family` randomized specs of every built-in family.
    pub fn sample_all_families(
        rng: &mut SeededSource,
        per_family: usize,
    ) -> Result<Vec<FunctionSpec>> {
        let mut specs: Vec<FunctionSpec> = Vec::new();
        specs.extend(BernoulliSpec::sample_specs(rng, per_family)?.into_iter().map(Into::into));
        specs.extend(UniformSpec::sample_specs(rng, per_family)?.into_iter().map(Into::into));
        specs.extend(NormalSpec::sample_specs(rng, per_family)?.into_iter().map(Into::into));
        Ok(specs)
    }
}

impl From<BernoulliSpec> for FunctionSpec {
    fn from(spec: BernoulliSpec) -> Self {
        Self::Bernoulli(spec)
    }
}

impl From<UniformSpec> for FunctionSpec {
    fn from(spec: UniformSpec) -> Self {
        Self::Uniform(spec)
    }
}

impl From<NormalSpec> for FunctionSpec {
    fn from(spec: NormalSpec) -> Self {
        Self::Normal(spec)
    }
}

/// Deserialize a family payload into its raw shape.
///
/// A `family` key, when present, must name `family`.
pub(crate) fn parse_payload<T: DeserializeOwned>(
    family: &str,
    payload: &Map<String, Value>,
) -> Result<T> {
    match payload.get("family") {
        None => {}
        Some(Value::String(found)) if found == family => {}
        Some(other) => {
            return Err(SpecError::validation(
                "family",
                format!("expected '{}', got {}", family, other),
            ));
        }
    }
    serde_json::from_value(Value::Object(payload.clone()))
        .map_err(|e| SpecError::validation(format!("{} payload", family), e.to_string()))
}

pub(crate) fn require_finite(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SpecError::validation(
            field,
            format!("must be finite, got {:?}", value),
        ))
    }
}
