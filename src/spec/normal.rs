use crate::array::SampleArray;
use crate::error::{Result, SpecError};
use crate::random::SeededSource;
use crate::render::artifact::{Literal, sample_dist_source};
use crate::spec::params::{ParamContext, ParamSampler, SamplingSpec};
use crate::spec::{FamilySpec, FieldAccessor, parse_payload, require_finite};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Gaussian draws `N(mean, stddev)`; unbounded, so only the default checks apply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalSpec {
    mean: f64,
    stddev: f64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNormal {
    #[serde(default, rename = "family")]
    _family: Option<String>,
    mean: f64,
    stddev: f64,
}

impl NormalSpec {
    pub fn new(mean: f64, stddev: f64) -> Result<Self> {
        let mean = require_finite("mean", mean)?;
        let stddev = require_finite("stddev", stddev)?;
        if stddev <= 0.0 {
            return Err(SpecError::validation(
                "stddev",
                format!("must be greater than 0, got {:?}", stddev),
            ));
        }
        Ok(Self { mean, stddev })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn stddev(&self) -> f64 {
        self.stddev
    }
}

impl FamilySpec for NormalSpec {
    const FAMILY: &'static str = "normal";
    const FIELDS: &'static [FieldAccessor<Self>] =
        &[("mean", Self::mean), ("stddev", Self::stddev)];

    type Sampling = NormalSamplingSpec;

    fn from_fields(payload: &Map<String, Value>) -> Result<Self> {
        let raw: RawNormal = parse_payload(Self::FAMILY, payload)?;
        Self::new(raw.mean, raw.stddev)
    }

    fn sample_dist(&self, rng: &mut SeededSource, count: usize) -> Result<SampleArray> {
        SampleArray::from_f64(rng.normal(self.mean, self.stddev, count))
            .ensure_finite("normal sampler")
    }

    fn render(&self) -> String {
        sample_dist_source(
            "normal",
            &[
                ("loc", Literal::Float(self.mean)),
                ("scale", Literal::Float(self.stddev)),
            ],
        )
    }

    fn edge_cases() -> Vec<Self> {
        [(0.0, 1e-12), (1e6, 1.0), (-3.5, 1e3)]
            .into_iter()
            .map(|(mean, stddev)| Self { mean, stddev })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalSamplingSpec {
    pub mean: ParamSampler,
    pub stddev: ParamSampler,
}

impl Default for NormalSamplingSpec {
    fn default() -> Self {
        Self {
            mean: ParamSampler::uniform("mean", -100.0, 100.0),
            stddev: ParamSampler::log_uniform("stddev", 1e-3, 1e3),
        }
    }
}

impl SamplingSpec for NormalSamplingSpec {
    type Spec = NormalSpec;

    fn sample_spec(&self, rng: &mut SeededSource) -> Result<NormalSpec> {
        let mean = self.mean.sample(rng, None)?;
        let context = ParamContext::from([("mean".to_string(), mean)]);
        let stddev = self.stddev.sample(rng, Some(&context))?;
        NormalSpec::new(mean, stddev)
    }
}
