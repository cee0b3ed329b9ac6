use crate::array::SampleArray;
use crate::checks::{InRangeCheck, OutputCheck};
use crate::error::{Result, SpecError};
use crate::random::SeededSource;
use crate::render::artifact::{Literal, sample_dist_source};
use crate::spec::params::{ParamContext, ParamSampler, SamplingSpec};
use crate::spec::{FamilySpec, FieldAccessor, parse_payload, require_finite};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Continuous uniform draws over the half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UniformSpec {
    start: f64,
    end: f64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawUniform {
    #[serde(default, rename = "family")]
    _family: Option<String>,
    start: f64,
    end: f64,
}

impl UniformSpec {
    pub fn new(start: f64, end: f64) -> Result<Self> {
        let start = require_finite("start", start)?;
        let end = require_finite("end", end)?;
        if start >= end {
            return Err(SpecError::validation(
                "end",
                format!(
                    "start must be less than end, got start={:?} end={:?}",
                    start, end
                ),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }
}

impl FamilySpec for UniformSpec {
    const FAMILY: &'static str = "uniform";
    const FIELDS: &'static [FieldAccessor<Self>] = &[("start", Self::start), ("end", Self::end)];

    type Sampling = UniformSamplingSpec;

    fn from_fields(payload: &Map<String, Value>) -> Result<Self> {
        let raw: RawUniform = parse_payload(Self::FAMILY, payload)?;
        Self::new(raw.start, raw.end)
    }

    fn sample_dist(&self, rng: &mut SeededSource, count: usize) -> Result<SampleArray> {
        SampleArray::from_f64(rng.uniform(self.start, self.end, count))
            .ensure_finite("uniform sampler")
    }

    fn render(&self) -> String {
        sample_dist_source(
            "uniform",
            &[
                ("low", Literal::Float(self.start)),
                ("high", Literal::Float(self.end)),
            ],
        )
    }

    // Half-open upper bound, matching the draw.
    fn family_checks(&self) -> Vec<OutputCheck> {
        vec![OutputCheck::InRange(InRangeCheck::between_fields(
            "start", "end", true, false,
        ))]
    }

    fn edge_cases() -> Vec<Self> {
        [(0.0, 1.0), (-5.0, -4.0), (1.0, 1.0 + 1e-12), (-1e6, 1e6)]
            .into_iter()
            .map(|(start, end)| Self { start, end })
            .collect()
    }
}

/// `end` is derived as `start + width`, so `start < end` holds by construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniformSamplingSpec {
    pub start: ParamSampler,
    pub width: ParamSampler,
}

impl Default for UniformSamplingSpec {
    fn default() -> Self {
        Self {
            start: ParamSampler::uniform("start", -100.0, 100.0),
            width: ParamSampler::log_uniform("width", 1e-3, 1e3),
        }
    }
}

impl SamplingSpec for UniformSamplingSpec {
    type Spec = UniformSpec;

    fn sample_spec(&self, rng: &mut SeededSource) -> Result<UniformSpec> {
        let start = self.start.sample(rng, None)?;
        let context = ParamContext::from([("start".to_string(), start)]);
        let width = self.width.sample(rng, Some(&context))?;
        let end = start + width;
        if !end.is_finite() {
            return Err(SpecError::Sampling(format!(
                "uniform end is non-finite (start={:?}, width={:?})",
                start, width
            )));
        }
        UniformSpec::new(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::params::UniformFloatParamSampler;
    use pretty_assertions::assert_eq;

    #[test]
    fn equal_bounds_fail_validation() {
        let err = UniformSpec::new(10.0, 10.0).unwrap_err();
        assert_eq!(
            err,
            SpecError::validation("end", "start must be less than end, got start=10.0 end=10.0")
        );
        assert!(UniformSpec::new(2.0, 1.0).is_err());
        assert!(UniformSpec::new(f64::NEG_INFINITY, 1.0).is_err());
    }

    #[test]
    fn canonical_sample_is_half_open() {
        let spec = UniformSpec::new(0.0, 50.0).unwrap();
        let out = spec.sample_dist(&mut SeededSource::new(1023), 500).unwrap();
        for v in out.numeric_values().unwrap() {
            assert!((0.0..50.0).contains(&v));
        }
    }

    #[test]
    fn render_uses_low_high() {
        let spec = UniformSpec::new(-1.5, 2.0).unwrap();
        assert_eq!(
            spec.render(),
            "fn sample_dist(rng, count) {\n    rng.uniform(low = -1.5, high = 2.0, size = count)\n}\n"
        );
    }

    #[test]
    fn edge_cases_are_valid_specs() {
        for spec in UniformSpec::edge_cases() {
            assert!(UniformSpec::new(spec.start(), spec.end()).is_ok(), "{spec:?}");
        }
    }

    #[test]
    fn sampled_specs_keep_start_below_end() {
        let mut rng = SeededSource::new(99);
        for spec in UniformSpec::sample_specs(&mut rng, 100).unwrap() {
            assert!(spec.start() < spec.end());
        }
    }

    #[test]
    fn overflowing_end_is_a_sampling_error() {
        let sampling = UniformSamplingSpec {
            start: UniformFloatParamSampler::new("start", 1.7e308, 1.79e308)
                .unwrap()
                .into(),
            width: UniformFloatParamSampler::new("width", 1e307, 1e308)
                .unwrap()
                .into(),
        };
        let err = sampling.sample_spec(&mut SeededSource::new(4)).unwrap_err();
        assert_eq!(err.kind(), "sampling");
    }
}
