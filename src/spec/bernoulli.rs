use crate::array::SampleArray;
use crate::checks::{InSetCheck, OutputCheck};
use crate::error::{Result, SpecError};
use crate::random::SeededSource;
use crate::render::artifact::{Literal, sample_dist_source};
use crate::spec::params::{ParamSampler, SamplingSpec};
use crate::spec::{FamilySpec, FieldAccessor, parse_payload, require_finite};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Bernoulli trials with success probability `p ∈ [0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BernoulliSpec {
    p: f64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBernoulli {
    #[serde(default, rename = "family")]
    _family: Option<String>,
    p: f64,
}

impl BernoulliSpec {
    pub fn new(p: f64) -> Result<Self> {
        let p = require_finite("p", p)?;
        if !(0.0..=1.0).contains(&p) {
            return Err(SpecError::validation(
                "p",
                format!("must be within [0, 1], got {:?}", p),
            ));
        }
        Ok(Self { p })
    }

    pub fn p(&self) -> f64 {
        self.p
    }
}

impl FamilySpec for BernoulliSpec {
    const FAMILY: &'static str = "bernoulli";
    const FIELDS: &'static [FieldAccessor<Self>] = &[("p", Self::p)];

    type Sampling = BernoulliSamplingSpec;

    fn from_fields(payload: &Map<String, Value>) -> Result<Self> {
        let raw: RawBernoulli = parse_payload(Self::FAMILY, payload)?;
        Self::new(raw.p)
    }

    fn sample_dist(&self, rng: &mut SeededSource, count: usize) -> Result<SampleArray> {
        SampleArray::from_i64(rng.binomial(1, self.p, count)).ensure_finite("bernoulli sampler")
    }

    fn render(&self) -> String {
        sample_dist_source(
            "binomial",
            &[("n", Literal::Int(1)), ("p", Literal::Float(self.p))],
        )
    }

    fn family_checks(&self) -> Vec<OutputCheck> {
        vec![OutputCheck::InSet(InSetCheck::zero_one())]
    }

    fn edge_cases() -> Vec<Self> {
        [0.0, 0.5, 1.0].into_iter().map(|p| Self { p }).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BernoulliSamplingSpec {
    pub p: ParamSampler,
}

impl Default for BernoulliSamplingSpec {
    fn default() -> Self {
        Self {
            p: ParamSampler::uniform("p", 0.0, 1.0),
        }
    }
}

impl SamplingSpec for BernoulliSamplingSpec {
    type Spec = BernoulliSpec;

    fn sample_spec(&self, rng: &mut SeededSource) -> Result<BernoulliSpec> {
        let p = self.p.sample(rng, None)?;
        BernoulliSpec::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn rejects_out_of_domain_probabilities() {
        for p in [-0.1, 1.0000001, f64::NAN, f64::INFINITY] {
            let err = BernoulliSpec::new(p).unwrap_err();
            assert!(matches!(err, SpecError::Validation { ref field, .. } if field == "p"));
        }
        assert!(BernoulliSpec::new(0.0).is_ok());
        assert!(BernoulliSpec::new(1.0).is_ok());
    }

    #[test]
    fn canonical_sample_is_zero_one_ints() {
        let spec = BernoulliSpec::new(0.3).unwrap();
        let out = spec.sample_dist(&mut SeededSource::new(1023), 64).unwrap();
        assert_eq!(out.shape(), &[64]);
        let values = out.numeric_values().unwrap();
        assert!(values.iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn render_embeds_exact_literal() {
        let spec = BernoulliSpec::new(0.1 + 0.2).unwrap();
        assert!(spec.render().contains("p = 0.30000000000000004"));
    }

    #[test]
    fn strict_payload_rejects_extra_fields() {
        let payload = json!({"family": "bernoulli", "p": 0.5, "q": 1.0});
        let err = BernoulliSpec::from_fields(payload.as_object().unwrap()).unwrap_err();
        assert!(err.to_string().contains("unknown field `q`"));
    }

    #[test]
    fn strict_payload_rejects_non_numeric() {
        let payload = json!({"family": "bernoulli", "p": "0.5"});
        assert!(BernoulliSpec::from_fields(payload.as_object().unwrap()).is_err());
    }

    #[test]
    fn default_checks_add_zero_one_set() {
        let checks = BernoulliSpec::new(0.5).unwrap().output_checks();
        let names: Vec<&str> = checks.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec!["one_dimensional", "length", "numeric_dtype", "finite_values", "in_set"]
        );
    }

    #[test]
    fn sampled_specs_are_valid() {
        let mut rng = SeededSource::new(3);
        let specs = BernoulliSpec::sample_specs(&mut rng, 50).unwrap();
        assert_eq!(specs.len(), 50);
        assert!(specs.iter().all(|s| (0.0..=1.0).contains(&s.p())));
        assert!(BernoulliSpec::sample_specs(&mut rng, 0).is_err());
    }
}
