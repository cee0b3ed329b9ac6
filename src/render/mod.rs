//! Rendered `sample_dist` artifacts and the candidate samplers decoded from them.

pub mod artifact;
pub mod decode;

pub use artifact::{Literal, sample_dist_source};
pub use decode::{Draw, RenderedSampler};

use crate::error::Result;
use crate::spec::FunctionSpec;

/// Render `spec` and decode the text into an independent sampler.
pub fn render_to_callable(spec: &FunctionSpec) -> Result<RenderedSampler> {
    RenderedSampler::decode(&spec.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{BernoulliSpec, NormalSpec, UniformSpec};
    use pretty_assertions::assert_eq;

    #[test]
    fn every_family_round_trips_through_text() {
        let cases: Vec<(FunctionSpec, Draw)> = vec![
            (
                BernoulliSpec::new(0.3).unwrap().into(),
                Draw::Binomial { n: 1, p: 0.3 },
            ),
            (
                UniformSpec::new(-1e-7, 3.25).unwrap().into(),
                Draw::Uniform { low: -1e-7, high: 3.25 },
            ),
            (
                NormalSpec::new(1.0 / 3.0, 2e-9).unwrap().into(),
                Draw::Normal { loc: 1.0 / 3.0, scale: 2e-9 },
            ),
        ];
        for (spec, expected) in cases {
            assert_eq!(render_to_callable(&spec).unwrap().draw(), expected);
        }
    }
}
