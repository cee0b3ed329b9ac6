use crate::array::SampleArray;
use crate::error::{Result, SpecError};
use crate::random::SeededSource;
use regex::Regex;
use std::collections::BTreeMap;

/// A draw call recovered from artifact text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Draw {
    Binomial { n: u64, p: f64 },
    Uniform { low: f64, high: f64 },
    Normal { loc: f64, scale: f64 },
}

/// Candidate sampler reconstructed from a rendered artifact.
///
/// It sees only the artifact text: the parameters come from the decoded
/// literals, never from the spec that rendered them.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSampler {
    draw: Draw,
}

impl RenderedSampler {
    /// Decode an artifact defining `fn sample_dist(<rng>, <count>)`.
    ///
    /// Expected layout (blank lines ignored):
    ///   fn sample_dist(rng, count) {
    ///       rng.<draw>(<name> = <literal>, ..., size = count)
    ///   }
    pub fn decode(source: &str) -> Result<Self> {
        const SIGNATURE_RE: &str =
            r#"^\s*fn\s+sample_dist\s*\(\s*([A-Za-z_]\w*)\s*,\s*([A-Za-z_]\w*)\s*\)\s*\{\s*$"#;
        const CALL_RE: &str = r#"^\s*([A-Za-z_]\w*)\s*\.\s*([A-Za-z_]\w*)\s*\((.*)\)\s*;?\s*$"#;
        const ARG_RE: &str = r#"^\s*([A-Za-z_]\w*)\s*=\s*(\S+)\s*$"#;

        let signature = Regex::new(SIGNATURE_RE).map_err(regex_error)?;
        let call = Regex::new(CALL_RE).map_err(regex_error)?;
        let arg = Regex::new(ARG_RE).map_err(regex_error)?;

        let lines: Vec<&str> = source
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.trim().is_empty())
            .collect();

        let Some(sig) = lines.first().and_then(|l| signature.captures(l)) else {
            return Err(SpecError::RenderContract(
                "artifact does not define `fn sample_dist(rng, count)`".to_string(),
            ));
        };
        let rng_param = &sig[1];
        let count_param = &sig[2];
        if rng_param == count_param {
            return Err(SpecError::RenderContract(format!(
                "sample_dist parameters must be distinct, got '{}' twice",
                rng_param
            )));
        }

        if lines.len() != 3 || lines[2].trim() != "}" {
            return Err(SpecError::RenderContract(
                "sample_dist body must be a single draw call".to_string(),
            ));
        }

        let caps = call.captures(lines[1]).ok_or_else(|| {
            SpecError::RenderContract(format!("cannot parse draw call: {:?}", lines[1].trim()))
        })?;
        if &caps[1] != rng_param {
            return Err(SpecError::RenderContract(format!(
                "draw must be called on '{}', got '{}'",
                rng_param, &caps[1]
            )));
        }
        let method = caps[2].to_string();

        let mut args: BTreeMap<String, String> = BTreeMap::new();
        for part in caps[3].split(',').filter(|p| !p.trim().is_empty()) {
            let a = arg.captures(part).ok_or_else(|| {
                SpecError::RenderContract(format!("cannot parse argument: {:?}", part.trim()))
            })?;
            if args.insert(a[1].to_string(), a[2].to_string()).is_some() {
                return Err(SpecError::RenderContract(format!(
                    "duplicate argument '{}'",
                    &a[1]
                )));
            }
        }

        match args.remove("size") {
            Some(size) if size == count_param => {}
            Some(size) => {
                return Err(SpecError::RenderContract(format!(
                    "size must be '{}', got '{}'",
                    count_param, size
                )));
            }
            None => {
                return Err(SpecError::RenderContract(
                    "draw call is missing size argument".to_string(),
                ));
            }
        }

        let draw = decode_draw(&method, &mut args)?;
        if let Some(extra) = args.keys().next() {
            return Err(SpecError::RenderContract(format!(
                "unexpected argument '{}' for {}",
                extra, method
            )));
        }
        Ok(Self { draw })
    }

    pub fn draw(&self) -> Draw {
        self.draw
    }

    /// Dispatch the decoded draw to the matching built-in routine.
    pub fn sample_dist(&self, rng: &mut SeededSource, count: usize) -> Result<SampleArray> {
        match self.draw {
            Draw::Binomial { n, p } => Ok(SampleArray::from_i64(rng.binomial(n, p, count))),
            Draw::Uniform { low, high } => {
                SampleArray::from_f64(rng.uniform(low, high, count))
                    .ensure_finite("rendered uniform sampler")
            }
            Draw::Normal { loc, scale } => {
                SampleArray::from_f64(rng.normal(loc, scale, count))
                    .ensure_finite("rendered normal sampler")
            }
        }
    }
}

fn decode_draw(method: &str, args: &mut BTreeMap<String, String>) -> Result<Draw> {
    match method {
        "binomial" => Ok(Draw::Binomial {
            n: take_int(method, args, "n")?,
            p: take_float(method, args, "p")?,
        }),
        "uniform" => Ok(Draw::Uniform {
            low: take_float(method, args, "low")?,
            high: take_float(method, args, "high")?,
        }),
        "normal" => Ok(Draw::Normal {
            loc: take_float(method, args, "loc")?,
            scale: take_float(method, args, "scale")?,
        }),
        other => Err(SpecError::RenderContract(format!(
            "unknown draw '{}'",
            other
        ))),
    }
}

fn take_literal(method: &str, args: &mut BTreeMap<String, String>, name: &str) -> Result<String> {
    args.remove(name).ok_or_else(|| {
        SpecError::RenderContract(format!("{} is missing argument '{}'", method, name))
    })
}

fn take_float(method: &str, args: &mut BTreeMap<String, String>, name: &str) -> Result<f64> {
    let text = take_literal(method, args, name)?;
    text.parse::<f64>().map_err(|_| {
        SpecError::RenderContract(format!("{}.{} is not a float literal: {:?}", method, name, text))
    })
}

fn take_int(method: &str, args: &mut BTreeMap<String, String>, name: &str) -> Result<u64> {
    let text = take_literal(method, args, name)?;
    text.parse::<u64>().map_err(|_| {
        SpecError::RenderContract(format!(
            "{}.{} is not an integer literal: {:?}",
            method, name, text
        ))
    })
}

fn regex_error(e: regex::Error) -> SpecError {
    SpecError::RenderContract(format!("artifact grammar failed to compile: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_rendered_call() {
        let src = "fn sample_dist(rng, count) {\n    rng.normal(loc = 0.2, scale = 1.0, size = count)\n}\n";
        let sampler = RenderedSampler::decode(src).unwrap();
        assert_eq!(sampler.draw(), Draw::Normal { loc: 0.2, scale: 1.0 });
    }

    #[test]
    fn accepts_renamed_parameters_and_spacing() {
        let src = "\nfn sample_dist( gen , n ) {\n\n  gen.binomial(n = 1, p = 0.25, size = n);\n}";
        let sampler = RenderedSampler::decode(src).unwrap();
        assert_eq!(sampler.draw(), Draw::Binomial { n: 1, p: 0.25 });
    }

    #[test]
    fn missing_sample_dist_is_contract_error() {
        let err = RenderedSampler::decode("fn draw(rng, count) {\n rng.normal(loc = 0.0, scale = 1.0, size = count)\n}")
            .unwrap_err();
        assert_eq!(
            err,
            SpecError::RenderContract(
                "artifact does not define `fn sample_dist(rng, count)`".to_string()
            )
        );
        assert_eq!(RenderedSampler::decode("").unwrap_err().kind(), "render_contract");
    }

    #[test]
    fn rejects_unknown_draw_and_bad_arguments() {
        let cases = [
            "fn sample_dist(rng, count) {\n rng.poisson(lam = 1.0, size = count)\n}",
            "fn sample_dist(rng, count) {\n rng.normal(loc = 0.0, size = count)\n}",
            "fn sample_dist(rng, count) {\n rng.normal(loc = 0.0, scale = x, size = count)\n}",
            "fn sample_dist(rng, count) {\n rng.normal(loc = 0.0, scale = 1.0, size = 5)\n}",
            "fn sample_dist(rng, count) {\n rng.normal(loc = 0.0, scale = 1.0)\n}",
            "fn sample_dist(rng, count) {\n rng.normal(loc = 0.0, scale = 1.0, mu = 2.0, size = count)\n}",
            "fn sample_dist(rng, count) {\n other.normal(loc = 0.0, scale = 1.0, size = count)\n}",
            "fn sample_dist(rng, count) {\n rng.binomial(n = 1.5, p = 0.5, size = count)\n}",
            "fn sample_dist(rng, count) {\n rng.normal(loc = 0.0, scale = 1.0, size = count)\n rng.normal(loc = 0.0, scale = 1.0, size = count)\n}",
        ];
        for src in cases {
            let err = RenderedSampler::decode(src).unwrap_err();
            assert_eq!(err.kind(), "render_contract", "{src}");
        }
    }

    #[test]
    fn rendered_sampler_matches_direct_draw() {
        let sampler = RenderedSampler {
            draw: Draw::Uniform { low: 0.0, high: 50.0 },
        };
        let out = sampler.sample_dist(&mut SeededSource::new(5), 16).unwrap();
        let direct = SeededSource::new(5).uniform(0.0, 50.0, 16);
        assert!(out.exactly_matches(&SampleArray::from_f64(direct)));
    }
}
