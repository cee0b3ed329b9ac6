//! Rendering of `sample_dist` artifacts.
//!
//! Shape:
//!
//! ```text
//! fn sample_dist(rng, count) {
//!     rng.uniform(low = 0.0, high = 50.0, size = count)
//! }
//! ```
//!
//! Float literals use Rust's shortest round-trip formatting, so parsing a
//! literal back yields the identical bit pattern.

use std::fmt;

pub const RNG_PARAM: &str = "rng";
pub const COUNT_PARAM: &str = "count";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Int(u64),
    Float(f64),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            // Debug keeps the fractional part and never loses precision.
            Self::Float(v) => write!(f, "{:?}", v),
        }
    }
}

/// Render a one-call `sample_dist` body invoking `draw` with `args`.
pub fn sample_dist_source(draw: &str, args: &[(&str, Literal)]) -> String {
    let mut call_args: Vec<String> = args
        .iter()
        .map(|(name, lit)| format!("{} = {}", name, lit))
        .collect();
    call_args.push(format!("size = {}", COUNT_PARAM));

    format!(
        "fn sample_dist({rng}, {count}) {{\n    {rng}.{draw}({args})\n}}\n",
        rng = RNG_PARAM,
        count = COUNT_PARAM,
        draw = draw,
        args = call_args.join(", "),
    )
}
