//! Equivalence verification: canonical sampler vs. candidate sampler.

pub mod cases;
pub mod engine;
pub mod report;

pub use cases::{EquivalenceCase, default_equivalence_cases};
pub use engine::{
    assert_valid_output, check_spec_equivalence, run_equivalence_cases,
    run_render_equivalence_cases, verify_output,
};
pub use report::{CaseVerificationReport, SpecVerificationReport};
