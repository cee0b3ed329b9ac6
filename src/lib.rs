//! # distfxn
//!
//! Validated specs for parametric stochastic-function families (Bernoulli,
//! Uniform, Normal) and an engine that checks two independent samplers agree
//! bit for bit: the canonical in-process sampler, and a candidate decoded from
//! the spec's rendered `sample_dist` artifact.
//!
//! ## Modules
//!
//! - [`spec`]: family specs, parameter samplers, randomized construction
//! - [`checks`]: composable output checks and their reports
//! - [`registry`]: discriminator-keyed parsing of untyped payloads
//! - [`render`]: artifact text and the candidate sampler decoded from it
//! - [`verify`]: the equivalence engine and its reports

pub mod array;
pub mod checks;
pub mod diagnostics;
pub mod error;
pub mod random;
pub mod registry;
pub mod render;
pub mod spec;
pub mod verify;

pub use array::{ArrayData, Dtype, SampleArray};
pub use checks::{
    CheckResult, InRangeCheck, InRangeConfig, InSetCheck, OutputCheck, OutputVerificationReport,
    RangeBound, default_output_checks,
};
pub use error::{Result, SpecError};
pub use random::SeededSource;
pub use registry::{FamilyEntry, FamilyRegistry};
pub use render::{RenderedSampler, render_to_callable};
pub use spec::{
    BernoulliSamplingSpec, BernoulliSpec, FamilySpec, FunctionSpec,
    LogUniformPositiveFloatParamSampler, NormalSamplingSpec, NormalSpec, ParamContext,
    ParamSampler, SamplingSpec, UniformFloatParamSampler, UniformSamplingSpec, UniformSpec,
};
pub use verify::{
    CaseVerificationReport, EquivalenceCase, SpecVerificationReport, assert_valid_output,
    check_spec_equivalence, default_equivalence_cases, run_equivalence_cases,
    run_render_equivalence_cases, verify_output,
};
