//! Canonical vs. candidate equivalence runs.
//!
//! For each case:
//! 1) seed a fresh source and run the canonical sampler
//! 2) seed a second fresh source identically and run the candidate
//! 3) run the spec's checks on both outputs
//! 4) compare outputs exactly
//!
//! Sampler failures inside a case become a failing `sampler_error` report so
//! the remaining cases still run.

use crate::array::SampleArray;
use crate::checks::{CheckResult, OutputVerificationReport};
use crate::diagnostics;
use crate::error::{Result, SpecError};
use crate::random::SeededSource;
use crate::render::render_to_callable;
use crate::spec::FunctionSpec;
use crate::verify::cases::{EquivalenceCase, default_equivalence_cases};
use crate::verify::report::{CaseVerificationReport, SpecVerificationReport};

/// Run the spec's full check battery against one output.
pub fn verify_output(
    spec: &FunctionSpec,
    output: &SampleArray,
    count: usize,
) -> OutputVerificationReport {
    OutputVerificationReport::from_checks(spec, &spec.output_checks(), output, count)
}

/// Strict form of [`verify_output`]: any failing check is an error.
pub fn assert_valid_output(spec: &FunctionSpec, output: &SampleArray, count: usize) -> Result<()> {
    let report = verify_output(spec, output, count);
    if report.passed {
        return Ok(());
    }
    Err(SpecError::OutputValidation {
        family: report.family.clone(),
        failures: report
            .failed_results()
            .map(|r| match &r.message {
                Some(msg) => format!("{}: {}", r.name, msg),
                None => r.name.clone(),
            })
            .collect(),
    })
}

fn sampler_error_report(spec: &FunctionSpec, message: String) -> OutputVerificationReport {
    OutputVerificationReport::new(
        spec.family(),
        vec![CheckResult::fail("sampler_error", message)],
    )
}

/// Sample and verify one side, isolating sampler failures.
fn run_side(
    spec: &FunctionSpec,
    case: &EquivalenceCase,
    side: &str,
    sample: impl FnOnce(&mut SeededSource) -> Result<SampleArray>,
) -> (Option<SampleArray>, OutputVerificationReport) {
    let mut rng = SeededSource::new(case.seed());
    match sample(&mut rng) {
        Ok(output) => {
            let report = verify_output(spec, &output, case.count());
            (Some(output), report)
        }
        Err(err) => {
            diagnostics::warn(format!(
                "{} sampler failed for family '{}' in case '{}': {}",
                side,
                spec.family(),
                case.name(),
                err
            ));
            let report = sampler_error_report(spec, format!("{} sampler failed: {}", side, err));
            (None, report)
        }
    }
}

/// Compare the canonical sampler against `candidate` over `cases`
/// (the default battery when `None`).
pub fn run_equivalence_cases<F>(
    spec: &FunctionSpec,
    candidate: F,
    cases: Option<&[EquivalenceCase]>,
) -> Result<SpecVerificationReport>
where
    F: Fn(&FunctionSpec, &mut SeededSource, usize) -> Result<SampleArray>,
{
    let defaults;
    let cases = match cases {
        Some(cases) => cases,
        None => {
            defaults = default_equivalence_cases();
            defaults.as_slice()
        }
    };
    if cases.is_empty() {
        return Err(SpecError::validation(
            "cases",
            "at least one equivalence case is required",
        ));
    }

    let case_reports = cases
        .iter()
        .map(|case| {
            let (canonical_output, canonical_report) =
                run_side(spec, case, "canonical", |rng| {
                    spec.sample_dist(rng, case.count())
                });
            let (candidate_output, candidate_report) =
                run_side(spec, case, "candidate", |rng| {
                    candidate(spec, rng, case.count())
                });

            let exact_output_match = match (&canonical_output, &candidate_output) {
                (Some(a), Some(b)) => a.exactly_matches(b),
                _ => false,
            };

            CaseVerificationReport::new(
                case.clone(),
                canonical_report,
                candidate_report,
                exact_output_match,
            )
        })
        .collect();

    Ok(SpecVerificationReport::new(spec.family(), case_reports))
}

/// Equivalence of the canonical sampler and the sampler decoded from the
/// spec's rendered artifact. A broken artifact fails before any case runs.
pub fn run_render_equivalence_cases(
    spec: &FunctionSpec,
    cases: Option<&[EquivalenceCase]>,
) -> Result<SpecVerificationReport> {
    let rendered = render_to_callable(spec)?;
    run_equivalence_cases(spec, |_, rng, count| rendered.sample_dist(rng, count), cases)
}

/// Single-case form of [`run_render_equivalence_cases`].
pub fn check_spec_equivalence(spec: &FunctionSpec, seed: u64, count: usize) -> Result<bool> {
    let case = EquivalenceCase::new("single_case", seed, count)?;
    let report = run_render_equivalence_cases(spec, Some(std::slice::from_ref(&case)))?;
    Ok(report.passed)
}
