//! Composable output checks over a produced sample array.
//!
//! Every check is a stateless predicate run against the array, the spec that
//! produced it and the requested count. A report keeps every result; nothing
//! short-circuits.

use crate::array::SampleArray;
use crate::error::{Result, SpecError};
use crate::spec::FunctionSpec;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: Option<String>,
}

impl CheckResult {
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            message: None,
        }
    }

    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            message: Some(message.into()),
        }
    }

    fn from_outcome(name: &str, passed: bool, failure: impl FnOnce() -> String) -> Self {
        if passed {
            Self::pass(name)
        } else {
            Self::fail(name, failure())
        }
    }

    pub fn to_line(&self) -> String {
        let status = if self.passed { "PASS" } else { "FAIL" };
        match &self.message {
            Some(msg) => format!("[{}] {} ({})", status, self.name, msg),
            None => format!("[{}] {}", status, self.name),
        }
    }
}

/// Outcome of running a spec's full check battery on one output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputVerificationReport {
    pub family: String,
    pub passed: bool,
    pub results: Vec<CheckResult>,
}

impl OutputVerificationReport {
    /// `passed` is the conjunction of all results.
    pub fn new(family: impl Into<String>, results: Vec<CheckResult>) -> Self {
        let passed = results.iter().all(|r| r.passed);
        Self {
            family: family.into(),
            passed,
            results,
        }
    }

    /// Run every check in order and keep all results.
    pub fn from_checks(
        spec: &FunctionSpec,
        checks: &[OutputCheck],
        values: &SampleArray,
        count: usize,
    ) -> Self {
        let results = checks
            .iter()
            .map(|check| check.run(values, spec, count))
            .collect();
        Self::new(spec.family(), results)
    }

    pub fn failed_results(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    pub fn to_lines(&self) -> Vec<String> {
        let status = if self.passed { "PASS" } else { "FAIL" };
        let mut lines = vec![format!(
            "[{}] output checks for family '{}'",
            status, self.family
        )];
        lines.extend(self.results.iter().map(|r| format!("  {}", r.to_line())));
        lines
    }

    pub fn to_markdown(&self) -> String {
        self.to_lines().join("\n")
    }

    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// Membership check against a non-empty set of finite literals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InSetCheck {
    allowed: Vec<f64>,
}

impl InSetCheck {
    pub fn new(allowed: Vec<f64>) -> Result<Self> {
        if allowed.is_empty() {
            return Err(SpecError::validation("allowed", "must contain at least one value"));
        }
        if let Some(bad) = allowed.iter().find(|v| !v.is_finite()) {
            return Err(SpecError::validation(
                "allowed",
                format!("values must be finite, got {:?}", bad),
            ));
        }
        Ok(Self { allowed })
    }

    /// `{0, 1}`, the support of a Bernoulli trial.
    pub fn zero_one() -> Self {
        Self {
            allowed: vec![0.0, 1.0],
        }
    }

    pub fn allowed(&self) -> &[f64] {
        &self.allowed
    }
}

/// One side of a range: a literal, or a field looked up on the owning spec.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeBound {
    Value(f64),
    Field(String),
}

impl RangeBound {
    fn resolve(&self, spec: &FunctionSpec) -> std::result::Result<f64, String> {
        match self {
            Self::Value(v) => Ok(*v),
            Self::Field(name) => spec.field(name).ok_or_else(|| {
                format!("family '{}' has no field '{}'", spec.family(), name)
            }),
        }
    }
}

/// Raw `InRange` configuration; each bound takes exactly one source.
#[derive(Debug, Clone, Default)]
pub struct InRangeConfig {
    pub min_value: Option<f64>,
    pub min_field: Option<String>,
    pub max_value: Option<f64>,
    pub max_field: Option<String>,
    pub include_min: bool,
    pub include_max: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InRangeCheck {
    min: RangeBound,
    max: RangeBound,
    include_min: bool,
    include_max: bool,
}

impl InRangeCheck {
    pub fn new(config: InRangeConfig) -> Result<Self> {
        let min = bound_source("min", config.min_value, config.min_field)?;
        let max = bound_source("max", config.max_value, config.max_field)?;
        Ok(Self {
            min,
            max,
            include_min: config.include_min,
            include_max: config.include_max,
        })
    }

    /// Range whose bounds are both fields of the owning spec.
    pub fn between_fields(
        min_field: &str,
        max_field: &str,
        include_min: bool,
        include_max: bool,
    ) -> Self {
        Self {
            min: RangeBound::Field(min_field.to_string()),
            max: RangeBound::Field(max_field.to_string()),
            include_min,
            include_max,
        }
    }

    pub fn min(&self) -> &RangeBound {
        &self.min
    }

    pub fn max(&self) -> &RangeBound {
        &self.max
    }

    pub fn include_min(&self) -> bool {
        self.include_min
    }

    pub fn include_max(&self) -> bool {
        self.include_max
    }

    fn contains(&self, lower: f64, upper: f64, v: f64) -> bool {
        let above = if self.include_min { v >= lower } else { v > lower };
        let below = if self.include_max { v <= upper } else { v < upper };
        above && below
    }

    fn bracket(&self, lower: f64, upper: f64) -> String {
        let left = if self.include_min { '[' } else { '(' };
        let right = if self.include_max { ']' } else { ')' };
        format!("{}{:?}, {:?}{}", left, lower, upper, right)
    }
}

fn bound_source(side: &str, value: Option<f64>, field: Option<String>) -> Result<RangeBound> {
    match (value, field) {
        (Some(v), None) if v.is_finite() => Ok(RangeBound::Value(v)),
        (Some(v), None) => Err(SpecError::validation(
            format!("{}_value", side),
            format!("must be finite, got {:?}", v),
        )),
        (None, Some(name)) if !name.is_empty() => Ok(RangeBound::Field(name)),
        (None, Some(_)) => Err(SpecError::validation(
            format!("{}_field", side),
            "must not be empty",
        )),
        _ => Err(SpecError::validation(
            side,
            format!("provide exactly one of {side}_value or {side}_field"),
        )),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputCheck {
    OneDimensional,
    Length,
    NumericDtype,
    FiniteValues,
    InSet(InSetCheck),
    InRange(InRangeCheck),
}

impl OutputCheck {
    pub fn name(&self) -> &'static str {
        match self {
            Self::OneDimensional => "one_dimensional",
            Self::Length => "length",
            Self::NumericDtype => "numeric_dtype",
            Self::FiniteValues => "finite_values",
            Self::InSet(_) => "in_set",
            Self::InRange(_) => "in_range",
        }
    }

    pub fn run(&self, values: &SampleArray, spec: &FunctionSpec, count: usize) -> CheckResult {
        let name = self.name();
        match self {
            Self::OneDimensional => CheckResult::from_outcome(name, values.ndim() == 1, || {
                format!("expected 1D output but got ndim={}", values.ndim())
            }),
            Self::Length => {
                if count == 0 {
                    return CheckResult::fail(name, "count must be greater than 0");
                }
                if values.ndim() != 1 {
                    return CheckResult::fail(name, "length check requires 1D output");
                }
                let len = values.shape()[0];
                CheckResult::from_outcome(name, len == count, || {
                    format!("expected length {} but got {}", count, len)
                })
            }
            Self::NumericDtype => {
                CheckResult::from_outcome(name, values.dtype().is_numeric(), || {
                    format!("expected numeric dtype but got {}", values.dtype())
                })
            }
            Self::FiniteValues => {
                let Some(xs) = values.numeric_values() else {
                    return CheckResult::fail(name, "finite check requires numeric dtype");
                };
                CheckResult::from_outcome(name, xs.iter().all(|v| v.is_finite()), || {
                    "output contains NaN or infinite values".to_string()
                })
            }
            Self::InSet(check) => {
                let Some(xs) = values.numeric_values() else {
                    return CheckResult::fail(name, "set check requires numeric dtype");
                };
                match xs.iter().find(|&&v| !check.allowed.contains(&v)) {
                    None => CheckResult::pass(name),
                    Some(bad) => CheckResult::fail(
                        name,
                        format!("value {:?} is not in allowed set {:?}", bad, check.allowed),
                    ),
                }
            }
            Self::InRange(check) => {
                let Some(xs) = values.numeric_values() else {
                    return CheckResult::fail(name, "range check requires numeric dtype");
                };
                let (lower, upper) = match (check.min.resolve(spec), check.max.resolve(spec)) {
                    (Ok(lower), Ok(upper)) => (lower, upper),
                    (Err(msg), _) | (_, Err(msg)) => return CheckResult::fail(name, msg),
                };
                if lower > upper {
                    return CheckResult::fail(
                        name,
                        format!("resolved invalid range [{:?}, {:?}]", lower, upper),
                    );
                }
                match xs.iter().find(|&&v| !check.contains(lower, upper, v)) {
                    None => CheckResult::pass(name),
                    Some(bad) => CheckResult::fail(
                        name,
                        format!(
                            "value {:?} is outside allowed range {}",
                            bad,
                            check.bracket(lower, upper)
                        ),
                    ),
                }
            }
        }
    }
}

/// Shape, length, dtype and finiteness; every family starts from these.
pub fn default_output_checks() -> Vec<OutputCheck> {
    vec![
        OutputCheck::OneDimensional,
        OutputCheck::Length,
        OutputCheck::NumericDtype,
        OutputCheck::FiniteValues,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::ArrayData;
    use crate::spec::{BernoulliSpec, UniformSpec};
    use pretty_assertions::assert_eq;

    fn uniform_spec() -> FunctionSpec {
        UniformSpec::new(0.0, 50.0).unwrap().into()
    }

    fn run_one(check: &OutputCheck, values: &SampleArray, count: usize) -> CheckResult {
        check.run(values, &uniform_spec(), count)
    }

    #[test]
    fn one_dimensional_rejects_matrices() {
        let matrix = SampleArray::with_shape(vec![2, 2], ArrayData::Float64(vec![1.0; 4])).unwrap();
        let result = run_one(&OutputCheck::OneDimensional, &matrix, 4);
        assert_eq!(
            result,
            CheckResult::fail("one_dimensional", "expected 1D output but got ndim=2")
        );
    }

    #[test]
    fn length_reports_mismatch_and_zero_count() {
        let values = SampleArray::from_f64(vec![1.0, 2.0]);
        assert!(run_one(&OutputCheck::Length, &values, 2).passed);
        assert_eq!(
            run_one(&OutputCheck::Length, &values, 3).message.as_deref(),
            Some("expected length 3 but got 2")
        );
        assert_eq!(
            run_one(&OutputCheck::Length, &values, 0).message.as_deref(),
            Some("count must be greater than 0")
        );
    }

    #[test]
    fn numeric_and_finite_checks_need_numbers() {
        let text = SampleArray::with_shape(vec![1], ArrayData::Str(vec!["a".into()])).unwrap();
        assert_eq!(
            run_one(&OutputCheck::NumericDtype, &text, 1).message.as_deref(),
            Some("expected numeric dtype but got str")
        );
        assert_eq!(
            run_one(&OutputCheck::FiniteValues, &text, 1).message.as_deref(),
            Some("finite check requires numeric dtype")
        );
    }

    #[test]
    fn finite_check_flags_nan_and_infinity() {
        let values = SampleArray::from_f64(vec![1.0, f64::NAN]);
        assert!(!run_one(&OutputCheck::FiniteValues, &values, 2).passed);
        let values = SampleArray::from_f64(vec![f64::NEG_INFINITY]);
        assert!(!run_one(&OutputCheck::FiniteValues, &values, 1).passed);
    }

    #[test]
    fn in_set_reports_first_offender() {
        let check = OutputCheck::InSet(InSetCheck::new(vec![0.0, 1.0]).unwrap());
        let values = SampleArray::from_i64(vec![0, 1, 2, 3]);
        assert_eq!(
            run_one(&check, &values, 4).message.as_deref(),
            Some("value 2.0 is not in allowed set [0.0, 1.0]")
        );
    }

    #[test]
    fn in_set_rejects_empty_or_non_finite_sets() {
        assert!(InSetCheck::new(vec![]).is_err());
        assert!(InSetCheck::new(vec![0.0, f64::NAN]).is_err());
    }

    #[test]
    fn in_range_resolves_spec_fields() {
        let check = OutputCheck::InRange(InRangeCheck::between_fields("start", "end", true, false));
        let inside = SampleArray::from_f64(vec![0.0, 49.9]);
        assert!(run_one(&check, &inside, 2).passed);

        let on_end = SampleArray::from_f64(vec![10.0, 50.0]);
        assert_eq!(
            run_one(&check, &on_end, 2).message.as_deref(),
            Some("value 50.0 is outside allowed range [0.0, 50.0)")
        );
    }

    #[test]
    fn in_range_with_literal_bounds() {
        let check = OutputCheck::InRange(
            InRangeCheck::new(InRangeConfig {
                min_value: Some(-1.0),
                max_value: Some(1.0),
                include_min: false,
                include_max: true,
                ..Default::default()
            })
            .unwrap(),
        );
        let values = SampleArray::from_f64(vec![1.0, -1.0]);
        assert_eq!(
            run_one(&check, &values, 2).message.as_deref(),
            Some("value -1.0 is outside allowed range (-1.0, 1.0]")
        );
    }

    #[test]
    fn in_range_needs_exactly_one_source_per_bound() {
        let both = InRangeCheck::new(InRangeConfig {
            min_value: Some(0.0),
            min_field: Some("start".into()),
            max_value: Some(1.0),
            ..Default::default()
        });
        assert_eq!(both.unwrap_err().kind(), "validation");

        let neither = InRangeCheck::new(InRangeConfig {
            min_value: Some(0.0),
            ..Default::default()
        });
        assert!(neither.is_err());
    }

    #[test]
    fn in_range_fails_on_inverted_resolution() {
        let check = OutputCheck::InRange(InRangeCheck::between_fields("end", "start", true, true));
        let values = SampleArray::from_f64(vec![1.0]);
        assert_eq!(
            run_one(&check, &values, 1).message.as_deref(),
            Some("resolved invalid range [50.0, 0.0]")
        );
    }

    #[test]
    fn in_range_unknown_field_fails_cleanly() {
        let check = OutputCheck::InRange(InRangeCheck::between_fields("low", "end", true, false));
        let values = SampleArray::from_f64(vec![1.0]);
        assert_eq!(
            run_one(&check, &values, 1).message.as_deref(),
            Some("family 'uniform' has no field 'low'")
        );
    }

    #[test]
    fn report_runs_every_check_without_short_circuit() {
        let spec: FunctionSpec = BernoulliSpec::new(0.5).unwrap().into();
        let values = SampleArray::with_shape(vec![1, 2], ArrayData::Str(vec!["x".into(); 2])).unwrap();
        let report =
            OutputVerificationReport::from_checks(&spec, &spec.output_checks(), &values, 2);
        assert!(!report.passed);
        assert_eq!(report.results.len(), 5);
        assert_eq!(report.failed_results().count(), 5);
        assert_eq!(report.to_lines()[0], "[FAIL] output checks for family 'bernoulli'");
    }

    #[test]
    fn check_serializes_with_kind_tag() {
        let value = serde_json::to_value(OutputCheck::Length).unwrap();
        assert_eq!(value, serde_json::json!({"kind": "length"}));
    }
}
