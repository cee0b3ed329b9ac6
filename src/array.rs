//! Sample arrays produced by canonical and candidate samplers.

use crate::error::{Result, SpecError};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    Float64,
    Int64,
    Bool,
    Str,
}

impl Dtype {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Float64 => "float64",
            Self::Int64 => "int64",
            Self::Bool => "bool",
            Self::Str => "str",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Float64 | Self::Int64)
    }
}

impl std::fmt::Display for Dtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat element storage, one variant per dtype.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArrayData {
    Float64(Vec<f64>),
    Int64(Vec<i64>),
    Bool(Vec<bool>),
    Str(Vec<String>),
}

impl ArrayData {
    fn len(&self) -> usize {
        match self {
            Self::Float64(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::Bool(v) => v.len(),
            Self::Str(v) => v.len(),
        }
    }
}

/// A row-major array with an explicit shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleArray {
    shape: Vec<usize>,
    data: ArrayData,
}

impl SampleArray {
    pub fn from_f64(values: Vec<f64>) -> Self {
        Self {
            shape: vec![values.len()],
            data: ArrayData::Float64(values),
        }
    }

    pub fn from_i64(values: Vec<i64>) -> Self {
        Self {
            shape: vec![values.len()],
            data: ArrayData::Int64(values),
        }
    }

    /// Build an array of arbitrary rank. The shape must cover the data exactly.
    pub fn with_shape(shape: Vec<usize>, data: ArrayData) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(SpecError::validation(
                "shape",
                format!(
                    "shape {:?} describes {} elements but data holds {}",
                    shape,
                    expected,
                    data.len()
                ),
            ));
        }
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn dtype(&self) -> Dtype {
        match self.data {
            ArrayData::Float64(_) => Dtype::Float64,
            ArrayData::Int64(_) => Dtype::Int64,
            ArrayData::Bool(_) => Dtype::Bool,
            ArrayData::Str(_) => Dtype::Str,
        }
    }

    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    /// Number of elements across all axes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Elements widened to f64, or `None` for non-numeric dtypes.
    pub fn numeric_values(&self) -> Option<Vec<f64>> {
        match &self.data {
            ArrayData::Float64(v) => Some(v.clone()),
            ArrayData::Int64(v) => Some(v.iter().map(|&x| x as f64).collect()),
            ArrayData::Bool(_) | ArrayData::Str(_) => None,
        }
    }

    /// Pass the array through, or fail with a sampling error naming `producer`
    /// when any element is NaN or infinite.
    pub fn ensure_finite(self, producer: &str) -> Result<Self> {
        if let ArrayData::Float64(values) = &self.data {
            if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
                return Err(SpecError::Sampling(format!(
                    "{} produced a non-finite value {:?}",
                    producer, bad
                )));
            }
        }
        Ok(self)
    }

    /// Shape, dtype and every element equal; floats compare bit-for-bit.
    pub fn exactly_matches(&self, other: &SampleArray) -> bool {
        if self.shape != other.shape {
            return false;
        }
        match (&self.data, &other.data) {
            (ArrayData::Float64(a), ArrayData::Float64(b)) => a
                .iter()
                .zip(b)
                .all(|(x, y)| x.to_bits() == y.to_bits()),
            (a, b) => a == b,
        }
    }
}
