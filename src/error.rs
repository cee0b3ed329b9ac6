use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecError {
    #[error("invalid {field}: {constraint}")]
    Validation { field: String, constraint: String },

    #[error("unknown family '{family}'. available families: {available}")]
    UnknownFamily { family: String, available: String },

    #[error("family '{family}' already registered for {existing}")]
    RegistrationConflict {
        family: String,
        existing: &'static str,
    },

    #[error("sampling failed: {0}")]
    Sampling(String),

    #[error("render contract violated: {0}")]
    RenderContract(String),

    #[error("output validation failed for family '{family}': {}", failures.join("; "))]
    OutputValidation {
        family: String,
        failures: Vec<String>,
    },
}

impl SpecError {
    pub fn validation(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            constraint: constraint.into(),
        }
    }

    /// Short machine-readable label for the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::UnknownFamily { .. } => "unknown_family",
            Self::RegistrationConflict { .. } => "registration_conflict",
            Self::Sampling(_) => "sampling",
            Self::RenderContract(_) => "render_contract",
            Self::OutputValidation { .. } => "output_validation",
        }
    }
}

pub type Result<T> = std::result::Result<T, SpecError>;
