//! Verification errors for release tasks.

/// A task definition that cannot be processed.
///
/// These are never retried: the task itself has to be fixed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskVerificationError {
    /// Payload locale disagrees with the locales on upstream artifacts.
    #[error("Payload locale '{payload}' does not match upstream artifact locales {upstream:?}")]
    LocaleMismatch {
        payload: String,
        upstream: Vec<String>,
    },

    /// A field required for this action is absent.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A field is present but unusable.
    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },

    /// The task JSON does not match the expected shape.
    #[error("Malformed task definition: {0}")]
    Malformed(String),
}

impl TaskVerificationError {
    pub(crate) fn missing(field: &str) -> Self {
        Self::MissingField(field.to_string())
    }
}
