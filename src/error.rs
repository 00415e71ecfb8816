use thiserror::Error;

pub type CostwiseResult<T> = Result<T, CostwiseError>;

/// A single field-level validation failure.
///
/// Carries enough context (field name, offending value, message) for a caller
/// to render a precise diagnostic without re-deriving it.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Name of the field that failed validation.
    pub field: String,
    /// String rendering of the offending value, when one exists.
    pub value: Option<String>,
    /// What went wrong, including the valid set for closed enumerations.
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: None,
            message: message.into(),
        }
    }

    pub fn with_value(
        field: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            value: Some(value.into()),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}: {} (got: {})", self.field, self.message, value),
            None => write!(f, "{}: {}", self.field, self.message),
        }
    }
}

#[derive(Error, Debug)]
pub enum CostwiseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(ValidationError),

    #[error("{field} must be an array")]
    NotASequence { field: String },

    #[error("all items in {field} are invalid:\n{}", errors.iter().map(|e| format!("  - {e}")).collect::<Vec<_>>().join("\n"))]
    AllItemsInvalid {
        field: String,
        errors: Vec<ValidationError>,
    },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<ValidationError> for CostwiseError {
    fn from(err: ValidationError) -> Self {
        CostwiseError::Validation(err)
    }
}
