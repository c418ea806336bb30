//! Validation contract shared by all dialog content types.

/// Content that can be checked before any network or bridge call.
///
/// Implementations must be pure: calling `validate` twice on the same
/// value returns the same result.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// A named-argument validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{name} is required: {message}")]
    Required { name: String, message: String },

    #[error("invalid {name}: {message}")]
    Invalid { name: String, message: String },
}

impl ValidationError {
    pub fn required(name: &str, message: impl Into<String>) -> Self {
        Self::Required {
            name: name.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid(name: &str, message: impl Into<String>) -> Self {
        Self::Invalid {
            name: name.to_string(),
            message: message.into(),
        }
    }

    /// Name of the offending argument.
    pub fn name(&self) -> &str {
        match self {
            Self::Required { name, .. } | Self::Invalid { name, .. } => name,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Required { message, .. } | Self::Invalid { message, .. } => message,
        }
    }
}
