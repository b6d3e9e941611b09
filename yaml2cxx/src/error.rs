//! Outcome and error types
//!
//! Translation has exactly two non-success outcomes, and they are never
//! conflated: a discard skips a fixture on purpose, an unhandled failure
//! marks the batch as incomplete.

use thiserror::Error;

/// Non-success translation outcome
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// Recognized construct with intentionally no C++ equivalent.
    /// The driver silently drops the fixture.
    #[error("discarded: {0}")]
    Discard(String),

    /// Genuinely unsupported construct, with a description of the offender.
    /// The driver keeps going but reports overall batch failure.
    #[error("could not translate: {0}")]
    Unhandled(String),
}

impl TranslateError {
    pub fn discard(reason: impl Into<String>) -> Self {
        TranslateError::Discard(reason.into())
    }

    pub fn unhandled(description: impl Into<String>) -> Self {
        TranslateError::Unhandled(description.into())
    }

    /// Whether this outcome is the intentional-skip variant
    pub fn is_discard(&self) -> bool {
        matches!(self, TranslateError::Discard(_))
    }
}

/// Result type for translation operations
pub type TranslateResult<T = String> = Result<T, TranslateError>;

/// Errors from the fixture driver (I/O and deserialization)
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid fixture file '{path}': {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcomes_are_distinct() {
        assert!(TranslateError::discard("frozenset").is_discard());
        assert!(!TranslateError::unhandled("chained comparison").is_discard());
    }

    #[test]
    fn test_display() {
        let err = TranslateError::unhandled("stepped slice");
        assert!(err.to_string().contains("stepped slice"));
    }
}
