//! Error types for `hardval`
//!
//! `PolicyError` classifies every way a policy document can be rejected.
//! `HardvalError` wraps it for the command-line front-end and maps each
//! failure to a process exit code.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `hardval` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// Policy error (malformed document, schema violation)
    pub const POLICY_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `hardval` operations.
#[derive(Debug, Error)]
pub enum HardvalError {
    /// Policy loading or validation error
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// One or more policy files failed validation.
    #[error("{count} file(s) failed validation")]
    ValidationFailed {
        /// Number of files that failed validation.
        count: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl HardvalError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Policy(e) => e.exit_code(),
            Self::ValidationFailed { .. } | Self::Json(_) | Self::Yaml(_) => {
                ExitCode::POLICY_ERROR
            }
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Policy Errors
// ============================================================================

/// Policy loading and validation errors.
///
/// Loading stops at the first violation found in document order, so a
/// failed load carries exactly one of these.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The source document could not be read.
    #[error("cannot read policy {path}: {message}")]
    SourceUnavailable {
        /// Path to the policy document
        path: PathBuf,
        /// Description of the underlying I/O failure
        message: String,
    },

    /// The raw content does not parse into a structured mapping.
    #[error("malformed policy document {origin}{}: {message}", line.map_or_else(String::new, |l| format!(" (line {l})")))]
    MalformedDocument {
        /// Name of the document (usually its path)
        origin: String,
        /// Line number where parsing failed (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// `profile.id` is absent or empty.
    #[error("profile.id is required in {origin}")]
    MissingProfileId {
        /// Name of the document
        origin: String,
    },

    /// `requirements` is absent, not a sequence, or empty.
    #[error("requirements must be a non-empty list in {origin}: {reason}")]
    EmptyOrInvalidRequirements {
        /// Name of the document
        origin: String,
        /// What was wrong with the `requirements` entry
        reason: String,
    },

    /// A requirement entry has no non-empty `id`.
    #[error("requirement at index {index} must have an id")]
    MissingRequirementId {
        /// Zero-based position of the entry in `requirements`
        index: usize,
    },

    /// A requirement `id` repeats an earlier one.
    #[error("duplicate requirement id: {id}")]
    DuplicateRequirementId {
        /// The repeated identifier
        id: String,
    },

    /// A requirement's `check` is missing, not a mapping, or lacks `type`.
    #[error("requirement {id} has an invalid check: {reason}")]
    InvalidCheckSpec {
        /// Identifier of the offending requirement
        id: String,
        /// What was wrong with the check
        reason: String,
    },

    /// A text field holds a sequence or mapping.
    #[error("invalid value at {location}: expected {expected}")]
    InvalidField {
        /// Dotted path to the field (e.g. `requirements[2].title`)
        location: String,
        /// Description of what was expected
        expected: String,
    },

    /// The document exceeds a configured limit.
    #[error("{what} is {actual}, limit is {limit}")]
    LimitExceeded {
        /// What was measured
        what: &'static str,
        /// Measured value
        actual: usize,
        /// Configured maximum
        limit: usize,
    },
}

impl PolicyError {
    /// Stable snake-case name of the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SourceUnavailable { .. } => "source_unavailable",
            Self::MalformedDocument { .. } => "malformed_document",
            Self::MissingProfileId { .. } => "missing_profile_id",
            Self::EmptyOrInvalidRequirements { .. } => "empty_or_invalid_requirements",
            Self::MissingRequirementId { .. } => "missing_requirement_id",
            Self::DuplicateRequirementId { .. } => "duplicate_requirement_id",
            Self::InvalidCheckSpec { .. } => "invalid_check_spec",
            Self::InvalidField { .. } => "invalid_field",
            Self::LimitExceeded { .. } => "limit_exceeded",
        }
    }

    /// Identifier of the requirement this error is about, if any.
    #[must_use]
    pub fn requirement_id(&self) -> Option<&str> {
        match self {
            Self::DuplicateRequirementId { id } | Self::InvalidCheckSpec { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Returns the exit code the CLI uses for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::SourceUnavailable { .. } => ExitCode::IO_ERROR,
            _ => ExitCode::POLICY_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_document_display_with_line() {
        let err = PolicyError::MalformedDocument {
            origin: "policy.yaml".to_string(),
            line: Some(42),
            message: "unexpected token".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("policy.yaml"));
        assert!(msg.contains("(line 42)"));
        assert!(msg.contains("unexpected token"));
    }

    #[test]
    fn test_malformed_document_display_without_line() {
        let err = PolicyError::MalformedDocument {
            origin: "policy.yaml".to_string(),
            line: None,
            message: "document is empty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed policy document policy.yaml: document is empty"
        );
    }

    #[test]
    fn test_duplicate_id_names_the_id() {
        let err = PolicyError::DuplicateRequirementId {
            id: "R1".to_string(),
        };
        assert_eq!(err.to_string(), "duplicate requirement id: R1");
        assert_eq!(err.requirement_id(), Some("R1"));
        assert_eq!(err.kind(), "duplicate_requirement_id");
    }

    #[test]
    fn test_invalid_check_names_the_requirement() {
        let err = PolicyError::InvalidCheckSpec {
            id: "R2".to_string(),
            reason: "missing check".to_string(),
        };
        assert!(err.to_string().contains("R2"));
        assert_eq!(err.requirement_id(), Some("R2"));
    }

    #[test]
    fn test_requirement_id_absent_for_document_errors() {
        let err = PolicyError::MissingProfileId {
            origin: "p.yaml".to_string(),
        };
        assert_eq!(err.requirement_id(), None);
    }

    #[test]
    fn test_exit_codes() {
        let io = PolicyError::SourceUnavailable {
            path: PathBuf::from("/missing.yaml"),
            message: "not found".to_string(),
        };
        assert_eq!(io.exit_code(), ExitCode::IO_ERROR);

        let schema = PolicyError::MissingRequirementId { index: 0 };
        assert_eq!(schema.exit_code(), ExitCode::POLICY_ERROR);

        let top: HardvalError = schema.into();
        assert_eq!(top.exit_code(), ExitCode::POLICY_ERROR);

        let failed = HardvalError::ValidationFailed { count: 2 };
        assert_eq!(failed.exit_code(), ExitCode::POLICY_ERROR);
        assert_eq!(failed.to_string(), "2 file(s) failed validation");
    }
}
