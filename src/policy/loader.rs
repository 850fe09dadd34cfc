//! Policy loader
//!
//! This module implements the policy loading pipeline:
//! 1. Size check against `PolicyLimits`
//! 2. Read raw file content (UTF-8, BOM stripped)
//! 3. YAML parsing into a generic tree
//! 4. Validation into a frozen `Policy`
//!
//! The loader keeps no state between calls. Loading the same unmodified
//! document twice yields equal policies.

use crate::error::PolicyError;
use crate::observability::WARNINGS_TARGET;
use crate::policy::schema::Policy;
use crate::policy::validation::Validator;

use serde_yaml::Value;
use std::path::Path;

// ============================================================================
// Public API
// ============================================================================

/// Loads and validates a policy file with default options.
///
/// # Errors
///
/// Returns the first problem found: an unreadable file, malformed YAML, or
/// the first schema violation in document order.
pub fn load_policy(path: impl AsRef<Path>) -> Result<Policy, PolicyError> {
    PolicyLoader::with_defaults()
        .load(path.as_ref())
        .map(|result| result.policy)
}

/// Validates an in-memory policy document with default options.
///
/// `origin` names the document in error messages.
///
/// # Errors
///
/// Returns the first problem found, as for [`load_policy`].
pub fn load_policy_from_str(content: &str, origin: &str) -> Result<Policy, PolicyError> {
    PolicyLoader::with_defaults()
        .load_from_str(content, origin)
        .map(|result| result.policy)
}

/// Options for the policy loader.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Limits on document size.
    pub limits: PolicyLimits,
}

/// Limits on policy documents to prevent resource exhaustion.
#[derive(Debug, Clone)]
pub struct PolicyLimits {
    /// Maximum policy file size in bytes.
    pub max_document_size: usize,

    /// Maximum number of requirements. Unbounded unless set here or via
    /// `HARDVAL_MAX_REQUIREMENTS`.
    pub max_requirements: usize,
}

impl Default for PolicyLimits {
    fn default() -> Self {
        Self {
            max_document_size: env_or("HARDVAL_MAX_POLICY_SIZE", 10 * 1024 * 1024),
            max_requirements: env_or("HARDVAL_MAX_REQUIREMENTS", usize::MAX),
        }
    }
}

/// Result of loading a policy document.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated policy.
    pub policy: Policy,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Non-fatal finding reported alongside a loaded policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

/// Policy loader.
///
/// Handles the full pipeline from YAML file to frozen `Policy`. Loading
/// takes `&self`, so one loader can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct PolicyLoader {
    options: LoaderOptions,
}

impl PolicyLoader {
    /// Creates a new policy loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Creates a new policy loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LoaderOptions::default())
    }

    /// Loads a policy file and returns the frozen policy.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or exceeds the size limit
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load(&self, path: &Path) -> Result<LoadResult, PolicyError> {
        let unavailable = |e: std::io::Error| PolicyError::SourceUnavailable {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let metadata = std::fs::metadata(path).map_err(unavailable)?;
        if !metadata.is_file() {
            return Err(PolicyError::SourceUnavailable {
                path: path.to_path_buf(),
                message: "not a regular file".to_string(),
            });
        }

        let limit = self.options.limits.max_document_size;
        let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if file_size > limit {
            return Err(PolicyError::LimitExceeded {
                what: "document size in bytes",
                actual: file_size,
                limit,
            });
        }

        tracing::debug!(path = %path.display(), bytes = file_size, "reading policy");
        let raw_content = std::fs::read_to_string(path).map_err(unavailable)?;

        self.load_from_str(&raw_content, &path.display().to_string())
    }

    /// Validates an in-memory policy document.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is too large, YAML parsing fails, or
    /// validation fails.
    pub fn load_from_str(&self, content: &str, origin: &str) -> Result<LoadResult, PolicyError> {
        let limit = self.options.limits.max_document_size;
        if content.len() > limit {
            return Err(PolicyError::LimitExceeded {
                what: "document size in bytes",
                actual: content.len(),
                limit,
            });
        }

        // Handle UTF-8 BOM
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let root: Value =
            serde_yaml::from_str(content).map_err(|e| PolicyError::MalformedDocument {
                origin: origin.to_string(),
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        if root.is_null() {
            return Err(PolicyError::MalformedDocument {
                origin: origin.to_string(),
                line: None,
                message: "Policy document is empty".to_string(),
            });
        }

        let validated = Validator::new(origin, &self.options.limits).validate(&root)?;
        for warning in &validated.warnings {
            tracing::warn!(
                target: WARNINGS_TARGET,
                origin,
                location = warning.location.as_deref().unwrap_or("<unknown>"),
                "{}",
                warning.message
            );
        }

        Ok(LoadResult {
            policy: validated.policy,
            warnings: validated.warnings,
        })
    }
}

fn env_or(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SCENARIO_A: &str = r#"
profile:
  id: "baseline-l1"
requirements:
  - id: "R1"
    check:
      type: "file_permission"
      path: "/etc/shadow"
"#;

    fn write_temp(content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_policy_limits_default() {
        let limits = PolicyLimits::default();
        assert_eq!(limits.max_document_size, 10 * 1024 * 1024);
        assert_eq!(limits.max_requirements, usize::MAX);
    }

    #[test]
    fn test_large_policy_loads_without_limit() {
        let mut doc = String::from("profile:\n  id: large\nrequirements:\n");
        for i in 0..10_001 {
            doc.push_str("  - id: R");
            doc.push_str(&i.to_string());
            doc.push_str("\n    check: {type: noop}\n");
        }
        let policy = load_policy_from_str(&doc, "large.yaml").unwrap();
        assert_eq!(policy.len(), 10_001);
        assert_eq!(policy.requirements()[10_000].id(), "R10000");
    }

    #[test]
    fn test_env_or_falls_back_on_unset() {
        assert_eq!(env_or("HARDVAL_TEST_UNSET_LIMIT_XYZ123", 7), 7);
    }

    #[test]
    fn test_load_from_file() {
        let file = write_temp(SCENARIO_A.as_bytes());
        let result = PolicyLoader::with_defaults().load(file.path()).unwrap();
        assert_eq!(result.policy.profile_id(), "baseline-l1");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let err = load_policy("/nonexistent/hardval/policy.yaml").unwrap_err();
        match err {
            PolicyError::SourceUnavailable { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/hardval/policy.yaml"));
            }
            other => panic!("expected SourceUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_directory_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_policy(dir.path()).unwrap_err();
        assert!(matches!(err, PolicyError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_source_unavailable() {
        let file = write_temp(b"\xff\xfe\x00profile");
        let err = load_policy(file.path()).unwrap_err();
        assert!(matches!(err, PolicyError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_bom_is_stripped() {
        let content = format!("\u{feff}{SCENARIO_A}");
        let policy = load_policy_from_str(&content, "bom.yaml").unwrap();
        assert_eq!(policy.len(), 1);
    }

    #[test]
    fn test_empty_document_is_malformed() {
        let err = load_policy_from_str("", "empty.yaml").unwrap_err();
        match err {
            PolicyError::MalformedDocument { message, .. } => {
                assert!(message.contains("empty"));
            }
            other => panic!("expected MalformedDocument, got {other:?}"),
        }
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let err = load_policy_from_str("profile:\n  id: [unclosed\n", "bad.yaml").unwrap_err();
        match err {
            PolicyError::MalformedDocument { origin, line, .. } => {
                assert_eq!(origin, "bad.yaml");
                assert!(line.is_some());
            }
            other => panic!("expected MalformedDocument, got {other:?}"),
        }
    }

    #[test]
    fn test_size_limit_from_file() {
        let file = write_temp(SCENARIO_A.as_bytes());
        let loader = PolicyLoader::new(LoaderOptions {
            limits: PolicyLimits {
                max_document_size: 16,
                ..PolicyLimits::default()
            },
        });
        let err = loader.load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            PolicyError::LimitExceeded { limit: 16, .. }
        ));
    }

    #[test]
    fn test_size_limit_from_str() {
        let loader = PolicyLoader::new(LoaderOptions {
            limits: PolicyLimits {
                max_document_size: 16,
                ..PolicyLimits::default()
            },
        });
        let err = loader.load_from_str(SCENARIO_A, "inline").unwrap_err();
        assert!(matches!(err, PolicyError::LimitExceeded { .. }));
    }

    #[test]
    fn test_loader_is_shareable_across_threads() {
        let loader = std::sync::Arc::new(PolicyLoader::with_defaults());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let loader = std::sync::Arc::clone(&loader);
                std::thread::spawn(move || loader.load_from_str(SCENARIO_A, "shared").unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().policy.profile_id(), "baseline-l1");
        }
    }
}
