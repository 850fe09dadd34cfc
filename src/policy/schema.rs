//! Policy value types
//!
//! A `Policy` is built exactly once by the loader and never changes after
//! that. Fields are private; everything downstream reads through accessors.

use serde::Serialize;
use serde_json::{Map, Value};

/// Default severity for requirements that do not declare one.
pub const DEFAULT_SEVERITY: &str = "low";

// ============================================================================
// Policy
// ============================================================================

/// A validated hardening policy.
///
/// Invariants held by every value returned from the loader:
/// - `profile_id` is non-empty
/// - `requirements` is non-empty and in document order
/// - requirement ids are non-empty and unique
/// - every requirement's check carries a `type` entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Policy {
    profile_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    requirements: Vec<Requirement>,
}

impl Policy {
    pub(crate) const fn new(
        profile_id: String,
        profile_version: Option<String>,
        target: Option<String>,
        requirements: Vec<Requirement>,
    ) -> Self {
        Self {
            profile_id,
            profile_version,
            target,
            requirements,
        }
    }

    /// Profile identifier (`profile.id`).
    #[must_use]
    pub fn profile_id(&self) -> &str {
        &self.profile_id
    }

    /// Profile version (`profile.version`), if declared.
    #[must_use]
    pub fn profile_version(&self) -> Option<&str> {
        self.profile_version.as_deref()
    }

    /// Intended target system (`profile.target`), if declared.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Requirements in document order.
    #[must_use]
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Looks up a requirement by id.
    #[must_use]
    pub fn requirement(&self, id: &str) -> Option<&Requirement> {
        self.requirements.iter().find(|r| r.id == id)
    }

    /// Number of requirements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.requirements.len()
    }

    /// Always `false` for a loaded policy.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }
}

impl<'a> IntoIterator for &'a Policy {
    type Item = &'a Requirement;
    type IntoIter = std::slice::Iter<'a, Requirement>;

    fn into_iter(self) -> Self::IntoIter {
        self.requirements.iter()
    }
}

// ============================================================================
// Requirement
// ============================================================================

/// A single checkable hardening rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Requirement {
    id: String,
    title: String,
    severity: String,
    check: CheckSpec,
}

impl Requirement {
    pub(crate) const fn new(id: String, title: String, severity: String, check: CheckSpec) -> Self {
        Self {
            id,
            title,
            severity,
            check,
        }
    }

    /// Requirement identifier, unique within its policy.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable title; empty when the document omits it.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Severity label; `"low"` when the document omits it.
    ///
    /// Any label is accepted.
    #[must_use]
    pub fn severity(&self) -> &str {
        &self.severity
    }

    /// Check specification handed to the check-execution engine.
    #[must_use]
    pub const fn check(&self) -> &CheckSpec {
        &self.check
    }
}

// ============================================================================
// CheckSpec
// ============================================================================

/// Type-tagged check description.
///
/// Only the presence of `type` is guaranteed. Everything else belongs to the
/// check implementation that `type` selects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CheckSpec(Map<String, Value>);

impl CheckSpec {
    /// Key that selects the check implementation.
    pub const TYPE_KEY: &'static str = "type";

    /// Wraps a mapping, returning `None` if it has no `type` entry.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Option<Self> {
        fields.contains_key(Self::TYPE_KEY).then_some(Self(fields))
    }

    /// The `type` tag, when it is a string.
    #[must_use]
    pub fn check_type(&self) -> Option<&str> {
        self.0.get(Self::TYPE_KEY).and_then(Value::as_str)
    }

    /// Reads a check-specific field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The full mapping, `type` included.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}
