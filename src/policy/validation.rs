//! Policy document validation
//!
//! Turns a parsed YAML tree into a `Policy`. Validation is a single pass in
//! document order and stops at the first violation; callers fix one problem
//! and reload. Unknown keys are not violations and only produce warnings.

use crate::error::PolicyError;
use crate::policy::loader::{LoadWarning, PolicyLimits};
use crate::policy::schema::{CheckSpec, DEFAULT_SEVERITY, Policy, Requirement};

use serde_yaml::{Mapping, Value};
use std::collections::HashSet;
use std::fmt::Write;

const ROOT_KEYS: &[&str] = &["profile", "requirements"];
const PROFILE_KEYS: &[&str] = &["id", "version", "target"];
const REQUIREMENT_KEYS: &[&str] = &["id", "title", "severity", "check"];

/// Maximum edit distance for "did you mean" suggestions.
const SUGGESTION_DISTANCE: usize = 3;

/// A validated policy together with the non-fatal findings.
#[derive(Debug)]
pub struct Validated {
    /// The validated policy.
    pub policy: Policy,
    /// Unknown-key warnings, in document order.
    pub warnings: Vec<LoadWarning>,
}

/// Policy document validator.
///
/// Holds only per-call state; a new one is created for each document.
#[derive(Debug)]
pub struct Validator<'a> {
    origin: &'a str,
    limits: &'a PolicyLimits,
    warnings: Vec<LoadWarning>,
}

impl<'a> Validator<'a> {
    /// Creates a validator for the document named `origin`.
    #[must_use]
    pub const fn new(origin: &'a str, limits: &'a PolicyLimits) -> Self {
        Self {
            origin,
            limits,
            warnings: Vec::new(),
        }
    }

    /// Validates a parsed document.
    ///
    /// # Errors
    ///
    /// Returns the first invariant violation found in document order.
    pub fn validate(mut self, root: &Value) -> Result<Validated, PolicyError> {
        let Some(root) = untagged(root).as_mapping() else {
            return Err(PolicyError::MalformedDocument {
                origin: self.origin.to_string(),
                line: None,
                message: format!(
                    "top-level value must be a mapping, found {}",
                    describe(root)
                ),
            });
        };
        self.check_unknown_keys(root, ROOT_KEYS, "");

        let (profile_id, profile_version, target) = self.validate_profile(root.get("profile"))?;
        let requirements = self.validate_requirements(root.get("requirements"))?;

        tracing::debug!(
            origin = self.origin,
            profile = %profile_id,
            requirements = requirements.len(),
            "policy validated"
        );

        Ok(Validated {
            policy: Policy::new(profile_id, profile_version, target, requirements),
            warnings: self.warnings,
        })
    }

    // ========================================================================
    // Profile
    // ========================================================================

    fn validate_profile(
        &mut self,
        profile: Option<&Value>,
    ) -> Result<(String, Option<String>, Option<String>), PolicyError> {
        let empty = Mapping::new();
        let profile = match profile.map(untagged) {
            None | Some(Value::Null) => &empty,
            Some(Value::Mapping(map)) => map,
            Some(_) => return Err(self.missing_profile_id()),
        };
        self.check_unknown_keys(profile, PROFILE_KEYS, "profile");

        let id = match text_field(profile, "id") {
            Ok(Some(id)) if !id.is_empty() => id,
            _ => return Err(self.missing_profile_id()),
        };
        let version = text_field(profile, "version").map_err(|NotText| PolicyError::InvalidField {
            location: "profile.version".to_string(),
            expected: "a string".to_string(),
        })?;
        let target = text_field(profile, "target").map_err(|NotText| PolicyError::InvalidField {
            location: "profile.target".to_string(),
            expected: "a string".to_string(),
        })?;

        Ok((id, version, target))
    }

    fn missing_profile_id(&self) -> PolicyError {
        PolicyError::MissingProfileId {
            origin: self.origin.to_string(),
        }
    }

    // ========================================================================
    // Requirements
    // ========================================================================

    fn validate_requirements(
        &mut self,
        requirements: Option<&Value>,
    ) -> Result<Vec<Requirement>, PolicyError> {
        let entries = match requirements.map(untagged) {
            None | Some(Value::Null) => return Err(self.invalid_requirements("missing")),
            Some(Value::Sequence(seq)) if seq.is_empty() => {
                return Err(self.invalid_requirements("list is empty"));
            }
            Some(Value::Sequence(seq)) => seq,
            Some(other) => {
                return Err(self.invalid_requirements(&format!(
                    "expected a list, found {}",
                    describe(other)
                )));
            }
        };

        if entries.len() > self.limits.max_requirements {
            return Err(PolicyError::LimitExceeded {
                what: "requirement count",
                actual: entries.len(),
                limit: self.limits.max_requirements,
            });
        }

        let mut seen = HashSet::with_capacity(entries.len());
        let mut result = Vec::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            let Some(entry) = untagged(entry).as_mapping() else {
                return Err(PolicyError::MissingRequirementId { index });
            };

            let id = match text_field(entry, "id") {
                Ok(Some(id)) if !id.is_empty() => id,
                _ => return Err(PolicyError::MissingRequirementId { index }),
            };
            if seen.contains(&id) {
                return Err(PolicyError::DuplicateRequirementId { id });
            }

            let check = validate_check(&id, entry.get("check"))?;
            let path = format!("requirements[{index}]");
            let title = text_field(entry, "title")
                .map_err(|NotText| invalid_text(&path, "title"))?
                .unwrap_or_default();
            let severity = text_field(entry, "severity")
                .map_err(|NotText| invalid_text(&path, "severity"))?
                .unwrap_or_else(|| DEFAULT_SEVERITY.to_string());
            self.check_unknown_keys(entry, REQUIREMENT_KEYS, &path);

            seen.insert(id.clone());
            result.push(Requirement::new(id, title, severity, check));
        }

        Ok(result)
    }

    fn invalid_requirements(&self, reason: &str) -> PolicyError {
        PolicyError::EmptyOrInvalidRequirements {
            origin: self.origin.to_string(),
            reason: reason.to_string(),
        }
    }

    // ========================================================================
    // Warnings
    // ========================================================================

    fn check_unknown_keys(&mut self, map: &Mapping, known: &[&'static str], path: &str) {
        for key in map.keys() {
            let name = key_to_string(key);
            if known.contains(&name.as_str()) {
                continue;
            }

            let mut message = format!("Unknown key '{name}'");
            if let Some(suggestion) = suggest_key(&name, known) {
                let _ = write!(message, ", did you mean '{suggestion}'?");
            }
            let location = if path.is_empty() {
                name
            } else {
                format!("{path}.{name}")
            };
            self.warnings.push(LoadWarning {
                message,
                location: Some(location),
            });
        }
    }
}

/// Validates a requirement's `check` entry and converts it to a `CheckSpec`.
fn validate_check(id: &str, check: Option<&Value>) -> Result<CheckSpec, PolicyError> {
    let invalid = |reason: &str| PolicyError::InvalidCheckSpec {
        id: id.to_string(),
        reason: reason.to_string(),
    };

    let map = match check.map(untagged) {
        None | Some(Value::Null) => return Err(invalid("missing check")),
        Some(Value::Mapping(map)) => map,
        Some(other) => {
            return Err(invalid(&format!(
                "expected a mapping, found {}",
                describe(other)
            )));
        }
    };
    if !map.contains_key(CheckSpec::TYPE_KEY) {
        return Err(invalid("missing check.type"));
    }

    let fields = mapping_to_json(map).map_err(|KeyCollision(path)| {
        invalid(&format!("duplicate key '{path}' after conversion to text"))
    })?;
    CheckSpec::new(fields).ok_or_else(|| invalid("missing check.type"))
}

// ============================================================================
// Value helpers
// ============================================================================

/// Marker for a text field that holds a sequence or mapping.
struct NotText;

/// Reads a text field, rendering scalars to their textual form.
///
/// `null` and absent keys both read as `None`.
fn text_field(map: &Mapping, key: &str) -> Result<Option<String>, NotText> {
    match map.get(key).map(untagged) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(NotText),
    }
}

fn invalid_text(path: &str, field: &str) -> PolicyError {
    PolicyError::InvalidField {
        location: format!("{path}.{field}"),
        expected: "a string".to_string(),
    }
}

/// Strips YAML tags, which carry no meaning for policy documents.
fn untagged(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untagged(&tagged.value),
        other => other,
    }
}

fn describe(value: &Value) -> &'static str {
    match untagged(value) {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn suggest_key(input: &str, known: &[&'static str]) -> Option<&'static str> {
    known
        .iter()
        .map(|k| (*k, strsim::damerau_levenshtein(input, k)))
        .filter(|(_, dist)| *dist <= SUGGESTION_DISTANCE)
        .min_by_key(|(_, dist)| *dist)
        .map(|(k, _)| k)
}

fn key_to_string(key: &Value) -> String {
    match untagged(key) {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map_or_else(|_| format!("{other:?}"), |s| s.trim_end().to_string()),
    }
}

/// Two distinct YAML keys that render to the same text, e.g. `1` and `'1'`.
///
/// Holds the dotted path of the colliding key.
#[derive(Debug)]
struct KeyCollision(String);

/// Converts a YAML mapping to a JSON object without losing entries.
fn mapping_to_json(
    map: &Mapping,
) -> Result<serde_json::Map<String, serde_json::Value>, KeyCollision> {
    let mut object = serde_json::Map::with_capacity(map.len());
    for (k, v) in map {
        let key = key_to_string(k);
        let value =
            yaml_to_json(v).map_err(|KeyCollision(inner)| KeyCollision(format!("{key}.{inner}")))?;
        if object.insert(key.clone(), value).is_some() {
            return Err(KeyCollision(key));
        }
    }
    Ok(object)
}

/// Converts a `serde_yaml::Value` to `serde_json::Value`.
fn yaml_to_json(yaml: &Value) -> Result<serde_json::Value, KeyCollision> {
    let json = match yaml {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                serde_json::Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                serde_json::Value::Number(u.into())
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map_or(serde_json::Value::Null, serde_json::Value::Number)
            } else {
                serde_json::Value::Null
            }
        }
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Sequence(seq) => serde_json::Value::Array(
            seq.iter()
                .enumerate()
                .map(|(i, item)| {
                    yaml_to_json(item)
                        .map_err(|KeyCollision(inner)| KeyCollision(format!("[{i}].{inner}")))
                })
                .collect::<Result<_, _>>()?,
        ),
        Value::Mapping(map) => serde_json::Value::Object(mapping_to_json(map)?),
        Value::Tagged(tagged) => yaml_to_json(&tagged.value)?,
    };
    Ok(json)
}
