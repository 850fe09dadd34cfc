//! Policy module
//!
//! Loading and validation of hardening policy documents. A policy is a
//! profile (id, version, target) plus an ordered list of requirements, each
//! carrying a type-tagged check for the check-execution engine.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{
    LoadResult, LoadWarning, LoaderOptions, PolicyLimits, PolicyLoader, load_policy,
    load_policy_from_str,
};
pub use schema::{CheckSpec, DEFAULT_SEVERITY, Policy, Requirement};
pub use validation::{Validated, Validator};
