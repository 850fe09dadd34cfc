//! `hardval` - Hardening policy loader and validator
//!
//! This library reads a hardening/compliance policy from a YAML document and
//! validates it into an immutable [`Policy`] for a check-execution engine.

pub mod cli;
pub mod error;
pub mod observability;
pub mod policy;

pub use error::PolicyError;
pub use policy::{CheckSpec, Policy, Requirement, load_policy, load_policy_from_str};
