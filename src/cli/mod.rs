//! Command-line interface
//!
//! Argument definitions and command handlers for the `hardval` binary.

pub mod args;
pub mod commands;
