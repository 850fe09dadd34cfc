//! Shared integration-test helpers for running the `hardval` binary and
//! locating YAML fixtures.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

/// Helpers for invoking the built `hardval` binary.
pub struct HardvalProcess;

impl HardvalProcess {
    /// Runs `hardval` with the given arguments and waits for it to exit.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_command(args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_hardval"))
            .args(args)
            .env_remove("HARDVAL_LOG_LEVEL")
            .env_remove("HARDVAL_LOG_FORMAT")
            .env("NO_COLOR", "1")
            .output()
            .expect("failed to run hardval")
    }

    /// Absolute path of a file under `tests/fixtures`.
    pub fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    /// Path of a fixture as a `String`, for passing on the command line.
    pub fn fixture_arg(name: &str) -> String {
        Self::fixture_path(name).display().to_string()
    }
}
