//! Logging initialization for `hardval`.
//!
//! Verbosity only raises the level of `hardval`'s own spans and events;
//! dependencies stay at `warn`. Policy warnings (unknown keys and the like)
//! are emitted under [`WARNINGS_TARGET`] so JSON consumers can pick them out
//! of the stream. `HARDVAL_LOG_LEVEL` replaces the computed filter entirely.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use crate::cli::args::ColorChoice;

/// Target for non-fatal findings reported while loading a policy.
pub const WARNINGS_TARGET: &str = "hardval::warnings";

/// Environment variable that overrides the computed filter.
pub const LOG_LEVEL_ENV: &str = "HARDVAL_LOG_LEVEL";

/// Log output format (`--log-format` / `HARDVAL_LOG_FORMAT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact lines for a terminal, no targets.
    #[default]
    Human,
    /// Newline-delimited JSON with targets, never colored.
    Json,
}

impl LogFormat {
    /// Whether events carry their target.
    ///
    /// JSON output keeps it so [`WARNINGS_TARGET`] stays filterable.
    #[must_use]
    pub const fn shows_target(self) -> bool {
        matches!(self, Self::Json)
    }

    /// Whether ANSI colors are used for the given color choice.
    #[must_use]
    pub fn uses_ansi(self, color: ColorChoice) -> bool {
        match (self, color) {
            (Self::Json, _) | (Self::Human, ColorChoice::Never) => false,
            (Self::Human, ColorChoice::Always) => true,
            (Self::Human, ColorChoice::Auto) => {
                std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
            }
        }
    }
}

/// Filter directives for a verbosity level when `HARDVAL_LOG_LEVEL` is unset.
///
/// - 0 → `warn`
/// - 1 → `info`
/// - 2 → `debug`
/// - 3+ → `trace`
#[must_use]
pub fn default_directives(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("warn,hardval={level}")
}

/// Initializes the global tracing subscriber.
///
/// Uses `try_init()` so calling this more than once (e.g. in tests) is safe.
pub fn init_logging(format: LogFormat, verbosity: u8, color: ColorChoice) {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(format.uses_ansi(color))
        .with_target(format.shows_target())
        .with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Human => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_scopes_only_this_crate() {
        assert_eq!(default_directives(0), "warn,hardval=warn");
        assert_eq!(default_directives(1), "warn,hardval=info");
        assert_eq!(default_directives(2), "warn,hardval=debug");
        assert_eq!(default_directives(3), "warn,hardval=trace");
        assert_eq!(default_directives(u8::MAX), "warn,hardval=trace");
    }

    #[test]
    fn directives_parse_as_filter() {
        for verbosity in 0..4 {
            assert!(EnvFilter::try_new(default_directives(verbosity)).is_ok());
        }
    }

    #[test]
    fn warnings_target_is_under_crate_directive() {
        assert!(WARNINGS_TARGET.starts_with("hardval::"));
    }

    #[test]
    fn json_keeps_targets_and_drops_color() {
        assert!(LogFormat::Json.shows_target());
        assert!(!LogFormat::Human.shows_target());
        assert!(!LogFormat::Json.uses_ansi(ColorChoice::Always));
        assert!(LogFormat::Human.uses_ansi(ColorChoice::Always));
        assert!(!LogFormat::Human.uses_ansi(ColorChoice::Never));
    }

    #[test]
    fn init_logging_does_not_panic() {
        init_logging(LogFormat::Human, 0, ColorChoice::Never);
        init_logging(LogFormat::Json, 3, ColorChoice::Never);
    }
}
