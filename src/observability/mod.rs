//! Observability module
//!
//! Logging infrastructure for `hardval`.

pub mod logging;

pub use logging::{LOG_LEVEL_ENV, LogFormat, WARNINGS_TARGET, init_logging};
