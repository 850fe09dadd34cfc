//! Implements `validate`.

use std::path::Path;

use serde::Serialize;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::error::{HardvalError, PolicyError};
use crate::policy::{LoadResult, PolicyLoader};

/// Per-file entry of the JSON report.
#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    requirements: Option<usize>,
    warnings: Vec<WarningReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorReport>,
}

#[derive(Debug, Serialize)]
struct WarningReport {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorReport {
    kind: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    requirement_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct Summary {
    valid: usize,
    invalid: usize,
}

#[derive(Debug, Serialize)]
struct Report {
    files: Vec<FileReport>,
    summary: Summary,
}

impl FileReport {
    fn new(path: &Path, outcome: Result<LoadResult, PolicyError>) -> Self {
        let file = path.display().to_string();
        match outcome {
            Ok(result) => Self {
                file,
                valid: true,
                profile_id: Some(result.policy.profile_id().to_string()),
                requirements: Some(result.policy.len()),
                warnings: result
                    .warnings
                    .into_iter()
                    .map(|w| WarningReport {
                        message: w.message,
                        location: w.location,
                    })
                    .collect(),
                error: None,
            },
            Err(e) => Self {
                file,
                valid: false,
                profile_id: None,
                requirements: None,
                warnings: Vec::new(),
                error: Some(ErrorReport {
                    kind: e.kind(),
                    message: e.to_string(),
                    requirement_id: e.requirement_id().map(ToString::to_string),
                }),
            },
        }
    }
}

/// Validate policy files.
///
/// Human output stops at the first invalid file. JSON output reports every
/// file and then fails if any of them was invalid.
///
/// # Errors
///
/// Returns the load error of the first invalid file (human output), or
/// `ValidationFailed` (JSON output).
pub fn run(args: &ValidateArgs, quiet: bool) -> Result<(), HardvalError> {
    let loader = PolicyLoader::with_defaults();

    match args.format {
        OutputFormat::Human => {
            for path in &args.files {
                tracing::info!(file = %path.display(), "validating policy");
                let result = loader.load(path)?;

                if !quiet {
                    println!(
                        "OK {} (profile {}, {} requirement(s))",
                        path.display(),
                        result.policy.profile_id(),
                        result.policy.len()
                    );
                }
            }
            Ok(())
        }
        OutputFormat::Json => {
            let files: Vec<FileReport> = args
                .files
                .iter()
                .map(|path| {
                    tracing::info!(file = %path.display(), "validating policy");
                    FileReport::new(path, loader.load(path))
                })
                .collect();
            let invalid = files.iter().filter(|f| !f.valid).count();
            let report = Report {
                summary: Summary {
                    valid: files.len() - invalid,
                    invalid,
                },
                files,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);

            if invalid > 0 {
                return Err(HardvalError::ValidationFailed { count: invalid });
            }
            Ok(())
        }
    }
}
