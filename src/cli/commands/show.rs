//! Implements `show`.

use crate::cli::args::{ShowArgs, ShowFormat};
use crate::error::HardvalError;
use crate::policy::PolicyLoader;

/// Load a policy and print the validated value.
///
/// # Errors
///
/// Returns the load error if the policy is invalid, or a serialization
/// error if rendering fails.
pub fn run(args: &ShowArgs) -> Result<(), HardvalError> {
    tracing::info!(file = %args.file.display(), "loading policy");

    let result = PolicyLoader::with_defaults().load(&args.file)?;

    let rendered = match args.format {
        ShowFormat::Json => serde_json::to_string_pretty(&result.policy)?,
        ShowFormat::Yaml => serde_yaml::to_string(&result.policy)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}
