pub mod commands;
pub mod check;
pub mod serve;
pub mod settings;
pub mod validate;

pub use commands::{Cli, Commands};

use std::path::Path;
use crate::config::{parse_config, ExemptorConfig};
use crate::errors::ExemptorError;

/// Load the configuration file if one was given.
pub(crate) async fn load_optional_config(
    path: Option<&str>,
) -> Result<Option<ExemptorConfig>, ExemptorError> {
    match path {
        Some(p) => Ok(Some(parse_config(Path::new(p)).await?)),
        None => Ok(None),
    }
}
