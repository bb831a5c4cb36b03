use std::path::Path;
use crate::cli::commands::ValidateArgs;
use crate::config::parse_config;
use crate::errors::ExemptorError;
use crate::exemptions::{ExemptionKind, ExemptionSet};

pub async fn handle_validate(args: ValidateArgs) -> Result<(), ExemptorError> {
    let config = parse_config(Path::new(&args.config)).await?;
    let set = ExemptionSet::from_configuration(&config.settings())?;

    println!("Configuration is valid: {}", args.config);
    println!(
        "Exemptions: {} bug, {} scope, {} unassessed",
        set.count(ExemptionKind::Bug),
        set.count(ExemptionKind::Scope),
        set.count(ExemptionKind::Unassessed),
    );
    Ok(())
}
