use crate::api::build_exemptions;
use crate::cli::commands::{SettingsAction, SettingsArgs};
use crate::cli::load_optional_config;
use crate::config::Settings;
use crate::db::{setting_key, Database};
use crate::errors::ExemptorError;
use crate::exemptions::ExemptionSet;
use tracing::info;

pub async fn handle_settings(args: SettingsArgs) -> Result<(), ExemptorError> {
    let db = Database::new(&args.db)?;
    let config = load_optional_config(args.config.as_deref()).await?;
    let base = config.as_ref().map(|c| c.settings()).unwrap_or_default();

    match args.action {
        SettingsAction::List => {
            let mut entries: Vec<_> = db.load_settings()?.into_iter().collect();
            entries.sort();
            for (key, value) in entries {
                println!("{} = {}", key, value);
            }
        }
        SettingsAction::Get { key } => match db.get_setting(setting_key(&key)?)? {
            Some(value) => println!("{}", value),
            None => return Err(ExemptorError::Config(format!("Setting not found: {}", key))),
        },
        SettingsAction::Set { key, value } => {
            let set = store_setting(&db, &base, &key, &value)?;
            info!(key = %key.trim(), exemptions = set.len(), "Setting stored");
        }
        SettingsAction::Delete { key } => {
            let set = remove_setting(&db, &base, &key)?;
            info!(key = %key.trim(), exemptions = set.len(), "Setting deleted");
        }
    }
    Ok(())
}

/// Store `key = value` if the configuration file's settings overlaid with the
/// resulting store still build a valid exemption set.
pub fn store_setting(
    db: &Database,
    base: &Settings,
    key: &str,
    value: &str,
) -> Result<ExemptionSet, ExemptorError> {
    let key = setting_key(key)?;
    let mut candidate = db.load_settings()?;
    candidate.insert(key.to_string(), value.to_string());
    let set = build_exemptions(base, &candidate)?;

    db.set_setting(key, value)?;
    Ok(set)
}

/// Remove `key` under the same validation as [`store_setting`].
pub fn remove_setting(
    db: &Database,
    base: &Settings,
    key: &str,
) -> Result<ExemptionSet, ExemptorError> {
    let key = setting_key(key)?;
    let mut candidate = db.load_settings()?;
    if candidate.remove(key).is_none() {
        return Err(ExemptorError::Config(format!("Setting not found: {}", key)));
    }
    let set = build_exemptions(base, &candidate)?;

    db.delete_setting(key)?;
    Ok(set)
}
