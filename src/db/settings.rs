use std::collections::HashMap;

use chrono::Utc;
use tracing::debug;

use crate::errors::ExemptorError;
use super::Database;

/// Canonical form of a settings key: surrounding whitespace removed, never blank.
///
/// Keys must be normalised before a candidate set is validated so that the
/// validated keys are the stored keys.
pub fn setting_key(key: &str) -> Result<&str, ExemptorError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ExemptorError::Config("Setting key must not be empty".into()));
    }
    Ok(key)
}

impl Database {
    pub fn get_setting(&self, key: &str) -> Result<Option<String>, ExemptorError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT value FROM settings WHERE key = ?1")
            .map_err(|e| ExemptorError::Database(format!("Query failed: {}", e)))?;

        let row = stmt.query_row(rusqlite::params![key], |row: &rusqlite::Row| {
            row.get::<_, String>(0)
        });
        match row {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(ExemptorError::Database(format!("Query error: {}", e))),
        }
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), ExemptorError> {
        let key = setting_key(key)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![key, value, Utc::now().to_rfc3339()],
        ).map_err(|e| ExemptorError::Database(format!("Insert failed: {}", e)))?;
        debug!(key, "Stored setting");
        Ok(())
    }

    /// Store several settings atomically.
    pub fn set_settings(&self, entries: &HashMap<String, String>) -> Result<(), ExemptorError> {
        for key in entries.keys() {
            setting_key(key)?;
        }
        let mut conn = self.lock()?;
        let tx = conn.transaction()
            .map_err(|e| ExemptorError::Database(format!("Transaction failed: {}", e)))?;
        let now = Utc::now().to_rfc3339();
        for (key, value) in entries {
            tx.execute(
                "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![key.trim(), value, now],
            ).map_err(|e| ExemptorError::Database(format!("Insert failed: {}", e)))?;
        }
        tx.commit()
            .map_err(|e| ExemptorError::Database(format!("Commit failed: {}", e)))?;
        Ok(())
    }

    /// Returns false if the key did not exist.
    pub fn delete_setting(&self, key: &str) -> Result<bool, ExemptorError> {
        let conn = self.lock()?;
        let affected = conn.execute("DELETE FROM settings WHERE key = ?1", rusqlite::params![key])
            .map_err(|e| ExemptorError::Database(format!("Delete failed: {}", e)))?;
        Ok(affected > 0)
    }

    pub fn count_settings(&self) -> Result<usize, ExemptorError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))
            .map_err(|e| ExemptorError::Database(format!("Query error: {}", e)))?;
        Ok(count as usize)
    }

    pub fn load_settings(&self) -> Result<HashMap<String, String>, ExemptorError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT key, value FROM settings")
            .map_err(|e| ExemptorError::Database(format!("Query failed: {}", e)))?;

        let rows = stmt.query_map([], |row: &rusqlite::Row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        }).map_err(|e| ExemptorError::Database(format!("Query error: {}", e)))?;

        let mut settings = HashMap::new();
        for row in rows {
            let (key, value) = row
                .map_err(|e| ExemptorError::Database(format!("Row error: {}", e)))?;
            settings.insert(key, value);
        }
        Ok(settings)
    }

    pub fn get_all_settings(&self) -> Result<serde_json::Value, ExemptorError> {
        let settings = self.load_settings()?;
        let map: serde_json::Map<String, serde_json::Value> = settings
            .into_iter()
            .map(|(k, v)| (k, serde_json::Value::String(v)))
            .collect();
        Ok(serde_json::Value::Object(map))
    }
}
