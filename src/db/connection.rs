use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use crate::errors::ExemptorError;

pub struct Database {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(path: &str) -> Result<Self, ExemptorError> {
        // Ensure parent directory exists
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| ExemptorError::Database(format!("Failed to open database: {}", e)))?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| ExemptorError::Database(format!("Failed to set pragmas: {}", e)))?;

        let db = Self { conn: Arc::new(Mutex::new(conn)) };
        db.initialize()?;
        Ok(db)
    }

    pub fn in_memory() -> Result<Self, ExemptorError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| ExemptorError::Database(format!("Failed to open in-memory db: {}", e)))?;
        let db = Self { conn: Arc::new(Mutex::new(conn)) };
        db.initialize()?;
        Ok(db)
    }

    fn initialize(&self) -> Result<(), ExemptorError> {
        let conn = self.lock()?;
        conn.execute_batch(super::schema::CREATE_TABLES)
            .map_err(|e| ExemptorError::Database(format!("Failed to create tables: {}", e)))?;
        Ok(())
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>, ExemptorError> {
        self.conn
            .lock()
            .map_err(|_| ExemptorError::Database("Connection mutex poisoned".into()))
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self { conn: self.conn.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_file_database_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("exemptor.db");
        let db = Database::new(path.to_str().unwrap()).unwrap();
        assert!(path.exists());
        assert_eq!(db.count_settings().unwrap(), 0);
    }

    #[test]
    fn test_clone_shares_connection() {
        let db = Database::in_memory().unwrap();
        let other = db.clone();
        db.set_setting("exemption.bug.0", "CVE-1").unwrap();
        assert_eq!(other.get_setting("exemption.bug.0").unwrap().as_deref(), Some("CVE-1"));
    }
}
