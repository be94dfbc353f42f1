use rusqlite::{Connection, OptionalExtension, Result};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub struct Database {
    pub conn: Mutex<Connection>,
}

impl Database {
    pub fn new(db_path: &Path) -> Result<Self> {
        if let Some(dir) = db_path.parent() {
            if let Err(e) = std::fs::create_dir_all(dir) {
                tracing::warn!(dir = %dir.display(), error = %e, "failed to create data directory");
            }
        }

        let conn = Connection::open(db_path)?;

        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Database {
            conn: Mutex::new(Connection::open_in_memory()?),
        })
    }

    pub fn initialize(&self) -> Result<()> {
        let conn = self.lock();

        conn.execute_batch(
            "
            -- One JSON document per named slot
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;

        // Run migrations for existing databases (pass connection to avoid deadlock)
        Self::migrate_conn(&conn)?;

        Ok(())
    }

    fn migrate_conn(conn: &Connection) -> Result<()> {
        let columns: Vec<String> = conn
            .prepare("PRAGMA table_info(kv_store)")?
            .query_map([], |row| row.get::<_, String>(1))?
            .filter_map(|r| r.ok())
            .collect();

        if !columns.contains(&"updated_at".to_string()) {
            conn.execute("ALTER TABLE kv_store ADD COLUMN updated_at DATETIME", [])?;
        }

        Ok(())
    }

    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock();
        conn.query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()
    }

    pub fn set_value(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    // A poisoned lock only means another caller panicked mid-statement; the
    // connection itself is still usable.
    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        db.initialize().unwrap();

        let conn = db.conn.lock().unwrap();
        let columns: Vec<String> = conn
            .prepare("PRAGMA table_info(kv_store)")
            .unwrap()
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();
        assert_eq!(columns, vec!["key", "value", "updated_at"]);
    }

    #[test]
    fn test_set_value_overwrites() {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();

        assert_eq!(db.get_value("slot").unwrap(), None);
        db.set_value("slot", "[]").unwrap();
        db.set_value("slot", "[1]").unwrap();
        assert_eq!(db.get_value("slot").unwrap(), Some("[1]".to_string()));

        let count: i32 = db
            .conn
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_file_database_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("pos.db");

        {
            let db = Database::new(&path).unwrap();
            db.initialize().unwrap();
            db.set_value("alshawaya_current_business_day", "\"2024-03-01\"")
                .unwrap();
        }

        let db = Database::new(&path).unwrap();
        db.initialize().unwrap();
        assert_eq!(
            db.get_value("alshawaya_current_business_day").unwrap(),
            Some("\"2024-03-01\"".to_string())
        );
    }
}
