//! ludex-storage: SQLite persistence layer for Ludex.
//!
//! Uses rusqlite with bundled SQLite, WAL mode, and embedded versioned
//! migrations. Entity and junction operations take a plain
//! `&rusqlite::Connection` so the sync engine can run them inside one
//! transaction (`Transaction` derefs to `Connection`).

use ludex_core::LudexError;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;

pub mod entities;
mod migrations;
pub mod relations;

/// SQLite-backed store for the normalized game/studio/publisher/designer
/// schema.
///
/// Wraps `rusqlite::Connection` in a `Mutex` to satisfy `Send + Sync`; a
/// sync run holds the guard for its whole duration.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Get a lock on the underlying connection.
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("Store mutex poisoned")
    }

    /// Open (or create) a Ludex database at the given path.
    pub fn open(path: &Path) -> Result<Self, LudexError> {
        let conn = Connection::open(path).map_err(|e| LudexError::Storage(e.to_string()))?;

        // WAL mode for crash safety of the single sync transaction
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| LudexError::Storage(e.to_string()))?;
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| LudexError::Storage(e.to_string()))?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(|e| LudexError::Storage(e.to_string()))?;
        conn.busy_timeout(std::time::Duration::from_secs(5))
            .map_err(|e| LudexError::Storage(e.to_string()))?;

        migrations::run_migrations(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, LudexError> {
        let conn = Connection::open_in_memory().map_err(|e| LudexError::Storage(e.to_string()))?;
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| LudexError::Storage(e.to_string()))?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// Row counts per table, for the `stats` command.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreCounts {
    pub games: usize,
    pub studios: usize,
    pub publishers: usize,
    pub designers: usize,
    pub game_developers: usize,
    pub game_publishers: usize,
    pub publisher_studios: usize,
    pub studio_relations: usize,
}

/// Count rows in every entity and junction table.
pub fn counts(conn: &Connection) -> Result<StoreCounts, LudexError> {
    let count = |table: &str| -> Result<usize, LudexError> {
        let n: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })
            .map_err(|e| LudexError::Storage(e.to_string()))?;
        Ok(n as usize)
    };

    Ok(StoreCounts {
        games: count("games")?,
        studios: count("studios")?,
        publishers: count("publishers")?,
        designers: count("designers")?,
        game_developers: count("game_developers")?,
        game_publishers: count("game_publishers")?,
        publisher_studios: count("publisher_studios")?,
        studio_relations: count("studio_relations")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_in_memory_creates_schema() {
        let store = Store::open_in_memory().unwrap();
        let conn = store.connection();
        let counts = counts(&conn).unwrap();
        assert_eq!(counts.games, 0);
        assert_eq!(counts.studio_relations, 0);
    }

    #[test]
    fn open_on_disk_is_reopenable() {
        let dir = std::env::temp_dir().join("ludex_store_open_test");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ludex.db");

        {
            let store = Store::open(&path).unwrap();
            drop(store.connection());
        }
        let store = Store::open(&path).unwrap();
        let conn = store.connection();
        assert_eq!(counts(&conn).unwrap().games, 0);
        drop(conn);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
