pub mod error;
pub mod migrations;
pub mod models;
pub mod queries;

pub use error::StoreError;

use anyhow::Result;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;

const READER_POOL_SIZE: usize = 4;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite handle with one writer and a small round-robin pool of read-only
/// connections. In-memory databases have no readers; every call goes
/// through the writer.
pub struct Database {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    reader_idx: AtomicUsize,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if path.as_os_str() == ":memory:" {
            return Self::open_in_memory();
        }

        let writer = Connection::open(path)?;

        // WAL mode for concurrent reads
        writer.pragma_update(None, "journal_mode", "WAL")?;
        writer.pragma_update(None, "foreign_keys", "ON")?;
        writer.busy_timeout(BUSY_TIMEOUT)?;

        migrations::run(&writer)?;

        let mut readers = Vec::with_capacity(READER_POOL_SIZE);
        for _ in 0..READER_POOL_SIZE {
            let conn = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            conn.busy_timeout(BUSY_TIMEOUT)?;
            readers.push(Mutex::new(conn));
        }

        info!(
            "Database opened at {} (1 writer + {} readers)",
            path.display(),
            READER_POOL_SIZE
        );
        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            reader_idx: AtomicUsize::new(0),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&conn)?;

        info!("In-memory database opened");
        Ok(Self {
            writer: Mutex::new(conn),
            readers: Vec::new(),
            reader_idx: AtomicUsize::new(0),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        if self.readers.is_empty() {
            return self.with_conn_mut(f);
        }

        let idx = self.reader_idx.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let conn = self.readers[idx].lock().map_err(|_| StoreError::Poisoned)?;
        f(&conn)
    }

    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        let conn = self.writer.lock().map_err(|_| StoreError::Poisoned)?;
        f(&conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use views_types::api::NewView;

    fn file_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("views.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn file_database_uses_reader_pool() {
        let (_dir, db) = file_db();
        assert_eq!(db.readers.len(), READER_POOL_SIZE);

        let mode: String = db
            .with_conn_mut(|conn| Ok(conn.pragma_query_value(None, "journal_mode", |r| r.get(0))?))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[test]
    fn readers_see_committed_writes() {
        let (_dir, db) = file_db();
        let account = db
            .create_account(Uuid::new_v4(), "alice", "alice@x.com", "$argon2id$stub")
            .unwrap();

        // Enough reads to cycle through every pooled connection.
        for _ in 0..READER_POOL_SIZE {
            let row = db.get_account_by_username("alice").unwrap().unwrap();
            assert_eq!(row.account_id, account.account_id.to_string());
            assert_eq!(db.get_account(account.account_id).unwrap(), Some(account.clone()));
        }
    }

    #[test]
    fn readers_are_read_only() {
        let (_dir, db) = file_db();
        let result = db.with_conn(|conn| {
            conn.execute("DELETE FROM accounts", [])?;
            Ok(())
        });
        assert!(result.is_err());
    }

    #[test]
    fn file_writer_enforces_foreign_keys_and_deletes() {
        let (_dir, db) = file_db();
        let orphan = NewView {
            title: "t".into(),
            paragraph: "p".into(),
            owner_id: Uuid::new_v4(),
            public: true,
        };
        assert!(matches!(
            db.create_view(Uuid::new_v4(), &orphan),
            Err(StoreError::MissingReference)
        ));

        let account = db
            .create_account(Uuid::new_v4(), "bob", "bob@x.com", "$argon2id$stub")
            .unwrap();
        let view = db
            .create_view(
                Uuid::new_v4(),
                &NewView {
                    owner_id: account.account_id,
                    ..orphan
                },
            )
            .unwrap();

        db.delete_account(account.account_id).unwrap();
        assert_eq!(db.get_account(account.account_id).unwrap(), None);
        assert_eq!(db.get_view(view.view_id).unwrap(), None);
        assert!(matches!(
            db.delete_account(account.account_id),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn reopening_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("views.db");

        let id = {
            let db = Database::open(&path).unwrap();
            db.create_account(Uuid::new_v4(), "carol", "carol@x.com", "$argon2id$stub")
                .unwrap()
                .account_id
        };

        let db = Database::open(&path).unwrap();
        assert_eq!(db.get_account(id).unwrap().unwrap().username, "carol");
    }
}
