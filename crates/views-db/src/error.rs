use rusqlite::{ErrorCode, ffi};
use thiserror::Error;

/// Store failures the services need to tell apart. Anything else is carried
/// as the raw sqlite error for logging.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated")]
    Conflict,

    #[error("referenced row does not exist")]
    MissingReference,

    #[error("row not found")]
    NotFound,

    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error("database lock poisoned")]
    Poisoned,

    #[error("sqlite: {0}")]
    Sqlite(rusqlite::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        if matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            return Self::NotFound;
        }

        let constraint = match &e {
            rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation => {
                Some(err.extended_code)
            }
            _ => None,
        };

        match constraint {
            Some(ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY) => Self::Conflict,
            Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => Self::MissingReference,
            _ => Self::Sqlite(e),
        }
    }
}
