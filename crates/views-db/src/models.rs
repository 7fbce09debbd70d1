//! Database row types. These map directly to SQLite rows and are converted
//! into `views-types` models before leaving the crate, except where the
//! password digest is needed.

use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

use views_types::models::{Account, View};

use crate::StoreError;

pub const ACCOUNT_COLUMNS: &str = "account_id, username, email, password, email_verified, created_at";
pub const VIEW_COLUMNS: &str = "view_id, title, paragraph, user_id, public, created_at";

pub struct AccountRow {
    pub account_id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub email_verified: bool,
    pub created_at: String,
}

impl AccountRow {
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            account_id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password: row.get(3)?,
            email_verified: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl TryFrom<AccountRow> for Account {
    type Error = StoreError;

    fn try_from(row: AccountRow) -> Result<Self, StoreError> {
        Ok(Account {
            account_id: parse_id(&row.account_id)?,
            username: row.username,
            email: row.email,
            email_verified: row.email_verified,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

pub struct ViewRow {
    pub view_id: String,
    pub title: String,
    pub paragraph: String,
    pub user_id: String,
    pub public: bool,
    pub created_at: String,
}

impl ViewRow {
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            view_id: row.get(0)?,
            title: row.get(1)?,
            paragraph: row.get(2)?,
            user_id: row.get(3)?,
            public: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl TryFrom<ViewRow> for View {
    type Error = StoreError;

    fn try_from(row: ViewRow) -> Result<Self, StoreError> {
        Ok(View {
            view_id: parse_id(&row.view_id)?,
            title: row.title,
            paragraph: row.paragraph,
            user_id: parse_id(&row.user_id)?,
            public: row.public,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

fn parse_id(raw: &str) -> Result<Uuid, StoreError> {
    raw.parse()
        .map_err(|_| StoreError::Corrupt(format!("bad uuid '{}'", raw)))
}

/// Accepts RFC 3339 (what the schema writes) and SQLite's bare
/// `YYYY-MM-DD HH:MM:SS`, read as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc()))
        .map_err(|_| StoreError::Corrupt(format!("bad timestamp '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_timestamp_shapes() {
        let rfc = parse_timestamp("2024-05-01T10:20:30.123Z").unwrap();
        let bare = parse_timestamp("2024-05-01 10:20:30").unwrap();
        assert_eq!(rfc.timestamp(), bare.timestamp());
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn corrupt_id_is_reported() {
        let row = ViewRow {
            view_id: "nope".into(),
            title: "t".into(),
            paragraph: "p".into(),
            user_id: Uuid::new_v4().to_string(),
            public: true,
            created_at: "2024-05-01 10:20:30".into(),
        };
        assert!(matches!(View::try_from(row), Err(StoreError::Corrupt(_))));
    }
}
