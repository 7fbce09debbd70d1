use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account as seen by everything outside the store.
/// The password digest never leaves the database layer, so there is no field for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: Uuid,
    pub username: String,
    pub email: String,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// A short text post owned by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub view_id: Uuid,
    pub title: String,
    pub paragraph: String,
    pub user_id: Uuid,
    pub public: bool,
    pub created_at: DateTime<Utc>,
}
