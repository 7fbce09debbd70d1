use rusqlite::{Connection, OptionalExtension, Params};
use uuid::Uuid;

use views_types::api::NewView;
use views_types::models::{Account, View};

use crate::models::{ACCOUNT_COLUMNS, AccountRow, VIEW_COLUMNS, ViewRow};
use crate::{Database, StoreError};

impl Database {
    // -- Accounts --

    pub fn create_account(
        &self,
        id: Uuid,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Account, StoreError> {
        self.with_conn_mut(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO accounts (account_id, username, email, password)
                     VALUES (?1, ?2, ?3, ?4)
                     RETURNING {ACCOUNT_COLUMNS}"
                ),
                (id.to_string(), username, email, password_hash),
                AccountRow::from_row,
            )?;
            row.try_into()
        })
    }

    pub fn get_account(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        self.with_conn(|conn| {
            query_account(conn, "account_id", &id.to_string())?
                .map(Account::try_from)
                .transpose()
        })
    }

    /// Raw row lookup, digest included. Only the login path should need this.
    pub fn get_account_by_username(&self, username: &str) -> Result<Option<AccountRow>, StoreError> {
        self.with_conn(|conn| query_account(conn, "username", username))
    }

    pub fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY created_at, rowid"
            ))?;
            let rows = stmt
                .query_map([], AccountRow::from_row)?
                .collect::<Result<Vec<_>, _>>()?;

            rows.into_iter().map(Account::try_from).collect()
        })
    }

    /// Hard delete. Owned views go with the account (ON DELETE CASCADE).
    pub fn delete_account(&self, id: Uuid) -> Result<(), StoreError> {
        self.with_conn_mut(|conn| {
            let affected =
                conn.execute("DELETE FROM accounts WHERE account_id = ?1", [id.to_string()])?;
            if affected == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }

    // -- Views --

    pub fn create_view(&self, id: Uuid, view: &NewView) -> Result<View, StoreError> {
        self.with_conn_mut(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO views (view_id, title, paragraph, user_id, public)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     RETURNING {VIEW_COLUMNS}"
                ),
                (
                    id.to_string(),
                    &view.title,
                    &view.paragraph,
                    view.owner_id.to_string(),
                    view.public,
                ),
                ViewRow::from_row,
            )?;
            row.try_into()
        })
    }

    pub fn get_view(&self, id: Uuid) -> Result<Option<View>, StoreError> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {VIEW_COLUMNS} FROM views WHERE view_id = ?1"),
                [id.to_string()],
                ViewRow::from_row,
            )
            .optional()?
            .map(View::try_from)
            .transpose()
        })
    }

    pub fn list_views(&self) -> Result<Vec<View>, StoreError> {
        self.with_conn(|conn| {
            query_views(
                conn,
                &format!("SELECT {VIEW_COLUMNS} FROM views ORDER BY created_at, rowid"),
                [],
            )
        })
    }

    pub fn list_public_views(&self) -> Result<Vec<View>, StoreError> {
        self.with_conn(|conn| {
            query_views(
                conn,
                &format!("SELECT {VIEW_COLUMNS} FROM views WHERE public = 1 ORDER BY created_at, rowid"),
                [],
            )
        })
    }

    pub fn list_views_by_owner(&self, owner_id: Uuid) -> Result<Vec<View>, StoreError> {
        self.with_conn(|conn| {
            query_views(
                conn,
                &format!(
                    "SELECT {VIEW_COLUMNS} FROM views WHERE user_id = ?1 ORDER BY created_at, rowid"
                ),
                [owner_id.to_string()],
            )
        })
    }

    pub fn delete_view(&self, id: Uuid) -> Result<(), StoreError> {
        self.with_conn_mut(|conn| {
            let affected = conn.execute("DELETE FROM views WHERE view_id = ?1", [id.to_string()])?;
            if affected == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }
}

// `column` is always one of the fixed names above, never caller input.
fn query_account(conn: &Connection, column: &str, value: &str) -> Result<Option<AccountRow>, StoreError> {
    let row = conn
        .query_row(
            &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE {column} = ?1"),
            [value],
            AccountRow::from_row,
        )
        .optional()?;

    Ok(row)
}

fn query_views<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<View>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, ViewRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(View::try_from).collect()
}
