use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (accounts, views)");
        conn.execute_batch(
            "
            CREATE TABLE accounts (
                account_id      TEXT PRIMARY KEY,
                username        TEXT NOT NULL UNIQUE CHECK (username <> ''),
                email           TEXT NOT NULL UNIQUE CHECK (email <> ''),
                password        TEXT NOT NULL,
                email_verified  INTEGER NOT NULL DEFAULT 0,
                created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE TABLE views (
                view_id     TEXT PRIMARY KEY,
                title       TEXT NOT NULL CHECK (title <> ''),
                paragraph   TEXT NOT NULL CHECK (paragraph <> ''),
                user_id     TEXT NOT NULL REFERENCES accounts(account_id) ON DELETE CASCADE,
                public      INTEGER NOT NULL DEFAULT 0,
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE INDEX idx_views_user ON views(user_id, created_at);
            CREATE INDEX idx_views_public ON views(public, created_at);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
