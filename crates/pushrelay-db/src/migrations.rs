use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS user_push_tokens (
            user_id     TEXT NOT NULL,
            fcm_token   TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(user_id, fcm_token)
        );

        CREATE INDEX IF NOT EXISTS idx_push_tokens_user
            ON user_push_tokens(user_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
