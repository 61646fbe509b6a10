pub mod migrations;
pub mod models;
pub mod queries;
pub mod store;
pub mod supabase;

use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

pub use store::TokenStore;
pub use supabase::SupabaseStore;

/// Local SQLite copy of the `user_push_tokens` table.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }
}

/// Trim stored addresses and drop the blank ones, keeping row order.
pub(crate) fn clean_tokens<I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    raw.into_iter()
        .flatten()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
