use std::sync::Arc;

use anyhow::{Result, anyhow};

use crate::supabase::SupabaseStore;
use crate::{Database, clean_tokens};

/// Where device addresses are looked up.
#[derive(Clone)]
pub enum TokenStore {
    /// Local SQLite file, for development without a hosted project.
    Sqlite(Arc<Database>),
    Supabase(SupabaseStore),
}

impl TokenStore {
    /// All device addresses registered for `user_id`, trimmed, blanks removed,
    /// in storage order.
    pub async fn tokens_for_user(&self, user_id: &str) -> Result<Vec<String>> {
        match self {
            Self::Sqlite(db) => {
                let db = db.clone();
                let uid = user_id.to_string();
                let rows = tokio::task::spawn_blocking(move || db.get_push_tokens(&uid))
                    .await
                    .map_err(|e| anyhow!("spawn_blocking join error: {}", e))?
                    .map_err(|e| anyhow!("user_push_tokens read error: {}", e))?;
                Ok(clean_tokens(rows.into_iter().map(|r| r.fcm_token)))
            }
            Self::Supabase(store) => store.tokens_for_user(user_id).await,
        }
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::Supabase(_) => "supabase",
        }
    }
}
