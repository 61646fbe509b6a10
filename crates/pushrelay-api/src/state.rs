use std::sync::Arc;

use pushrelay_db::{Database, SupabaseStore, TokenStore};
use pushrelay_fcm::{CredentialSigner, Dispatcher, ServiceAccountConfig};
use reqwest::Client;
use tracing::info;

use crate::config::{Settings, Titles};

pub type AppState = Arc<AppStateInner>;

/// Clients and settings shared by invocations. Holds no per-request data and
/// no credentials: each invocation signs and exchanges its own.
pub struct AppStateInner {
    pub store: TokenStore,
    pub signer: CredentialSigner,
    pub dispatcher: Dispatcher,
    pub service_account: ServiceAccountConfig,
    pub titles: Titles,
}

impl AppStateInner {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("pushrelay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let store = match &settings.db_path {
            Some(path) => TokenStore::Sqlite(Arc::new(Database::open(path)?)),
            None => TokenStore::Supabase(SupabaseStore::new(
                client.clone(),
                settings.supabase_url.clone(),
                settings.supabase_service_key.clone(),
            )),
        };
        info!("Device tokens read from {}", store.backend());

        Ok(Self {
            store,
            signer: CredentialSigner::new(client.clone()),
            dispatcher: Dispatcher::new(client, settings.fcm_base_url.clone()),
            service_account: settings.firebase.clone(),
            titles: settings.titles.clone(),
        })
    }
}
