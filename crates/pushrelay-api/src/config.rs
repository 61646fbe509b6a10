use std::path::PathBuf;

use anyhow::Context;
use pushrelay_fcm::ServiceAccountConfig;
use pushrelay_fcm::credential::DEFAULT_TOKEN_URI;
use pushrelay_fcm::dispatcher::DEFAULT_FCM_BASE_URL;
use pushrelay_types::models::ChatKind;

/// Notification titles used for trigger-mode messages.
#[derive(Debug, Clone)]
pub struct Titles {
    pub support: String,
    pub default: String,
}

impl Default for Titles {
    fn default() -> Self {
        Self {
            support: "رسالة من الدعم".to_string(),
            default: "رسالة جديدة".to_string(),
        }
    }
}

impl Titles {
    pub fn for_kind(&self, kind: ChatKind) -> &str {
        match kind {
            ChatKind::Support => &self.support,
            _ => &self.default,
        }
    }
}

/// Everything read from the environment at startup. Secrets may be absent
/// here; they are checked when an invocation actually needs them.
#[derive(Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub firebase: ServiceAccountConfig,
    pub fcm_base_url: String,
    pub supabase_url: Option<String>,
    pub supabase_service_key: Option<String>,
    /// When set, device addresses come from this SQLite file instead of Supabase.
    pub db_path: Option<PathBuf>,
    pub titles: Titles,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env_opt("PUSHRELAY_PORT")
            .unwrap_or_else(|| "8787".into())
            .parse()
            .context("PUSHRELAY_PORT is not a valid port")?;

        let defaults = Titles::default();

        Ok(Self {
            host: env_opt("PUSHRELAY_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            firebase: ServiceAccountConfig {
                project_id: env_opt("FIREBASE_PROJECT_ID"),
                client_email: env_opt("FIREBASE_CLIENT_EMAIL"),
                private_key_b64: env_opt("FIREBASE_PRIVATE_KEY_B64"),
                private_key_pem: env_opt("FIREBASE_PRIVATE_KEY"),
                token_uri: env_opt("FIREBASE_TOKEN_URI").unwrap_or_else(|| DEFAULT_TOKEN_URI.into()),
            },
            fcm_base_url: env_opt("FCM_BASE_URL").unwrap_or_else(|| DEFAULT_FCM_BASE_URL.into()),
            supabase_url: env_opt("SUPABASE_URL").or_else(|| env_opt("SB_URL")),
            supabase_service_key: env_opt("SUPABASE_SERVICE_ROLE_KEY")
                .or_else(|| env_opt("SB_SERVICE_ROLE_KEY")),
            db_path: env_opt("PUSHRELAY_DB_PATH").map(PathBuf::from),
            titles: Titles {
                support: env_opt("PUSHRELAY_TITLE_SUPPORT").unwrap_or(defaults.support),
                default: env_opt("PUSHRELAY_TITLE_DEFAULT").unwrap_or(defaults.default),
            },
        })
    }
}

/// Unset and blank variables are the same thing.
fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn support_gets_its_own_title() {
        let titles = Titles::default();
        assert_eq!(titles.for_kind(ChatKind::Support), "رسالة من الدعم");
        assert_eq!(titles.for_kind(ChatKind::Reservation), "رسالة جديدة");
        assert_eq!(titles.for_kind(ChatKind::Property), "رسالة جديدة");
    }

    #[test]
    fn unset_variable_reads_as_none() {
        assert_eq!(env_opt("PUSHRELAY_TEST_DEFINITELY_UNSET_VAR"), None);
    }
}
