use anyhow::{Result, anyhow};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::clean_tokens;
use crate::models::PushTokenRow;

/// Reads device addresses from the hosted `user_push_tokens` table through
/// the PostgREST interface, authenticated with the service-role key.
#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    url: Option<String>,
    service_key: Option<String>,
}

impl SupabaseStore {
    /// Missing values are only reported when a lookup is attempted.
    pub fn new(client: Client, url: Option<String>, service_key: Option<String>) -> Self {
        Self {
            client,
            url: url.map(|u| u.trim_end_matches('/').to_string()),
            service_key,
        }
    }

    fn credentials(&self) -> Result<(&str, &str)> {
        match (self.url.as_deref(), self.service_key.as_deref()) {
            (Some(url), Some(key)) => Ok((url, key)),
            (url, key) => Err(anyhow!(
                "missing Supabase env: url={}, service_key={}",
                url.is_some(),
                key.is_some()
            )),
        }
    }

    pub async fn tokens_for_user(&self, user_id: &str) -> Result<Vec<String>> {
        let (url, key) = self.credentials()?;

        let resp = self
            .client
            .get(format!("{}/rest/v1/user_push_tokens", url))
            .query(&[("select", "fcm_token"), ("user_id", &format!("eq.{}", user_id))])
            .header("apikey", key)
            .header("Authorization", format!("Bearer {}", key))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| anyhow!("user_push_tokens read error: {}", e))?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(anyhow!(
                "user_push_tokens read error: {}",
                error_message(status.as_u16(), &text)
            ));
        }

        let rows: Vec<PushTokenRow> = serde_json::from_str(&text)
            .map_err(|e| anyhow!("user_push_tokens read error: invalid response: {}", e))?;

        debug!("Supabase returned {} token rows for {}", rows.len(), user_id);
        Ok(clean_tokens(rows.into_iter().map(|r| r.fcm_token)))
    }
}

/// PostgREST errors carry a `message`; anything else is reported raw.
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| format!("status={} body={}", status, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookup_without_credentials_names_what_is_missing() {
        let store = SupabaseStore::new(Client::new(), Some("https://x.supabase.co".into()), None);
        let err = store.tokens_for_user("user-1").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing Supabase env: url=true, service_key=false"
        );
    }

    #[test]
    fn error_message_prefers_postgrest_message() {
        let body = r#"{"code":"42P01","message":"relation \"user_push_tokens\" does not exist"}"#;
        assert_eq!(
            error_message(404, body),
            "relation \"user_push_tokens\" does not exist"
        );
        assert_eq!(error_message(502, "bad gateway"), "status=502 body=bad gateway");
    }
}
