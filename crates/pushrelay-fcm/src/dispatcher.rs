use pushrelay_types::api::DispatchResult;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::message::{Notification, build_request};

pub const DEFAULT_FCM_BASE_URL: &str = "https://fcm.googleapis.com";

/// Sends notifications through the FCM v1 HTTP API, one device at a time.
#[derive(Clone)]
pub struct Dispatcher {
    client: Client,
    base_url: String,
}

impl Dispatcher {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn send_url(&self, project_id: &str) -> String {
        format!("{}/v1/projects/{}/messages:send", self.base_url, project_id)
    }

    /// Never fails: transport and decode problems end up in the result.
    pub async fn send_to_token(
        &self,
        access_token: &str,
        project_id: &str,
        token: &str,
        notification: &Notification,
    ) -> DispatchResult {
        let resp = self
            .client
            .post(self.send_url(project_id))
            .bearer_auth(access_token)
            .json(&build_request(token, notification))
            .send()
            .await;

        let resp = match resp {
            Ok(resp) => resp,
            Err(e) => {
                warn!("FCM send to {} failed: {}", short(token), e);
                return DispatchResult {
                    ok: false,
                    status: 0,
                    body: json!({ "error": e.to_string() }),
                };
            }
        };

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        if status.is_success() {
            debug!("FCM accepted message for {}", short(token));
        } else {
            warn!("FCM rejected message for {} ({}): {}", short(token), status, text);
        }

        DispatchResult {
            ok: status.is_success(),
            status: status.as_u16(),
            body: parse_body(&text),
        }
    }

    /// Sends to each address in order; results line up with `tokens`.
    pub async fn send_all(
        &self,
        access_token: &str,
        project_id: &str,
        tokens: &[String],
        notification: &Notification,
    ) -> Vec<DispatchResult> {
        let mut results = Vec::with_capacity(tokens.len());
        for token in tokens {
            results.push(
                self.send_to_token(access_token, project_id, token, notification)
                    .await,
            );
        }
        results
    }
}

/// Empty → `{}`, JSON → as is, anything else → `{"raw": text}`.
fn parse_body(text: &str) -> Value {
    if text.is_empty() {
        return json!({});
    }
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "raw": text }))
}

/// Device tokens are credentials of a sort; only log their head.
pub(crate) fn short(token: &str) -> String {
    let head: String = token.chars().take(12).collect();
    if head.len() < token.len() {
        format!("{}…", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_url_includes_project() {
        let d = Dispatcher::new(Client::new(), "https://fcm.googleapis.com/");
        assert_eq!(
            d.send_url("demo"),
            "https://fcm.googleapis.com/v1/projects/demo/messages:send"
        );
    }

    #[test]
    fn body_parsing_falls_back_to_raw() {
        assert_eq!(parse_body(""), json!({}));
        assert_eq!(
            parse_body(r#"{"name":"projects/demo/messages/1"}"#),
            json!({ "name": "projects/demo/messages/1" })
        );
        assert_eq!(parse_body("<html>502</html>"), json!({ "raw": "<html>502</html>" }));
    }

    #[test]
    fn short_keeps_only_token_head() {
        assert_eq!(short("abc"), "abc");
        assert_eq!(short("abcdefghijklmnop"), "abcdefghijkl…");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_captured_not_raised() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let d = Dispatcher::new(Client::new(), format!("http://127.0.0.1:{}", port));
        let n = Notification {
            title: "t".into(),
            body: "b".into(),
            data: Default::default(),
        };
        let tokens = vec!["tok-1".to_string(), "tok-2".to_string()];
        let results = d.send_all("access", "demo", &tokens, &n).await;

        assert_eq!(results.len(), 2);
        for r in results {
            assert!(!r.ok);
            assert_eq!(r.status, 0);
            assert!(r.body["error"].is_string());
        }
    }
}
