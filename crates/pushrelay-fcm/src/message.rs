use std::collections::BTreeMap;

use pushrelay_types::models::ChatKind;
use serde::Serialize;

/// Longest notification body shown on the device, in characters.
pub const MAX_BODY_CHARS: usize = 140;
const ELLIPSIS: char = '…';

/// What the user sees, plus the string payload handed to the app.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
}

impl Notification {
    /// Category taken from the `kind` data entry, `property` when absent.
    pub fn kind(&self) -> ChatKind {
        self.data
            .get("kind")
            .map(|k| ChatKind::from_tag(k))
            .unwrap_or_default()
    }
}

/// Cut `content` to [`MAX_BODY_CHARS`] characters, marking the cut with an ellipsis.
pub fn truncate_body(content: &str) -> String {
    match content.char_indices().nth(MAX_BODY_CHARS) {
        Some((cut, _)) => {
            let mut body = content[..cut].to_string();
            body.push(ELLIPSIS);
            body
        }
        None => content.to_string(),
    }
}

// -- FCM v1 wire format --

#[derive(Debug, Serialize)]
pub struct SendRequest<'a> {
    pub message: Message<'a>,
}

#[derive(Debug, Serialize)]
pub struct Message<'a> {
    pub token: &'a str,
    pub notification: Alert<'a>,
    pub data: &'a BTreeMap<String, String>,
    pub android: AndroidConfig,
    pub apns: ApnsConfig<'a>,
}

#[derive(Debug, Serialize)]
pub struct Alert<'a> {
    pub title: &'a str,
    pub body: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AndroidConfig {
    pub priority: &'static str,
    pub notification: AndroidNotification,
}

#[derive(Debug, Serialize)]
pub struct AndroidNotification {
    pub channel_id: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ApnsConfig<'a> {
    pub headers: ApnsHeaders,
    pub payload: ApnsPayload<'a>,
}

#[derive(Debug, Serialize)]
pub struct ApnsHeaders {
    #[serde(rename = "apns-priority")]
    pub apns_priority: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ApnsPayload<'a> {
    pub aps: Aps<'a>,
}

#[derive(Debug, Serialize)]
pub struct Aps<'a> {
    pub alert: Alert<'a>,
    pub sound: &'static str,
}

/// High priority on both platforms, default sound on iOS, Android channel
/// picked from the notification's category.
pub fn build_request<'a>(token: &'a str, notification: &'a Notification) -> SendRequest<'a> {
    let title = notification.title.as_str();
    let body = notification.body.as_str();

    SendRequest {
        message: Message {
            token,
            notification: Alert { title, body },
            data: &notification.data,
            android: AndroidConfig {
                priority: "HIGH",
                notification: AndroidNotification {
                    channel_id: notification.kind().channel_id(),
                },
            },
            apns: ApnsConfig {
                headers: ApnsHeaders { apns_priority: "10" },
                payload: ApnsPayload {
                    aps: Aps {
                        alert: Alert { title, body },
                        sound: "default",
                    },
                },
            },
        },
    }
}
