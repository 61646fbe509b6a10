use std::collections::BTreeMap;

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use pushrelay_fcm::Notification;
use pushrelay_fcm::message::truncate_body;
use pushrelay_types::api::{
    DispatchResult, ErrorResponse, EventRecord, ManualRequest, PushResponse, TriggerRequest,
};
use pushrelay_types::models::{ChatKind, Mode};

use crate::error::ApiError;
use crate::response::{json_response, preflight_response};
use crate::state::{AppState, AppStateInner};

pub const REASON_MISSING_FIELDS: &str = "missing receiver/content";
pub const REASON_SELF_MESSAGE: &str = "self message ignored";
pub const REASON_NO_TOKENS: &str = "no tokens";

const MANUAL_DEFAULT_TITLE: &str = "New message";

/// POST handler. A body carrying a `record` object is a trigger invocation,
/// anything else is a manual one. Unparseable bodies count as an empty manual request.
pub async fn send_push(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let invocation = Uuid::new_v4();

    let raw: Value = serde_json::from_slice(&body)
        .ok()
        .filter(Value::is_object)
        .unwrap_or_else(|| json!({}));

    let is_trigger = raw.get("record").is_some_and(Value::is_object);

    let resp = async move {
        if is_trigger {
            let req: TriggerRequest =
                serde_json::from_value(raw).context("invalid trigger body")?;
            handle_trigger(&state, req.record.unwrap_or_default()).await
        } else {
            let req: ManualRequest = serde_json::from_value(raw).context("invalid manual body")?;
            handle_manual(&state, req).await
        }
    }
    .instrument(info_span!("send_push", %invocation))
    .await?;

    Ok(json_response(StatusCode::OK, &resp))
}

async fn handle_trigger(state: &AppStateInner, record: EventRecord) -> anyhow::Result<PushResponse> {
    let receiver_id = trimmed(record.receiver_id);
    let sender_id = trimmed(record.sender_id);
    let conversation_id = trimmed(record.conversation_id);
    let content = trimmed(record.content);
    let kind = Some(trimmed(record.kind))
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| ChatKind::Property.as_str().to_string());

    if receiver_id.is_empty() || content.is_empty() {
        return Ok(PushResponse::skipped(None, REASON_MISSING_FIELDS));
    }

    if !sender_id.is_empty() && sender_id == receiver_id {
        return Ok(PushResponse::skipped(None, REASON_SELF_MESSAGE));
    }

    let tokens = state.store.tokens_for_user(&receiver_id).await?;
    if tokens.is_empty() {
        debug!("No device tokens for receiver {}", receiver_id);
        return Ok(PushResponse::skipped(None, REASON_NO_TOKENS));
    }

    let title = state.titles.for_kind(ChatKind::from_tag(&kind)).to_string();
    let data = BTreeMap::from([
        ("kind".to_string(), kind),
        ("conversation_id".to_string(), conversation_id),
        ("sender_id".to_string(), sender_id),
        ("receiver_id".to_string(), receiver_id),
    ]);
    let notification = Notification {
        title,
        body: truncate_body(&content),
        data,
    };

    let results = deliver(state, &tokens, &notification).await?;
    info!("Trigger push sent to {} device(s), {} accepted", results.len(), accepted(&results));
    Ok(PushResponse::delivered(Mode::Trigger, results))
}

async fn handle_manual(state: &AppStateInner, req: ManualRequest) -> anyhow::Result<PushResponse> {
    let tokens = req.device_tokens();

    if tokens.is_empty() {
        return Ok(PushResponse::skipped(Some(Mode::Manual), REASON_NO_TOKENS));
    }

    let data = req.data_strings();
    let notification = Notification {
        title: req.title.unwrap_or_else(|| MANUAL_DEFAULT_TITLE.to_string()),
        body: req.body.unwrap_or_default(),
        data,
    };

    let results = deliver(state, &tokens, &notification).await?;
    info!("Manual push sent to {} device(s), {} accepted", results.len(), accepted(&results));
    Ok(PushResponse::delivered(Mode::Manual, results))
}

/// Fresh credential, then one send per address in order. Only the credential
/// step can fail the invocation.
async fn deliver(
    state: &AppStateInner,
    tokens: &[String],
    notification: &Notification,
) -> anyhow::Result<Vec<DispatchResult>> {
    let account = state.service_account.resolve()?;
    let access_token = state.signer.fetch_access_token(&account).await?;

    Ok(state
        .dispatcher
        .send_all(&access_token, &account.project_id, tokens, notification)
        .await)
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn accepted(results: &[DispatchResult]) -> usize {
    results.iter().filter(|r| r.ok).count()
}

pub async fn preflight() -> Response {
    preflight_response()
}

pub async fn method_not_allowed() -> Response {
    json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &ErrorResponse::new("POST only", None),
    )
}

pub async fn health() -> impl IntoResponse {
    json_response(StatusCode::OK, &json!({ "ok": true }))
}
