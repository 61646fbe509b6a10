use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pushrelay_types::api::ErrorResponse;
use tracing::error;

use crate::response::json_response;

/// Any failure that aborts an invocation. Rendered as a 500 carrying the
/// message and the cause chain; backtraces only go to the log.
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl ApiError {
    fn body(&self) -> ErrorResponse {
        let stack = self
            .0
            .chain()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        ErrorResponse::new(format!("{:#}", self.0), Some(stack))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("send_push error: {:?}", self.0);
        json_response(StatusCode::INTERNAL_SERVER_ERROR, &self.body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, anyhow};

    #[test]
    fn body_lists_each_cause_once_without_backtrace() {
        let err: anyhow::Result<()> = Err(anyhow!("connection reset")).context("store lookup failed");
        let body = ApiError::from(err.unwrap_err()).body();

        assert!(!body.ok);
        assert_eq!(body.error, "store lookup failed: connection reset");
        assert_eq!(body.stack.as_deref(), Some("store lookup failed\nconnection reset"));
    }
}
