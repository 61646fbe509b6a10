pub mod config;
pub mod error;
pub mod response;
pub mod send_push;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The function answers on `/` and on the hosted functions path so the same
/// binary can sit behind a gateway or be called directly.
pub fn build_router(state: AppState) -> Router {
    let function = post(send_push::send_push)
        .options(send_push::preflight)
        .fallback(send_push::method_not_allowed);

    Router::new()
        .route("/", function.clone())
        .route("/functions/v1/send_push", function)
        .route("/health", get(send_push::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
