//! HTTP route handlers.
//!
//! All handlers are thin - they delegate to services for business logic.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::api::ws::ws_handler;
use crate::api::AppState;
use crate::error::{ConanError, ConanResult};
use crate::protocol_constants::{ARTWORK_ROUTE, SERVICE_ID};
use crate::services::PlaybackIntent;

/// Player page served at `/`. Opens `/ws` and applies patches by element id.
const PLAYER_PAGE: &str = include_str!("../../assets/player_info.html");

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Creates the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(player_page))
        .route("/health", get(health_check))
        .route(ARTWORK_ROUTE, get(serve_artwork))
        .route("/api/player/toggle", post(toggle_play_pause))
        .route("/api/player/next", post(skip))
        .route("/api/player/stop", post(stop))
        .route("/ws", get(ws_handler))
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

async fn player_page() -> Html<&'static str> {
    Html(PLAYER_PAGE)
}

/// Liveness probe.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": SERVICE_ID,
        "client": state.registry.is_connected(),
    }))
}

/// Serves the latest cover art, or 404 when there is none.
async fn serve_artwork(State(state): State<AppState>) -> Response {
    match state.artwork.current() {
        Some(artwork) => {
            log::debug!("[Artwork] Serving {} bytes", artwork.bytes.len());
            (
                [
                    (header::CONTENT_TYPE, artwork.content_type),
                    (header::CACHE_CONTROL, "no-cache".to_string()),
                ],
                artwork.bytes,
            )
                .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn toggle_play_pause(State(state): State<AppState>) -> ConanResult<StatusCode> {
    submit_intent(&state, PlaybackIntent::TogglePlayPause)
}

async fn skip(State(state): State<AppState>) -> ConanResult<StatusCode> {
    submit_intent(&state, PlaybackIntent::Skip)
}

async fn stop(State(state): State<AppState>) -> ConanResult<StatusCode> {
    submit_intent(&state, PlaybackIntent::Stop)
}

/// Queues `intent` on the engine. The POST to the player happens later.
fn submit_intent(state: &AppState, intent: PlaybackIntent) -> ConanResult<StatusCode> {
    if state.sync.intent(intent) {
        Ok(StatusCode::ACCEPTED)
    } else {
        Err(ConanError::Unavailable("sync engine is not accepting commands".into()))
    }
}
