//! WebSocket handler for the player page.
//!
//! The page connects once; the handler registers it as the single client,
//! asks the engine for a full resync, then pumps queued patches out and user
//! intents in until either side closes or a newer client supersedes it.

use axum::extract::ws::{CloseFrame, Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::sink::SinkExt;
use futures::stream::{SplitSink, StreamExt};
use serde::Deserialize;

use crate::api::AppState;
use crate::protocol_constants::WS_CLOSE_BY_SERVER;
use crate::services::PlaybackIntent;

// ─────────────────────────────────────────────────────────────────────────────
// WebSocket Message Types
// ─────────────────────────────────────────────────────────────────────────────

/// Incoming WebSocket message envelope.
///
/// Extra fields (such as the htmx `HEADERS` object) are ignored.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
enum WsIncoming {
    TogglePlayPause,
    Skip,
    Stop,
}

impl From<WsIncoming> for PlaybackIntent {
    fn from(msg: WsIncoming) -> Self {
        match msg {
            WsIncoming::TogglePlayPause => Self::TogglePlayPause,
            WsIncoming::Skip => Self::Skip,
            WsIncoming::Stop => Self::Stop,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handler
// ─────────────────────────────────────────────────────────────────────────────

/// Upgrades `/ws` requests.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Main WebSocket connection handler.
async fn handle_ws(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Register before asking for the resync so the full state lands here
    let (conn_guard, mut outbound) = state.registry.register();
    let cancel_token = conn_guard.cancel_token().clone();

    log::info!("[WS] New connection established: ws-{}", conn_guard.id());
    state.sync.client_connected();

    loop {
        tokio::select! {
            biased;

            // Force-close or superseded by a newer client
            _ = cancel_token.cancelled() => {
                log::info!("[WS] Connection closed by server: ws-{}", conn_guard.id());
                close_by_server(&mut sender).await;
                break;
            }
            frame = outbound.recv() => match frame {
                Some(text) => {
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        log::warn!("[WS] Send failed, client disconnected: ws-{}", conn_guard.id());
                        break;
                    }
                }
                // Registry dropped our handle: same outcome as a cancel
                None => {
                    log::info!("[WS] Connection released by registry: ws-{}", conn_guard.id());
                    close_by_server(&mut sender).await;
                    break;
                }
            },
            msg = receiver.next() => match msg {
                Some(Ok(Message::Text(text))) => handle_text(&state, text.as_str()),
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                _ => {}
            },
        }
    }

    log::info!("[WS] Connection ended: ws-{}", conn_guard.id());
}

/// Sends the close code the player page treats as "do not reconnect".
async fn close_by_server(sender: &mut SplitSink<WebSocket, Message>) {
    let frame = CloseFrame {
        code: WS_CLOSE_BY_SERVER,
        reason: "closed by server".into(),
    };
    let _ = sender.send(Message::Close(Some(frame))).await;
}

fn handle_text(state: &AppState, text: &str) {
    match serde_json::from_str::<WsIncoming>(text) {
        Ok(msg) => {
            log::debug!("[WS] Intent received: {:?}", msg);
            state.sync.intent(msg.into());
        }
        Err(e) => log::debug!("[WS] Ignoring unrecognized message ({}): {}", e, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_intents() {
        let msg: WsIncoming = serde_json::from_str(r#"{"type":"TOGGLE_PLAY_PAUSE"}"#).unwrap();
        assert_eq!(PlaybackIntent::from(msg), PlaybackIntent::TogglePlayPause);
        let msg: WsIncoming = serde_json::from_str(r#"{"type":"SKIP"}"#).unwrap();
        assert_eq!(PlaybackIntent::from(msg), PlaybackIntent::Skip);
        let msg: WsIncoming = serde_json::from_str(r#"{"type":"STOP"}"#).unwrap();
        assert_eq!(PlaybackIntent::from(msg), PlaybackIntent::Stop);
    }

    #[test]
    fn ignores_htmx_headers() {
        let raw = r#"{"type":"SKIP","HEADERS":{"HX-Request":"true","HX-Trigger":"skip"}}"#;
        assert_eq!(
            serde_json::from_str::<WsIncoming>(raw).unwrap(),
            WsIncoming::Skip
        );
    }

    #[test]
    fn rejects_unknown_types() {
        assert!(serde_json::from_str::<WsIncoming>(r#"{"type":"SEEK"}"#).is_err());
        assert!(serde_json::from_str::<WsIncoming>("not json").is_err());
    }
}
