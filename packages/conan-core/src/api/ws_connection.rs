//! Single-client WebSocket connection tracking.
//!
//! This module provides tracking of the one UI client with force-close
//! capability:
//!
//! - `ConnectionRegistry`: Holds at most one live client handle
//! - `ConnectionGuard`: RAII guard for automatic cleanup on disconnect

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::events::Delivery;

/// Handle to the connected client's outbound queue.
#[derive(Clone, Debug)]
pub struct ClientHandle {
    id: u64,
    tx: mpsc::UnboundedSender<String>,
    cancel_token: CancellationToken,
}

impl ClientHandle {
    pub fn new(id: u64, tx: mpsc::UnboundedSender<String>, cancel_token: CancellationToken) -> Self {
        Self {
            id,
            tx,
            cancel_token,
        }
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Queues a text frame. Returns false if the socket task has gone.
    fn send(&self, text: String) -> bool {
        self.tx.send(text).is_ok()
    }
}

/// Tracks the single active client.
///
/// Every read and write of the handle goes through one mutex, so a send can
/// never interleave with a connect or disconnect.
pub struct ConnectionRegistry {
    current: Mutex<Option<ClientHandle>>,
    /// Counter for generating unique connection IDs.
    next_id: AtomicU64,
    /// Global cancellation token - when cancelled, all connections close.
    /// Wrapped in RwLock so it can be replaced after close_all().
    global_cancel: RwLock<CancellationToken>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(None),
            next_id: AtomicU64::new(1),
            global_cancel: RwLock::new(CancellationToken::new()),
        }
    }

    /// Registers a new connection, superseding any previous one.
    ///
    /// Returns a guard that clears the registration when dropped, and the
    /// receiver the socket task drains into the WebSocket.
    pub fn register(self: &Arc<Self>) -> (ConnectionGuard, mpsc::UnboundedReceiver<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let cancel_token = self.global_cancel.read().child_token();
        let (tx, rx) = mpsc::unbounded_channel();

        self.set(ClientHandle::new(id, tx, cancel_token.clone()));

        let guard = ConnectionGuard {
            id,
            registry: Arc::clone(self),
            cancel_token,
        };
        (guard, rx)
    }

    /// Installs `handle` as the current client.
    ///
    /// The superseded handle, if any, is cancelled so its socket closes, and
    /// returned to the caller.
    pub fn set(&self, handle: ClientHandle) -> Option<ClientHandle> {
        let id = handle.id;
        let previous = self.current.lock().replace(handle);
        match &previous {
            Some(old) => {
                old.cancel_token.cancel();
                log::info!("[WS] Connection ws-{} supersedes ws-{}", id, old.id);
            }
            None => log::info!("[WS] Connection registered: ws-{}", id),
        }
        previous
    }

    /// Clears the current client only if it is still `id`.
    ///
    /// A late close from a superseded connection leaves the newer one alone.
    pub fn clear(&self, id: u64) -> bool {
        let mut current = self.current.lock();
        if current.as_ref().is_some_and(|h| h.id == id) {
            *current = None;
            log::info!("[WS] Connection unregistered: ws-{}", id);
            true
        } else {
            log::debug!("[WS] Ignoring stale close for ws-{}", id);
            false
        }
    }

    /// Returns a copy of the current handle.
    #[must_use]
    pub fn current(&self) -> Option<ClientHandle> {
        self.current.lock().clone()
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.current.lock().is_some()
    }

    /// Queues `text` on the current client.
    pub fn send(&self, text: String) -> Delivery {
        match self.current.lock().as_ref() {
            Some(handle) if handle.send(text) => Delivery::Sent,
            _ => Delivery::NoClient,
        }
    }

    /// Force-closes the connected client, if any.
    ///
    /// This cancels the global token, which signals the connection handler
    /// to terminate. A fresh token is created afterwards so new connections
    /// can still be accepted.
    ///
    /// Returns the number of connections that were signaled to close.
    pub fn close_all(&self) -> usize {
        let count = usize::from(self.current.lock().take().is_some());
        if count > 0 {
            log::info!("[WS] Force-closing {} connection(s)", count);
        }
        let mut guard = self.global_cancel.write();
        guard.cancel();
        *guard = CancellationToken::new();
        count
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard that clears the registration when dropped.
///
/// This ensures the registry is always cleaned up, even if the handler
/// panics or exits early.
pub struct ConnectionGuard {
    id: u64,
    registry: Arc<ConnectionRegistry>,
    /// Cancelled on force-close or when a newer client supersedes this one.
    cancel_token: CancellationToken,
}

impl ConnectionGuard {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the cancellation token for this connection.
    ///
    /// Use this in `tokio::select!` to detect force-close requests:
    /// ```ignore
    /// tokio::select! {
    ///     _ = cancel_token.cancelled() => break,
    ///     // ... other branches
    /// }
    /// ```
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel_token
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.registry.clear(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_connect_supersedes_first() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (first, _rx1) = registry.register();
        let (second, _rx2) = registry.register();

        assert_eq!(registry.current().map(|h| h.id()), Some(second.id()));
        assert!(first.cancel_token().is_cancelled());
        assert!(!second.cancel_token().is_cancelled());
    }

    #[test]
    fn stale_close_does_not_clear_newer_client() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (first, _rx1) = registry.register();
        let (second, _rx2) = registry.register();

        drop(first);
        assert_eq!(registry.current().map(|h| h.id()), Some(second.id()));

        drop(second);
        assert!(registry.current().is_none());
    }

    #[test]
    fn clear_with_unknown_id_is_ignored() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (guard, _rx) = registry.register();
        assert!(!registry.clear(guard.id() + 100));
        assert!(registry.is_connected());
    }

    #[test]
    fn set_returns_superseded_handle() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(registry
            .set(ClientHandle::new(7, tx.clone(), CancellationToken::new()))
            .is_none());
        let previous = registry.set(ClientHandle::new(8, tx, CancellationToken::new()));
        assert_eq!(previous.map(|h| h.id()), Some(7));
        assert_eq!(registry.current().map(|h| h.id()), Some(8));
    }

    #[tokio::test]
    async fn send_goes_to_latest_client_only() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (_first, mut rx1) = registry.register();
        let (_second, mut rx2) = registry.register();

        assert_eq!(registry.send("hello".into()), Delivery::Sent);
        assert_eq!(rx2.recv().await.as_deref(), Some("hello"));
        // The first client's sender was dropped when it was superseded.
        assert_eq!(rx1.recv().await, None);
    }

    #[test]
    fn send_without_client_reports_no_client() {
        let registry = ConnectionRegistry::new();
        assert_eq!(registry.send("x".into()), Delivery::NoClient);
    }

    #[test]
    fn send_to_closed_socket_reports_no_client() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (_guard, rx) = registry.register();
        drop(rx);
        assert_eq!(registry.send("x".into()), Delivery::NoClient);
    }

    #[test]
    fn close_all_cancels_live_connection() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (guard, _rx) = registry.register();
        assert_eq!(registry.close_all(), 1);
        assert!(guard.cancel_token().is_cancelled());
        assert!(!registry.is_connected());
        assert_eq!(registry.close_all(), 0);

        // New connections get a fresh token.
        let (next, _rx2) = registry.register();
        assert!(!next.cancel_token().is_cancelled());
    }
}
