//! Task spawning abstraction.
//!
//! The sync engine hands user intents to a [`TaskSpawner`] so the remote
//! player's POST round trip never delays a sync tick.

use std::future::Future;

/// Abstraction for spawning background tasks.
///
/// Implementations should ensure tasks can complete even if the spawner is
/// dropped.
pub trait TaskSpawner: Send + Sync {
    /// Spawns a future as a background task.
    ///
    /// The spawner does not provide a way to cancel or join the spawned task.
    fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Tokio-based spawner.
#[derive(Clone)]
pub struct TokioSpawner {
    handle: tokio::runtime::Handle,
}

impl TokioSpawner {
    #[must_use]
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Creates a new `TokioSpawner` using the current runtime's handle.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context.
    #[must_use]
    pub fn current() -> Self {
        Self {
            handle: tokio::runtime::Handle::current(),
        }
    }
}

impl TaskSpawner for TokioSpawner {
    fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle.spawn(future);
    }
}
