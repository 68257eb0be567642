//! Patch emitter abstraction for decoupling the sync engine from transport.
//!
//! The engine depends on the [`PatchEmitter`] trait rather than on the
//! WebSocket registry, enabling testing and alternative transports.

use super::UiPatch;

/// Outcome of a single emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the connected client's outbound queue.
    Sent,
    /// Nobody is connected. Not an error.
    NoClient,
}

/// Trait for publishing UI patches without knowledge of transport.
///
/// # Example
///
/// ```ignore
/// struct MyService {
///     emitter: Arc<dyn PatchEmitter>,
/// }
///
/// impl MyService {
///     fn show_stopped(&self) {
///         self.emitter.emit(UiPatch::PlaybackState(PlaybackState::Stopped));
///     }
/// }
/// ```
pub trait PatchEmitter: Send + Sync {
    /// Publishes a patch. Never blocks and never fails.
    fn emit(&self, patch: UiPatch) -> Delivery;
}

/// No-op emitter for headless runs and tests.
pub struct NoopPatchEmitter;

impl PatchEmitter for NoopPatchEmitter {
    fn emit(&self, _patch: UiPatch) -> Delivery {
        Delivery::NoClient
    }
}

/// Logging emitter for debugging and development.
///
/// Logs all patches at debug level.
pub struct LoggingPatchEmitter;

impl PatchEmitter for LoggingPatchEmitter {
    fn emit(&self, patch: UiPatch) -> Delivery {
        log::debug!("[Patch] {}: {:?}", patch.slot(), patch);
        Delivery::NoClient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_and_logging_report_no_client() {
        let patch = UiPatch::UpNext(None);
        assert_eq!(NoopPatchEmitter.emit(patch.clone()), Delivery::NoClient);
        assert_eq!(LoggingPatchEmitter.emit(patch), Delivery::NoClient);
    }
}
