//! Bridge implementation that maps UI patches to the connected client.
//!
//! The [`ClientBroadcaster`] lives at the boundary between the sync engine
//! and the WebSocket transport. It renders each patch to a text frame and
//! queues it on the single registered client, if any.

use std::sync::Arc;

use parking_lot::RwLock;

use super::emitter::{Delivery, PatchEmitter};
use super::UiPatch;
use crate::api::ConnectionRegistry;

/// Delivers patches to whoever is currently registered.
///
/// An optional external emitter receives a copy of every patch; the server
/// uses it to log patch traffic.
#[derive(Clone)]
pub struct ClientBroadcaster {
    registry: Arc<ConnectionRegistry>,
    external_emitter: Arc<RwLock<Option<Arc<dyn PatchEmitter>>>>,
}

impl ClientBroadcaster {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            registry,
            external_emitter: Arc::new(RwLock::new(None)),
        }
    }

    /// Sets an external emitter that sees every patch before delivery.
    pub fn set_external_emitter(&self, emitter: Arc<dyn PatchEmitter>) {
        *self.external_emitter.write() = Some(emitter);
    }
}

impl PatchEmitter for ClientBroadcaster {
    fn emit(&self, patch: UiPatch) -> Delivery {
        if let Some(external) = self.external_emitter.read().as_ref() {
            external.emit(patch.clone());
        }
        let delivery = self.registry.send(patch.to_text());
        if delivery == Delivery::NoClient {
            log::trace!("[WS] No client for {} patch", patch.slot());
        }
        delivery
    }
}
