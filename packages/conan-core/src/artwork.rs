//! Latest cover art, shared between the sync engine and the HTTP layer.
//!
//! The engine replaces or clears the image when the now-playing album
//! changes. The `/artwork` route serves whatever is current. Every
//! replacement bumps a revision so the browser refetches instead of reusing
//! a cached image.

use parking_lot::RwLock;

use crate::beefweb::Artwork;

#[derive(Default)]
struct ArtworkState {
    current: Option<Artwork>,
    revision: u64,
}

/// Holds the most recently fetched cover art.
#[derive(Default)]
pub struct ArtworkStore {
    state: RwLock<ArtworkState>,
}

impl ArtworkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores new artwork and returns its revision.
    pub fn replace(&self, artwork: Artwork) -> u64 {
        let mut state = self.state.write();
        state.revision += 1;
        state.current = Some(artwork);
        state.revision
    }

    /// Drops the current artwork. Returns true if there was any.
    pub fn clear(&self) -> bool {
        self.state.write().current.take().is_some()
    }

    /// Returns the current artwork, if any.
    #[must_use]
    pub fn current(&self) -> Option<Artwork> {
        self.state.read().current.clone()
    }

    /// Revision of the current artwork, or `None` when there is none.
    #[must_use]
    pub fn revision(&self) -> Option<u64> {
        let state = self.state.read();
        state.current.as_ref().map(|_| state.revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn art(tag: &'static [u8]) -> Artwork {
        Artwork {
            bytes: Bytes::from_static(tag),
            content_type: "image/png".to_string(),
        }
    }

    #[test]
    fn empty_store_has_no_revision() {
        let store = ArtworkStore::new();
        assert!(store.current().is_none());
        assert_eq!(store.revision(), None);
    }

    #[test]
    fn replace_bumps_revision() {
        let store = ArtworkStore::new();
        assert_eq!(store.replace(art(b"one")), 1);
        assert_eq!(store.replace(art(b"two")), 2);
        assert_eq!(store.revision(), Some(2));
        assert_eq!(store.current().unwrap().bytes, Bytes::from_static(b"two"));
    }

    #[test]
    fn clear_keeps_counter_monotonic() {
        let store = ArtworkStore::new();
        store.replace(art(b"one"));
        assert!(store.clear());
        assert!(!store.clear());
        assert_eq!(store.revision(), None);
        assert_eq!(store.replace(art(b"two")), 2);
    }
}
