//! UI patch events pushed to the player page.
//!
//! This module provides:
//! - [`UiPatch`], one value per display slot update
//! - [`PatchEmitter`] trait for the sync engine to publish patches
//! - [`ClientBroadcaster`] for the WebSocket transport
//! - HTML fragment rendering for htmx out-of-band swaps

mod bridge;
mod emitter;
mod fragments;

pub use bridge::ClientBroadcaster;
pub use emitter::{Delivery, LoggingPatchEmitter, NoopPatchEmitter, PatchEmitter};

use crate::beefweb::{PlaybackState, Track};

/// A single display update for the connected client.
///
/// `None` payloads mean "show the slot empty".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiPatch {
    /// Playback state indicator.
    PlaybackState(PlaybackState),

    /// Now-playing title and album lines.
    NowPlaying(Option<Track>),

    /// Up-next title and album lines.
    UpNext(Option<Track>),

    /// Cover art, identified by artwork revision.
    CoverArt(Option<u64>),
}

impl UiPatch {
    /// Short name used in logs.
    #[must_use]
    pub fn slot(&self) -> &'static str {
        match self {
            Self::PlaybackState(_) => "playback-state",
            Self::NowPlaying(_) => "now-playing",
            Self::UpNext(_) => "up-next",
            Self::CoverArt(_) => "cover-art",
        }
    }
}
