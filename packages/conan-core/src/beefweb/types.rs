//! Domain and wire types for the Beefweb player API.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::protocol_constants::NO_ACTIVE_INDEX;

/// Playback state reported by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
    /// Anything the player reports that we do not recognize, and the state
    /// before the first successful poll.
    #[default]
    #[serde(other)]
    Unknown,
}

impl PlaybackState {
    /// Human-readable label shown in the player page.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Stopped => "Stopped",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::Unknown => "Player Not Available",
        }
    }

    /// CSS class suffix used by the player page.
    #[must_use]
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Unknown => "unavailable",
        }
    }
}

/// The player's current selection: playlist id, index and the raw columns
/// of the item at that position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActiveItem {
    /// Empty when no playlist is active.
    pub playlist_id: String,
    pub playlist_index: i64,
    /// `-1` when no item is active.
    pub index: i64,
    pub position: f64,
    pub duration: f64,
    pub columns: Vec<String>,
}

impl Default for ActiveItem {
    fn default() -> Self {
        Self {
            playlist_id: String::new(),
            playlist_index: NO_ACTIVE_INDEX,
            index: NO_ACTIVE_INDEX,
            position: 0.0,
            duration: 0.0,
            columns: Vec::new(),
        }
    }
}

impl ActiveItem {
    /// First playlist index of the queue window for this item.
    ///
    /// The "no active item" sentinel starts the window at the top of the
    /// playlist.
    #[must_use]
    pub fn window_start(&self) -> u32 {
        u32::try_from(self.index).unwrap_or(0)
    }
}

/// Volume snapshot. Part of the fetched status but not used for diffing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Volume {
    #[serde(rename = "type")]
    pub kind: String,
    pub min: f64,
    pub max: f64,
    pub value: f64,
    pub is_muted: bool,
}

/// One full player snapshot. Replaced wholesale on every successful poll.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerStatus {
    pub playback_state: PlaybackState,
    pub active_item: ActiveItem,
    pub volume: Volume,
}

/// Cover art bytes as served by the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    pub bytes: Bytes,
    pub content_type: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire envelopes
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /player` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct PlayerResponse {
    pub player: PlayerStatus,
}

/// `GET /playlists/{id}/items/{range}` response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaylistItemsResponse {
    pub playlist_items: PlaylistItems,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct PlaylistItems {
    pub items: Vec<PlaylistItem>,
    #[allow(dead_code)]
    pub offset: u32,
    #[allow(dead_code)]
    pub total_count: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PlaylistItem {
    pub columns: Vec<String>,
}
