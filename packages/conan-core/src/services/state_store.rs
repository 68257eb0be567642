//! Last-known player snapshot and per-slot display state.
//!
//! Owned exclusively by the sync engine task, so no locking is needed here.

use crate::beefweb::{PlaybackState, PlayerStatus, Track};

/// Presentation state of one display slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DisplaySlot {
    /// Nothing shown yet and no clear sent.
    #[default]
    Empty,
    /// A track is currently shown.
    Showing(Track),
    /// The slot was cleared and the clear has been sent.
    Cleared,
}

/// What the caller must broadcast after [`DisplaySlot::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotChange {
    Show(Track),
    Clear,
    Unchanged,
}

impl DisplaySlot {
    #[must_use]
    pub fn track(&self) -> Option<&Track> {
        match self {
            Self::Showing(track) => Some(track),
            Self::Empty | Self::Cleared => None,
        }
    }

    #[must_use]
    pub fn is_cleared(&self) -> bool {
        matches!(self, Self::Cleared)
    }

    /// Moves the slot to reflect `next` and reports what changed on screen.
    ///
    /// A track with the same artist and title as the shown one is stored
    /// silently. A clear is reported once; further empty updates are
    /// no-ops until a track appears again.
    pub fn apply(&mut self, next: Option<Track>) -> SlotChange {
        match (std::mem::take(self), next) {
            (Self::Showing(shown), Some(track)) if shown.same_identity(&track) => {
                *self = Self::Showing(track);
                SlotChange::Unchanged
            }
            (_, Some(track)) => {
                *self = Self::Showing(track.clone());
                SlotChange::Show(track)
            }
            (Self::Cleared, None) => {
                *self = Self::Cleared;
                SlotChange::Unchanged
            }
            (Self::Empty | Self::Showing(_), None) => {
                *self = Self::Cleared;
                SlotChange::Clear
            }
        }
    }
}

/// The engine's memory between ticks.
#[derive(Debug, Default)]
pub struct StateStore {
    status: Option<PlayerStatus>,
    now_playing: DisplaySlot,
    up_next: DisplaySlot,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored playback state; `Unknown` before the first successful poll.
    #[must_use]
    pub fn playback_state(&self) -> PlaybackState {
        self.status
            .as_ref()
            .map_or(PlaybackState::Unknown, |s| s.playback_state)
    }

    /// Returns true if `next` would change the displayed playback state.
    ///
    /// Volume, position and every other status field are ignored.
    #[must_use]
    pub fn playback_state_changed(&self, next: &PlayerStatus) -> bool {
        match &self.status {
            Some(current) => current.playback_state != next.playback_state,
            None => true,
        }
    }

    /// Returns true if the active track disagrees with the now-playing slot.
    ///
    /// Disagreement means different artist/title, or exactly one of the two
    /// being present. A slot that has never been reported also disagrees
    /// with an absent track, so the first empty poll gets its clear.
    #[must_use]
    pub fn needs_queue_refresh(&self, active: Option<&Track>) -> bool {
        match (active, self.now_playing.track()) {
            (Some(active), Some(shown)) => !active.same_identity(shown),
            (None, None) => !self.now_playing.is_cleared(),
            _ => true,
        }
    }

    /// Replaces the stored status wholesale.
    pub fn set_status(&mut self, status: PlayerStatus) {
        self.status = Some(status);
    }

    #[must_use]
    pub fn now_playing(&self) -> &DisplaySlot {
        &self.now_playing
    }

    #[must_use]
    pub fn up_next(&self) -> &DisplaySlot {
        &self.up_next
    }

    pub fn apply_now_playing(&mut self, track: Option<Track>) -> SlotChange {
        self.now_playing.apply(track)
    }

    pub fn apply_up_next(&mut self, track: Option<Track>) -> SlotChange {
        self.up_next.apply(track)
    }
}
