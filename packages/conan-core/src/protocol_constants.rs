//! Fixed protocol constants that should NOT be changed.
//!
//! These values are defined by the Beefweb REST API and by the htmx
//! fragment contract the player page relies on. Changing them breaks either
//! the remote queries or the out-of-band swaps in the browser.

// ─────────────────────────────────────────────────────────────────────────────
// Application
// ─────────────────────────────────────────────────────────────────────────────

/// Service identifier reported by `/health`.
pub const SERVICE_ID: &str = "conan";

// ─────────────────────────────────────────────────────────────────────────────
// Beefweb API
// ─────────────────────────────────────────────────────────────────────────────

/// Title-format columns requested for every track, in record order.
///
/// The order defines the positional layout parsed by
/// [`Track::from_columns`](crate::beefweb::Track::from_columns).
pub const TRACK_COLUMNS: [&str; TRACK_COLUMN_COUNT] = [
    "%artist%",
    "%title%",
    "%album%",
    "%length%",
    "%tracknumber%",
    "%totaltracks%",
    "%path%",
];

/// Number of raw fields in a track record.
pub const TRACK_COLUMN_COUNT: usize = 7;

/// Number of playlist items requested per queue window (current + next).
pub const QUEUE_WINDOW_SIZE: u32 = 2;

/// Active-item index reported by the player when nothing is selected.
pub const NO_ACTIVE_INDEX: i64 = -1;

/// Separator inside a "current/total" track number field.
pub const TRACK_NUMBER_SEPARATOR: char = '/';

/// Track-number placeholder emitted by foobar2000 for an unknown number.
pub const UNKNOWN_TRACK_NUMBER: &str = "-";

/// Total-tracks placeholder emitted by foobar2000 for an unknown total.
pub const UNKNOWN_TOTAL_TRACKS: &str = "?";

// ─────────────────────────────────────────────────────────────────────────────
// UI Fragments (htmx out-of-band swaps)
// ─────────────────────────────────────────────────────────────────────────────

/// Marker key/value asking htmx to swap every fragment out-of-band.
pub const OOB_SWAP_KEY: &str = "hx-swap-oob";
pub const OOB_SWAP_VALUE: &str = "true";

pub const FRAGMENT_PLAYBACK_STATE: &str = "UpdatePlaybackState";
pub const FRAGMENT_TITLE: &str = "UpdateTitle";
pub const FRAGMENT_ALBUM: &str = "UpdateAlbum";
pub const FRAGMENT_UP_NEXT_TITLE: &str = "UpdateUpNextTitle";
pub const FRAGMENT_UP_NEXT_ALBUM: &str = "UpdateUpNextAlbum";
pub const FRAGMENT_COVER_ART: &str = "UpdateCoverArt";

/// Path the cover-art fragment points the browser at.
pub const ARTWORK_ROUTE: &str = "/artwork";

// ─────────────────────────────────────────────────────────────────────────────
// HTTP
// ─────────────────────────────────────────────────────────────────────────────

/// Content type assumed for artwork when the player omits one.
pub const DEFAULT_ARTWORK_CONTENT_TYPE: &str = "image/jpeg";

/// WebSocket close code sent when the server drops a client (superseded
/// or shutting down). The player page does not reconnect on this code.
pub const WS_CLOSE_BY_SERVER: u16 = 4000;

/// Capacity of the engine's command channel.
pub const COMMAND_CHANNEL_CAPACITY: usize = 64;
