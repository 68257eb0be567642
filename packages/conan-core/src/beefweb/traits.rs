//! Trait abstractions for remote player operations.
//!
//! The sync engine and the intent dispatcher depend on these traits rather
//! than on [`BeefwebClient`](super::BeefwebClient), so tests can substitute
//! scripted players.

use async_trait::async_trait;

use super::client::RemoteResult;
use super::types::{Artwork, PlayerStatus};

/// Read-side operations used by every sync tick.
#[async_trait]
pub trait PlayerQuery: Send + Sync {
    /// Fetches the current player snapshot.
    async fn fetch_status(&self) -> RemoteResult<PlayerStatus>;

    /// Fetches up to two raw column lists starting at `start_index`.
    ///
    /// # Arguments
    /// * `playlist_id` - Playlist to read from; empty means no playlist and
    ///   yields an empty window without touching the network
    /// * `start_index` - Index of the current item; `-1` starts at `0`
    async fn fetch_queue_window(
        &self,
        playlist_id: &str,
        start_index: i64,
    ) -> RemoteResult<Vec<Vec<String>>>;

    /// Fetches the cover art of the item at `index` in `playlist_id`.
    async fn fetch_artwork(&self, playlist_id: &str, index: u32) -> RemoteResult<Artwork>;
}

/// Transport commands issued on behalf of the UI.
#[async_trait]
pub trait PlayerControl: Send + Sync {
    async fn toggle_pause(&self) -> RemoteResult<()>;

    async fn next(&self) -> RemoteResult<()>;

    async fn stop(&self) -> RemoteResult<()>;
}

/// Combined trait for all remote player operations.
pub trait PlayerApi: PlayerQuery + PlayerControl {}

/// Blanket implementation for any type implementing both traits.
impl<T: PlayerQuery + PlayerControl> PlayerApi for T {}
