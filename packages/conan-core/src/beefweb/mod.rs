//! Beefweb (foobar2000 REST API) access.
//!
//! # Module Structure
//!
//! - `types` - Player snapshot, playback state and wire envelopes
//! - `track` - Positional column list → validated [`Track`]
//! - `traits` - Trait abstractions for testability
//! - `client` - `BeefwebClient` concrete trait implementation
//! - `urls` - Endpoint URL construction

pub mod client;
pub mod track;
pub mod traits;
pub mod types;
pub mod urls;

pub use client::{BeefwebClient, RemoteError, RemoteResult};
pub use track::{Track, TrackError};
pub use traits::{PlayerApi, PlayerControl, PlayerQuery};
pub use types::{ActiveItem, Artwork, PlaybackState, PlayerStatus, Volume};
