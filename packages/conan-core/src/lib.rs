//! Conan Core - player-state sync engine for foobar2000.
//!
//! This crate polls a foobar2000 instance through its Beefweb REST API,
//! keeps the last-broadcast view of the player, and pushes only the parts
//! that changed to a single browser client as HTML fragments over a
//! WebSocket.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`beefweb`]: Beefweb REST client, wire types and track records
//! - [`services`]: The sync engine and its diff state
//! - [`events`]: UI patches, fragment rendering and delivery
//! - [`api`]: HTTP routes, the WebSocket handler and the client registry
//! - [`artwork`]: Latest cover art served to the page
//! - [`bootstrap`]: Composition root
//! - [`state`]: Core configuration
//! - [`error`]: Centralized error types
//!
//! # Abstraction Traits
//!
//! - [`PlayerQuery`](beefweb::PlayerQuery) / [`PlayerControl`](beefweb::PlayerControl):
//!   the remote player
//! - [`PatchEmitter`](events::PatchEmitter): where UI patches go
//! - [`TaskSpawner`](runtime::TaskSpawner): spawning fire-and-forget work

#![warn(clippy::all)]

pub mod api;
pub mod artwork;
pub mod beefweb;
pub mod bootstrap;
pub mod error;
pub mod events;
pub mod protocol_constants;
pub mod runtime;
pub mod services;
pub mod state;

// Re-export commonly used types at the crate root
pub use artwork::ArtworkStore;
pub use error::{ConanError, ConanResult, ErrorCode};
pub use events::{ClientBroadcaster, Delivery, PatchEmitter, UiPatch};
pub use runtime::{TaskSpawner, TokioSpawner};
pub use state::Config;

// Re-export Beefweb types
pub use beefweb::{
    ActiveItem, Artwork, BeefwebClient, PlaybackState, PlayerApi, PlayerControl, PlayerQuery,
    PlayerStatus, RemoteError, RemoteResult, Track, TrackError,
};

// Re-export service types
pub use services::{PlaybackIntent, SyncEngine, SyncHandle};

// Re-export bootstrap types
pub use bootstrap::{bootstrap_services, BootstrappedServices};

// Re-export API types
pub use api::{serve, start_server, AppState, ConnectionRegistry, ServerError};
