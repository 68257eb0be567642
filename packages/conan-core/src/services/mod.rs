//! Domain services.
//!
//! - `state_store` - Last-known player snapshot and per-slot display state
//! - `sync_engine` - Polling, diffing and patch emission

pub mod state_store;
pub mod sync_engine;

pub use state_store::{DisplaySlot, SlotChange, StateStore};
pub use sync_engine::{command_channel, PlaybackIntent, SyncCommand, SyncEngine, SyncHandle};
