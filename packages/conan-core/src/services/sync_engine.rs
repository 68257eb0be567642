//! Player state synchronization and diff broadcasting.
//!
//! [`SyncEngine`] runs as a single task. Each tick fetches the player
//! status, diffs it against the [`StateStore`], and emits a [`UiPatch`] only
//! for slots whose on-screen content changed. Client connects and user
//! intents arrive as [`SyncCommand`]s on the same task, so ticks and
//! connect handling never overlap.
//!
//! Per-tick emission order is fixed: playback state, now-playing, cover art,
//! up-next.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::state_store::{SlotChange, StateStore};
use crate::artwork::ArtworkStore;
use crate::beefweb::{ActiveItem, PlayerApi, Track};
use crate::error::ErrorCode;
use crate::events::{PatchEmitter, UiPatch};
use crate::protocol_constants::COMMAND_CHANNEL_CAPACITY;
use crate::runtime::{TaskSpawner, TokioSpawner};

/// A user request forwarded to the remote player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackIntent {
    TogglePlayPause,
    Skip,
    Stop,
}

/// Work items for the engine task besides its own timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncCommand {
    /// A UI client connected and needs the full state.
    ClientConnected,
    /// Forward a transport command to the player.
    Intent(PlaybackIntent),
}

/// Cloneable sender side of the engine's command channel.
#[derive(Clone)]
pub struct SyncHandle {
    tx: mpsc::Sender<SyncCommand>,
}

impl SyncHandle {
    /// Asks the engine to re-broadcast everything. Returns false if dropped.
    pub fn client_connected(&self) -> bool {
        self.submit(SyncCommand::ClientConnected)
    }

    /// Queues a user intent. Returns false if dropped.
    pub fn intent(&self, intent: PlaybackIntent) -> bool {
        self.submit(SyncCommand::Intent(intent))
    }

    fn submit(&self, command: SyncCommand) -> bool {
        match self.tx.try_send(command) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(command)) => {
                log::warn!("[Sync] Command queue full, dropping {:?}", command);
                false
            }
            Err(mpsc::error::TrySendError::Closed(command)) => {
                log::debug!("[Sync] Engine stopped, dropping {:?}", command);
                false
            }
        }
    }
}

/// Creates the command channel connecting the transport to the engine.
pub fn command_channel() -> (SyncHandle, mpsc::Receiver<SyncCommand>) {
    let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
    (SyncHandle { tx }, rx)
}

/// Polls the remote player and pushes minimal UI patches.
pub struct SyncEngine {
    player: Arc<dyn PlayerApi>,
    emitter: Arc<dyn PatchEmitter>,
    artwork: Arc<ArtworkStore>,
    spawner: TokioSpawner,
    poll_interval: Duration,
    store: StateStore,
    /// Last record that failed to parse, so a stuck one is reported once.
    last_rejected: Option<Vec<String>>,
}

impl SyncEngine {
    pub fn new(
        player: Arc<dyn PlayerApi>,
        emitter: Arc<dyn PatchEmitter>,
        artwork: Arc<ArtworkStore>,
        spawner: TokioSpawner,
        poll_interval: Duration,
    ) -> Self {
        Self {
            player,
            emitter,
            artwork,
            spawner,
            poll_interval,
            store: StateStore::new(),
            last_rejected: None,
        }
    }

    #[must_use]
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Runs until `cancel` fires or every [`SyncHandle`] is dropped.
    ///
    /// The next tick is scheduled only after the current one, including any
    /// queue and artwork fetches, has finished. A tick in flight when
    /// `cancel` fires runs to completion.
    pub async fn run(mut self, mut commands: mpsc::Receiver<SyncCommand>, cancel: CancellationToken) {
        log::info!(
            "[Sync] Engine started (poll interval {:?})",
            self.poll_interval
        );
        let mut next_tick = Instant::now();

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    log::info!("[Sync] Engine stopping");
                    break;
                }
                command = commands.recv() => match command {
                    Some(SyncCommand::ClientConnected) => self.on_client_connected(),
                    Some(SyncCommand::Intent(intent)) => self.dispatch_intent(intent),
                    None => {
                        log::info!("[Sync] Command channel closed, engine stopping");
                        break;
                    }
                },
                _ = tokio::time::sleep_until(next_tick) => {
                    self.on_timer_tick().await;
                    next_tick = Instant::now() + self.poll_interval;
                }
            }
        }
    }

    /// One poll-diff-broadcast cycle.
    pub async fn on_timer_tick(&mut self) {
        let status = match self.player.fetch_status().await {
            Ok(status) => status,
            Err(e) => {
                log::warn!("[Sync] Player status unavailable [{}]: {}", e.code(), e);
                return;
            }
        };

        if self.store.playback_state_changed(&status) {
            log::debug!(
                "[Sync] Playback state {:?} -> {:?}",
                self.store.playback_state(),
                status.playback_state
            );
            self.emitter
                .emit(UiPatch::PlaybackState(status.playback_state));
        }

        let active = self.parse_record(&status.active_item.columns);
        if self.store.needs_queue_refresh(active.as_ref()) {
            self.refresh_tracks(&status.active_item).await;
        }

        self.store.set_status(status);
    }

    /// Re-broadcasts every slot from stored state, ignoring dedup.
    pub fn on_client_connected(&self) {
        log::info!("[Sync] Client connected, sending full state");
        self.emitter
            .emit(UiPatch::PlaybackState(self.store.playback_state()));
        self.emitter.emit(UiPatch::NowPlaying(
            self.store.now_playing().track().cloned(),
        ));
        self.emitter.emit(UiPatch::CoverArt(self.artwork.revision()));
        self.emitter
            .emit(UiPatch::UpNext(self.store.up_next().track().cloned()));
    }

    /// Forwards `intent` to the player on a separate task.
    pub fn dispatch_intent(&self, intent: PlaybackIntent) {
        let player = Arc::clone(&self.player);
        self.spawner.spawn(async move {
            log::debug!("[Sync] Dispatching {:?}", intent);
            let result = match intent {
                PlaybackIntent::TogglePlayPause => player.toggle_pause().await,
                PlaybackIntent::Skip => player.next().await,
                PlaybackIntent::Stop => player.stop().await,
            };
            if let Err(e) = result {
                log::warn!("[Sync] {:?} failed [{}]: {}", intent, e.code(), e);
            }
        });
    }

    /// Parses a raw record, discarding malformed ones.
    ///
    /// A rejected record is logged at error level the first time it shows
    /// up; repeats of the same record on later ticks only go to debug.
    fn parse_record(&mut self, columns: &[String]) -> Option<Track> {
        if columns.is_empty() {
            return None;
        }
        match Track::from_columns(columns) {
            Ok(track) => Some(track),
            Err(e) => {
                if self.last_rejected.as_deref() == Some(columns) {
                    log::debug!("[Sync] Still discarding track record [{}]: {}", e.code(), e);
                } else {
                    log::error!("[Sync] Discarding track record [{}]: {}", e.code(), e);
                    self.last_rejected = Some(columns.to_vec());
                }
                None
            }
        }
    }

    async fn refresh_tracks(&mut self, item: &ActiveItem) {
        let window = match self
            .player
            .fetch_queue_window(&item.playlist_id, item.index)
            .await
        {
            Ok(window) => window,
            Err(e) => {
                log::warn!("[Sync] Queue window unavailable [{}]: {}", e.code(), e);
                return;
            }
        };

        let current = window.first().and_then(|columns| self.parse_record(columns));
        let next = window.get(1).and_then(|columns| self.parse_record(columns));

        let album_changed = match (&current, self.store.now_playing().track()) {
            (Some(new), Some(old)) => !new.same_album(old),
            (Some(_), None) => true,
            (None, _) => false,
        };

        match self.store.apply_now_playing(current) {
            SlotChange::Show(track) => {
                log::info!("[Sync] Now playing: {} - {}", track.artist, track.title);
                self.emitter.emit(UiPatch::NowPlaying(Some(track)));
            }
            SlotChange::Clear => {
                log::info!("[Sync] Now playing cleared");
                self.emitter.emit(UiPatch::NowPlaying(None));
                self.artwork.clear();
                self.emitter.emit(UiPatch::CoverArt(None));
            }
            SlotChange::Unchanged => {}
        }

        if album_changed {
            self.refresh_artwork(item).await;
        }

        match self.store.apply_up_next(next) {
            SlotChange::Show(track) => {
                self.emitter.emit(UiPatch::UpNext(Some(track)));
            }
            SlotChange::Clear => {
                self.emitter.emit(UiPatch::UpNext(None));
            }
            SlotChange::Unchanged => {}
        }
    }

    async fn refresh_artwork(&self, item: &ActiveItem) {
        let index = item.window_start();
        let revision = match self.player.fetch_artwork(&item.playlist_id, index).await {
            Ok(artwork) => {
                log::debug!(
                    "[Sync] Artwork updated ({} bytes, {})",
                    artwork.bytes.len(),
                    artwork.content_type
                );
                Some(self.artwork.replace(artwork))
            }
            Err(e) => {
                log::warn!("[Sync] Artwork unavailable [{}]: {}", e.code(), e);
                self.artwork.clear();
                None
            }
        };
        self.emitter.emit(UiPatch::CoverArt(revision));
    }
}
