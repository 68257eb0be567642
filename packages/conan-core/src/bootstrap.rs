//! Application bootstrap and dependency wiring.
//!
//! This module is the composition root: the one place where the Beefweb
//! client, the connection registry, the broadcaster and the sync engine are
//! created and wired together.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use reqwest::Client;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::ConnectionRegistry;
use crate::artwork::ArtworkStore;
use crate::beefweb::{BeefwebClient, PlayerApi};
use crate::error::{ConanError, ConanResult};
use crate::events::{ClientBroadcaster, LoggingPatchEmitter, PatchEmitter};
use crate::runtime::TokioSpawner;
use crate::services::{command_channel, SyncCommand, SyncEngine, SyncHandle};
use crate::state::Config;

/// How long shutdown waits for an in-flight tick to finish.
const ENGINE_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Engine and its command receiver, parked until background tasks start.
type PendingEngine = (SyncEngine, mpsc::Receiver<SyncCommand>);

/// Container for all bootstrapped services.
///
/// Cheap to clone; clones share the same engine and registry.
#[derive(Clone)]
pub struct BootstrappedServices {
    /// Validated configuration.
    pub config: Arc<Config>,
    /// Beefweb REST client.
    pub player: Arc<BeefwebClient>,
    /// The single connected UI client.
    pub registry: Arc<ConnectionRegistry>,
    /// Patch sink that writes to the registry.
    pub broadcaster: Arc<ClientBroadcaster>,
    /// Latest cover art served at `/artwork`.
    pub artwork: Arc<ArtworkStore>,
    /// Command channel into the sync engine.
    pub sync: SyncHandle,
    /// Task spawner for background operations.
    pub spawner: TokioSpawner,
    /// Cancellation token for graceful shutdown.
    pub cancel_token: CancellationToken,
    pending_engine: Arc<Mutex<Option<PendingEngine>>>,
    engine_task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl BootstrappedServices {
    /// Starts the sync engine loop. Calling this more than once is a no-op.
    pub fn start_background_tasks(&self) {
        let Some((engine, commands)) = self.pending_engine.lock().take() else {
            log::debug!("[Bootstrap] Background tasks already started");
            return;
        };

        let cancel = self.cancel_token.child_token();
        let task = tokio::spawn(engine.run(commands, cancel));
        *self.engine_task.lock() = Some(task);
    }

    /// Returns true while the engine task is running.
    pub fn is_running(&self) -> bool {
        self.engine_task
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Initiates graceful shutdown of all services.
    pub async fn shutdown(&self) {
        log::info!("[Bootstrap] Beginning graceful shutdown...");

        // Stops the engine loop; intent requests already in flight run to completion
        self.cancel_token.cancel();

        let task = self.engine_task.lock().take();
        if let Some(task) = task {
            match tokio::time::timeout(ENGINE_SHUTDOWN_TIMEOUT, task).await {
                Ok(Ok(())) => log::info!("[Bootstrap] Sync engine stopped"),
                Ok(Err(e)) => log::warn!("[Bootstrap] Sync engine task failed: {}", e),
                Err(_) => log::warn!(
                    "[Bootstrap] Sync engine did not stop within {:?}",
                    ENGINE_SHUTDOWN_TIMEOUT
                ),
            }
        }

        let closed = self.registry.close_all();
        if closed > 0 {
            log::info!("[Bootstrap] Closed {} WebSocket connection(s)", closed);
        }

        log::info!("[Bootstrap] Shutdown complete");
    }
}

/// Creates the shared HTTP client for all Beefweb communication.
///
/// Every request inherits `timeout`, so a stalled player never blocks a
/// sync tick for longer than that.
fn create_http_client(timeout: Duration) -> ConanResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ConanError::Internal(format!("Failed to create HTTP client: {}", e)))
}

/// Bootstraps all application services with their dependencies.
///
/// Services are created in dependency order:
///
/// 1. Shared infrastructure (HTTP client, cancellation token, spawner)
/// 2. Beefweb client (depends on HTTP client)
/// 3. Connection registry and broadcaster
/// 4. Sync engine (depends on client, broadcaster, artwork store)
///
/// The engine is built here but only starts polling once
/// [`BootstrappedServices::start_background_tasks`] is called.
///
/// # Errors
///
/// Returns [`ConanError::Configuration`] when `config` fails validation and
/// [`ConanError::Internal`] when the HTTP client cannot be built.
pub fn bootstrap_services(
    config: &Config,
    handle: tokio::runtime::Handle,
) -> ConanResult<BootstrappedServices> {
    config.validate().map_err(ConanError::Configuration)?;
    let config = Arc::new(config.clone());

    let spawner = TokioSpawner::new(handle);
    let http_client = create_http_client(config.request_timeout())?;
    let cancel_token = CancellationToken::new();

    let player = Arc::new(BeefwebClient::new(
        http_client.clone(),
        config.normalized_api_url(),
    ));
    log::info!("[Bootstrap] Beefweb API at {}", player.base_url());

    let registry = Arc::new(ConnectionRegistry::new());
    let broadcaster = Arc::new(ClientBroadcaster::new(Arc::clone(&registry)));
    broadcaster.set_external_emitter(Arc::new(LoggingPatchEmitter));

    let artwork = Arc::new(ArtworkStore::new());

    let (sync, commands) = command_channel();
    let engine = SyncEngine::new(
        Arc::clone(&player) as Arc<dyn PlayerApi>,
        Arc::clone(&broadcaster) as Arc<dyn PatchEmitter>,
        Arc::clone(&artwork),
        spawner.clone(),
        config.poll_interval(),
    );

    Ok(BootstrappedServices {
        config,
        player,
        registry,
        broadcaster,
        artwork,
        sync,
        spawner,
        cancel_token,
        pending_engine: Arc::new(Mutex::new(Some((engine, commands)))),
        engine_task: Arc::new(Mutex::new(None)),
    })
}
