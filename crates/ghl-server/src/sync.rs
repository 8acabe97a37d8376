use ghl_bridge::BridgeErr;
use ghl_bridge::BridgeHandle;
use ghl_core::SYNC_INTERVAL;
use ghl_pg::PgErr;
use ghl_roster::Reconciler;
use ghl_roster::RoleMapping;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_postgres::Client;

/// Why a reconciliation pass aborted. Aborts leave already-committed
/// rows in place; the pass is idempotent and retried on the next tick or
/// operator resync.
#[derive(Debug)]
pub enum SyncErr {
    /// The guild snapshot could not be read.
    Snapshot(BridgeErr),
    /// The identity store rejected a statement mid-pass.
    Store(PgErr),
    /// The role-mapping file could not be rewritten.
    Persist(std::io::Error),
}

impl std::fmt::Display for SyncErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Snapshot(e) => write!(f, "snapshot read failed: {}", e),
            Self::Store(e) => write!(f, "identity store write failed: {}", e),
            Self::Persist(e) => write!(f, "role mapping write failed: {}", e),
        }
    }
}

impl std::error::Error for SyncErr {}

/// Owns the role mapping and drives reconciliation passes.
///
/// The mapping is process-owned state, loaded once at startup and written
/// back only when discovery grows it.
pub struct Syncer {
    db: Arc<Client>,
    bridge: BridgeHandle,
    engine: Reconciler,
    mapping: RwLock<RoleMapping>,
    file: PathBuf,
    marker: String,
}

impl Syncer {
    pub fn new(
        db: Arc<Client>,
        bridge: BridgeHandle,
        engine: Reconciler,
        mapping: RoleMapping,
        file: PathBuf,
        marker: String,
    ) -> Self {
        Self {
            db,
            bridge,
            engine,
            mapping: RwLock::new(mapping),
            file,
            marker,
        }
    }

    /// Passive pass: discovery plus upsert-only reconciliation.
    pub async fn refresh(&self) -> Result<(), SyncErr> {
        self.pass(false).await
    }

    /// Operator-triggered pass: discovery plus full sync, deleting rows
    /// for members no longer present.
    pub async fn resync(&self) -> Result<(), SyncErr> {
        self.pass(true).await
    }

    async fn pass(&self, full: bool) -> Result<(), SyncErr> {
        let snapshot = self.bridge.roster().await.map_err(SyncErr::Snapshot)?;
        {
            let mut mapping = self.mapping.write().await;
            if mapping.discover(&snapshot.roles, &self.marker) {
                mapping.save(&self.file).map_err(SyncErr::Persist)?;
                log::info!("[sync] role mapping saved to {}", self.file.display());
            }
        }
        let mapping = self.mapping.read().await;
        if full {
            self.engine
                .fullsync(&self.db, &snapshot.members, &mapping)
                .await
                .map_err(SyncErr::Store)
        } else {
            self.engine
                .upsert(&self.db, &snapshot.members, &mapping)
                .await
                .map_err(SyncErr::Store)
        }
    }

    /// Periodic driver: an upsert-only pass every [`SYNC_INTERVAL`],
    /// starting immediately. Failures are logged and the loop continues;
    /// there is no internal retry beyond the next tick.
    pub async fn tick(self: Arc<Self>) {
        let mut interval = tokio::time::interval(SYNC_INTERVAL);
        loop {
            interval.tick().await;
            match self.refresh().await {
                Ok(()) => log::info!("[sync] periodic pass complete"),
                Err(e) => log::warn!("[sync] periodic pass aborted: {}", e),
            }
        }
    }
}
