//! Periodic auto-save scheduler
//!
//! Runs a background tokio task that fires on a fixed interval and saves a
//! snapshot each tick. Failures of a background save are logged and never
//! stop the timer, since no caller is synchronously waiting on it.

use crate::error::StoreError;
use crate::snapshot::{self, SnapshotConfig};
use crate::store::Store;
use serde::Serialize;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

/// Handle to a running auto-save task
///
/// [`AutoSave::stop`] consumes the handle, so stopping twice is not
/// representable. Dropping the handle without stopping closes the shutdown
/// channel and the task exits on its next poll; no timer is leaked.
pub struct AutoSave {
    /// Signals the background task to exit
    shutdown_tx: oneshot::Sender<()>,

    /// The background task itself
    handle: JoinHandle<()>,
}

impl AutoSave {
    /// Start a scheduler that snapshots `store` to the configured path
    pub fn start<K, V>(store: Arc<Store<K, V>>, config: &SnapshotConfig) -> Self
    where
        K: Eq + Hash + Clone + Serialize + Send + Sync + 'static,
        V: Clone + Serialize + Send + Sync + 'static,
    {
        let path = config.path.clone();
        info!(
            "Auto-save armed: {} every {:?}",
            path.display(),
            config.interval
        );
        Self::with_save_fn(config.interval, move || snapshot::save(&store, &path))
    }

    /// Start a scheduler with a caller-provided save hook
    ///
    /// The hook runs once per tick on the scheduler task.
    pub fn with_save_fn<F>(interval: Duration, mut save: F) -> Self
    where
        F: FnMut() -> Result<(), StoreError> + Send + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            // First fire one full interval after start, not immediately
            let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        debug!("Auto-save tick");
                        if let Err(e) = save() {
                            error!("Auto-save failed: {}", e);
                        }
                    }
                    _ = &mut shutdown_rx => {
                        info!("Auto-save scheduler stopping");
                        break;
                    }
                }
            }
        });

        AutoSave {
            shutdown_tx,
            handle,
        }
    }

    /// Stop the scheduler and wait for the task to exit
    ///
    /// Once this returns, no save triggered by this scheduler subsequently
    /// begins; an in-flight save is allowed to complete first.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.handle.await;
    }
}
