//! Periodic refresh of the sensor grid, scoped to a login session

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::sync::Synchronizer;

/// Spawns the live-update loop
pub struct LiveUpdate;

impl LiveUpdate {
    /// Start refreshing every `interval` until `cancel` fires. The first
    /// refresh happens one interval after the call.
    pub fn spawn(
        sync: Arc<Synchronizer>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> LiveUpdateHandle {
        let task_cancel = cancel.clone();
        let join = tokio::spawn(async move {
            run_loop(sync, interval, task_cancel).await;
        });
        tracing::debug!("Live update started (interval {:?})", interval);
        LiveUpdateHandle {
            cancel,
            join: Some(join),
        }
    }
}

async fn run_loop(sync: Arc<Synchronizer>, interval: Duration, cancel: CancellationToken) {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = cancel.cancelled() => {
                tracing::debug!("Live update loop cancelled");
                break;
            }
        }

        tracing::debug!("Live update tick");
        tokio::select! {
            _ = sync.refresh_all() => {}
            _ = cancel.cancelled() => {
                tracing::debug!("Live update loop cancelled mid-refresh");
                break;
            }
        }
    }
}

/// Owner of a running live-update loop. Dropping the handle cancels the loop.
#[derive(Debug)]
pub struct LiveUpdateHandle {
    cancel: CancellationToken,
    join: Option<JoinHandle<()>>,
}

impl LiveUpdateHandle {
    pub fn is_running(&self) -> bool {
        self.join.as_ref().is_some_and(|j| !j.is_finished())
    }

    /// Cancel the loop and wait for it to finish
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(join) = self.join.take() {
            if let Err(e) = join.await {
                tracing::warn!("Live update task ended abnormally: {}", e);
            }
        }
        tracing::debug!("Live update stopped");
    }
}

impl Drop for LiveUpdateHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
