//! Periodic reaper for expired refresh token records and stale login
//! attempts.

use std::{sync::Arc, time::Duration};

use tokio::{sync::watch, task::JoinHandle, time::sleep};
use tracing::{debug, error, info};

use super::{engine::AuthEngine, error::AuthError};

/// Run one pass now and then every `interval` until `shutdown` flips to
/// `true` or its sender is dropped.
///
/// Each pass is a single delete statement, so stopping between passes never
/// leaves a partial delete behind.
pub fn spawn_cleanup_worker(
    engine: Arc<AuthEngine>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let interval = if interval.is_zero() {
            Duration::from_secs(1)
        } else {
            interval
        };

        loop {
            if *shutdown.borrow() {
                break;
            }

            match engine.cleanup_expired().await {
                Ok(0) => debug!("no expired refresh tokens"),
                Ok(removed) => info!(removed, "expired refresh tokens deleted"),
                Err(AuthError::Internal(source)) => {
                    error!("refresh token cleanup failed: {source:#}");
                }
                Err(err) => error!("refresh token cleanup failed: {err}"),
            }

            match engine.prune_attempts().await {
                Ok(0) => debug!("no stale login attempts"),
                Ok(removed) => info!(removed, "stale login attempts deleted"),
                Err(AuthError::Internal(source)) => {
                    error!("login attempt pruning failed: {source:#}");
                }
                Err(err) => error!("login attempt pruning failed: {err}"),
            }

            tokio::select! {
                () = sleep(interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        debug!("refresh token cleanup stopped");
    })
}
