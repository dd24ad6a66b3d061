// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Pending Auth Code Sweeper
//!
//! Codes that are issued but never redeemed would otherwise stay in memory
//! until someone tries them. Every `interval` the sweeper drops entries whose
//! deadline has passed.
//!
//! Redemption never depends on the sweeper: an expired code is rejected
//! whether or not it has been purged yet.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken`, cancelled from `main` once the
//! HTTP server begins its graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::auth::PendingAuthStore;

/// Background task that purges expired pending auth codes.
pub struct PendingAuthSweeper {
    store: Arc<PendingAuthStore>,
    interval: Duration,
}

impl PendingAuthSweeper {
    pub fn new(store: Arc<PendingAuthStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Run until the cancellation token is triggered.
    ///
    /// ```rust,ignore
    /// tokio::spawn(sweeper.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Pending auth sweeper starting"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {},
                _ = shutdown.cancelled() => {
                    info!("Pending auth sweeper shutting down");
                    return;
                }
            }

            self.sweep();
        }
    }

    /// Purge once, returning how many codes were dropped.
    pub fn sweep(&self) -> usize {
        let removed = self.store.purge_expired();
        if removed > 0 {
            info!(removed, remaining = self.store.len(), "Purged expired auth codes");
        } else {
            debug!(remaining = self.store.len(), "No expired auth codes");
        }
        removed
    }
}
