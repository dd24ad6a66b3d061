// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{error::Error, time::Duration};

use axum_server::{tls_rustls::RustlsConfig, Handle};
use fansly_api_server::{
    api::router, config::ServerConfig, logging::init_tracing, state::AppState,
    sweeper::PendingAuthSweeper,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Grace period for in-flight requests after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::from_env()?;
    init_tracing(config.log_format);

    let (secret, generated) = config.credential_secret()?;
    if generated {
        warn!("JWT_SECRET not set; using a random per-process secret. Sessions will not survive a restart");
    }

    let addr = config.bind_addr()?;
    let tls = config.tls.clone();
    let sweep_interval = config.sweep_interval_secs;
    info!(
        environment = ?config.environment,
        issuer = %config.jwt_issuer,
        session_ttl_secs = config.session_ttl_secs,
        auth_code_ttl_secs = config.auth_code_ttl_secs,
        "Configuration loaded"
    );

    let state = AppState::new(config, &secret)?;

    let shutdown = CancellationToken::new();
    if sweep_interval > 0 {
        let sweeper =
            PendingAuthSweeper::new(state.pending.clone(), Duration::from_secs(sweep_interval));
        tokio::spawn(sweeper.run(shutdown.clone()));
    }

    let app = router(state);

    let handle = Handle::new();
    let signal_handle = handle.clone();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!(grace_secs = SHUTDOWN_GRACE.as_secs(), "Shutdown signal received");
        signal_token.cancel();
        signal_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
    });

    match tls {
        Some(paths) => {
            // Must happen before any TLS operation.
            rustls::crypto::ring::default_provider()
                .install_default()
                .map_err(|_| "failed to install rustls crypto provider")?;
            let tls_config = RustlsConfig::from_pem_file(&paths.cert, &paths.key).await?;

            info!("Fansly API server listening on https://{addr} (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            info!("Fansly API server listening on http://{addr} (docs at /docs)");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
    }

    shutdown.cancel();
    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
