//! coderelay gateway binary.
//!
//! - WebSocket endpoint: /ws
//! - Ops endpoints: /healthz, /readyz, /metrics
//! - Tracing span per session
//! - Heartbeat ping + idle timeout drive the disconnect path
//!
//! Startup failures (config, bind) are fatal: logged, then exit code 1.

use std::net::SocketAddr;
use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use coderelay_core::error::{RelayError, Result};
use coderelay_gateway::{app_state::AppState, config, router};

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "coderelay-gateway failed to start");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cfg = config::load_from_env()?;
    let listen: SocketAddr = cfg
        .gateway
        .listen
        .parse()
        .map_err(|e| RelayError::Config(format!("gateway.listen must be a valid SocketAddr: {e}")))?;

    let state = AppState::new(cfg)?;
    let app = router::build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| RelayError::Transport(format!("failed to bind {listen}: {e}")))?;
    tracing::info!(%listen, "coderelay-gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|e| RelayError::Transport(format!("server failed: {e}")))?;

    tracing::info!("coderelay-gateway stopped");
    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM; readiness flips to draining first.
async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
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

    state.set_draining();
    tracing::info!("shutdown requested; draining");
}
