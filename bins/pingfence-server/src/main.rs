//! Pingfence server binary.
//!
//! Wires the HTTP surface to its collaborators and serves until
//! interrupted. Two stacks are available:
//!
//! - the Google stack (default): Firestore for storage, FCM for push,
//!   authenticated through a service-account key
//! - `--memory-store`: everything in process memory, push dispatches
//!   recorded instead of delivered, no credentials needed

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use pingfence_api::{construct_router, AppState, State};
use pingfence_core::memory::{
    MemoryHistoryStore, MemoryScheduleStore, MemoryTokenStore, RecordingPushSender,
};
use pingfence_core::stores::SystemClock;
use pingfence_fcm::{FcmConfig, FcmError, FcmSender};
use pingfence_firestore::{FirestoreClient, FirestoreConfig, FirestoreError};
use pingfence_gcp_auth::{AuthConfig, TokenProvider};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Geofenced schedule notification server
#[derive(Parser)]
#[command(name = "pingfence-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "PINGFENCE_LISTEN", default_value = "0.0.0.0:8000")]
    listen: SocketAddr,

    /// Run on in-memory stores instead of Firestore and FCM
    #[arg(long)]
    memory_store: bool,

    /// Emit logs as JSON
    #[arg(long, env = "PINGFENCE_JSON_LOGS")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    info!(version = env!("CARGO_PKG_VERSION"), "starting pingfence-server");

    let state = if cli.memory_store {
        info!("using in-memory stores; nothing is persisted across restarts");
        memory_state()
    } else {
        google_state()?
    };

    let listener = TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("failed to bind {}", cli.listen))?;
    info!(listen = %cli.listen, "server ready");

    axum::serve(listener, construct_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

fn init_tracing(json_logs: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn memory_state() -> AppState {
    State::new(
        Arc::new(MemoryScheduleStore::new()),
        Arc::new(MemoryTokenStore::new()),
        Arc::new(MemoryHistoryStore::new()),
        Arc::new(RecordingPushSender::new()),
        Arc::new(SystemClock),
    )
}

fn google_state() -> anyhow::Result<AppState> {
    let auth_config = AuthConfig::from_env()
        .context("service-account credentials are required unless --memory-store is set")?;
    let auth = Arc::new(TokenProvider::from_config(&auth_config)?);

    // GOOGLE_CLOUD_PROJECT wins; the key file's project id is the fallback.
    let firestore_config = match FirestoreConfig::from_env() {
        Ok(config) => config,
        Err(FirestoreError::MissingEnvVar(var)) => {
            let project_id = auth.project_id().with_context(|| {
                format!("{var} is not set and the credentials file carries no project id")
            })?;
            FirestoreConfig::new(project_id)
        }
        Err(err) => return Err(err.into()),
    };
    let fcm_config = match FcmConfig::from_env() {
        Ok(config) => config,
        Err(FcmError::MissingEnvVar(_)) => FcmConfig::new(firestore_config.project_id.clone()),
        Err(err) => return Err(err.into()),
    };

    info!(project_id = %firestore_config.project_id, "using Firestore and FCM");

    let firestore = FirestoreClient::new(firestore_config, auth.clone())?;
    let fcm = FcmSender::new(fcm_config, auth)?;

    Ok(State::new(
        Arc::new(firestore.schedules()),
        Arc::new(firestore.tokens()),
        Arc::new(firestore.history()),
        Arc::new(fcm),
        Arc::new(SystemClock),
    ))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
        info!("received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
