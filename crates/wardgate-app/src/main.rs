use std::sync::Arc;

use salvo::Listener;
use salvo::conn::TcpListener;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

use wardgate_app::app::router;
use wardgate_app::state::AppState;
use wardgate_core::config::load_config;
use wardgate_service::auth::{AuthService, DirectoryVerifier};
use wardgate_service::authz::CapabilityPolicy;
use wardgate_service::guard::RouteGuard;
use wardgate_service::guard::routes::RouteTable;
use wardgate_service::session::SessionStore;
use wardgate_service::storage::FileStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting wardgate");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let verifier = DirectoryVerifier::from_accounts(&config.auth.accounts)?;
    if verifier.is_empty() {
        tracing::warn!("No accounts configured, every login will be rejected");
    }

    let storage = Arc::new(FileStore::new(&config.session.storage_dir));
    tracing::info!(storage_dir = %storage.dir().display(), "Session storage ready");
    let session = Arc::new(SessionStore::new(storage).with_max_age(config.session.max_age()));

    // Requests for guarded views get 503 until this finishes.
    let hydrating = session.clone();
    tokio::spawn(async move {
        hydrating.hydrate().await;
    });

    let guard = RouteGuard::new(session.subscribe(), Arc::new(RouteTable::hospital_default()));
    let auth = AuthService::new(session, Arc::new(verifier), config.auth.verify_timeout());
    let policy = CapabilityPolicy::from_table().await?;

    let state = Arc::new(AppState {
        auth,
        guard,
        policy,
    });

    let bind_addr = config.server.bind_addr();
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    tracing::info!("Server listening on {bind_addr}");

    salvo::Server::new(acceptor).serve(router(state)).await;

    Ok(())
}
