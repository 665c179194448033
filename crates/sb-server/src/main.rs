mod config;
mod services;
mod web;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use sb_app::{BroadcastHub, GetLatestByType, GetRecentHistory, SubmitClipboardEntry};
use sb_core::ports::EntryStorePort;
use sb_infra::db::DieselSqliteExecutor;
use sb_infra::{init_db_pool, CachedEntryStore, DieselEntryStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::services::AppServices;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config::load()?;
    info!(
        listen_addr = %config.server.listen_addr,
        database_url = %config.storage.database_url,
        "Starting shareboard server"
    );

    let pool = init_db_pool(&config.storage.database_url)?;
    let store: Arc<dyn EntryStorePort> = Arc::new(CachedEntryStore::new(
        Arc::new(DieselEntryStore::new(DieselSqliteExecutor::new(pool))),
        config.storage.history_limit,
    ));

    let hub = Arc::new(BroadcastHub::new(config.hub.clone()));
    let _reaper = hub.spawn_reaper();

    let services = Arc::new(AppServices {
        submit: SubmitClipboardEntry::new(store.clone(), hub.clone()),
        history: GetRecentHistory::new(store.clone(), config.storage.history_limit),
        latest: GetLatestByType::new(store.clone()),
        hub,
    });

    let routes = web::routes(services, &config.server.allowed_origin);

    let addr: SocketAddr = config
        .server
        .listen_addr
        .parse()
        .with_context(|| format!("invalid listen address: {}", config.server.listen_addr))?;

    warp::serve(routes).run(addr).await;

    Ok(())
}
