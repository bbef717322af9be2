//! Packlist Backend
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and implementations
//! - files: External file host
//! - commands: Procedure handlers
//! - jobs: Unused image cleanup
//! - api: HTTP surface

use std::sync::Arc;
use tokio::net::TcpListener;

pub mod domain;
pub mod repository;
pub mod files;
pub mod commands;
pub mod jobs;
pub mod api;
pub mod config;

use crate::config::AppConfig;
use crate::files::{FileHost, NoopFileHost, UploadThingHost};
use crate::repository::{
    init_db, DbState, ItemRepository, ListRepository, SessionRepository, UnusedImageRepository,
};

/// Application state shared across requests
pub struct AppState {
    pub db_state: DbState,
    pub lists: ListRepository,
    pub items: ItemRepository,
    pub unused_images: UnusedImageRepository,
    pub sessions: SessionRepository,
    pub file_host: Arc<dyn FileHost>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db_state: DbState, file_host: Arc<dyn FileHost>, config: AppConfig) -> Self {
        let conn = db_state.conn.clone();
        Self {
            lists: ListRepository::new(conn.clone()),
            items: ItemRepository::new(conn.clone()),
            unused_images: UnusedImageRepository::new(conn.clone()),
            sessions: SessionRepository::new(conn, config.session_ttl_secs),
            db_state,
            file_host,
            config,
        }
    }
}

/// File host selected by the configuration
pub fn file_host_for(config: &AppConfig) -> Arc<dyn FileHost> {
    match config.file_host_secret.as_deref().map(str::trim) {
        Some(secret) if !secret.is_empty() => {
            Arc::new(UploadThingHost::new(&config.file_host_url, secret.to_string()))
        }
        _ => {
            log::warn!("file_host_secret is not set, hosted images will not be deleted");
            Arc::new(NoopFileHost)
        }
    }
}

/// Open the database and build the shared state
pub async fn build_state(config: AppConfig) -> domain::DomainResult<Arc<AppState>> {
    let db_state = init_db(&config.database_path).await?;
    let file_host = file_host_for(&config);
    Ok(Arc::new(AppState::new(db_state, file_host, config)))
}

/// Serve the API on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let sweeper = state
        .config
        .cleanup_interval()
        .map(|interval| jobs::spawn_sweeper(state.clone(), interval));

    let app = api::build_router(state);
    let result = axum::serve(listener, app).with_graceful_shutdown(shutdown).await;

    if let Some(handle) = sweeper {
        handle.abort();
    }
    result
}
