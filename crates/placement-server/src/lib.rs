//! Placement report server
//!
//! Axum transport in front of the `placement-core` report pipeline.

pub mod api;
pub mod config;

use std::sync::Arc;

use placement_core::{Database, ReportService, TokenKeys};

pub use api::create_router;
pub use config::ServerConfig;

/// Shared state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub reports: Arc<ReportService<Database>>,
    pub keys: TokenKeys,
}

impl AppState {
    pub fn new(db: Database, keys: TokenKeys) -> Self {
        Self {
            reports: Arc::new(ReportService::new(db)),
            keys,
        }
    }
}

/// Open the database and serve the API until the listener fails
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let db = Database::open(config.db_path.clone()).await?;
    log::info!("Database initialized successfully");

    let state = AppState::new(db, TokenKeys::new(&config.jwt_secret));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    log::info!("API server listening on http://{}", config.bind);

    axum::serve(listener, app).await?;
    Ok(())
}
