use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::warn;

use reelgate_api::auth::{AppState, AppStateInner};
use reelgate_api::credentials::CredentialStore;
use reelgate_api::library::VideoLibrary;
use reelgate_api::token::TokenKeys;
use reelgate_db::Database;

use crate::config::Config;

/// Open the database and assemble the shared handler state.
pub fn build_state(config: &Config) -> Result<AppState> {
    let db = Database::open(&config.db_path)?;

    let library = VideoLibrary::new(config.videos_dir.clone());
    if !library.dir().is_dir() {
        warn!(
            "Video directory {} does not exist; listing will fail until it is created",
            library.dir().display()
        );
    }

    Ok(Arc::new(AppStateInner {
        credentials: CredentialStore::new(db, config.argon2.clone()),
        tokens: TokenKeys::new(
            config.jwt_secret.as_bytes(),
            chrono::Duration::seconds(config.token_ttl_secs),
        ),
        library,
        expose_errors: config.expose_errors,
    }))
}

/// API routes plus the static front-end. Unknown paths get `index.html`.
pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let static_files =
        ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    reelgate_api::router(state)
        .fallback_service(static_files)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
