//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::adapters::{
    json_file::ensure_data_files, FsContentProvider, JsonCatalog, JsonProgressStore,
    JsonUserStore,
};
use crate::config::{Config, PROGRESS_FILE, USERS_FILE};
use crate::error::ApiError;
use reader_core::ports::{BookCatalog, ContentProvider, ProgressRepository, UserRepository};
use reader_core::{FallbackCatalog, FallbackContent, Segmenter};
use std::sync::Arc;
use tracing::info;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn BookCatalog>,
    pub content: Arc<dyn ContentProvider>,
    pub users: Arc<dyn UserRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub segmenter: Segmenter,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the file-backed adapters described by `config`, creating empty
    /// user and progress files when they do not exist yet.
    pub async fn from_config(config: Arc<Config>) -> Result<Self, ApiError> {
        ensure_data_files(&config.data_dir, &[USERS_FILE, PROGRESS_FILE]).await?;

        let mut catalogs: Vec<Arc<dyn BookCatalog>> =
            vec![Arc::new(JsonCatalog::new(&config.catalog_path))];
        if let Some(path) = &config.fallback_catalog_path {
            info!("Using {} as fallback catalog", path.display());
            catalogs.push(Arc::new(JsonCatalog::new(path)));
        }

        let mut providers: Vec<Arc<dyn ContentProvider>> = vec![Arc::new(
            FsContentProvider::new("content", &config.content_dir),
        )];
        if let Some(dir) = &config.fallback_content_dir {
            info!("Using {} as fallback content directory", dir.display());
            providers.push(Arc::new(FsContentProvider::new("bundled", dir)));
        }

        Ok(Self {
            catalog: Arc::new(FallbackCatalog::new(catalogs)),
            content: Arc::new(FallbackContent::new(providers)),
            users: Arc::new(JsonUserStore::new(config.users_path())),
            progress: Arc::new(JsonProgressStore::new(config.progress_path())),
            segmenter: Segmenter::default(),
            config,
        })
    }
}
