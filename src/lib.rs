pub mod db;
pub mod error;
pub mod models;
pub mod sessions;
pub mod settings;
pub mod store;
pub mod transfer;
pub mod utils;
pub mod viewer;

use std::sync::Arc;

use anyhow::Context;
use log::{info, warn};

pub use db::{MemoryStorage, PersistenceAdapter, SqliteStorage};
pub use error::{ExportError, ImportError, ImportResponse};
pub use models::*;
pub use sessions::SessionTracker;
pub use settings::StoreSettings;
pub use store::{DocumentStore, HistoryManager};
pub use transfer::{DirectoryExportSink, ExportSink, ExportedDocument};
pub use viewer::{ClickResponse, InputCheck, PlaybackEffect, ViewerState};

/// Initialize logging from RUST_LOG, falling back to `info`. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Everything one editing/playback session of the app needs, wired to one storage backend.
pub struct AppState {
    pub store: DocumentStore,
    pub sessions: SessionTracker,
    pub viewer: ViewerState,
    pub settings: StoreSettings,
}

impl AppState {
    /// Open storage (SQLite when `database_path` is set, otherwise in memory) and load the
    /// persisted projects and session ledger.
    pub fn bootstrap(settings: StoreSettings) -> anyhow::Result<Self> {
        let storage: Arc<dyn PersistenceAdapter> = match &settings.database_path {
            Some(path) => Arc::new(
                SqliteStorage::open(path.clone())
                    .with_context(|| format!("failed to open database at {}", path.display()))?,
            ),
            None => Arc::new(MemoryStorage::new()),
        };
        Ok(Self::with_storage(storage, settings))
    }

    pub fn with_storage(storage: Arc<dyn PersistenceAdapter>, settings: StoreSettings) -> Self {
        let store = DocumentStore::load(storage.clone(), &settings);
        let sessions = SessionTracker::load(storage, settings.sessions_key.clone());
        info!(
            "Senior helper ready: {} project(s), {} recorded session(s)",
            store.projects().len(),
            sessions.history(None).len()
        );

        Self {
            store,
            sessions,
            viewer: ViewerState::new(),
            settings,
        }
    }

    /// Directory sink for exports, when an export directory is configured.
    pub fn export_sink(&self) -> Option<DirectoryExportSink> {
        self.settings.export_dir.clone().map(DirectoryExportSink::new)
    }

    /// Flush documents and the session ledger. An unfinished session is discarded.
    pub fn shutdown(self) -> anyhow::Result<()> {
        if let Some(open) = self.sessions.current() {
            warn!(
                "Discarding unfinished session for project {} on shutdown",
                open.project_id
            );
        }
        self.store.flush()?;
        self.sessions.flush()?;
        info!("Senior helper shut down");
        Ok(())
    }
}
