use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

pub const DEFAULT_HISTORY_LIMIT: usize = 20;
pub const DEFAULT_PROJECTS_KEY: &str = "senior-helper-data";
pub const DEFAULT_SESSIONS_KEY: &str = "senior-helper-sessions";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSettings {
    /// Maximum number of collection states kept for undo/redo.
    pub history_limit: usize,
    pub projects_key: String,
    pub sessions_key: String,
    /// SQLite file; `None` keeps everything in memory.
    pub database_path: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            projects_key: DEFAULT_PROJECTS_KEY.into(),
            sessions_key: DEFAULT_SESSIONS_KEY.into(),
            database_path: None,
            export_dir: None,
        }
    }
}

impl StoreSettings {
    /// Read settings from a JSON file. A missing file gives the defaults; an unreadable
    /// one is logged and also falls back to the defaults. Environment overrides apply last.
    pub fn load(path: &Path) -> Self {
        Self::read_or_default(path).apply_env()
    }

    fn read_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::read_file(path) {
            Ok(settings) => settings,
            Err(err) => {
                warn!("Ignoring settings at {}: {err:#}", path.display());
                Self::default()
            }
        }
    }

    fn read_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write settings to {}", path.display()))
    }

    /// Apply `SENIOR_HELPER_HISTORY_LIMIT`, `SENIOR_HELPER_DB` and
    /// `SENIOR_HELPER_EXPORT_DIR` on top of the current values.
    pub fn apply_env(self) -> Self {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup("SENIOR_HELPER_HISTORY_LIMIT") {
            match raw.trim().parse::<usize>() {
                Ok(limit) => self.history_limit = limit,
                Err(_) => warn!("Ignoring SENIOR_HELPER_HISTORY_LIMIT={raw}: not a number"),
            }
        }
        if let Some(path) = lookup("SENIOR_HELPER_DB").filter(|p| !p.trim().is_empty()) {
            self.database_path = Some(PathBuf::from(path));
        }
        if let Some(dir) = lookup("SENIOR_HELPER_EXPORT_DIR").filter(|p| !p.trim().is_empty()) {
            self.export_dir = Some(PathBuf::from(dir));
        }
        self.history_limit = self.history_limit.max(1);
        self
    }
}
