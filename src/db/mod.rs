//! Key-value persistence behind the document store and the session ledger.
//!
//! Both writers go through [`PersistenceAdapter`], a synchronous blob store keyed by
//! string names. [`MemoryStorage`] backs tests and ephemeral runs, [`SqliteStorage`]
//! keeps the blobs in a single SQLite table.

use std::{collections::HashMap, sync::RwLock};

use anyhow::{anyhow, bail, Result};

mod sqlite;

pub use sqlite::SqliteStorage;

pub trait PersistenceAdapter: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-process storage. An optional quota (in bytes, summed over all values) makes
/// writes fail the way a full browser-style store would.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PersistenceAdapter for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let guard = self
            .entries
            .read()
            .map_err(|_| anyhow!("memory storage lock poisoned"))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self
            .entries
            .write()
            .map_err(|_| anyhow!("memory storage lock poisoned"))?;

        if let Some(quota) = self.quota_bytes {
            let others: usize = guard
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            if others + value.len() > quota {
                bail!(
                    "storage quota exceeded writing '{key}' ({} bytes over a {quota} byte quota)",
                    others + value.len() - quota
                );
            }
        }

        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut guard = self
            .entries
            .write()
            .map_err(|_| anyhow!("memory storage lock poisoned"))?;
        guard.remove(key);
        Ok(())
    }
}
