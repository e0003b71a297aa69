use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::{
    db::PersistenceAdapter,
    log_error, log_info, log_warn,
    models::{SessionRecord, SessionStats},
    utils::ids::new_id,
};

const ENABLE_LOGS: bool = true;

/// Append-only ledger of playback sessions. Independent of the document history:
/// undo/redo never touch it.
pub struct SessionTracker {
    current: Option<SessionStats>,
    records: Vec<SessionRecord>,
    storage: Arc<dyn PersistenceAdapter>,
    sessions_key: String,
}

impl SessionTracker {
    pub fn new(storage: Arc<dyn PersistenceAdapter>, sessions_key: impl Into<String>) -> Self {
        Self {
            current: None,
            records: Vec::new(),
            storage,
            sessions_key: sessions_key.into(),
        }
    }

    /// Tracker seeded with the persisted ledger; unreadable data is logged and ignored.
    pub fn load(storage: Arc<dyn PersistenceAdapter>, sessions_key: impl Into<String>) -> Self {
        let mut tracker = Self::new(storage, sessions_key);
        match tracker.read_persisted() {
            Ok(records) => tracker.records = records,
            Err(err) => log_error!("Failed to load session history: {err:#}"),
        }
        tracker
    }

    fn read_persisted(&self) -> Result<Vec<SessionRecord>> {
        match self.storage.get(&self.sessions_key)? {
            Some(raw) => serde_json::from_str(&raw).context("invalid session history payload"),
            None => Ok(Vec::new()),
        }
    }

    pub fn current(&self) -> Option<&SessionStats> {
        self.current.as_ref()
    }

    pub fn start_session(&mut self, project_id: &str, project_name: &str, total_screens: u32) {
        self.start_session_at(project_id, project_name, total_screens, Utc::now());
    }

    /// Opens a session, silently replacing any unfinished one.
    pub fn start_session_at(
        &mut self,
        project_id: &str,
        project_name: &str,
        total_screens: u32,
        started_at: DateTime<Utc>,
    ) {
        if let Some(previous) = &self.current {
            log_warn!(
                "Discarding unfinished session for project {}",
                previous.project_id
            );
        }
        self.current = Some(SessionStats::new(
            project_id.to_string(),
            project_name.to_string(),
            total_screens,
            started_at,
        ));
        log_info!("Session started for project {project_id} ({total_screens} screens)");
    }

    /// A correct click also counts its screen as completed.
    pub fn record_correct_click(&mut self) {
        if let Some(stats) = self.current.as_mut() {
            stats.correct_clicks += 1;
            stats.completed_screens += 1;
        }
    }

    pub fn record_wrong_click(&mut self) {
        if let Some(stats) = self.current.as_mut() {
            stats.wrong_clicks += 1;
        }
    }

    pub fn end_session(&mut self) -> Option<SessionRecord> {
        self.end_session_at(Utc::now())
    }

    /// Finalize the open session into the ledger and persist it. `None` when no session
    /// was open.
    pub fn end_session_at(&mut self, ended_at: DateTime<Utc>) -> Option<SessionRecord> {
        let stats = self.current.take()?;

        let record = SessionRecord {
            id: new_id("session"),
            duration: (ended_at - stats.start_time).num_milliseconds().max(0) as u64,
            completion_rate: stats.completion_rate(),
            accuracy: stats.accuracy(),
            project_id: stats.project_id,
            project_name: stats.project_name,
            start_time: stats.start_time,
            end_time: ended_at,
            total_screens: stats.total_screens,
            completed_screens: stats.completed_screens,
            wrong_clicks: stats.wrong_clicks,
            correct_clicks: stats.correct_clicks,
        };

        log_info!(
            "Session {} ended: {:.0}% complete, {:.0}% accurate",
            record.id,
            record.completion_rate,
            record.accuracy
        );

        self.records.push(record.clone());
        self.persist();
        Some(record)
    }

    /// Records in append order, optionally only those of one project.
    pub fn history(&self, project_id: Option<&str>) -> Vec<&SessionRecord> {
        self.records
            .iter()
            .filter(|record| project_id.map_or(true, |id| record.project_id == id))
            .collect()
    }

    pub fn clear_history(&mut self) {
        self.records.clear();
        if let Err(err) = self.storage.remove(&self.sessions_key) {
            log_error!("Failed to remove session history: {err:#}");
        }
    }

    pub fn flush(&self) -> Result<()> {
        let payload =
            serde_json::to_string(&self.records).context("failed to encode session history")?;
        self.storage
            .set(&self.sessions_key, &payload)
            .with_context(|| format!("failed to persist sessions under '{}'", self.sessions_key))
    }

    fn persist(&self) {
        if let Err(err) = self.flush() {
            log_error!("Failed to save session history: {err:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStorage;
    use chrono::Duration;

    const KEY: &str = "sessions";

    fn tracker(storage: Arc<dyn PersistenceAdapter>) -> SessionTracker {
        SessionTracker::new(storage, KEY)
    }

    #[test]
    fn clicks_without_session_are_ignored() {
        let mut tracker = tracker(Arc::new(MemoryStorage::new()));
        tracker.record_correct_click();
        tracker.record_wrong_click();
        assert!(tracker.end_session().is_none());
        assert!(tracker.history(None).is_empty());
    }

    #[test]
    fn end_session_computes_rates_and_duration() {
        let mut tracker = tracker(Arc::new(MemoryStorage::new()));
        let start = Utc::now();
        tracker.start_session_at("p1", "Bank App", 5, start);
        for _ in 0..3 {
            tracker.record_correct_click();
        }
        tracker.record_wrong_click();

        let record = tracker
            .end_session_at(start + Duration::milliseconds(90_500))
            .unwrap();
        assert_eq!(record.completion_rate, 60.0);
        assert_eq!(record.accuracy, 75.0);
        assert_eq!(record.duration, 90_500);
        assert_eq!(record.completed_screens, 3);
        assert!(tracker.current().is_none());
    }

    #[test]
    fn starting_again_discards_the_open_session() {
        let mut tracker = tracker(Arc::new(MemoryStorage::new()));
        tracker.start_session("p1", "One", 2);
        tracker.record_wrong_click();
        tracker.start_session("p2", "Two", 3);

        assert_eq!(tracker.current().unwrap().wrong_clicks, 0);
        tracker.end_session();
        let history = tracker.history(None);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].project_id, "p2");
    }

    #[test]
    fn history_filters_by_project_in_append_order() {
        let mut tracker = tracker(Arc::new(MemoryStorage::new()));
        for project in ["a", "b", "a"] {
            tracker.start_session(project, project, 1);
            tracker.end_session();
        }
        let only_a: Vec<&str> = tracker
            .history(Some("a"))
            .iter()
            .map(|r| r.project_id.as_str())
            .collect();
        assert_eq!(only_a, vec!["a", "a"]);
        assert_eq!(tracker.history(None).len(), 3);
    }

    #[test]
    fn ledger_is_persisted_and_cleared_under_its_own_key() {
        let storage: Arc<dyn PersistenceAdapter> = Arc::new(MemoryStorage::new());
        let mut tracker = tracker(storage.clone());
        tracker.start_session("p1", "One", 1);
        tracker.record_correct_click();
        tracker.end_session();

        let reloaded = SessionTracker::load(storage.clone(), KEY);
        assert_eq!(reloaded.history(None).len(), 1);

        tracker.clear_history();
        assert!(tracker.history(None).is_empty());
        assert!(storage.get(KEY).unwrap().is_none());
    }
}
