//! Snapshot-based undo/redo over the whole project collection.
//!
//! The history is a bounded list of collection states and a cursor that always marks the
//! entry equal to the live collection:
//! - [`HistoryManager::snapshot`] runs before a structural edit. It drops the redo branch
//!   and records the pre-edit state unless the cursor entry already holds it.
//! - [`HistoryManager::commit`] runs after the edit and records the post-edit state.
//! - Overflow evicts the oldest entry and shifts the cursor with it, so the cursor keeps
//!   pointing at the same state.
//!
//! One stream covers every project: undoing restores the full collection, including
//! projects other than the one being edited.

use crate::models::Project;
use crate::log_debug;

const ENABLE_LOGS: bool = true;

pub struct HistoryManager {
    entries: Vec<Vec<Project>>,
    cursor: Option<usize>,
    limit: usize,
}

impl HistoryManager {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            limit: limit.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the entry matching the live collection, `None` while empty.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn snapshot(&mut self, projects: &[Project]) {
        self.discard_redo_branch();
        let state = capture(projects);
        if self.current() != Some(&state) {
            self.push(state);
        }
    }

    pub fn commit(&mut self, projects: &[Project]) {
        let state = capture(projects);
        if self.current() != Some(&state) {
            self.push(state);
        }
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(cursor) if cursor > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(cursor) if cursor + 1 < self.entries.len())
    }

    /// Step back one entry and return an independent copy of the collection to restore.
    pub fn undo(&mut self) -> Option<Vec<Project>> {
        if !self.can_undo() {
            return None;
        }
        let from = self.cursor?;
        let to = from - 1;
        self.cursor = Some(to);
        log_debug!("Undo: {} -> {}", from, to);
        self.entries.get(to).map(|state| capture(state))
    }

    pub fn redo(&mut self) -> Option<Vec<Project>> {
        if !self.can_redo() {
            return None;
        }
        let from = self.cursor?;
        let to = from + 1;
        self.cursor = Some(to);
        log_debug!("Redo: {} -> {}", from, to);
        self.entries.get(to).map(|state| capture(state))
    }

    fn current(&self) -> Option<&Vec<Project>> {
        self.cursor.and_then(|cursor| self.entries.get(cursor))
    }

    fn discard_redo_branch(&mut self) {
        match self.cursor {
            Some(cursor) => self.entries.truncate(cursor + 1),
            None => self.entries.clear(),
        }
    }

    fn push(&mut self, state: Vec<Project>) {
        self.discard_redo_branch();
        self.entries.push(state);

        if self.entries.len() > self.limit {
            let overflow = self.entries.len() - self.limit;
            self.entries.drain(..overflow);
            log_debug!("History full; evicted {} oldest entries", overflow);
        }

        self.cursor = Some(self.entries.len() - 1);
    }
}

/// Independent copy of a collection with non-portable screen fields stripped.
fn capture(projects: &[Project]) -> Vec<Project> {
    projects.iter().map(Project::portable_copy).collect()
}
