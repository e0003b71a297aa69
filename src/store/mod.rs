//! In-memory document store for projects, screens and hotspots.
//!
//! Every mutator writes the whole collection through to the [`PersistenceAdapter`] on a
//! best-effort basis: a failed write is logged and the in-memory edit stands. Screen and
//! hotspot edits are bracketed by [`HistoryManager`] snapshots; project-level operations
//! (create, rename, delete, duplicate, import) are outside the undo scope.
//!
//! Operations on ids that do not exist are silent no-ops.

pub mod history;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::{
    db::PersistenceAdapter,
    log_debug, log_error, log_info,
    models::{
        CollectionRef, Hotspot, HotspotPatch, Project, ProjectCollection, ProjectPatch, Screen,
        ScreenPatch,
    },
    settings::StoreSettings,
};

pub use history::HistoryManager;

const ENABLE_LOGS: bool = true;

pub struct DocumentStore {
    projects: Vec<Project>,
    current_project_id: Option<String>,
    history: HistoryManager,
    storage: Arc<dyn PersistenceAdapter>,
    projects_key: String,
}

impl DocumentStore {
    pub fn new(storage: Arc<dyn PersistenceAdapter>, settings: &StoreSettings) -> Self {
        Self {
            projects: Vec::new(),
            current_project_id: None,
            history: HistoryManager::new(settings.history_limit),
            storage,
            projects_key: settings.projects_key.clone(),
        }
    }

    /// Build a store from whatever the adapter holds. A missing key gives an empty store;
    /// an unreadable payload is logged and also gives an empty store.
    pub fn load(storage: Arc<dyn PersistenceAdapter>, settings: &StoreSettings) -> Self {
        let mut store = Self::new(storage, settings);
        match store.read_persisted() {
            Ok(Some(collection)) => {
                log_info!("Loaded {} project(s) from storage", collection.projects.len());
                store.projects = collection.projects;
            }
            Ok(None) => {}
            Err(err) => log_error!("Failed to load projects from storage: {err:#}"),
        }
        store
    }

    fn read_persisted(&self) -> Result<Option<ProjectCollection>> {
        let Some(raw) = self.storage.get(&self.projects_key)? else {
            return Ok(None);
        };
        let collection = serde_json::from_str(&raw).context("invalid project collection payload")?;
        Ok(Some(collection))
    }

    // ---- read queries -------------------------------------------------------------

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn current_project_id(&self) -> Option<&str> {
        self.current_project_id.as_deref()
    }

    /// `None` when nothing is selected or the selection points at a deleted project.
    pub fn current_project(&self) -> Option<&Project> {
        self.current_project_id
            .as_deref()
            .and_then(|id| self.project(id))
    }

    /// Screen of the active project.
    pub fn screen(&self, screen_id: &str) -> Option<&Screen> {
        self.current_project()
            .and_then(|project| project.screen(screen_id))
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_cursor(&self) -> Option<usize> {
        self.history.cursor()
    }

    // ---- project collection -------------------------------------------------------

    /// Create and select a project. A blank name creates nothing and returns `None`.
    pub fn create_project(&mut self, name: &str, description: Option<String>) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            log_debug!("create_project ignored: blank name");
            return None;
        }
        let project = Project::new(name, description);
        let id = project.id.clone();
        self.projects.push(project);
        self.current_project_id = Some(id.clone());
        log_info!("Created project {id}");
        self.persist();
        Some(id)
    }

    pub fn update_project(&mut self, id: &str, patch: ProjectPatch) {
        let Some(project) = self.projects.iter_mut().find(|p| p.id == id) else {
            return;
        };
        project.apply(patch);
        self.persist();
    }

    pub fn delete_project(&mut self, id: &str) {
        self.delete_projects(&[id]);
    }

    pub fn delete_projects<S: AsRef<str>>(&mut self, ids: &[S]) {
        let doomed = |id: &str| ids.iter().any(|candidate| candidate.as_ref() == id);

        let before = self.projects.len();
        self.projects.retain(|p| !doomed(&p.id));
        if self.current_project_id.as_deref().is_some_and(doomed) {
            self.current_project_id = None;
        }

        if self.projects.len() != before {
            log_info!("Deleted {} project(s)", before - self.projects.len());
            self.persist();
        }
    }

    /// Append a deep copy with fresh ids throughout. The active project is unchanged.
    pub fn duplicate_project(&mut self, id: &str) -> Option<String> {
        let copy = self.project(id)?.duplicate();
        let copy_id = copy.id.clone();
        self.projects.push(copy);
        log_info!("Duplicated project {id} as {copy_id}");
        self.persist();
        Some(copy_id)
    }

    /// Set the active project without checking that it exists.
    pub fn select_project(&mut self, id: Option<&str>) {
        self.current_project_id = id.map(str::to_string);
    }

    /// Append projects as they are. Used by import; no selection change, no history.
    pub fn append_projects(&mut self, projects: Vec<Project>) {
        if projects.is_empty() {
            return;
        }
        self.projects.extend(projects);
        self.persist();
    }

    // ---- screens ------------------------------------------------------------------

    pub fn add_screen(&mut self, screen: Screen) {
        self.edit_current_project("add_screen", |project| {
            project.screens.push(screen);
            true
        });
    }

    pub fn update_screen(&mut self, screen_id: &str, patch: ScreenPatch) {
        self.edit_current_project("update_screen", |project| {
            match project.screen_mut(screen_id) {
                Some(screen) => {
                    screen.apply(patch);
                    true
                }
                None => false,
            }
        });
    }

    pub fn delete_screen(&mut self, screen_id: &str) {
        self.edit_current_project("delete_screen", |project| {
            let before = project.screens.len();
            project.screens.retain(|s| s.id != screen_id);
            project.screens.len() != before
        });
    }

    /// Reorder the active project's screens to follow `screen_ids`. Unknown ids are
    /// skipped and screens missing from the list keep their relative order at the end,
    /// so no screen is ever lost or duplicated.
    pub fn reorder_screens<S: AsRef<str>>(&mut self, screen_ids: &[S]) {
        self.edit_current_project("reorder_screens", |project| {
            let mut remaining = std::mem::take(&mut project.screens);
            let mut ordered = Vec::with_capacity(remaining.len());
            for id in screen_ids {
                if let Some(index) = remaining.iter().position(|s| s.id == id.as_ref()) {
                    ordered.push(remaining.remove(index));
                }
            }
            ordered.append(&mut remaining);
            project.screens = ordered;
            true
        });
    }

    // ---- hotspots -----------------------------------------------------------------

    pub fn add_hotspot(&mut self, screen_id: &str, hotspot: Hotspot) {
        self.edit_current_project("add_hotspot", |project| {
            match project.screen_mut(screen_id) {
                Some(screen) => {
                    screen.hotspots.push(hotspot);
                    true
                }
                None => false,
            }
        });
    }

    pub fn update_hotspot(&mut self, screen_id: &str, hotspot_id: &str, patch: HotspotPatch) {
        self.edit_current_project("update_hotspot", |project| {
            let hotspot = project
                .screen_mut(screen_id)
                .and_then(|screen| screen.hotspots.iter_mut().find(|h| h.id == hotspot_id));
            match hotspot {
                Some(hotspot) => {
                    hotspot.apply(patch);
                    true
                }
                None => false,
            }
        });
    }

    pub fn delete_hotspot(&mut self, screen_id: &str, hotspot_id: &str) {
        self.edit_current_project("delete_hotspot", |project| {
            match project.screen_mut(screen_id) {
                Some(screen) => {
                    let before = screen.hotspots.len();
                    screen.hotspots.retain(|h| h.id != hotspot_id);
                    screen.hotspots.len() != before
                }
                None => false,
            }
        });
    }

    // ---- undo / redo --------------------------------------------------------------

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) {
        if let Some(projects) = self.history.undo() {
            self.projects = projects;
            self.persist();
        }
    }

    pub fn redo(&mut self) {
        if let Some(projects) = self.history.redo() {
            self.projects = projects;
            self.persist();
        }
    }

    // ---- persistence --------------------------------------------------------------

    /// Explicit write-through that reports failure instead of logging it.
    pub fn flush(&self) -> Result<()> {
        let payload = serde_json::to_string(&CollectionRef {
            projects: &self.projects,
        })
        .context("failed to encode project collection")?;
        self.storage
            .set(&self.projects_key, &payload)
            .with_context(|| format!("failed to persist projects under '{}'", self.projects_key))
    }

    fn persist(&self) {
        if let Err(err) = self.flush() {
            log_error!("Failed to save projects: {err:#}");
        }
    }

    /// Snapshot, apply `edit` to the active project, stamp and persist. `edit` returns
    /// whether anything changed; nothing is stamped or written when it did not.
    fn edit_current_project(&mut self, action: &str, edit: impl FnOnce(&mut Project) -> bool) {
        self.history.snapshot(&self.projects);

        let Some(current_id) = self.current_project_id.as_deref() else {
            log_debug!("{action} ignored: no active project");
            return;
        };
        let Some(project) = self.projects.iter_mut().find(|p| p.id == current_id) else {
            log_debug!("{action} ignored: active project {current_id} not found");
            return;
        };

        if !edit(project) {
            log_debug!("{action} ignored: target not found in {current_id}");
            return;
        }
        project.touch();

        self.history.commit(&self.projects);
        self.persist();
    }
}
