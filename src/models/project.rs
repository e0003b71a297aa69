//! Project-related data models.
//!
//! - `Project`, `ProjectPatch`: the authored unit and its partial update
//! - `ProjectCollection`: the `{ projects: [...] }` envelope used for storage and batch export

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{hotspot::ActionKind, screen::Screen};
use crate::utils::ids::new_id;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Insertion order is the default playback order.
    #[serde(default)]
    pub screens: Vec<Screen>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id("project"),
            name: name.into(),
            description,
            screens: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn screen(&self, screen_id: &str) -> Option<&Screen> {
        self.screens.iter().find(|s| s.id == screen_id)
    }

    pub(crate) fn screen_mut(&mut self, screen_id: &str) -> Option<&mut Screen> {
        self.screens.iter_mut().find(|s| s.id == screen_id)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Structural copy with every screen's non-portable fields stripped.
    pub fn portable_copy(&self) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            screens: self.screens.iter().map(Screen::portable_copy).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Deep copy with fresh ids for the project and every screen and hotspot.
    /// Navigate targets that pointed at screens of this project are rewritten to the
    /// matching new screen ids so the copy plays back on its own screens.
    pub fn duplicate(&self) -> Self {
        let now = Utc::now();
        let mut screen_ids = HashMap::with_capacity(self.screens.len());

        let mut screens: Vec<Screen> = self
            .screens
            .iter()
            .map(|screen| {
                let mut copy = screen.portable_copy();
                copy.id = new_id("screen");
                screen_ids.insert(screen.id.clone(), copy.id.clone());
                for hotspot in &mut copy.hotspots {
                    hotspot.id = new_id("hotspot");
                }
                copy
            })
            .collect();

        for hotspot in screens.iter_mut().flat_map(|s| s.hotspots.iter_mut()) {
            if let ActionKind::Navigate { target } = &mut hotspot.action.kind {
                if let Some(mapped) = screen_ids.get(target.as_str()) {
                    *target = mapped.clone();
                }
            }
        }

        Self {
            id: new_id("project"),
            name: format!("{} (copy)", self.name),
            description: self.description.clone(),
            screens,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: ProjectPatch) {
        if let Some(name) = patch.name {
            let trimmed = name.trim();
            if !trimmed.is_empty() {
                self.name = trimmed.to_string();
            }
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        self.touch();
    }
}

/// Partial update for a project. A blank `name` is ignored; `description: Some(None)`
/// clears the description.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectCollection {
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Borrowed form of [`ProjectCollection`] for encoding without cloning.
#[derive(Serialize)]
pub(crate) struct CollectionRef<'a> {
    pub projects: &'a [Project],
}
