//! Playback session models.
//!
//! - `SessionStats`: the open session, mutated while the viewer is running
//! - `SessionRecord`: the finalized, immutable ledger entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub project_id: String,
    pub project_name: String,
    pub start_time: DateTime<Utc>,
    pub total_screens: u32,
    pub completed_screens: u32,
    pub wrong_clicks: u32,
    pub correct_clicks: u32,
}

impl SessionStats {
    pub fn new(
        project_id: String,
        project_name: String,
        total_screens: u32,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            project_id,
            project_name,
            start_time,
            total_screens,
            completed_screens: 0,
            wrong_clicks: 0,
            correct_clicks: 0,
        }
    }

    /// Percentage of screens completed; 0 for a project without screens.
    pub fn completion_rate(&self) -> f64 {
        if self.total_screens == 0 {
            return 0.0;
        }
        f64::from(self.completed_screens) / f64::from(self.total_screens) * 100.0
    }

    /// Percentage of correct clicks; 100 when nothing was clicked.
    pub fn accuracy(&self) -> f64 {
        let clicks = self.correct_clicks + self.wrong_clicks;
        if clicks == 0 {
            return 100.0;
        }
        f64::from(self.correct_clicks) / f64::from(clicks) * 100.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub project_id: String,
    pub project_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Milliseconds between start and end.
    pub duration: u64,
    pub total_screens: u32,
    pub completed_screens: u32,
    pub wrong_clicks: u32,
    pub correct_clicks: u32,
    pub completion_rate: f64,
    pub accuracy: f64,
}
