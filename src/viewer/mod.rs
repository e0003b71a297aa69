//! Playback state for walking through a project as the end user would.
//!
//! The viewer never edits documents and never records undo history. Clicks resolve to a
//! [`ClickResponse`] that the presentation layer plays out (after `delay_ms`).

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{ActionKind, Hotspot, InputMode, MapRoute, Project};

pub const NAVIGATE_VIBRATION_MS: u64 = 50;
pub const MESSAGE_VIBRATION_MS: u64 = 50;
pub const INPUT_VIBRATION_MS: u64 = 30;
pub const VIBRATE_ACTION_MS: u64 = 200;

pub const DEFAULT_INPUT_PLACEHOLDER: &str = "입력하세요";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerState {
    pub current_screen_id: Option<String>,
    pub show_hint: bool,
    pub completed_screens: Vec<String>,
    pub start_time: Option<DateTime<Utc>>,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            current_screen_id: None,
            show_hint: true,
            completed_screens: Vec::new(),
            start_time: None,
        }
    }
}

impl ViewerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_current_screen(&mut self, screen_id: &str) {
        self.set_current_screen_at(screen_id, Utc::now());
    }

    /// The start time is stamped by the first screen shown and kept until `reset`.
    pub fn set_current_screen_at(&mut self, screen_id: &str, now: DateTime<Utc>) {
        self.current_screen_id = Some(screen_id.to_string());
        self.start_time.get_or_insert(now);
    }

    pub fn toggle_hint(&mut self) {
        self.show_hint = !self.show_hint;
    }

    pub fn complete_screen(&mut self, screen_id: &str) {
        if !self.completed_screens.iter().any(|id| id == screen_id) {
            self.completed_screens.push(screen_id.to_string());
        }
    }

    pub fn is_completed(&self, screen_id: &str) -> bool {
        self.completed_screens.iter().any(|id| id == screen_id)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Reset and jump to the first screen of `project`, if it has one.
    pub fn restart(&mut self, project: &Project) {
        self.reset();
        if let Some(first) = project.screens.first() {
            self.set_current_screen(&first.id);
        }
    }

    /// Completed screens as a percentage of `total_screens`, 0 for an empty project.
    pub fn progress(&self, total_screens: usize) -> f64 {
        if total_screens == 0 {
            return 0.0;
        }
        let done = self.completed_screens.len().min(total_screens);
        done as f64 / total_screens as f64 * 100.0
    }

    /// Resolve a click and apply its navigation: the screen being left counts as completed.
    pub fn click(&mut self, hotspot: &Hotspot) -> ClickResponse {
        let response = resolve_click(hotspot);
        if let PlaybackEffect::Navigate { target } = &response.effect {
            if let Some(current) = self.current_screen_id.clone() {
                self.complete_screen(&current);
            }
            self.set_current_screen(target);
        }
        response
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "camelCase")]
pub enum PlaybackEffect {
    Navigate {
        target: String,
    },
    ShowMessage {
        text: String,
    },
    /// The expected value is typed automatically.
    AutoInput {
        value: String,
    },
    OpenKeyboard {
        placeholder: String,
        expected: Option<String>,
    },
    Vibrate,
    ShowMap(MapRoute),
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickResponse {
    pub effect: PlaybackEffect,
    pub delay_ms: u64,
    pub vibration_ms: Option<u64>,
    pub is_correct: bool,
}

pub fn resolve_click(hotspot: &Hotspot) -> ClickResponse {
    let (effect, vibration_ms) = match &hotspot.action.kind {
        ActionKind::Navigate { target } if !target.is_empty() => (
            PlaybackEffect::Navigate {
                target: target.clone(),
            },
            Some(NAVIGATE_VIBRATION_MS),
        ),
        ActionKind::Message { text } if !text.is_empty() => (
            PlaybackEffect::ShowMessage { text: text.clone() },
            Some(MESSAGE_VIBRATION_MS),
        ),
        ActionKind::Input {
            value,
            mode,
            placeholder,
        } => match mode.unwrap_or_default() {
            InputMode::Auto => match value.as_deref() {
                Some(value) if !value.is_empty() => (
                    PlaybackEffect::AutoInput {
                        value: value.to_string(),
                    },
                    Some(INPUT_VIBRATION_MS),
                ),
                _ => (PlaybackEffect::Nothing, None),
            },
            InputMode::Manual => (
                PlaybackEffect::OpenKeyboard {
                    placeholder: placeholder
                        .clone()
                        .filter(|p| !p.is_empty())
                        .unwrap_or_else(|| DEFAULT_INPUT_PLACEHOLDER.to_string()),
                    expected: value.clone().filter(|v| !v.is_empty()),
                },
                Some(INPUT_VIBRATION_MS),
            ),
        },
        ActionKind::Vibrate => (PlaybackEffect::Vibrate, Some(VIBRATE_ACTION_MS)),
        ActionKind::Map(route) => (PlaybackEffect::ShowMap(route.clone()), None),
        _ => (PlaybackEffect::Nothing, None),
    };

    ClickResponse {
        effect,
        delay_ms: hotspot.action.delay.unwrap_or(0),
        vibration_ms,
        is_correct: hotspot.is_correct,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCheck {
    Correct,
    /// No expected value, or a mismatch: echo back what was typed.
    Entered(String),
}

/// Compare keyboard input with the expected value, ignoring surrounding whitespace.
pub fn check_manual_input(expected: Option<&str>, typed: &str) -> InputCheck {
    match expected {
        Some(expected) if !expected.is_empty() && typed.trim() == expected.trim() => {
            InputCheck::Correct
        }
        _ => InputCheck::Entered(typed.to_string()),
    }
}
