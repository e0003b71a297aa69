//! Hotspot data models.
//!
//! A hotspot is a clickable rectangle on a screen, expressed in percentages of the
//! rendered screen bounds, plus the action it triggers during playback.

use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::ids::new_id;

/// Areas narrower or shorter than this (in percent) are treated as accidental drags.
pub const MIN_HOTSPOT_EXTENT: f64 = 2.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    pub id: String,
    #[serde(flatten)]
    pub rect: HotspotRect,
    pub action: HotspotAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default)]
    pub is_correct: bool,
}

impl Hotspot {
    /// New hotspots start as an unconfigured `navigate` action marked correct, which is
    /// what the editor shows right after a rectangle is drawn.
    pub fn new(rect: HotspotRect) -> Self {
        Self {
            id: new_id("hotspot"),
            rect,
            action: HotspotAction::new(ActionKind::Navigate {
                target: String::new(),
            }),
            hint: None,
            is_correct: true,
        }
    }

    pub fn with_action(mut self, action: HotspotAction) -> Self {
        self.action = action;
        self
    }

    pub fn apply(&mut self, patch: HotspotPatch) {
        if let Some(rect) = patch.rect {
            self.rect = rect;
        }
        if let Some(action) = patch.action {
            self.action = action;
        }
        if let Some(hint) = patch.hint {
            self.hint = hint;
        }
        if let Some(is_correct) = patch.is_correct {
            self.is_correct = is_correct;
        }
    }
}

/// Rectangle in percent of the rendered screen. `x + width <= 100` and
/// `y + height <= 100` are left to the caller; use [`HotspotRect::clamped`] to enforce them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HotspotRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl HotspotRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalise a drag gesture (start and end points in percent) into a rectangle.
    /// Returns `None` when the dragged area is too small to be intentional.
    pub fn from_drag(start: (f64, f64), end: (f64, f64)) -> Option<Self> {
        let min_x = start.0.min(end.0);
        let min_y = start.1.min(end.1);
        let width = start.0.max(end.0) - min_x;
        let height = start.1.max(end.1) - min_y;

        if width < MIN_HOTSPOT_EXTENT || height < MIN_HOTSPOT_EXTENT {
            return None;
        }

        Some(Self::new(min_x, min_y, width, height))
    }

    /// Copy of the rectangle pulled back inside the 0..=100 bounds.
    pub fn clamped(&self) -> Self {
        let x = self.x.clamp(0.0, 100.0);
        let y = self.y.clamp(0.0, 100.0);
        Self {
            x,
            y,
            width: self.width.clamp(0.0, 100.0 - x),
            height: self.height.clamp(0.0, 100.0 - y),
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Action attached to a hotspot. The variant payload lives in [`ActionKind`]; `delay`
/// applies to every variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HotspotAction {
    #[serde(flatten)]
    pub kind: ActionKind,
    /// Milliseconds to wait before the effect.
    #[serde(
        default,
        deserialize_with = "deserialize_delay",
        skip_serializing_if = "Option::is_none"
    )]
    pub delay: Option<u64>,
}

/// Authoring tools write delays as plain JSON numbers, fractions included. Round to whole
/// milliseconds; negative or non-finite values mean no delay.
fn deserialize_delay<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw
        .filter(|ms| ms.is_finite() && *ms >= 0.0)
        .map(|ms| ms.round() as u64))
}

impl HotspotAction {
    pub fn new(kind: ActionKind) -> Self {
        Self { kind, delay: None }
    }

    pub fn none() -> Self {
        Self::new(ActionKind::None)
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay = Some(delay_ms);
        self
    }

    pub fn navigate_target(&self) -> Option<&str> {
        match &self.kind {
            ActionKind::Navigate { target } if !target.is_empty() => Some(target),
            _ => None,
        }
    }
}

/// Portable wire names match the documents the authoring UI has always produced
/// (`type`, `target`, `message`, `inputValue`, `mapStartLat`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ActionKind {
    Navigate {
        #[serde(default, skip_serializing_if = "String::is_empty")]
        target: String,
    },
    Message {
        #[serde(rename = "message", default, skip_serializing_if = "String::is_empty")]
        text: String,
    },
    Input {
        #[serde(
            rename = "inputValue",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        value: Option<String>,
        #[serde(rename = "inputMode", default, skip_serializing_if = "Option::is_none")]
        mode: Option<InputMode>,
        #[serde(
            rename = "inputPlaceholder",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        placeholder: Option<String>,
    },
    Vibrate,
    Map(MapRoute),
    None,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum InputMode {
    /// The expected value is typed for the user.
    #[default]
    Auto,
    /// The user types on the virtual keyboard.
    Manual,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MapRoute {
    #[serde(rename = "mapStartAddress", default, skip_serializing_if = "Option::is_none")]
    pub start_address: Option<String>,
    #[serde(rename = "mapEndAddress", default, skip_serializing_if = "Option::is_none")]
    pub end_address: Option<String>,
    #[serde(rename = "mapStartLat", default, skip_serializing_if = "Option::is_none")]
    pub start_lat: Option<f64>,
    #[serde(rename = "mapStartLng", default, skip_serializing_if = "Option::is_none")]
    pub start_lng: Option<f64>,
    #[serde(rename = "mapEndLat", default, skip_serializing_if = "Option::is_none")]
    pub end_lat: Option<f64>,
    #[serde(rename = "mapEndLng", default, skip_serializing_if = "Option::is_none")]
    pub end_lng: Option<f64>,
}

impl MapRoute {
    pub fn start(&self) -> Option<LatLng> {
        Some(LatLng {
            lat: self.start_lat?,
            lng: self.start_lng?,
        })
    }

    pub fn end(&self) -> Option<LatLng> {
        Some(LatLng {
            lat: self.end_lat?,
            lng: self.end_lng?,
        })
    }
}

/// Partial update for a hotspot. `hint: Some(None)` clears the hint.
#[derive(Debug, Clone, Default)]
pub struct HotspotPatch {
    pub rect: Option<HotspotRect>,
    pub action: Option<HotspotAction>,
    pub hint: Option<Option<String>>,
    pub is_correct: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn drag_is_normalised_and_tiny_areas_rejected() {
        let rect = HotspotRect::from_drag((40.0, 30.0), (10.0, 50.0)).unwrap();
        assert_eq!(rect, HotspotRect::new(10.0, 30.0, 30.0, 20.0));

        assert!(HotspotRect::from_drag((10.0, 10.0), (11.5, 40.0)).is_none());
    }

    #[test]
    fn clamped_keeps_rect_inside_bounds() {
        let rect = HotspotRect::new(90.0, -5.0, 30.0, 50.0).clamped();
        assert_eq!(rect, HotspotRect::new(90.0, 0.0, 10.0, 50.0));
        assert!(rect.contains(95.0, 10.0));
        assert!(!rect.contains(50.0, 10.0));
    }

    #[test]
    fn action_uses_portable_field_names() {
        let action = HotspotAction::new(ActionKind::Input {
            value: Some("1234".into()),
            mode: Some(InputMode::Manual),
            placeholder: None,
        })
        .with_delay(300);

        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(
            value,
            json!({ "type": "input", "inputValue": "1234", "inputMode": "manual", "delay": 300 })
        );
    }

    #[test]
    fn fractional_delay_is_rounded_on_read() {
        let read = |delay: serde_json::Value| -> HotspotAction {
            serde_json::from_value(json!({ "type": "vibrate", "delay": delay })).unwrap()
        };
        assert_eq!(read(json!(250.6)).delay, Some(251));
        assert_eq!(read(json!(300)).delay, Some(300));
        assert_eq!(read(json!(-5)).delay, None);
        assert_eq!(read(json!(null)).delay, None);

        let bare: HotspotAction = serde_json::from_value(json!({ "type": "vibrate" })).unwrap();
        assert_eq!(bare.delay, None);
    }

    #[test]
    fn unconfigured_navigate_reads_back_without_target() {
        let hotspot: Hotspot = serde_json::from_value(json!({
            "id": "h1",
            "x": 1.0, "y": 2.0, "width": 3.0, "height": 4.0,
            "action": { "type": "navigate" },
            "isCorrect": true
        }))
        .unwrap();

        assert_eq!(hotspot.action.navigate_target(), None);
        let back = serde_json::to_value(&hotspot).unwrap();
        assert_eq!(back["action"], json!({ "type": "navigate" }));
    }

    #[test]
    fn map_route_coordinates_need_both_axes() {
        let route = MapRoute {
            start_lat: Some(37.5),
            start_lng: Some(127.0),
            end_lat: Some(37.4),
            ..MapRoute::default()
        };
        assert_eq!(route.start(), Some(LatLng { lat: 37.5, lng: 127.0 }));
        assert_eq!(route.end(), None);
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut hotspot = Hotspot::new(HotspotRect::new(0.0, 0.0, 10.0, 10.0));
        hotspot.hint = Some("tap here".into());
        hotspot.apply(HotspotPatch {
            is_correct: Some(false),
            ..HotspotPatch::default()
        });
        assert!(!hotspot.is_correct);
        assert_eq!(hotspot.hint.as_deref(), Some("tap here"));

        hotspot.apply(HotspotPatch {
            hint: Some(None),
            ..HotspotPatch::default()
        });
        assert!(hotspot.hint.is_none());
    }
}
