use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::hotspot::Hotspot;
use crate::utils::ids::new_id;

/// One simulated app view: a screenshot plus the hotspots drawn on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Screen {
    pub id: String,
    pub name: String,
    /// Opaque image reference, normally an inline data URI.
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_guide: Option<String>,
    #[serde(default)]
    pub hotspots: Vec<Hotspot>,
    /// Intended to mirror the position in the project, not kept in sync by the store.
    #[serde(default)]
    pub order: u32,
    /// Source file of a freshly uploaded image. Never persisted, exported or snapshotted.
    #[serde(skip)]
    pub image_file: Option<PathBuf>,
}

impl Screen {
    pub fn new(name: impl Into<String>, image_url: impl Into<String>, order: u32) -> Self {
        Self {
            id: new_id("screen"),
            name: name.into(),
            image_url: image_url.into(),
            voice_guide: None,
            hotspots: Vec::new(),
            order,
            image_file: None,
        }
    }

    /// Structural copy without the non-portable fields.
    pub fn portable_copy(&self) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            image_url: self.image_url.clone(),
            voice_guide: self.voice_guide.clone(),
            hotspots: self.hotspots.iter().map(Hotspot::clone).collect(),
            order: self.order,
            image_file: None,
        }
    }

    pub fn apply(&mut self, patch: ScreenPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
            self.image_file = patch.image_file;
        }
        if let Some(voice_guide) = patch.voice_guide {
            self.voice_guide = voice_guide;
        }
        if let Some(hotspots) = patch.hotspots {
            self.hotspots = hotspots;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }
}

/// Partial update for a screen. `voice_guide: Some(None)` clears the guide text.
#[derive(Debug, Clone, Default)]
pub struct ScreenPatch {
    pub name: Option<String>,
    pub image_url: Option<String>,
    /// Only read together with `image_url`.
    pub image_file: Option<PathBuf>,
    pub voice_guide: Option<Option<String>>,
    pub hotspots: Option<Vec<Hotspot>>,
    pub order: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_file_never_serialized() {
        let mut screen = Screen::new("Login", "data:image/png;base64,AAAA", 0);
        screen.image_file = Some(PathBuf::from("/tmp/login.png"));

        let json = serde_json::to_value(&screen).unwrap();
        assert!(json.get("imageFile").is_none());
        assert_eq!(json["imageUrl"], "data:image/png;base64,AAAA");

        assert!(screen.portable_copy().image_file.is_none());
    }

    #[test]
    fn patch_replaces_image_and_clears_guide() {
        let mut screen = Screen::new("Home", "data:a", 0);
        screen.voice_guide = Some("Press the blue button".into());

        screen.apply(ScreenPatch {
            image_url: Some("data:b".into()),
            voice_guide: Some(None),
            ..ScreenPatch::default()
        });

        assert_eq!(screen.image_url, "data:b");
        assert!(screen.voice_guide.is_none());
        assert_eq!(screen.name, "Home");
    }
}
