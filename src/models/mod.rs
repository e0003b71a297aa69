pub mod hotspot;
pub mod project;
pub mod screen;
pub mod session;

pub use hotspot::{
    ActionKind, Hotspot, HotspotAction, HotspotPatch, HotspotRect, InputMode, LatLng, MapRoute,
};
pub use project::{Project, ProjectCollection, ProjectPatch};
pub(crate) use project::CollectionRef;
pub use screen::{Screen, ScreenPatch};
pub use session::{SessionRecord, SessionStats};
