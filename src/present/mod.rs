//! Refresh-tick orchestration over the surface, the emitters, and the feed.

pub(crate) mod controller;

pub use controller::{PresentationController, RefreshReport, TextLayers};
