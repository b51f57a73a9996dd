//! Presentation engine for an always-on transit arrival kiosk.
//!
//! One retained [`Scene`] holds a hot-swappable background photo, three text lines,
//! and the particles of two effects. Everything runs on a single cooperative
//! timeline:
//!
//! - a refresh tick re-reads the transit feed and the background file,
//!   re-themes the text from the background's luminance, and starts ripples when
//!   the photo changes;
//! - touch input spawns bubbles;
//! - each effect advances in its own 33 ms frame chain while it has live particles.
//!
//! Start from [`Kiosk`] and [`KioskConfig`]; render snapshots with [`Compositor`].
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod assets;
/// Background polling and installation.
pub mod background;
pub(crate) mod effects;
/// Refresh-tick orchestration.
pub mod present;
/// CPU compositor.
pub mod render;
/// Task queue, frame chains, and the kiosk dispatcher.
pub mod runtime;
/// Retained drawing surface.
pub mod surface;
/// Transit arrivals and feeds.
pub mod transit;

pub use crate::foundation::config::{FeedConfig, KioskConfig, Labels, TRANSIT_KEY_ENV};
pub use crate::foundation::core::{Canvas, Point, Rgba8, Vec2};
pub use crate::foundation::error::{KioskError, KioskResult};

pub use crate::assets::decode::{decode_image, fit_to_canvas, read_and_decode};
pub use crate::assets::luminance::{
    LIGHT_THRESHOLD, THUMBNAIL_SIDE, Theme, classify, mean_luminance, theme_for_luminance,
};
pub use crate::background::{
    ALLOWED_EXTENSIONS, BackgroundSynchronizer, SyncOutcome, install_background,
};
pub use crate::effects::bubble::{BUBBLE_PALETTE, BubbleEmitter, Particle};
pub use crate::effects::ripple::{Ripple, RippleAnchors, RippleEmitter, max_radius_for};
pub use crate::effects::{Emitter, Wake};
pub use crate::present::{PresentationController, RefreshReport, TextLayers};
pub use crate::render::{Compositor, Frame};
pub use crate::runtime::{EmitterKind, FrameScheduler, Kiosk, Task, TaskQueue};
pub use crate::surface::{DisplaySurface, Item, ItemId, Scene};
pub use crate::transit::feed::feed_from_config;
pub use crate::transit::{
    Arrival, ArrivalQuery, CommandFeed, DisplayText, PayloadFileFeed, StaticFeed, TimeoutFeed,
    TransitFeed, format_minutes, parse_arrivals,
};
