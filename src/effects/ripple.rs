//! Background-transition feedback: concentric rings expanding from the screen center.

use crate::{
    effects::{Emitter, Wake, wake_after_insert},
    foundation::core::{Canvas, Point, Rgba8},
    surface::{DisplaySurface, Item, ItemId},
};

pub const RIPPLE_COUNT: usize = 3;
/// Radius gap between consecutive rings of one activation.
pub const RIPPLE_STAGGER_PX: f64 = 30.0;
pub const RIPPLE_SPEED_PX: f64 = 5.0;
/// Added to half the diagonal so the last ring fully clears the corners.
pub const RIPPLE_MARGIN_PX: f64 = 50.0;
pub const RIPPLE_STROKE_PX: f64 = 3.0;

/// Radius at which a ring centered on the screen has covered every pixel.
pub fn max_radius_for(canvas: Canvas) -> f64 {
    (canvas.diagonal() / 2.0).ceil() + RIPPLE_MARGIN_PX
}

/// One expanding ring.
#[derive(Clone, Debug, PartialEq)]
pub struct Ripple {
    pub center: Point,
    /// Negative until the ring is "born".
    pub radius: f64,
    pub max_radius: f64,
    /// Pixels per tick.
    pub speed: f64,
    item: ItemId,
}

impl Ripple {
    pub fn item(&self) -> ItemId {
        self.item
    }

    fn shape(&self) -> Item {
        ring(self.center, self.radius)
    }
}

fn ring(center: Point, radius: f64) -> Item {
    Item::Ring {
        center,
        radius: radius.max(0.0),
        stroke: Rgba8::WHITE,
        width: RIPPLE_STROKE_PX,
    }
}

/// Layers a ring must stay between.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RippleAnchors {
    pub background: ItemId,
    /// Lowest text layer.
    pub title: ItemId,
}

pub struct RippleEmitter {
    ripples: Vec<Ripple>,
    running: bool,
    anchors: Option<RippleAnchors>,
}

impl Default for RippleEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl RippleEmitter {
    pub fn new() -> Self {
        Self {
            ripples: Vec::new(),
            running: false,
            anchors: None,
        }
    }

    pub fn ripples(&self) -> &[Ripple] {
        &self.ripples
    }

    pub fn set_anchors(&mut self, anchors: RippleAnchors) {
        self.anchors = Some(anchors);
    }

    /// Launch three staggered rings. Calling this while rings are live adds to the
    /// current set.
    pub fn start(&mut self, surface: &mut dyn DisplaySurface) -> Wake {
        let canvas = surface.canvas();
        let center = canvas.center();
        let max_radius = max_radius_for(canvas);

        for k in 0..RIPPLE_COUNT {
            let radius = -(k as f64) * RIPPLE_STAGGER_PX;
            let item = surface.create(ring(center, radius));
            if let Some(a) = self.anchors {
                surface.raise_above(item, a.background);
                surface.lower_below(item, a.title);
            } else {
                tracing::warn!("ripple started before layer anchors were set");
            }
            self.ripples.push(Ripple {
                center,
                radius,
                max_radius,
                speed: RIPPLE_SPEED_PX,
                item,
            });
        }

        let was_running = self.running;
        self.running = !self.ripples.is_empty();
        wake_after_insert(was_running, self.running)
    }
}

impl Emitter for RippleEmitter {
    fn tick(&mut self, surface: &mut dyn DisplaySurface) -> bool {
        self.ripples.retain_mut(|r| {
            r.radius += r.speed;
            if r.radius > r.max_radius {
                surface.remove(r.item);
                return false;
            }
            if r.radius > 0.0 {
                surface.update(r.item, r.shape());
            }
            true
        });
        self.running = !self.ripples.is_empty();
        self.running
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn live_count(&self) -> usize {
        self.ripples.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/ripple.rs"]
mod tests;
