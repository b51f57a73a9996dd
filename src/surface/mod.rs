//! Handle-based drawing contract and the retained scene implementing it.

pub(crate) mod scene;

use std::sync::Arc;

use crate::foundation::core::{Canvas, Point, Rgba8};

/// Opaque handle to one item on a [`DisplaySurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub(crate) u64);

impl ItemId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// One drawable item.
#[derive(Clone, Debug, PartialEq)]
pub enum Item {
    /// Straight-alpha image with its top-left corner at `origin`.
    Image {
        origin: Point,
        image: Arc<image::RgbaImage>,
    },
    /// Filled circle.
    Disc {
        center: Point,
        radius: f64,
        fill: Rgba8,
    },
    /// Stroked circle outline. Not drawn while `radius <= 0`.
    Ring {
        center: Point,
        radius: f64,
        stroke: Rgba8,
        width: f64,
    },
    /// Single line of text centered on `anchor`.
    Text {
        anchor: Point,
        text: String,
        size_px: f32,
        fill: Rgba8,
    },
}

/// Retained compositing surface addressed by [`ItemId`].
///
/// New items are placed on top of the stack. Every operation on a handle that is
/// not (or no longer) on the surface is a no-op returning `false`.
pub trait DisplaySurface {
    fn canvas(&self) -> Canvas;

    /// Add `item` above everything else.
    fn create(&mut self, item: Item) -> ItemId;

    fn remove(&mut self, id: ItemId) -> bool;

    fn item(&self, id: ItemId) -> Option<&Item>;

    fn item_mut(&mut self, id: ItemId) -> Option<&mut Item>;

    /// Move `id` below every other item.
    fn send_to_back(&mut self, id: ItemId) -> bool;

    /// Move `id` directly above `anchor`.
    fn raise_above(&mut self, id: ItemId, anchor: ItemId) -> bool;

    /// Move `id` directly below `anchor`.
    fn lower_below(&mut self, id: ItemId, anchor: ItemId) -> bool;

    /// Replace the item behind `id`, keeping its stacking position.
    fn update(&mut self, id: ItemId, item: Item) -> bool {
        match self.item_mut(id) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Change the string of a text item. `false` if `id` is missing or not text.
    fn set_text(&mut self, id: ItemId, value: &str) -> bool {
        match self.item_mut(id) {
            Some(Item::Text { text, .. }) => {
                if text.as_str() != value {
                    *text = value.to_owned();
                }
                true
            }
            _ => false,
        }
    }

    /// Change the fill of a text or disc item.
    fn set_fill(&mut self, id: ItemId, color: Rgba8) -> bool {
        match self.item_mut(id) {
            Some(Item::Text { fill, .. }) | Some(Item::Disc { fill, .. }) => {
                *fill = color;
                true
            }
            _ => false,
        }
    }
}

pub use scene::Scene;
