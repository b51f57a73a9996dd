use std::collections::HashMap;

use crate::{
    foundation::core::Canvas,
    surface::{DisplaySurface, Item, ItemId},
};

/// In-memory retained scene: items plus an explicit bottom-to-top stacking order.
#[derive(Clone, Debug)]
pub struct Scene {
    canvas: Canvas,
    next_id: u64,
    items: HashMap<ItemId, Item>,
    order: Vec<ItemId>,
}

impl Scene {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            next_id: 1,
            items: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    /// Stacking position, 0 being the bottom.
    pub fn z_index(&self, id: ItemId) -> Option<usize> {
        self.order.iter().position(|&x| x == id)
    }

    /// Items from bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &Item)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.items.get(id).map(|item| (*id, item)))
    }

    fn detach(&mut self, id: ItemId) -> bool {
        match self.z_index(id) {
            Some(idx) => {
                self.order.remove(idx);
                true
            }
            None => false,
        }
    }
}

impl DisplaySurface for Scene {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn create(&mut self, item: Item) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.items.insert(id, item);
        self.order.push(id);
        id
    }

    fn remove(&mut self, id: ItemId) -> bool {
        if self.items.remove(&id).is_none() {
            return false;
        }
        self.detach(id)
    }

    fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    fn send_to_back(&mut self, id: ItemId) -> bool {
        if !self.detach(id) {
            return false;
        }
        self.order.insert(0, id);
        true
    }

    fn raise_above(&mut self, id: ItemId, anchor: ItemId) -> bool {
        if id == anchor || !self.items.contains_key(&anchor) || !self.detach(id) {
            return false;
        }
        let at = self.z_index(anchor).map_or(self.order.len(), |i| i + 1);
        self.order.insert(at, id);
        true
    }

    fn lower_below(&mut self, id: ItemId, anchor: ItemId) -> bool {
        if id == anchor || !self.items.contains_key(&anchor) || !self.detach(id) {
            return false;
        }
        let at = self.z_index(anchor).unwrap_or(0);
        self.order.insert(at, id);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/scene.rs"]
mod tests;
