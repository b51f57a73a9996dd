//! Touch feedback: small colored bubbles drifting upward from the touch point.

use std::ops::RangeInclusive;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    effects::{Emitter, Wake, wake_after_insert},
    foundation::core::{Point, Rgba8, Vec2},
    surface::{DisplaySurface, Item, ItemId},
};

pub const BUBBLE_PALETTE: [Rgba8; 5] = [
    Rgba8::opaque(0x4a, 0x90, 0xe2),
    Rgba8::opaque(0x50, 0xc8, 0x78),
    Rgba8::opaque(0xff, 0xd7, 0x00),
    Rgba8::opaque(0xff, 0x6b, 0x9d),
    Rgba8::opaque(0x9b, 0x59, 0xb6),
];

pub const SPAWN_COUNT: RangeInclusive<u32> = 3..=5;
/// Max per-axis offset of a new bubble from the touch point.
pub const SPAWN_JITTER_PX: f64 = 20.0;
pub const RADIUS_PX: RangeInclusive<f64> = 8.0..=16.0;
pub const VELOCITY_X: RangeInclusive<f64> = -1.5..=1.5;
/// Always upward.
pub const VELOCITY_Y: RangeInclusive<f64> = -5.0..=-3.0;
pub const LIFESPAN_TICKS: RangeInclusive<u32> = 60..=90;

/// One bubble.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Point,
    pub vel: Vec2,
    pub radius: f64,
    pub color: Rgba8,
    /// Ticks elapsed since spawn.
    pub age: u32,
    pub max_age: u32,
    item: ItemId,
}

impl Particle {
    pub fn item(&self) -> ItemId {
        self.item
    }

    fn shape(&self) -> Item {
        Item::Disc {
            center: self.pos,
            radius: self.radius,
            fill: self.color,
        }
    }
}

/// Owns every live bubble and their surface items.
pub struct BubbleEmitter {
    particles: Vec<Particle>,
    running: bool,
    rng: StdRng,
}

impl BubbleEmitter {
    /// `seed` makes spawns reproducible; `None` seeds from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            particles: Vec::new(),
            running: false,
            rng,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Add 3 to 5 bubbles around `at`. No physics runs here; movement happens on the
    /// next frame tick.
    pub fn spawn(&mut self, surface: &mut dyn DisplaySurface, at: Point) -> Wake {
        let count = self.rng.random_range(SPAWN_COUNT);
        for _ in 0..count {
            let dx = self.rng.random_range(-SPAWN_JITTER_PX..=SPAWN_JITTER_PX);
            let dy = self.rng.random_range(-SPAWN_JITTER_PX..=SPAWN_JITTER_PX);
            let color = BUBBLE_PALETTE[self.rng.random_range(0..BUBBLE_PALETTE.len())];
            let radius = self.rng.random_range(RADIUS_PX);
            let vel = Vec2::new(
                self.rng.random_range(VELOCITY_X),
                self.rng.random_range(VELOCITY_Y),
            );
            let max_age = self.rng.random_range(LIFESPAN_TICKS);

            let pos = at + Vec2::new(dx, dy);
            let item = surface.create(Item::Disc {
                center: pos,
                radius,
                fill: color,
            });
            self.particles.push(Particle {
                pos,
                vel,
                radius,
                color,
                age: 0,
                max_age,
                item,
            });
        }

        let was_running = self.running;
        self.running = !self.particles.is_empty();
        wake_after_insert(was_running, self.running)
    }
}

impl Emitter for BubbleEmitter {
    fn tick(&mut self, surface: &mut dyn DisplaySurface) -> bool {
        self.particles.retain_mut(|p| {
            p.age += 1;
            if p.age >= p.max_age {
                surface.remove(p.item);
                return false;
            }
            p.pos += p.vel;
            surface.update(p.item, p.shape());
            true
        });
        self.running = !self.particles.is_empty();
        self.running
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn live_count(&self) -> usize {
        self.particles.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/bubble.rs"]
mod tests;
