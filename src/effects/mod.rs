//! Particle-style effects driven by the shared frame clock.

pub(crate) mod bubble;
pub(crate) mod ripple;

use crate::surface::DisplaySurface;

/// Answer to a spawn/start call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wake {
    /// The emitter went from idle to running; a frame chain must be armed.
    Start,
    /// A frame chain already owns this emitter.
    AlreadyRunning,
    /// Nothing became live.
    Idle,
}

/// Lifecycle engine advanced once per frame tick.
pub trait Emitter {
    /// Advance every live element by one tick. Returns `true` while any remain.
    fn tick(&mut self, surface: &mut dyn DisplaySurface) -> bool;

    /// `true` iff the live set is non-empty.
    fn is_running(&self) -> bool;

    fn live_count(&self) -> usize;
}

pub(crate) fn wake_after_insert(was_running: bool, now_live: bool) -> Wake {
    match (was_running, now_live) {
        (_, false) => Wake::Idle,
        (false, true) => Wake::Start,
        (true, true) => Wake::AlreadyRunning,
    }
}
