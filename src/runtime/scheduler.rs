use std::time::Duration;

use crate::{effects::Emitter, runtime::queue::TaskQueue, surface::DisplaySurface};

/// Which emitter a frame task advances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EmitterKind {
    Bubbles,
    Ripples,
}

impl EmitterKind {
    fn slot(self) -> usize {
        match self {
            Self::Bubbles => 0,
            Self::Ripples => 1,
        }
    }
}

/// Everything the kiosk event loop dispatches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Task {
    /// Data refresh: transit feed, background check, text.
    Refresh,
    /// One animation frame for one emitter.
    Frame(EmitterKind),
    /// Touch/click sample in surface coordinates.
    Touch { x: f64, y: f64 },
}

/// Owns the per-emitter frame chains.
///
/// A chain is armed when an emitter wakes and stays armed while exactly one
/// `Task::Frame` for it is pending. After each frame the emitter is re-queued only if
/// it still has live elements.
#[derive(Debug)]
pub struct FrameScheduler {
    interval: Duration,
    armed: [bool; 2],
}

impl FrameScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            armed: [false; 2],
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_armed(&self, kind: EmitterKind) -> bool {
        self.armed[kind.slot()]
    }

    /// Start the chain for `kind`. Returns `false` if one is already running.
    pub fn arm(&mut self, kind: EmitterKind, queue: &mut TaskQueue<Task>) -> bool {
        let slot = &mut self.armed[kind.slot()];
        if *slot {
            return false;
        }
        *slot = true;
        queue.after(self.interval, Task::Frame(kind));
        tracing::debug!(?kind, "frame chain armed");
        true
    }

    /// Run one frame for `kind` and requeue it while it has live elements.
    pub fn on_frame(
        &mut self,
        kind: EmitterKind,
        emitter: &mut dyn Emitter,
        surface: &mut dyn DisplaySurface,
        queue: &mut TaskQueue<Task>,
    ) {
        if !self.armed[kind.slot()] {
            tracing::debug!(?kind, "dropping frame for idle chain");
            return;
        }
        if emitter.tick(surface) {
            queue.after(self.interval, Task::Frame(kind));
        } else {
            self.armed[kind.slot()] = false;
            tracing::debug!(?kind, "frame chain idle");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/scheduler.rs"]
mod tests;
