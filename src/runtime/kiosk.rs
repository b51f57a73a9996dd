use std::time::{Duration, Instant};

use crate::{
    foundation::{config::KioskConfig, core::Point, error::KioskResult},
    effects::Wake,
    present::controller::{PresentationController, RefreshReport},
    runtime::{
        queue::TaskQueue,
        scheduler::{EmitterKind, FrameScheduler, Task},
    },
    surface::{DisplaySurface, Scene},
    transit::{TransitFeed, feed::feed_from_config},
};

/// The whole kiosk: one surface, one controller, one task stream.
///
/// Every mutation of the surface happens inside [`Kiosk::dispatch`].
pub struct Kiosk<S> {
    surface: S,
    controller: PresentationController,
    scheduler: FrameScheduler,
    queue: TaskQueue<Task>,
    refresh_interval: Duration,
    started: bool,
    last_report: Option<RefreshReport>,
}

impl Kiosk<Scene> {
    /// Validate `cfg`, build the configured feed, and lay out a fresh scene.
    pub fn from_config(cfg: &KioskConfig) -> KioskResult<Self> {
        cfg.validate()?;
        let feed = feed_from_config(&cfg.feed)?;
        Ok(Self::with_feed(Scene::new(cfg.canvas), cfg, feed))
    }
}

impl<S: DisplaySurface> Kiosk<S> {
    pub fn with_feed(mut surface: S, cfg: &KioskConfig, feed: Box<dyn TransitFeed>) -> Self {
        let controller = PresentationController::from_config(&mut surface, cfg, feed);
        Self {
            surface,
            controller,
            scheduler: FrameScheduler::new(cfg.frame_interval()),
            queue: TaskQueue::new(),
            refresh_interval: cfg.refresh_interval(),
            started: false,
            last_report: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Direct access for hosts that manage their own layers on the same surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn controller(&self) -> &PresentationController {
        &self.controller
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn queue(&self) -> &TaskQueue<Task> {
        &self.queue
    }

    /// Virtual time since the kiosk was created.
    pub fn now(&self) -> Duration {
        self.queue.now()
    }

    pub fn last_report(&self) -> Option<&RefreshReport> {
        self.last_report.as_ref()
    }

    /// Queue the first refresh tick. Later calls do nothing.
    pub fn start(&mut self) {
        if !self.started {
            self.started = true;
            self.queue.push_now(Task::Refresh);
        }
    }

    /// Record a touch. The bubbles are spawned when the task is dispatched.
    pub fn touch(&mut self, at: Point) {
        self.queue.push_now(Task::Touch { x: at.x, y: at.y });
    }

    pub fn dispatch(&mut self, task: Task) {
        match task {
            Task::Refresh => {
                let report = self.controller.refresh(&mut self.surface);
                if report.ripples == Wake::Start {
                    self.scheduler.arm(EmitterKind::Ripples, &mut self.queue);
                }
                self.last_report = Some(report);
                self.queue.after(self.refresh_interval, Task::Refresh);
            }
            Task::Frame(kind) => {
                self.scheduler.on_frame(
                    kind,
                    self.controller.emitter_mut(kind),
                    &mut self.surface,
                    &mut self.queue,
                );
            }
            Task::Touch { x, y } => {
                if self.controller.touch(&mut self.surface, Point::new(x, y)) == Wake::Start {
                    self.scheduler.arm(EmitterKind::Bubbles, &mut self.queue);
                }
            }
        }
    }

    /// Run every task due within the next `span` of virtual time. Returns how many ran.
    pub fn run_for(&mut self, span: Duration) -> usize {
        let until = self.queue.now() + span;
        let mut ran = 0;
        while let Some(task) = self.queue.pop_until(until) {
            self.dispatch(task);
            ran += 1;
        }
        self.queue.advance_to(until);
        ran
    }

    /// Run against the wall clock, sleeping between due tasks, until `budget` elapses
    /// (forever when `None`). Returns how many tasks ran.
    pub fn run_realtime(&mut self, budget: Option<Duration>) -> usize {
        let origin = Instant::now();
        let base = self.queue.now();
        let mut ran = 0;
        loop {
            let elapsed = origin.elapsed();
            if budget.is_some_and(|b| elapsed >= b) {
                break;
            }
            let wall_now = base + elapsed;
            while let Some(task) = self.queue.pop_until(wall_now) {
                self.dispatch(task);
                ran += 1;
            }
            self.queue.advance_to(wall_now);

            let mut wake_at = self.queue.next_due().unwrap_or(wall_now + self.refresh_interval);
            if let Some(b) = budget {
                wake_at = wake_at.min(base + b);
            }
            let now = base + origin.elapsed();
            if wake_at > now {
                std::thread::sleep(wake_at - now);
            }
        }
        tracing::info!(tasks = ran, "realtime run finished");
        ran
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/kiosk.rs"]
mod tests;
