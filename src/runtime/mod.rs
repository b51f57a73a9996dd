//! Cooperative event loop: virtual-clock task queue, frame chains, and the kiosk
//! dispatcher tying them to the presentation controller.

pub(crate) mod kiosk;
pub(crate) mod queue;
pub(crate) mod scheduler;

pub use kiosk::Kiosk;
pub use queue::TaskQueue;
pub use scheduler::{EmitterKind, FrameScheduler, Task};
