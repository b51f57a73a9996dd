//! Background image hot-swap: polling synchronizer and atomic installer.

pub(crate) mod install;
pub(crate) mod sync;

pub use install::{ALLOWED_EXTENSIONS, install_background};
pub use sync::{BackgroundSynchronizer, SyncOutcome};
