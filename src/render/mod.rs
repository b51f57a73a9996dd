//! CPU rasterization of a [`Scene`](crate::surface::Scene) into PNG-ready frames.

pub(crate) mod cpu;
pub(crate) mod frame;
pub(crate) mod text;

pub use cpu::Compositor;
pub use frame::Frame;
