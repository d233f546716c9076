//! Dual-display output
//!
//! - `backend`: host display boundary (two double-buffered framebuffers)
//! - `scale`: per-display pitch and scale selection
//! - `surface`: bounded pixel access to one framebuffer
//! - `compositor`: one logical frame drawn into both displays
//! - `memory`: in-process backend with PNG export

pub mod backend;
pub mod compositor;
pub mod memory;
pub mod scale;
pub mod surface;

pub use backend::{BufferHalf, DisplayBackend, Screen};
pub use compositor::{Canvas, Compositor, SCREEN_RECT};
pub use memory::{ExternalMode, MemoryDisplay};
pub use scale::ScaleProfile;
pub use surface::Surface;
