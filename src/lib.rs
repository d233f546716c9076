//! vkbd - software-composited on-screen keyboard
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │        Keyboard session (tick loop)      │
//! ├──────────────────────────────────────────┤
//! │  Input aggregator  →  Edit state         │
//! │                          ↓               │
//! │        Layout + glyphs → Compositor      │
//! │                          ↓               │
//! │     Handheld 854×480  +  External 1.5×   │
//! └──────────────────────────────────────────┘
//! ```

pub mod config;
pub mod constants;
pub mod display;
pub mod drawing;
pub mod font;
pub mod input;
pub mod keyboard;
pub mod utils;

pub use config::Config;
pub use display::{DisplayBackend, MemoryDisplay};
pub use font::{FontService, GlyphSource};
pub use input::{PrimaryController, SecondaryControllers};
pub use keyboard::{run_keyboard, Clock, KeyboardContext, KeyboardSettings};
