//! Utility functions shared across vkbd
//!
//! Common helpers that don't fit in specialized modules.

pub mod color;

pub use color::{blend_channel, parse_hex_color, Rgba};
