//! Global constants for vkbd
//!
//! Consolidates timing, framebuffer, and screen constants
//! to eliminate magic numbers throughout the codebase.

// ============================================================================
// Timing Constants
// ============================================================================

/// Sleep between input polls in milliseconds
pub const TICK_MS: u64 = 20;

/// Ticks between auto-repeated actions while an input is held (25 * 20ms = 500ms)
pub const REPEAT_TICKS: u32 = 25;

/// Longest accepted repeat interval (500 * 20ms = 10s)
pub const MAX_REPEAT_TICKS: u32 = 500;

// ============================================================================
// Logical Screen
// ============================================================================

/// Logical screen width (handheld panel, drawn 1:1)
pub const SCREEN_WIDTH: u32 = 854;

/// Logical screen height
pub const SCREEN_HEIGHT: u32 = 480;

// ============================================================================
// Framebuffer Constants
// ============================================================================

/// Bytes per framebuffer pixel (RGBx)
pub const BYTES_PER_PIXEL: usize = 4;

/// Row pitch of the handheld framebuffer in pixels
pub const HANDHELD_PITCH: u32 = 0x380;

/// Value written through the backend to find which half it draws into
pub const ACTIVE_HALF_SENTINEL: u32 = 0xABCD_EF90;

// ============================================================================
// Text Constants
// ============================================================================

/// Font pixel size for labels and the text field
pub const FONT_SIZE: f32 = 24.0;

/// Result of committing an empty buffer
pub const DEFAULT_FALLBACK_TEXT: &str = "pool.ntp.org";

/// Default text capacity including the terminator slot
pub const DEFAULT_MAX_LENGTH: usize = 128;
