//! Font loading and glyph rasterization
//!
//! Handles:
//! - Standard font discovery (env / config / known paths / fontconfig)
//! - TTF/OTF parsing (fontdue)
//! - On-demand coverage bitmaps and advance metrics
//! - Icon glyphs (private-use code points with ASCII fallbacks)

pub mod fontconfig;
pub mod glyph;
pub mod icon;
pub mod service;

pub use glyph::{FontError, FontGlyphs, GlyphBitmap, GlyphSource};
pub use icon::Icon;
pub use service::{FontService, StaticFont, SystemFontService};
