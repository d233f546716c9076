//! Glyph source
//!
//! Loads the standard font and rasterizes glyphs on demand.
//! Nothing is cached: every `rasterize` call produces a fresh coverage
//! bitmap that the caller drops right after blitting.

use fontdue::{Font, FontSettings};
use log::{debug, info};
use thiserror::Error;

use super::service::FontService;

/// Smallest bitmap allocation on either axis
pub const MIN_BITMAP_DIM: usize = 4;

/// Font setup failures. The keyboard session treats both as "do not render".
#[derive(Debug, Error)]
pub enum FontError {
    #[error("no font asset available")]
    Unavailable,
    #[error("font asset is malformed: {0}")]
    Malformed(String),
}

/// Rasterized glyph with metrics
///
/// `left` is the horizontal bearing from the pen position, `top` the
/// offset from the baseline to the first bitmap row (negative = above).
#[derive(Debug, Clone)]
pub struct GlyphBitmap {
    pub width: usize,
    pub height: usize,
    pub left: i32,
    pub top: i32,
    pub advance: f32,
    /// Row stride of `coverage` (multiple of 4, at least 4)
    stride: usize,
    coverage: Vec<u8>,
}

impl GlyphBitmap {
    /// Copy a tightly packed `width * height` coverage map into a padded buffer
    pub fn new(width: usize, height: usize, left: i32, top: i32, advance: f32, src: &[u8]) -> Self {
        let stride = ((width + 3) & !3).max(MIN_BITMAP_DIM);
        let rows = height.max(MIN_BITMAP_DIM);
        let mut coverage = vec![0u8; stride * rows];

        for y in 0..height {
            for x in 0..width {
                if let Some(&v) = src.get(y * width + x) {
                    coverage[y * stride + x] = v;
                }
            }
        }

        Self {
            width,
            height,
            left,
            top,
            advance,
            stride,
            coverage,
        }
    }

    /// Coverage (0-255) at bitmap position; 0 outside the glyph box
    #[inline]
    pub fn coverage(&self, x: usize, y: usize) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.coverage[y * self.stride + x]
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Allocated bytes (always at least 4x4)
    pub fn allocated(&self) -> usize {
        self.coverage.len()
    }
}

/// Anything that can measure and rasterize code points
pub trait GlyphSource {
    /// Advance width, None when the font has no mapping
    fn advance(&self, ch: char) -> Option<f32>;

    /// Coverage bitmap, None when the font has no mapping
    fn rasterize(&self, ch: char) -> Option<GlyphBitmap>;

    fn has_glyph(&self, ch: char) -> bool {
        self.advance(ch).is_some()
    }

    /// Pen advance in whole pixels (0 for unmapped code points)
    fn measure(&self, ch: char) -> i32 {
        self.advance(ch).map(|a| a as i32).unwrap_or(0)
    }

    /// Width of a run of code points
    fn text_width(&self, text: &[char]) -> u32 {
        text.iter().map(|&ch| self.measure(ch)).sum::<i32>().max(0) as u32
    }
}

/// fontdue-backed glyph source at a fixed pixel size
pub struct FontGlyphs {
    font: Font,
    size: f32,
}

impl FontGlyphs {
    /// Parse font bytes
    pub fn from_bytes(data: &[u8], size: f32) -> Result<Self, FontError> {
        if data.is_empty() {
            return Err(FontError::Unavailable);
        }
        let settings = FontSettings {
            scale: size,
            ..FontSettings::default()
        };
        let font = Font::from_bytes(data, settings).map_err(|e| FontError::Malformed(e.to_string()))?;

        info!("Font loaded ({} glyphs, {}px)", font.glyph_count(), size);

        Ok(Self { font, size })
    }

    /// Fetch the standard font from the service and parse it
    pub fn load(service: &dyn FontService, size: f32) -> Result<Self, FontError> {
        let data = service.standard_font().ok_or(FontError::Unavailable)?;
        Self::from_bytes(&data, size)
    }

    fn mapped(&self, ch: char) -> bool {
        self.font.lookup_glyph_index(ch) != 0
    }
}

impl GlyphSource for FontGlyphs {
    fn advance(&self, ch: char) -> Option<f32> {
        if !self.mapped(ch) {
            return None;
        }
        Some(self.font.metrics(ch, self.size).advance_width)
    }

    fn rasterize(&self, ch: char) -> Option<GlyphBitmap> {
        if !self.mapped(ch) {
            debug!("Glyph not found: U+{:04X}", ch as u32);
            return None;
        }
        let (m, bitmap) = self.font.rasterize(ch, self.size);
        // fontdue ymin is the bitmap bottom relative to the baseline (up = positive)
        let top = -(m.ymin + m.height as i32);
        Some(GlyphBitmap::new(
            m.width,
            m.height,
            m.xmin,
            top,
            m.advance_width,
            &bitmap,
        ))
    }
}

impl Drop for FontGlyphs {
    fn drop(&mut self) {
        debug!("Font released");
    }
}
