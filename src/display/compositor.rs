//! Dual-display compositor
//!
//! Draws one logical 854x480 frame into both displays at once. The
//! compositor tracks which half of each double buffer is being drawn;
//! a `Canvas` borrows the backend's buffers for one frame.

use log::{debug, info, warn};

use crate::constants::{ACTIVE_HALF_SENTINEL, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::drawing::Rect;
use crate::font::{GlyphBitmap, GlyphSource};
use crate::utils::Rgba;

use super::backend::{BufferHalf, DisplayBackend, Screen};
use super::scale::ScaleProfile;
use super::surface::Surface;

/// Logical screen bounds
pub const SCREEN_RECT: Rect = Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT);

pub struct Compositor {
    half: BufferHalf,
    handheld: ScaleProfile,
    external: ScaleProfile,
}

impl Compositor {
    /// Bind to a backend and resolve the half being drawn
    pub fn attach<D: DisplayBackend + ?Sized>(backend: &mut D) -> Self {
        let external = ScaleProfile::for_external(backend.buffer_size(Screen::External));
        info!(
            "External display: pitch {}, scale {}",
            external.pitch, external.scale
        );

        let half = match backend.active_half(Screen::External) {
            Some(half) => {
                debug!("Active half reported by backend: {:?}", half);
                half
            }
            None => {
                let half = detect_active_half(backend);
                debug!("Active half detected: {:?}", half);
                half
            }
        };

        Self {
            half,
            handheld: ScaleProfile::HANDHELD,
            external,
        }
    }

    pub fn active_half(&self) -> BufferHalf {
        self.half
    }

    /// Fill the drawing half of both displays
    pub fn clear<D: DisplayBackend + ?Sized>(&self, backend: &mut D, color: Rgba) {
        backend.clear(Screen::Handheld, color.packed());
        backend.clear(Screen::External, color.packed());
    }

    /// Borrow both framebuffers for drawing one frame
    pub fn canvas<'b, D: DisplayBackend + ?Sized>(&self, backend: &'b mut D) -> Canvas<'b> {
        let (handheld, external) = backend.buffers_mut();
        Canvas {
            handheld: Surface::new(handheld, self.handheld, self.half),
            external: Surface::new(external, self.external, self.half),
        }
    }

    /// Flip both displays and draw into the other half from now on
    pub fn present<D: DisplayBackend + ?Sized>(&mut self, backend: &mut D) {
        backend.flip(Screen::Handheld);
        backend.flip(Screen::External);
        self.half = self.half.toggled();
    }
}

fn read_word(bytes: &[u8], offset: usize) -> Option<u32> {
    let word = bytes.get(offset..offset + 4)?;
    Some(u32::from_be_bytes([word[0], word[1], word[2], word[3]]))
}

fn write_word(bytes: &mut [u8], offset: usize, value: u32) {
    if let Some(word) = bytes.get_mut(offset..offset + 4) {
        word.copy_from_slice(&value.to_be_bytes());
    }
}

/// Find the drawing half by writing a sentinel through the backend and
/// checking whether it landed in the first half. Both sentinel words are
/// restored afterwards.
pub fn detect_active_half<D: DisplayBackend + ?Sized>(backend: &mut D) -> BufferHalf {
    let (first, second) = {
        let (_, external) = backend.buffers_mut();
        let second_base = BufferHalf::Second.base(external.len());
        (read_word(external, 0), read_word(external, second_base))
    };
    let (Some(first), Some(second)) = (first, second) else {
        warn!("External buffer too small for the sentinel, assuming first half");
        return BufferHalf::First;
    };

    backend.put_pixel(Screen::External, 0, 0, ACTIVE_HALF_SENTINEL);

    let (_, external) = backend.buffers_mut();
    let second_base = BufferHalf::Second.base(external.len());
    let landed_first = read_word(external, 0) == Some(ACTIVE_HALF_SENTINEL);
    write_word(external, 0, first);
    write_word(external, second_base, second);

    if landed_first {
        BufferHalf::First
    } else {
        BufferHalf::Second
    }
}

/// One frame's drawing target across both displays
pub struct Canvas<'b> {
    handheld: Surface<'b>,
    external: Surface<'b>,
}

impl Canvas<'_> {
    /// Blend one logical pixel into both displays
    pub fn draw_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if color.a == 0 {
            return;
        }
        self.handheld.plot(x, y, color);
        self.external.plot(x, y, color);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let Some(rect) = rect.clip_to(SCREEN_RECT) else {
            return;
        };
        for x in rect.x..rect.right() {
            for y in rect.y..rect.bottom() {
                self.draw_pixel(x as u32, y as u32, color);
            }
        }
    }

    /// Blit a coverage bitmap with its top-left corner at (x, y)
    pub fn draw_glyph(&mut self, bitmap: &GlyphBitmap, x: i32, y: i32, color: Rgba) {
        for q in 0..bitmap.height {
            let py = y + q as i32;
            if py < 0 || py >= SCREEN_HEIGHT as i32 {
                continue;
            }
            for p in 0..bitmap.width {
                let px = x + p as i32;
                if px < 0 || px >= SCREEN_WIDTH as i32 {
                    continue;
                }
                let coverage = bitmap.coverage(p, q);
                if coverage == 0 {
                    continue;
                }
                self.draw_pixel(px as u32, py as u32, color.with_coverage(coverage));
            }
        }
    }

    /// Draw a run of code points on a shared baseline; returns the final pen x
    pub fn draw_text<G: GlyphSource + ?Sized>(
        &mut self,
        glyphs: &G,
        x: i32,
        baseline: i32,
        text: &[char],
        color: Rgba,
    ) -> i32 {
        let mut pen = x;
        for &ch in text {
            let Some(bitmap) = glyphs.rasterize(ch) else {
                continue;
            };
            self.draw_glyph(&bitmap, pen + bitmap.left, baseline + bitmap.top, color);
            pen += bitmap.advance as i32;
        }
        pen
    }

    /// Native pixel readback of the handheld drawing half
    pub fn handheld_pixel(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        self.handheld.pixel(x, y)
    }

    /// Native pixel readback of the external drawing half
    pub fn external_pixel(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        self.external.pixel(x, y)
    }
}
