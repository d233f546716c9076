//! Framebuffer surface
//!
//! Borrowed view of one display's double buffer for the duration of a
//! frame. All writes go through `set_pixel`/`blend_pixel`, which bound
//! every offset to the half being drawn.

use crate::constants::BYTES_PER_PIXEL;
use crate::utils::{blend_channel, Rgba};

use super::backend::BufferHalf;
use super::scale::ScaleProfile;

pub struct Surface<'b> {
    bytes: &'b mut [u8],
    profile: ScaleProfile,
    half: BufferHalf,
}

impl<'b> Surface<'b> {
    pub fn new(bytes: &'b mut [u8], profile: ScaleProfile, half: BufferHalf) -> Self {
        Self {
            bytes,
            profile,
            half,
        }
    }

    /// Byte offset of a native pixel, None when it falls outside the half
    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.profile.pitch {
            return None;
        }
        let half_size = self.bytes.len() / 2;
        let i = (y as usize)
            .checked_mul(self.profile.pitch as usize)?
            .checked_add(x as usize)?
            .checked_mul(BYTES_PER_PIXEL)?;
        if i + 3 >= half_size {
            return None;
        }
        Some(i + self.half.base(self.bytes.len()))
    }

    /// Overwrite R, G, B of a native pixel; the fourth byte is left alone
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(i) = self.offset(x, y) {
            self.bytes[i] = color.r;
            self.bytes[i + 1] = color.g;
            self.bytes[i + 2] = color.b;
        }
    }

    /// Alpha-blend a native pixel
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        match color.a {
            0 => {}
            255 => self.set_pixel(x, y, color),
            a => {
                if let Some(i) = self.offset(x, y) {
                    self.bytes[i] = blend_channel(color.r, self.bytes[i], a);
                    self.bytes[i + 1] = blend_channel(color.g, self.bytes[i + 1], a);
                    self.bytes[i + 2] = blend_channel(color.b, self.bytes[i + 2], a);
                }
            }
        }
    }

    /// Blend one logical pixel as a scaled block
    pub fn plot(&mut self, x: u32, y: u32, color: Rgba) {
        if color.a == 0 {
            return;
        }
        let xs = self.profile.span(x);
        for yy in self.profile.span(y) {
            for xx in xs.clone() {
                self.blend_pixel(xx, yy, color);
            }
        }
    }

    /// RGB at a native pixel of the half being drawn
    pub fn pixel(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        let i = self.offset(x, y)?;
        Some((self.bytes[i], self.bytes[i + 1], self.bytes[i + 2]))
    }
}
