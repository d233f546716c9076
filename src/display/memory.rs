//! In-memory display backend
//!
//! Double-buffered RGBx framebuffers for both screens, laid out the way
//! the hardware lays them out. Used by the binary (PNG export) and tests.

use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};

use crate::constants::{BYTES_PER_PIXEL, HANDHELD_PITCH, SCREEN_HEIGHT, SCREEN_WIDTH};

use super::backend::{BufferHalf, DisplayBackend, Screen};

/// External display resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalMode {
    Hd720,
    FullHd1080,
}

impl ExternalMode {
    pub fn size(self) -> (u32, u32) {
        match self {
            ExternalMode::Hd720 => (1280, 720),
            ExternalMode::FullHd1080 => (1920, 1080),
        }
    }
}

struct FrameBuffer {
    bytes: Vec<u8>,
    pitch: u32,
    width: u32,
    height: u32,
    /// Half currently shown
    front: BufferHalf,
}

impl FrameBuffer {
    fn new(pitch: u32, width: u32, height: u32) -> Self {
        let size = pitch as usize * height as usize * BYTES_PER_PIXEL * 2;
        Self {
            bytes: vec![0; size],
            pitch,
            width,
            height,
            front: BufferHalf::First,
        }
    }

    fn back(&self) -> BufferHalf {
        self.front.toggled()
    }

    fn half_bytes(&self, half: BufferHalf) -> &[u8] {
        let base = half.base(self.bytes.len());
        &self.bytes[base..base + self.bytes.len() / 2]
    }

    fn clear(&mut self, color: u32) {
        let base = self.back().base(self.bytes.len());
        let len = self.bytes.len() / 2;
        let word = color.to_be_bytes();
        for px in self.bytes[base..base + len].chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&word);
        }
    }

    fn put_pixel(&mut self, x: u32, y: u32, color: u32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.back().base(self.bytes.len())
            + (y as usize * self.pitch as usize + x as usize) * BYTES_PER_PIXEL;
        self.bytes[i..i + BYTES_PER_PIXEL].copy_from_slice(&color.to_be_bytes());
    }

    /// Visible pixels of the front half as tightly packed RGBA
    fn front_rgba(&self) -> Vec<u8> {
        let front = self.half_bytes(self.front);
        let row_bytes = self.pitch as usize * BYTES_PER_PIXEL;
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for row in front.chunks_exact(row_bytes).take(self.height as usize) {
            for px in row.chunks_exact(BYTES_PER_PIXEL).take(self.width as usize) {
                out.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
        }
        out
    }
}

pub struct MemoryDisplay {
    handheld: FrameBuffer,
    external: FrameBuffer,
}

impl MemoryDisplay {
    pub fn new(mode: ExternalMode) -> Self {
        let (width, height) = mode.size();
        Self {
            handheld: FrameBuffer::new(HANDHELD_PITCH, SCREEN_WIDTH, SCREEN_HEIGHT),
            external: FrameBuffer::new(width, width, height),
        }
    }

    fn buffer(&self, screen: Screen) -> &FrameBuffer {
        match screen {
            Screen::Handheld => &self.handheld,
            Screen::External => &self.external,
        }
    }

    fn buffer_mut(&mut self, screen: Screen) -> &mut FrameBuffer {
        match screen {
            Screen::Handheld => &mut self.handheld,
            Screen::External => &mut self.external,
        }
    }

    /// Visible size of a screen in native pixels
    pub fn dimensions(&self, screen: Screen) -> (u32, u32) {
        let fb = self.buffer(screen);
        (fb.width, fb.height)
    }

    /// RGB of a native pixel in the visible half
    pub fn front_pixel(&self, screen: Screen, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        let fb = self.buffer(screen);
        if x >= fb.width || y >= fb.height {
            return None;
        }
        let i = (y as usize * fb.pitch as usize + x as usize) * BYTES_PER_PIXEL;
        let px = fb.half_bytes(fb.front).get(i..i + 3)?;
        Some((px[0], px[1], px[2]))
    }

    /// Visible half of a screen as RGBA rows
    pub fn front_rgba(&self, screen: Screen) -> Vec<u8> {
        self.buffer(screen).front_rgba()
    }

    /// Write the visible half of a screen to a timestamped PNG in `dir`
    pub fn save_png(&self, screen: Screen, dir: &Path) -> Result<PathBuf> {
        let (width, height) = self.dimensions(screen);
        let name = match screen {
            Screen::Handheld => "handheld",
            Screen::External => "external",
        };
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("vkbd_{}_{}.png", name, timestamp));

        let file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut encoder = png::Encoder::new(std::io::BufWriter::new(file), width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.front_rgba(screen))?;

        info!("Screenshot saved: {}", path.display());
        Ok(path)
    }
}

impl DisplayBackend for MemoryDisplay {
    fn buffer_size(&self, screen: Screen) -> usize {
        self.buffer(screen).bytes.len()
    }

    fn clear(&mut self, screen: Screen, color: u32) {
        self.buffer_mut(screen).clear(color);
    }

    fn flip(&mut self, screen: Screen) {
        let fb = self.buffer_mut(screen);
        fb.front = fb.back();
    }

    fn put_pixel(&mut self, screen: Screen, x: u32, y: u32, color: u32) {
        self.buffer_mut(screen).put_pixel(x, y, color);
    }

    fn buffers_mut(&mut self) -> (&mut [u8], &mut [u8]) {
        (&mut self.handheld.bytes, &mut self.external.bytes)
    }

    fn active_half(&self, screen: Screen) -> Option<BufferHalf> {
        Some(self.buffer(screen).back())
    }
}
