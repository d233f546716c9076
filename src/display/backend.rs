//! Display backend boundary
//!
//! A backend owns two double-buffered framebuffers: the handheld panel and
//! the external display. Each buffer is one contiguous allocation holding
//! both halves back to back, pixels stored as 4-byte RGBx.

/// Which physical display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Handheld,
    External,
}

/// Half of a double buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferHalf {
    First,
    Second,
}

impl BufferHalf {
    pub fn toggled(self) -> Self {
        match self {
            BufferHalf::First => BufferHalf::Second,
            BufferHalf::Second => BufferHalf::First,
        }
    }

    /// Byte offset of this half inside a buffer of `size` bytes
    pub fn base(self, size: usize) -> usize {
        match self {
            BufferHalf::First => 0,
            BufferHalf::Second => size / 2,
        }
    }
}

/// Host display collaborator
///
/// `clear` and `put_pixel` target the half currently being drawn. Colors are
/// packed 0xRRGGBBAA and land in memory most significant byte first.
pub trait DisplayBackend {
    /// Total byte size of the double buffer
    fn buffer_size(&self, screen: Screen) -> usize;

    fn clear(&mut self, screen: Screen, color: u32);

    /// Swap front and back halves
    fn flip(&mut self, screen: Screen);

    fn put_pixel(&mut self, screen: Screen, x: u32, y: u32, color: u32);

    /// Raw access to both double buffers: (handheld, external)
    fn buffers_mut(&mut self) -> (&mut [u8], &mut [u8]);

    /// The half currently being drawn, when the backend can tell
    fn active_half(&self, _screen: Screen) -> Option<BufferHalf> {
        None
    }
}
