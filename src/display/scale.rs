//! Per-display scale profiles
//!
//! Both displays share the 854x480 logical space. The handheld panel is
//! drawn 1:1; the external display gets a scaled block per logical pixel.

use std::ops::Range;

use crate::constants::HANDHELD_PITCH;

/// Double buffer size of a 1280x720 external display
pub const EXTERNAL_720_BUFFER_SIZE: usize = 0x0070_8000;

/// Double buffer size of a 1920x1080 external display
pub const EXTERNAL_1080_BUFFER_SIZE: usize = 0x00FD_2000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleProfile {
    /// Row pitch in pixels
    pub pitch: u32,
    /// Per-axis scale factor
    pub scale: f32,
}

impl ScaleProfile {
    pub const HANDHELD: ScaleProfile = ScaleProfile {
        pitch: HANDHELD_PITCH,
        scale: 1.0,
    };

    pub const EXTERNAL_720: ScaleProfile = ScaleProfile {
        pitch: 1280,
        scale: 1.5,
    };

    pub const EXTERNAL_1080: ScaleProfile = ScaleProfile {
        pitch: 1920,
        scale: 2.25,
    };

    /// Select the external profile from the reported buffer size.
    /// Unknown sizes use the 720p profile.
    pub fn for_external(buffer_size: usize) -> Self {
        match buffer_size {
            EXTERNAL_1080_BUFFER_SIZE => Self::EXTERNAL_1080,
            EXTERNAL_720_BUFFER_SIZE => Self::EXTERNAL_720,
            _ => Self::EXTERNAL_720,
        }
    }

    /// Native pixels covered by logical coordinate `v` on one axis.
    /// Consecutive spans tile without gaps or overlap.
    #[inline]
    pub fn span(&self, v: u32) -> Range<u32> {
        let start = (v as f32 * self.scale) as u32;
        let end = ((v + 1) as f32 * self.scale) as u32;
        start..end.max(start + 1)
    }
}
