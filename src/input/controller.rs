//! Controller boundary
//!
//! One primary pad with a touch panel, plus up to four secondary channels
//! whose attached extension decides how their button words are read.

use anyhow::Result;

use super::buttons::{ClassicButtons, CoreButtons, PadButtons};

/// Number of secondary controller channels polled per tick
pub const SECONDARY_CHANNELS: usize = 4;

/// Touch panel sample in logical screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TouchSample {
    pub touched: bool,
    pub x: u32,
    pub y: u32,
}

/// One primary pad read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrimaryReading {
    /// Buttons currently down
    pub hold: PadButtons,
    /// Buttons that went down since the previous read
    pub trigger: PadButtons,
    pub touch: TouchSample,
}

/// Extension attached to a secondary channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionType {
    Core,
    Nunchuk,
    Classic,
    MotionPlus,
    MotionPlusNunchuk,
    MotionPlusClassic,
    Pro,
    /// Nothing connected on the channel
    Absent,
    Other(u8),
}

impl ExtensionType {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => ExtensionType::Core,
            1 => ExtensionType::Nunchuk,
            2 => ExtensionType::Classic,
            5 => ExtensionType::MotionPlus,
            6 => ExtensionType::MotionPlusNunchuk,
            7 => ExtensionType::MotionPlusClassic,
            0x1f => ExtensionType::Pro,
            0xff => ExtensionType::Absent,
            other => ExtensionType::Other(other),
        }
    }

    /// Whether button words use the core remote layout
    pub fn uses_core_layout(self) -> bool {
        matches!(
            self,
            ExtensionType::Core
                | ExtensionType::Nunchuk
                | ExtensionType::MotionPlus
                | ExtensionType::MotionPlusNunchuk
        )
    }
}

/// One secondary channel read. `hold`/`trigger` are raw words in either
/// the core or the classic layout, depending on `extension`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondaryReading {
    pub extension: ExtensionType,
    pub hold: u32,
    pub trigger: u32,
}

impl SecondaryReading {
    /// Newly pressed buttons that are still held, in the canonical layout
    pub fn pressed(&self) -> PadButtons {
        let bits = self.trigger & self.hold;
        match self.extension {
            ExtensionType::Absent => PadButtons::empty(),
            ext if ext.uses_core_layout() => CoreButtons::from_bits_truncate(bits).to_pad(),
            _ => ClassicButtons::from_bits_truncate(bits).to_pad(),
        }
    }
}

/// Primary pad (buttons + touch)
pub trait PrimaryController {
    fn poll(&mut self) -> Result<PrimaryReading>;
}

/// Secondary controller channels
pub trait SecondaryControllers {
    /// Ok(None) when no data is available on the channel this tick
    fn poll(&mut self, channel: usize) -> Result<Option<SecondaryReading>>;
}

/// Host without secondary controllers
pub struct NoSecondaryPads;

impl SecondaryControllers for NoSecondaryPads {
    fn poll(&mut self, _channel: usize) -> Result<Option<SecondaryReading>> {
        Ok(None)
    }
}
