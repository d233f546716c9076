//! Input handling
//!
//! Turn every controller into one stream of canonical button masks.
//! - Controller boundary and button layouts (primary pad, core remote, classic)
//! - Aggregation and the shared cooldown / auto-repeat gate
//! - Host pads: raw TTY stdin, and evdev via libinput (Linux)

pub mod aggregator;
pub mod buttons;
pub mod controller;
#[cfg(target_os = "linux")]
pub mod evdev;
pub mod repeat;
pub mod tty;

pub use aggregator::{InputAggregator, InputFrame, InputTick};
pub use buttons::{ClassicButtons, CoreButtons, PadButtons};
pub use controller::{
    ExtensionType, NoSecondaryPads, PrimaryController, PrimaryReading, SecondaryControllers,
    SecondaryReading, TouchSample, SECONDARY_CHANNELS,
};
#[cfg(target_os = "linux")]
pub use evdev::EvdevPad;
pub use repeat::{GateStep, RepeatGate};
pub use tty::TtyPad;
