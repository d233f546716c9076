//! evdev pad
//!
//! Primary controller reading /dev/input/eventN through libinput.
//! Keyboards drive the d-pad and confirm/cancel; mice, touchpads and
//! touch screens drive the touch point in logical screen coordinates.

use anyhow::{anyhow, Result};
use input::event::keyboard::{KeyState, KeyboardEventTrait};
use input::event::pointer::ButtonState;
use input::event::touch::TouchEventPosition;
use input::event::{Event, PointerEvent, TouchEvent};
use input::{Libinput, LibinputInterface};
use log::{debug, info, warn};
use std::fs::OpenOptions;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::{AsRawFd, OwnedFd};
use std::path::Path;

use crate::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};

use super::buttons::PadButtons;
use super::controller::{PrimaryController, PrimaryReading, TouchSample};
use super::tty::set_nonblocking;

/// Linux input event codes
pub const KEY_ESC: u32 = 1;
pub const KEY_BACKSPACE: u32 = 14;
pub const KEY_ENTER: u32 = 28;
pub const KEY_SPACE: u32 = 57;
pub const KEY_KPENTER: u32 = 96;
pub const KEY_UP: u32 = 103;
pub const KEY_LEFT: u32 = 105;
pub const KEY_RIGHT: u32 = 106;
pub const KEY_DOWN: u32 = 108;
pub const BTN_LEFT: u32 = 0x110;

/// Pad button for a key code
pub fn key_to_button(code: u32) -> Option<PadButtons> {
    match code {
        KEY_UP => Some(PadButtons::UP),
        KEY_DOWN => Some(PadButtons::DOWN),
        KEY_LEFT => Some(PadButtons::LEFT),
        KEY_RIGHT => Some(PadButtons::RIGHT),
        KEY_ENTER | KEY_KPENTER | KEY_SPACE => Some(PadButtons::CONFIRM),
        KEY_BACKSPACE | KEY_ESC => Some(PadButtons::CANCEL),
        _ => None,
    }
}

/// Opens event nodes for libinput directly, without a seat manager.
/// The pad only reads, so write access is granted only when libinput
/// asks for it by access mode.
struct DeviceOpener;

impl DeviceOpener {
    fn wants_write(flags: i32) -> bool {
        matches!(flags & libc::O_ACCMODE, libc::O_WRONLY | libc::O_RDWR)
    }
}

impl LibinputInterface for DeviceOpener {
    fn open_restricted(&mut self, path: &Path, flags: i32) -> std::result::Result<OwnedFd, i32> {
        OpenOptions::new()
            .read(true)
            .write(Self::wants_write(flags))
            .custom_flags(flags & !libc::O_ACCMODE)
            .open(path)
            .map(OwnedFd::from)
            .map_err(|e| {
                warn!("evdev: {} unavailable: {}", path.display(), e);
                e.raw_os_error().unwrap_or(libc::ENOENT)
            })
    }

    fn close_restricted(&mut self, fd: OwnedFd) {
        debug!("evdev: closing fd {}", fd.as_raw_fd());
    }
}

pub struct EvdevPad {
    input: Libinput,
    held: PadButtons,
    pointer_x: f64,
    pointer_y: f64,
    button_down: bool,
    contacts: u32,
}

impl EvdevPad {
    /// Scan /dev/input/event* and add every device to libinput
    pub fn new() -> Result<Self> {
        let mut input = Libinput::new_from_path(DeviceOpener);

        let mut device_count = 0;
        for entry in std::fs::read_dir("/dev/input")
            .map_err(|e| anyhow!("Cannot scan /dev/input: {}", e))?
        {
            let entry = entry?;
            let path = entry.path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name.starts_with("event") {
                let path_str = path.to_str().unwrap_or("");
                if input.path_add_device(path_str).is_some() {
                    debug!("Input device added: {}", path_str);
                    device_count += 1;
                }
            }
        }

        if device_count == 0 {
            return Err(anyhow!(
                "No input devices found. Check permissions for /dev/input/event*."
            ));
        }

        info!("evdev: {} input devices added", device_count);

        set_nonblocking(input.as_raw_fd())?;

        Ok(Self {
            input,
            held: PadButtons::empty(),
            pointer_x: SCREEN_WIDTH as f64 / 2.0,
            pointer_y: SCREEN_HEIGHT as f64 / 2.0,
            button_down: false,
            contacts: 0,
        })
    }

    fn clamp_pointer(&mut self) {
        self.pointer_x = self.pointer_x.clamp(0.0, SCREEN_WIDTH as f64 - 1.0);
        self.pointer_y = self.pointer_y.clamp(0.0, SCREEN_HEIGHT as f64 - 1.0);
    }
}

impl PrimaryController for EvdevPad {
    fn poll(&mut self) -> Result<PrimaryReading> {
        self.input
            .dispatch()
            .map_err(|e| anyhow!("libinput dispatch error: {}", e))?;

        let mut trigger = PadButtons::empty();

        while let Some(event) = self.input.next() {
            match event {
                Event::Keyboard(input::event::KeyboardEvent::Key(key_event)) => {
                    let Some(button) = key_to_button(key_event.key()) else {
                        continue;
                    };
                    match key_event.key_state() {
                        KeyState::Pressed => {
                            if !self.held.contains(button) {
                                trigger |= button;
                            }
                            self.held |= button;
                        }
                        KeyState::Released => self.held.remove(button),
                    }
                }
                Event::Pointer(PointerEvent::Motion(m)) => {
                    self.pointer_x += m.dx();
                    self.pointer_y += m.dy();
                    self.clamp_pointer();
                }
                Event::Pointer(PointerEvent::MotionAbsolute(m)) => {
                    self.pointer_x = m.absolute_x_transformed(SCREEN_WIDTH);
                    self.pointer_y = m.absolute_y_transformed(SCREEN_HEIGHT);
                    self.clamp_pointer();
                }
                Event::Pointer(PointerEvent::Button(b)) if b.button() == BTN_LEFT => {
                    self.button_down = b.button_state() == ButtonState::Pressed;
                }
                Event::Touch(TouchEvent::Down(t)) => {
                    self.pointer_x = t.x_transformed(SCREEN_WIDTH);
                    self.pointer_y = t.y_transformed(SCREEN_HEIGHT);
                    self.clamp_pointer();
                    self.contacts += 1;
                }
                Event::Touch(TouchEvent::Motion(t)) => {
                    self.pointer_x = t.x_transformed(SCREEN_WIDTH);
                    self.pointer_y = t.y_transformed(SCREEN_HEIGHT);
                    self.clamp_pointer();
                }
                Event::Touch(TouchEvent::Up(_)) => {
                    self.contacts = self.contacts.saturating_sub(1);
                }
                Event::Touch(TouchEvent::Cancel(_)) => self.contacts = 0,
                _ => {}
            }
        }

        Ok(PrimaryReading {
            hold: self.held,
            trigger,
            touch: TouchSample {
                touched: self.button_down || self.contacts > 0,
                x: self.pointer_x as u32,
                y: self.pointer_y as u32,
            },
        })
    }
}
