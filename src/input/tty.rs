//! TTY pad
//!
//! Primary controller backed by the controlling terminal. stdin is put
//! into raw mode and read non-blocking; the kernel VT layer already turns
//! scancodes into bytes and escape sequences, so only a handful of
//! sequences need decoding.
//!
//! Terminals deliver key repeats as a byte stream rather than held state,
//! so a key counts as held for a few ticks after its last byte.

use anyhow::{anyhow, Result};
use log::{debug, info};
use nix::errno::Errno;
use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::sys::termios::{self, Termios};
use std::os::fd::{AsRawFd, BorrowedFd, RawFd};

use super::buttons::PadButtons;
use super::controller::{PrimaryController, PrimaryReading};

/// Ticks a key stays held after its last byte
pub const LATCH_TICKS: u32 = 4;

/// Add O_NONBLOCK to a descriptor, returning the flags it had before
pub(super) fn set_nonblocking(fd: RawFd) -> Result<OFlag> {
    let before = fcntl(fd, FcntlArg::F_GETFL)
        .map(OFlag::from_bits_truncate)
        .map_err(|e| anyhow!("Cannot read flags of fd {}: {}", fd, e))?;
    fcntl(fd, FcntlArg::F_SETFL(before | OFlag::O_NONBLOCK))
        .map_err(|e| anyhow!("Cannot make fd {} non-blocking: {}", fd, e))?;
    Ok(before)
}

/// Holds stdin as a pad for the life of a session. Echo and line
/// buffering are off so single keys arrive at once, and reads never
/// block the tick. Both the termios and the file flags go back to how
/// the shell left them when the guard drops.
struct StdinPad {
    fd: RawFd,
    saved_termios: Termios,
    saved_flags: OFlag,
}

impl StdinPad {
    fn claim() -> Result<Self> {
        let fd = std::io::stdin().as_raw_fd();
        let stdin = unsafe { BorrowedFd::borrow_raw(fd) };

        let saved_termios = termios::tcgetattr(stdin)
            .map_err(|e| anyhow!("stdin is not a terminal: {}", e))?;
        let mut keys = saved_termios.clone();
        termios::cfmakeraw(&mut keys);
        termios::tcsetattr(stdin, termios::SetArg::TCSAFLUSH, &keys)
            .map_err(|e| anyhow!("Cannot switch stdin to raw mode: {}", e))?;

        let saved_flags = match set_nonblocking(fd) {
            Ok(flags) => flags,
            Err(e) => {
                let _ = termios::tcsetattr(stdin, termios::SetArg::TCSAFLUSH, &saved_termios);
                return Err(e);
            }
        };

        info!("Reading pad keys from stdin");
        Ok(Self {
            fd,
            saved_termios,
            saved_flags,
        })
    }

    /// Everything typed since the last tick, decoded
    fn drain(&self) -> Result<PadButtons> {
        let mut buf = [0u8; 64];
        let mut keys = PadButtons::empty();
        loop {
            match nix::unistd::read(self.fd, &mut buf) {
                Ok(0) | Err(Errno::EAGAIN) => return Ok(keys),
                Ok(n) => keys |= decode_keys(&buf[..n]),
                Err(Errno::EINTR) => {}
                Err(e) => return Err(anyhow!("stdin read failed: {}", e)),
            }
        }
    }
}

impl Drop for StdinPad {
    fn drop(&mut self) {
        let stdin = unsafe { BorrowedFd::borrow_raw(self.fd) };
        let _ = fcntl(self.fd, FcntlArg::F_SETFL(self.saved_flags));
        let _ = termios::tcsetattr(stdin, termios::SetArg::TCSAFLUSH, &self.saved_termios);
        debug!("stdin handed back to the shell");
    }
}

/// Decode a chunk of terminal input into pad buttons
pub fn decode_keys(bytes: &[u8]) -> PadButtons {
    let mut buttons = PadButtons::empty();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            0x1b => {
                // CSI / SS3 cursor keys: ESC [ X or ESC O X
                if let (Some(b'[' | b'O'), Some(&code)) = (bytes.get(i + 1), bytes.get(i + 2)) {
                    buttons |= match code {
                        b'A' => PadButtons::UP,
                        b'B' => PadButtons::DOWN,
                        b'C' => PadButtons::RIGHT,
                        b'D' => PadButtons::LEFT,
                        _ => PadButtons::empty(),
                    };
                    i += 3;
                    continue;
                }
                // Lone escape
                buttons |= PadButtons::CANCEL;
            }
            b'\r' | b'\n' | b' ' => buttons |= PadButtons::CONFIRM,
            0x7f | 0x08 => buttons |= PadButtons::CANCEL,
            b'h' => buttons |= PadButtons::LEFT,
            b'j' => buttons |= PadButtons::DOWN,
            b'k' => buttons |= PadButtons::UP,
            b'l' => buttons |= PadButtons::RIGHT,
            _ => {}
        }
        i += 1;
    }
    buttons
}

/// Key latch turning a byte stream into held/trigger state
#[derive(Debug, Default)]
pub struct KeyLatch {
    held: PadButtons,
    remaining: u32,
}

impl KeyLatch {
    /// Feed one tick of decoded keys; returns (hold, trigger)
    pub fn update(&mut self, keys: PadButtons) -> (PadButtons, PadButtons) {
        if !keys.is_empty() {
            let trigger = keys.difference(self.held);
            self.held = keys;
            self.remaining = LATCH_TICKS;
            return (self.held, trigger);
        }
        if self.remaining > 0 {
            self.remaining -= 1;
        }
        if self.remaining == 0 {
            self.held = PadButtons::empty();
        }
        (self.held, PadButtons::empty())
    }
}

pub struct TtyPad {
    stdin: StdinPad,
    latch: KeyLatch,
}

impl TtyPad {
    pub fn new() -> Result<Self> {
        Ok(Self {
            stdin: StdinPad::claim()?,
            latch: KeyLatch::default(),
        })
    }
}

impl PrimaryController for TtyPad {
    fn poll(&mut self) -> Result<PrimaryReading> {
        let keys = self.stdin.drain()?;
        let (hold, trigger) = self.latch.update(keys);
        Ok(PrimaryReading {
            hold,
            trigger,
            ..PrimaryReading::default()
        })
    }
}
