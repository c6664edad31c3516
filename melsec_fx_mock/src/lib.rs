//! In-process mock of an FX-series controller.
//!
//! `MockFxPlc` implements the `Channel` trait directly: frames written to it
//! are parsed and answered immediately from an in-memory image of the
//! controller's unit-address space, so client tests run without a serial
//! line. Force addresses for M/S/Y are mapped back onto the byte image,
//! which makes a forced coil visible to subsequent byte reads exactly like
//! on hardware.
//!
//! The handle is cheap to clone; clones share the same controller state, so
//! a test can keep one clone for inspection while the client owns another.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use melsec_fx::ascii::{ascii_hex_to_bytes, bytes_to_ascii_hex, checksum_ascii};
use melsec_fx::channel::Channel;
use melsec_fx::error::FxError;
use melsec_fx::fx_define::{ACK, CMD_FORCE_OFF, CMD_FORCE_ON, CMD_READ, CMD_WRITE, ETX, NAK, STX};

// Full 16-bit unit-address space of the controller.
const MEMORY_SIZE: usize = 0x1_0000;

struct MockState {
    memory: Vec<u8>,
    rx: VecDeque<u8>,
    silent: bool,
}

/// Cloneable handle to a simulated FX controller.
#[derive(Clone)]
pub struct MockFxPlc {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockFxPlc {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFxPlc {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                memory: vec![0u8; MEMORY_SIZE],
                rx: VecDeque::new(),
                silent: false,
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stop answering requests; already-queued response bytes are dropped.
    /// Used to drive client timeout paths.
    pub fn set_silent(&self, silent: bool) {
        let mut state = self.lock();
        state.silent = silent;
        if silent {
            state.rx.clear();
        }
    }

    /// Preload bytes into the unit-address image (test setup).
    pub fn load(&self, unit: u16, bytes: &[u8]) {
        let mut state = self.lock();
        let start = usize::from(unit);
        state.memory[start..start + bytes.len()].copy_from_slice(bytes);
    }

    /// Copy bytes out of the unit-address image (test inspection).
    #[must_use]
    pub fn image(&self, unit: u16, len: usize) -> Vec<u8> {
        let state = self.lock();
        let start = usize::from(unit);
        state.memory[start..start + len].to_vec()
    }
}

impl MockState {
    fn respond(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    fn process_frame(&mut self, frame: &[u8]) {
        // minimum request: STX + func + 4 addr chars + ETX + 2 checksum chars
        if frame.len() < 9 || frame[0] != STX {
            tracing::debug!("mock: dropping malformed frame ({} bytes)", frame.len());
            self.respond(&[NAK]);
            return;
        }
        let etx_pos = frame.len() - 3;
        if frame[etx_pos] != ETX || checksum_ascii(&frame[1..=etx_pos]) != frame[etx_pos + 1..] {
            tracing::debug!("mock: checksum/ETX mismatch");
            self.respond(&[NAK]);
            return;
        }
        let body = &frame[1..etx_pos];
        match body[0] {
            CMD_READ => self.handle_read(&body[1..]),
            CMD_WRITE => self.handle_write(&body[1..]),
            CMD_FORCE_ON => self.handle_force(&body[1..], true),
            CMD_FORCE_OFF => self.handle_force(&body[1..], false),
            other => {
                tracing::debug!("mock: unknown function code 0x{other:02X}");
                self.respond(&[NAK]);
            }
        }
    }

    fn handle_read(&mut self, fields: &[u8]) {
        // addr(4) + len(2)
        let Some((unit, rest)) = take_hex_u16(fields, 4) else {
            self.respond(&[NAK]);
            return;
        };
        let Some((len, rest)) = take_hex_u16(rest, 2) else {
            self.respond(&[NAK]);
            return;
        };
        if !rest.is_empty() {
            self.respond(&[NAK]);
            return;
        }
        let start = usize::from(unit);
        let end = start + usize::from(len);
        if end > self.memory.len() {
            self.respond(&[NAK]);
            return;
        }
        tracing::debug!("mock: read {len} bytes at 0x{unit:04X}");
        let data = bytes_to_ascii_hex(&self.memory[start..end]);
        let mut out = Vec::with_capacity(data.len() + 4);
        out.push(STX);
        out.extend_from_slice(&data);
        out.push(ETX);
        let ck = checksum_ascii(&out[1..]);
        out.extend_from_slice(&ck);
        self.respond(&out);
    }

    fn handle_write(&mut self, fields: &[u8]) {
        // addr(4) + len(2) + data(len*2)
        let Some((unit, rest)) = take_hex_u16(fields, 4) else {
            self.respond(&[NAK]);
            return;
        };
        let Some((len, rest)) = take_hex_u16(rest, 2) else {
            self.respond(&[NAK]);
            return;
        };
        let Ok(data) = ascii_hex_to_bytes(rest) else {
            self.respond(&[NAK]);
            return;
        };
        if data.len() != usize::from(len) {
            self.respond(&[NAK]);
            return;
        }
        let start = usize::from(unit);
        let end = start + data.len();
        if end > self.memory.len() {
            self.respond(&[NAK]);
            return;
        }
        tracing::debug!("mock: write {len} bytes at 0x{unit:04X}");
        self.memory[start..end].copy_from_slice(&data);
        self.respond(&[ACK]);
    }

    fn handle_force(&mut self, fields: &[u8], on: bool) {
        // addr(4), transmitted byte-swapped
        let Some((swapped, rest)) = take_hex_u16(fields, 4) else {
            self.respond(&[NAK]);
            return;
        };
        if !rest.is_empty() {
            self.respond(&[NAK]);
            return;
        }
        let unit = swapped.swap_bytes();
        let Some((byte_unit, bit)) = force_target(unit) else {
            tracing::debug!("mock: force at unmapped unit 0x{unit:04X}");
            self.respond(&[NAK]);
            return;
        };
        tracing::debug!("mock: force {} unit 0x{unit:04X}", if on { "ON" } else { "OFF" });
        let mask = 1u8 << bit;
        if on {
            self.memory[byte_unit] |= mask;
        } else {
            self.memory[byte_unit] &= !mask;
        }
        self.respond(&[ACK]);
    }
}

/// Map a force-space unit address back to (byte-image index, bit position).
///
/// Windows mirror the client's resolution formulas: special M bank at
/// 0x0F00, ordinary M at 0x0800, Y at 0x0500, S below that.
fn force_target(unit: u16) -> Option<(usize, u8)> {
    let unit = usize::from(unit);
    let (bit_offset, byte_base) = if (0x0F00..0x1000).contains(&unit) {
        (unit - 0x0F00 + 8000, 0x0100)
    } else if (0x0800..0x0F00).contains(&unit) {
        (unit - 0x0800, 0x0100)
    } else if (0x0500..0x0600).contains(&unit) {
        (unit - 0x0500, 0x00A0)
    } else if unit < 0x0500 {
        (unit, 0x0000)
    } else {
        return None;
    };
    Some((byte_base + bit_offset / 8, (bit_offset % 8) as u8))
}

fn take_hex_u16(fields: &[u8], digits: usize) -> Option<(u16, &[u8])> {
    if fields.len() < digits {
        return None;
    }
    let (head, rest) = fields.split_at(digits);
    let s = std::str::from_utf8(head).ok()?;
    u16::from_str_radix(s, 16).ok().map(|v| (v, rest))
}

impl Channel for MockFxPlc {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), FxError> {
        let mut state = self.lock();
        if state.silent {
            tracing::debug!("mock: silent, swallowing {} bytes", bytes.len());
            return Ok(());
        }
        state.process_frame(bytes);
        Ok(())
    }

    fn bytes_to_read(&mut self) -> Result<usize, FxError> {
        Ok(self.lock().rx.len())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), FxError> {
        let mut state = self.lock();
        if state.rx.len() < buf.len() {
            return Err(FxError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "mock channel drained",
            )));
        }
        for slot in buf.iter_mut() {
            *slot = state.rx.pop_front().unwrap_or_default();
        }
        Ok(())
    }
}
