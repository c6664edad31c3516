//! Byte-stream channel abstraction.
//!
//! The engine needs exactly three operations from the underlying duplex
//! link: write a frame, report how many response bytes have arrived, and
//! read an exact count. A clock/sleep pair is injected alongside so the
//! polling wait can be driven by tests without real time passing.

use std::time::{Duration, Instant};

use crate::error::FxError;

/// Half-duplex byte channel the transaction engine runs over.
///
/// Method names mirror the sync `serialport` crate so the blanket impl in
/// [`crate::serial`] stays thin; any in-process fake only has to queue
/// bytes.
pub trait Channel: Send {
    /// Write the whole frame. Partial writes are the transport's concern.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), FxError>;

    /// Number of received bytes waiting to be read.
    fn bytes_to_read(&mut self) -> Result<usize, FxError>;

    /// Read exactly `buf.len()` bytes, no more.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), FxError>;
}

/// Time source injected into the transaction engine.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    fn sleep(&self, dur: Duration);
}

/// System clock: `Instant::now` plus a thread sleep at the poll point.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdClock;

impl Clock for StdClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, dur: Duration) {
        std::thread::sleep(dur);
    }
}
