//! Half-duplex transaction engine.
//!
//! One transaction is one write-then-wait-then-read exchange: the frame goes
//! out in a single write, then the channel's available-byte count is polled
//! until the exact expected response length is present or the deadline
//! passes. There is no pipelining and no retry; the caller serializes
//! transactions by holding the channel lock for the whole exchange.

use std::time::{Duration, Instant};

use crate::channel::{Channel, Clock};
use crate::config::config as global_config;
use crate::error::FxError;

pub(crate) fn hex_dump(b: &[u8]) -> String {
    b.iter()
        .map(|x| format!("{x:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Progress of one request/response exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Idle,
    Sent,
    AwaitingLength(usize),
    Complete,
    TimedOut,
}

/// One synchronous exchange over a [`Channel`].
///
/// Created per call and discarded afterwards; the deadline is recorded when
/// the frame has been sent. Suspension happens only at the poll point, via
/// the injected [`Clock`].
pub struct Transaction<'a> {
    frame: &'a [u8],
    expected_len: usize,
    timeout: Duration,
    loop_delay: Duration,
    state: TransactionState,
    deadline: Option<Instant>,
}

impl<'a> Transaction<'a> {
    #[must_use]
    pub fn new(
        frame: &'a [u8],
        expected_len: usize,
        timeout: Duration,
        loop_delay: Duration,
    ) -> Self {
        Self {
            frame,
            expected_len,
            timeout,
            loop_delay,
            state: TransactionState::Idle,
            deadline: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> TransactionState {
        self.state
    }

    /// Drive the state machine to completion against `channel`.
    ///
    /// `Idle → Sent → AwaitingLength(n) → Complete | TimedOut`. On timeout
    /// no partial read is attempted; whatever bytes arrived stay on the
    /// channel. The caller must already hold the channel's exclusion lock.
    pub fn run<C: Channel + ?Sized>(
        mut self,
        channel: &mut C,
        clock: &dyn Clock,
    ) -> Result<Vec<u8>, FxError> {
        loop {
            match self.state {
                TransactionState::Idle => {
                    if global_config().fx_dump_frames {
                        log::debug!("[FX send] {}", hex_dump(self.frame));
                    }
                    channel.write_all(self.frame)?;
                    self.state = TransactionState::Sent;
                }
                TransactionState::Sent => {
                    self.deadline = Some(clock.now() + self.timeout);
                    self.state = TransactionState::AwaitingLength(self.expected_len);
                }
                TransactionState::AwaitingLength(n) => {
                    if channel.bytes_to_read()? >= n {
                        self.state = TransactionState::Complete;
                        continue;
                    }
                    // deadline is always recorded on the Sent transition
                    let deadline = self.deadline.unwrap_or_else(|| clock.now());
                    if clock.now() >= deadline {
                        self.state = TransactionState::TimedOut;
                        continue;
                    }
                    clock.sleep(self.loop_delay);
                }
                TransactionState::Complete => {
                    let mut buf = vec![0u8; self.expected_len];
                    channel.read_exact(&mut buf)?;
                    if global_config().fx_dump_frames {
                        log::debug!("[FX recv] {}", hex_dump(&buf));
                    }
                    return Ok(buf);
                }
                TransactionState::TimedOut => {
                    log::warn!(
                        "[FX timeout] expected {} bytes within {:?}",
                        self.expected_len,
                        self.timeout
                    );
                    return Err(FxError::Timeout);
                }
            }
        }
    }
}
