use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::channel::{Channel, Clock, StdClock};
use crate::config::config as global_config;
use crate::device::DeviceAddress;
use crate::error::FxError;
use crate::fx_define::ForceAction;
use crate::request::FxRequest;
use crate::response::{extract_read_payload, is_ack};
use crate::transaction::Transaction;
use crate::value::{FromPlcBytes, FxValue};

/// High-level client for FX-series PLCs on the serial programming port.
///
/// FxClient はチャネル (通常はシリアルポート) を所有し、デバイスアドレス解決、
/// フレーム組立、半二重トランザクションをまとめた高レベル read/write 操作を
/// 提供します。エラーは `FxError` を返します。
///
/// One client owns one channel. Every operation runs the whole
/// write-wait-read exchange under a single per-channel lock, so concurrent
/// callers (or clones of the client) serialize; the protocol allows exactly
/// one in-flight transaction. Async variants offload the same blocking call
/// onto a worker thread and add no further concurrency semantics.
pub struct FxClient<C: Channel> {
    channel: Arc<Mutex<C>>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
    loop_delay: Duration,
}

impl<C: Channel> Clone for FxClient<C> {
    fn clone(&self) -> Self {
        Self {
            channel: Arc::clone(&self.channel),
            clock: Arc::clone(&self.clock),
            timeout: self.timeout,
            loop_delay: self.loop_delay,
        }
    }
}

impl<C: Channel> FxClient<C> {
    /// Create a client owning `channel`.
    ///
    /// Timeout and poll interval default from the environment config
    /// (`FX_TIMEOUT_MS`, `FX_LOOP_DELAY_MS`).
    #[must_use]
    pub fn new(channel: C) -> Self {
        let cfg = global_config();
        Self {
            channel: Arc::new(Mutex::new(channel)),
            clock: Arc::new(StdClock),
            timeout: Duration::from_millis(cfg.fx_timeout_ms),
            loop_delay: Duration::from_millis(cfg.fx_loop_delay_ms),
        }
    }

    /// Deadline for one whole request/response exchange.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Polling interval while waiting for the response to arrive. Larger
    /// values cost less CPU but add response latency.
    #[must_use]
    pub fn with_loop_delay(mut self, loop_delay: Duration) -> Self {
        self.loop_delay = loop_delay;
        self
    }

    /// Replace the time source (used by tests to drive the wait loop
    /// without real time passing).
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // Execute one request under the channel lock and return the raw
    // response bytes. Concurrent callers on the same channel serialize here.
    fn transact(&self, request: &FxRequest) -> Result<Vec<u8>, FxError> {
        let frame = request.encode();
        let tx = Transaction::new(
            &frame,
            request.response_len(),
            self.timeout,
            self.loop_delay,
        );
        let mut channel = self
            .channel
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        tx.run(&mut *channel, self.clock.as_ref())
    }

    /// Read `len` raw bytes starting at `addr` ("D0", "M146", "X10", ...).
    pub fn read_bytes(&self, addr: &str, len: u8) -> Result<Vec<u8>, FxError> {
        let device = DeviceAddress::parse(addr)?;
        let request = FxRequest::Read {
            unit: device.byte_unit()?,
            len,
        };
        let response = self.transact(&request)?;
        extract_read_payload(&response, len)
    }

    /// Generic typed read; `T` declares how many bytes it needs and how to
    /// decode them.
    pub fn read_value<T: FromPlcBytes>(&self, addr: &str) -> Result<T, FxError> {
        let bytes = self.read_bytes(addr, T::BYTES)?;
        T::from_plc_bytes(&bytes)
    }

    pub fn read_u16(&self, addr: &str) -> Result<u16, FxError> {
        self.read_value(addr)
    }

    pub fn read_u32(&self, addr: &str) -> Result<u32, FxError> {
        self.read_value(addr)
    }

    pub fn read_f32(&self, addr: &str) -> Result<f32, FxError> {
        self.read_value(addr)
    }

    /// Read the single bit behind `addr` (e.g. "M146", "X10").
    ///
    /// Reads the byte containing the point and extracts bit `offset % 8`.
    pub fn read_bool(&self, addr: &str) -> Result<bool, FxError> {
        let device = DeviceAddress::parse(addr)?;
        let request = FxRequest::Read {
            unit: device.byte_unit()?,
            len: 1,
        };
        let response = self.transact(&request)?;
        let payload = extract_read_payload(&response, 1)?;
        let byte = payload
            .first()
            .copied()
            .ok_or_else(|| FxError::InvalidFrame("empty read payload".to_string()))?;
        Ok((byte >> device.bit_index()) & 1 == 1)
    }

    /// Write a typed value.
    ///
    /// Returns the controller's acknowledgement: `true` when the device
    /// accepted the operation (ACK 0x06), `false` when it rejected it —
    /// rejection is data on this protocol, not an error. Bit values are
    /// routed to the force set/reset command.
    pub fn write(&self, addr: &str, value: impl Into<FxValue>) -> Result<bool, FxError> {
        let device = DeviceAddress::parse(addr)?;
        let request = match value.into() {
            FxValue::Bit(on) => FxRequest::Force {
                unit: device.bit_unit()?,
                action: if on {
                    ForceAction::Set
                } else {
                    ForceAction::Reset
                },
            },
            value => FxRequest::Write {
                unit: device.byte_unit()?,
                value,
            },
        };
        let response = self.transact(&request)?;
        let ack = response
            .first()
            .copied()
            .ok_or_else(|| FxError::InvalidFrame("empty acknowledge response".to_string()))?;
        Ok(is_ack(ack))
    }

    /// Force a single bit on or off.
    pub fn write_bool(&self, addr: &str, on: bool) -> Result<bool, FxError> {
        self.write(addr, on)
    }
}

// Async variants: the exchange itself stays blocking; each call is offloaded
// onto the runtime's blocking pool via a clone of the client. Clones share
// the same channel and lock, so async callers serialize like sync ones.
impl<C: Channel + 'static> FxClient<C> {
    async fn run_blocking<T, F>(&self, op: F) -> Result<T, FxError>
    where
        T: Send + 'static,
        F: FnOnce(Self) -> Result<T, FxError> + Send + 'static,
    {
        let client = self.clone();
        tokio::task::spawn_blocking(move || op(client))
            .await
            .map_err(|e| FxError::Io(std::io::Error::other(e)))?
    }

    /// Async variant of [`Self::read_bytes`].
    pub async fn read_bytes_async(&self, addr: &str, len: u8) -> Result<Vec<u8>, FxError> {
        let addr = addr.to_string();
        self.run_blocking(move |c| c.read_bytes(&addr, len)).await
    }

    /// Async variant of [`Self::read_u16`].
    pub async fn read_u16_async(&self, addr: &str) -> Result<u16, FxError> {
        let addr = addr.to_string();
        self.run_blocking(move |c| c.read_u16(&addr)).await
    }

    /// Async variant of [`Self::read_u32`].
    pub async fn read_u32_async(&self, addr: &str) -> Result<u32, FxError> {
        let addr = addr.to_string();
        self.run_blocking(move |c| c.read_u32(&addr)).await
    }

    /// Async variant of [`Self::read_f32`].
    pub async fn read_f32_async(&self, addr: &str) -> Result<f32, FxError> {
        let addr = addr.to_string();
        self.run_blocking(move |c| c.read_f32(&addr)).await
    }

    /// Async variant of [`Self::read_bool`].
    pub async fn read_bool_async(&self, addr: &str) -> Result<bool, FxError> {
        let addr = addr.to_string();
        self.run_blocking(move |c| c.read_bool(&addr)).await
    }

    /// Async variant of [`Self::write`].
    pub async fn write_async(
        &self,
        addr: &str,
        value: impl Into<FxValue>,
    ) -> Result<bool, FxError> {
        let addr = addr.to_string();
        let value = value.into();
        self.run_blocking(move |c| c.write(&addr, value)).await
    }

    /// Async variant of [`Self::write_bool`].
    pub async fn write_bool_async(&self, addr: &str, on: bool) -> Result<bool, FxError> {
        self.write_async(addr, on).await
    }
}
