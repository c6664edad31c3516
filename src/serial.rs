//! Serial-port collaborator: line settings plus a thin `open()` wrapper.
//!
//! The protocol engine only ever sees the [`Channel`] trait; everything
//! port-specific (device path, baud rate, parity, framing) stays here. The
//! host application owns opening and closing the port.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serialport::SerialPort;

use crate::channel::Channel;
use crate::error::FxError;

// Port-level read timeout; the engine only reads once enough bytes are
// reported available, so this is a backstop rather than the protocol
// timeout.
const PORT_READ_TIMEOUT_MS: u64 = 1000;

/// Serial line settings for the programming port.
///
/// FX CPUs default to 9600 baud, 7 data bits, even parity, 1 stop bit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Serial port path (e.g. "/dev/ttyUSB0", "COM3")
    pub port: String,
    pub baud_rate: u32,
    /// Data bits (5, 6, 7, 8)
    pub data_bits: u8,
    /// Stop bits (1, 2)
    pub stop_bits: u8,
    /// Parity ("None", "Even", "Odd")
    pub parity: String,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: 9600,
            data_bits: 7,
            stop_bits: 1,
            parity: "Even".to_string(),
        }
    }
}

impl SerialConfig {
    pub fn validate(&self) -> Result<(), FxError> {
        if self.port.is_empty() {
            return Err(FxError::Config("port path cannot be empty".to_string()));
        }
        if self.baud_rate == 0 {
            return Err(FxError::Config(
                "baud rate must be greater than zero".to_string(),
            ));
        }
        parse_data_bits(self.data_bits)?;
        parse_stop_bits(self.stop_bits)?;
        parse_parity(&self.parity)?;
        Ok(())
    }

    /// Parse settings from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, FxError> {
        let cfg: Self =
            toml::from_str(s).map_err(|e| FxError::Config(format!("parse serial config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load settings from a TOML file supplied by the host application.
    pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self, FxError> {
        let s = std::fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

fn parse_data_bits(v: u8) -> Result<serialport::DataBits, FxError> {
    match v {
        5 => Ok(serialport::DataBits::Five),
        6 => Ok(serialport::DataBits::Six),
        7 => Ok(serialport::DataBits::Seven),
        8 => Ok(serialport::DataBits::Eight),
        other => Err(FxError::Config(format!(
            "data bits must be 5, 6, 7 or 8, got {other}"
        ))),
    }
}

fn parse_stop_bits(v: u8) -> Result<serialport::StopBits, FxError> {
    match v {
        1 => Ok(serialport::StopBits::One),
        2 => Ok(serialport::StopBits::Two),
        other => Err(FxError::Config(format!(
            "stop bits must be 1 or 2, got {other}"
        ))),
    }
}

fn parse_parity(s: &str) -> Result<serialport::Parity, FxError> {
    match s {
        "None" => Ok(serialport::Parity::None),
        "Even" => Ok(serialport::Parity::Even),
        "Odd" => Ok(serialport::Parity::Odd),
        other => Err(FxError::Config(format!(
            "parity must be None, Even or Odd, got {other}"
        ))),
    }
}

/// Open the configured port. The returned handle implements [`Channel`] and
/// can be handed straight to [`crate::fx_client::FxClient::new`].
pub fn open(cfg: &SerialConfig) -> Result<Box<dyn SerialPort>, FxError> {
    cfg.validate()?;
    let port = serialport::new(cfg.port.as_str(), cfg.baud_rate)
        .data_bits(parse_data_bits(cfg.data_bits)?)
        .stop_bits(parse_stop_bits(cfg.stop_bits)?)
        .parity(parse_parity(&cfg.parity)?)
        .timeout(Duration::from_millis(PORT_READ_TIMEOUT_MS))
        .open()
        .map_err(|e| FxError::Io(e.into()))?;
    Ok(port)
}

impl Channel for Box<dyn SerialPort> {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), FxError> {
        std::io::Write::write_all(&mut **self, bytes)?;
        std::io::Write::flush(&mut **self)?;
        Ok(())
    }

    fn bytes_to_read(&mut self) -> Result<usize, FxError> {
        let n = SerialPort::bytes_to_read(&**self).map_err(|e| FxError::Io(e.into()))?;
        Ok(n as usize)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), FxError> {
        std::io::Read::read_exact(&mut **self, buf)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_fx_programming_port() {
        let cfg = SerialConfig::default();
        assert_eq!(cfg.baud_rate, 9600);
        assert_eq!(cfg.data_bits, 7);
        assert_eq!(cfg.parity, "Even");
        cfg.validate().expect("default config valid");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut cfg = SerialConfig::default();
        cfg.data_bits = 9;
        assert!(cfg.validate().is_err());

        let mut cfg = SerialConfig::default();
        cfg.parity = "Mark".to_string();
        assert!(cfg.validate().is_err());

        let mut cfg = SerialConfig::default();
        cfg.port = String::new();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_from_toml_str() {
        let cfg = SerialConfig::from_toml_str(
            r#"
port = "/dev/ttyS1"
baud_rate = 19200
data_bits = 8
stop_bits = 1
parity = "None"
"#,
        )
        .expect("parse toml");
        assert_eq!(cfg.port, "/dev/ttyS1");
        assert_eq!(cfg.baud_rate, 19200);
    }

    #[test]
    fn test_from_toml_str_rejects_invalid_settings() {
        let res = SerialConfig::from_toml_str(
            r#"
port = "/dev/ttyS1"
baud_rate = 9600
data_bits = 7
stop_bits = 3
parity = "Even"
"#,
        );
        assert!(matches!(res, Err(FxError::Config(_))));
    }
}
