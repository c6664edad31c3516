use crate::ascii;
use crate::error::FxError;

/// Value kinds accepted by the write surface.
///
/// Each variant knows its own byte width and wire encoding, so dispatch
/// happens on a closed sum type instead of runtime type inspection. `Bit` is
/// carried by force frames and never contributes a data field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FxValue {
    Bit(bool),
    Byte(u8),
    UShort(u16),
    UInt(u32),
    Float(f32),
}

impl FxValue {
    /// Raw byte width of the encoded value.
    #[must_use]
    pub const fn byte_width(&self) -> u8 {
        match self {
            Self::Bit(_) | Self::Byte(_) => 1,
            Self::UShort(_) => 2,
            Self::UInt(_) | Self::Float(_) => 4,
        }
    }

    /// Little-endian raw bytes of the value (IEEE-754 layout for floats,
    /// matching the controller's register byte order).
    #[must_use]
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match *self {
            Self::Bit(b) => vec![u8::from(b)],
            Self::Byte(v) => vec![v],
            Self::UShort(v) => v.to_le_bytes().to_vec(),
            Self::UInt(v) => v.to_le_bytes().to_vec(),
            Self::Float(v) => v.to_le_bytes().to_vec(),
        }
    }

    /// Hex-ASCII wire encoding of the value's data field.
    #[must_use]
    pub fn to_ascii_hex(&self) -> Vec<u8> {
        ascii::bytes_to_ascii_hex(&self.to_le_bytes())
    }
}

impl From<bool> for FxValue {
    fn from(v: bool) -> Self {
        Self::Bit(v)
    }
}
impl From<u8> for FxValue {
    fn from(v: u8) -> Self {
        Self::Byte(v)
    }
}
impl From<u16> for FxValue {
    fn from(v: u16) -> Self {
        Self::UShort(v)
    }
}
impl From<u32> for FxValue {
    fn from(v: u32) -> Self {
        Self::UInt(v)
    }
}
impl From<f32> for FxValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

/// Trait for types that can be decoded from the raw bytes of a read
/// response.
///
/// The implementation declares how many bytes one value needs; the client
/// requests exactly that many from the controller.
pub trait FromPlcBytes: Sized {
    /// Number of raw bytes consumed by one value of this type.
    const BYTES: u8;

    fn from_plc_bytes(bytes: &[u8]) -> Result<Self, FxError>;
}

impl FromPlcBytes for u8 {
    const BYTES: u8 = 1;
    fn from_plc_bytes(bytes: &[u8]) -> Result<Self, FxError> {
        bytes
            .first()
            .copied()
            .ok_or_else(|| FxError::InvalidFrame("not enough bytes for u8".into()))
    }
}

impl FromPlcBytes for u16 {
    const BYTES: u8 = 2;
    fn from_plc_bytes(bytes: &[u8]) -> Result<Self, FxError> {
        if bytes.len() < 2 {
            return Err(FxError::InvalidFrame("not enough bytes for u16".into()));
        }
        Ok(Self::from_le_bytes([bytes[0], bytes[1]]))
    }
}

impl FromPlcBytes for u32 {
    const BYTES: u8 = 4;
    fn from_plc_bytes(bytes: &[u8]) -> Result<Self, FxError> {
        if bytes.len() < 4 {
            return Err(FxError::InvalidFrame("not enough bytes for u32".into()));
        }
        Ok(Self::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

impl FromPlcBytes for f32 {
    const BYTES: u8 = 4;
    fn from_plc_bytes(bytes: &[u8]) -> Result<Self, FxError> {
        if bytes.len() < 4 {
            return Err(FxError::InvalidFrame("not enough bytes for f32".into()));
        }
        Ok(Self::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}
