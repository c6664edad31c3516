use crate::ascii::{checksum_ascii, number_to_ascii_hex};
use crate::fx_define::{
    read_response_len, ForceAction, ACK_RESPONSE_LEN, CMD_READ, CMD_WRITE, ETX, STX,
};
use crate::value::FxValue;

/// One request to the controller.
///
/// `FxRequest` holds the already-resolved unit address, so encoding is a pure
/// function of the variant: identical inputs always produce byte-identical
/// frames. Frames are built once per transaction and discarded after send.
///
/// 例:
/// ```
/// use melsec_fx::request::FxRequest;
/// let frame = FxRequest::Read { unit: 0x1000, len: 2 }.encode();
/// assert_eq!(frame[0], 0x02);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FxRequest {
    /// Read `len` bytes starting at a byte-operation unit address.
    Read { unit: u16, len: u8 },
    /// Write the value's bytes at a byte-operation unit address.
    Write { unit: u16, value: FxValue },
    /// Force a single bit at a bit-operation unit address.
    Force { unit: u16, action: ForceAction },
}

impl FxRequest {
    /// Number of response bytes the controller will produce for this request.
    ///
    /// Writes and forces are acknowledged with a single byte; reads echo the
    /// STX, carry two hex chars per data byte, then ETX and the checksum.
    #[must_use]
    pub const fn response_len(&self) -> usize {
        match self {
            Self::Read { len, .. } => read_response_len(*len),
            Self::Write { .. } | Self::Force { .. } => ACK_RESPONSE_LEN,
        }
    }

    /// Build the complete wire frame including the trailing checksum.
    ///
    /// The checksum covers everything after the STX through the ETX
    /// inclusive. Byte operations render the unit address big-endian; force
    /// operations render it byte-swapped (protocol quirk).
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut frame = Vec::with_capacity(16);
        frame.push(STX);
        match self {
            Self::Read { unit, len } => {
                frame.push(CMD_READ);
                frame.extend_from_slice(&number_to_ascii_hex(u32::from(*unit), 4, false));
                frame.extend_from_slice(&number_to_ascii_hex(u32::from(*len), 2, false));
            }
            Self::Write { unit, value } => {
                frame.push(CMD_WRITE);
                frame.extend_from_slice(&number_to_ascii_hex(u32::from(*unit), 4, false));
                frame.extend_from_slice(&number_to_ascii_hex(
                    u32::from(value.byte_width()),
                    2,
                    false,
                ));
                frame.extend_from_slice(&value.to_ascii_hex());
            }
            Self::Force { unit, action } => {
                frame.push(action.function_code());
                frame.extend_from_slice(&number_to_ascii_hex(u32::from(*unit), 4, true));
            }
        }
        frame.push(ETX);
        let ck = checksum_ascii(&frame[1..]);
        frame.extend_from_slice(&ck);
        frame
    }
}
