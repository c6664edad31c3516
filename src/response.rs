use crate::ascii::{ascii_hex_to_bytes, checksum_ascii};
use crate::error::FxError;
use crate::fx_define::{ACK, ETX, STX};

/// Interpret the single acknowledge byte of a write/force response.
///
/// 0x06 is the controller's success code. Anything else (NAK or garbage) is
/// a rejection, reported as data rather than an error to match the
/// protocol's own encoding of failure.
#[must_use]
pub const fn is_ack(byte: u8) -> bool {
    byte == ACK
}

/// Validate a read response frame and return the decoded payload bytes.
///
/// Layout: STX echo, `len`*2 hex chars, ETX, 2 checksum chars. The checksum
/// covers everything after the STX through the ETX inclusive. Any structural
/// mismatch aborts with `InvalidFrame` before a single byte is decoded, so
/// callers never see a half-decoded value.
pub fn extract_read_payload(frame: &[u8], len: u8) -> Result<Vec<u8>, FxError> {
    let data_chars = usize::from(len) * 2;
    let expected = 1 + data_chars + 1 + 2;
    if frame.len() != expected {
        return Err(FxError::InvalidFrame(format!(
            "read response is {} bytes, expected {expected}",
            frame.len()
        )));
    }
    if frame[0] != STX {
        return Err(FxError::InvalidFrame(format!(
            "read response does not start with STX: 0x{:02X}",
            frame[0]
        )));
    }
    let etx_pos = 1 + data_chars;
    if frame[etx_pos] != ETX {
        return Err(FxError::InvalidFrame(format!(
            "missing ETX at offset {etx_pos}"
        )));
    }
    let ck = checksum_ascii(&frame[1..=etx_pos]);
    if frame[etx_pos + 1..] != ck {
        return Err(FxError::InvalidFrame("response checksum mismatch".into()));
    }
    ascii_hex_to_bytes(&frame[1..etx_pos])
}

#[cfg(test)]
mod tests {
    use super::*;

    // read response carrying data chars "3412" (bytes 34 12)
    const GOOD: [u8; 8] = [0x02, 0x33, 0x34, 0x31, 0x32, 0x03, 0x43, 0x44];

    #[test]
    fn test_ack_byte() {
        assert!(is_ack(0x06));
        assert!(!is_ack(0x15));
        assert!(!is_ack(0x00));
    }

    #[test]
    fn test_extract_payload() {
        let payload = extract_read_payload(&GOOD, 2).expect("extract");
        assert_eq!(payload, vec![0x34, 0x12]);
    }

    #[test]
    fn test_extract_rejects_wrong_length() {
        let err = extract_read_payload(&GOOD[..7], 2).expect_err("short frame");
        assert!(matches!(err, FxError::InvalidFrame(_)));
    }

    #[test]
    fn test_extract_rejects_missing_stx() {
        let mut frame = GOOD;
        frame[0] = 0x00;
        let err = extract_read_payload(&frame, 2).expect_err("no stx");
        assert!(matches!(err, FxError::InvalidFrame(_)));
    }

    #[test]
    fn test_extract_rejects_misplaced_etx() {
        let mut frame = GOOD;
        frame[5] = 0x00;
        let err = extract_read_payload(&frame, 2).expect_err("no etx");
        assert!(matches!(err, FxError::InvalidFrame(_)));
    }

    #[test]
    fn test_extract_rejects_bad_checksum() {
        let mut frame = GOOD;
        frame[7] = b'0';
        let err = extract_read_payload(&frame, 2).expect_err("bad checksum");
        assert!(matches!(err, FxError::InvalidFrame(_)));
    }

    #[test]
    fn test_extract_empty_payload() {
        // zero-length read: STX + ETX + checksum of the lone ETX
        let ck = checksum_ascii(&[0x03]);
        let frame = [0x02, 0x03, ck[0], ck[1]];
        let payload = extract_read_payload(&frame, 0).expect("empty");
        assert!(payload.is_empty());
    }
}
