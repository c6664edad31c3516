//! FX プロトコル定義モジュール
//!
//! FX シリーズ PLC のプログラミングポートプロトコルで使用する定数を提供します。
//! - フレーム制御コード (STX/ETX/ACK/NAK)
//! - 機能コード (読出し / 書込み / 強制ON / 強制OFF)
//! - 応答長の計算ヘルパ

/// フレーム開始コード (STX)
pub const STX: u8 = 0x02;
/// フレーム終了コード (ETX)
pub const ETX: u8 = 0x03;
/// 肯定応答 (ACK) - the controller's success code
pub const ACK: u8 = 0x06;
/// 否定応答 (NAK)
pub const NAK: u8 = 0x15;

/// Function code: read device memory.
pub const CMD_READ: u8 = 0x30;
/// Function code: write device memory.
pub const CMD_WRITE: u8 = 0x31;
/// Function code: force a single bit ON.
pub const CMD_FORCE_ON: u8 = 0x37;
/// Function code: force a single bit OFF.
pub const CMD_FORCE_OFF: u8 = 0x38;

/// Write and force requests are answered with a single ACK/NAK byte.
pub const ACK_RESPONSE_LEN: usize = 1;

/// Response length for a read of `len` bytes:
/// STX echo + two hex chars per byte + ETX + two checksum chars.
#[must_use]
pub const fn read_response_len(len: u8) -> usize {
    1 + (len as usize) * 2 + 1 + 2
}

/// Direction of a single-bit force operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForceAction {
    Set,
    Reset,
}

impl ForceAction {
    #[must_use]
    pub const fn function_code(self) -> u8 {
        match self {
            Self::Set => CMD_FORCE_ON,
            Self::Reset => CMD_FORCE_OFF,
        }
    }
}
