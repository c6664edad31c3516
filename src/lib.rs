#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::doc_markdown
)]

//! melsec_fx
//!
//! melsec_fx は 三菱電機 FX シリーズ PLC とプログラミングポート (RS-422/RS-232)
//! 経由で通信するための Rust ライブラリです。
//!
//! 主な機能:
//! - デバイスアドレス ("D0", "M146", "Y10") の解釈とユニットアドレス変換
//! - ASCII フレームの組立・解析 (STX / 機能コード / チェックサム)
//! - 半二重トランザクション (タイムアウト付きポーリング待ち)
//! - 高レベルな Read/Write 操作 (`FxClient`)、同期/非同期両対応
//! - テスト用のモック PLC (別 crate `melsec_fx_mock`)
//!
//! 使い方の簡単な例:
//! ```no_run
//! use melsec_fx::fx_client::FxClient;
//! use melsec_fx::serial::{self, SerialConfig};
//! # fn main() -> Result<(), melsec_fx::FxError> {
//! let port = serial::open(&SerialConfig::default())?;
//! let client = FxClient::new(port);
//! let value = client.read_u16("D0")?;
//! let ok = client.write("M0", true)?;
//! # let _ = (value, ok);
//! # Ok(())
//! # }
//! ```

pub mod ascii;
pub mod channel;
pub mod config;
pub mod device;
pub mod error;
pub mod fx_client;
pub mod fx_define;
pub mod request;
pub mod response;
pub mod serial;
pub mod transaction;
pub mod value;

pub use error::FxError;
pub use fx_client::FxClient;
pub use value::FxValue;
