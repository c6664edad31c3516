use thiserror::Error;

#[derive(Error, Debug)]
pub enum FxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("timeout")]
    Timeout,

    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
    #[error("invalid frame: {0}")]
    InvalidFrame(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}
