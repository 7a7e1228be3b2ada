use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModemError {
    #[error("payload must be 1..={max} bytes, got {len}")]
    InvalidPayloadSize { len: usize, max: usize },

    #[error("Reed-Solomon decode failure")]
    FecDecodeFailure,

    #[error("length symbol {0} outside protocol bounds")]
    InvalidLengthSymbol(u8),

    #[error("invalid hex input: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("decode pipeline is closed")]
    PipelineClosed,
}

pub type Result<T> = std::result::Result<T, ModemError>;
