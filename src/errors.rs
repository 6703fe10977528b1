use crate::encoding::EncodingError;
use thiserror::Error;

pub type SchemeResult<T> = Result<T, SchemeError>;

/// Caller-fault precondition failures. The scheme never retries or recovers;
/// every variant means the call must not be repeated as issued.
#[derive(Debug, Error)]
pub enum SchemeError {
    #[error("level {level} is outside the modulus chain (L = {levels})")]
    ExhaustedLevel { level: usize, levels: usize },

    #[error("ciphertext levels differ: {left} vs {right}")]
    LevelMismatch { left: usize, right: usize },

    #[error("target level {to} does not advance past {from}")]
    LevelNotAdvancing { from: usize, to: usize },

    #[error("rotation exponent {log_pow} out of range (log_nh = {log_nh})")]
    InvalidRotation { log_pow: usize, log_nh: usize },

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}
