//! Errors

use thiserror::Error as ThisError;

use crate::Curve;

/// Result with error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by key construction, signing, verification and derivation
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// Private key bytes have the wrong length or the scalar is out of range
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(&'static str),

    /// A public key or signature buffer is structurally malformed
    #[error("invalid encoding: {0}")]
    InvalidEncoding(&'static str),

    /// The curve does not implement the requested operation
    #[error("{operation} is not supported for {curve}")]
    UnsupportedCurveOperation {
        /// Curve the operation was invoked on
        curve: Curve,
        /// Name of the operation
        operation: &'static str,
    },

    /// The derivation stream returned fewer bytes than requested
    #[error("requested {requested} derived bytes, only {available} available")]
    InsufficientDerivedBytes {
        /// Number of bytes asked for
        requested: usize,
        /// Number of bytes the stream produced
        available: usize,
    },

    /// The derivation stream is read-only
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// Seek would move the cursor before the start of the stream
    #[error("seek to a negative position")]
    SeekOutOfRange,

    /// PBKDF2 needs at least one iteration
    #[error("iteration count must be at least 1")]
    InvalidIterations,

    /// The phrase is not a valid BIP-39 mnemonic
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),
}
