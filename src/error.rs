//! Errors raised while coding symbols and typed values.

use thiserror::Error;

/// Errors that may occur when encoding or decoding a Feather payload.
///
/// The codec never retries or recovers: every failure is reported to the immediate caller and
/// any partially decoded state for the message should be discarded.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// A code word ran past the longest representable Fibonacci code without terminating, or its
    /// value does not fit in 64 bits. The stream is corrupt.
    #[error("fibonacci code word exceeds {} bits", crate::MAX_CODE_BITS)]
    CodecOverflow,

    /// A `GrowableBuffer` operation exceeded the buffer bounds.
    #[error("buffer overflow in {operation}: requested {requested}, available {available}")]
    BufferOverflow {
        operation: &'static str,
        requested: usize,
        available: usize,
    },

    /// The options cannot represent a value, or an operation was asked for an impossible layout.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A null value was written while `support_nulls` is disabled.
    #[error("null value written but nulls are not supported")]
    NullNotSupported,

    /// Reached end-of-buffer before the declared number of symbols was read.
    ///
    /// The caller may retry once more bytes are available.
    #[error("unexpected end of buffer")]
    Truncated,

    /// A symbol stream must carry at least one symbol.
    #[error("symbol stream is empty")]
    EmptyStream,

    /// The symbol is larger than `MAX_SYMBOL`.
    #[error("symbol {0} exceeds the maximum codable symbol")]
    SymbolOutOfRange(u64),

    /// The value is below the configured minimum for its type.
    #[error("{kind} value is below the configured minimum")]
    BelowMinimum { kind: &'static str },

    /// The value read is larger than the destination type.
    #[error("decoded value overflows the destination type")]
    Overflow,

    /// A decoded symbol has no meaning for the type being read.
    #[error("symbol {symbol} is not a valid {kind}")]
    InvalidSymbol { kind: &'static str, symbol: u64 },

    /// A null was decoded where the caller required a value.
    #[error("found null where a {kind} value was required")]
    UnexpectedNull { kind: &'static str },

    /// A typed read was attempted after every symbol was consumed.
    #[error("no symbols left to read")]
    Exhausted,
}

impl Error {
    /// Returns true if more input could turn this failure into a successful decode.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Error::Truncated)
    }

    /// Returns true if the input itself is malformed and should be dropped.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::CodecOverflow | Error::InvalidSymbol { .. } | Error::Overflow
        )
    }

    pub(crate) fn buffer_overflow(
        operation: &'static str,
        requested: usize,
        available: usize,
    ) -> Self {
        Error::BufferOverflow {
            operation,
            requested,
            available,
        }
    }
}

/// Type alias for Result with the codec's Error type.
pub type Result<T> = std::result::Result<T, Error>;
