//! Adapters between payloads and `std::io` streams.
//!
//! The codec performs no I/O of its own. These helpers only move a payload whose length the
//! caller's framing already knows.
use std::io::{Error as IoError, ErrorKind, Read, Result, Write};

use bytes::Buf;

use crate::{Decoder, Encoder, EncodingOptions, Error, GrowableBuffer};

impl From<Error> for IoError {
    fn from(value: Error) -> Self {
        let kind = match value {
            Error::Truncated => ErrorKind::UnexpectedEof,
            _ => ErrorKind::InvalidData,
        };
        IoError::new(kind, value)
    }
}

/// Finish `encoder` and write the payload to `w`. Returns the number of bytes written.
pub fn write_payload(encoder: Encoder, w: &mut impl Write) -> Result<usize> {
    let payload = encoder.finish()?;
    w.write_all(&payload)?;
    Ok(payload.len())
}

/// Read a `len` byte payload from `r` and decode it.
///
/// The payload must hold exactly one symbol stream; trailing bytes are reported as
/// `InvalidData`.
pub fn read_payload(r: &mut impl Read, len: usize, options: EncodingOptions) -> Result<Decoder> {
    let mut payload = vec![0u8; len];
    r.read_exact(&mut payload)?;
    let mut buffer = GrowableBuffer::from(payload);
    let decoder = Decoder::from_buf(&mut buffer, options)?;
    if buffer.has_remaining() {
        return Err(IoError::new(
            ErrorKind::InvalidData,
            format!("{} trailing bytes after symbol stream", buffer.remaining()),
        ));
    }
    Ok(decoder)
}
