//! Symbol streams: a count code word followed by one code word per symbol, zero padded to a byte.

use bytes::Buf;
use tracing::{debug, trace};

use crate::{raw, BitReader, BitWriter, Error, GrowableBuffer, Result};

/// Writes `symbols` as a stream starting at the writer's current bit and pads the last byte.
///
/// # Errors
///
/// - `EmptyStream` if `symbols` is empty.
/// - `SymbolOutOfRange` if any symbol exceeds `MAX_SYMBOL`. Output written before the offending
///   symbol is left in the writer.
pub fn write_symbols(symbols: &[u64], writer: &mut BitWriter) -> Result<()> {
    if symbols.is_empty() {
        return Err(Error::EmptyStream);
    }
    raw::encode(symbols.len() as u64 - 1, writer)?;
    for &symbol in symbols {
        raw::encode(symbol, writer)?;
    }
    writer.align()
}

/// Encodes `symbols` into a buffer sized to fit the whole stream.
pub fn encode_symbols(symbols: &[u64]) -> Result<GrowableBuffer<u8>> {
    if symbols.is_empty() {
        return Err(Error::EmptyStream);
    }
    let mut bits = raw::encoded_len(symbols.len() as u64 - 1)?;
    for &symbol in symbols {
        bits += raw::encoded_len(symbol)?;
    }
    let mut writer = BitWriter::with_capacity((bits + 7) / 8);
    write_symbols(symbols, &mut writer)?;
    trace!(
        symbols = symbols.len(),
        bytes = writer.byte_len(),
        "encoded symbol stream"
    );
    writer.finish()
}

/// Decodes one stream, starting at a byte boundary, and leaves `reader` at the next byte boundary.
///
/// # Errors
///
/// - `Truncated` if the source ends before the declared number of symbols.
/// - `CodecOverflow` if a code word is malformed.
pub fn decode_symbols<B: Buf>(reader: &mut BitReader<B>) -> Result<Vec<u64>> {
    let result = decode_symbols_inner(reader);
    match &result {
        Ok(symbols) => trace!(
            symbols = symbols.len(),
            bits = reader.bits_read(),
            "decoded symbol stream"
        ),
        Err(err) => debug!(error = %err, bits = reader.bits_read(), "symbol stream decode failed"),
    }
    result
}

fn decode_symbols_inner<B: Buf>(reader: &mut BitReader<B>) -> Result<Vec<u64>> {
    let count = raw::decode(reader)? + 1;
    let count = usize::try_from(count).map_err(|_| Error::CodecOverflow)?;
    // Every code word takes at least two bits, which bounds what a lying count can allocate.
    let mut symbols = Vec::with_capacity(count.min(reader.bits_remaining() / 2));
    for _ in 0..count {
        symbols.push(raw::decode(reader)?);
    }
    reader.align();
    Ok(symbols)
}
