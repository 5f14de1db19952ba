//! Routines for coding single raw (u64) symbols as Fibonacci code words.
//!
//! Typed values are turned into symbols by the encoder; this module only knows about symbols.

use bytes::Buf;

use crate::{BitReader, BitWriter, Error, Result, FIB_LEN, MAX_SYMBOL};

const fn compute_fib_table() -> [u64; FIB_LEN] {
    let mut tbl = [0u64; FIB_LEN];
    tbl[0] = 1;
    tbl[1] = 2;
    let mut i = 2;
    while i < tbl.len() {
        tbl[i] = tbl[i - 1] + tbl[i - 2];
        i += 1;
    }
    tbl
}

/// `FIB[0] = 1, FIB[1] = 2, FIB[i] = FIB[i - 1] + FIB[i - 2]`, the largest prefix that fits a `u64`.
pub const FIB: [u64; FIB_LEN] = compute_fib_table();

/// Returns the Zeckendorf representation of `value` (which must be non-zero) as a bit set over
/// Fibonacci indices, plus the highest index used.
#[inline]
fn zeckendorf(mut value: u64) -> (u128, usize) {
    debug_assert!(value > 0);
    // The largest term is the largest Fibonacci number not above value.
    let highest = FIB.partition_point(|&f| f <= value) - 1;
    let mut word = 0u128;
    let mut i = highest + 1;
    while value > 0 {
        i -= 1;
        if FIB[i] <= value {
            value -= FIB[i];
            word |= 1u128 << i;
        }
    }
    (word, highest)
}

/// Return the number of bits required to encode `symbol`, in `[2, MAX_CODE_BITS]`.
///
/// # Errors
///
/// Returns `SymbolOutOfRange` if `symbol > MAX_SYMBOL`.
pub fn encoded_len(symbol: u64) -> Result<usize> {
    if symbol > MAX_SYMBOL {
        return Err(Error::SymbolOutOfRange(symbol));
    }
    Ok(FIB.partition_point(|&f| f <= symbol + 1) + 1)
}

/// Writes the code word for `symbol`: one bit per Fibonacci index from 0 up to the highest index
/// used, then a terminating `1`.
///
/// # Errors
///
/// Returns `SymbolOutOfRange` if `symbol > MAX_SYMBOL`.
pub fn encode(symbol: u64, writer: &mut BitWriter) -> Result<()> {
    if symbol > MAX_SYMBOL {
        return Err(Error::SymbolOutOfRange(symbol));
    }
    let (word, highest) = zeckendorf(symbol + 1);
    for i in 0..=highest {
        writer.write_bit(word & (1u128 << i) != 0)?;
    }
    writer.write_bit(true)
}

/// Reads one code word and returns its symbol.
///
/// # Errors
///
/// - `Truncated` if the reader runs out of bytes inside the code word.
/// - `CodecOverflow` if no terminator appears within `MAX_CODE_BITS` bits or the value does not
///   fit in a `u64`.
pub fn decode<B: Buf>(reader: &mut BitReader<B>) -> Result<u64> {
    let mut value = 0u64;
    let mut prev = false;
    let mut index = 0;
    loop {
        let bit = reader.read_bit()?;
        if bit && prev {
            // A terminator always follows a set bit, so value >= 1.
            return Ok(value - 1);
        }
        if index >= FIB_LEN {
            return Err(Error::CodecOverflow);
        }
        if bit {
            value = value.checked_add(FIB[index]).ok_or(Error::CodecOverflow)?;
        }
        prev = bit;
        index += 1;
    }
}
