//! This crate implements the compact value codec used as the payload format of the Feather
//! message-framing protocol.
//!
//! Values are first mapped onto non-negative integer *symbols*, and the symbol list is then
//! written as a [Fibonacci code](https://en.wikipedia.org/wiki/Fibonacci_coding): every symbol
//! becomes the Zeckendorf representation of `symbol + 1`, lowest Fibonacci index first, closed by
//! an extra `1` bit. Zeckendorf representations never contain two adjacent `1` bits, so the pair
//! `11` can only appear at the end of a code word and the stream needs no per-symbol length.
//!
//! A stream is the symbol count minus one followed by each symbol, packed MSB-first with no
//! alignment between code words and zero padding after the last one.
//!
//! The typed layer ([`Encoder`], [`Decoder`]) is driven by [`EncodingOptions`]: optional null
//! support (symbol `0` is reserved for null), affine range compression of integers, timestamps
//! and durations, frequency-ordered boolean maps and [Zigzag](https://en.wikipedia.org/wiki/Variable-length_quantity#Zigzag_encoding)
//! coding of signed integers. Nothing about the options is written to the wire, so reader and
//! writer must agree on them and on the order of the values.
//!
//! ```
//! use feather_codec::{Decoder, Encoder, EncodingOptions};
//!
//! let options = EncodingOptions::default().with_support_nulls(true);
//!
//! let mut encoder = Encoder::new(options.clone()).unwrap();
//! encoder.write_integer(0u32).unwrap();
//! encoder.write_bool(true).unwrap();
//! encoder.write_str("ab").unwrap();
//! let payload = encoder.finish().unwrap();
//!
//! let mut decoder = Decoder::new(payload, options).unwrap();
//! assert_eq!(decoder.read_integer::<u32>().unwrap(), 0);
//! assert!(decoder.read_bool().unwrap());
//! assert_eq!(decoder.read_string().unwrap(), "ab");
//! ```
//!
//! Symbol streams can also be written to any `bytes::BufMut` and read from any `bytes::Buf`:
//!
//! ```
//! use feather_codec::{SymbolBuf, SymbolBufMut};
//!
//! let mut buf_mut: Vec<u8> = vec![];
//! buf_mut.put_symbols(&[0, 1, 400]).unwrap();
//!
//! let mut buf = buf_mut.as_slice();
//! assert_eq!(buf.get_symbols().unwrap(), vec![0, 1, 400]);
//! assert!(buf.is_empty());
//! ```
mod bits;
mod buffer;
mod bytes;
pub(crate) mod core;
mod decoder;
mod encoder;
mod error;
mod io;
mod options;
pub mod raw;
mod stream;

pub use crate::bits::{BitReader, BitWriter};
pub use crate::buffer::GrowableBuffer;
pub use crate::bytes::{SymbolBuf, SymbolBufMut, SymbolStreamIter};
pub use crate::core::{zigzag_decode, zigzag_encode, Int};
pub use crate::decoder::Decoder;
pub use crate::encoder::Encoder;
pub use crate::error::{Error, Result};
pub use crate::io::{read_payload, write_payload};
pub use crate::options::EncodingOptions;
pub use crate::stream::{decode_symbols, encode_symbols};

/// Largest symbol that can be coded. Encoding adds one to every symbol.
pub const MAX_SYMBOL: u64 = u64::MAX - 1;

/// Number of Fibonacci numbers representable in a `u64`.
pub const FIB_LEN: usize = 92;

/// Maximum length in bits of a single code word: one bit per Fibonacci number plus the terminator.
pub const MAX_CODE_BITS: usize = FIB_LEN + 1;
