//! Traits that allow writing/reading symbol streams on `bytes::{BufMut,Buf}`.

use bytes::{Buf, BufMut};

use crate::{decode_symbols, encode_symbols, BitReader, Error, Result};

/// Extension for `buf::BufMut` to write a symbol stream.
pub trait SymbolBufMut {
    /// Writes `symbols` as one byte-aligned stream and returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// - `EmptyStream` if `symbols` is empty.
    /// - `SymbolOutOfRange` if a symbol exceeds `MAX_SYMBOL`.
    /// - `BufferOverflow` if the buffer cannot hold the stream. Nothing is written in that case.
    fn put_symbols(&mut self, symbols: &[u64]) -> Result<usize>;
}

impl<Inner: BufMut> SymbolBufMut for Inner {
    fn put_symbols(&mut self, symbols: &[u64]) -> Result<usize> {
        let bytes = encode_symbols(symbols)?;
        if bytes.used() > self.remaining_mut() {
            return Err(Error::buffer_overflow(
                "put_symbols",
                bytes.used(),
                self.remaining_mut(),
            ));
        }
        self.put_slice(bytes.as_slice());
        Ok(bytes.used())
    }
}

/// Extension for `buf::Buf` to read symbol streams.
pub trait SymbolBuf {
    /// Reads one symbol stream from the buffer. After a successful read, the buffer is advanced
    /// past the stream's final (padded) byte.
    ///
    /// # Examples
    ///
    /// ```
    /// use feather_codec::{SymbolBuf, SymbolBufMut};
    ///
    /// let mut buf: Vec<u8> = vec![];
    /// buf.put_symbols(&[1, 2, 400]).unwrap();
    /// buf.put_symbols(&[0]).unwrap();
    ///
    /// let mut buf = &buf[..];
    /// assert_eq!(buf.get_symbols().unwrap(), vec![1, 2, 400]);
    /// assert_eq!(buf.get_symbols().unwrap(), vec![0]);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `Truncated` if the buffer is empty or ends inside the stream, and `CodecOverflow`
    /// if a code word is malformed. On error the buffer has been advanced over the bytes that
    /// were inspected.
    fn get_symbols(&mut self) -> Result<Vec<u64>>;

    /// Returns an iterator over back-to-back symbol streams in the buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use feather_codec::{SymbolBuf, SymbolBufMut};
    ///
    /// let streams: [Vec<u64>; 3] = [vec![1, 2], vec![30_000], vec![0, 0, 0]];
    /// let mut buf: Vec<u8> = vec![];
    /// for s in streams.iter() {
    ///     buf.put_symbols(s).unwrap();
    /// }
    /// let mut result = vec![];
    /// let mut decode_data = buf.as_slice();
    /// for decoded in decode_data.iter_symbol_streams() {
    ///     result.push(decoded.unwrap());
    /// }
    /// assert_eq!(streams.to_vec(), result);
    /// ```
    ///
    /// The iterator ends after the first error.
    fn iter_symbol_streams(&mut self) -> SymbolStreamIter<'_, Self>
    where
        Self: Sized,
    {
        SymbolStreamIter::new(self)
    }
}

impl<Inner: Buf> SymbolBuf for Inner {
    #[inline]
    fn get_symbols(&mut self) -> Result<Vec<u64>> {
        let mut reader = BitReader::new(self);
        decode_symbols(&mut reader)
    }
}

/// An iterator over symbol streams in a `Buf`.
pub struct SymbolStreamIter<'a, B> {
    buf: &'a mut B,
    failed: bool,
}

impl<'a, B> SymbolStreamIter<'a, B> {
    /// Creates a new `SymbolStreamIter`.
    pub fn new(buf: &'a mut B) -> Self {
        Self { buf, failed: false }
    }
}

impl<'a, B: Buf> Iterator for SymbolStreamIter<'a, B> {
    type Item = Result<Vec<u64>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || !self.buf.has_remaining() {
            return None;
        }
        let result = self.buf.get_symbols();
        self.failed = result.is_err();
        Some(result)
    }
}
