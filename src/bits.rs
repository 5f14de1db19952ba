//! Sub-byte cursors for writing and reading code words MSB-first.
//!
//! Bit 0 of a byte is its most significant bit. A cursor tracks the current byte and a bit
//! offset in `[0, 8]`; offset 8 means the byte is used up and the next one must be stored (when
//! writing) or loaded (when reading).
//!
//! # Padding Rules
//! - BitWriter: pads the final partial byte with zero bits
//! - BitReader: `align()` discards the rest of the current byte

use bytes::Buf;

use crate::{Error, GrowableBuffer, Result};

const MIN_CAPACITY: usize = 16;

/// Writes bits MSB-first into a [`GrowableBuffer<u8>`], doubling its capacity when full.
#[derive(Debug, Clone)]
pub struct BitWriter {
    bytes: GrowableBuffer<u8>,
    /// Partial byte, filled from the most significant bit down.
    current: u8,
    /// Number of bits in `current` (0-7 between calls).
    bit_offset: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::with_capacity(MIN_CAPACITY)
    }

    /// Create a writer whose buffer initially holds `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: GrowableBuffer::new(capacity),
            current: 0,
            bit_offset: 0,
        }
    }

    /// Write a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        if bit {
            self.current |= 0x80 >> self.bit_offset;
        }
        self.bit_offset += 1;
        if self.bit_offset == 8 {
            self.store_current()?;
        }
        Ok(())
    }

    /// Pad the current partial byte with zero bits so the next bit starts a new byte.
    pub fn align(&mut self) -> Result<()> {
        if self.bit_offset > 0 {
            self.store_current()?;
        }
        Ok(())
    }

    /// Pad to a byte boundary and return the written bytes.
    pub fn finish(mut self) -> Result<GrowableBuffer<u8>> {
        self.align()?;
        Ok(self.bytes)
    }

    /// Return the total number of bits written (including the partial byte).
    pub fn bit_len(&self) -> usize {
        self.bytes.used() * 8 + self.bit_offset as usize
    }

    /// Return the number of complete bytes written so far.
    pub fn byte_len(&self) -> usize {
        self.bytes.used()
    }

    fn store_current(&mut self) -> Result<()> {
        if self.bytes.is_full() {
            let capacity = (self.bytes.capacity() * 2).max(MIN_CAPACITY);
            self.bytes = std::mem::take(&mut self.bytes).resize(capacity)?;
        }
        self.bytes.enqueue(self.current)?;
        self.current = 0;
        self.bit_offset = 0;
        Ok(())
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads bits MSB-first from any `bytes::Buf`, pulling one byte at a time.
///
/// The source is only advanced past bytes whose bits have been (at least partly) read, so after
/// [`align`](Self::align) it sits exactly at the next unread byte.
#[derive(Debug, Clone)]
pub struct BitReader<B> {
    src: B,
    current: u8,
    /// Bits of `current` already consumed; 8 when a new byte must be loaded.
    bit_offset: u8,
    bits_read: usize,
}

impl<B: Buf> BitReader<B> {
    pub fn new(src: B) -> Self {
        Self {
            src,
            current: 0,
            bit_offset: 8,
            bits_read: 0,
        }
    }

    /// Read a single bit.
    ///
    /// # Errors
    ///
    /// Returns `Truncated` if a new byte is needed and the source is empty.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.bit_offset == 8 {
            if !self.src.has_remaining() {
                return Err(Error::Truncated);
            }
            self.current = self.src.get_u8();
            self.bit_offset = 0;
        }
        let bit = self.current & (0x80 >> self.bit_offset) != 0;
        self.bit_offset += 1;
        self.bits_read += 1;
        Ok(bit)
    }

    /// Skip the remaining bits of the current byte.
    pub fn align(&mut self) {
        if self.bit_offset < 8 {
            self.bits_read += (8 - self.bit_offset) as usize;
            self.bit_offset = 8;
        }
    }

    /// Return the number of bits consumed, including skipped padding.
    pub fn bits_read(&self) -> usize {
        self.bits_read
    }

    /// Return an upper bound on the bits left: the unread part of the current byte plus the
    /// remaining source bytes.
    pub fn bits_remaining(&self) -> usize {
        (8 - self.bit_offset as usize) + self.src.remaining() * 8
    }

    pub fn get_ref(&self) -> &B {
        &self.src
    }

    /// Return the source, positioned after the last byte touched.
    pub fn into_inner(self) -> B {
        self.src
    }
}
