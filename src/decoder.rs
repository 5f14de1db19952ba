//! Typed reader over a fully decoded symbol stream.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::{Duration, SystemTime};

use bytes::Buf;
use tracing::trace;

use crate::{decode_symbols, BitReader, EncodingOptions, Error, GrowableBuffer, Int, Result};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Reads the values of one message in the order they were written.
///
/// The whole symbol stream is decoded when the decoder is built; typed reads then consume
/// symbols left to right. Reading a type other than the one written is not detected and yields
/// meaningless values, or an error when the symbols fall outside the type's domain.
#[derive(Debug, Clone)]
pub struct Decoder {
    options: EncodingOptions,
    symbols: GrowableBuffer<u64>,
}

impl Decoder {
    /// Decode one symbol stream from `src`.
    ///
    /// # Errors
    ///
    /// - `Truncated` if `src` ends before the declared number of symbols.
    /// - `CodecOverflow` if the stream is malformed.
    /// - `Configuration` if any accuracy in `options` is zero.
    pub fn new<B: Buf>(mut src: B, options: EncodingOptions) -> Result<Self> {
        Self::from_buf(&mut src, options)
    }

    /// Decode one symbol stream from `src`, leaving it positioned at the byte after the stream.
    pub fn from_buf<B: Buf>(src: &mut B, options: EncodingOptions) -> Result<Self> {
        options.check_accuracy()?;
        let mut reader = BitReader::new(src);
        let symbols = decode_symbols(&mut reader)?;
        Self::from_symbols(symbols, options)
    }

    /// Wrap symbols that were decoded elsewhere.
    pub fn from_symbols(symbols: Vec<u64>, options: EncodingOptions) -> Result<Self> {
        options.check_accuracy()?;
        trace!(symbols = symbols.len(), "created decoder");
        Ok(Self {
            options,
            symbols: GrowableBuffer::from(symbols),
        })
    }

    pub fn options(&self) -> &EncodingOptions {
        &self.options
    }

    /// Number of symbols not yet read.
    pub fn remaining(&self) -> usize {
        self.symbols.used()
    }

    pub fn is_finished(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Reads the next raw symbol.
    ///
    /// # Errors
    ///
    /// Returns `Exhausted` if every symbol has been read.
    pub fn read_symbol(&mut self) -> Result<u64> {
        self.symbols.try_dequeue().ok_or(Error::Exhausted)
    }

    /// Reads a value symbol, undoing the null shift. `None` means null.
    fn read_value(&mut self) -> Result<Option<u64>> {
        let symbol = self.read_symbol()?;
        if !self.options.support_nulls {
            Ok(Some(symbol))
        } else if symbol == 0 {
            Ok(None)
        } else {
            Ok(Some(symbol - 1))
        }
    }

    fn read_count(&mut self) -> Result<usize> {
        usize::try_from(self.read_symbol()?).map_err(|_| Error::Overflow)
    }

    fn dequantize(steps: u64, accuracy: Duration) -> Result<Duration> {
        let nanos = u128::from(steps)
            .checked_mul(accuracy.as_nanos())
            .ok_or(Error::Overflow)?;
        let secs = u64::try_from(nanos / NANOS_PER_SEC).map_err(|_| Error::Overflow)?;
        Ok(Duration::new(secs, (nanos % NANOS_PER_SEC) as u32))
    }

    /// Reads an integer written by `Encoder::write_integer`.
    ///
    /// # Errors
    ///
    /// - `UnexpectedNull` if a null was written.
    /// - `Overflow` if the value does not fit `I`.
    pub fn read_integer<I: Int>(&mut self) -> Result<I> {
        self.read_nullable_integer()?
            .ok_or(Error::UnexpectedNull { kind: I::KIND })
    }

    pub fn read_nullable_integer<I: Int>(&mut self) -> Result<Option<I>> {
        let Some(steps) = self.read_value()? else {
            return Ok(None);
        };
        let raw = steps
            .checked_mul(self.options.integer_accuracy)
            .and_then(|v| v.checked_add(self.options.unsigned_minimum))
            .ok_or(Error::Overflow)?;
        I::from_unsigned_raw(raw).map(Some).ok_or(Error::Overflow)
    }

    /// Reads a boolean as its index in `boolean_map`.
    pub fn read_bool(&mut self) -> Result<bool> {
        let symbol = self.read_symbol()?;
        usize::try_from(symbol)
            .ok()
            .and_then(|i| self.options.boolean_map.get(i).copied())
            .ok_or(Error::InvalidSymbol {
                kind: "boolean",
                symbol,
            })
    }

    /// Reads a boolean as its index in `nullable_boolean_map`, or in `boolean_map` when nulls are
    /// not supported.
    pub fn read_nullable_bool(&mut self) -> Result<Option<bool>> {
        if !self.options.support_nulls {
            return self.read_bool().map(Some);
        }
        let symbol = self.read_symbol()?;
        usize::try_from(symbol)
            .ok()
            .and_then(|i| self.options.nullable_boolean_map.get(i).copied())
            .ok_or(Error::InvalidSymbol {
                kind: "boolean",
                symbol,
            })
    }

    pub fn read_datetime(&mut self) -> Result<SystemTime> {
        self.read_nullable_datetime()?
            .ok_or(Error::UnexpectedNull { kind: "datetime" })
    }

    pub fn read_nullable_datetime(&mut self) -> Result<Option<SystemTime>> {
        let Some(steps) = self.read_value()? else {
            return Ok(None);
        };
        let elapsed = Self::dequantize(steps, self.options.datetime_accuracy)?;
        self.options
            .datetime_minimum
            .checked_add(elapsed)
            .map(Some)
            .ok_or(Error::Overflow)
    }

    pub fn read_time(&mut self) -> Result<Duration> {
        self.read_nullable_time()?
            .ok_or(Error::UnexpectedNull { kind: "time" })
    }

    pub fn read_nullable_time(&mut self) -> Result<Option<Duration>> {
        let Some(steps) = self.read_value()? else {
            return Ok(None);
        };
        let elapsed = Self::dequantize(steps, self.options.time_accuracy)?;
        self.options
            .time_minimum
            .checked_add(elapsed)
            .map(Some)
            .ok_or(Error::Overflow)
    }

    pub fn read_ip_addr(&mut self) -> Result<IpAddr> {
        self.read_nullable_ip_addr()?
            .ok_or(Error::UnexpectedNull { kind: "address" })
    }

    pub fn read_nullable_ip_addr(&mut self) -> Result<Option<IpAddr>> {
        match self.read_symbol()? {
            0 if self.options.support_nulls => Ok(None),
            4 => {
                let mut octets = [0u8; 4];
                self.read_octets(&mut octets)?;
                Ok(Some(IpAddr::V4(Ipv4Addr::from(octets))))
            }
            16 => {
                let mut octets = [0u8; 16];
                self.read_octets(&mut octets)?;
                Ok(Some(IpAddr::V6(Ipv6Addr::from(octets))))
            }
            symbol => Err(Error::InvalidSymbol {
                kind: "address length",
                symbol,
            }),
        }
    }

    fn read_octets(&mut self, octets: &mut [u8]) -> Result<()> {
        for octet in octets.iter_mut() {
            let symbol = self.read_symbol()?;
            *octet = u8::try_from(symbol).map_err(|_| Error::InvalidSymbol {
                kind: "address byte",
                symbol,
            })?;
        }
        Ok(())
    }

    pub fn read_string(&mut self) -> Result<String> {
        self.read_nullable_string()?
            .ok_or(Error::UnexpectedNull { kind: "string" })
    }

    /// Reads a string written as UTF-16 code units.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSymbol` if a unit is above `u16::MAX` or the units are not valid UTF-16.
    pub fn read_nullable_string(&mut self) -> Result<Option<String>> {
        let Some(len) = self.read_value()? else {
            return Ok(None);
        };
        let len = usize::try_from(len).map_err(|_| Error::Overflow)?;
        let mut units = Vec::with_capacity(len.min(self.remaining()));
        for _ in 0..len {
            let symbol = self.read_symbol()?;
            units.push(u16::try_from(symbol).map_err(|_| Error::InvalidSymbol {
                kind: "UTF-16 code unit",
                symbol,
            })?);
        }
        String::from_utf16(&units)
            .map(Some)
            .map_err(|_| Error::InvalidSymbol {
                kind: "UTF-16 string",
                symbol: len as u64,
            })
    }

    /// Reads the element count, then each element with `read`.
    pub fn read_array<T, F>(&mut self, mut read: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let count = self.read_count()?;
        // Every element takes at least one symbol.
        let mut items = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            items.push(read(self)?);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoder(symbols: &[u64], options: EncodingOptions) -> Decoder {
        Decoder::from_symbols(symbols.to_vec(), options).unwrap()
    }

    #[test]
    fn read_past_end_is_exhausted() {
        let mut d = decoder(&[5], EncodingOptions::default());
        assert_eq!(d.read_integer::<u8>().unwrap(), 5);
        assert!(d.is_finished());
        assert_eq!(d.read_integer::<u8>(), Err(Error::Exhausted));
    }

    #[test]
    fn affine_integers() {
        let options = EncodingOptions::default().with_integer_range(10, 5);
        let mut d = decoder(&[0, 3], options);
        assert_eq!(d.read_integer::<u64>().unwrap(), 10);
        assert_eq!(d.read_integer::<u64>().unwrap(), 25);
    }

    #[test]
    fn narrowing_overflows() {
        let mut d = decoder(&[256, 3], EncodingOptions::default());
        assert_eq!(d.read_integer::<u8>(), Err(Error::Overflow));
        assert_eq!(d.read_integer::<i8>().unwrap(), -2);
    }

    #[test]
    fn affine_overflow() {
        let options = EncodingOptions::default().with_integer_range(1, 2);
        let mut d = decoder(&[u64::MAX / 2 + 1], options);
        assert_eq!(d.read_integer::<u64>(), Err(Error::Overflow));
    }

    #[test]
    fn null_where_value_required() {
        let options = EncodingOptions::default().with_support_nulls(true);
        let mut d = decoder(&[0, 0, 0], options);
        assert_eq!(
            d.read_integer::<u32>(),
            Err(Error::UnexpectedNull { kind: "u32" })
        );
        assert_eq!(
            d.read_string(),
            Err(Error::UnexpectedNull { kind: "string" })
        );
        assert_eq!(
            d.read_ip_addr(),
            Err(Error::UnexpectedNull { kind: "address" })
        );
    }

    #[test]
    fn boolean_index_outside_map() {
        let mut d = decoder(&[2], EncodingOptions::default());
        assert_eq!(
            d.read_bool(),
            Err(Error::InvalidSymbol {
                kind: "boolean",
                symbol: 2
            })
        );
    }

    #[test]
    fn bad_address_length() {
        let mut d = decoder(&[0, 5], EncodingOptions::default());
        assert!(matches!(
            d.read_ip_addr(),
            Err(Error::InvalidSymbol { symbol: 0, .. })
        ));
        assert!(matches!(
            d.read_ip_addr(),
            Err(Error::InvalidSymbol { symbol: 5, .. })
        ));
    }

    #[test]
    fn bad_address_byte() {
        let mut d = decoder(&[4, 1, 2, 300, 4], EncodingOptions::default());
        assert!(matches!(
            d.read_ip_addr(),
            Err(Error::InvalidSymbol {
                kind: "address byte",
                symbol: 300
            })
        ));
    }

    #[test]
    fn lone_surrogate_is_invalid() {
        let mut d = decoder(&[1, 0xD800], EncodingOptions::default());
        assert!(matches!(
            d.read_string(),
            Err(Error::InvalidSymbol {
                kind: "UTF-16 string",
                ..
            })
        ));
    }

    #[test]
    fn string_unit_above_u16() {
        let mut d = decoder(&[1, 0x1_0000], EncodingOptions::default());
        assert!(matches!(
            d.read_string(),
            Err(Error::InvalidSymbol {
                kind: "UTF-16 code unit",
                ..
            })
        ));
    }

    #[test]
    fn lying_array_count_is_exhausted() {
        let mut d = decoder(&[u64::MAX - 1, 1, 2], EncodingOptions::default());
        assert_eq!(
            d.read_array(|d| d.read_integer::<u8>()),
            Err(Error::Exhausted)
        );
    }

    #[test]
    fn dequantize_time() {
        let options =
            EncodingOptions::default().with_time_range(Duration::from_secs(1), Duration::from_nanos(3));
        let mut d = decoder(&[1_000_000_001], options);
        assert_eq!(
            d.read_time().unwrap(),
            Duration::from_secs(1) + Duration::from_nanos(3_000_000_003)
        );
    }

    #[test]
    fn dequantize_past_u128_overflows() {
        let options = EncodingOptions::default()
            .with_time_range(Duration::ZERO, Duration::from_secs(1 << 40));
        let mut d = decoder(&[crate::MAX_SYMBOL], options.clone());
        assert_eq!(d.read_time(), Err(Error::Overflow));

        let options = options.with_datetime_range(SystemTime::UNIX_EPOCH, Duration::from_secs(1 << 40));
        let mut d = decoder(&[crate::MAX_SYMBOL], options);
        assert_eq!(d.read_datetime(), Err(Error::Overflow));
    }

    #[test]
    fn booleans_use_the_map_of_the_call() {
        let options = EncodingOptions::default().with_support_nulls(true);
        let mut d = decoder(&[1, 0, 0, 2], options);
        assert!(d.read_bool().unwrap());
        assert!(!d.read_bool().unwrap());
        assert_eq!(d.read_nullable_bool().unwrap(), None);
        assert_eq!(d.read_nullable_bool().unwrap(), Some(true));

        let mut d = decoder(&[1, 2], EncodingOptions::default());
        assert_eq!(d.read_nullable_bool().unwrap(), Some(true));
        assert!(matches!(
            d.read_nullable_bool(),
            Err(Error::InvalidSymbol { symbol: 2, .. })
        ));
    }
}
