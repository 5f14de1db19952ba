//! Typed writer: maps values to symbols and finally codes them as one symbol stream.

use std::net::IpAddr;
use std::time::{Duration, SystemTime};

use bytes::{BufMut, Bytes};
use tracing::trace;

use crate::{encode_symbols, EncodingOptions, Error, GrowableBuffer, Int, Result, MAX_SYMBOL};

const INITIAL_SYMBOLS: usize = 32;

/// Collects the symbols of one message.
///
/// Values must later be read back in the same order and with the same types and options; the
/// payload carries no field descriptions. An encoder is built per message and consumed by
/// [`finish`](Self::finish). After a write fails the encoder holds a partial value and should be
/// dropped.
#[derive(Debug, Clone)]
pub struct Encoder {
    options: EncodingOptions,
    symbols: GrowableBuffer<u64>,
}

impl Encoder {
    /// Create an encoder.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if any accuracy in `options` is zero.
    pub fn new(options: EncodingOptions) -> Result<Self> {
        Self::with_capacity(options, INITIAL_SYMBOLS)
    }

    /// Create an encoder with room for `symbols` symbols before it has to grow.
    pub fn with_capacity(options: EncodingOptions, symbols: usize) -> Result<Self> {
        options.check_accuracy()?;
        Ok(Self {
            options,
            symbols: GrowableBuffer::new(symbols),
        })
    }

    pub fn options(&self) -> &EncodingOptions {
        &self.options
    }

    /// Number of symbols written so far.
    pub fn symbol_count(&self) -> usize {
        self.symbols.used()
    }

    /// Appends a raw symbol, doubling the symbol buffer when it is full.
    pub fn write_symbol(&mut self, symbol: u64) -> Result<()> {
        if symbol > MAX_SYMBOL {
            return Err(Error::SymbolOutOfRange(symbol));
        }
        if self.symbols.is_full() {
            let capacity = (self.symbols.capacity() * 2).max(INITIAL_SYMBOLS);
            self.symbols = std::mem::take(&mut self.symbols).resize(capacity)?;
        }
        self.symbols.enqueue(symbol)
    }

    fn write_null(&mut self) -> Result<()> {
        if !self.options.support_nulls {
            return Err(Error::NullNotSupported);
        }
        self.write_symbol(0)
    }

    /// Writes a non-null value symbol, shifted past the null symbol when nulls are supported.
    fn write_value(&mut self, value: u64) -> Result<()> {
        let symbol = value
            .checked_add(self.options.null_offset())
            .ok_or(Error::SymbolOutOfRange(value))?;
        self.write_symbol(symbol)
    }

    fn write_quantized(&mut self, elapsed: Duration, accuracy: Duration) -> Result<()> {
        let steps = elapsed.as_nanos() / accuracy.as_nanos();
        let steps = u64::try_from(steps).map_err(|_| Error::Overflow)?;
        self.write_value(steps)
    }

    /// Writes an integer as `(raw - unsigned_minimum) / integer_accuracy`, where `raw` is the
    /// value itself for unsigned types and its zigzag mapping for signed ones.
    ///
    /// # Errors
    ///
    /// Returns `BelowMinimum` if `raw < unsigned_minimum`.
    pub fn write_integer<I: Int>(&mut self, value: I) -> Result<()> {
        let raw = value.to_unsigned_raw();
        let offset = raw
            .checked_sub(self.options.unsigned_minimum)
            .ok_or(Error::BelowMinimum { kind: I::KIND })?;
        self.write_value(offset / self.options.integer_accuracy)
    }

    pub fn write_nullable_integer<I: Int>(&mut self, value: Option<I>) -> Result<()> {
        match value {
            Some(v) => self.write_integer(v),
            None => self.write_null(),
        }
    }

    /// Writes the index of `value` in `boolean_map`.
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        let index = self
            .options
            .boolean_map
            .iter()
            .position(|v| *v == value)
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "{} is missing from boolean_map {:?}",
                    value, self.options.boolean_map
                ))
            })?;
        self.write_symbol(index as u64)
    }

    /// Writes the index of `value` in `nullable_boolean_map`. Without null support the value must
    /// be present and is written with `boolean_map`.
    pub fn write_nullable_bool(&mut self, value: Option<bool>) -> Result<()> {
        if !self.options.support_nulls {
            return self.write_bool(value.ok_or(Error::NullNotSupported)?);
        }
        let index = self
            .options
            .nullable_boolean_map
            .iter()
            .position(|v| *v == value)
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "{:?} is missing from nullable_boolean_map {:?}",
                    value, self.options.nullable_boolean_map
                ))
            })?;
        self.write_symbol(index as u64)
    }

    /// Writes a timestamp as whole `datetime_accuracy` steps since `datetime_minimum`.
    pub fn write_datetime(&mut self, value: SystemTime) -> Result<()> {
        let elapsed = value
            .duration_since(self.options.datetime_minimum)
            .map_err(|_| Error::BelowMinimum { kind: "datetime" })?;
        self.write_quantized(elapsed, self.options.datetime_accuracy)
    }

    pub fn write_nullable_datetime(&mut self, value: Option<SystemTime>) -> Result<()> {
        match value {
            Some(v) => self.write_datetime(v),
            None => self.write_null(),
        }
    }

    /// Writes a duration as whole `time_accuracy` steps above `time_minimum`.
    pub fn write_time(&mut self, value: Duration) -> Result<()> {
        let elapsed = value
            .checked_sub(self.options.time_minimum)
            .ok_or(Error::BelowMinimum { kind: "time" })?;
        self.write_quantized(elapsed, self.options.time_accuracy)
    }

    pub fn write_nullable_time(&mut self, value: Option<Duration>) -> Result<()> {
        match value {
            Some(v) => self.write_time(v),
            None => self.write_null(),
        }
    }

    /// Writes the address length (4 or 16) followed by one symbol per address byte.
    pub fn write_ip_addr(&mut self, value: IpAddr) -> Result<()> {
        match value {
            IpAddr::V4(addr) => self.write_octets(&addr.octets()),
            IpAddr::V6(addr) => self.write_octets(&addr.octets()),
        }
    }

    pub fn write_nullable_ip_addr(&mut self, value: Option<IpAddr>) -> Result<()> {
        match value {
            Some(v) => self.write_ip_addr(v),
            None => self.write_null(),
        }
    }

    fn write_octets(&mut self, octets: &[u8]) -> Result<()> {
        self.write_symbol(octets.len() as u64)?;
        for &octet in octets {
            self.write_symbol(octet.into())?;
        }
        Ok(())
    }

    /// Writes the number of UTF-16 code units followed by one symbol per code unit.
    pub fn write_str(&mut self, value: &str) -> Result<()> {
        let units: Vec<u16> = value.encode_utf16().collect();
        self.write_value(units.len() as u64)?;
        for unit in units {
            self.write_symbol(unit.into())?;
        }
        Ok(())
    }

    pub fn write_nullable_str(&mut self, value: Option<&str>) -> Result<()> {
        match value {
            Some(v) => self.write_str(v),
            None => self.write_null(),
        }
    }

    /// Writes the element count, then each element with `write`.
    ///
    /// The array itself cannot be null; elements follow their own null rules.
    ///
    /// ```
    /// use feather_codec::{Decoder, Encoder, EncodingOptions};
    ///
    /// let mut encoder = Encoder::new(EncodingOptions::default()).unwrap();
    /// encoder.write_array(&[3u16, 1, 4], |e, v| e.write_integer(*v)).unwrap();
    /// let payload = encoder.finish().unwrap();
    ///
    /// let mut decoder = Decoder::new(payload, EncodingOptions::default()).unwrap();
    /// let values = decoder.read_array(|d| d.read_integer::<u16>()).unwrap();
    /// assert_eq!(values, vec![3, 1, 4]);
    /// ```
    pub fn write_array<T, F>(&mut self, items: &[T], mut write: F) -> Result<()>
    where
        F: FnMut(&mut Self, &T) -> Result<()>,
    {
        self.write_symbol(items.len() as u64)?;
        for item in items {
            write(self, item)?;
        }
        Ok(())
    }

    /// Returns the symbols written so far, in order.
    pub fn symbols(&self) -> &[u64] {
        self.symbols.as_slice()
    }

    /// Codes all symbols as one stream.
    ///
    /// # Errors
    ///
    /// Returns `EmptyStream` if nothing was written.
    pub fn finish(self) -> Result<Bytes> {
        let bytes = encode_symbols(self.symbols.as_slice())?;
        trace!(
            symbols = self.symbols.used(),
            bytes = bytes.used(),
            "finished payload"
        );
        Ok(bytes.into_bytes())
    }

    /// Codes all symbols as one stream and appends it to `buf`. Returns the number of bytes
    /// written.
    pub fn finish_into<B: BufMut>(self, buf: &mut B) -> Result<usize> {
        let bytes = self.finish()?;
        buf.put_slice(&bytes);
        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn encoder(options: EncodingOptions) -> Encoder {
        Encoder::new(options).unwrap()
    }

    #[test]
    fn unsigned_symbols() {
        let mut e = encoder(EncodingOptions::default());
        e.write_integer(0u64).unwrap();
        e.write_integer(7u8).unwrap();
        assert_eq!(e.symbols(), &[0, 7]);

        let mut e = encoder(EncodingOptions::default().with_support_nulls(true));
        e.write_integer(0u64).unwrap();
        e.write_nullable_integer::<u32>(None).unwrap();
        assert_eq!(e.symbols(), &[1, 0]);
    }

    #[test]
    fn affine_integer_symbols() {
        let mut e = encoder(EncodingOptions::default().with_integer_range(10, 5));
        e.write_integer(10u32).unwrap();
        e.write_integer(25u32).unwrap();
        e.write_integer(29u32).unwrap();
        assert_eq!(e.symbols(), &[0, 3, 3]);
        assert_eq!(
            e.write_integer(9u32),
            Err(Error::BelowMinimum { kind: "u32" })
        );
    }

    #[test]
    fn signed_symbols_are_zigzagged() {
        let mut e = encoder(EncodingOptions::default());
        for v in [0i32, -1, 1, -2] {
            e.write_integer(v).unwrap();
        }
        assert_eq!(e.symbols(), &[0, 1, 2, 3]);
    }

    #[test]
    fn null_rejected_without_support() {
        let mut e = encoder(EncodingOptions::default());
        assert_eq!(
            e.write_nullable_integer::<u8>(None),
            Err(Error::NullNotSupported)
        );
        assert_eq!(e.write_nullable_bool(None), Err(Error::NullNotSupported));
        assert_eq!(e.write_nullable_str(None), Err(Error::NullNotSupported));
        assert_eq!(e.symbol_count(), 0);
    }

    #[test]
    fn max_value_with_nulls_is_out_of_range() {
        let mut e = encoder(EncodingOptions::default().with_support_nulls(true));
        assert!(matches!(
            e.write_integer(u64::MAX),
            Err(Error::SymbolOutOfRange(_))
        ));
        let mut e = encoder(EncodingOptions::default());
        assert!(matches!(
            e.write_integer(u64::MAX),
            Err(Error::SymbolOutOfRange(_))
        ));
        e.write_integer(u64::MAX - 1).unwrap();
    }

    #[test]
    fn boolean_frequency_maps() {
        let mut e = encoder(EncodingOptions::default().with_boolean_map([true, false]));
        e.write_bool(true).unwrap();
        e.write_bool(false).unwrap();
        assert_eq!(e.symbols(), &[0, 1]);

        let options = EncodingOptions::default()
            .with_support_nulls(true)
            .with_nullable_boolean_map([Some(true), None, Some(false)]);
        let mut e = encoder(options);
        e.write_nullable_bool(None).unwrap();
        e.write_nullable_bool(Some(false)).unwrap();
        e.write_nullable_bool(Some(true)).unwrap();
        assert_eq!(e.symbols(), &[1, 2, 0]);
    }

    #[test]
    fn plain_bool_ignores_null_support() {
        let mut e = encoder(EncodingOptions::default().with_support_nulls(true));
        e.write_bool(true).unwrap();
        e.write_bool(false).unwrap();
        e.write_nullable_bool(Some(true)).unwrap();
        assert_eq!(e.symbols(), &[1, 0, 2]);

        let mut e = encoder(EncodingOptions::default());
        e.write_nullable_bool(Some(true)).unwrap();
        assert_eq!(e.symbols(), &[1]);
    }

    #[test]
    fn boolean_missing_from_map() {
        let mut e = encoder(EncodingOptions::default().with_boolean_map([true, true]));
        assert!(matches!(e.write_bool(false), Err(Error::Configuration(_))));

        let options = EncodingOptions::default()
            .with_support_nulls(true)
            .with_nullable_boolean_map([Some(true), Some(false), Some(false)]);
        let mut e = encoder(options);
        assert!(matches!(
            e.write_nullable_bool(None),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn time_quantization() {
        let options = EncodingOptions::default()
            .with_time_range(Duration::from_secs(10), Duration::from_millis(250));
        let mut e = encoder(options);
        e.write_time(Duration::from_secs(10)).unwrap();
        e.write_time(Duration::from_millis(11_600)).unwrap();
        assert_eq!(e.symbols(), &[0, 6]);
        assert_eq!(
            e.write_time(Duration::from_secs(9)),
            Err(Error::BelowMinimum { kind: "time" })
        );
    }

    #[test]
    fn quantized_steps_past_u64_overflow() {
        let options = EncodingOptions::default().with_time_range(Duration::ZERO, Duration::from_nanos(1));
        let mut e = encoder(options);
        assert_eq!(e.write_time(Duration::MAX), Err(Error::Overflow));
        assert_eq!(e.symbol_count(), 0);
    }

    #[test]
    fn datetime_before_minimum() {
        let mut e = encoder(EncodingOptions::default());
        let before = SystemTime::UNIX_EPOCH - Duration::from_secs(1);
        assert_eq!(
            e.write_datetime(before),
            Err(Error::BelowMinimum { kind: "datetime" })
        );
        e.write_datetime(SystemTime::UNIX_EPOCH + Duration::from_millis(42))
            .unwrap();
        assert_eq!(e.symbols(), &[42]);
    }

    #[test]
    fn address_layout() {
        let mut e = encoder(EncodingOptions::default().with_support_nulls(true));
        e.write_ip_addr(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 255)))
            .unwrap();
        e.write_nullable_ip_addr(None).unwrap();
        assert_eq!(e.symbols(), &[4, 10, 0, 0, 255, 0]);

        let mut e = encoder(EncodingOptions::default());
        e.write_ip_addr(IpAddr::V6(Ipv6Addr::LOCALHOST)).unwrap();
        assert_eq!(e.symbol_count(), 17);
        assert_eq!(e.symbols()[0], 16);
        assert_eq!(e.symbols()[16], 1);
    }

    #[test]
    fn string_layout_uses_utf16_units() {
        let mut e = encoder(EncodingOptions::default().with_support_nulls(true));
        e.write_str("ab").unwrap();
        e.write_str("").unwrap();
        e.write_nullable_str(None).unwrap();
        assert_eq!(e.symbols(), &[3, 97, 98, 1, 0]);

        // U+1F600 is one char but a surrogate pair in UTF-16.
        let mut e = encoder(EncodingOptions::default());
        e.write_str("\u{1F600}").unwrap();
        assert_eq!(e.symbols(), &[2, 0xD83D, 0xDE00]);
    }

    #[test]
    fn array_header_has_no_null_offset() {
        let mut e = encoder(EncodingOptions::default().with_support_nulls(true));
        e.write_array(&[Some(1u8), None], |e, v| e.write_nullable_integer(*v))
            .unwrap();
        assert_eq!(e.symbols(), &[2, 2, 0]);
    }

    #[test]
    fn symbol_buffer_doubles() {
        let mut e = Encoder::with_capacity(EncodingOptions::default(), 1).unwrap();
        for v in 0..1000u32 {
            e.write_integer(v).unwrap();
        }
        assert_eq!(e.symbol_count(), 1000);
        assert!(e.symbols().iter().copied().eq(0..1000));
    }

    #[test]
    fn finish_empty_fails() {
        let e = encoder(EncodingOptions::default());
        assert_eq!(e.finish().unwrap_err(), Error::EmptyStream);
    }

    #[test]
    fn finish_into_appends() {
        let mut e = encoder(EncodingOptions::default());
        e.write_integer(0u8).unwrap();
        let mut out = vec![0xee];
        assert_eq!(e.finish_into(&mut out).unwrap(), 1);
        assert_eq!(out, vec![0xee, 0b1111_0000]);
    }

    #[test]
    fn zero_accuracy_rejected() {
        let options = EncodingOptions::default().with_integer_range(0, 0);
        assert!(matches!(
            Encoder::new(options),
            Err(Error::Configuration(_))
        ));
    }
}
