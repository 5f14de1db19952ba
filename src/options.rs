//! Options shared by the writer and the reader of a payload.

use std::time::{Duration, SystemTime};

use crate::{Error, Result};

/// Controls how typed values are mapped to symbols.
///
/// None of these settings are written to the wire. A payload must be read with options equal to
/// the ones it was written with; a mismatch yields wrong values rather than an error.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncodingOptions {
    /// Reserve symbol 0 of every scalar for null.
    pub support_nulls: bool,
    /// Boolean values, most frequent first. The symbol of a value is its index.
    pub boolean_map: [bool; 2],
    /// Nullable boolean values, most frequent first. Used instead of `boolean_map` when
    /// `support_nulls` is set.
    pub nullable_boolean_map: [Option<bool>; 3],
    /// Smallest integer that can be written, after zigzag mapping for signed types.
    pub unsigned_minimum: u64,
    /// Integer quantization step. Values are rounded down to a multiple of it above the minimum.
    pub integer_accuracy: u64,
    pub datetime_minimum: SystemTime,
    pub datetime_accuracy: Duration,
    pub time_minimum: Duration,
    pub time_accuracy: Duration,
}

impl Default for EncodingOptions {
    fn default() -> Self {
        Self {
            support_nulls: false,
            boolean_map: [false, true],
            nullable_boolean_map: [None, Some(false), Some(true)],
            unsigned_minimum: 0,
            integer_accuracy: 1,
            datetime_minimum: SystemTime::UNIX_EPOCH,
            datetime_accuracy: Duration::from_millis(1),
            time_minimum: Duration::ZERO,
            time_accuracy: Duration::from_millis(1),
        }
    }
}

impl EncodingOptions {
    pub fn with_support_nulls(mut self, support_nulls: bool) -> Self {
        self.support_nulls = support_nulls;
        self
    }

    pub fn with_boolean_map(mut self, boolean_map: [bool; 2]) -> Self {
        self.boolean_map = boolean_map;
        self
    }

    pub fn with_nullable_boolean_map(mut self, nullable_boolean_map: [Option<bool>; 3]) -> Self {
        self.nullable_boolean_map = nullable_boolean_map;
        self
    }

    /// Sets the affine integer range: written values become `(value - minimum) / accuracy`.
    pub fn with_integer_range(mut self, minimum: u64, accuracy: u64) -> Self {
        self.unsigned_minimum = minimum;
        self.integer_accuracy = accuracy;
        self
    }

    pub fn with_datetime_range(mut self, minimum: SystemTime, accuracy: Duration) -> Self {
        self.datetime_minimum = minimum;
        self.datetime_accuracy = accuracy;
        self
    }

    pub fn with_time_range(mut self, minimum: Duration, accuracy: Duration) -> Self {
        self.time_minimum = minimum;
        self.time_accuracy = accuracy;
        self
    }

    /// Checks the quantization steps, which every encoder and decoder requires to be non-zero.
    pub(crate) fn check_accuracy(&self) -> Result<()> {
        if self.integer_accuracy == 0 {
            return Err(Error::Configuration("integer_accuracy must be at least 1".into()));
        }
        if self.datetime_accuracy.is_zero() {
            return Err(Error::Configuration("datetime_accuracy must be non-zero".into()));
        }
        if self.time_accuracy.is_zero() {
            return Err(Error::Configuration("time_accuracy must be non-zero".into()));
        }
        Ok(())
    }

    /// Checks every setting, including that both boolean maps can represent all of their values.
    ///
    /// Encoders only check the accuracies up front; an incomplete boolean map is reported when a
    /// value missing from it is written.
    pub fn validate(&self) -> Result<()> {
        self.check_accuracy()?;
        if !(self.boolean_map.contains(&false) && self.boolean_map.contains(&true)) {
            return Err(Error::Configuration(format!(
                "boolean_map {:?} must contain both values",
                self.boolean_map
            )));
        }
        for value in [None, Some(false), Some(true)] {
            if !self.nullable_boolean_map.contains(&value) {
                return Err(Error::Configuration(format!(
                    "nullable_boolean_map {:?} is missing {:?}",
                    self.nullable_boolean_map, value
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn null_offset(&self) -> u64 {
        u64::from(self.support_nulls)
    }
}
