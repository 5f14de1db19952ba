//! A fixed-capacity FIFO over a contiguous array, grown only by explicit copy.

use bytes::{Buf, Bytes};

use crate::{Error, Result};

/// A queue view over `storage[start..end]`.
///
/// Values are enqueued at `end` and dequeued from `start`; both cursors only move forward until
/// [`reset`](Self::reset). Capacity never changes in place: [`resize`](Self::resize) consumes the
/// buffer and returns a new one holding the same contents at offset 0.
///
/// # Invariants
/// - `start <= end <= storage.len()`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GrowableBuffer<T> {
    storage: Box<[T]>,
    start: usize,
    end: usize,
}

impl<T: Copy + Default> GrowableBuffer<T> {
    /// Creates an empty buffer able to hold `capacity` values.
    pub fn new(capacity: usize) -> Self {
        Self {
            storage: vec![T::default(); capacity].into_boxed_slice(),
            start: 0,
            end: 0,
        }
    }

    /// Total number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of values waiting to be dequeued.
    #[inline]
    pub fn used(&self) -> usize {
        self.end - self.start
    }

    /// Number of values that can still be enqueued.
    #[inline]
    pub fn available(&self) -> usize {
        self.storage.len() - self.end
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.used() == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.available() == 0
    }

    /// Appends `value`.
    ///
    /// # Errors
    ///
    /// Returns `BufferOverflow` if no slot is available.
    #[inline]
    pub fn enqueue(&mut self, value: T) -> Result<()> {
        if self.end == self.storage.len() {
            return Err(Error::buffer_overflow("enqueue", 1, 0));
        }
        self.storage[self.end] = value;
        self.end += 1;
        Ok(())
    }

    /// Appends every value of `values`, or nothing if they do not all fit.
    pub fn enqueue_all(&mut self, values: &[T]) -> Result<()> {
        if values.len() > self.available() {
            return Err(Error::buffer_overflow(
                "enqueue_all",
                values.len(),
                self.available(),
            ));
        }
        self.storage[self.end..self.end + values.len()].copy_from_slice(values);
        self.end += values.len();
        Ok(())
    }

    /// Removes and returns the oldest value.
    ///
    /// # Errors
    ///
    /// Returns `BufferOverflow` if the buffer is empty.
    #[inline]
    pub fn dequeue(&mut self) -> Result<T> {
        self.try_dequeue()
            .ok_or_else(|| Error::buffer_overflow("dequeue", 1, 0))
    }

    #[inline]
    pub fn try_dequeue(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        let value = self.storage[self.start];
        self.start += 1;
        Some(value)
    }

    /// Returns the oldest value without removing it.
    #[inline]
    pub fn peek(&self) -> Result<T> {
        self.peek_at(0)
    }

    /// Returns the value `pos` places after the oldest one without removing anything.
    pub fn peek_at(&self, pos: usize) -> Result<T> {
        self.try_peek_at(pos)
            .ok_or_else(|| Error::buffer_overflow("peek", pos + 1, self.used()))
    }

    #[inline]
    pub fn try_peek(&self) -> Option<T> {
        self.try_peek_at(0)
    }

    #[inline]
    fn try_peek_at(&self, pos: usize) -> Option<T> {
        if pos < self.used() {
            Some(self.storage[self.start + pos])
        } else {
            None
        }
    }

    /// Moves the occupied range into a new buffer of `new_capacity` slots, starting at offset 0.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if `new_capacity` cannot hold the values currently enqueued.
    pub fn resize(self, new_capacity: usize) -> Result<Self> {
        if new_capacity < self.used() {
            return Err(Error::Configuration(format!(
                "cannot resize buffer holding {} values to capacity {}",
                self.used(),
                new_capacity
            )));
        }
        let mut resized = Self::new(new_capacity);
        resized.storage[..self.used()].copy_from_slice(self.as_slice());
        resized.end = self.used();
        Ok(resized)
    }

    /// Drops all contents and rewinds both cursors.
    pub fn reset(&mut self) {
        self.start = 0;
        self.end = 0;
    }

    /// The occupied range, oldest value first.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.storage[self.start..self.end]
    }

    /// Copies the occupied range out of the buffer.
    pub fn to_vec(&self) -> Vec<T> {
        self.as_slice().to_vec()
    }
}

impl<T> From<Vec<T>> for GrowableBuffer<T> {
    /// Wraps `values` as a full buffer.
    fn from(values: Vec<T>) -> Self {
        let end = values.len();
        Self {
            storage: values.into_boxed_slice(),
            start: 0,
            end,
        }
    }
}

impl GrowableBuffer<u8> {
    /// Converts the occupied range into `Bytes` without copying when nothing was dequeued.
    pub fn into_bytes(self) -> Bytes {
        let mut bytes = Bytes::from(Vec::from(self.storage));
        bytes.truncate(self.end);
        bytes.advance(self.start);
        bytes
    }
}

/// Reading from a byte buffer dequeues.
impl Buf for GrowableBuffer<u8> {
    #[inline]
    fn remaining(&self) -> usize {
        self.used()
    }

    #[inline]
    fn chunk(&self) -> &[u8] {
        self.as_slice()
    }

    fn advance(&mut self, cnt: usize) {
        assert!(
            cnt <= self.used(),
            "cannot advance past end of buffer: {} > {}",
            cnt,
            self.used()
        );
        self.start += cnt;
    }
}
