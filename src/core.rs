/// Base integer trait for the typed codec. Maps every supported integer onto the unsigned
/// domain that the affine options and symbol layer operate on.
///
/// Signed values are zigzag coded so that small magnitudes of either sign stay small.
pub trait Int: Sized + Copy {
    /// Short type name used in error messages.
    const KIND: &'static str;

    fn to_unsigned_raw(self) -> u64;
    /// Returns `None` if `raw` is out of range for `Self`.
    fn from_unsigned_raw(raw: u64) -> Option<Self>;
}

impl Int for u64 {
    const KIND: &'static str = "u64";

    #[inline(always)]
    fn to_unsigned_raw(self) -> u64 {
        self
    }
    #[inline(always)]
    fn from_unsigned_raw(raw: u64) -> Option<Self> {
        Some(raw)
    }
}

/// Maps negative values to positive values, creating a sequence that alternates between negative
/// and positive values: `0, -1, 1, -2, 2, ...` become `0, 1, 2, 3, 4, ...`.
#[inline]
pub fn zigzag_encode(v: i64) -> u64 {
    ((v >> 63) ^ (v << 1)) as u64
}

/// Inverts `zigzag_encode()`.
#[inline]
pub fn zigzag_decode(v: u64) -> i64 {
    (v >> 1) as i64 ^ -(v as i64 & 1)
}

impl Int for i64 {
    const KIND: &'static str = "i64";

    #[inline(always)]
    fn to_unsigned_raw(self) -> u64 {
        zigzag_encode(self)
    }
    #[inline(always)]
    fn from_unsigned_raw(raw: u64) -> Option<Self> {
        Some(zigzag_decode(raw))
    }
}

macro_rules! impl_int {
    ($int:ty, $pint:ty) => {
        impl Int for $int {
            const KIND: &'static str = stringify!($int);

            #[inline(always)]
            fn to_unsigned_raw(self) -> u64 {
                <$pint>::from(self).to_unsigned_raw()
            }
            #[inline(always)]
            fn from_unsigned_raw(raw: u64) -> Option<Self> {
                let v = <$pint>::from_unsigned_raw(raw)?;
                v.try_into().ok()
            }
        }
    };
}
impl_int!(u8, u64);
impl_int!(u16, u64);
impl_int!(u32, u64);
impl_int!(i8, i64);
impl_int!(i16, i64);
impl_int!(i32, i64);
