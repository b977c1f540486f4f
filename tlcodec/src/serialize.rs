//! Writing side of the codec: [`Serializable`] plus the primitive encoders.
//!
//! Layouts are the ones documented under [binary serialization].
//!
//! [binary serialization]: https://core.telegram.org/mtproto/serialize

use crate::deserialize::padding;
use crate::{BOOL_FALSE_ID, BOOL_TRUE_ID};

/// A value with a TL wire form.
///
/// Writing cannot fail: every value that can be constructed has a wire form.
pub trait Serializable {
    /// Appends the wire form of `self`.
    fn serialize(&self, buf: &mut impl Extend<u8>);

    /// The wire form in a new buffer.
    fn to_bytes(&self) -> Vec<u8> {
        let mut v = Vec::new();
        self.serialize(&mut v);
        v
    }
}

impl<T: Serializable + ?Sized> Serializable for &T {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        (**self).serialize(buf);
    }
}

// ─── bool ────────────────────────────────────────────────────────────────────

/// `true` → `boolTrue#997275b5`, `false` → `boolFalse#bc799737`.
impl Serializable for bool {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        let id = if *self { BOOL_TRUE_ID } else { BOOL_FALSE_ID };
        id.serialize(buf);
    }
}

// ─── numbers ─────────────────────────────────────────────────────────────────

macro_rules! le_primitive {
    ($($ty:ty),+) => {$(
        impl Serializable for $ty {
            fn serialize(&self, buf: &mut impl Extend<u8>) {
                buf.extend(self.to_le_bytes());
            }
        }
    )+};
}

le_primitive!(i32, u32, i64, f64);

impl<const N: usize> Serializable for [u8; N] {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        buf.extend(*self);
    }
}

// ─── bytes and strings ───────────────────────────────────────────────────────

/// Longest payload the 3-byte length header can describe.
pub const MAX_BYTES_LEN: usize = (1 << 24) - 1;

/// `[len][data][pad]` when `len < 254`, otherwise
/// `[0xfe][len as 3 LE bytes][data][pad]`; the pad makes the total a
/// multiple of four.
///
/// # Panics
///
/// If the payload is longer than [`MAX_BYTES_LEN`]. No header can frame it.
impl Serializable for [u8] {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        let len = self.len();
        assert!(len <= MAX_BYTES_LEN, "{len} bytes do not fit a TL length header");
        let header = if len < 254 {
            buf.extend([len as u8]);
            1
        } else {
            let [a, b, c, _] = (len as u32).to_le_bytes();
            buf.extend([0xfe, a, b, c]);
            4
        };
        buf.extend(self.iter().copied());
        buf.extend(std::iter::repeat_n(0u8, padding(header + len)));
    }
}

impl Serializable for Vec<u8> {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.as_slice().serialize(buf);
    }
}

impl Serializable for str {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.as_bytes().serialize(buf);
    }
}

impl Serializable for String {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.as_bytes().serialize(buf);
    }
}

/// An absent optional field writes nothing; its flag bit says so.
impl<T: Serializable> Serializable for Option<T> {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        if let Some(value) = self {
            value.serialize(buf);
        }
    }
}
