//! The flags word and the optional fields it guards.
//!
//! A constructor whose schema declares `name:flags.N?Type` parameters starts
//! its body with a 32-bit mask; bit `N` says whether the guarded field is on
//! the wire. A constructor without optional parameters has no mask at all.
//!
//! Writing goes through [`FlagsWriter`], which collects every field first so
//! the mask is complete before the first byte is emitted:
//!
//! ```
//! use tlcodec::flags::FlagsWriter;
//! use tlcodec::Serializable;
//!
//! // poll#1 flags:# id:int closed:flags.0?true question:flags.1?string = Poll;
//! let question = Some("?".to_owned());
//! let mut out = Vec::new();
//! FlagsWriter::new()
//!     .required(&7i32)
//!     .flag_only(0, false)
//!     .optional(1, question.as_ref())
//!     .finish(&mut out);
//!
//! assert_eq!(&out[..4], &0b10u32.to_le_bytes());
//! ```

use crate::deserialize::{Buffer, Cursor, Deserializable, Result};
use crate::serialize::Serializable;

/// A flags word as read from or written to the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Flags(pub u32);

impl Flags {
    /// Whether bit `bit` is set. Bits outside the word are never set.
    pub fn is_set(self, bit: u32) -> bool {
        bit < u32::BITS && self.0 & (1 << bit) != 0
    }

    /// This word with bit `bit` set.
    pub fn with(self, bit: u32) -> Self {
        debug_assert!(bit < u32::BITS, "flag bit {bit} does not fit in a word");
        Self(self.0 | 1 << bit)
    }

    /// Reads the field guarded by `bit` if it is present.
    pub fn read_optional<'b, T>(
        self,
        bit: u32,
        buf: &mut Cursor<'b>,
        read: impl FnOnce(&mut Cursor<'b>) -> Result<T>,
    ) -> Result<Option<T>> {
        read_optional_field(self, bit, buf, read)
    }
}

impl Serializable for Flags {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.0.serialize(buf);
    }
}

impl Deserializable for Flags {
    fn deserialize(buf: Buffer) -> Result<Self> {
        u32::deserialize(buf).map(Self)
    }
}

// ─── Single fields ───────────────────────────────────────────────────────────

/// What one optional field adds to a body: its share of the mask, and the
/// bytes to emit in its position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionalField {
    /// `1 << bit` when present, `0` otherwise.
    pub mask: u32,
    /// Serialized value; empty when absent or flag-only.
    pub bytes: Vec<u8>,
}

/// Reads a `flags.N?T` field: runs `read` only when bit `bit` of `mask` is
/// set, consuming nothing otherwise.
pub fn read_optional_field<'b, T>(
    mask: Flags,
    bit: u32,
    buf: &mut Cursor<'b>,
    read: impl FnOnce(&mut Cursor<'b>) -> Result<T>,
) -> Result<Option<T>> {
    if mask.is_set(bit) { read(buf).map(Some) } else { Ok(None) }
}

/// Encodes a `flags.N?T` field.
pub fn write_optional_field<T: Serializable + ?Sized>(value: Option<&T>, bit: u32) -> OptionalField {
    match value {
        Some(v) => OptionalField { mask: Flags::default().with(bit).0, bytes: v.to_bytes() },
        None => OptionalField::default(),
    }
}

/// Reads a `flags.N?true` field. The bit is the whole value.
pub fn read_flag_only(mask: Flags, bit: u32) -> bool {
    mask.is_set(bit)
}

/// Encodes a `flags.N?true` field: a mask bit when `present`, never a body
/// byte.
pub fn write_flag_only(present: bool, bit: u32) -> OptionalField {
    let mask = if present { Flags::default().with(bit).0 } else { 0 };
    OptionalField { mask, bytes: Vec::new() }
}

// ─── Writer ──────────────────────────────────────────────────────────────────

/// Builds the body of a constructor that starts with a flags word.
///
/// Fields are added in schema order; [`FlagsWriter::finish`] then emits the
/// accumulated mask followed by the collected field bytes.
#[derive(Debug, Default)]
pub struct FlagsWriter {
    mask: Flags,
    body: Vec<u8>,
}

impl FlagsWriter {
    /// An empty body with an all-clear mask.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field that is always present.
    pub fn required<T: Serializable + ?Sized>(&mut self, value: &T) -> &mut Self {
        value.serialize(&mut self.body);
        self
    }

    /// Appends a `flags.N?T` field.
    pub fn optional<T: Serializable + ?Sized>(&mut self, bit: u32, value: Option<&T>) -> &mut Self {
        self.push(write_optional_field(value, bit))
    }

    /// Appends a `flags.N?true` field.
    pub fn flag_only(&mut self, bit: u32, present: bool) -> &mut Self {
        self.push(write_flag_only(present, bit))
    }

    fn push(&mut self, field: OptionalField) -> &mut Self {
        self.mask.0 |= field.mask;
        self.body.extend(field.bytes);
        self
    }

    /// The mask accumulated so far.
    pub fn mask(&self) -> Flags {
        self.mask
    }

    /// Emits the mask, then the body.
    pub fn finish(&self, buf: &mut impl Extend<u8>) {
        self.mask.serialize(buf);
        buf.extend(self.body.iter().copied());
    }
}
