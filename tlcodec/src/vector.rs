//! Boxed `Vector<T>` and bare `vector<T>` sequences.
//!
//! The element codec is passed in as a closure so the same framing serves
//! typed code (`Vec<T>`, [`RawVec<T>`]) and schema-driven objects whose
//! element type is only known at runtime.

use crate::deserialize::{Cursor, Deserializable, Error, Result};
use crate::serialize::Serializable;
use crate::VECTOR_ID;

/// A bare `vector<T>`: count and elements, no marker.
///
/// Plain `Vec<T>` is the boxed form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawVec<T>(pub Vec<T>);

impl<T> From<Vec<T>> for RawVec<T> {
    fn from(v: Vec<T>) -> Self { Self(v) }
}

/// Reads `Vector<T>`: the `0x1cb5c415` marker, an `int` count, then `count`
/// elements through `read`.
pub fn read_vector<'b, T>(
    buf: &mut Cursor<'b>,
    read: impl FnMut(&mut Cursor<'b>) -> Result<T>,
) -> Result<Vec<T>> {
    let id = u32::deserialize(buf)?;
    if id != VECTOR_ID {
        return Err(Error::UnexpectedConstructor { id });
    }
    read_bare_vector(buf, read)
}

/// Reads `vector<T>`: an `int` count, then `count` elements.
pub fn read_bare_vector<'b, T>(
    buf: &mut Cursor<'b>,
    mut read: impl FnMut(&mut Cursor<'b>) -> Result<T>,
) -> Result<Vec<T>> {
    let len = i32::deserialize(buf)?;
    // No element is narrower than a byte, so a count above the remaining
    // length is corrupt; checking it first keeps the allocation bounded.
    let count = usize::try_from(len)
        .ok()
        .filter(|&n| n <= buf.remaining())
        .ok_or(Error::NegativeLength { len: i64::from(len) })?;

    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(read(buf)?);
    }
    Ok(items)
}

/// Writes `Vector<T>`: marker, count, then each item through `write`.
pub fn write_vector<T, B: Extend<u8>>(items: &[T], buf: &mut B, write: impl FnMut(&T, &mut B)) {
    VECTOR_ID.serialize(buf);
    write_bare_vector(items, buf, write);
}

/// Writes `vector<T>`: count, then each item through `write`.
pub fn write_bare_vector<T, B: Extend<u8>>(items: &[T], buf: &mut B, mut write: impl FnMut(&T, &mut B)) {
    (items.len() as i32).serialize(buf);
    for item in items {
        write(item, buf);
    }
}

// ─── Trait impls ─────────────────────────────────────────────────────────────

impl<T: Deserializable> Deserializable for Vec<T> {
    fn deserialize(buf: &mut Cursor<'_>) -> Result<Self> {
        read_vector(buf, T::deserialize)
    }
}

impl<T: Deserializable> Deserializable for RawVec<T> {
    fn deserialize(buf: &mut Cursor<'_>) -> Result<Self> {
        read_bare_vector(buf, T::deserialize).map(RawVec)
    }
}

impl<T: Serializable> Serializable for Vec<T> {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        write_vector(self, buf, |item, buf| item.serialize(buf));
    }
}

impl<T: Serializable> Serializable for RawVec<T> {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        write_bare_vector(&self.0, buf, |item, buf| item.serialize(buf));
    }
}
