//! [`WireValue`]: one field of an object whose layout is only known at
//! runtime.

use crate::object::Object;
use crate::serialize::Serializable;
use crate::vector::write_vector;

/// A single TL value of any wire kind.
#[derive(Clone, Debug, PartialEq)]
pub enum WireValue {
    Int(i32),
    Long(i64),
    Int128([u8; 16]),
    Int256([u8; 32]),
    Bool(bool),
    Double(f64),
    Bytes(Vec<u8>),
    String(String),
    Vector(Vec<WireValue>),
    Object(Object),
}

impl WireValue {
    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Int128(_) => "int128",
            Self::Int256(_) => "int256",
            Self::Bool(_) => "Bool",
            Self::Double(_) => "double",
            Self::Bytes(_) => "bytes",
            Self::String(_) => "string",
            Self::Vector(_) => "Vector",
            Self::Object(_) => "Object",
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self { Self::Int(v) => Some(*v), _ => None }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self { Self::Long(v) => Some(*v), _ => None }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self { Self::Bool(v) => Some(*v), _ => None }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self { Self::Double(v) => Some(*v), _ => None }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self { Self::String(v) => Some(v), _ => None }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self { Self::Bytes(v) => Some(v), _ => None }
    }

    pub fn as_slice(&self) -> Option<&[WireValue]> {
        match self { Self::Vector(v) => Some(v), _ => None }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self { Self::Object(v) => Some(v), _ => None }
    }
}

/// The standalone encoding of each kind. Vectors are boxed and objects
/// carry their constructor ID; schema-driven bodies pick bare forms
/// themselves where the definition asks for them.
impl Serializable for WireValue {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::Int(v) => v.serialize(buf),
            Self::Long(v) => v.serialize(buf),
            Self::Int128(v) => v.serialize(buf),
            Self::Int256(v) => v.serialize(buf),
            Self::Bool(v) => v.serialize(buf),
            Self::Double(v) => v.serialize(buf),
            Self::Bytes(v) => v.serialize(buf),
            Self::String(v) => v.serialize(buf),
            Self::Vector(items) => write_vector(items, buf, |item, buf| item.serialize(buf)),
            Self::Object(v) => v.serialize(buf),
        }
    }
}

macro_rules! from_impls {
    ($($ty:ty => $variant:ident),+ $(,)?) => {$(
        impl From<$ty> for WireValue {
            fn from(v: $ty) -> Self { Self::$variant(v) }
        }
    )+};
}

from_impls! {
    i32 => Int,
    i64 => Long,
    [u8; 16] => Int128,
    [u8; 32] => Int256,
    bool => Bool,
    f64 => Double,
    Vec<u8> => Bytes,
    String => String,
    Vec<WireValue> => Vector,
    Object => Object,
}

impl From<&str> for WireValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}
