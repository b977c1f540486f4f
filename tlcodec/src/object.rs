//! Polymorphic TL objects and the read/write dispatch.
//!
//! Any concrete constructor is stored as a `Box<dyn TlObject>` inside an
//! [`Object`]. Typed leaf types implement [`Constructor`] and get
//! [`TlObject`] for free; [`crate::RawObject`] implements it directly from a
//! parsed schema definition.

use std::any::Any;
use std::fmt;

use crate::deserialize::{Buffer, Cursor, Deserializable, Error, Result};
use crate::serialize::Serializable;
use crate::{GZIP_PACKED_ID, Identifiable};

/// A concrete TL constructor, usable behind `dyn`.
pub trait TlObject: Any + Send + Sync + fmt::Debug {
    /// The constructor ID written in front of the body.
    fn constructor_id(&self) -> u32;

    /// Qualified TL name, for diagnostics.
    fn qualified_name(&self) -> &str;

    /// The boxed type this constructor belongs to (`"UserStatus"`).
    fn base_type(&self) -> &str;

    /// Writes the fields in schema order, without the constructor ID.
    fn serialize_body(&self, buf: &mut Vec<u8>);

    #[doc(hidden)]
    fn clone_object(&self) -> Box<dyn TlObject>;

    #[doc(hidden)]
    fn eq_object(&self, other: &dyn TlObject) -> bool;

    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;

    #[doc(hidden)]
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// The contract generated leaf types implement.
///
/// [`Serializable`] and [`Deserializable`] cover the *body* only; the
/// constructor ID is [`Identifiable::CONSTRUCTOR_ID`] and is handled by
/// [`write_object`] / [`read_object`].
pub trait Constructor:
    Identifiable
    + Serializable
    + Deserializable
    + Clone
    + PartialEq
    + fmt::Debug
    + Send
    + Sync
    + 'static
{
    /// Qualified TL name, e.g. `"userStatusOnline"`.
    const NAME: &'static str;

    /// The boxed type, e.g. `"UserStatus"`.
    const BASE: &'static str;

    /// Reads a body and wraps it. This is the factory registered by
    /// [`crate::RegistryBuilder::register_type`].
    fn deserialize_object(buf: Buffer) -> Result<Object> {
        Self::deserialize(buf).map(Object::new)
    }

    /// Wraps `self` into an [`Object`].
    fn into_object(self) -> Object {
        Object::new(self)
    }
}

impl<T: Constructor> TlObject for T {
    fn constructor_id(&self) -> u32 {
        T::CONSTRUCTOR_ID
    }

    fn qualified_name(&self) -> &str {
        T::NAME
    }

    fn base_type(&self) -> &str {
        T::BASE
    }

    fn serialize_body(&self, buf: &mut Vec<u8>) {
        self.serialize(buf);
    }

    fn clone_object(&self) -> Box<dyn TlObject> {
        Box::new(self.clone())
    }

    fn eq_object(&self, other: &dyn TlObject) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|other| self == other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

// ─── Object ──────────────────────────────────────────────────────────────────

/// An owned instance of some concrete TL constructor.
pub struct Object(Box<dyn TlObject>);

impl Object {
    /// Boxes a concrete constructor.
    pub fn new<T: TlObject>(value: T) -> Self {
        Self(Box::new(value))
    }

    pub fn constructor_id(&self) -> u32 {
        self.0.constructor_id()
    }

    pub fn qualified_name(&self) -> &str {
        self.0.qualified_name()
    }

    pub fn base_type(&self) -> &str {
        self.0.base_type()
    }

    /// Whether the concrete constructor is `T`.
    pub fn is<T: TlObject>(&self) -> bool {
        self.0.as_any().is::<T>()
    }

    /// Borrows the concrete constructor, if it is `T`.
    pub fn downcast_ref<T: TlObject>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref()
    }

    /// Unwraps the concrete constructor, handing `self` back if it is not `T`.
    pub fn downcast<T: TlObject>(self) -> std::result::Result<T, Self> {
        if !self.is::<T>() {
            return Err(self);
        }
        match self.0.into_any().downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => unreachable!("type was checked above"),
        }
    }

    /// Writes the body (no constructor ID).
    pub fn write_body(&self, buf: &mut Vec<u8>) {
        self.0.serialize_body(buf);
    }

    pub fn as_dyn(&self) -> &dyn TlObject {
        &*self.0
    }
}

impl Clone for Object {
    fn clone(&self) -> Self {
        Self(self.0.clone_object())
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_object(&*other.0)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Boxed form: constructor ID, then the body.
impl Serializable for Object {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        let mut out = Vec::new();
        self.constructor_id().serialize(&mut out);
        self.write_body(&mut out);
        buf.extend(out);
    }
}

impl Deserializable for Object {
    fn deserialize(buf: Buffer) -> Result<Self> {
        read_object(buf)
    }
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

/// Reads one boxed object: the constructor ID, then whatever body the
/// cursor's registry has registered for it.
///
/// `gzip_packed` is unwrapped transparently unless
/// [`crate::DecodeConfig::unpack_gzip`] is off.
pub fn read_object(buf: &mut Cursor<'_>) -> Result<Object> {
    let id = u32::deserialize(buf)?;
    read_body(buf, id)
}

/// Reads a boxed object and checks that it belongs to `base`.
///
/// A constructor of another boxed type fails with
/// [`Error::UnexpectedConstructor`].
pub fn read_object_of(buf: &mut Cursor<'_>, base: &str) -> Result<Object> {
    let object = read_object(buf)?;
    if object.base_type() != base {
        return Err(Error::UnexpectedConstructor { id: object.constructor_id() });
    }
    Ok(object)
}

/// Reads the body of constructor `id` whose ID was consumed already (or
/// never written, as for bare types).
pub fn read_body(buf: &mut Cursor<'_>, id: u32) -> Result<Object> {
    if id == GZIP_PACKED_ID {
        return read_gzip_packed(buf);
    }

    let Some(registry) = buf.registry() else {
        log::debug!("no registry to resolve constructor {id:#010x}");
        return Err(Error::UnknownConstructor { id });
    };
    let entry = registry.resolve(id).inspect_err(|_| {
        log::debug!("unknown constructor {id:#010x} at offset {}", buf.pos().saturating_sub(4));
    })?;

    buf.enter()?;
    log::trace!("reading {} at depth {}", entry.name(), buf.depth());
    let object = entry.read_body(buf);
    buf.leave();

    let object = object?;
    debug_assert_eq!(object.constructor_id(), id, "factory for {} built another constructor", entry.name());
    Ok(object)
}

#[cfg(feature = "gzip")]
fn read_gzip_packed(buf: &mut Cursor<'_>) -> Result<Object> {
    if buf.config().unpack_gzip {
        crate::gzip::unpack(buf)
    } else {
        crate::gzip::GzipPacked::deserialize_object(buf)
    }
}

#[cfg(not(feature = "gzip"))]
fn read_gzip_packed(buf: &mut Cursor<'_>) -> Result<Object> {
    let _ = buf;
    Err(Error::UnknownConstructor { id: GZIP_PACKED_ID })
}

/// Serializes `object` in boxed form: ID, then body.
pub fn write_object(object: &Object) -> Vec<u8> {
    object.to_bytes()
}
