//! Objects laid out by parsed `.tl` definitions instead of generated code.
//!
//! [`RegistryBuilder::register_schema`] registers one factory per
//! definition. Each produces a [`RawObject`] holding the shared
//! [`Definition`] and a [`WireValue`] per parameter, read and written in
//! declaration order.

use std::fmt;
use std::sync::Arc;

use tlcodec_schema::Schema;
use tlcodec_schema::tl::{Category, Definition, ParameterType, Type};

use crate::deserialize::{Cursor, Deserializable, Error, Result};
use crate::flags::{Flags, read_flag_only, read_optional_field};
use crate::object::{Object, TlObject, read_body, read_object};
use crate::registry::{DuplicateConstructor, Entry, Registry, RegistryBuilder};
use crate::serialize::Serializable;
use crate::value::WireValue;
use crate::vector::{read_bare_vector, read_vector, write_bare_vector, write_vector};

/// What [`RegistryBuilder::register_schema`] registers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchemaOptions {
    /// Also register the `---functions---` section, for decoding requests.
    pub include_functions: bool,
}

/// Boxed types the codec encodes natively.
const BUILTIN_TYPES: [&str; 3] = ["Bool", "True", "Vector"];

impl RegistryBuilder {
    /// Registers a [`RawObject`] factory for every constructor of `schema`.
    ///
    /// Returns how many definitions were registered. Stops at the first ID
    /// that is already taken.
    pub fn register_schema(
        &mut self,
        schema: &Schema,
        options: SchemaOptions,
    ) -> std::result::Result<usize, DuplicateConstructor> {
        let mut registered = 0;
        for def in &schema.definitions {
            if def.category == Category::Functions && !options.include_functions {
                continue;
            }
            if def.category == Category::Types && BUILTIN_TYPES.iter().any(|b| def.ty.is(b)) {
                log::debug!("{} is built in, not registering", def.full_name());
                continue;
            }

            let def = Arc::new(def.clone());
            let factory_def = Arc::clone(&def);
            let mut entry = Entry::new(
                def.id,
                def.full_name(),
                Some(def.ty.path()),
                Box::new(move |buf: &mut Cursor<'_>| RawObject::read(&factory_def, buf).map(Object::new)),
            );
            entry.definition = Some(def);
            self.insert(entry)?;
            registered += 1;
        }

        log::debug!("registered {registered} schema definitions (layer {:?})", schema.layer);
        Ok(registered)
    }
}

impl Registry {
    /// The definition a schema-driven constructor was registered from.
    pub fn definition(&self, name: &str) -> Option<Arc<Definition>> {
        self.resolve_name(name)?.definition.clone()
    }
}

// ─── Field kinds ─────────────────────────────────────────────────────────────

/// How a parameter type is framed on the wire.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Kind<'d> {
    Int,
    Long,
    Int128,
    Int256,
    Double,
    String,
    Bytes,
    Bool,
    /// `true`: only ever meaningful behind a flag bit; no body bytes.
    True,
    Vector(&'d Type),
    BareVector(&'d Type),
    /// `Object` or a generic `!X`.
    Any,
    Boxed(&'d Type),
    Bare(&'d Type),
    /// `%Base`: the body of the only constructor of `Base`.
    BareBoxed(&'d Type),
}

impl<'d> Kind<'d> {
    fn of(ty: &'d Type) -> Self {
        if ty.generic_ref {
            return Self::Any;
        }
        if ty.bare_boxed {
            return Self::BareBoxed(ty);
        }
        if !ty.namespace.is_empty() {
            return if ty.bare { Self::Bare(ty) } else { Self::Boxed(ty) };
        }
        match (ty.name.as_str(), ty.generic_arg.as_deref()) {
            ("int", _) => Self::Int,
            ("long", _) => Self::Long,
            ("int128", _) => Self::Int128,
            ("int256", _) => Self::Int256,
            ("double", _) => Self::Double,
            ("string", _) => Self::String,
            ("bytes", _) => Self::Bytes,
            ("Bool", _) => Self::Bool,
            ("true", _) => Self::True,
            ("Vector", Some(elem)) => Self::Vector(elem),
            ("vector", Some(elem)) => Self::BareVector(elem),
            ("Object", _) => Self::Any,
            _ if ty.bare => Self::Bare(ty),
            _ => Self::Boxed(ty),
        }
    }

    fn accepts(self, value: &WireValue) -> bool {
        match (self, value) {
            (Self::Int, WireValue::Int(_))
            | (Self::Long, WireValue::Long(_))
            | (Self::Int128, WireValue::Int128(_))
            | (Self::Int256, WireValue::Int256(_))
            | (Self::Double, WireValue::Double(_))
            | (Self::String, WireValue::String(_))
            | (Self::Bytes, WireValue::Bytes(_))
            | (Self::Bool | Self::True, WireValue::Bool(_))
            | (Self::Any, WireValue::Object(_)) => true,
            (Self::Vector(elem) | Self::BareVector(elem), WireValue::Vector(items)) => {
                let kind = Kind::of(elem);
                items.iter().all(|item| kind.accepts(item))
            }
            (Self::Boxed(ty) | Self::BareBoxed(ty), WireValue::Object(o)) => ty.is(o.base_type()),
            (Self::Bare(ty), WireValue::Object(o)) => ty.is(o.qualified_name()),
            _ => false,
        }
    }

    fn read(self, buf: &mut Cursor<'_>) -> Result<WireValue> {
        Ok(match self {
            Self::Int => WireValue::Int(i32::deserialize(buf)?),
            Self::Long => WireValue::Long(i64::deserialize(buf)?),
            Self::Int128 => WireValue::Int128(<[u8; 16]>::deserialize(buf)?),
            Self::Int256 => WireValue::Int256(<[u8; 32]>::deserialize(buf)?),
            Self::Double => WireValue::Double(f64::deserialize(buf)?),
            Self::String => WireValue::String(String::deserialize(buf)?),
            Self::Bytes => WireValue::Bytes(Vec::<u8>::deserialize(buf)?),
            Self::Bool => WireValue::Bool(bool::deserialize(buf)?),
            Self::True => WireValue::Bool(true),
            Self::Vector(elem) => {
                let kind = Kind::of(elem);
                WireValue::Vector(read_vector(buf, |buf| kind.read(buf))?)
            }
            Self::BareVector(elem) => {
                let kind = Kind::of(elem);
                WireValue::Vector(read_bare_vector(buf, |buf| kind.read(buf))?)
            }
            Self::Any => WireValue::Object(read_object(buf)?),
            Self::Boxed(ty) => {
                let object = read_object(buf)?;
                if !ty.is(object.base_type()) {
                    log::debug!("expected {ty}, found {}", object.qualified_name());
                    return Err(Error::UnexpectedConstructor { id: object.constructor_id() });
                }
                WireValue::Object(object)
            }
            Self::Bare(ty) => {
                let name = ty.path();
                let id = buf
                    .registry()
                    .and_then(|r| r.id_for_name(&name))
                    .ok_or(Error::UnknownType { name })?;
                WireValue::Object(read_body(buf, id)?)
            }
            Self::BareBoxed(ty) => {
                let id = buf
                    .registry()
                    .and_then(|r| r.sole_constructor(&ty.path()))
                    .ok_or_else(|| Error::UnknownType { name: ty.to_string() })?;
                WireValue::Object(read_body(buf, id)?)
            }
        })
    }

    /// Writes a value that [`Kind::accepts`].
    fn write(self, value: &WireValue, buf: &mut Vec<u8>) {
        match (self, value) {
            (Self::True, _) => {}
            (Self::Vector(elem), WireValue::Vector(items)) => {
                let kind = Kind::of(elem);
                write_vector(items, buf, |item, buf| kind.write(item, buf));
            }
            (Self::BareVector(elem), WireValue::Vector(items)) => {
                let kind = Kind::of(elem);
                write_bare_vector(items, buf, |item, buf| kind.write(item, buf));
            }
            (Self::Bare(_) | Self::BareBoxed(_), WireValue::Object(o)) => o.write_body(buf),
            (_, value) => value.serialize(buf),
        }
    }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A [`RawObject`] field assignment that does not fit the definition.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldError {
    /// The definition has no settable parameter by this name.
    Unknown { name: String },
    /// A parameter without a flag guard was left unset.
    Missing { name: String },
    /// The value's kind does not match the parameter type.
    TypeMismatch { name: String, expected: String, found: &'static str },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown { name } => write!(f, "no field named `{name}`"),
            Self::Missing { name } => write!(f, "required field `{name}` is not set"),
            Self::TypeMismatch { name, expected, found } => {
                write!(f, "field `{name}` expects {expected}, got {found}")
            }
        }
    }
}

impl std::error::Error for FieldError {}

// ─── RawObject ───────────────────────────────────────────────────────────────

/// An object whose layout comes from a [`Definition`].
///
/// `values` runs parallel to the definition's parameters. Flags words are
/// never stored; their masks are derived from which optional fields are
/// present. A `flags.N?true` field is always stored as a [`WireValue::Bool`].
#[derive(Clone)]
pub struct RawObject {
    def: Arc<Definition>,
    name: String,
    base: String,
    values: Vec<Option<WireValue>>,
}

impl RawObject {
    /// Builds an object from named field values.
    ///
    /// Optional fields may be left out; everything else must be given.
    pub fn new<K: AsRef<str>>(
        def: Arc<Definition>,
        fields: impl IntoIterator<Item = (K, WireValue)>,
    ) -> std::result::Result<Self, FieldError> {
        let values = def
            .params
            .iter()
            .map(|p| match p.value_type().map(Kind::of) {
                Some(Kind::True) => Some(WireValue::Bool(false)),
                _ => None,
            })
            .collect();
        let mut object = Self::empty(def, values);

        for (name, value) in fields {
            object.set(name.as_ref(), value)?;
        }

        let missing = object.def.params.iter().zip(&object.values).find(|(p, v)| {
            !p.is_flags_word() && p.flag().is_none() && v.is_none()
        });
        if let Some((param, _)) = missing {
            return Err(FieldError::Missing { name: param.name.clone() });
        }
        Ok(object)
    }

    fn empty(def: Arc<Definition>, values: Vec<Option<WireValue>>) -> Self {
        Self { name: def.full_name(), base: def.ty.path(), def, values }
    }

    /// Reads a body laid out by `def`. Flags words are consulted by the
    /// fields that name them, in the order they appear.
    pub fn read(def: &Arc<Definition>, buf: &mut Cursor<'_>) -> Result<Self> {
        let mut words: Vec<(&str, Flags)> = Vec::new();
        let mut values = Vec::with_capacity(def.params.len());

        for param in &def.params {
            let (ty, flag) = match &param.ty {
                ParameterType::Flags => {
                    words.push((param.name.as_str(), Flags::deserialize(buf)?));
                    values.push(None);
                    continue;
                }
                ParameterType::Normal { ty, flag } => (ty, flag),
            };

            let kind = Kind::of(ty);
            let value = match flag {
                None => Some(kind.read(buf)?),
                Some(flag) => {
                    let mask = words
                        .iter()
                        .find(|(word, _)| *word == flag.name)
                        .map(|(_, mask)| *mask)
                        .unwrap_or_default();
                    if kind == Kind::True {
                        Some(WireValue::Bool(read_flag_only(mask, flag.index)))
                    } else {
                        read_optional_field(mask, flag.index, buf, |buf| kind.read(buf))?
                    }
                }
            };
            values.push(value);
        }

        Ok(Self::empty(Arc::clone(def), values))
    }

    /// The value of field `name`, if it is set.
    pub fn get(&self, name: &str) -> Option<&WireValue> {
        let index = self.def.params.iter().position(|p| p.name == name)?;
        self.values[index].as_ref()
    }

    /// Sets field `name`, checking it against the parameter type.
    pub fn set(&mut self, name: &str, value: WireValue) -> std::result::Result<(), FieldError> {
        let (index, ty) = self
            .def
            .params
            .iter()
            .enumerate()
            .find_map(|(i, p)| (p.name == name).then_some(i).zip(p.value_type()))
            .ok_or_else(|| FieldError::Unknown { name: name.to_owned() })?;

        if !Kind::of(ty).accepts(&value) {
            return Err(FieldError::TypeMismatch {
                name: name.to_owned(),
                expected: ty.to_string(),
                found: value.kind(),
            });
        }
        self.values[index] = Some(value);
        Ok(())
    }

    /// Unsets an optional field.
    pub fn clear(&mut self, name: &str) -> std::result::Result<(), FieldError> {
        let (index, param) = self
            .def
            .params
            .iter()
            .enumerate()
            .find(|(_, p)| p.name == name && !p.is_flags_word())
            .ok_or_else(|| FieldError::Unknown { name: name.to_owned() })?;
        if param.flag().is_none() {
            return Err(FieldError::Missing { name: name.to_owned() });
        }
        self.values[index] = match param.value_type().map(Kind::of) {
            Some(Kind::True) => Some(WireValue::Bool(false)),
            _ => None,
        };
        Ok(())
    }

    /// Set fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &WireValue)> {
        self.def
            .params
            .iter()
            .zip(&self.values)
            .filter_map(|(p, v)| Some((p.name.as_str(), v.as_ref()?)))
    }

    /// The mask flags word `word` would be written with.
    pub fn flags(&self, word: &str) -> Flags {
        self.def
            .params
            .iter()
            .zip(&self.values)
            .filter_map(|(p, v)| {
                let flag = p.flag().filter(|f| f.name == word)?;
                let present = match v {
                    Some(WireValue::Bool(set)) if p.value_type().map(Kind::of) == Some(Kind::True) => *set,
                    v => v.is_some(),
                };
                present.then_some(flag.index)
            })
            .fold(Flags::default(), Flags::with)
    }

    pub fn definition(&self) -> &Arc<Definition> {
        &self.def
    }
}

impl TlObject for RawObject {
    fn constructor_id(&self) -> u32 {
        self.def.id
    }

    fn qualified_name(&self) -> &str {
        &self.name
    }

    fn base_type(&self) -> &str {
        &self.base
    }

    fn serialize_body(&self, buf: &mut Vec<u8>) {
        let masks: Vec<(&str, Flags)> = self
            .def
            .params
            .iter()
            .filter(|p| p.is_flags_word())
            .map(|p| (p.name.as_str(), self.flags(&p.name)))
            .collect();

        for (param, value) in self.def.params.iter().zip(&self.values) {
            match (&param.ty, value) {
                (ParameterType::Flags, _) => {
                    let mask = masks.iter().find(|(word, _)| *word == param.name).map(|(_, m)| *m);
                    mask.unwrap_or_default().serialize(buf);
                }
                (ParameterType::Normal { ty, .. }, Some(value)) => Kind::of(ty).write(value, buf),
                (ParameterType::Normal { .. }, None) => {}
            }
        }
    }

    fn clone_object(&self) -> Box<dyn TlObject> {
        Box::new(self.clone())
    }

    fn eq_object(&self, other: &dyn TlObject) -> bool {
        other.as_any().downcast_ref::<Self>().is_some_and(|other| self == other)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn std::any::Any> {
        self
    }
}

impl PartialEq for RawObject {
    fn eq(&self, other: &Self) -> bool {
        self.def.id == other.def.id && self.values == other.values
    }
}

impl fmt::Debug for RawObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(&self.name);
        for (name, value) in self.fields() {
            s.field(name, value);
        }
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(src: &str) -> Arc<Definition> {
        Arc::new(src.parse().unwrap())
    }

    #[test]
    fn kinds() {
        let ty = |s: &str| s.parse::<Type>().unwrap();
        assert_eq!(Kind::of(&ty("int")), Kind::Int);
        assert_eq!(Kind::of(&ty("!X")), Kind::Any);
        let vec = ty("Vector<long>");
        assert!(matches!(Kind::of(&vec), Kind::Vector(t) if t.name == "long"));
        let bare = ty("future_salt");
        assert!(matches!(Kind::of(&bare), Kind::Bare(_)));
        let boxed = ty("storage.FileType");
        assert!(matches!(Kind::of(&boxed), Kind::Boxed(_)));
        let sole = ty("%Message");
        assert!(matches!(Kind::of(&sole), Kind::BareBoxed(t) if t.name == "Message"));
    }

    #[test]
    fn required_fields_must_be_set() {
        let d = def("userStatusOnline#edb93949 expires:int = UserStatus");
        assert_eq!(
            RawObject::new(Arc::clone(&d), Vec::<(&str, WireValue)>::new()).unwrap_err(),
            FieldError::Missing { name: "expires".into() }
        );
        let err = RawObject::new(d, [("expires", WireValue::from("soon"))]).unwrap_err();
        assert!(matches!(err, FieldError::TypeMismatch { found: "string", .. }));
    }

    #[test]
    fn bytes_field_takes_bytes_only() {
        let d = def("blob#11223344 data:bytes = Blob");
        let err = RawObject::new(Arc::clone(&d), [("data", WireValue::from("hi"))]).unwrap_err();
        assert!(matches!(err, FieldError::TypeMismatch { found: "string", .. }));

        let blob = RawObject::new(Arc::clone(&d), [("data", WireValue::Bytes(b"hi".to_vec()))]).unwrap();
        let mut body = Vec::new();
        blob.serialize_body(&mut body);
        assert_eq!(RawObject::read(&d, &mut Cursor::from_slice(&body)).unwrap(), blob);
    }

    #[test]
    fn flags_word_is_derived() {
        let d = def("poll#1 flags:# id:int closed:flags.0?true question:flags.1?string = Poll");
        let mut poll = RawObject::new(Arc::clone(&d), [("id", WireValue::Int(3))]).unwrap();
        assert_eq!(poll.flags("flags"), Flags(0));
        poll.set("closed", WireValue::Bool(true)).unwrap();
        poll.set("question", "?".into()).unwrap();
        assert_eq!(poll.flags("flags"), Flags(0b11));
        poll.clear("closed").unwrap();
        assert_eq!(poll.flags("flags"), Flags(0b10));
        assert_eq!(poll.clear("id"), Err(FieldError::Missing { name: "id".into() }));
        assert_eq!(poll.set("flags", WireValue::Int(1)), Err(FieldError::Unknown { name: "flags".into() }));
    }
}
