//! Binary codec for Telegram's [Type Language] (TL).
//!
//! Converts between the MTProto wire format and an open set of
//! polymorphic objects whose concrete type is chosen at read time by a
//! leading 32-bit constructor ID.
//!
//! # Overview
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`serialize`]   | [`Serializable`] and the primitive encoders                |
//! | [`deserialize`] | [`Deserializable`], [`Cursor`], [`Error`] and the decoders |
//! | [`vector`]      | Boxed `Vector<T>` and bare `vector<T>`                     |
//! | [`flags`]       | The flags word and optional fields                         |
//! | [`registry`]    | Constructor ID → factory map                               |
//! | [`object`]      | [`Object`], [`TlObject`] and the dispatch entry points     |
//! | [`value`]       | [`WireValue`], the dynamic field representation            |
//! | `schema`        | `RawObject`: objects driven by parsed `.tl` definitions    |
//! | `gzip`          | `gzip_packed` wrapping and unwrapping                      |
//!
//! # Decoding against a schema
//!
//! ```rust
//! # #[cfg(feature = "schema")] {
//! use tlcodec::{Registry, Schema, SchemaOptions, Serializable};
//!
//! let schema = Schema::parse("userStatusOnline#edb93949 expires:int = UserStatus;").unwrap();
//! let mut builder = Registry::builder();
//! builder.register_schema(&schema, SchemaOptions::default()).unwrap();
//! let registry = builder.build();
//!
//! let mut wire = 0xedb93949u32.to_bytes();
//! wire.extend(1_700_000_000i32.to_bytes());
//!
//! let status = registry.decode(&wire).unwrap();
//! assert_eq!(status.qualified_name(), "userStatusOnline");
//! assert_eq!(tlcodec::write_object(&status), wire);
//! # }
//! ```
//!
//! [Type Language]: https://core.telegram.org/mtproto/TL

#![deny(unsafe_code)]

pub mod config;
pub mod deserialize;
pub mod flags;
#[cfg(feature = "gzip")]
pub mod gzip;
pub mod object;
pub mod registry;
#[cfg(feature = "schema")]
pub mod schema;
pub mod serialize;
pub mod value;
pub mod vector;

pub use config::DecodeConfig;
pub use deserialize::{Cursor, Deserializable, Error};
pub use flags::{Flags, FlagsWriter};
#[cfg(feature = "gzip")]
pub use gzip::GzipPacked;
pub use object::{Constructor, Object, TlObject, read_object, write_object};
pub use registry::{DuplicateConstructor, Registry, RegistryBuilder};
#[cfg(feature = "schema")]
pub use schema::{FieldError, RawObject, SchemaOptions};
#[cfg(feature = "schema")]
pub use tlcodec_schema::Schema;
pub use serialize::Serializable;
pub use value::WireValue;
pub use vector::RawVec;

/// `boolTrue#997275b5 = Bool`
pub const BOOL_TRUE_ID: u32 = 0x997275b5;
/// `boolFalse#bc799737 = Bool`
pub const BOOL_FALSE_ID: u32 = 0xbc799737;
/// Marker in front of every boxed `Vector<T>`.
pub const VECTOR_ID: u32 = 0x1cb5c415;
/// `gzip_packed#3072cfa1 packed_data:bytes = Object`
pub const GZIP_PACKED_ID: u32 = 0x3072cfa1;

// ─── Core traits ──────────────────────────────────────────────────────────────

/// Every generated type has a unique 32-bit constructor ID.
pub trait Identifiable {
    /// The constructor ID as specified in the TL schema.
    const CONSTRUCTOR_ID: u32;
}
