//! The [`Deserializable`] trait, the [`Cursor`] it reads from, and the
//! primitive impls.

use std::fmt;

use crate::config::DecodeConfig;
use crate::registry::Registry;
use crate::{BOOL_FALSE_ID, BOOL_TRUE_ID};

// ─── Error ───────────────────────────────────────────────────────────────────

/// Everything that can go wrong while reading TL data.
///
/// Only [`Error::UnknownConstructor`] is recoverable; the rest mean the
/// buffer is not what the caller believed it to be.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// The buffer ended inside a value.
    UnexpectedEof,
    /// A bytes/string header that no encoder produces (first byte `0xff`).
    MalformedLength { len: u8 },
    /// A string payload that is not UTF-8.
    InvalidUtf8,
    /// A `Bool` that is neither `boolTrue` nor `boolFalse`.
    MalformedBool { id: u32 },
    /// A constructor that is not valid in this position: a missing vector
    /// marker, or an object of the wrong base type.
    UnexpectedConstructor { id: u32 },
    /// A negative element count, or a count or byte length the remaining
    /// bytes cannot hold.
    NegativeLength { len: i64 },
    /// No factory is registered for this constructor ID.
    UnknownConstructor { id: u32 },
    /// Objects were nested deeper than [`DecodeConfig::max_depth`].
    MaxDepthExceeded { limit: u32 },
    /// A `gzip_packed` payload failed to inflate.
    MalformedGzip,
    /// A bare type name that does not match any registered constructor.
    UnknownType { name: String },
}

impl Error {
    /// Whether a layer above the codec may skip the offending object and
    /// carry on (the peer speaks a newer schema than the registry knows).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnknownConstructor { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "unexpected end of buffer"),
            Self::MalformedLength { len } => write!(f, "malformed length prefix {len:#04x}"),
            Self::InvalidUtf8 => write!(f, "string is not valid UTF-8"),
            Self::MalformedBool { id } => write!(f, "invalid Bool constructor {id:#010x}"),
            Self::UnexpectedConstructor { id } => write!(f, "unexpected constructor id: {id:#010x}"),
            Self::NegativeLength { len } => write!(f, "invalid length {len}"),
            Self::UnknownConstructor { id } => write!(f, "unknown constructor id: {id:#010x}"),
            Self::MaxDepthExceeded { limit } => write!(f, "objects nested deeper than {limit}"),
            Self::MalformedGzip => write!(f, "gzip_packed payload failed to inflate"),
            Self::UnknownType { name } => write!(f, "unknown bare type `{name}`"),
        }
    }
}

impl std::error::Error for Error {}

/// `Result` with a decode [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// A read position over a fully buffered message.
///
/// Besides the bytes, a cursor carries what nested object reads need: the
/// [`Registry`] to resolve constructor IDs against, the current nesting
/// depth, and the [`DecodeConfig`]. A cursor built with
/// [`Cursor::from_slice`] has no registry and reads primitives only.
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
    registry: Option<&'a Registry>,
    depth: u32,
    config: DecodeConfig,
}

impl<'a> Cursor<'a> {
    /// A registry-less cursor at the start of `buf`.
    pub fn from_slice(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0, registry: None, depth: 0, config: DecodeConfig::default() }
    }

    /// A cursor that resolves objects through `registry`.
    pub fn with_registry(buf: &'a [u8], registry: &'a Registry) -> Self {
        Self { registry: Some(registry), ..Self::from_slice(buf) }
    }

    /// Replaces the decode configuration.
    pub fn with_config(self, config: DecodeConfig) -> Self {
        Self { config, ..self }
    }

    /// A cursor over a different buffer (an inflated `gzip_packed` body)
    /// that keeps this cursor's registry, depth and configuration.
    pub(crate) fn nested<'b>(&self, buf: &'b [u8]) -> Cursor<'b>
    where
        'a: 'b,
    {
        Cursor { buf, pos: 0, registry: self.registry, depth: self.depth, config: self.config }
    }

    /// Current byte offset.
    pub fn pos(&self) -> usize { self.pos }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize { self.buf.len() - self.pos }

    /// The registry objects are resolved against, if any.
    pub fn registry(&self) -> Option<&'a Registry> { self.registry }

    /// The active configuration.
    pub fn config(&self) -> &DecodeConfig { &self.config }

    /// Current object nesting depth.
    pub fn depth(&self) -> u32 { self.depth }

    /// Read a single byte.
    pub fn read_byte(&mut self) -> Result<u8> {
        let b = *self.buf.get(self.pos).ok_or(Error::UnexpectedEof)?;
        self.pos += 1;
        Ok(b)
    }

    /// Borrow the next `len` bytes and advance past them.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::UnexpectedEof);
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Fill `out` from the buffer.
    pub fn read_exact(&mut self, out: &mut [u8]) -> Result<()> {
        out.copy_from_slice(self.take(out.len())?);
        Ok(())
    }

    /// Record entry into a nested object.
    pub(crate) fn enter(&mut self) -> Result<()> {
        if self.depth >= self.config.max_depth {
            return Err(Error::MaxDepthExceeded { limit: self.config.max_depth });
        }
        self.depth += 1;
        Ok(())
    }

    /// Record that the innermost object was read completely.
    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// The parameter type every `deserialize` takes.
pub type Buffer<'a, 'b> = &'a mut Cursor<'b>;

// ─── Deserializable ──────────────────────────────────────────────────────────

/// Reads a value from TL binary form.
///
/// Generated leaf types implement this for their *body*; the constructor ID
/// in front of it belongs to whoever dispatched to them.
pub trait Deserializable: Sized {
    /// Reads one value and moves `buf` past it.
    fn deserialize(buf: Buffer) -> Result<Self>;

    /// Deserialize from a byte slice with no registry attached.
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::deserialize(&mut Cursor::from_slice(bytes))
    }
}

// ─── Primitives ───────────────────────────────────────────────────────────────

impl Deserializable for bool {
    fn deserialize(buf: Buffer) -> Result<Self> {
        match u32::deserialize(buf)? {
            BOOL_TRUE_ID => Ok(true),
            BOOL_FALSE_ID => Ok(false),
            id => Err(Error::MalformedBool { id }),
        }
    }
}

macro_rules! le_primitive {
    ($($ty:ty),+) => {$(
        impl Deserializable for $ty {
            fn deserialize(buf: Buffer) -> Result<Self> {
                let mut b = [0u8; std::mem::size_of::<$ty>()];
                buf.read_exact(&mut b)?;
                Ok(<$ty>::from_le_bytes(b))
            }
        }
    )+};
}

le_primitive!(i32, u32, i64, f64);

/// `int128` and `int256` are opaque blocks: nonces and hashes, never numbers.
impl<const N: usize> Deserializable for [u8; N] {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let mut b = [0u8; N];
        buf.read_exact(&mut b)?;
        Ok(b)
    }
}

// ─── bytes and strings ───────────────────────────────────────────────────────

/// `bytes`: a short (1-byte) or long (`0xfe` + 3-byte) length, the payload,
/// then zero padding up to a multiple of four.
impl Deserializable for Vec<u8> {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let (len, header) = match buf.read_byte()? {
            len @ 0..=253 => (usize::from(len), 1),
            254 => {
                let mut b = [0u8; 4];
                buf.read_exact(&mut b[..3])?;
                (u32::from_le_bytes(b) as usize, 4)
            }
            len => return Err(Error::MalformedLength { len }),
        };

        if len > buf.remaining() {
            return Err(Error::NegativeLength { len: len as i64 });
        }
        let data = buf.take(len)?.to_vec();
        buf.take(padding(header + len))?;
        Ok(data)
    }
}

impl Deserializable for String {
    fn deserialize(buf: Buffer) -> Result<Self> {
        String::from_utf8(Vec::<u8>::deserialize(buf)?).map_err(|_| Error::InvalidUtf8)
    }
}

/// Zero bytes needed after `written` bytes to reach 4-byte alignment.
pub(crate) fn padding(written: usize) -> usize {
    (4 - written % 4) % 4
}
