//! `gzip_packed#3072cfa1 packed_data:bytes = Object`
//!
//! Servers wrap large results in this constructor. [`crate::read_object`]
//! inflates it and returns the inner object, so callers only meet a
//! [`GzipPacked`] when [`crate::DecodeConfig::unpack_gzip`] is off.

use std::io::{self, Read, Write};

use flate2::Compression;
use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::GzEncoder;

use crate::deserialize::{Buffer, Cursor, Deserializable, Error, Result};
use crate::object::{Constructor, Object, read_object};
use crate::serialize::Serializable;
use crate::{GZIP_PACKED_ID, Identifiable};

/// A compressed boxed object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GzipPacked {
    pub packed_data: Vec<u8>,
}

impl GzipPacked {
    /// Compresses the boxed form of `object`.
    pub fn compress(object: &Object) -> io::Result<Self> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&object.to_bytes())?;
        Ok(Self { packed_data: encoder.finish()? })
    }

    /// Inflates the payload, refusing to produce more than `limit` bytes.
    /// Some servers send a bare zlib stream instead of gzip, so that is
    /// tried second.
    pub fn decompress(&self, limit: usize) -> io::Result<Vec<u8>> {
        let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
        let mut out = Vec::new();
        let gzip = GzDecoder::new(self.packed_data.as_slice()).take(cap).read_to_end(&mut out);
        if gzip.is_err() || out.is_empty() {
            out.clear();
            ZlibDecoder::new(self.packed_data.as_slice()).take(cap).read_to_end(&mut out)?;
        }
        if out.len() > limit {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("inflates past {limit} bytes"),
            ));
        }
        Ok(out)
    }
}

impl Identifiable for GzipPacked {
    const CONSTRUCTOR_ID: u32 = GZIP_PACKED_ID;
}

impl Serializable for GzipPacked {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.packed_data.serialize(buf);
    }
}

impl Deserializable for GzipPacked {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self { packed_data: Vec::<u8>::deserialize(buf)? })
    }
}

impl Constructor for GzipPacked {
    const NAME: &'static str = "gzip_packed";
    const BASE: &'static str = "Object";
}

/// Reads a `gzip_packed` body and decodes the object inside it.
pub(crate) fn unpack(buf: &mut Cursor<'_>) -> Result<Object> {
    let packed = GzipPacked::deserialize(buf)?;
    let data = packed.decompress(buf.config().max_unpacked_len).map_err(|e| {
        log::debug!("gzip_packed failed to inflate: {e}");
        Error::MalformedGzip
    })?;
    log::trace!("gzip_packed: {} -> {} bytes", packed.packed_data.len(), data.len());

    buf.enter()?;
    let object = read_object(&mut buf.nested(&data));
    buf.leave();
    object
}
