//! Runtime knobs for decoding.

/// Limits and behaviour switches consulted by [`crate::Cursor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Deepest allowed nesting of objects inside objects. The outermost
    /// object is depth 1.
    pub max_depth: u32,
    /// Replace `gzip_packed` wrappers with the object they contain.
    /// Only effective with the `gzip` feature.
    pub unpack_gzip: bool,
    /// Largest payload a `gzip_packed` wrapper may inflate to. Anything
    /// bigger is rejected as [`crate::Error::MalformedGzip`].
    pub max_unpacked_len: usize,
}

impl DecodeConfig {
    /// Nesting limit used by [`DecodeConfig::default`].
    pub const DEFAULT_MAX_DEPTH: u32 = 64;
    /// Inflate limit used by [`DecodeConfig::default`] (16 MiB).
    pub const DEFAULT_MAX_UNPACKED_LEN: usize = 16 << 20;
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            unpack_gzip: true,
            max_unpacked_len: Self::DEFAULT_MAX_UNPACKED_LEN,
        }
    }
}
