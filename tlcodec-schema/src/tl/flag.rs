/// The guard of an optional parameter: `flags.3` in `via:flags.3?long`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Flag {
    /// Name of the `#` parameter holding the bit, usually `flags`.
    pub name: String,
    /// Bit position, always below 32.
    pub index: u32,
}

impl Flag {
    /// The mask selecting this bit.
    pub fn mask(&self) -> u32 {
        1 << self.index
    }
}
