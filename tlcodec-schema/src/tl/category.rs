/// Which section of the schema a [`super::Definition`] came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Category {
    /// Data constructors, the default section.
    #[default]
    Types,
    /// RPC methods, everything after `---functions---`.
    Functions,
}
