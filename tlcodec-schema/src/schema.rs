use crate::errors::{ParseError, SchemaError};
use crate::iterator::TlIterator;
use crate::tl::{Category, Definition};

/// A fully parsed schema file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    /// Value of a leading `// LAYER N` comment, if present.
    pub layer: Option<i32>,
    /// Every supported definition, in file order.
    pub definitions: Vec<Definition>,
}

impl Schema {
    /// Parses a complete schema, failing on the first malformed definition.
    ///
    /// Builtin pseudo-definitions such as `int ? = Int;` or
    /// `vector {t:Type} # [ t ] = Vector t;` describe wire primitives the
    /// codec implements natively; they are skipped rather than reported.
    pub fn parse(contents: &str) -> Result<Self, SchemaError> {
        let mut definitions = Vec::new();
        for (line, result) in TlIterator::new(contents) {
            match result {
                Ok(def) => definitions.push(def),
                Err(ParseError::NotImplemented) => continue,
                Err(error) => return Err(SchemaError { line, error }),
            }
        }

        Ok(Self { layer: layer_of(contents), definitions })
    }

    /// Data constructors only.
    pub fn constructors(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.iter().filter(|d| d.category == Category::Types)
    }

    /// RPC functions only.
    pub fn functions(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.iter().filter(|d| d.category == Category::Functions)
    }

    /// Finds a definition by its full name (`"help.getConfig"`).
    pub fn find(&self, full_name: &str) -> Option<&Definition> {
        self.definitions.iter().find(|d| d.full_name() == full_name)
    }
}

fn layer_of(contents: &str) -> Option<i32> {
    contents
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())?
        .strip_prefix("// LAYER ")?
        .trim()
        .parse()
        .ok()
}
