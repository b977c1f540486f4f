use std::fmt;
use std::num::ParseIntError;

/// Failure to parse one `name:type` token.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamParseError {
    /// Name or type part was empty.
    Empty,
    /// `{X:Type}` generic declaration. Not a parameter; the definition
    /// parser consumes it.
    TypeDef {
        /// Declared generic name, `X` in `{X:Type}`.
        name: String,
    },
    /// A `{…}` block that does not declare a generic, or a reference to a
    /// generic / flags word that was never declared.
    MissingDef,
    /// `name.N?Type` with a missing name, a non-numeric bit or a bit ≥ 32.
    InvalidFlag,
    /// `Type<arg` without the closing `>`.
    InvalidGeneric,
    /// Token without `:`, as in the builtin `int ? = Int;` lines.
    NotImplemented,
}

impl fmt::Display for ParamParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty parameter name or type"),
            Self::TypeDef { name } => write!(f, "generic declaration {{{name}:Type}}"),
            Self::MissingDef => write!(f, "reference to an undeclared generic or flags word"),
            Self::InvalidFlag => write!(f, "malformed flag guard"),
            Self::InvalidGeneric => write!(f, "generic argument is missing its closing `>`"),
            Self::NotImplemented => write!(f, "parameter has no `:type`"),
        }
    }
}

impl std::error::Error for ParamParseError {}

/// Failure to parse one complete definition.
#[derive(Clone, Debug, PartialEq)]
pub enum ParseError {
    /// Nothing but whitespace.
    Empty,
    /// No `= Type` part.
    MissingType,
    /// Missing name, or an empty namespace component.
    MissingName,
    /// The `#id` is not valid hexadecimal.
    InvalidId(ParseIntError),
    /// One of the parameters failed to parse.
    InvalidParam(ParamParseError),
    /// Syntax outside the supported subset (builtin pseudo-definitions).
    NotImplemented,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty definition"),
            Self::MissingType => write!(f, "definition has no `= Type`"),
            Self::MissingName => write!(f, "definition name is missing or malformed"),
            Self::InvalidId(e) => write!(f, "bad constructor id: {e}"),
            Self::InvalidParam(e) => write!(f, "bad parameter: {e}"),
            Self::NotImplemented => write!(f, "unsupported TL syntax"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidId(e) => Some(e),
            Self::InvalidParam(e) => Some(e),
            _ => None,
        }
    }
}

/// A [`ParseError`] located in the schema text.
#[derive(Clone, Debug, PartialEq)]
pub struct SchemaError {
    /// 1-based line on which the failing definition starts.
    pub line: usize,
    /// What went wrong.
    pub error: ParseError,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}

impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
