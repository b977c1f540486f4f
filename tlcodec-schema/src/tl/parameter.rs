use std::fmt;
use std::str::FromStr;

use crate::errors::ParamParseError;
use crate::tl::{Flag, ParameterType, Type};

/// One `name:type` item of a definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Parameter {
    /// Name as written in the schema.
    pub name: String,
    /// What it holds.
    pub ty: ParameterType,
}

impl Parameter {
    /// `true` for a `name:#` flags word.
    pub fn is_flags_word(&self) -> bool {
        self.ty == ParameterType::Flags
    }

    /// The guard of an optional parameter.
    pub fn flag(&self) -> Option<&Flag> {
        match &self.ty {
            ParameterType::Normal { flag, .. } => flag.as_ref(),
            ParameterType::Flags => None,
        }
    }

    /// Declared type, `None` for flags words.
    pub fn value_type(&self) -> Option<&Type> {
        match &self.ty {
            ParameterType::Normal { ty, .. } => Some(ty),
            ParameterType::Flags => None,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.ty)
    }
}

impl FromStr for Parameter {
    type Err = ParamParseError;

    /// Parses `flags:#`, `id:long` or `photo:flags.0?InputPhoto`.
    ///
    /// A `{X:Type}` token comes back as `Err(ParamParseError::TypeDef)` for
    /// the definition parser to record.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if let Some(inner) = token.strip_prefix('{') {
            let name = inner.strip_suffix(":Type}").ok_or(ParamParseError::MissingDef)?;
            return Err(ParamParseError::TypeDef { name: name.to_owned() });
        }

        match token.split_once(':') {
            None => Err(ParamParseError::NotImplemented),
            Some(("", _)) | Some((_, "")) => Err(ParamParseError::Empty),
            Some((name, ty)) => Ok(Self { name: name.to_owned(), ty: ty.parse()? }),
        }
    }
}
