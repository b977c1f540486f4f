use std::fmt;
use std::str::FromStr;

use crate::errors::ParamParseError;
use crate::tl::{Flag, Type};

/// What a parameter holds on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParameterType {
    /// `name:#`, a flags word. Its value is derived from the optional
    /// parameters that name it, never stored.
    Flags,
    /// A value of type `ty`, present only when `flag` is set (if any).
    Normal {
        /// Declared type.
        ty: Type,
        /// Guard for optional parameters.
        flag: Option<Flag>,
    },
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flags => f.write_str("#"),
            Self::Normal { ty, flag: Some(flag) } => write!(f, "{}.{}?{ty}", flag.name, flag.index),
            Self::Normal { ty, flag: None } => write!(f, "{ty}"),
        }
    }
}

impl FromStr for ParameterType {
    type Err = ParamParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "#" {
            return Ok(Self::Flags);
        }

        let Some((guard, ty)) = s.split_once('?') else {
            return Ok(Self::Normal { ty: s.parse()?, flag: None });
        };

        let (name, index) = guard.split_once('.').ok_or(ParamParseError::InvalidFlag)?;
        let index: u32 = index.parse().map_err(|_| ParamParseError::InvalidFlag)?;
        if name.is_empty() || index >= u32::BITS || ty.contains('?') {
            return Err(ParamParseError::InvalidFlag);
        }

        Ok(Self::Normal {
            ty: ty.parse()?,
            flag: Some(Flag { name: name.to_owned(), index }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ParameterType;
    use crate::errors::ParamParseError;

    #[test]
    fn flag_bit_must_fit_in_a_word() {
        assert!("flags.31?int".parse::<ParameterType>().is_ok());
        assert_eq!("flags.32?int".parse::<ParameterType>(), Err(ParamParseError::InvalidFlag));
        assert_eq!("flags.x?int".parse::<ParameterType>(), Err(ParamParseError::InvalidFlag));
    }

    #[test]
    fn displays_back_to_source_form() {
        for src in ["#", "flags2.4?Vector<long>", "string"] {
            assert_eq!(src.parse::<ParameterType>().unwrap().to_string(), src);
        }
    }
}
