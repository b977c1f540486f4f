use std::fmt;
use std::str::FromStr;

use crate::errors::{ParamParseError, ParseError};
use crate::tl::{Category, Parameter, ParameterType, Type};
use crate::utils::tl_id;

/// One constructor or function of the schema.
///
/// ```text
/// userStatusOnline#edb93949 expires:int = UserStatus;
/// ```
/// has `name = "userStatusOnline"`, `id = 0xedb93949`, a single `expires`
/// parameter and `ty = UserStatus`.
#[derive(Clone, Debug, PartialEq)]
pub struct Definition {
    /// Namespace components; empty for the global namespace.
    pub namespace: Vec<String>,
    /// Name without namespace.
    pub name: String,
    /// Constructor ID, explicit or CRC32-derived.
    pub id: u32,
    /// Parameters in wire order.
    pub params: Vec<Parameter>,
    /// The boxed type this constructor builds, or the function's result.
    pub ty: Type,
    /// Section the definition was found in.
    pub category: Category,
}

impl Definition {
    /// `namespace.name`, e.g. `"help.getConfig"`.
    pub fn full_name(&self) -> String {
        let mut name = self.namespace.join(".");
        if !name.is_empty() {
            name.push('.');
        }
        name.push_str(&self.name);
        name
    }

    /// Whether any parameter is guarded by a flag bit.
    pub fn has_optional_params(&self) -> bool {
        self.params.iter().any(|p| p.flag().is_some())
    }

    /// Looks a parameter up by name.
    pub fn param(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{:x}", self.full_name(), self.id)?;

        let mut generics = Vec::new();
        for ty in self.params.iter().filter_map(Parameter::value_type) {
            ty.collect_generic_refs(&mut generics);
        }
        generics.sort_unstable();
        generics.dedup();
        for g in generics {
            write!(f, " {{{g}:Type}}")?;
        }

        for p in &self.params {
            write!(f, " {p}")?;
        }
        write!(f, " = {}", self.ty)
    }
}

impl FromStr for Definition {
    type Err = ParseError;

    /// Parses a single definition. The category defaults to
    /// [`Category::Types`]; the schema iterator overrides it.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim().trim_end_matches(';').trim_end();
        if raw.is_empty() {
            return Err(ParseError::Empty);
        }

        let (lhs, rhs) = raw.split_once('=').ok_or(ParseError::MissingType)?;
        let rhs = rhs.trim();
        if rhs.is_empty() {
            return Err(ParseError::MissingType);
        }
        let mut ty: Type = rhs.parse().map_err(|_| ParseError::MissingType)?;

        let mut tokens = lhs.split_whitespace();
        let head = tokens.next().ok_or(ParseError::MissingName)?;
        let (full_name, explicit_id) = match head.split_once('#') {
            Some((name, id)) => (name, Some(id)),
            None => (head, None),
        };

        let mut path: Vec<&str> = full_name.split('.').collect();
        let name = path.pop().unwrap_or_default();
        if name.is_empty() || path.iter().any(|p| p.is_empty()) {
            return Err(ParseError::MissingName);
        }

        let id = match explicit_id {
            Some(hex) => u32::from_str_radix(hex, 16).map_err(ParseError::InvalidId)?,
            None => tl_id(raw),
        };

        let mut generics: Vec<String> = Vec::new();
        let mut flag_words: Vec<String> = Vec::new();
        let mut params = Vec::new();

        for token in tokens {
            let param = match token.parse::<Parameter>() {
                Ok(param) => param,
                Err(ParamParseError::TypeDef { name }) => {
                    generics.push(name);
                    continue;
                }
                Err(ParamParseError::NotImplemented) => return Err(ParseError::NotImplemented),
                Err(e) => return Err(ParseError::InvalidParam(e)),
            };

            match &param.ty {
                ParameterType::Flags => flag_words.push(param.name.clone()),
                ParameterType::Normal { ty, flag } => {
                    let undeclared_generic = ty.generic_ref && !generics.contains(&ty.name);
                    let undeclared_flag = flag.as_ref().is_some_and(|f| !flag_words.contains(&f.name));
                    if undeclared_generic || undeclared_flag {
                        return Err(ParseError::InvalidParam(ParamParseError::MissingDef));
                    }
                }
            }
            params.push(param);
        }

        if generics.contains(&ty.name) {
            ty.generic_ref = true;
        }

        Ok(Self {
            namespace: path.into_iter().map(String::from).collect(),
            name: name.to_owned(),
            id,
            params,
            ty,
            category: Category::default(),
        })
    }
}
