use std::fmt;
use std::str::FromStr;

use crate::errors::ParamParseError;

/// A type expression such as `int`, `storage.FileType`, `Vector<long>` or `!X`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Type {
    /// Namespace components, `["storage"]` for `storage.FileType`.
    pub namespace: Vec<String>,
    /// Name without namespace.
    pub name: String,
    /// Lowercase first letter or a `%` prefix: a bare type, written without
    /// constructor ID.
    pub bare: bool,
    /// `%Message`: a boxed type written bare, as the body of its only
    /// constructor.
    pub bare_boxed: bool,
    /// `!X`: refers to a generic declared with `{X:Type}`.
    pub generic_ref: bool,
    /// `long` in `Vector<long>`.
    pub generic_arg: Option<Box<Type>>,
}

impl Type {
    /// `namespace.name`, without the generic argument.
    pub fn path(&self) -> String {
        let mut path = self.namespace.join(".");
        if !path.is_empty() {
            path.push('.');
        }
        path.push_str(&self.name);
        path
    }

    /// Whether `path` (as returned by [`Type::path`]) names this type.
    pub fn is(&self, path: &str) -> bool {
        match path.rsplit_once('.') {
            Some((ns, name)) => {
                name == self.name && ns.split('.').eq(self.namespace.iter().map(String::as_str))
            }
            None => self.namespace.is_empty() && path == self.name,
        }
    }

    pub(crate) fn collect_generic_refs<'a>(&'a self, output: &mut Vec<&'a str>) {
        if self.generic_ref {
            output.push(&self.name);
        }
        if let Some(arg) = &self.generic_arg {
            arg.collect_generic_refs(output);
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generic_ref {
            f.write_str("!")?;
        }
        if self.bare_boxed {
            f.write_str("%")?;
        }
        for ns in &self.namespace {
            write!(f, "{ns}.")?;
        }
        f.write_str(&self.name)?;
        match &self.generic_arg {
            Some(arg) => write!(f, "<{arg}>"),
            None => Ok(()),
        }
    }
}

impl FromStr for Type {
    type Err = ParamParseError;

    /// ```
    /// use tlcodec_schema::tl::Type;
    ///
    /// let ty: Type = "Vector<storage.FileType>".parse().unwrap();
    /// assert_eq!(ty.name, "Vector");
    /// assert_eq!(ty.generic_arg.unwrap().path(), "storage.FileType");
    /// assert!("!X".parse::<Type>().unwrap().generic_ref);
    /// assert!("%Message".parse::<Type>().unwrap().bare);
    /// ```
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (raw, generic_ref) = match raw.strip_prefix('!') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };
        let (raw, bare_boxed) = match raw.strip_prefix('%') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };

        let (path, generic_arg) = match raw.split_once('<') {
            Some((path, rest)) => {
                let arg = rest.strip_suffix('>').ok_or(ParamParseError::InvalidGeneric)?;
                (path, Some(Box::new(arg.parse()?)))
            }
            None => (raw, None),
        };

        let mut parts: Vec<&str> = path.split('.').collect();
        let name = parts.pop().unwrap_or_default();
        if name.is_empty() || parts.iter().any(|p| p.is_empty()) {
            return Err(ParamParseError::Empty);
        }

        Ok(Self {
            namespace: parts.into_iter().map(String::from).collect(),
            name: name.to_owned(),
            bare: bare_boxed || name.starts_with(|c: char| c.is_ascii_lowercase()),
            bare_boxed,
            generic_ref,
            generic_arg,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Type;

    #[test]
    fn path_and_is_agree() {
        let ty: Type = "storage.FileType".parse().unwrap();
        assert_eq!(ty.path(), "storage.FileType");
        assert!(ty.is("storage.FileType"));
        assert!(!ty.is("FileType"));
        assert!("Bool".parse::<Type>().unwrap().is("Bool"));
    }

    #[test]
    fn percent_marks_a_boxed_type_bare() {
        let ty: Type = "vector<%Message>".parse().unwrap();
        let elem = ty.generic_arg.as_deref().unwrap();
        assert_eq!(elem.name, "Message");
        assert!(elem.bare && elem.bare_boxed);
        assert!(elem.is("Message"));
        assert_eq!(ty.to_string(), "vector<%Message>");
    }

    #[test]
    fn rejects_unclosed_generic() {
        assert!("Vector<long".parse::<Type>().is_err());
    }
}
