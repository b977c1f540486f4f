//! Parser for Telegram's [Type Language] schema text.
//!
//! The codec in `tlcodec` uses the [`Definition`]s produced here to build
//! schema-driven objects at runtime, without a code-generation step.
//!
//! ```rust
//! use tlcodec_schema::Schema;
//!
//! let schema = Schema::parse("
//! // LAYER 181
//! userStatusEmpty#9d05049 = UserStatus;
//! userStatusOnline#edb93949 expires:int = UserStatus;
//! ").unwrap();
//!
//! assert_eq!(schema.layer, Some(181));
//! assert_eq!(schema.definitions.len(), 2);
//! ```
//!
//! [Type Language]: https://core.telegram.org/mtproto/TL

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Parse error types.
pub mod errors;
pub mod tl;
mod iterator;
mod schema;
mod utils;

use errors::ParseError;
use tl::Definition;

pub use schema::Schema;

/// Lazily parses TL schema text, one [`Definition`] per `;`-terminated item.
///
/// `//` comments and blank lines are skipped, definitions may span several
/// lines, and `---functions---` / `---types---` select the [`tl::Category`]
/// of what follows. Errors are yielded in place so the caller picks between
/// skipping and failing.
pub fn parse_tl_file(contents: &str) -> impl Iterator<Item = Result<Definition, ParseError>> + '_ {
    iterator::TlIterator::new(contents).map(|(_, result)| result)
}
