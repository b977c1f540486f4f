//! Line-oriented driver behind [`crate::parse_tl_file`] and [`crate::Schema`].

use std::str::FromStr;

use crate::errors::ParseError;
use crate::tl::{Category, Definition};

/// Yields `(start_line, result)` for every `;`-terminated definition.
pub(crate) struct TlIterator<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    category: Category,
    /// Text of a definition that has not reached its `;` yet.
    pending: String,
    /// 1-based line where `pending` started.
    pending_line: usize,
}

impl<'a> TlIterator<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self {
            lines: src.lines().enumerate(),
            category: Category::Types,
            pending: String::new(),
            pending_line: 0,
        }
    }

    /// Applies a section separator; `lines` stays borrowed by the caller.
    fn switch_category(current: &mut Category, line: &str) -> bool {
        *current = match line {
            "---functions---" => Category::Functions,
            "---types---" => Category::Types,
            _ => return false,
        };
        true
    }
}

impl Iterator for TlIterator<'_> {
    type Item = (usize, Result<Definition, ParseError>);

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, line) in self.lines.by_ref() {
            let line = line.trim();
            if line.is_empty() || line.starts_with("//") || Self::switch_category(&mut self.category, line) {
                continue;
            }

            if self.pending.is_empty() {
                self.pending_line = idx + 1;
            } else {
                self.pending.push(' ');
            }
            self.pending.push_str(line);

            if !line.ends_with(';') {
                continue;
            }

            let raw = std::mem::take(&mut self.pending);
            let raw = raw.trim_end_matches(';').trim();
            if raw.is_empty() {
                continue;
            }

            let category = self.category;
            let parsed = Definition::from_str(raw).map(|def| Definition { category, ..def });
            return Some((self.pending_line, parsed));
        }
        None
    }
}
