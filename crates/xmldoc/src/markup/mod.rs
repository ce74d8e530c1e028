//! Documentation markup: well-formedness checking and line reduction.

pub mod lines;
pub mod reader;

pub use lines::{DocLines, MarkupLine};
pub use reader::{unescape, Attribute, Event, Reader};

use crate::error::MarkupError;

/// Check `text` and hand back its rendered lines.
///
/// The whole text is validated up front, so a malformed member fails here
/// before a single line reaches the tree. Iterating the result cannot fail.
pub fn reduce(text: &str) -> Result<DocLines<'_>, MarkupError> {
    Reader::check(text)?;
    Ok(DocLines::new(text))
}
