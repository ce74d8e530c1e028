//! Error types for the xmldoc library.

use crate::tree::NodeId;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// 1-based position inside a markup text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupFault {
    #[error("unterminated tag")]
    UnterminatedTag,
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("unterminated CDATA section")]
    UnterminatedCdata,
    #[error("unterminated processing instruction")]
    UnterminatedProcessingInstruction,
    #[error("unterminated attribute value")]
    UnterminatedAttribute,
    #[error("invalid name `{0}`")]
    InvalidName(String),
    #[error("attribute `{0}` has an unquoted value")]
    UnquotedAttribute(String),
    #[error("attribute `{0}` is missing a value")]
    MissingAttributeValue(String),
    #[error("duplicate attribute `{0}`")]
    DuplicateAttribute(String),
    #[error("`<` is not allowed in attribute values")]
    LessThanInAttribute,
    #[error("end tag `</{found}>` does not match start tag `<{expected}>`")]
    MismatchedEndTag { expected: String, found: String },
    #[error("unexpected end tag `</{0}>`")]
    UnexpectedEndTag(String),
    #[error("element `<{0}>` is never closed")]
    UnclosedElement(String),
    #[error("unknown entity `&{0};`")]
    UnknownEntity(String),
    #[error("malformed entity reference")]
    MalformedEntity,
}

/// A markup text that is not well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{fault} at {position}")]
pub struct MarkupError {
    pub fault: MarkupFault,
    pub position: Position,
}

/// Failure to load a module's documentation file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed documentation file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: MarkupError,
    },
    #[error("documentation file {0} redirects more than once")]
    RedirectLoop(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node {0} has no parent")]
    NoParent(NodeId),
    #[error("node {anchor} is not a child of {parent}")]
    NotAChild { parent: NodeId, anchor: NodeId },
}

/// Malformed markup found while attaching documentation, with the member it
/// belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed documentation for {key}: {}\n   at {}", .source.fault, .source.position)]
pub struct DocFailure {
    pub key: String,
    pub source: MarkupError,
}
