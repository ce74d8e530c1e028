//! In-memory documentation store for one module.
//!
//! Built from a documentation file:
//!
//! ```text
//! <doc>
//!   <assembly><name>Acme.Core</name></assembly>
//!   <members>
//!     <member name="T:Acme.Widget">
//!       <summary>...</summary>
//!     </member>
//!   </members>
//! </doc>
//! ```
//!
//! Member text is kept verbatim: whatever sits between `<member>` and
//! `</member>`, markup and indentation included.

use crate::error::MarkupError;
use crate::markup::{Event, Reader};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone)]
pub struct DocumentationStore {
    assembly: Option<String>,
    redirect: Option<String>,
    members: HashMap<String, String>,
    source: Option<PathBuf>,
}

impl DocumentationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whole documentation file.
    ///
    /// The file structure must be well-formed; member bodies are taken raw
    /// and only checked when a declaration asks for them.
    pub fn parse(xml: &str) -> Result<Self, MarkupError> {
        let mut store = Self::default();
        let mut path: Vec<&str> = Vec::new();
        let mut reader = Reader::new(xml);

        while let Some(event) = reader.next() {
            match event? {
                Event::Start {
                    name,
                    attributes,
                    empty,
                    ..
                } => {
                    if path.is_empty() && name == "doc" {
                        store.redirect = attributes
                            .iter()
                            .find(|a| a.name == "redirect")
                            .map(|a| a.value().into_owned());
                    }
                    let key = (name == "member")
                        .then(|| attributes.iter().find(|a| a.name == "name"))
                        .flatten()
                        .map(|a| a.value().into_owned());
                    match key {
                        Some(key) if empty => {
                            store.members.entry(key).or_default();
                        }
                        Some(key) => {
                            let body = reader.read_to_end(name)?;
                            // First definition of a key wins
                            store
                                .members
                                .entry(key)
                                .or_insert_with(|| xml[body].to_string());
                        }
                        None if !empty => path.push(name),
                        None => {}
                    }
                }
                Event::End { .. } => {
                    path.pop();
                }
                Event::Text(text) if path == ["doc", "assembly", "name"] => {
                    store.assembly = Some(text.trim().to_string());
                }
                _ => {}
            }
        }

        Ok(store)
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    /// Add or replace one member's text.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.members.insert(key.into(), text.into());
    }

    /// Raw documentation text for `key`. Whitespace-only text counts as
    /// missing.
    pub fn documentation(&self, key: &str) -> Option<&str> {
        self.members
            .get(key)
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
    }

    /// Assembly name recorded in the file, if any.
    pub fn assembly(&self) -> Option<&str> {
        self.assembly.as_deref()
    }

    /// Target of `<doc redirect="...">`, as written in the file.
    pub fn redirect(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    /// File this store was loaded from.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
