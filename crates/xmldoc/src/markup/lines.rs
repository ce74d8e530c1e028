//! Line reduction for documentation markup.
//!
//! Documentation text comes out of the store exactly as it sat inside the
//! `<member>` element, indentation and surrounding blank lines included.
//! [`DocLines`] turns that into the lines a `///` block should show:
//!
//! - leading and trailing blank lines are dropped
//! - the indentation of the first non-blank line is removed from every line
//!   that starts with it
//! - trailing whitespace is trimmed
//! - each interior blank line becomes a [`MarkupLine::Empty`]

use std::str::Lines;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupLine<'a> {
    Empty,
    Content(&'a str),
}

impl MarkupLine<'_> {
    /// Append the rendered text (nothing for an empty line).
    pub fn write_to(&self, out: &mut String) {
        if let MarkupLine::Content(text) = self {
            out.push_str(text);
        }
    }
}

/// Lazy, restartable (`Clone`) iterator over rendered lines.
#[derive(Debug, Clone)]
pub struct DocLines<'a> {
    lines: Lines<'a>,
    indent: &'a str,
    blanks: usize,
    queued: Option<&'a str>,
}

impl<'a> DocLines<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut lines = text.lines();
        let mut queued = None;
        for line in lines.by_ref() {
            if !is_blank(line) {
                queued = Some(line);
                break;
            }
        }
        let indent = queued.map_or("", |first| {
            &first[..first.len() - first.trim_start().len()]
        });
        Self {
            lines,
            indent,
            blanks: 0,
            queued,
        }
    }
}

impl<'a> Iterator for DocLines<'a> {
    type Item = MarkupLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(line) = self.queued {
            if self.blanks > 0 {
                self.blanks -= 1;
                return Some(MarkupLine::Empty);
            }
            self.queued = None;
            return Some(render(self.indent, line));
        }

        // Blank runs are only flushed once a non-blank line follows them, so
        // trailing blanks never come out.
        for line in self.lines.by_ref() {
            if is_blank(line) {
                self.blanks += 1;
                continue;
            }
            if self.blanks > 0 {
                self.blanks -= 1;
                self.queued = Some(line);
                return Some(MarkupLine::Empty);
            }
            return Some(render(self.indent, line));
        }
        None
    }
}

fn render<'a>(indent: &str, line: &'a str) -> MarkupLine<'a> {
    let line = line.strip_prefix(indent).unwrap_or(line);
    MarkupLine::Content(line.trim_end())
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
