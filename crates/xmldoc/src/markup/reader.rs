//! Pull reader for documentation markup.
//!
//! Checks well-formedness while it tokenizes: tags must nest, attribute
//! values must be quoted, entity references must be known. Text is handed
//! out raw (entities still escaped); use [`unescape`] when decoded text is
//! needed.
//!
//! The reader accepts fragments: any number of top-level elements and bare
//! text, as if the input were wrapped in a synthetic root.

use crate::error::{MarkupError, MarkupFault, Position};
use regex::Regex;
use std::borrow::Cow;
use std::ops::Range;
use std::sync::LazyLock;

static RE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}_:][\p{L}\p{N}_:.\-]*").unwrap());

static RE_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^&(#[0-9]+|#x[0-9A-Fa-f]+|[\p{L}_:][\p{L}\p{N}_:.\-]*);").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    /// Value between the quotes, entities not yet decoded.
    pub raw_value: &'a str,
}

impl<'a> Attribute<'a> {
    pub fn value(&self) -> Cow<'a, str> {
        // Validated by the reader, so decoding cannot fail here.
        unescape(self.raw_value).unwrap_or(Cow::Borrowed(self.raw_value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<'a> {
    Start {
        name: &'a str,
        attributes: Vec<Attribute<'a>>,
        /// `<br/>` style element; no matching `End` follows.
        empty: bool,
        /// Byte range of the whole tag, `<` through `>`.
        span: Range<usize>,
    },
    End {
        name: &'a str,
        span: Range<usize>,
    },
    Text(&'a str),
    CData(&'a str),
    Comment(&'a str),
    ProcessingInstruction(&'a str),
    Doctype(&'a str),
}

pub struct Reader<'a> {
    src: &'a str,
    pos: usize,
    open: Vec<&'a str>,
    done: bool,
}

impl<'a> Reader<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            open: Vec::new(),
            done: false,
        }
    }

    /// Number of elements currently open.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Read to the end, returning the first fault if any.
    pub fn check(src: &str) -> Result<(), MarkupError> {
        for event in Reader::new(src) {
            event?;
        }
        Ok(())
    }

    /// Skip the raw content of the element `name` that was just opened, up to
    /// and including its end tag, and return the content's byte range.
    ///
    /// The content is not checked. Nested elements with the same name are not
    /// tracked; the first matching end tag closes it.
    pub fn read_to_end(&mut self, name: &str) -> Result<Range<usize>, MarkupError> {
        let src = self.src;
        let body = self.pos;
        let close = format!("</{}", name);
        let mut from = body;
        while let Some(i) = src[from..].find(&close) {
            let tag = from + i;
            let after = tag + close.len();
            let rest = &src[after..];
            let trimmed = rest.trim_start();
            if trimmed.starts_with('>') {
                self.pos = after + (rest.len() - trimmed.len()) + 1;
                if self.open.last() == Some(&name) {
                    self.open.pop();
                }
                return Ok(body..tag);
            }
            from = after;
        }
        self.fail(MarkupFault::UnclosedElement(name.to_string()), src.len())
    }

    fn fail<T>(&mut self, fault: MarkupFault, offset: usize) -> Result<T, MarkupError> {
        self.done = true;
        Err(MarkupError {
            fault,
            position: position_of(self.src, offset),
        })
    }

    fn read_event(&mut self) -> Result<Event<'a>, MarkupError> {
        let src = self.src;
        let start = self.pos;
        let rest = &src[start..];

        if !rest.starts_with('<') {
            let end = rest.find('<').map_or(src.len(), |i| start + i);
            let text = &src[start..end];
            if let Err((fault, at)) = check_entities(text) {
                return self.fail(fault, start + at);
            }
            self.pos = end;
            return Ok(Event::Text(text));
        }

        if rest.starts_with("<!--") {
            let body = start + 4;
            return match src[body..].find("-->") {
                Some(i) => {
                    self.pos = body + i + 3;
                    Ok(Event::Comment(&src[body..body + i]))
                }
                None => self.fail(MarkupFault::UnterminatedComment, start),
            };
        }

        if rest.starts_with("<![CDATA[") {
            let body = start + 9;
            return match src[body..].find("]]>") {
                Some(i) => {
                    self.pos = body + i + 3;
                    Ok(Event::CData(&src[body..body + i]))
                }
                None => self.fail(MarkupFault::UnterminatedCdata, start),
            };
        }

        if rest.starts_with("<?") {
            let body = start + 2;
            return match src[body..].find("?>") {
                Some(i) => {
                    self.pos = body + i + 2;
                    Ok(Event::ProcessingInstruction(&src[body..body + i]))
                }
                None => self.fail(MarkupFault::UnterminatedProcessingInstruction, start),
            };
        }

        if rest.starts_with("<!") {
            let body = start + 2;
            return match src[body..].find('>') {
                Some(i) => {
                    self.pos = body + i + 1;
                    Ok(Event::Doctype(&src[body..body + i]))
                }
                None => self.fail(MarkupFault::UnterminatedTag, start),
            };
        }

        if rest.starts_with("</") {
            return self.read_end_tag(start);
        }

        self.read_start_tag(start)
    }

    fn read_name(&mut self, at: usize) -> Result<&'a str, MarkupError> {
        let src = self.src;
        match RE_NAME.find(&src[at..]) {
            Some(m) => {
                self.pos = at + m.end();
                Ok(&src[at..at + m.end()])
            }
            None if at >= src.len() => self.fail(MarkupFault::UnterminatedTag, at),
            None => {
                let bad: String = src[at..]
                    .chars()
                    .take_while(|c| !c.is_whitespace() && *c != '>' && *c != '/')
                    .collect();
                self.fail(MarkupFault::InvalidName(bad), at)
            }
        }
    }

    fn skip_whitespace(&mut self) {
        let src = self.src;
        let rest = &src[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn read_end_tag(&mut self, start: usize) -> Result<Event<'a>, MarkupError> {
        let src = self.src;
        let name = self.read_name(start + 2)?;
        self.skip_whitespace();
        if !src[self.pos..].starts_with('>') {
            return self.fail(MarkupFault::UnterminatedTag, start);
        }
        self.pos += 1;

        match self.open.pop() {
            Some(expected) if expected == name => Ok(Event::End {
                name,
                span: start..self.pos,
            }),
            Some(expected) => self.fail(
                MarkupFault::MismatchedEndTag {
                    expected: expected.to_string(),
                    found: name.to_string(),
                },
                start,
            ),
            None => self.fail(MarkupFault::UnexpectedEndTag(name.to_string()), start),
        }
    }

    fn read_start_tag(&mut self, start: usize) -> Result<Event<'a>, MarkupError> {
        let src = self.src;
        let name = self.read_name(start + 1)?;
        let mut attributes: Vec<Attribute<'a>> = Vec::new();

        loop {
            let before = self.pos;
            self.skip_whitespace();
            let separated = self.pos > before;
            let rest = &src[self.pos..];
            if rest.is_empty() {
                return self.fail(MarkupFault::UnterminatedTag, start);
            }
            if rest.starts_with('>') {
                self.pos += 1;
                self.open.push(name);
                return Ok(Event::Start {
                    name,
                    attributes,
                    empty: false,
                    span: start..self.pos,
                });
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                return Ok(Event::Start {
                    name,
                    attributes,
                    empty: true,
                    span: start..self.pos,
                });
            }

            // Attributes need whitespace before them
            if !separated {
                return self.fail(MarkupFault::UnterminatedTag, self.pos);
            }
            let attr_start = self.pos;
            let attr_name = self.read_name(attr_start)?;
            self.skip_whitespace();
            if !src[self.pos..].starts_with('=') {
                return self.fail(
                    MarkupFault::MissingAttributeValue(attr_name.to_string()),
                    attr_start,
                );
            }
            self.pos += 1;
            self.skip_whitespace();

            let quote = match src[self.pos..].chars().next() {
                Some(q @ ('"' | '\'')) => q,
                Some(_) => {
                    return self.fail(
                        MarkupFault::UnquotedAttribute(attr_name.to_string()),
                        attr_start,
                    )
                }
                None => return self.fail(MarkupFault::UnterminatedTag, start),
            };
            let value_start = self.pos + 1;
            let value_end = match src[value_start..].find(quote) {
                Some(i) => value_start + i,
                None => return self.fail(MarkupFault::UnterminatedAttribute, attr_start),
            };
            let raw_value = &src[value_start..value_end];
            if let Some(i) = raw_value.find('<') {
                return self.fail(MarkupFault::LessThanInAttribute, value_start + i);
            }
            if let Err((fault, at)) = check_entities(raw_value) {
                return self.fail(fault, value_start + at);
            }
            if attributes.iter().any(|a| a.name == attr_name) {
                return self.fail(
                    MarkupFault::DuplicateAttribute(attr_name.to_string()),
                    attr_start,
                );
            }
            attributes.push(Attribute {
                name: attr_name,
                raw_value,
            });
            self.pos = value_end + 1;
        }
    }
}

impl<'a> Iterator for Reader<'a> {
    type Item = Result<Event<'a>, MarkupError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.pos >= self.src.len() {
            self.done = true;
            return self.open.last().map(|name| {
                Err(MarkupError {
                    fault: MarkupFault::UnclosedElement(name.to_string()),
                    position: position_of(self.src, self.src.len()),
                })
            });
        }
        Some(self.read_event())
    }
}

/// Byte offset → 1-based line and column (columns count chars).
fn position_of(src: &str, offset: usize) -> Position {
    let before = &src[..offset.min(src.len())];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    Position {
        line,
        column: before[line_start..].chars().count() + 1,
    }
}

/// Validate every `&` reference in `text`. Returns the fault and its byte
/// offset within `text`.
fn check_entities(text: &str) -> Result<(), (MarkupFault, usize)> {
    for (i, _) in text.match_indices('&') {
        let caps = RE_ENTITY
            .captures(&text[i..])
            .ok_or((MarkupFault::MalformedEntity, i))?;
        decode_reference(&caps[1]).ok_or_else(|| {
            if caps[1].starts_with('#') {
                (MarkupFault::MalformedEntity, i)
            } else {
                (MarkupFault::UnknownEntity(caps[1].to_string()), i)
            }
        })?;
    }
    Ok(())
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code).filter(|&c| c != '\0')
        }
    }
}

/// Decode entity and character references.
pub fn unescape(raw: &str) -> Result<Cow<'_, str>, MarkupFault> {
    if !raw.contains('&') {
        return Ok(Cow::Borrowed(raw));
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(i) = rest.find('&') {
        out.push_str(&rest[..i]);
        let caps = RE_ENTITY
            .captures(&rest[i..])
            .ok_or(MarkupFault::MalformedEntity)?;
        let c = decode_reference(&caps[1])
            .ok_or_else(|| MarkupFault::UnknownEntity(caps[1].to_string()))?;
        out.push(c);
        rest = &rest[i + caps[0].len()..];
    }
    out.push_str(rest);
    Ok(Cow::Owned(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fault_of(src: &str) -> MarkupError {
        Reader::check(src).unwrap_err()
    }

    #[test]
    fn accepts_fragment_with_several_roots() {
        let src = "<summary>Adds <c>x</c> &amp; <see cref=\"T:A.B\"/>.</summary>\n<returns>sum</returns>";
        assert!(Reader::check(src).is_ok());
    }

    #[test]
    fn yields_events_in_order() {
        let events: Vec<Event> = Reader::new("<a k='v'>t<b/></a>")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            events[0],
            Event::Start {
                name: "a",
                attributes: vec![Attribute {
                    name: "k",
                    raw_value: "v"
                }],
                empty: false,
                span: 0..9,
            }
        );
        assert_eq!(events[1], Event::Text("t"));
        assert_eq!(
            events[2],
            Event::Start {
                name: "b",
                attributes: vec![],
                empty: true,
                span: 10..14,
            }
        );
        assert_eq!(events[3], Event::End { name: "a", span: 14..18 });
        assert_eq!(events.len(), 4);
    }

    #[test]
    fn comments_cdata_and_declarations() {
        let src = "<?xml version=\"1.0\"?><!DOCTYPE doc><doc><!-- <x> --><![CDATA[a < b]]></doc>";
        let events: Vec<Event> = Reader::new(src).collect::<Result<_, _>>().unwrap();
        assert!(events.contains(&Event::Comment(" <x> ")));
        assert!(events.contains(&Event::CData("a < b")));
        assert!(events.contains(&Event::ProcessingInstruction("xml version=\"1.0\"")));
    }

    #[test]
    fn read_to_end_skips_raw_content() {
        let src = "<m><p>bad & raw</m ><n/>";
        let mut reader = Reader::new(src);
        assert!(matches!(reader.next(), Some(Ok(Event::Start { name: "m", .. }))));
        let body = reader.read_to_end("m").unwrap();
        assert_eq!(&src[body], "<p>bad & raw");
        assert_eq!(reader.depth(), 0);
        assert!(matches!(reader.next(), Some(Ok(Event::Start { name: "n", empty: true, .. }))));
        assert!(reader.next().is_none());
    }

    #[test]
    fn read_to_end_without_end_tag() {
        let mut reader = Reader::new("<m>text</mx>");
        reader.next();
        let err = reader.read_to_end("m").unwrap_err();
        assert_eq!(err.fault, MarkupFault::UnclosedElement("m".into()));
        assert!(reader.next().is_none());
    }

    #[test]
    fn unclosed_element_is_reported_at_end() {
        let err = fault_of("<summary>\n  text\n");
        assert_eq!(err.fault, MarkupFault::UnclosedElement("summary".into()));
        assert_eq!(err.position, Position { line: 3, column: 1 });
    }

    #[test]
    fn unterminated_tag() {
        let err = fault_of("<summary>ok</summary>\n<param name=\"x\"");
        assert_eq!(err.fault, MarkupFault::UnterminatedTag);
        assert_eq!(err.position.line, 2);
    }

    #[test]
    fn mismatched_end_tag() {
        let err = fault_of("<summary><para>x</summary>");
        assert_eq!(
            err.fault,
            MarkupFault::MismatchedEndTag {
                expected: "para".into(),
                found: "summary".into()
            }
        );
        assert_eq!(err.position, Position { line: 1, column: 17 });
    }

    #[test]
    fn stray_end_tag() {
        assert_eq!(fault_of("text</p>").fault, MarkupFault::UnexpectedEndTag("p".into()));
    }

    #[test]
    fn attributes_must_be_separated() {
        let err = fault_of("<see cref='a'langword='b'/>");
        assert_eq!(err.fault, MarkupFault::UnterminatedTag);
        assert_eq!(err.position, Position { line: 1, column: 14 });
        assert!(Reader::check("<see cref='a' langword='b'/>").is_ok());
        assert!(Reader::check("<see\n  cref='a'\n  langword='b'/>").is_ok());
    }

    #[test]
    fn attribute_faults() {
        assert_eq!(
            fault_of("<see cref=T:A/>").fault,
            MarkupFault::UnquotedAttribute("cref".into())
        );
        assert_eq!(
            fault_of("<see cref/>").fault,
            MarkupFault::MissingAttributeValue("cref".into())
        );
        assert_eq!(
            fault_of("<p a='1' a='2'/>").fault,
            MarkupFault::DuplicateAttribute("a".into())
        );
        assert_eq!(fault_of("<p a='<'/>").fault, MarkupFault::LessThanInAttribute);
        assert_eq!(fault_of("<p a='x/>").fault, MarkupFault::UnterminatedAttribute);
    }

    #[test]
    fn entity_faults() {
        assert_eq!(fault_of("a & b").fault, MarkupFault::MalformedEntity);
        assert_eq!(fault_of("&nbsp;").fault, MarkupFault::UnknownEntity("nbsp".into()));
        assert_eq!(fault_of("&#0;").fault, MarkupFault::MalformedEntity);
        assert!(Reader::check("&#65;&#x42;&lt;").is_ok());
    }

    #[test]
    fn unterminated_comment_and_cdata() {
        assert_eq!(fault_of("<!-- open").fault, MarkupFault::UnterminatedComment);
        assert_eq!(fault_of("<![CDATA[ open").fault, MarkupFault::UnterminatedCdata);
    }

    #[test]
    fn invalid_name() {
        assert_eq!(fault_of("< summary>").fault, MarkupFault::InvalidName(String::new()));
        assert_eq!(fault_of("<1a>").fault, MarkupFault::InvalidName("1a".into()));
    }

    #[test]
    fn reader_stops_after_first_fault() {
        let mut reader = Reader::new("</a></b>");
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }

    #[test]
    fn unescape_decodes_references() {
        assert_eq!(unescape("a &lt;b&gt; &#65;&#x42;").unwrap(), "a <b> AB");
        assert!(matches!(unescape("plain").unwrap(), Cow::Borrowed("plain")));
    }

    #[test]
    fn attribute_value_is_decoded() {
        let attr = Attribute {
            name: "name",
            raw_value: "M:A.B(System.Collections.Generic.List{System.Int32})&amp;",
        };
        assert_eq!(
            attr.value(),
            "M:A.B(System.Collections.Generic.List{System.Int32})&"
        );
    }
}
