//! A minimal owned element tree built from the report text.
//!
//! Only element names and nesting are kept; the tally never looks at text,
//! attributes, or comments.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed XML at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("Unexpected closing tag </{0}>")]
    UnexpectedClose(String),

    #[error("Element <{0}> is never closed")]
    Unclosed(String),

    #[error("Content after the root element at byte {0}")]
    TrailingContent(u64),

    #[error("Document has no root element")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Builder-style child append, mostly for tests.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// First direct child named `name`.
    pub fn find_child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Number of direct children named `name`.
    pub fn count_children(&self, name: &str) -> usize {
        self.children.iter().filter(|c| c.name == name).count()
    }

    /// First element named `name` below this one, in document order.
    /// `self` is never returned.
    pub fn find_descendant(&self, name: &str) -> Option<&Element> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(name) {
                return Some(found);
            }
        }
        None
    }
}

/// Parse `text` into its single root element.
pub fn parse(text: &str) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().check_end_names = true;

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|source| ParseError::Xml {
            position: reader.error_position() as u64,
            source,
        })?;
        match event {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(ParseError::TrailingContent(reader.buffer_position() as u64));
                }
                stack.push(Element::new(element_name(&start)));
            }
            Event::Empty(start) => {
                if !attach(&mut stack, &mut root, Element::new(element_name(&start))) {
                    return Err(ParseError::TrailingContent(reader.buffer_position() as u64));
                }
            }
            Event::End(end) => {
                let Some(element) = stack.pop() else {
                    let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                    return Err(ParseError::UnexpectedClose(name));
                };
                if !attach(&mut stack, &mut root, element) {
                    return Err(ParseError::TrailingContent(reader.buffer_position() as u64));
                }
            }
            Event::Text(text) if stack.is_empty() => {
                if !text.iter().all(u8::is_ascii_whitespace) {
                    return Err(ParseError::TrailingContent(reader.buffer_position() as u64));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(ParseError::Unclosed(open.name));
    }
    root.ok_or(ParseError::Empty)
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

/// Hang `element` under the innermost open element, or make it the root.
/// Returns false when a root already exists.
fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> bool {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        true
    } else if root.is_none() {
        *root = Some(element);
        true
    } else {
        false
    }
}
