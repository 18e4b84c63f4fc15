//! Tag vocabulary shared by the selector parser and the scanner

use indexmap::IndexMap;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::ops::Range;
use std::sync::LazyLock;

/// Attributes of a located tag, keyed by name as written in the markup
pub type Attributes = IndexMap<String, String>;

/// Elements that never take a closing tag
///
/// See <https://developer.mozilla.org/en-US/docs/Web/HTML/Element>
pub const SINGLE_TAGS: [&str; 15] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "rb",
    "source", "track", "wbr",
];

// <tag ...>, </tag> and <tag .../>; group 1 is the closing sign
#[allow(clippy::expect_used)]
pub(crate) static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9:-]*)([^>]*)>").expect("tag pattern compiles")
});

#[allow(clippy::expect_used)]
static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([\w:-]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .expect("attribute pattern compiles")
});

pub fn is_single(tag_name: &str) -> bool {
    SINGLE_TAGS
        .iter()
        .any(|single| single.eq_ignore_ascii_case(tag_name))
}

/// Parses the raw text between a tag name and its `>`
pub fn parse_attributes(raw: &str) -> Attributes {
    let mut attributes = Attributes::new();

    for caps in ATTRIBUTE_RE.captures_iter(raw) {
        let Some(name) = caps.get(1) else { continue };
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map_or("", |m| m.as_str());

        attributes.insert(name.as_str().to_string(), value.to_string());
    }

    attributes
}

/// Byte offsets of a located tag inside the searched buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Positions {
    /// `[content_start, content_end, tag_start, tag_end]`
    Paired {
        content_start: usize,
        content_end: usize,
        tag_start: usize,
        tag_end: usize,
    },
    /// `[tag_start, tag_end]`
    Single { tag_start: usize, tag_end: usize },
}

impl Positions {
    /// Range between the opening and the closing tag
    pub fn content(&self) -> Option<Range<usize>> {
        match *self {
            Self::Paired {
                content_start,
                content_end,
                ..
            } => Some(content_start..content_end),
            Self::Single { .. } => None,
        }
    }

    /// Range covering the tags themselves
    pub fn outer(&self) -> Range<usize> {
        match *self {
            Self::Paired {
                tag_start, tag_end, ..
            }
            | Self::Single { tag_start, tag_end } => tag_start..tag_end,
        }
    }

    /// Range a nested search is confined to
    pub fn scope(&self) -> Range<usize> {
        self.content().unwrap_or_else(|| self.outer())
    }

    /// The slot form: four offsets for paired tags, two for single ones
    pub fn to_vec(&self) -> Vec<usize> {
        match *self {
            Self::Paired {
                content_start,
                content_end,
                tag_start,
                tag_end,
            } => vec![content_start, content_end, tag_start, tag_end],
            Self::Single { tag_start, tag_end } => vec![tag_start, tag_end],
        }
    }
}

impl Serialize for Positions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_vec().serialize(serializer)
    }
}

/// A located occurrence of a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagMatch {
    pub name: String,
    pub attributes: Attributes,
    pub positions: Positions,
}

impl TagMatch {
    pub(crate) fn single(name: &str, attributes: Attributes, tag: Range<usize>) -> Self {
        Self {
            name: name.to_string(),
            attributes,
            positions: Positions::Single {
                tag_start: tag.start,
                tag_end: tag.end,
            },
        }
    }

    /// A paired tag whose closing tag has not been seen yet
    pub(crate) fn opened(name: &str, attributes: Attributes, tag: Range<usize>) -> Self {
        Self {
            name: name.to_string(),
            attributes,
            positions: Positions::Paired {
                content_start: tag.end,
                content_end: tag.end,
                tag_start: tag.start,
                tag_end: tag.end,
            },
        }
    }

    /// Records the closing tag found at `closing`
    pub(crate) fn close(&mut self, closing: Range<usize>) {
        if let Positions::Paired {
            content_end,
            tag_end,
            ..
        } = &mut self.positions
        {
            *content_end = closing.start;
            *tag_end = closing.end;
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}
