//! XML parser implementation
//!
//! A single left-to-right pass with one tag pattern. Each open element owns
//! a frame holding the node under construction; when the closing tag is
//! consumed the frame decides what the element becomes and hands the value
//! to its parent:
//!
//! - no child tags, no attributes: its trimmed text, or `Null` when empty
//! - no child tags, attributes: a node whose text sits under `&text`
//! - child tags: a node; loose text between children becomes text chunks and
//!   the raw inner/outer markup is captured
//!
//! A name seen twice under one parent becomes a list.

use super::model::{XmlNode, XmlValue};
use crate::{config::ParserConfig, error::Result};
use indexmap::IndexMap;
use regex::Regex;
use std::{ops::Range, sync::LazyLock};
use tracing::{instrument, trace, warn};

#[allow(clippy::expect_used)]
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/)?([:\w-]+)([^>]*?)(/)?>").expect("tag pattern compiles")
});

#[allow(clippy::expect_used)]
static PROLOG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<\?xml(.*?)\?>").expect("prolog pattern compiles"));

#[allow(clippy::expect_used)]
static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([:\w-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("attribute pattern compiles")
});

/// Parses the text between a tag name and its `>`
pub fn parse_attributes(raw: &str) -> IndexMap<String, String> {
    ATTRIBUTE_RE
        .captures_iter(raw)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_string();
            let value = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
            Some((name, value.to_string()))
        })
        .collect()
}

/// Bookkeeping for one open element
struct Frame {
    name: String,
    node: XmlNode,
    has_attributes: bool,
    has_tags: bool,
    tag_start: usize,
    text_start: usize,
    last_position: usize,
    outside_text: String,
}

impl Frame {
    fn document(root: XmlNode, start: usize) -> Self {
        Self {
            name: String::new(),
            node: root,
            has_attributes: false,
            has_tags: false,
            tag_start: 0,
            text_start: start,
            last_position: start,
            outside_text: String::new(),
        }
    }

    fn element(name: &str, attributes: IndexMap<String, String>, tag: Range<usize>) -> Self {
        Self {
            name: name.to_string(),
            has_attributes: !attributes.is_empty(),
            node: XmlNode::with_attributes(attributes),
            has_tags: false,
            tag_start: tag.start,
            text_start: tag.end,
            last_position: tag.end,
            outside_text: String::new(),
        }
    }

    fn is_document(&self) -> bool {
        self.name.is_empty()
    }

    /// Takes in the loose text before a child tag starting at `upto`
    fn absorb_text(&mut self, input: &str, upto: usize) {
        self.has_tags = true;
        if self.is_document() {
            return;
        }

        let segment = input.get(self.last_position..upto).unwrap_or_default();
        self.outside_text.push_str(segment);

        let chunk = segment.trim();
        if !chunk.is_empty() {
            self.node.text.push(chunk.to_string());
        }
    }

    /// Turns the frame into the value its parent stores
    fn finish(mut self, input: &str, closing: Range<usize>) -> (String, XmlValue) {
        let tail = input
            .get(self.last_position..closing.start)
            .unwrap_or_default();

        if self.has_tags {
            self.absorb_text(input, closing.start);

            if self.outside_text.chars().any(|c| !c.is_whitespace()) {
                let inner = input.get(self.text_start..closing.start).unwrap_or_default();
                let outer = input.get(self.tag_start..closing.end).unwrap_or_default();
                self.node.inner_text = Some(inner.trim().to_string());
                self.node.outer_text = Some(outer.trim().to_string());
            }

            return (self.name, XmlValue::Node(self.node));
        }

        let text = tail.trim();
        let value = if self.has_attributes {
            if !text.is_empty() {
                self.node.text.push(text.to_string());
            }
            XmlValue::Node(self.node)
        } else if text.is_empty() {
            XmlValue::Null
        } else {
            XmlValue::Text(text.to_string())
        };

        (self.name, value)
    }
}

/// XML parser
#[derive(Debug)]
pub struct XmlParser<'a> {
    input: &'a str,
    config: ParserConfig,
}

impl<'a> XmlParser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_config(input, ParserConfig::default())
    }

    pub fn with_config(input: &'a str, config: ParserConfig) -> Self {
        Self { input, config }
    }

    /// Parses the whole input into the document root
    ///
    /// The root carries the prolog attributes (`version`, `encoding` with
    /// a lower-cased value) and the top-level elements as children.
    #[instrument(level = "debug", skip(self), fields(len = self.input.len()))]
    pub fn parse(&self) -> Result<XmlNode> {
        self.config.validate_size(self.input)?;

        let mut root = XmlNode::new();
        let mut body_start = 0;

        if let Some(caps) = PROLOG_RE.captures(self.input) {
            let raw = caps.get(1).map_or("", |m| m.as_str());
            for (name, value) in parse_attributes(raw) {
                let value = if name == "encoding" {
                    value.to_lowercase()
                } else {
                    value
                };
                root.attributes.insert(name, value);
            }
            body_start = caps.get(0).map_or(0, |m| m.end());
        }

        let body = self.input.get(body_start..).unwrap_or_default();
        let mut stack = vec![Frame::document(root, body_start)];

        for caps in TAG_RE.captures_iter(body) {
            let Some(whole) = caps.get(0) else { continue };
            let Some(name) = caps.get(2).map(|m| m.as_str()) else {
                continue;
            };
            let span = body_start + whole.start()..body_start + whole.end();

            if caps.get(1).is_some() {
                self.close_tag(&mut stack, name, span);
            } else if caps.get(4).is_some() {
                let attributes = parse_attributes(caps.get(3).map_or("", |m| m.as_str()));
                self.single_tag(&mut stack, name, attributes, span);
            } else {
                let attributes = parse_attributes(caps.get(3).map_or("", |m| m.as_str()));
                self.open_tag(&mut stack, name, attributes, span)?;
            }
        }

        let end = self.input.len();
        while stack.len() > 1 {
            warn!(depth = stack.len() - 1, "closing unterminated element at end of input");
            self.finish_top(&mut stack, end..end);
        }

        Ok(stack.pop().map(|frame| frame.node).unwrap_or_default())
    }

    fn single_tag(
        &self,
        stack: &mut [Frame],
        name: &str,
        attributes: IndexMap<String, String>,
        span: Range<usize>,
    ) {
        let Some(parent) = stack.last_mut() else {
            return;
        };
        parent.absorb_text(self.input, span.start);
        parent.last_position = span.end;
        parent
            .node
            .insert_child(name, XmlValue::Node(XmlNode::with_attributes(attributes)));
    }

    fn open_tag(
        &self,
        stack: &mut Vec<Frame>,
        name: &str,
        attributes: IndexMap<String, String>,
        span: Range<usize>,
    ) -> Result<()> {
        self.config.validate_depth(stack.len())?;

        if let Some(parent) = stack.last_mut() {
            parent.absorb_text(self.input, span.start);
        }
        stack.push(Frame::element(name, attributes, span));
        Ok(())
    }

    fn close_tag(&self, stack: &mut Vec<Frame>, name: &str, span: Range<usize>) {
        let Some(position) = stack
            .iter()
            .rposition(|frame| !frame.is_document() && frame.name == name)
        else {
            trace!(name, at = span.start, "skipping closing tag without an open element");
            return;
        };

        // Elements left open inside this one end where its closing tag starts
        while stack.len() > position + 1 {
            trace!(name, "closing element implicitly");
            self.finish_top(stack, span.start..span.start);
        }
        self.finish_top(stack, span);
    }

    fn finish_top(&self, stack: &mut Vec<Frame>, closing: Range<usize>) {
        if stack.len() < 2 {
            return;
        }
        let Some(frame) = stack.pop() else { return };
        let end = closing.end;
        let (name, value) = frame.finish(self.input, closing);

        if let Some(parent) = stack.last_mut() {
            parent.node.insert_child(&name, value);
            parent.last_position = end;
        }
    }
}

/// Parses XML text into a tree with default limits
pub fn parse(xml_text: &str) -> Result<XmlNode> {
    XmlParser::new(xml_text).parse()
}
