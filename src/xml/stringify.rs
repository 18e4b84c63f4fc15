//! XML serializer
//!
//! Walks a tree with an explicit stack of frames, so nesting depth is
//! bounded by the heap rather than the call stack. Text is written as is;
//! no entity escaping happens in either direction.

use super::{
    convert::node_from_json,
    model::{XmlNode, XmlValue},
};
use crate::error::Result;
use serde_json::Value as JsonValue;
use std::slice;
use tracing::{instrument, trace};

pub const DEFAULT_VERSION: &str = "1.0";
pub const DEFAULT_ENCODING: &str = "UTF-8";

/// Configuration options for serializing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringifyOptions {
    /// Prolog version unless the root carries one
    pub version: String,
    /// Prolog encoding unless the root carries one
    pub encoding: String,
    pub line_break: String,
    /// Indentation unit, repeated once per level
    pub indent: String,
}

impl Default for StringifyOptions {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
            line_break: "\n".to_string(),
            indent: "  ".to_string(),
        }
    }
}

impl StringifyOptions {
    /// Output without line breaks or indentation
    pub fn compact() -> Self {
        Self {
            line_break: String::new(),
            indent: String::new(),
            ..Self::default()
        }
    }

    fn indentation(&self, level: usize) -> String {
        format!("{}{}", self.line_break, self.indent.repeat(level))
    }
}

enum Source<'a> {
    Node(indexmap::map::Iter<'a, String, XmlValue>),
    List(slice::Iter<'a, XmlValue>),
}

/// One element (or list of same-named elements) being written
struct Frame<'a> {
    name: &'a str,
    source: Source<'a>,
    /// Level of the frame's content
    level: usize,
    attribs: String,
    body: String,
    has_children: bool,
}

impl<'a> Frame<'a> {
    fn root(node: &'a XmlNode, options: &StringifyOptions) -> Self {
        let mut frame = Self::node("", node, 0, options);
        frame.attribs.clear();
        frame
    }

    fn node(name: &'a str, node: &'a XmlNode, level: usize, options: &StringifyOptions) -> Self {
        let attribs = node
            .attributes
            .iter()
            .map(|(key, value)| format!(" {key}=\"{value}\""))
            .collect();

        let body = if node.text.is_empty() {
            String::new()
        } else {
            let indent = options.indentation(level);
            format!("{indent}{}", node.text.join(&indent))
        };

        Self {
            name,
            source: Source::Node(node.children.iter()),
            level,
            attribs,
            body,
            has_children: false,
        }
    }

    fn list(name: &'a str, items: &'a [XmlValue], level: usize) -> Self {
        Self {
            name,
            source: Source::List(items.iter()),
            level,
            attribs: String::new(),
            body: String::new(),
            has_children: false,
        }
    }

    fn next_child(&mut self) -> Option<(&'a str, &'a XmlValue)> {
        let name = self.name;
        match &mut self.source {
            Source::Node(children) => children.next().map(|(key, value)| (key.as_str(), value)),
            Source::List(items) => items.next().map(|value| (name, value)),
        }
    }

    /// Text this frame contributes to its parent's body
    fn close(self, options: &StringifyOptions) -> String {
        if let Source::List(_) = self.source {
            return self.body;
        }

        let indent = options.indentation(self.level.saturating_sub(1));
        let Self {
            name,
            attribs,
            body,
            has_children,
            ..
        } = self;

        if body.is_empty() && !has_children {
            format!("{indent}<{name}{attribs} />")
        } else {
            format!("{indent}<{name}{attribs}>{body}{indent}</{name}>")
        }
    }
}

/// Serializes the elements under `root` without a prolog
///
/// Root attributes are not rendered; the result has no leading line break.
#[instrument(level = "debug", skip_all, fields(children = root.children.len()))]
pub fn stringify_body(root: &XmlNode, options: &StringifyOptions) -> String {
    let body = write_elements(root, options);
    body.strip_prefix(options.line_break.as_str())
        .map(str::to_string)
        .unwrap_or(body)
}

/// Serializes `root` with an `<?xml ...?>` prolog built from its attributes
pub fn stringify(root: &XmlNode, options: &StringifyOptions) -> String {
    format!("<?xml {}?>{}", prolog(root, options), write_elements(root, options))
}

/// Serializes a keyed object (`@name` attributes, `&text` text)
pub fn stringify_value(value: &JsonValue, options: &StringifyOptions) -> Result<String> {
    let node = node_from_json(value)?;
    Ok(stringify(&node, options))
}

fn prolog(root: &XmlNode, options: &StringifyOptions) -> String {
    let version = root.attribute("version").unwrap_or(options.version.as_str());
    let encoding = root.attribute("encoding").unwrap_or(options.encoding.as_str());

    let mut params = vec![
        format!("version=\"{version}\""),
        format!("encoding=\"{encoding}\""),
    ];
    params.extend(
        root.attributes
            .iter()
            .filter(|(key, _)| !matches!(key.as_str(), "version" | "encoding"))
            .map(|(key, value)| format!("{}=\"{value}\"", key.to_lowercase())),
    );

    params.join(" ")
}

fn write_elements(root: &XmlNode, options: &StringifyOptions) -> String {
    let mut stack = vec![Frame::root(root, options)];

    loop {
        let Some(frame) = stack.last_mut() else {
            return String::new();
        };

        if let Some((name, value)) = frame.next_child() {
            frame.has_children = true;
            let level = frame.level;

            match value {
                XmlValue::Null => {
                    let indent = options.indentation(level);
                    frame.body.push_str(&format!("{indent}<{name}></{name}>"));
                }
                XmlValue::Text(text) => {
                    let indent = options.indentation(level);
                    frame.body.push_str(&format!("{indent}<{name}>{text}</{name}>"));
                }
                XmlValue::Node(node) => {
                    trace!(name, level, "entering element");
                    stack.push(Frame::node(name, node, level + 1, options));
                }
                XmlValue::List(items) => stack.push(Frame::list(name, items, level)),
            }
            continue;
        }

        let Some(done) = stack.pop() else {
            return String::new();
        };
        match stack.last_mut() {
            Some(parent) => parent.body.push_str(&done.close(options)),
            None => return done.body,
        }
    }
}
