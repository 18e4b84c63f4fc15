//! XML data model
//!
//! Nodes keep attributes, text and child elements apart. The keyed-object
//! form, where attributes are `@name` keys and text sits under `&text`, only
//! exists at the boundary (see [`XmlNode::to_json`] and
//! [`crate::xml::convert`]).

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// Key prefix marking an attribute in the keyed-object form
pub const ATTR_MARKER: char = '@';
/// Key holding text content in the keyed-object form
pub const TEXT_KEY: &str = "&text";
/// Raw markup between the tags of a node with mixed content
pub const INNER_TEXT_KEY: &str = "_innerText";
/// Raw markup of a node with mixed content, tags included
pub const OUTER_TEXT_KEY: &str = "_outerText";

/// A value under an element name
#[derive(Debug, Clone, PartialEq, Default)]
pub enum XmlValue {
    /// Paired element with neither text, attributes nor children
    #[default]
    Null,
    /// Element holding only text
    Text(String),
    /// Element with attributes or children
    Node(XmlNode),
    /// Repeated sibling elements, in document order
    List(Vec<XmlValue>),
}

/// An element, or the document root
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlNode {
    pub attributes: IndexMap<String, String>,
    /// Text chunks; several when text is interleaved with child elements
    pub text: Vec<String>,
    pub children: IndexMap<String, XmlValue>,
    pub inner_text: Option<String>,
    pub outer_text: Option<String>,
}

impl XmlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&XmlNode> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[XmlValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Appends `value` as a further occurrence of the same element
    fn promote(&mut self, value: Self) {
        match self {
            Self::List(items) => items.push(value),
            single => {
                let first = std::mem::take(single);
                *single = Self::List(vec![first, value]);
            }
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Text(text) => JsonValue::String(text.clone()),
            Self::Node(node) => node.to_json(),
            Self::List(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
        }
    }
}

impl XmlNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attributes(attributes: IndexMap<String, String>) -> Self {
        Self {
            attributes,
            ..Self::default()
        }
    }

    /// Adds a child element; a name seen before turns into a list
    pub fn insert_child(&mut self, name: &str, value: XmlValue) {
        match self.children.get_mut(name) {
            Some(existing) => existing.promote(value),
            None => {
                self.children.insert(name.to_string(), value);
            }
        }
    }

    pub fn child(&self, name: &str) -> Option<&XmlValue> {
        self.children.get(name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Text content when the node has exactly one text chunk
    pub fn text(&self) -> Option<&str> {
        match self.text.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.text.is_empty() && self.children.is_empty()
    }

    /// The keyed-object form of this node
    pub fn to_json(&self) -> JsonValue {
        let mut map = Map::new();

        for (name, value) in &self.attributes {
            map.insert(format!("{ATTR_MARKER}{name}"), JsonValue::String(value.clone()));
        }

        match self.text.as_slice() {
            [] => {}
            [only] => {
                map.insert(TEXT_KEY.to_string(), JsonValue::String(only.clone()));
            }
            chunks => {
                let chunks = chunks.iter().cloned().map(JsonValue::String).collect();
                map.insert(TEXT_KEY.to_string(), JsonValue::Array(chunks));
            }
        }

        for (name, value) in &self.children {
            map.insert(name.clone(), value.to_json());
        }

        if let Some(inner) = &self.inner_text {
            map.insert(INNER_TEXT_KEY.to_string(), JsonValue::String(inner.clone()));
        }
        if let Some(outer) = &self.outer_text {
            map.insert(OUTER_TEXT_KEY.to_string(), JsonValue::String(outer.clone()));
        }

        JsonValue::Object(map)
    }
}

impl Serialize for XmlNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl Serialize for XmlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl fmt::Display for XmlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl fmt::Display for XmlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

/// Attributes of `node`, without the marker
pub fn attributes_of(node: &XmlNode) -> &IndexMap<String, String> {
    &node.attributes
}

/// Walks a space separated path of element names; lists are not entered
pub fn enter<'a>(node: &'a XmlNode, path: &str) -> Option<&'a XmlValue> {
    let mut names = path.split(' ').filter(|name| !name.is_empty());
    let mut current = node.child(names.next()?)?;

    for name in names {
        current = current.as_node()?.child(name)?;
    }

    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_child_promotes_to_list() {
        let mut node = XmlNode::new();
        node.insert_child("item", XmlValue::Text("1".into()));
        assert_eq!(node.child("item"), Some(&XmlValue::Text("1".into())));

        node.insert_child("item", XmlValue::Null);
        node.insert_child("item", XmlValue::Text("3".into()));
        assert_eq!(
            node.child("item"),
            Some(&XmlValue::List(vec![
                XmlValue::Text("1".into()),
                XmlValue::Null,
                XmlValue::Text("3".into()),
            ]))
        );
    }

    #[test]
    fn test_keyed_object_form() {
        let mut link = XmlNode::new();
        link.attributes.insert("href".into(), "x.xml".into());
        link.text = vec!["a".into(), "b".into()];
        link.insert_child("span", XmlValue::Text("s".into()));

        let mut root = XmlNode::new();
        root.attributes.insert("version".into(), "1.0".into());
        root.insert_child("link", XmlValue::Node(link));

        assert_eq!(
            root.to_json(),
            json!({
                "@version": "1.0",
                "link": { "@href": "x.xml", "&text": ["a", "b"], "span": "s" }
            })
        );
    }

    #[test]
    fn test_enter_path() {
        let mut inner = XmlNode::new();
        inner.insert_child("c", XmlValue::Text("deep".into()));
        let mut middle = XmlNode::new();
        middle.insert_child("b", XmlValue::Node(inner));
        let mut root = XmlNode::new();
        root.insert_child("a", XmlValue::Node(middle));

        assert_eq!(
            enter(&root, "a b c").and_then(XmlValue::as_text),
            Some("deep")
        );
        assert_eq!(enter(&root, "a x"), None);
        assert_eq!(enter(&root, "a b c d"), None);
        assert_eq!(enter(&root, ""), None);
    }

    #[test]
    fn test_single_text_chunk() {
        let mut node = XmlNode::new();
        assert_eq!(node.text(), None);
        node.text.push("only".into());
        assert_eq!(node.text(), Some("only"));
        node.text.push("more".into());
        assert_eq!(node.text(), None);
    }
}
