//! Keyed-object boundary
//!
//! Builds typed nodes from plain objects following the `@attribute` /
//! `&text` key convention, so trees produced elsewhere (or edited as JSON)
//! can be serialized back to markup.

use super::model::{XmlNode, XmlValue, ATTR_MARKER, INNER_TEXT_KEY, OUTER_TEXT_KEY, TEXT_KEY};
use crate::error::{Result, SemanticError};
use serde_json::{Map, Value as JsonValue};

/// Converts a keyed object into a node; the root must be an object
pub fn node_from_json(value: &JsonValue) -> Result<XmlNode> {
    match value {
        JsonValue::Object(map) => object_to_node(map),
        _ => Err(SemanticError::RootNotObject.into()),
    }
}

fn object_to_node(map: &Map<String, JsonValue>) -> Result<XmlNode> {
    let mut node = XmlNode::new();

    for (key, value) in map {
        if key == TEXT_KEY {
            node.text = text_chunks(key, value)?;
        } else if key == INNER_TEXT_KEY {
            node.inner_text = Some(scalar_to_string(key, value)?);
        } else if key == OUTER_TEXT_KEY {
            node.outer_text = Some(scalar_to_string(key, value)?);
        } else if let Some(name) = key.strip_prefix(ATTR_MARKER) {
            node.attributes
                .insert(name.to_string(), scalar_to_string(key, value)?);
        } else {
            node.children.insert(key.clone(), value_from_json(key, value)?);
        }
    }

    Ok(node)
}

fn value_from_json(key: &str, value: &JsonValue) -> Result<XmlValue> {
    Ok(match value {
        JsonValue::Null => XmlValue::Null,
        JsonValue::Object(map) => XmlValue::Node(object_to_node(map)?),
        JsonValue::Array(items) => XmlValue::List(
            items
                .iter()
                .map(|item| value_from_json(key, item))
                .collect::<Result<_>>()?,
        ),
        scalar => XmlValue::Text(scalar_to_string(key, scalar)?),
    })
}

fn text_chunks(key: &str, value: &JsonValue) -> Result<Vec<String>> {
    match value {
        JsonValue::Null => Ok(Vec::new()),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| scalar_to_string(key, item))
            .collect(),
        scalar => Ok(vec![scalar_to_string(key, scalar)?]),
    }
}

fn scalar_to_string(key: &str, value: &JsonValue) -> Result<String> {
    match value {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        JsonValue::Null => Ok(String::new()),
        JsonValue::Array(_) | JsonValue::Object(_) => Err(SemanticError::InvalidValue {
            key: key.to_string(),
            reason: "expected a scalar".to_string(),
        }
        .into()),
    }
}
