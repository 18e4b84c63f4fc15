//! XML tree builder and serializer
//!
//! [`parse`] turns markup into an [`XmlNode`] tree; [`stringify`] writes a
//! tree back. Attribute names are kept apart from element names by the
//! `@` marker and text content sits under `&text` in the keyed-object form.

pub mod convert;
pub mod model;
pub mod parser;
pub mod stringify;

pub use convert::node_from_json;
pub use model::{
    attributes_of, enter, XmlNode, XmlValue, ATTR_MARKER, INNER_TEXT_KEY, OUTER_TEXT_KEY,
    TEXT_KEY,
};
pub use parser::{parse, XmlParser};
pub use stringify::{stringify, stringify_body, stringify_value, StringifyOptions};
