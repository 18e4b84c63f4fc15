use crate::{
    error::{IoError, ParseError, Result},
    xml::{self, StringifyOptions, XmlNode},
};
use std::{fs, io};
use tracing::debug;

pub fn read_file(path: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        let kind = match e.kind() {
            io::ErrorKind::NotFound => IoError::FileNotFound(path.to_string()),
            _ => IoError::ReadError(format!("{path}: {e}")),
        };
        ParseError::new(kind)
    })
}

pub fn write_file(path: &str, content: &str) -> Result<()> {
    fs::write(path, content)
        .map_err(|e| ParseError::new(IoError::WriteError(format!("{path}: {e}"))))
}

pub fn parse_xml_file(path: &str) -> Result<XmlNode> {
    let content = read_file(path)?;
    debug!(path, len = content.len(), "xml loaded");
    xml::parse(&content).map_err(|e| e.with_context(format!("while parsing {path}")))
}

/// Keyed-object JSON of an XML tree
pub fn format_json(node: &XmlNode) -> Result<String> {
    serde_json::to_string_pretty(node)
        .map_err(|e| ParseError::new(IoError::WriteError(format!("json output: {e}"))))
}

pub fn format_xml(node: &XmlNode) -> String {
    xml::stringify(node, &StringifyOptions::default())
}
