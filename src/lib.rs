//! tagreader: selector-driven HTML tag lookup and an XML tree builder
//!
//! This crate provides functionality to:
//! - Locate tags in HTML text with paths such as `div.box a img[src|alt]`
//! - Walk and pin search results through a chainable cursor
//! - Parse XML into a tree with `@attribute` / `&text` conventions
//! - Serialize such trees back to indented XML
//!
//! # Examples
//! ```
//! use tagreader::{xml, HtmlReader, Result};
//!
//! fn example() -> Result<()> {
//!     let html = r#"<div class="box"><a><img src="x.png" alt="pic"></a></div>"#;
//!     let mut reader = HtmlReader::from(html);
//!     let found = reader.find_one("div.box a img[src|alt]").data(None);
//!     assert!(found.is_some());
//!
//!     let tree = xml::parse("<root><item>1</item><item>2</item></root>")?;
//!     println!("{}", xml::stringify(&tree, &xml::StringifyOptions::default()));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod config;
pub mod digits;
pub mod error;
pub mod html;
pub mod utils;
pub mod xml;

// Re-exports
pub use config::ParserConfig;
pub use error::{ParseError, ParseErrorKind, Result};
pub use html::{search, Found, HtmlReader, SelectorTarget};
pub use xml::{StringifyOptions, XmlNode, XmlParser, XmlValue};
