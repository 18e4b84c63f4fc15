//! HTML tag locator
//!
//! Finds tags by CSS-like selector paths and reports byte positions into
//! the searched text. Nothing is tokenized per a formal grammar: a single
//! tag pattern is scanned forward and nesting is tracked by hand.

pub mod reader;
pub mod scanner;
pub mod selector;
pub mod tag;

pub use reader::HtmlReader;
pub use scanner::{search, Found, Scanner};
pub use selector::SelectorTarget;
pub use tag::{Attributes, Positions, TagMatch};
