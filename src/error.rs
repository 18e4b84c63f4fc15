//! Error handling types for the parsers
//!
//! Searching HTML never fails: a missing tag is `None` or an empty list.
//! Errors only come from configured limits, from keyed objects that have
//! no XML shape, and from file access in the binary helpers.

use thiserror::Error;

/// Main error type for parsing and conversion operations
#[derive(Debug, Error)]
#[error("{kind}{}", .context.as_ref().map(|c| format!("\nContext: {c}")).unwrap_or_default())]
pub struct ParseError {
    /// The specific kind of error
    kind: ParseErrorKind,
    /// Additional context for the error
    context: Option<String>,
}

/// Top-level error categories
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error(transparent)]
    Io(#[from] IoError),
    #[error(transparent)]
    Security(#[from] SecurityError),
    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

/// Limits enforced while building an XML tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecurityError {
    #[error("Maximum nesting depth of {max} exceeded")]
    MaxDepthExceeded { max: usize },
    #[error("Maximum input size of {max} bytes exceeded")]
    MaxSizeExceeded { max: usize },
}

/// Values that cannot be expressed as markup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    /// The top-level value of a keyed object must be an object
    #[error("Root value must be an object")]
    RootNotObject,
    /// A value found under a key has no XML meaning
    #[error("Invalid value under key '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

/// IO operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("Read error: {0}")]
    ReadError(String),
    #[error("Write error: {0}")]
    WriteError(String),
}

impl ParseError {
    pub fn new(kind: impl Into<ParseErrorKind>) -> Self {
        Self {
            kind: kind.into(),
            context: None,
        }
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl From<SecurityError> for ParseError {
    fn from(err: SecurityError) -> Self {
        Self::new(err)
    }
}

impl From<SemanticError> for ParseError {
    fn from(err: SemanticError) -> Self {
        Self::new(err)
    }
}

impl From<IoError> for ParseError {
    fn from(err: IoError) -> Self {
        Self::new(err)
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;
