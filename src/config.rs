use crate::error::{Result, SecurityError};

pub const DEFAULT_MAX_DEPTH: usize = 512;
pub const DEFAULT_MAX_SIZE: usize = 64 * 1024 * 1024; // 64MB

/// Configuration for parser limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum number of simultaneously open elements
    pub max_depth: usize,
    /// Maximum input size in bytes
    pub max_size: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl ParserConfig {
    pub fn validate_size(&self, input: &str) -> Result<()> {
        if input.len() > self.max_size {
            return Err(SecurityError::MaxSizeExceeded { max: self.max_size }.into());
        }
        Ok(())
    }

    pub fn validate_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            return Err(SecurityError::MaxDepthExceeded {
                max: self.max_depth,
            }
            .into());
        }
        Ok(())
    }
}
