use thiserror::Error;

/// Result type for repair operations
pub type Result<T> = std::result::Result<T, RepairError>;

/// Errors that can occur while inspecting a script
#[derive(Error, Debug)]
pub enum RepairError {
    /// Script is not syntactically valid Python
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Tree-sitter could not be set up
    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),
}

impl RepairError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitterError(msg.into())
    }
}
