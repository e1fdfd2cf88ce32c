//! Parse and tree errors.

use crate::ast::{NodeId, SourceLocation};

/// Recoverable problems found while parsing a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCode {
    /// An element was never closed
    MissingEndTag,
    /// A closing tag has no matching open element
    InvalidEndTag,
    /// Input ended inside a tag
    EofInTag,
    /// Input ended inside a comment
    EofInComment,
    /// `</>` with no tag name
    MissingEndTagName,
}

impl ErrorCode {
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingEndTag => "Element is missing end tag.",
            Self::InvalidEndTag => "Invalid end tag.",
            Self::EofInTag => "Unexpected EOF in tag.",
            Self::EofInComment => "Unexpected EOF in comment.",
            Self::MissingEndTagName => "End tag name was expected.",
        }
    }
}

/// Parse error with its location in the source
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub code: ErrorCode,
    pub loc: Option<SourceLocation>,
}

impl ParseError {
    pub fn new(code: ErrorCode, loc: Option<SourceLocation>) -> Self {
        Self { code, loc }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code.message())?;
        if let Some(loc) = &self.loc {
            write!(f, " ({}:{})", loc.start.line, loc.start.column)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Structural operation failed on the document tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The node was removed (or never existed in this document)
    #[error("node {0} is not live in this document")]
    DeadNode(NodeId),

    /// The node already has a parent
    #[error("node {0} is already attached")]
    Attached(NodeId),

    /// The operation needs a parent and the node has none
    #[error("node {0} has no parent")]
    Detached(NodeId),

    /// Attaching would make a node its own ancestor
    #[error("attaching node {0} would create a cycle")]
    Cycle(NodeId),

    /// The document root cannot be moved, cloned into place, or removed
    #[error("node {0} is the document root")]
    Root(NodeId),

    /// The node is not an element
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),
}

impl TreeError {
    /// The node the failed operation was about
    pub fn node(&self) -> NodeId {
        match *self {
            Self::DeadNode(id)
            | Self::Attached(id)
            | Self::Detached(id)
            | Self::Cycle(id)
            | Self::Root(id)
            | Self::NotAnElement(id) => id,
        }
    }
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Position;

    #[test]
    fn test_parse_error_display() {
        let loc = SourceLocation::new(Position::new(4, 2, 3), Position::new(5, 2, 4), "<");
        let err = ParseError::new(ErrorCode::MissingEndTag, Some(loc));
        assert_eq!(err.to_string(), "Element is missing end tag. (2:3)");

        let err = ParseError::new(ErrorCode::InvalidEndTag, None);
        assert_eq!(err.to_string(), "Invalid end tag.");
    }
}
