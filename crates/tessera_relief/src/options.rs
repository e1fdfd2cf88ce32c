//! Parser options.

/// Parser options
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Whitespace handling between elements
    pub whitespace: WhitespaceStrategy,
    /// Whether is a void tag
    pub is_void_tag: fn(&str) -> bool,
    /// Whether the tag's content is raw text
    pub is_raw_text_tag: fn(&str) -> bool,
    /// Keep comments in the tree
    pub comments: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            whitespace: WhitespaceStrategy::Preserve,
            is_void_tag: tessera_carton::is_void_tag,
            is_raw_text_tag: tessera_carton::is_raw_text_tag,
            comments: true,
        }
    }
}

/// Whitespace handling strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhitespaceStrategy {
    /// Condense whitespace between elements
    Condense,
    /// Preserve all whitespace (default)
    #[default]
    Preserve,
}
