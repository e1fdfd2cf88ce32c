//! Armature - The structural HTML parser for Tessera.
//!
//! Turns template markup into a [`tessera_relief::Document`]. The tokenizer
//! is a byte-level state machine that reports sections of the input through
//! the [`Callbacks`] trait; the parser listens to those callbacks and builds
//! the arena tree. Malformed input is recovered from and reported as
//! [`ParseError`]s alongside the document, never as a hard failure.
//!
//! ```
//! let (doc, errors) = tessera_armature::parse(r#"<p data-prop="title">Hi</p>"#);
//! assert!(errors.is_empty());
//! assert_eq!(doc.text_content(doc.root()), "Hi");
//! ```

pub mod parser;
pub mod tokenizer;

pub use parser::{parse, parse_with_options, Parser};
pub use tokenizer::{Callbacks, QuoteType, Tokenizer};

pub use tessera_relief::{Document, ParseError, ParserOptions};
