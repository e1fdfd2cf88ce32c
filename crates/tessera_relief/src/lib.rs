//! Relief - The sculptured document tree surface for Tessera.
//!
//! This crate holds the document tree the binding engine works on. Nodes are
//! owned by an arena ([`Document`]) and addressed by stable [`NodeId`] handles,
//! so cloning, splicing and removing subtrees never leaves a dangling reference:
//! a removed node's handle simply stops being live.
//!
//! # Modules
//!
//! - **ast**: node kinds, attributes and source positions
//! - **document**: the arena and its structural operations
//! - **printer**: serialization back to HTML
//! - **errors**: parse and tree errors
//! - **options**: parser options

pub mod ast;
pub mod document;
pub mod errors;
pub mod options;
pub mod printer;

pub use ast::*;
pub use document::{Descendants, Document};
pub use errors::{ErrorCode, ParseError, TreeError, TreeResult};
pub use options::{ParserOptions, WhitespaceStrategy};
