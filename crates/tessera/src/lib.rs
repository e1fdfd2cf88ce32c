//! # Tessera
//!
//! Declarative data binding for HTML templates, written in Rust.
//!
//! This crate re-exports all Tessera sub-crates for unified documentation.
//!
//! ## Crates
//!
//! - [`carton`] - Shared strings, hash maps and tag tables
//! - [`relief`] - Arena document tree and HTML printer
//! - [`armature`] - HTML tokenizer and parser
//! - [`atelier`] - Views, view collections and data binding

/// Shared strings, hash maps and tag tables.
pub use tessera_carton as carton;

/// Arena document tree and HTML printer.
pub use tessera_relief as relief;

/// HTML tokenizer and parser.
pub use tessera_armature as armature;

/// Views, view collections and data binding.
pub use tessera_atelier as atelier;
