//! Carton - The artist's toolbox for Tessera.
//!
//! Shared utilities for the Tessera crates: string and collection types used
//! throughout the document tree, tag tables for the HTML parser and printer,
//! and escaping helpers.
//!
//! # Example
//!
//! ```
//! use tessera_carton::{is_void_tag, String};
//!
//! let tag = String::from("br");
//! assert!(is_void_tag(&tag));
//! ```

pub mod dom_tag_config;
pub mod escape;

// Re-export compact_str::CompactString for convenience
pub use compact_str::CompactString;
pub use compact_str::CompactString as String;

// Re-export smallvec for stack-optimized collections
pub use smallvec::{smallvec, SmallVec};

// Re-export rustc-hash for fast hash maps/sets
pub use rustc_hash::{FxHashMap, FxHashSet};

// Re-export phf for compile-time perfect hash functions
pub use phf::{phf_set, Set as PhfSet};

pub use dom_tag_config::*;
pub use escape::*;
