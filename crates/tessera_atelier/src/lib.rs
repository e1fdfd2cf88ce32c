//! Atelier - The data-binding workshop for Tessera.
//!
//! Maps structured data onto marked regions of a [`Document`]:
//!
//! - a **scope** (`data-scope="contact"`) marks a repeatable record,
//! - a **prop** (`data-prop="email"`) marks one field of a record.
//!
//! A [`View`] wraps one node plus the scope/prop metadata found under it; a
//! [`ViewCollection`] is the ordered group of views repeated from one scope.
//! `match_data` reshapes the tree so the number of scope instances equals the
//! length of a data set, `bind` writes values into prop nodes, and `repeat` /
//! `apply` combine the two.
//!
//! ```
//! use serde_json::json;
//! use tessera_atelier::View;
//!
//! let (mut doc, _) = tessera_armature::parse(
//!     r#"<ul><li data-scope="fruit"><b data-prop="name">?</b></li></ul>"#,
//! );
//! let root = View::from_doc(&doc);
//! let fruits = root.scope(&doc, "fruit");
//! fruits
//!     .apply(&mut doc, &json!([{ "name": "fig" }, { "name": "kiwi" }]))
//!     .unwrap();
//!
//! assert_eq!(
//!     doc.to_html_string(),
//!     r#"<ul><li data-scope="fruit"><b data-prop="name">fig</b></li><li data-scope="fruit"><b data-prop="name">kiwi</b></li></ul>"#,
//! );
//! ```

pub mod accessor;
pub mod discovery;
pub mod errors;
pub mod handle;
pub mod options;
pub mod ui_attrs;
pub mod view;
pub mod view_collection;

pub use accessor::{display_value, fetch, DataSet, Datum, Record, Single};
pub use errors::{BindingError, BindingResult};
pub use handle::Handle;
pub use options::BindingOptions;
pub use ui_attrs::{Instruction, UiAttrs};
pub use view::View;
pub use view_collection::ViewCollection;

// Re-export the tree types every operation takes
pub use tessera_relief::{Document, NodeId};
