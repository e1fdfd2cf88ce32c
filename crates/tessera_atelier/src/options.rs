//! Binding options.

use tessera_carton::String;

/// Attribute names the engine recognizes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingOptions {
    /// Attribute marking a scope container; its value is the scope name
    pub scope_attribute: String,
    /// Attribute marking a prop leaf; its value is the prop name
    pub prop_attribute: String,
}

impl Default for BindingOptions {
    fn default() -> Self {
        Self {
            scope_attribute: String::const_new("data-scope"),
            prop_attribute: String::const_new("data-prop"),
        }
    }
}
