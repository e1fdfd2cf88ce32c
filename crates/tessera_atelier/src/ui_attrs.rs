//! UI attribute instruction builder.
//!
//! Records a chain of attribute operations so they can be replayed elsewhere
//! (for example by a client that patches the live DOM). Each instruction is an
//! operation name, a value and optionally a nested list of instructions that
//! act on the result of the operation:
//!
//! ```
//! use serde_json::json;
//! use tessera_atelier::UiAttrs;
//!
//! let mut attrs = UiAttrs::new();
//! attrs.class().instruct("add", json!("active"));
//! attrs.instruct("title", json!("Inbox"));
//!
//! let out = serde_json::to_value(attrs.finalize()).unwrap();
//! assert_eq!(out, json!([["class", null, [["add", "active"]]], ["title", "Inbox"]]));
//! ```

use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value;
use tessera_carton::String;

/// A finalized instruction
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub operation: String,
    pub value: Value,
    pub nested: Option<Vec<Instruction>>,
}

/// Serialized as `[operation, value]` or `[operation, value, [nested...]]`
impl Serialize for Instruction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.nested.is_some() { 3 } else { 2 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(self.operation.as_str())?;
        seq.serialize_element(&self.value)?;
        if let Some(nested) = &self.nested {
            seq.serialize_element(nested)?;
        }
        seq.end()
    }
}

#[derive(Debug, Clone)]
struct Pending {
    operation: String,
    value: Value,
    nested: Option<UiAttrs>,
}

/// Builder for [`Instruction`] lists
#[derive(Debug, Clone, Default)]
pub struct UiAttrs {
    pending: Vec<Pending>,
}

impl UiAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a flat instruction and keep building on this builder
    pub fn instruct(
        &mut self,
        operation: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.pending.push(Pending {
            operation: operation.into(),
            value: value.into(),
            nested: None,
        });
        self
    }

    /// Record an instruction and return the builder for its nested
    /// instructions
    pub fn nested_instruct(
        &mut self,
        operation: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut UiAttrs {
        let index = self.pending.len();
        self.pending.push(Pending {
            operation: operation.into(),
            value: value.into(),
            nested: Some(UiAttrs::new()),
        });
        self.pending[index].nested.get_or_insert_with(UiAttrs::new)
    }

    /// Nested instruction for an arbitrary attribute operation
    pub fn set(&mut self, operation: impl Into<String>, value: impl Into<Value>) -> &mut UiAttrs {
        self.nested_instruct(operation, value)
    }

    /// Nested instructions acting on the `class` attribute
    pub fn class(&mut self) -> &mut UiAttrs {
        self.nested_instruct("class", Value::Null)
    }

    /// Nested instructions acting on the `id` attribute
    pub fn id(&mut self) -> &mut UiAttrs {
        self.nested_instruct("id", Value::Null)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Convert the builder tree into plain instruction lists
    pub fn finalize(self) -> Vec<Instruction> {
        self.pending
            .into_iter()
            .map(|p| Instruction {
                operation: p.operation,
                value: p.value,
                nested: p.nested.map(UiAttrs::finalize),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_instruct_chains_on_same_builder() {
        let mut attrs = UiAttrs::new();
        attrs.instruct("title", "a").instruct("lang", "en");
        assert_eq!(attrs.len(), 2);
        let out = attrs.finalize();
        assert_eq!(out[1].operation, "lang");
        assert_eq!(out[1].nested, None);
    }

    #[test]
    fn test_nested_builders_finalize_recursively() {
        let mut attrs = UiAttrs::new();
        attrs
            .set("style", json!(null))
            .nested_instruct("color", "red")
            .instruct("important", true);
        attrs.id().instruct("ensure", "main");

        let out = attrs.finalize();
        assert_eq!(
            serde_json::to_value(&out).unwrap(),
            json!([
                ["style", null, [["color", "red", [["important", true]]]]],
                ["id", null, [["ensure", "main"]]]
            ])
        );
    }

    #[test]
    fn test_empty_nested_builder_finalizes_to_empty_list() {
        let mut attrs = UiAttrs::new();
        attrs.class();
        let out = attrs.finalize();
        assert_eq!(out[0].nested, Some(Vec::new()));
        assert_eq!(
            serde_json::to_string(&out).unwrap(),
            r#"[["class",null,[]]]"#
        );
    }
}
