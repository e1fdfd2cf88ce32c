//! Error types for data binding.

use tessera_carton::String;
use tessera_relief::{NodeId, TreeError};

/// Errors that can occur while matching or binding views
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    /// The datum has no value for a bound prop
    #[error("no value for key `{key}`")]
    KeyNotFound { key: String },

    /// The view's node is gone or cannot take part in the operation
    #[error("view over node {node} is not usable: {reason}")]
    InvalidViewState { node: NodeId, reason: &'static str },
}

impl BindingError {
    pub(crate) fn removed(node: NodeId) -> Self {
        Self::InvalidViewState {
            node,
            reason: "node was removed from the document",
        }
    }
}

impl From<TreeError> for BindingError {
    fn from(err: TreeError) -> Self {
        let reason = match err {
            TreeError::DeadNode(_) => "node was removed from the document",
            TreeError::Attached(_) => "node is already attached",
            TreeError::Detached(_) => "node has no parent to insert next to",
            TreeError::Cycle(_) => "node would become its own ancestor",
            TreeError::Root(_) => "node is the document root",
            TreeError::NotAnElement(_) => "node is not an element",
        };
        Self::InvalidViewState {
            node: err.node(),
            reason,
        }
    }
}

/// Result type for binding operations.
pub type BindingResult<T> = Result<T, BindingError>;
