use thiserror::Error;

use crate::node::NodeId;

/// Errors raised by tree mutations and attribute parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The handle does not refer to a live node.
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    /// The reference node passed to an insertion is not a child of the parent.
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    /// The insertion would make a node its own ancestor.
    #[error("inserting {child} under {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    /// The document root has no parent to be removed from.
    #[error("the document root cannot be removed")]
    RootRemoval,

    /// An attribute value could not be parsed.
    #[error("invalid value {value:?} for attribute '{name}'")]
    InvalidAttribute { name: String, value: String },
}
