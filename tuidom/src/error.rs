use thiserror::Error;

use crate::document::NodeId;

/// Errors raised by document and custom element operations.
#[derive(Debug, Error)]
pub enum DomError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
    #[error("inserting {child} into {parent} would create a cycle")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    #[error("node {0} already has a shadow root")]
    ShadowRootExists(NodeId),
    #[error("invalid custom element name: {0:?}")]
    InvalidName(String),
    #[error("custom element <{0}> is already defined")]
    AlreadyDefined(String),
    #[error("node {node} is not a <{expected}> instance")]
    WrongElementType { node: NodeId, expected: &'static str },
    #[error("failed to construct <{tag}>: {source}")]
    Construction {
        tag: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
