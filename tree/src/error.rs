use crate::{Family, NodeKind};

/// Errors reported by validating node factories.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{kind} is not a {expected} node kind")]
    KindMismatch { kind: NodeKind, expected: Family },

    #[error("expected {expected} arguments, found {found}")]
    ArgumentCount { expected: usize, found: usize },

    #[error("expected a Parameter node, found {0}")]
    NotAParameter(NodeKind),

    #[error("expected a New node, found {0}")]
    NotANewExpression(NodeKind),

    #[error("a block needs at least one expression")]
    EmptyBlock,
}
