use deconstruct_tree::{Family, NodeKind};

/// Errors reported by the engine's checked conversions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("expected a {expected} node, found {found}")]
    UnexpectedKind { expected: Family, found: NodeKind },
}
