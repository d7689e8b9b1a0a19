//! Configuration options for the engine's algorithms.

/// Configuration options for structural equality.
///
/// # Example
///
/// ```
/// use deconstruct_core::EqualityOptions;
///
/// let options = EqualityOptions {
///     compare_constants_by_reference: true,
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub struct EqualityOptions {
    /// How constants whose payload is neither directly comparable, a nested
    /// query nor a sequence are compared.
    ///
    /// `false` compares payloads by value, `true` requires the same
    /// instance.
    ///
    /// Default: false
    pub compare_constants_by_reference: bool,
}

/// When the rewrite function runs relative to a node's children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// Before descending. A replaced node is returned as-is and its
    /// children are not visited.
    Forward,

    /// After the children have been rewritten.
    #[default]
    Backward,
}

/// Configuration options for tree rewriting.
///
/// # Example
///
/// ```
/// use deconstruct_core::{Direction, TransformOptions};
///
/// let options = TransformOptions {
///     direction: Direction::Forward,
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    /// Default: [`Direction::Backward`]
    pub direction: Direction,
}
