//! Tail/statement/value position.

/// Where an expression sits relative to its enclosing function/`do`/`let`.
/// Drives whether `function`'s JIT-wrapped body treats a `call`/`if`/`let`
/// result as the value to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Position {
    /// A non-last expression in a `do`/body sequence; its value is discarded.
    Statement,
    /// The last expression in a function arity's body (or a branch of one);
    /// its value is the arity's return value.
    Tail,
    /// Any other position (e.g. the top level, or a `call`'s argument).
    Value,
}
