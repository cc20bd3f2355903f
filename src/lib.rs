//! An AST evaluator core for a Clojure-dialect runtime: a tree-walking
//! interpreter for most expression forms, with a JIT "wrap and compile"
//! fallback for the forms (`function`, `let`, `try`, `native_raw`) that
//! only make sense inside a compiled function frame.
//!
//! ## Architecture
//!
//! - [`ast`] — the 19-variant expression union, lexical [`ast::Frame`]
//!   tree, and tail/statement/value [`ast::Position`] model.
//! - [`value`] — the runtime object universe: persistent collections,
//!   vars, keywords, and the `Callable`/`CollectionCall`/`UnaryCall`
//!   capability traits.
//! - [`context`] — the single-process [`context::Context`]: interned
//!   vars/keywords, the namespace registry, name mangling.
//! - [`eval`] — the dispatcher (`eval::eval`) and the `wrap_expression`/
//!   `wrap_expressions` bridge into the JIT path.
//! - [`jit`] — the `CodeGenerator`/`JitHost` external interfaces and this
//!   crate's tree-walking implementation of both.
//! - [`diagnostics`] — the evaluator's error type.

#![warn(missing_docs, rust_2018_idioms)]

pub mod ast;
pub mod context;
pub mod diagnostics;
pub mod eval;
pub mod jit;
pub mod value;

pub use context::Context;
pub use diagnostics::{Error, Result};
pub use eval::{eval, wrap_expression, wrap_expressions};
pub use jit::{CodeGenerator, JitHost, TreeWalkingHost};
pub use value::Object;
