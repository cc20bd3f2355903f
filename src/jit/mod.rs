//! The JIT bridge: the external `CodeGenerator` and `JitHost` collaborators
//! the evaluator hands a wrapped function
//! expression to, plus a concrete tree-walking implementation that
//! satisfies both traits without producing real machine code or IR —
//! compiling an expression here means building a closure that re-enters
//! [`crate::eval::eval_core`], not emitting LLVM IR (an explicit non-goal).

mod treewalk;

pub use treewalk::TreeWalkingHost;

use crate::ast::FunctionExpr;
use crate::context::Context;
use crate::diagnostics::Result;
use crate::value::{Callable, Object};
use std::rc::Rc;

/// A compiled unit ready to be registered with a [`JitHost`]. Named so an
/// LRU-bounded module cache can key on it.
#[derive(Debug, Clone)]
pub struct CompiledModule {
    /// The module's unique, mangled name (`crate::context::nest_module`).
    pub name: String,
    /// The analyzed function this module compiles.
    pub function: Rc<FunctionExpr>,
}

/// Where a compiled module's entry point should run. The reference system
/// distinguishes JIT-to-native from interpreted fallback; this crate's only
/// target is the tree-walking interpreter, but the enum documents the seam
/// a real backend would plug into — producing real IR is out of scope here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilationTarget {
    /// Walk the AST directly; this crate's only implemented target.
    TreeWalk,
}

/// Turns an analyzed, wrapped function into a [`CompiledModule`].
pub trait CodeGenerator {
    /// Which target this generator emits for.
    fn target(&self) -> CompilationTarget;

    /// Generates a module for `function_expr`, named via
    /// `crate::context::nest_module`.
    fn generate(&self, ctx: &Context, function_expr: &FunctionExpr) -> Result<CompiledModule>;
}

/// Registers and invokes compiled modules. `eval`'s `function` case and
/// the wrapper's call sites (`let`, `try`,
/// `native_raw`) both go through this trait rather than calling the tree
/// walker directly, so a real LLJIT-backed host could be substituted
/// without touching `crate::eval`.
pub trait JitHost {
    /// Compiles (or returns an LRU-cached) callable for `function_expr`.
    fn compile(&self, ctx: &Rc<Context>, function_expr: &FunctionExpr) -> Result<Rc<dyn Callable>>;

    /// Resolves a `native_raw` key to a host-registered value (native code
    /// is a registry lookup here, not inline machine code).
    fn invoke_native(&self, ctx: &Rc<Context>, key: &str) -> Result<Object>;
}
