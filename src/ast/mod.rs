//! The AST node model.
//!
//! Every expression variant shares a [`ExprBase`]: whether it needs boxing
//! for native interop, its [`Position`], the [`Frame`] it was analyzed in,
//! and an optional metadata object. [`Expr`] is an owned tree — unlike
//! [`Frame`], which is shared via `Rc` so sibling expressions in the same
//! scope observe the same frame, expression nodes belong uniquely to their
//! parent. `wrap_expression`/`wrap_expressions` (`crate::eval::wrap`) take
//! ownership of a node to splice it under a synthetic function.

// Field/variant names mirror the grammar documented on each expr_struct!
// invocation and on `Expr` itself; per-field doc comments would just repeat
// the field name.
#![allow(missing_docs)]

mod frame;
mod position;

pub use frame::{Frame, FrameKind, FunctionContext};
pub use position::Position;

use crate::value::{Object, Symbol};
use std::rc::Rc;

/// Fields shared by every expression variant.
#[derive(Debug, Clone)]
pub struct ExprBase {
    /// Whether this expression's value must be boxed for the JIT bridge's
    /// uniform (boxed-object) calling convention.
    pub needs_box: bool,
    /// Where this expression sits in its enclosing body.
    pub position: Position,
    /// The lexical frame this expression was analyzed in.
    pub frame: Rc<Frame>,
    /// Optional reader/analyzer metadata.
    pub meta: Option<Object>,
}

impl ExprBase {
    /// A base record in `frame`, starting in [`Position::Value`].
    pub fn new(frame: Rc<Frame>) -> Self {
        Self {
            needs_box: true,
            position: Position::Value,
            frame,
            meta: None,
        }
    }
}

macro_rules! expr_struct {
    ($(#[$meta:meta])* $name:ident { $($(#[$fmeta:meta])* $field:ident : $ty:ty),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            /// Fields shared by every expression variant.
            pub base: ExprBase,
            $($(#[$fmeta])* pub $field: $ty,)*
        }
    };
}

expr_struct!(
    /// `(def name value?)`.
    DefExpr { name: Symbol, value: Option<Box<Expr>> }
);
expr_struct!(
    /// Reads a var's current root binding.
    VarDerefExpr { qualified_name: Symbol }
);
expr_struct!(
    /// Yields the var handle itself, undereferenced.
    VarRefExpr { qualified_name: Symbol }
);
expr_struct!(
    /// `(source-expr arg-expr*)`.
    CallExpr { source_expr: Box<Expr>, arg_exprs: Vec<Expr> }
);
expr_struct!(
    /// A self-evaluating literal (numbers, strings, keywords, booleans, nil).
    PrimitiveLiteralExpr { data: Object }
);
expr_struct!(
    /// `[data-expr*]`.
    VectorExpr { data_exprs: Vec<Expr> }
);
expr_struct!(
    /// `{key-expr val-expr, ...}`.
    MapExpr { data_exprs: Vec<(Expr, Expr)> }
);
expr_struct!(
    /// `#{data-expr*}`.
    SetExpr { data_exprs: Vec<Expr> }
);
expr_struct!(
    /// A reference to a local binding (function parameter or `let` binding);
    /// only meaningful inside a JIT-compiled function body.
    LocalReferenceExpr { name: Symbol }
);
expr_struct!(
    /// `(fn name? ([params*] body*)+)`.
    FunctionExpr {
        name: String,
        unique_name: String,
        arities: Vec<FunctionArity>,
    }
);
expr_struct!(
    /// `(recur arg-expr*)` — tail self-call within the current arity.
    RecurExpr { arg_exprs: Vec<Expr> }
);
expr_struct!(
    /// A reference to the enclosing named function, for `named_recursion`.
    RecursionReferenceExpr {}
);
expr_struct!(
    /// A non-tail recursive call to the enclosing named function.
    NamedRecursionExpr { arg_exprs: Vec<Expr> }
);
expr_struct!(
    /// `(do value-expr*)`.
    DoExpr { values: Vec<Expr> }
);
expr_struct!(
    /// `(let [name value-expr*] body*)`.
    LetExpr {
        bindings: Vec<(Symbol, Expr)>,
        body: Vec<Expr>,
    }
);
expr_struct!(
    /// `(if condition then else?)`.
    IfExpr {
        condition: Box<Expr>,
        then: Box<Expr>,
        else_: Option<Box<Expr>>,
    }
);
expr_struct!(
    /// `(throw value-expr)`.
    ThrowExpr { value: Box<Expr> }
);
expr_struct!(
    /// `(try body* (catch name catch-body*))`.
    TryExpr {
        body: Vec<Expr>,
        catch_name: Symbol,
        catch_body: Vec<Expr>,
    }
);
expr_struct!(
    /// Inline native code, resolved at JIT time through a host-provided
    /// registry rather than interpreted as arbitrary machine code
    /// (a simplification recorded in DESIGN.md).
    NativeRawExpr { key: String }
);

/// A single `(params*) body*` arm of a [`FunctionExpr`].
#[derive(Debug, Clone)]
pub struct FunctionArity {
    /// This arity's own lexical frame (parameters, and `recur` target).
    pub frame: Rc<Frame>,
    /// Parameter names, in declaration order.
    pub params: Vec<Symbol>,
    /// True if the final parameter collects a variadic tail (`& rest`).
    pub is_variadic: bool,
    /// The arity's body, in sequence; the last element is in tail position.
    pub body: Vec<Expr>,
}

/// The 19-variant expression union.
#[derive(Debug, Clone)]
pub enum Expr {
    /// `(def name value?)`.
    Def(DefExpr),
    /// Reads a var's current root binding.
    VarDeref(VarDerefExpr),
    /// Yields a var handle, undereferenced.
    VarRef(VarRefExpr),
    /// `(source-expr arg-expr*)`.
    Call(CallExpr),
    /// A self-evaluating literal.
    PrimitiveLiteral(PrimitiveLiteralExpr),
    /// `[data-expr*]`.
    Vector(VectorExpr),
    /// `{key-expr val-expr, ...}`.
    Map(MapExpr),
    /// `#{data-expr*}`.
    Set(SetExpr),
    /// A local (parameter/`let`) binding reference.
    LocalReference(LocalReferenceExpr),
    /// `(fn name? ([params*] body*)+)`.
    Function(FunctionExpr),
    /// `(recur arg-expr*)`.
    Recur(RecurExpr),
    /// A reference to the enclosing named function.
    RecursionReference(RecursionReferenceExpr),
    /// A non-tail recursive call to the enclosing named function.
    NamedRecursion(NamedRecursionExpr),
    /// `(do value-expr*)`.
    Do(DoExpr),
    /// `(let [name value-expr*] body*)`.
    Let(LetExpr),
    /// `(if condition then else?)`.
    If(IfExpr),
    /// `(throw value-expr)`.
    Throw(ThrowExpr),
    /// `(try body* (catch name catch-body*))`.
    Try(TryExpr),
    /// Inline native code, resolved through a host registry.
    NativeRaw(NativeRawExpr),
}

impl Expr {
    /// Borrows the shared base record, regardless of variant.
    pub fn base(&self) -> &ExprBase {
        match self {
            Expr::Def(e) => &e.base,
            Expr::VarDeref(e) => &e.base,
            Expr::VarRef(e) => &e.base,
            Expr::Call(e) => &e.base,
            Expr::PrimitiveLiteral(e) => &e.base,
            Expr::Vector(e) => &e.base,
            Expr::Map(e) => &e.base,
            Expr::Set(e) => &e.base,
            Expr::LocalReference(e) => &e.base,
            Expr::Function(e) => &e.base,
            Expr::Recur(e) => &e.base,
            Expr::RecursionReference(e) => &e.base,
            Expr::NamedRecursion(e) => &e.base,
            Expr::Do(e) => &e.base,
            Expr::Let(e) => &e.base,
            Expr::If(e) => &e.base,
            Expr::Throw(e) => &e.base,
            Expr::Try(e) => &e.base,
            Expr::NativeRaw(e) => &e.base,
        }
    }

    fn base_mut(&mut self) -> &mut ExprBase {
        match self {
            Expr::Def(e) => &mut e.base,
            Expr::VarDeref(e) => &mut e.base,
            Expr::VarRef(e) => &mut e.base,
            Expr::Call(e) => &mut e.base,
            Expr::PrimitiveLiteral(e) => &mut e.base,
            Expr::Vector(e) => &mut e.base,
            Expr::Map(e) => &mut e.base,
            Expr::Set(e) => &mut e.base,
            Expr::LocalReference(e) => &mut e.base,
            Expr::Function(e) => &mut e.base,
            Expr::Recur(e) => &mut e.base,
            Expr::RecursionReference(e) => &mut e.base,
            Expr::NamedRecursion(e) => &mut e.base,
            Expr::Do(e) => &mut e.base,
            Expr::Let(e) => &mut e.base,
            Expr::If(e) => &mut e.base,
            Expr::Throw(e) => &mut e.base,
            Expr::Try(e) => &mut e.base,
            Expr::NativeRaw(e) => &mut e.base,
        }
    }

    /// This node's current position.
    pub fn position(&self) -> Position {
        self.base().position
    }

    /// This node's lexical frame.
    pub fn frame(&self) -> &Rc<Frame> {
        &self.base().frame
    }

    /// Propagates `pos` to this node and, for the composite variants that
    /// have a meaningful tail position, to their children:
    /// `do` marks all but its last value `Statement` and forwards `pos` to
    /// the last; `if` forwards `pos` to both branches; `let`/`try` forward
    /// `pos` to the last body expression and `Statement` to the rest. Every
    /// other variant just records its own position — it has no notion of a
    /// "last" child whose value escapes to the parent.
    pub fn propagate_position(&mut self, pos: Position) {
        self.base_mut().position = pos;
        match self {
            Expr::Do(e) => propagate_body(&mut e.values, pos),
            Expr::Let(e) => propagate_body(&mut e.body, pos),
            Expr::Try(e) => propagate_body(&mut e.body, pos),
            Expr::If(e) => {
                e.then.propagate_position(pos);
                if let Some(else_) = &mut e.else_ {
                    else_.propagate_position(pos);
                }
            }
            _ => {}
        }
    }
}

fn propagate_body(body: &mut [Expr], tail_pos: Position) {
    if let Some((last, init)) = body.split_last_mut() {
        for stmt in init {
            stmt.propagate_position(Position::Statement);
        }
        last.propagate_position(tail_pos);
    }
}
