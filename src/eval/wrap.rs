//! Wraps a bare expression (or a sequence of them) into a synthetic,
//! zero-arity function so the JIT bridge always compiles a function
//! (SPEC_FULL.md §4.6).

use crate::ast::{Expr, ExprBase, Frame, FrameKind, FunctionArity, FunctionContext, Position};
use crate::context::Context;
use std::rc::Rc;

/// Wraps a single expression as the sole, tail-positioned body statement of
/// a synthetic zero-arity function.
pub fn wrap_expression(ctx: &Context, mut expr: Expr) -> Expr {
    log::debug!("wrap: wrapping a single expression for JIT compilation");
    let frame = Rc::clone(expr.frame());
    let root = Frame::root_of(&frame);
    root.set_kind(FrameKind::Fn);
    let unique_name = ctx.unique_string("fn");
    root.set_fn_ctx(FunctionContext::new(unique_name.clone(), unique_name.clone()));
    expr.propagate_position(Position::Tail);

    Expr::Function(crate::ast::FunctionExpr {
        base: ExprBase::new(frame),
        name: unique_name.clone(),
        unique_name,
        arities: vec![FunctionArity {
            frame: root,
            params: Vec::new(),
            is_variadic: false,
            body: vec![expr],
        }],
    })
}

/// Wraps a sequence of expressions as the ordered body of a synthetic
/// zero-arity function, `do`-style (all but the last are `Statement`, the
/// last is `Tail`).
///
/// If `exprs` is empty, per SPEC_FULL.md §4.6 this wraps a nil-literal
/// expression at tail position, framed by the analyzer's `root_frame`,
/// instead of panicking on what is a spec-mandated input.
///
/// Otherwise, faithfully reproduces the reference implementation's quirk of
/// pushing `exprs[0]` onto the body twice — once ahead of the loop that
/// copies the whole sequence, and again as that loop's first iteration — so
/// the first expression is evaluated (and any side effect performed) twice.
/// See `DESIGN.md`'s Open Question entry for why this is preserved rather
/// than "fixed".
pub fn wrap_expressions(ctx: &Context, exprs: Vec<Expr>, root_frame: &Rc<Frame>) -> Expr {
    if exprs.is_empty() {
        log::debug!("wrap: wrapping zero expressions, falling back to a nil literal");
        let nil = Expr::PrimitiveLiteral(crate::ast::PrimitiveLiteralExpr {
            base: ExprBase::new(Rc::clone(root_frame)),
            data: crate::value::Object::Nil,
        });
        return wrap_expression(ctx, nil);
    }
    log::debug!("wrap: wrapping {} expressions for JIT compilation", exprs.len());

    let frame = Rc::clone(exprs[0].frame());
    let root = Frame::root_of(&frame);
    root.set_kind(FrameKind::Fn);
    let unique_name = ctx.unique_string("fn");
    root.set_fn_ctx(FunctionContext::new(unique_name.clone(), unique_name.clone()));

    let mut body = Vec::with_capacity(exprs.len() + 1);
    body.push(exprs[0].clone());
    body.extend(exprs);

    if let Some((last, init)) = body.split_last_mut() {
        for stmt in init {
            stmt.propagate_position(Position::Statement);
        }
        last.propagate_position(Position::Tail);
    }

    Expr::Function(crate::ast::FunctionExpr {
        base: ExprBase::new(frame),
        name: unique_name.clone(),
        unique_name,
        arities: vec![FunctionArity {
            frame: root,
            params: Vec::new(),
            is_variadic: false,
            body,
        }],
    })
}
