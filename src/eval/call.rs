//! `call` evaluation (SPEC_FULL.md §4.4): evaluate the source and argument
//! expressions, then dispatch on whichever call capability the source
//! object implements.

use super::{require_value, Env};
use crate::ast::CallExpr;
use crate::context::Context;
use crate::diagnostics::{Error, Result};
use crate::jit::JitHost;
use crate::value::{dynamic_call, CallArgs, Object};
use std::rc::Rc;

pub(super) fn eval_call(
    ctx: &Rc<Context>,
    jit: &Rc<dyn JitHost>,
    env: &Env,
    call: &CallExpr,
) -> Result<Object> {
    let source = require_value(super::eval_core(ctx, jit, &call.source_expr, env)?)?;
    let source = match &source {
        Object::Var(v) => v.deref(),
        _ => source,
    };

    let mut args = Vec::with_capacity(call.arg_exprs.len());
    for arg_expr in &call.arg_exprs {
        args.push(require_value(super::eval_core(ctx, jit, arg_expr, env)?)?);
    }

    if let Some(callable) = source.as_callable() {
        return dynamic_call(callable, CallArgs::from_evaluated(args));
    }
    if let Some(coll) = source.as_collection_call() {
        return coll.call(&args);
    }
    if let Some(unary) = source.as_unary_call() {
        return unary.call(&args);
    }

    Err(Error::uncallable_source(source.type_name()))
}
