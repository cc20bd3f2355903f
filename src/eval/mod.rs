//! The evaluator core (SPEC_FULL.md §4): dispatches each of the 19
//! expression variants, threading a local environment used only by
//! JIT-compiled function bodies (`local_reference`, `recur`,
//! `recursion_reference`, `named_recursion` all require one).

mod call;
mod collections;
pub mod wrap;

pub use wrap::{wrap_expression, wrap_expressions};

use crate::ast::Expr;
use crate::context::Context;
use crate::diagnostics::{Error, Result};
use crate::jit::JitHost;
use crate::value::{Object, Symbol};
use std::rc::Rc;

/// The local environment available while interpreting a JIT-compiled
/// function body: parameter/`let` bindings, plus (for named functions) a
/// handle back to the function currently executing, used by
/// `recursion_reference`/`named_recursion`.
#[derive(Debug, Clone, Default)]
pub struct Env {
    locals: im::HashMap<Rc<str>, Object>,
    self_fn: Option<Object>,
}

impl Env {
    /// The empty environment used for top-level evaluation — no locals, no
    /// enclosing named function. Every function-body-only variant fails to
    /// resolve against it, which is exactly `EvalUnsupported`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// An environment for a freshly invoked arity: binds `params` to `args`
    /// positionally (respecting a variadic tail parameter), carrying over
    /// `self_fn` for recursive self-reference.
    pub fn for_arity(params: &[Symbol], is_variadic: bool, args: Vec<Object>, self_fn: Option<Object>) -> Self {
        let mut locals = im::HashMap::new();
        if is_variadic && !params.is_empty() {
            let fixed = &params[..params.len() - 1];
            let mut iter = args.into_iter();
            for p in fixed {
                locals.insert(Rc::from(p.name.as_ref()), iter.next().unwrap_or(Object::Nil));
            }
            let rest: Vec<Object> = iter.collect();
            let rest_list = crate::value::PersistentList::from_slice(&rest);
            if let Some(rest_param) = params.last() {
                locals.insert(Rc::from(rest_param.name.as_ref()), Object::List(rest_list));
            }
        } else {
            for (p, a) in params.iter().zip(args) {
                locals.insert(Rc::from(p.name.as_ref()), a);
            }
        }
        Self { locals, self_fn }
    }

    fn get_local(&self, name: &Symbol) -> Option<Object> {
        self.locals.get(name.name.as_ref()).cloned()
    }
}

/// What evaluating an expression inside a function body produced: either a
/// plain value, or an unwound `recur` carrying the next iteration's
/// arguments. Only the function-invocation trampoline
/// (`crate::jit::treewalk`) ever observes [`EvalOutcome::Recur`] — every
/// other caller immediately unwraps it via [`require_value`].
#[derive(Debug)]
pub(crate) enum EvalOutcome {
    Value(Object),
    Recur(Vec<Object>),
}

/// Unwraps an [`EvalOutcome`] that is required to be a value, e.g. a `call`
/// argument or an `if` condition — positions where a `recur` makes no sense.
pub(crate) fn require_value(outcome: EvalOutcome) -> Result<Object> {
    match outcome {
        EvalOutcome::Value(v) => Ok(v),
        EvalOutcome::Recur(_) => Err(Error::eval_unsupported("recur")),
    }
}

/// Evaluates `expr` at the top level: no enclosing locals, no enclosing
/// named function. `local_reference`, `recur`, `recursion_reference`, and
/// `named_recursion` all fail here with [`Error::EvalUnsupported`] — they
/// only make sense inside a JIT-compiled function frame
/// (SPEC_FULL.md §4.1, §7).
pub fn eval(ctx: &Rc<Context>, jit: &Rc<dyn JitHost>, expr: &Expr) -> Result<Object> {
    log::trace!("eval: top-level dispatch in ns {}", ctx.current_ns());
    require_value(eval_core(ctx, jit, expr, &Env::empty())?)
}

/// The shared dispatcher core, used both by top-level [`eval`] and by the
/// JIT bridge's function-body interpreter (which supplies a non-empty
/// [`Env`]).
pub(crate) fn eval_core(ctx: &Rc<Context>, jit: &Rc<dyn JitHost>, expr: &Expr, env: &Env) -> Result<EvalOutcome> {
    match expr {
        Expr::Def(e) => {
            let var = ctx.intern_var(&ctx.current_ns(), &e.name.name);
            if let Some(meta) = &e.base.meta {
                var.set_meta(meta.clone());
                var.set_dynamic(meta_flag(ctx, meta, "dynamic"));
            }
            if let Some(value_expr) = &e.value {
                let value = require_value(eval_core(ctx, jit, value_expr, env)?)?;
                var.bind_root(value);
            }
            Ok(EvalOutcome::Value(Object::Var(var)))
        }

        Expr::VarDeref(e) => {
            let var = ctx
                .find_var(&e.qualified_name)
                .ok_or_else(|| Error::var_not_found(e.qualified_name.qualified_name()))?;
            Ok(EvalOutcome::Value(var.deref()))
        }

        Expr::VarRef(e) => {
            let var = ctx
                .find_var(&e.qualified_name)
                .ok_or_else(|| Error::var_not_found(e.qualified_name.qualified_name()))?;
            Ok(EvalOutcome::Value(Object::Var(var)))
        }

        Expr::Call(e) => Ok(EvalOutcome::Value(call::eval_call(ctx, jit, env, e)?)),

        Expr::PrimitiveLiteral(e) => {
            let value = match &e.data {
                Object::Keyword(k) => Object::Keyword(ctx.intern_keyword(k.ns(), k.name())),
                other => other.clone(),
            };
            Ok(EvalOutcome::Value(value))
        }

        Expr::Vector(e) => {
            let mut elements = Vec::with_capacity(e.data_exprs.len());
            for item in &e.data_exprs {
                elements.push(require_value(eval_core(ctx, jit, item, env)?)?);
            }
            Ok(EvalOutcome::Value(collections::build_vector(elements, e.base.meta.clone())))
        }

        Expr::Map(e) => {
            let mut pairs = Vec::with_capacity(e.data_exprs.len());
            for (k, v) in &e.data_exprs {
                let key = require_value(eval_core(ctx, jit, k, env)?)?;
                let value = require_value(eval_core(ctx, jit, v, env)?)?;
                pairs.push((key, value));
            }
            Ok(EvalOutcome::Value(collections::build_map(pairs, e.base.meta.clone())))
        }

        Expr::Set(e) => {
            let mut elements = Vec::with_capacity(e.data_exprs.len());
            for item in &e.data_exprs {
                elements.push(require_value(eval_core(ctx, jit, item, env)?)?);
            }
            Ok(EvalOutcome::Value(collections::build_set(elements, e.base.meta.clone())))
        }

        Expr::LocalReference(e) => env
            .get_local(&e.name)
            .map(EvalOutcome::Value)
            .ok_or_else(|| Error::eval_unsupported("local_reference")),

        Expr::Function(e) => Ok(EvalOutcome::Value(Object::Function(jit.compile(ctx, e)?))),

        Expr::Recur(e) => {
            let mut args = Vec::with_capacity(e.arg_exprs.len());
            for arg in &e.arg_exprs {
                args.push(require_value(eval_core(ctx, jit, arg, env)?)?);
            }
            Ok(EvalOutcome::Recur(args))
        }

        Expr::RecursionReference(_) => env
            .self_fn
            .clone()
            .map(EvalOutcome::Value)
            .ok_or_else(|| Error::eval_unsupported("recursion_reference")),

        Expr::NamedRecursion(e) => {
            let self_fn = env
                .self_fn
                .clone()
                .ok_or_else(|| Error::eval_unsupported("named_recursion"))?;
            let mut args = Vec::with_capacity(e.arg_exprs.len());
            for arg in &e.arg_exprs {
                args.push(require_value(eval_core(ctx, jit, arg, env)?)?);
            }
            let callable = self_fn
                .as_callable()
                .ok_or_else(|| Error::uncallable_source(self_fn.type_name()))?;
            Ok(EvalOutcome::Value(crate::value::dynamic_call(
                callable,
                crate::value::CallArgs::from_evaluated(args),
            )?))
        }

        Expr::Do(e) => eval_body(ctx, jit, &e.values, env),

        Expr::Let(e) => {
            let mut inner = env.clone();
            for (name, value_expr) in &e.bindings {
                let value = require_value(eval_core(ctx, jit, value_expr, &inner)?)?;
                inner.locals.insert(Rc::from(name.name.as_ref()), value);
            }
            eval_body(ctx, jit, &e.body, &inner)
        }

        Expr::If(e) => {
            let condition = require_value(eval_core(ctx, jit, &e.condition, env)?)?;
            if condition.truthy() {
                eval_core(ctx, jit, &e.then, env)
            } else if let Some(else_) = &e.else_ {
                eval_core(ctx, jit, else_, env)
            } else {
                Ok(EvalOutcome::Value(Object::Nil))
            }
        }

        Expr::Throw(e) => {
            let payload = require_value(eval_core(ctx, jit, &e.value, env)?)?;
            Err(Error::UserThrow { payload })
        }

        Expr::Try(e) => match eval_body(ctx, jit, &e.body, env) {
            Ok(outcome) => Ok(outcome),
            Err(Error::UserThrow { payload }) => {
                let mut inner = env.clone();
                inner
                    .locals
                    .insert(Rc::from(e.catch_name.name.as_ref()), payload);
                eval_body(ctx, jit, &e.catch_body, &inner)
            }
            Err(other) => Err(other),
        },

        Expr::NativeRaw(e) => Ok(EvalOutcome::Value(jit.invoke_native(ctx, &e.key)?)),
    }
}

/// Reads a boolean flag out of a `def`'s metadata map, e.g. `:dynamic` in
/// `^:dynamic` (SPEC_FULL.md §4.2). Absent or non-map metadata reads false.
fn meta_flag(ctx: &Context, meta: &Object, key: &str) -> bool {
    let flag_kw = Object::Keyword(ctx.intern_keyword(None, key));
    let found = match meta {
        Object::ArrayMap(m) => m.get(&flag_kw).cloned(),
        Object::HashMap(m) => m.get(&flag_kw).cloned(),
        _ => None,
    };
    found.map(|v| v.truthy()).unwrap_or(false)
}

/// Evaluates a `do`/`let`/`try` body in order: every element but the last
/// is required to be a plain value (its own outcome discarded); the last
/// element's outcome — including a `recur` — is returned as-is
/// (SPEC_FULL.md §9 position propagation: the last element is in whatever
/// tail position the body itself occupies).
pub(crate) fn eval_body(ctx: &Rc<Context>, jit: &Rc<dyn JitHost>, body: &[Expr], env: &Env) -> Result<EvalOutcome> {
    let Some((last, init)) = body.split_last() else {
        return Ok(EvalOutcome::Value(Object::Nil));
    };
    for stmt in init {
        require_value(eval_core(ctx, jit, stmt, env)?)?;
    }
    eval_core(ctx, jit, last, env)
}

