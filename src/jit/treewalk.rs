//! The default, tree-walking [`JitHost`]/[`CodeGenerator`]: "compiling" a
//! function means building a closure that re-enters
//! [`crate::eval::eval_core`] against the function's own arities, with a
//! `recur` trampoline so tail self-calls don't grow the Rust stack.
//! No native code or IR is produced — see the module doc comment on
//! `crate::jit` for why that's in scope.

use super::{CodeGenerator, CompilationTarget, CompiledModule, JitHost};
use crate::ast::{FunctionArity, FunctionExpr};
use crate::context::{nest_module, Context};
use crate::diagnostics::{Error, Result};
use crate::eval::{eval_body, Env, EvalOutcome};
use crate::value::{Callable, CallArgs, Object};
use lru::LruCache;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::rc::{Rc, Weak};

const MODULE_CACHE_CAPACITY: usize = 256;

/// A JIT host backed by direct AST interpretation, with an LRU-bounded
/// cache of compiled modules and a registry for `native_raw` keys.
pub struct TreeWalkingHost {
    self_weak: Weak<TreeWalkingHost>,
    cache: RefCell<LruCache<String, Rc<dyn Callable>>>,
    natives: RefCell<HashMap<String, Object>>,
}

impl TreeWalkingHost {
    /// A fresh host with an empty module cache and no registered natives.
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|weak| Self {
            self_weak: weak.clone(),
            cache: RefCell::new(LruCache::new(
                NonZeroUsize::new(MODULE_CACHE_CAPACITY).expect("capacity is nonzero"),
            )),
            natives: RefCell::new(HashMap::new()),
        })
    }

    /// Registers a value resolvable by a `native_raw` expression whose key
    /// matches `key`.
    pub fn register_native(&self, key: impl Into<String>, value: Object) {
        self.natives.borrow_mut().insert(key.into(), value);
    }

    fn self_handle(&self) -> Rc<dyn JitHost> {
        self.self_weak
            .upgrade()
            .expect("TreeWalkingHost dropped while still compiling") as Rc<dyn JitHost>
    }
}

impl CodeGenerator for TreeWalkingHost {
    fn target(&self) -> CompilationTarget {
        CompilationTarget::TreeWalk
    }

    fn generate(&self, ctx: &Context, function_expr: &FunctionExpr) -> Result<CompiledModule> {
        Ok(CompiledModule {
            name: nest_module(&ctx.current_ns(), &function_expr.unique_name),
            function: Rc::new(function_expr.clone()),
        })
    }
}

impl JitHost for TreeWalkingHost {
    fn compile(&self, ctx: &Rc<Context>, function_expr: &FunctionExpr) -> Result<Rc<dyn Callable>> {
        let module = CodeGenerator::generate(self, ctx, function_expr)?;

        if let Some(hit) = self.cache.borrow_mut().get(&module.name) {
            log::debug!("jit: cache hit for module {}", module.name);
            return Ok(Rc::clone(hit));
        }
        log::debug!("jit: compiling module {}", module.name);

        let jit = self.self_handle();
        let compiled = Rc::new_cyclic(|weak| CompiledFunction {
            self_weak: weak.clone(),
            ctx: Rc::clone(ctx),
            jit,
            name: module.function.name.clone(),
            arities: module.function.arities.clone(),
        });
        let callable: Rc<dyn Callable> = compiled;
        self.cache.borrow_mut().put(module.name, Rc::clone(&callable));
        Ok(callable)
    }

    fn invoke_native(&self, _ctx: &Rc<Context>, key: &str) -> Result<Object> {
        self.natives
            .borrow()
            .get(key)
            .cloned()
            .ok_or_else(|| Error::jit_failure(format!("unregistered native_raw key: {key}")))
    }
}

/// A compiled, invocable function: the tree-walking host's sole
/// `Callable` implementation.
struct CompiledFunction {
    self_weak: Weak<CompiledFunction>,
    ctx: Rc<Context>,
    jit: Rc<dyn JitHost>,
    name: String,
    arities: Vec<FunctionArity>,
}

impl CompiledFunction {
    fn select_arity(&self, argc: usize) -> Result<&FunctionArity> {
        self.arities
            .iter()
            .find(|a| {
                if a.is_variadic {
                    argc + 1 >= a.params.len()
                } else {
                    argc == a.params.len()
                }
            })
            .ok_or_else(|| Error::invalid_arity("function", argc))
    }

    fn self_object(&self) -> Option<Object> {
        self.self_weak
            .upgrade()
            .map(|rc| Object::Function(rc as Rc<dyn Callable>))
    }
}

impl fmt::Debug for CompiledFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<compiled-fn {}>", self.name)
    }
}

impl Callable for CompiledFunction {
    fn call(&self, args: CallArgs) -> Result<Object> {
        let mut args = match args {
            CallArgs::Fixed(v) => v,
            CallArgs::WithRest(fixed, rest) => {
                let mut v: Vec<Object> = (*fixed).into_iter().collect();
                v.extend(rest.iter().cloned());
                v
            }
        };

        let arity = self.select_arity(args.len())?;
        let self_fn = self.self_object();
        let mut env = Env::for_arity(&arity.params, arity.is_variadic, args, self_fn.clone());

        loop {
            match eval_body(&self.ctx, &self.jit, &arity.body, &env)? {
                EvalOutcome::Value(v) => return Ok(v),
                EvalOutcome::Recur(next_args) => {
                    args = next_args;
                    env = Env::for_arity(&arity.params, arity.is_variadic, args, self_fn.clone());
                }
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
