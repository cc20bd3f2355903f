//! The `callable` capability and the literal-collection `call` capability
//! consumed by `call` evaluation.

use super::list::PersistentList;
use super::Object;
use crate::diagnostics::{Error, Result};
use std::fmt;

/// Arguments passed to a [`Callable`], already evaluated left-to-right.
///
/// `Fixed` covers 0..=10 arguments, matching the fixed-arity fast paths of
/// the reference implementation's `dynamic_call` overload set. `WithRest`
/// covers N > 10: the first ten positional arguments plus a trailing
/// persistent list of the remainder, per the variadic tail contract.
#[derive(Debug, Clone)]
pub enum CallArgs {
    /// 0 to 10 positional arguments.
    Fixed(Vec<Object>),
    /// The first 10 positional arguments, plus the remainder as a list.
    WithRest(Box<[Object; 10]>, PersistentList),
}

impl CallArgs {
    /// Builds the correct variant for a fully-evaluated argument vector,
    /// splitting off a variadic tail list once `args.len() > 10`.
    pub fn from_evaluated(mut args: Vec<Object>) -> Self {
        if args.len() <= 10 {
            Self::Fixed(args)
        } else {
            let rest: Vec<Object> = args.split_off(10);
            let fixed: [Object; 10] = args.try_into().expect("split_off(10) leaves len 10");
            Self::WithRest(Box::new(fixed), PersistentList::from_slice(&rest))
        }
    }

    /// Total argument count, fixed arguments plus however many are in the
    /// variadic tail.
    pub fn len(&self) -> usize {
        match self {
            Self::Fixed(args) => args.len(),
            Self::WithRest(_, rest) => 10 + rest.len(),
        }
    }

    /// True if no arguments were supplied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The callable capability: functions, multifns, and anything else a `call`
/// expression may invoke through `dynamic_call`.
pub trait Callable: fmt::Debug {
    /// Invokes the callable with already-evaluated arguments.
    fn call(&self, args: CallArgs) -> Result<Object>;

    /// A short name for error messages; defaults to `"fn"`.
    fn name(&self) -> &str {
        "fn"
    }
}

/// A native (non-AST) callable backed by a Rust closure, used to install
/// test/builtin functions without a real compiled function frame.
pub struct NativeFn {
    name: String,
    f: Box<dyn Fn(CallArgs) -> Result<Object>>,
}

impl NativeFn {
    /// Wraps `f` as a callable named `name`.
    pub fn new(name: impl Into<String>, f: impl Fn(CallArgs) -> Result<Object> + 'static) -> Self {
        Self {
            name: name.into(),
            f: Box::new(f),
        }
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<native-fn {}>", self.name)
    }
}

impl Callable for NativeFn {
    fn call(&self, args: CallArgs) -> Result<Object> {
        (self.f)(args)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Invokes `callable` with `args`. This is the evaluator's sole entry point
/// into user/native code for `call` expressions on callable objects.
pub fn dynamic_call(callable: &dyn Callable, args: CallArgs) -> Result<Object> {
    callable.call(args)
}

/// The 1-or-2-argument map-lookup-style call capability implemented by
/// keywords, hash-maps, array-maps, and transient hash-sets. Any other
/// arity is an [`Error::InvalidArity`].
pub trait CollectionCall: fmt::Debug {
    /// `(coll arg)` — single-argument lookup form.
    fn call1(&self, arg: &Object) -> Result<Object>;

    /// `(coll arg default)` — two-argument lookup-with-default form.
    fn call2(&self, arg: &Object, default: &Object) -> Result<Object>;

    /// Dispatches on evaluated argument count, rejecting anything but 1 or 2.
    fn call(&self, args: &[Object]) -> Result<Object> {
        match args {
            [a] => self.call1(a),
            [a, d] => self.call2(a, d),
            other => Err(Error::invalid_arity(self.type_name(), other.len())),
        }
    }

    /// Runtime type name used in `InvalidArity` messages.
    fn type_name(&self) -> &'static str;
}

/// The exactly-1-argument call capability implemented by persistent
/// hash-sets and transient vectors.
pub trait UnaryCall: fmt::Debug {
    /// `(coll arg)` — the only legal arity.
    fn call1(&self, arg: &Object) -> Result<Object>;

    /// Runtime type name used in `InvalidArity` messages.
    fn type_name(&self) -> &'static str;

    /// Dispatches on evaluated argument count, rejecting anything but 1.
    fn call(&self, args: &[Object]) -> Result<Object> {
        match args {
            [a] => self.call1(a),
            other => Err(Error::invalid_arity(self.type_name(), other.len())),
        }
    }
}
