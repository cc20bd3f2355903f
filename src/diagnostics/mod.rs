//! Error handling for the evaluator core.
//!
//! The evaluator never recovers from a failed sub-evaluation: every error
//! kind here escapes the current `eval` call and is the caller's (REPL,
//! file loader, test harness) responsibility to present.

use crate::value::Object;
use std::fmt;

/// Result type used throughout the evaluator.
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds the evaluator core can raise. See `SPEC_FULL.md` §7.
#[derive(Debug, Clone)]
pub enum Error {
    /// A variant that only makes sense inside a JIT-compiled function frame
    /// reached the dispatcher directly (`local_reference`, `recur`,
    /// `recursion_reference`, `named_recursion`).
    EvalUnsupported {
        /// Name of the unsupported variant, for diagnostics.
        variant: &'static str,
    },

    /// A `call` expression's source evaluated to a non-callable,
    /// non-collection-callable object.
    UncallableSource {
        /// Runtime type name of the offending source object.
        type_name: &'static str,
    },

    /// A keyword/map/set was called with a disallowed number of arguments.
    InvalidArity {
        /// Runtime type name of the callable collection.
        type_name: &'static str,
        /// Number of arguments actually supplied.
        actual: usize,
    },

    /// `var_ref`/`var_deref` referenced an unknown qualified symbol.
    VarNotFound {
        /// The fully-qualified symbol name that could not be resolved.
        qualified_name: String,
    },

    /// A `throw` expression was evaluated.
    UserThrow {
        /// The evaluated throw payload.
        payload: Object,
    },

    /// Code generation or JIT module registration failed.
    JitFailure {
        /// Human-readable failure description.
        message: String,
    },
}

impl Error {
    /// Shorthand constructor for [`Error::EvalUnsupported`].
    pub fn eval_unsupported(variant: &'static str) -> Self {
        Self::EvalUnsupported { variant }
    }

    /// Shorthand constructor for [`Error::UncallableSource`].
    pub fn uncallable_source(type_name: &'static str) -> Self {
        Self::UncallableSource { type_name }
    }

    /// Shorthand constructor for [`Error::InvalidArity`].
    pub fn invalid_arity(type_name: &'static str, actual: usize) -> Self {
        Self::InvalidArity { type_name, actual }
    }

    /// Shorthand constructor for [`Error::VarNotFound`].
    pub fn var_not_found(qualified_name: impl Into<String>) -> Self {
        Self::VarNotFound {
            qualified_name: qualified_name.into(),
        }
    }

    /// Shorthand constructor for [`Error::JitFailure`].
    pub fn jit_failure(message: impl Into<String>) -> Self {
        Self::JitFailure {
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EvalUnsupported { variant } => {
                write!(f, "cannot eval `{variant}` outside a compiled function frame")
            }
            Self::UncallableSource { type_name } => {
                write!(f, "invalid call: `{type_name}` is not callable")
            }
            Self::InvalidArity { type_name, actual } => {
                write!(f, "invalid call with {actual} args to: `{type_name}`")
            }
            Self::VarNotFound { qualified_name } => {
                write!(f, "unable to resolve var: {qualified_name}")
            }
            Self::UserThrow { payload } => write!(f, "uncaught throw: {payload}"),
            Self::JitFailure { message } => write!(f, "JIT failure: {message}"),
        }
    }
}

impl std::error::Error for Error {}
