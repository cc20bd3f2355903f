//! The runtime object model.
//!
//! This is the evaluator's external collaborator: a closed universe of
//! runtime values plus the handful of
//! capabilities (`truthy`, `deref`, `dynamic_call`, persistent-collection
//! construction) the evaluator actually depends on. It is not a production
//! object system — there is no reflection, no protocol dispatch beyond the
//! two capability traits below, and numeric towers/printing are
//! deliberately minimal.

mod callable;
mod keyword;
mod list;
mod persistent;
mod symbol;
mod var;

pub use callable::{dynamic_call, CallArgs, Callable, CollectionCall, NativeFn, UnaryCall};
pub use keyword::Keyword;
pub use list::PersistentList;
pub use persistent::{
    PersistentArrayMap, PersistentHashMap, PersistentHashSet, PersistentVector, TransientHashSet,
    TransientVector,
};
pub use symbol::Symbol;
pub use var::Var;

use std::fmt;
use std::rc::Rc;

/// The packed array-map/hash-map cutoff. Map literals
/// with at most this many entries are built as a contiguous array-map;
/// above it, a hashed persistent map.
pub const MAX_ARRAY_MAP_SIZE: usize = 8;

/// The runtime object universe.
#[derive(Debug, Clone)]
pub enum Object {
    /// `nil`.
    Nil,
    /// `true`/`false`.
    Bool(bool),
    /// A fixed-precision integer.
    Integer(i64),
    /// A floating-point real.
    Real(f64),
    /// An immutable string.
    Str(Rc<str>),
    /// An (unqualified or namespace-qualified) symbol.
    Symbol(Symbol),
    /// An interned keyword.
    Keyword(Keyword),
    /// A var handle (not dereferenced).
    Var(Var),
    /// A callable function object.
    Function(Rc<dyn Callable>),
    /// A persistent (cons-cell) list.
    List(PersistentList),
    /// A persistent vector.
    Vector(PersistentVector),
    /// A packed, small persistent map.
    ArrayMap(PersistentArrayMap),
    /// A hashed persistent map.
    HashMap(PersistentHashMap),
    /// A persistent hash-set.
    HashSet(PersistentHashSet),
    /// A mutable, not-yet-frozen vector builder.
    TransientVector(TransientVector),
    /// A mutable, not-yet-frozen hash-set builder.
    TransientHashSet(TransientHashSet),
}

impl Object {
    /// The `false`/`nil` vs. everything-else truthiness rule used by `if`.
    pub fn truthy(&self) -> bool {
        !matches!(self, Object::Nil | Object::Bool(false))
    }

    /// Runtime type name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Nil => "nil",
            Object::Bool(_) => "boolean",
            Object::Integer(_) => "integer",
            Object::Real(_) => "real",
            Object::Str(_) => "string",
            Object::Symbol(_) => "symbol",
            Object::Keyword(_) => "keyword",
            Object::Var(_) => "var",
            Object::Function(_) => "function",
            Object::List(_) => "persistent-list",
            Object::Vector(_) => "persistent-vector",
            Object::ArrayMap(_) => "persistent-array-map",
            Object::HashMap(_) => "persistent-hash-map",
            Object::HashSet(_) => "persistent-hash-set",
            Object::TransientVector(_) => "transient-vector",
            Object::TransientHashSet(_) => "transient-hash-set",
        }
    }

    /// The callable capability predicate.
    pub fn as_callable(&self) -> Option<&dyn Callable> {
        match self {
            Object::Function(f) => Some(f.as_ref()),
            _ => None,
        }
    }

    /// The 1/2-arg map-lookup-style callable capability.
    pub fn as_collection_call(&self) -> Option<&dyn CollectionCall> {
        match self {
            Object::Keyword(k) => Some(k),
            Object::ArrayMap(m) => Some(m),
            Object::HashMap(m) => Some(m),
            Object::TransientHashSet(s) => Some(s),
            _ => None,
        }
    }

    /// The exactly-1-arg callable capability.
    pub fn as_unary_call(&self) -> Option<&dyn UnaryCall> {
        match self {
            Object::HashSet(s) => Some(s),
            Object::TransientVector(v) => Some(v),
            _ => None,
        }
    }

    /// `deref` on a var; for any other object this is a caller bug, not a
    /// spec'd error path, so it panics (mirrors `var.unwrap()->deref()` in
    /// the reference implementation, which is only ever called on a var).
    pub fn deref_var(&self) -> Object {
        match self {
            Object::Var(v) => v.deref(),
            other => panic!("deref_var called on non-var object: {}", other.type_name()),
        }
    }
}

/// Truthy predicate, as a free function mirroring the external interface.
pub fn truthy(obj: &Object) -> bool {
    obj.truthy()
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Nil, Object::Nil) => true,
            (Object::Bool(a), Object::Bool(b)) => a == b,
            (Object::Integer(a), Object::Integer(b)) => a == b,
            (Object::Real(a), Object::Real(b)) => a.to_bits() == b.to_bits(),
            (Object::Str(a), Object::Str(b)) => a == b,
            (Object::Symbol(a), Object::Symbol(b)) => a == b,
            (Object::Keyword(a), Object::Keyword(b)) => a == b,
            (Object::Var(a), Object::Var(b)) => a == b,
            (Object::Function(a), Object::Function(b)) => Rc::ptr_eq(a, b),
            (Object::List(a), Object::List(b)) => a == b,
            (Object::Vector(a), Object::Vector(b)) => a == b,
            (Object::ArrayMap(a), Object::ArrayMap(b)) => a == b,
            (Object::HashMap(a), Object::HashMap(b)) => a == b,
            (Object::HashSet(a), Object::HashSet(b)) => a == b,
            _ => false,
        }
    }
}
impl Eq for Object {}

impl std::hash::Hash for Object {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Object::Nil => {}
            Object::Bool(b) => b.hash(state),
            Object::Integer(i) => i.hash(state),
            Object::Real(r) => r.to_bits().hash(state),
            Object::Str(s) => s.hash(state),
            Object::Symbol(s) => s.hash(state),
            Object::Keyword(k) => k.hash(state),
            Object::Var(v) => v.hash(state),
            Object::Function(f) => (Rc::as_ptr(f) as *const () as usize).hash(state),
            Object::List(l) => l.hash(state),
            Object::Vector(v) => v.hash(state),
            Object::ArrayMap(m) => m.hash(state),
            Object::HashMap(m) => m.hash(state),
            Object::HashSet(s) => s.hash(state),
            Object::TransientVector(_) | Object::TransientHashSet(_) => {
                // Transients are mutable builders; hashing one is a caller
                // bug, but we don't want to panic inside a Hash impl.
                0u8.hash(state);
            }
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Nil => write!(f, "nil"),
            Object::Bool(b) => write!(f, "{b}"),
            Object::Integer(i) => write!(f, "{i}"),
            Object::Real(r) => write!(f, "{r}"),
            Object::Str(s) => write!(f, "{s:?}"),
            Object::Symbol(s) => write!(f, "{s}"),
            Object::Keyword(k) => write!(f, "{k}"),
            Object::Var(v) => write!(f, "{v}"),
            Object::Function(fun) => write!(f, "#<fn {}>", fun.name()),
            Object::List(l) => write!(f, "{l}"),
            Object::Vector(v) => write!(f, "{v}"),
            Object::ArrayMap(m) => write!(f, "{m}"),
            Object::HashMap(m) => write!(f, "{m}"),
            Object::HashSet(s) => write!(f, "{s}"),
            Object::TransientVector(_) => write!(f, "#<transient-vector>"),
            Object::TransientHashSet(_) => write!(f, "#<transient-hash-set>"),
        }
    }
}
