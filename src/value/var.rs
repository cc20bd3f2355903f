//! Vars: namespaced, mutable reference cells.

use super::Object;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

struct VarData {
    ns: Rc<str>,
    name: Rc<str>,
    root: RefCell<Option<Object>>,
    dynamic: Cell<bool>,
    meta: RefCell<Option<Object>>,
}

/// A var: a named, mutable cell owned by a namespace.
///
/// `def` interns one (see [`crate::Context::intern_var`]); `var_deref` reads
/// its current root binding and `var_ref` returns the handle itself.
#[derive(Clone)]
pub struct Var(Rc<VarData>);

impl Var {
    pub(crate) fn new(ns: Rc<str>, name: Rc<str>) -> Self {
        Self(Rc::new(VarData {
            ns,
            name,
            root: RefCell::new(None),
            dynamic: Cell::new(false),
            meta: RefCell::new(None),
        }))
    }

    /// The namespace this var is interned in.
    pub fn ns(&self) -> &str {
        &self.0.ns
    }

    /// The var's bare name.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Binds the var's root value, per `def` semantics.
    pub fn bind_root(&self, value: Object) {
        *self.0.root.borrow_mut() = Some(value);
    }

    /// Dereferences the var's current root binding, or nil if unbound.
    pub fn deref(&self) -> Object {
        self.0.root.borrow().clone().unwrap_or(Object::Nil)
    }

    /// Sets the `:dynamic` bit, checked against a `:dynamic` key in `meta`.
    pub fn set_dynamic(&self, dynamic: bool) {
        self.0.dynamic.set(dynamic);
    }

    /// True if this var was defined with `^:dynamic` metadata.
    pub fn is_dynamic(&self) -> bool {
        self.0.dynamic.get()
    }

    /// Copies metadata from the `def`'s name symbol onto the var.
    pub fn set_meta(&self, meta: Object) {
        *self.0.meta.borrow_mut() = Some(meta);
    }

    /// The var's current metadata, if any.
    pub fn meta(&self) -> Option<Object> {
        self.0.meta.borrow().clone()
    }

    fn is_same_instance(&self, other: &Var) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        self.is_same_instance(other)
    }
}
impl Eq for Var {}

impl std::hash::Hash for Var {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#'{}/{}", self.0.ns, self.0.name)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#'{}/{}", self.0.ns, self.0.name)
    }
}
