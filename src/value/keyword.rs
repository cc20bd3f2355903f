//! Interned keywords.
//!
//! Keywords are value-equal by `(ns, name)`, but the evaluator additionally
//! guarantees *pointer* identity between every keyword literal it evaluates
//! and the canonical handle produced by [`crate::Context::intern_keyword`]
//! for the same `(ns, name)` pair.

use super::callable::CollectionCall;
use super::Object;
use crate::diagnostics::Result;
use std::fmt;
use std::rc::Rc;

#[derive(Debug)]
struct KeywordData {
    ns: Option<Rc<str>>,
    name: Rc<str>,
}

/// An interned keyword handle. Cheap to clone (reference count bump).
#[derive(Debug, Clone)]
pub struct Keyword(Rc<KeywordData>);

impl Keyword {
    /// Constructs a keyword handle. Only [`crate::Context::intern_keyword`]
    /// should call this directly; everywhere else should go through the
    /// context so identity is canonical.
    pub(crate) fn new_interned(ns: Option<Rc<str>>, name: Rc<str>) -> Self {
        Self(Rc::new(KeywordData { ns, name }))
    }

    /// The keyword's namespace, if any.
    pub fn ns(&self) -> Option<&str> {
        self.0.ns.as_deref()
    }

    /// The keyword's bare name.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// True if `self` and `other` are the exact same interned instance.
    pub fn is_same_instance(&self, other: &Keyword) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Keyword {
    fn eq(&self, other: &Self) -> bool {
        self.0.ns == other.0.ns && self.0.name == other.0.name
    }
}
impl Eq for Keyword {}

impl std::hash::Hash for Keyword {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.ns.hash(state);
        self.0.name.hash(state);
    }
}

impl CollectionCall for Keyword {
    /// `(:k coll)` — looks `self` up as a key in a map-like `coll`, nil if
    /// absent or if `coll` isn't a map.
    fn call1(&self, arg: &Object) -> Result<Object> {
        Ok(lookup(self, arg).unwrap_or(Object::Nil))
    }

    fn call2(&self, arg: &Object, default: &Object) -> Result<Object> {
        Ok(lookup(self, arg).unwrap_or_else(|| default.clone()))
    }

    fn type_name(&self) -> &'static str {
        "keyword"
    }
}

fn lookup(key: &Keyword, coll: &Object) -> Option<Object> {
    let key_obj = Object::Keyword(key.clone());
    match coll {
        Object::ArrayMap(m) => m.get(&key_obj).cloned(),
        Object::HashMap(m) => m.get(&key_obj).cloned(),
        _ => None,
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.ns {
            Some(ns) => write!(f, ":{ns}/{}", self.0.name),
            None => write!(f, ":{}", self.0.name),
        }
    }
}
