//! The single-process [`Context`]: interned vars/keywords, the namespace
//! registry, and the naming helpers the JIT bridge depends on.

use crate::value::{Keyword, Symbol, Var};
use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

type KeywordKey = (Option<Rc<str>>, Rc<str>);

/// A namespace: an ordered table of interned vars.
#[derive(Debug, Default)]
pub struct Namespace {
    name: Rc<str>,
    vars: RefCell<IndexMap<Rc<str>, Var>>,
}

impl Namespace {
    fn new(name: Rc<str>) -> Self {
        Self {
            name,
            vars: RefCell::new(IndexMap::new()),
        }
    }

    /// This namespace's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Vars currently interned in this namespace, in interning order.
    pub fn vars(&self) -> Vec<Var> {
        self.vars.borrow().values().cloned().collect()
    }
}

/// The evaluator's single-process external collaborator: interning tables,
/// the namespace registry, and the current-namespace var. Not `Sync` —
/// matches the single-threaded, re-entrant evaluator model.
#[derive(Debug)]
pub struct Context {
    namespaces: RefCell<IndexMap<Rc<str>, Rc<Namespace>>>,
    keywords: RefCell<HashMap<KeywordKey, Keyword>>,
    current_ns: RefCell<Rc<str>>,
    unique_counter: Cell<u64>,
}

impl Context {
    /// A fresh context with `default_ns` registered and made current.
    pub fn new(default_ns: impl Into<Rc<str>>) -> Self {
        let default_ns = default_ns.into();
        let mut namespaces = IndexMap::new();
        namespaces.insert(
            Rc::clone(&default_ns),
            Rc::new(Namespace::new(Rc::clone(&default_ns))),
        );
        Self {
            namespaces: RefCell::new(namespaces),
            keywords: RefCell::new(HashMap::new()),
            current_ns: RefCell::new(default_ns),
            unique_counter: Cell::new(0),
        }
    }

    /// The currently active namespace name.
    pub fn current_ns(&self) -> Rc<str> {
        Rc::clone(&self.current_ns.borrow())
    }

    /// Switches the current namespace, registering it if new.
    pub fn set_current_ns(&self, ns: impl Into<Rc<str>>) {
        let ns = ns.into();
        self.ensure_namespace(&ns);
        *self.current_ns.borrow_mut() = ns;
    }

    fn ensure_namespace(&self, ns: &Rc<str>) -> Rc<Namespace> {
        let mut namespaces = self.namespaces.borrow_mut();
        namespaces
            .entry(Rc::clone(ns))
            .or_insert_with(|| Rc::new(Namespace::new(Rc::clone(ns))))
            .clone()
    }

    /// Interns (or returns the existing) var for `ns/name`, per `def`
    /// semantics.
    pub fn intern_var(&self, ns: &str, name: &str) -> Var {
        let ns: Rc<str> = Rc::from(ns);
        let namespace = self.ensure_namespace(&ns);
        let mut vars = namespace.vars.borrow_mut();
        vars.entry(Rc::from(name))
            .or_insert_with(|| Var::new(Rc::clone(&ns), Rc::from(name)))
            .clone()
    }

    /// Resolves a (possibly namespace-qualified) symbol to an already
    /// interned var, defaulting to the current namespace when unqualified.
    pub fn find_var(&self, qualified_name: &Symbol) -> Option<Var> {
        let ns = qualified_name
            .ns
            .clone()
            .unwrap_or_else(|| self.current_ns());
        let namespace = {
            let namespaces = self.namespaces.borrow();
            Rc::clone(namespaces.get(&ns)?)
        };
        let vars = namespace.vars.borrow();
        vars.get(&qualified_name.name).cloned()
    }

    /// Interns (or returns the existing) keyword for `(ns, name)`, with
    /// guaranteed pointer identity across re-interning.
    pub fn intern_keyword(&self, ns: Option<&str>, name: &str) -> Keyword {
        let key = (ns.map(Rc::from), Rc::from(name));
        let mut keywords = self.keywords.borrow_mut();
        keywords
            .entry(key.clone())
            .or_insert_with(|| Keyword::new_interned(key.0.clone(), Rc::clone(&key.1)))
            .clone()
    }

    /// A monotonically increasing string unique to this context, used to
    /// build fresh function/module names during wrapping and JIT naming.
    pub fn unique_string(&self, prefix: &str) -> String {
        let n = self.unique_counter.get();
        self.unique_counter.set(n + 1);
        format!("{prefix}_{n}")
    }
}

/// Mangles a Lisp-style identifier into one legal as a host-language
/// function/module name, escaping the punctuation Lisp identifiers allow
/// that Rust identifiers don't.
pub fn munge(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        match ch {
            '-' => out.push('_'),
            '!' => out.push_str("_BANG_"),
            '?' => out.push_str("_QMARK_"),
            '*' => out.push_str("_STAR_"),
            '+' => out.push_str("_PLUS_"),
            '/' => out.push_str("_SLASH_"),
            '<' => out.push_str("_LT_"),
            '>' => out.push_str("_GT_"),
            '=' => out.push_str("_EQ_"),
            '\'' => out.push_str("_SINGLEQUOTE_"),
            '.' => out.push_str("_DOT_"),
            other => out.push(other),
        }
    }
    out
}

/// Builds a nested module path for the JIT bridge's generated modules,
/// combining a namespace with a mangled, uniquified leaf name.
pub fn nest_module(namespace: &str, leaf: &str) -> String {
    format!("{}.{}", munge(namespace), munge(leaf))
}
