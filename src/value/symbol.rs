//! Symbols: unqualified or namespace-qualified identifiers.

use std::fmt;
use std::rc::Rc;

/// A symbol, optionally namespace-qualified (`ns/name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    /// Optional namespace portion.
    pub ns: Option<Rc<str>>,
    /// The symbol's bare name.
    pub name: Rc<str>,
}

impl Symbol {
    /// Creates an unqualified symbol.
    pub fn new(name: impl Into<Rc<str>>) -> Self {
        Self {
            ns: None,
            name: name.into(),
        }
    }

    /// Creates a namespace-qualified symbol.
    pub fn qualified(ns: impl Into<Rc<str>>, name: impl Into<Rc<str>>) -> Self {
        Self {
            ns: Some(ns.into()),
            name: name.into(),
        }
    }

    /// The fully-qualified display form, `ns/name` or just `name`.
    pub fn qualified_name(&self) -> String {
        match &self.ns {
            Some(ns) => format!("{ns}/{}", self.name),
            None => self.name.to_string(),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())
    }
}
