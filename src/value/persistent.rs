//! Persistent, structurally-shared collections.
//!
//! Vector, hash-map, and hash-set are thin wrappers over `im`'s persistent
//! collections. The array-map is hand-rolled: `im` has no packed,
//! contiguous-slot small-map representation, and the evaluator needs one to
//! honor the `max_array_map_size` cutoff.

use super::callable::{CollectionCall, UnaryCall};
use super::Object;
use crate::diagnostics::Result;
use std::fmt;
use std::rc::Rc;

/// A persistent vector.
#[derive(Debug, Clone, Default)]
pub struct PersistentVector {
    meta: Option<Rc<Object>>,
    data: im::Vector<Object>,
}

impl PersistentVector {
    /// Builds a vector from already-evaluated elements, in order.
    pub fn from_elements(elements: Vec<Object>, meta: Option<Object>) -> Self {
        Self {
            meta: meta.map(Rc::new),
            data: elements.into_iter().collect(),
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the vector has no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element at `index`, if in bounds.
    pub fn get(&self, index: usize) -> Option<&Object> {
        self.data.get(index)
    }

    /// Attached metadata, if any.
    pub fn meta(&self) -> Option<&Object> {
        self.meta.as_deref()
    }

    /// Iterates front-to-back.
    pub fn iter(&self) -> im::vector::Iter<'_, Object> {
        self.data.iter()
    }
}

impl PartialEq for PersistentVector {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}
impl Eq for PersistentVector {}

impl std::hash::Hash for PersistentVector {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.data.len().hash(state);
        for item in self.data.iter() {
            item.hash(state);
        }
    }
}

impl fmt::Display for PersistentVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{item}")?;
        }
        write!(f, "]")
    }
}

/// A packed, contiguous-slot persistent map used below
/// [`super::MAX_ARRAY_MAP_SIZE`] entries.
#[derive(Debug, Clone, Default)]
pub struct PersistentArrayMap {
    meta: Option<Rc<Object>>,
    // Alternating key/value slots, in insertion order.
    slots: Rc<Vec<Object>>,
}

impl PersistentArrayMap {
    /// Builds an array-map from evaluated `(key, value)` pairs, in order.
    pub fn from_pairs(pairs: Vec<(Object, Object)>, meta: Option<Object>) -> Self {
        let mut slots = Vec::with_capacity(pairs.len() * 2);
        for (k, v) in pairs {
            slots.push(k);
            slots.push(v);
        }
        Self {
            meta: meta.map(Rc::new),
            slots: Rc::new(slots),
        }
    }

    /// Number of key/value entries.
    pub fn len(&self) -> usize {
        self.slots.len() / 2
    }

    /// True if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Linear-scan lookup, first match wins (later duplicate keys shadowed).
    pub fn get(&self, key: &Object) -> Option<&Object> {
        self.slots
            .chunks_exact(2)
            .find(|pair| &pair[0] == key)
            .map(|pair| &pair[1])
    }

    /// Attached metadata, if any.
    pub fn meta(&self) -> Option<&Object> {
        self.meta.as_deref()
    }

    /// Iterates `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Object, &Object)> {
        self.slots.chunks_exact(2).map(|pair| (&pair[0], &pair[1]))
    }
}

impl CollectionCall for PersistentArrayMap {
    fn call1(&self, arg: &Object) -> Result<Object> {
        Ok(self.get(arg).cloned().unwrap_or(Object::Nil))
    }

    fn call2(&self, arg: &Object, default: &Object) -> Result<Object> {
        Ok(self.get(arg).cloned().unwrap_or_else(|| default.clone()))
    }

    fn type_name(&self) -> &'static str {
        "persistent-array-map"
    }
}

impl PartialEq for PersistentArrayMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}
impl Eq for PersistentArrayMap {}

impl std::hash::Hash for PersistentArrayMap {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.len().hash(state);
    }
}

impl fmt::Display for PersistentArrayMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{k} {v}")?;
        }
        write!(f, "}}")
    }
}

/// A hashed persistent map, used at/above [`super::MAX_ARRAY_MAP_SIZE`]
/// entries.
#[derive(Debug, Clone, Default)]
pub struct PersistentHashMap {
    meta: Option<Rc<Object>>,
    data: im::HashMap<Object, Object>,
}

impl PersistentHashMap {
    /// Builds a hash-map from evaluated `(key, value)` pairs.
    pub fn from_pairs(pairs: Vec<(Object, Object)>, meta: Option<Object>) -> Self {
        Self {
            meta: meta.map(Rc::new),
            data: pairs.into_iter().collect(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Hashed lookup.
    pub fn get(&self, key: &Object) -> Option<&Object> {
        self.data.get(key)
    }

    /// Attached metadata, if any.
    pub fn meta(&self) -> Option<&Object> {
        self.meta.as_deref()
    }

    /// Iterates entries in unspecified order.
    pub fn iter(&self) -> im::hashmap::Iter<'_, Object, Object> {
        self.data.iter()
    }
}

impl CollectionCall for PersistentHashMap {
    fn call1(&self, arg: &Object) -> Result<Object> {
        Ok(self.get(arg).cloned().unwrap_or(Object::Nil))
    }

    fn call2(&self, arg: &Object, default: &Object) -> Result<Object> {
        Ok(self.get(arg).cloned().unwrap_or_else(|| default.clone()))
    }

    fn type_name(&self) -> &'static str {
        "persistent-hash-map"
    }
}

impl PartialEq for PersistentHashMap {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}
impl Eq for PersistentHashMap {}

impl std::hash::Hash for PersistentHashMap {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.data.len().hash(state);
    }
}

impl fmt::Display for PersistentHashMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{k} {v}")?;
        }
        write!(f, "}}")
    }
}

/// A persistent hash-set.
#[derive(Debug, Clone, Default)]
pub struct PersistentHashSet {
    meta: Option<Rc<Object>>,
    data: im::HashSet<Object>,
}

impl PersistentHashSet {
    /// Builds a set by freezing a transient built from evaluated elements.
    pub fn from_elements(elements: Vec<Object>, meta: Option<Object>) -> Self {
        Self {
            meta: meta.map(Rc::new),
            data: elements.into_iter().collect(),
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the set has no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Membership test.
    pub fn contains(&self, item: &Object) -> bool {
        self.data.contains(item)
    }

    /// Attached metadata, if any.
    pub fn meta(&self) -> Option<&Object> {
        self.meta.as_deref()
    }

    /// Iterates elements in unspecified order.
    pub fn iter(&self) -> im::hashset::Iter<'_, Object> {
        self.data.iter()
    }
}

impl UnaryCall for PersistentHashSet {
    fn call1(&self, arg: &Object) -> Result<Object> {
        if self.contains(arg) {
            Ok(arg.clone())
        } else {
            Ok(Object::Nil)
        }
    }

    fn type_name(&self) -> &'static str {
        "persistent-hash-set"
    }
}

impl PartialEq for PersistentHashSet {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}
impl Eq for PersistentHashSet {}

impl std::hash::Hash for PersistentHashSet {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.data.len().hash(state);
    }
}

impl fmt::Display for PersistentHashSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{{")?;
        for (i, item) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{item}")?;
        }
        write!(f, "}}")
    }
}

/// A mutable vector builder, frozen into a [`PersistentVector`].
#[derive(Debug, Clone, Default)]
pub struct TransientVector {
    data: Vec<Object>,
}

impl TransientVector {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an element.
    pub fn push(&mut self, value: Object) {
        self.data.push(value);
    }

    /// Freezes the builder into a persistent vector.
    pub fn persistent(self) -> PersistentVector {
        PersistentVector::from_elements(self.data, None)
    }
}

impl UnaryCall for TransientVector {
    fn call1(&self, arg: &Object) -> Result<Object> {
        match arg {
            Object::Integer(i) if *i >= 0 => Ok(self
                .data
                .get(*i as usize)
                .cloned()
                .unwrap_or(Object::Nil)),
            _ => Ok(Object::Nil),
        }
    }

    fn type_name(&self) -> &'static str {
        "transient-vector"
    }
}

/// A mutable hash-set builder, frozen into a [`PersistentHashSet`].
#[derive(Debug, Clone, Default)]
pub struct TransientHashSet {
    data: im::HashSet<Object>,
}

impl TransientHashSet {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an element.
    pub fn insert(&mut self, value: Object) {
        self.data.insert(value);
    }

    /// Freezes the builder into a persistent hash-set, optionally attaching
    /// metadata.
    pub fn persistent(self, meta: Option<Object>) -> PersistentHashSet {
        PersistentHashSet {
            meta: meta.map(Rc::new),
            data: self.data,
        }
    }
}

impl CollectionCall for TransientHashSet {
    fn call1(&self, arg: &Object) -> Result<Object> {
        if self.data.contains(arg) {
            Ok(arg.clone())
        } else {
            Ok(Object::Nil)
        }
    }

    fn call2(&self, arg: &Object, default: &Object) -> Result<Object> {
        if self.data.contains(arg) {
            Ok(arg.clone())
        } else {
            Ok(default.clone())
        }
    }

    fn type_name(&self) -> &'static str {
        "transient-hash-set"
    }
}
