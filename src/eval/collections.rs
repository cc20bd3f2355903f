//! Collection literal evaluation (SPEC_FULL.md §4.3): build a persistent
//! vector/map/set from already-evaluated element expressions, choosing
//! between the packed array-map and the hashed map at
//! [`crate::value::MAX_ARRAY_MAP_SIZE`].

use crate::value::{Object, PersistentHashSet, PersistentVector, MAX_ARRAY_MAP_SIZE};

pub(super) fn build_vector(elements: Vec<Object>, meta: Option<Object>) -> Object {
    Object::Vector(PersistentVector::from_elements(elements, meta))
}

pub(super) fn build_map(pairs: Vec<(Object, Object)>, meta: Option<Object>) -> Object {
    if pairs.len() <= MAX_ARRAY_MAP_SIZE {
        Object::ArrayMap(crate::value::PersistentArrayMap::from_pairs(pairs, meta))
    } else {
        Object::HashMap(crate::value::PersistentHashMap::from_pairs(pairs, meta))
    }
}

pub(super) fn build_set(elements: Vec<Object>, meta: Option<Object>) -> Object {
    Object::HashSet(PersistentHashSet::from_elements(elements, meta))
}
