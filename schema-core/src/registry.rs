//! The schema registry: an arena of validator nodes addressed by absolute
//! URI, with shared (`Key`-based) handles so cyclic `$ref`s are
//! representable without reference counting.
//!
//! Generic over the node payload type `T` so this crate has no dependency
//! on the draft-07 keyword set that lives in `schema-json` — mirrors the
//! teacher's split between a dialect-agnostic arena and the dialect's own
//! keyword implementations.

use ahash::AHashMap;
use schema_uri::SchemaUri;
use slotmap::SlotMap;
use tracing::{trace, warn};

use crate::error::{DuplicateUriCtx, DuplicateUriError, UnresolvedReferenceError};

slotmap::new_key_type! {
    /// A unique handle to a [`Registry`] entry. Cheap to copy; stable for
    /// the registry's lifetime.
    pub struct Key;
}

/// Maps every absolute URI produced during schema traversal to a node
/// handle. Built incrementally by a schema builder, then
/// [`frozen`](Registry::freeze) once every `$ref` has been resolved or
/// recorded as pending.
pub struct Registry<T> {
    arena: SlotMap<Key, T>,
    by_uri: AHashMap<SchemaUri, Key>,
    pending_refs: Vec<SchemaUri>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self { arena: SlotMap::with_key(), by_uri: AHashMap::new(), pending_refs: Vec::new() }
    }
}

impl<T> Registry<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `node` under `uri`. Fails if `uri` is already registered
    /// (an `$id` collision), per the registry invariant that no two nodes
    /// share an absolute URI.
    pub fn insert(&mut self, uri: SchemaUri, node: T) -> Result<Key, DuplicateUriError> {
        if self.by_uri.contains_key(&uri) {
            return DuplicateUriCtx { uri: uri.to_string() }.fail();
        }
        let key = self.arena.insert(node);
        self.by_uri.insert(uri, key);
        Ok(key)
    }

    /// Reserves a slot before the node's contents are known, returning a
    /// `Key` that can be referenced (e.g. by `$ref` back-edges) before
    /// [`fill`](Registry::fill) supplies the payload.
    pub fn reserve(&mut self, placeholder: T) -> Key {
        self.arena.insert(placeholder)
    }

    pub fn fill(&mut self, key: Key, node: T) {
        self.arena[key] = node;
    }

    pub fn bind_uri(&mut self, uri: SchemaUri, key: Key) -> Result<(), DuplicateUriError> {
        if self.by_uri.contains_key(&uri) {
            return DuplicateUriCtx { uri: uri.to_string() }.fail();
        }
        self.by_uri.insert(uri, key);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, key: Key) -> Option<&T> {
        self.arena.get(key)
    }

    #[must_use]
    pub fn resolve(&self, uri: &SchemaUri) -> Option<Key> {
        let key = self.by_uri.get(uri).copied();
        if key.is_some() {
            trace!(uri = %uri, "ref cache hit");
        }
        key
    }

    /// Records a `$ref` target that did not resolve at build time so it can
    /// be verified once the whole schema document has been registered.
    pub fn record_pending(&mut self, uri: SchemaUri) {
        self.pending_refs.push(uri);
    }

    /// Verifies every pending `$ref` now resolves. Called once before the
    /// registry is handed out for validation.
    pub fn freeze(self) -> Result<Self, UnresolvedReferenceError> {
        for uri in &self.pending_refs {
            if !self.by_uri.contains_key(uri) {
                warn!(uri = %uri, "dangling reference detected");
                return crate::error::UnresolvedReferenceCtx { uri: uri.to_string() }.fail();
            }
        }
        Ok(self)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}
