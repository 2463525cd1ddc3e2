//! Variable registry: a dense, append-only bijection between variable names
//! and integer indices.
//!
//! One registry belongs to exactly one compilation. It must not be shared
//! across concurrent `compile()` calls: unlike a global, sharded,
//! `RwLock`-guarded symbol table, there is nothing here to shard or
//! synchronize.

use std::sync::Arc;

use rustc_hash::FxHashMap;

/// Dense index into a [`VariableRegistry`]. Assigned in first-seen order and
/// never reused for the registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarIndex(u32);

impl VarIndex {
    /// The raw index value.
    #[must_use]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// An ordered, append-only mapping between variable names and dense
/// indices.
#[derive(Debug, Default)]
pub struct VariableRegistry {
    names: Vec<Arc<str>>,
    indices: FxHashMap<Arc<str>, VarIndex>,
}

impl VariableRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        VariableRegistry::default()
    }

    /// Return the index for `name`, assigning the next free index on first
    /// sight.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` distinct variables are registered,
    /// a memory exhaustion scenario long before this limit is reachable.
    pub fn index(&mut self, name: &str) -> VarIndex {
        if let Some(&idx) = self.indices.get(name) {
            return idx;
        }
        let idx = VarIndex(u32::try_from(self.names.len()).expect(
            "variable count exceeds u32::MAX, which would exceed available memory first",
        ));
        let interned: Arc<str> = Arc::from(name);
        self.names.push(interned.clone());
        self.indices.insert(interned, idx);
        idx
    }

    /// Look up the index for `name` without assigning one.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<VarIndex> {
        self.indices.get(name).copied()
    }

    /// Reverse lookup: the name assigned to `idx`.
    ///
    /// # Panics
    /// Panics if `idx` was not produced by this registry (an internal
    /// invariant violation, never reachable from the public compilation
    /// path).
    #[must_use]
    pub fn name(&self, idx: VarIndex) -> &str {
        &self.names[idx.as_usize()]
    }

    /// The number of distinct variables registered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no variables have been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Allocate (or reuse) the auxiliary index naming the product of two
    /// existing variables, using the `"<a> * <b>"` naming convention.
    pub fn auxiliary_for(&mut self, a: VarIndex, b: VarIndex) -> VarIndex {
        let name = format!("{} * {}", self.name(a), self.name(b));
        self.index(&name)
    }
}
