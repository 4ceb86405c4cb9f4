use dashmap::{mapref::entry::Entry, DashMap};
use parking_lot::RwLock;

use crate::Ident;

/// Mutable binding table consulted in runtime mode.
///
/// Single-key operations go straight to the sharded map while holding the
/// gate shared, so they run in parallel. `clear` holds the gate exclusively:
/// a reader sees either every binding or none of them.
#[derive(Debug, Default)]
pub struct RuntimeTable {
    bindings: DashMap<Ident, Ident>,
    gate: RwLock<()>,
}

impl RuntimeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, logical: &Ident) -> Option<Ident> {
        let _gate = self.gate.read();
        self.bindings.get(logical).map(|entry| entry.value().clone())
    }

    /// Overwrite the binding for `logical`, returning the previous one.
    pub fn bind(&self, logical: Ident, implementation: Ident) -> Option<Ident> {
        let _gate = self.gate.read();
        self.bindings.insert(logical, implementation)
    }

    pub fn unbind(&self, logical: &Ident) -> Option<Ident> {
        let _gate = self.gate.read();
        self.bindings.remove(logical).map(|(_, implementation)| implementation)
    }

    /// Put `previous` back (or unbind when `None`), but only while `logical`
    /// is still bound to `expected`. Returns whether the table changed.
    pub fn restore(&self, logical: &Ident, expected: &Ident, previous: Option<Ident>) -> bool {
        let _gate = self.gate.read();
        match self.bindings.entry(logical.clone()) {
            Entry::Occupied(mut entry) if entry.get() == expected => {
                match previous {
                    Some(previous) => {
                        entry.insert(previous);
                    }
                    None => {
                        entry.remove();
                    }
                }
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, logical: &Ident) -> bool {
        let _gate = self.gate.read();
        self.bindings.contains_key(logical)
    }

    /// Drop every binding. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let _gate = self.gate.write();
        let removed = self.bindings.len();
        self.bindings.clear();
        removed
    }

    pub fn len(&self) -> usize {
        let _gate = self.gate.read();
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consistent copy of all bindings, sorted by logical identifier.
    pub fn snapshot(&self) -> Vec<(Ident, Ident)> {
        let _gate = self.gate.write();
        let mut bindings: Vec<_> = self
            .bindings
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        bindings.sort();
        bindings
    }
}
