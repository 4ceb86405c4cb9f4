use std::{
    any::Any,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use dashmap::{mapref::entry::Entry, DashMap};
use tracing::{debug, error};
use uuid::Uuid;

use crate::{Ident, RegistryError, RegistryResult};

pub type Implementation = Arc<dyn Any + Send + Sync>;

/// Implementation values keyed by implementation identifier.
///
/// Named implementations are provided by the application; anonymous ones are
/// synthesized here from a value handed to `inject_with`.
pub struct ImplementationCatalog {
    implementations: DashMap<Ident, Implementation>,
    token: String,
    sequence: AtomicU64,
}

impl Default for ImplementationCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ImplementationCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImplementationCatalog")
            .field("token", &self.token)
            .field("implementations", &self.implementations.len())
            .field("synthesized", &self.sequence.load(Ordering::Relaxed))
            .finish()
    }
}

impl ImplementationCatalog {
    pub fn new() -> Self {
        let mut token = Uuid::new_v4().simple().to_string();
        token.truncate(8);
        Self {
            implementations: DashMap::new(),
            token,
            sequence: AtomicU64::new(0),
        }
    }

    /// Register (or replace) a named implementation.
    pub fn provide(&self, implementation: Ident, value: Implementation) {
        debug!("Providing implementation: {}", implementation);
        self.implementations.insert(implementation, value);
    }

    /// Materialize `value` as a fresh anonymous implementation of `logical`.
    ///
    /// Never replaces an existing entry: a name clash is reported as
    /// `SynthesisCollision` and the catalog is left untouched.
    pub fn synthesize(&self, logical: &Ident, value: Implementation) -> RegistryResult<Ident> {
        let name = self.next_name(logical);
        match self.implementations.entry(name.clone()) {
            Entry::Occupied(_) => {
                error!("Synthesized implementation name already taken: {}", name);
                Err(RegistryError::SynthesisCollision(name))
            }
            Entry::Vacant(slot) => {
                slot.insert(value);
                debug!("Synthesized implementation {} for {}", name, logical);
                Ok(name)
            }
        }
    }

    pub fn get(&self, implementation: &Ident) -> Option<Implementation> {
        self.implementations
            .get(implementation)
            .map(|entry| entry.value().clone())
    }

    pub fn get_as<T: Any + Send + Sync>(&self, implementation: &Ident) -> Option<Arc<T>> {
        self.get(implementation)?.downcast::<T>().ok()
    }

    pub fn contains(&self, implementation: &Ident) -> bool {
        self.implementations.contains_key(implementation)
    }

    pub fn len(&self) -> usize {
        self.implementations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.implementations.is_empty()
    }

    fn next_name(&self, logical: &Ident) -> Ident {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        Ident::new(format!("{}#anon-{}-{}", logical, self.token, sequence))
    }
}
