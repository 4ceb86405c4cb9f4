use std::{
    any::Any,
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, OnceLock,
    },
};

use tracing::{debug, error, info, instrument, trace};

use crate::{
    catalog::ImplementationCatalog, config::Mode, table::RuntimeTable, Ident, RegistryConfig,
    RegistryError, RegistryResult,
};

/// Resolution registry: answers which implementation is currently bound to a
/// logical identifier.
///
/// The mode and the compiled mappings are fixed at construction. In runtime
/// mode a binding table is created on first use and lives as long as the
/// registry; `inject`/`revert`/`revert_all` are the only ways to change it.
#[derive(Debug)]
pub struct Registry {
    mode: Mode,
    compiled: HashMap<Ident, Ident>,
    table: OnceLock<RuntimeTable>,
    table_creations: AtomicUsize,
    catalog: ImplementationCatalog,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl Registry {
    pub fn new(config: RegistryConfig) -> Self {
        let mode = config.mode();
        let compiled = config.compiled_mappings();
        info!(
            "Building registry: mode={}, compiled mappings={}",
            mode,
            compiled.len()
        );
        Self {
            mode,
            compiled,
            table: OnceLock::new(),
            table_creations: AtomicUsize::new(0),
            catalog: ImplementationCatalog::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_compiled(&self) -> bool {
        self.mode == Mode::Compiled
    }

    pub fn compiled_mappings(&self) -> &HashMap<Ident, Ident> {
        &self.compiled
    }

    /// Implementation currently bound to `logical`. Falls back to `logical`
    /// itself when nothing is bound.
    pub fn resolve(&self, logical: &Ident) -> Ident {
        let resolved = match self.mode {
            Mode::Compiled => self.resolve_compiled(logical),
            Mode::Runtime => self
                .table()
                .get(logical)
                .unwrap_or_else(|| self.resolve_compiled(logical)),
        };
        trace!("Resolved {} -> {}", logical, resolved);
        resolved
    }

    /// Bind `logical` to `implementation`, replacing any previous binding.
    #[instrument(level = "debug", skip(self))]
    pub fn inject(&self, logical: Ident, implementation: Ident) -> RegistryResult<()> {
        let table = self.mutable_table("inject", &logical)?;
        if let Some(previous) = table.bind(logical.clone(), implementation.clone()) {
            debug!("Replaced binding {} -> {} with {}", logical, previous, implementation);
        } else {
            debug!("Bound {} -> {}", logical, implementation);
        }
        Ok(())
    }

    /// Bind `logical` to a freshly synthesized anonymous implementation
    /// holding `value`. Returns the synthesized identifier.
    ///
    /// The value stays in the catalog for the registry's lifetime; `revert`
    /// and `revert_all` only remove the binding.
    #[instrument(level = "debug", skip(self, value))]
    pub fn inject_with<T: Any + Send + Sync>(
        &self,
        logical: Ident,
        value: T,
    ) -> RegistryResult<Ident> {
        let table = self.mutable_table("inject", &logical)?;
        let implementation = self.catalog.synthesize(&logical, Arc::new(value))?;
        table.bind(logical.clone(), implementation.clone());
        debug!("Bound {} -> {}", logical, implementation);
        Ok(implementation)
    }

    /// Inject for the lifetime of the returned guard.
    ///
    /// Dropping the guard puts back whatever was bound before, unless the
    /// binding was changed by someone else in the meantime.
    #[instrument(level = "debug", skip(self))]
    pub fn inject_scoped(
        &self,
        logical: Ident,
        implementation: Ident,
    ) -> RegistryResult<InjectionGuard<'_>> {
        let table = self.mutable_table("inject", &logical)?;
        let previous = table.bind(logical.clone(), implementation.clone());
        debug!("Scoped binding {} -> {}", logical, implementation);
        Ok(InjectionGuard {
            table,
            logical,
            implementation,
            previous,
        })
    }

    /// Remove the runtime binding for `logical`. Unbound identifiers are a no-op.
    #[instrument(level = "debug", skip(self))]
    pub fn revert(&self, logical: &Ident) -> RegistryResult<()> {
        let table = self.mutable_table("revert", logical)?;
        if let Some(previous) = table.unbind(logical) {
            debug!("Reverted {} (was {})", logical, previous);
        }
        Ok(())
    }

    /// Drop every runtime binding. The table itself is kept.
    #[instrument(level = "debug", skip(self))]
    pub fn revert_all(&self) -> RegistryResult<()> {
        if self.is_compiled() {
            return Err(self.misuse("revert_all", &Ident::from("*")));
        }
        let removed = self.table().clear();
        debug!("Reverted all bindings ({} removed)", removed);
        Ok(())
    }

    pub fn is_injected(&self, logical: &Ident) -> bool {
        match self.mode {
            Mode::Compiled => false,
            Mode::Runtime => self.table.get().is_some_and(|table| table.contains(logical)),
        }
    }

    /// Current runtime bindings sorted by logical identifier.
    pub fn bindings(&self) -> Vec<(Ident, Ident)> {
        self.table
            .get()
            .map(RuntimeTable::snapshot)
            .unwrap_or_default()
    }

    /// Register a named implementation value so it can be looked up after
    /// resolution. Does not touch any mapping.
    pub fn provide<T: Any + Send + Sync>(&self, implementation: Ident, value: T) {
        self.catalog.provide(implementation, Arc::new(value));
    }

    pub fn implementation<T: Any + Send + Sync>(&self, implementation: &Ident) -> Option<Arc<T>> {
        self.catalog.get_as::<T>(implementation)
    }

    /// Resolve `logical` and fetch the bound implementation's value.
    pub fn resolve_implementation<T: Any + Send + Sync>(&self, logical: &Ident) -> Option<Arc<T>> {
        self.implementation::<T>(&self.resolve(logical))
    }

    pub fn has_table(&self) -> bool {
        self.table.get().is_some()
    }

    /// Number of runtime tables ever created by this registry (0 or 1).
    pub fn table_creations(&self) -> usize {
        self.table_creations.load(Ordering::SeqCst)
    }

    fn resolve_compiled(&self, logical: &Ident) -> Ident {
        self.compiled
            .get(logical)
            .cloned()
            .unwrap_or_else(|| logical.clone())
    }

    fn table(&self) -> &RuntimeTable {
        self.table.get_or_init(|| {
            self.table_creations.fetch_add(1, Ordering::SeqCst);
            debug!("Creating runtime binding table");
            RuntimeTable::new()
        })
    }

    fn mutable_table(
        &self,
        operation: &'static str,
        logical: &Ident,
    ) -> RegistryResult<&RuntimeTable> {
        if self.is_compiled() {
            return Err(self.misuse(operation, logical));
        }
        Ok(self.table())
    }

    fn misuse(&self, operation: &'static str, ident: &Ident) -> RegistryError {
        error!(
            "Rejected {} of `{}`: registry is in compiled mode",
            operation, ident
        );
        RegistryError::compiled_mode(operation, ident.clone())
    }
}

/// Restores the binding it replaced when dropped.
#[must_use = "the binding is reverted as soon as the guard is dropped"]
#[derive(Debug)]
pub struct InjectionGuard<'a> {
    table: &'a RuntimeTable,
    logical: Ident,
    implementation: Ident,
    previous: Option<Ident>,
}

impl InjectionGuard<'_> {
    pub fn logical(&self) -> &Ident {
        &self.logical
    }

    pub fn implementation(&self) -> &Ident {
        &self.implementation
    }
}

impl Drop for InjectionGuard<'_> {
    fn drop(&mut self) {
        let previous = self.previous.take();
        if self
            .table
            .restore(&self.logical, &self.implementation, previous)
        {
            debug!("Restored scoped binding for {}", self.logical);
        } else {
            debug!(
                "Scoped binding for {} was replaced, leaving it as is",
                self.logical
            );
        }
    }
}
