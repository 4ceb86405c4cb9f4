//! Process-wide registry.
//!
//! Call [`init`] once during start-up to pick the mode and compiled mappings.
//! If nothing calls it, the first [`global`] access builds a runtime-mode
//! registry with no compiled mappings.

use std::sync::OnceLock;

use tracing::error;

use crate::{Registry, RegistryConfig, RegistryError, RegistryResult};

static GLOBAL: OnceLock<Registry> = OnceLock::new();

pub fn init(config: RegistryConfig) -> RegistryResult<&'static Registry> {
    let mut config = Some(config);
    let registry = GLOBAL.get_or_init(|| Registry::new(config.take().unwrap_or_default()));
    if config.is_some() {
        error!("Global registry initialized twice");
        return Err(RegistryError::AlreadyInitialized);
    }
    Ok(registry)
}

pub fn global() -> &'static Registry {
    GLOBAL.get_or_init(Registry::default)
}

pub fn try_global() -> Option<&'static Registry> {
    GLOBAL.get()
}
