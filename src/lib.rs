//! Runtime indirection registry.
//!
//! Code refers to a stable logical [`Ident`] and asks a [`Registry`] which
//! implementation is currently bound to it. In compiled mode the bindings are
//! fixed at construction; in runtime mode they can be swapped with
//! [`Registry::inject`] and restored with [`Registry::revert`] /
//! [`Registry::revert_all`], typically from tests.

pub mod catalog;
pub mod config;
pub mod error;
pub mod global;
pub mod ident;
pub mod registry;
pub mod resolvable;
pub mod table;

// Re-exports
pub use config::{Mode, RegistryConfig};
pub use error::*;
pub use global::global;
pub use ident::Ident;
pub use registry::{InjectionGuard, Registry};
pub use resolvable::Resolvable;
