use crate::{global, Ident, Registry};

/// Implemented by components that are looked up through the registry under
/// their own identity.
///
/// ```
/// use rebind::{Ident, Registry, RegistryConfig, Resolvable};
///
/// struct Logger;
///
/// impl Resolvable for Logger {
///     const IDENT: &'static str = "Logger";
/// }
///
/// let registry = Registry::new(RegistryConfig::runtime());
/// assert_eq!(Logger::resolve_in(&registry), Ident::from("Logger"));
///
/// registry.inject(Logger::ident(), "FakeLogger".into()).unwrap();
/// assert_eq!(Logger::resolve_in(&registry), Ident::from("FakeLogger"));
/// ```
pub trait Resolvable {
    const IDENT: &'static str;

    fn ident() -> Ident {
        Ident::new(Self::IDENT)
    }

    fn resolve_in(registry: &Registry) -> Ident {
        registry.resolve(&Self::ident())
    }

    /// Resolve against the process-wide registry.
    fn resolve() -> Ident {
        Self::resolve_in(global::global())
    }
}
