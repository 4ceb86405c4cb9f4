use std::collections::HashSet;

use proptest::prelude::*;
use rebind::{Ident, Registry, RegistryConfig};

fn ident_strategy() -> impl Strategy<Value = Ident> {
    "[A-Z][A-Za-z0-9_]{0,15}".prop_map(Ident::from)
}

proptest! {
    #[test]
    fn test_unbound_identifiers_resolve_to_self(
        ident in ident_strategy(),
        compile in any::<bool>(),
    ) {
        let config = RegistryConfig { compile, mappings: vec![] };
        let registry = Registry::new(config);
        prop_assert_eq!(registry.resolve(&ident), ident);
    }

    #[test]
    fn test_revert_restores_previous_resolution(
        logical in ident_strategy(),
        compiled in ident_strategy(),
        injected in ident_strategy(),
    ) {
        let config = RegistryConfig::runtime().with_mapping(logical.clone(), compiled);
        let registry = Registry::new(config);
        let before = registry.resolve(&logical);

        registry.inject(logical.clone(), injected.clone()).unwrap();
        prop_assert_eq!(registry.resolve(&logical), injected);

        registry.revert(&logical).unwrap();
        registry.revert(&logical).unwrap();
        prop_assert_eq!(registry.resolve(&logical), before);
    }

    #[test]
    fn test_synthesized_names_are_unique(
        logicals in prop::collection::vec(ident_strategy(), 1..50),
    ) {
        let registry = Registry::new(RegistryConfig::runtime());
        let mut seen = HashSet::new();
        for logical in logicals {
            let name = registry.inject_with(logical, ()).unwrap();
            prop_assert!(seen.insert(name));
        }
    }
}
