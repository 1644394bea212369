/// Property-based tests for provider resolution
///
/// These tests verify that resolution behavior holds for arbitrary token
/// names, values and alias chain shapes.

use ferrous_providers::{DiError, Injector, ProviderDefinition, Resolver, Token};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct Mandrill;

// Property: a value provider returns an equal value, as the same instance, on every call
proptest! {
    #[test]
    fn value_resolution_consistency(token in "[A-Za-z][A-Za-z0-9_]{0,20}", value in "\\PC{0,50}") {
        let injector = Injector::create(vec![
            ProviderDefinition::provide(token.as_str()).use_value(value.clone()),
        ]).unwrap();

        let first = injector.get_as::<String>(token.as_str()).unwrap();
        let second = injector.get_as::<String>(token.as_str()).unwrap();

        prop_assert_eq!(first.as_str(), value.as_str());
        prop_assert!(Arc::ptr_eq(&first, &second));
    }
}

// Property: any alias chain ending at a factory resolves every link to the one instance
proptest! {
    #[test]
    fn alias_chain_identity(len in 1usize..12, order in proptest::collection::vec(any::<prop::sample::Index>(), 1..12)) {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();

        let mut definitions: Vec<_> = (0..len)
            .map(|i| ProviderDefinition::provide(format!("link{}", i)).use_existing(format!("link{}", i + 1)))
            .collect();
        definitions.push(ProviderDefinition::provide(format!("link{}", len)).use_factory(move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            Mandrill
        }));

        let injector = Injector::create(definitions).unwrap();
        let target = injector.get_as::<Mandrill>(format!("link{}", len)).unwrap();

        // Resolve links in an arbitrary order
        for index in order {
            let link = index.index(len + 1);
            let resolved = injector.get_as::<Mandrill>(format!("link{}", link)).unwrap();
            prop_assert!(Arc::ptr_eq(&resolved, &target));
        }
        prop_assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

// Property: a closed alias ring always fails with a cycle, from any entry point
proptest! {
    #[test]
    fn alias_ring_is_cyclic(len in 1usize..10, start in any::<prop::sample::Index>()) {
        let definitions: Vec<_> = (0..len)
            .map(|i| ProviderDefinition::provide(format!("ring{}", i)).use_existing(format!("ring{}", (i + 1) % len)))
            .collect();
        let injector = Injector::create(definitions).unwrap();

        let entry = start.index(len);
        match injector.get(format!("ring{}", entry)) {
            Err(DiError::CyclicAlias { path }) => {
                prop_assert_eq!(path.len(), len + 1);
                prop_assert_eq!(&path[0], &Token::from(format!("ring{}", entry)));
                prop_assert_eq!(path.first(), path.last());
            }
            other => prop_assert!(false, "Expected CyclicAlias, got {:?}", other),
        }
        prop_assert_eq!(injector.cached_count(), 0);
    }
}

// Property: unregistered tokens fail and never populate the cache
proptest! {
    #[test]
    fn unknown_tokens_leave_cache_empty(
        registered in proptest::collection::hash_set("[a-z]{1,8}", 0..8),
        requested in "[a-z]{1,8}",
    ) {
        let injector = Injector::create(
            registered.iter().map(|name| ProviderDefinition::provide(name.as_str()).use_value(name.len())),
        ).unwrap();

        let result = injector.get(requested.as_str());
        if registered.contains(&requested) {
            prop_assert!(result.is_ok());
            prop_assert_eq!(injector.cached_count(), 1);
        } else {
            let is_unknown = matches!(result, Err(DiError::UnknownToken(_)));
            prop_assert!(is_unknown);
            prop_assert_eq!(injector.cached_count(), 0);
        }
    }
}

// Property: with duplicates, the last definition for each token wins
proptest! {
    #[test]
    fn last_registration_wins(entries in proptest::collection::vec(("[a-d]", any::<u32>()), 1..20)) {
        let injector = Injector::create(
            entries.iter().map(|(name, value)| ProviderDefinition::provide(name.as_str()).use_value(*value)),
        ).unwrap();

        let distinct: HashSet<_> = entries.iter().map(|(name, _)| name.clone()).collect();
        prop_assert_eq!(injector.provider_count(), distinct.len());

        for name in &distinct {
            let expected = entries.iter().rev().find(|(n, _)| n == name).map(|(_, v)| *v).unwrap();
            prop_assert_eq!(*injector.get_as::<u32>(name.as_str()).unwrap(), expected);
        }
    }
}
