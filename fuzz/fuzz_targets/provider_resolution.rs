#![no_main]

use ferrous_providers::{DiError, Injector, InjectorOptions, ProviderDefinition, Resolver};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

const MAX_TOKENS: usize = 16;

fn name(i: usize) -> String {
    format!("t{}", i)
}

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let count = (data.len()).min(MAX_TOKENS);
    let mut aliases = Vec::new();

    // Each byte picks a strategy and, for aliases and factories, a target
    let definitions: Vec<_> = data
        .iter()
        .take(count)
        .enumerate()
        .filter_map(|(i, byte)| {
            let target = name(usize::from(byte >> 3) % (count + 1));
            let definition = ProviderDefinition::provide(name(i));
            match byte % 5 {
                0 => Some(definition.use_value(i)),
                1 => Some(definition.use_class_with(move || i)),
                2 => {
                    aliases.push((name(i), target.clone()));
                    Some(definition.use_existing(target))
                }
                3 => Some(definition.use_factory_with_deps([target], move |deps| {
                    deps.get::<usize>(0).map(|dep| *dep + i)
                })),
                _ => None, // Left unregistered
            }
        })
        .collect();

    let injector = match Injector::builder()
        .options(InjectorOptions::default().with_max_depth(MAX_TOKENS + 1))
        .provide_all(definitions)
        .build()
    {
        Ok(injector) => injector,
        Err(_) => return,
    };

    for i in 0..=count {
        match injector.get(name(i)) {
            Ok(_)
            | Err(DiError::UnknownToken(_))
            | Err(DiError::CyclicAlias { .. })
            | Err(DiError::CyclicDependency { .. })
            | Err(DiError::TypeMismatch { .. }) => {}
            Err(other) => panic!("unexpected error for {}: {}", name(i), other),
        }
    }

    // Alias identity must hold wherever both sides resolve
    for (alias, target) in aliases {
        if let (Ok(a), Ok(b)) = (injector.get(alias.as_str()), injector.get(target.as_str())) {
            assert!(Arc::ptr_eq(&a, &b));
        }
    }
});
