use ferrous_providers::{DiError, InjectionToken, Injector, ProviderDefinition, Resolver, Token};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct Mandrill {
    id: usize,
}

#[derive(Debug)]
struct SendGrid;

#[test]
fn test_value_provider_returns_registered_value() {
    let injector = Injector::create(vec![
        ProviderDefinition::provide("APIKey").use_value(String::from("XYZ1234ABC")),
    ])
    .unwrap();

    let first = injector.get_as::<String>("APIKey").unwrap();
    let second = injector.get_as::<String>("APIKey").unwrap();

    assert_eq!(first.as_str(), "XYZ1234ABC");
    assert!(Arc::ptr_eq(&first, &second)); // Same instance on every call
}

#[test]
fn test_shared_value_keeps_identity() {
    let config = Arc::new(vec![1u8, 2, 3]);
    let injector = Injector::create(vec![
        ProviderDefinition::provide("config").use_shared_value(config.clone()),
    ])
    .unwrap();

    let resolved = injector.get_as::<Vec<u8>>("config").unwrap();
    assert!(Arc::ptr_eq(&resolved, &config));
}

#[test]
fn test_email_service_factory_invoked_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = calls.clone();

    let injector = Injector::create(vec![ProviderDefinition::provide("EmailService").use_factory(move || {
        Mandrill {
            id: calls_clone.fetch_add(1, Ordering::SeqCst),
        }
    })])
    .unwrap();

    let first = injector.get_as::<Mandrill>("EmailService").unwrap();
    let second = injector.get_as::<Mandrill>("EmailService").unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.id, 0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_environment_dependent_factory_decides_once() {
    let production = Arc::new(std::sync::atomic::AtomicBool::new(true));
    let flag = production.clone();

    let injector = Injector::create(vec![ProviderDefinition::provide("EmailService").use_factory(move || {
        if flag.load(Ordering::SeqCst) {
            Box::new(Mandrill { id: 7 }) as Box<dyn std::any::Any + Send + Sync>
        } else {
            Box::new(SendGrid)
        }
    })])
    .unwrap();

    let first = injector.get_as::<Box<dyn std::any::Any + Send + Sync>>("EmailService").unwrap();
    production.store(false, Ordering::SeqCst);
    let second = injector.get_as::<Box<dyn std::any::Any + Send + Sync>>("EmailService").unwrap();

    assert!(first.downcast_ref::<Mandrill>().is_some());
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_class_provider_is_singleton() {
    #[derive(Default)]
    struct Logger;

    let injector = Injector::create(vec![ProviderDefinition::class::<Logger>()]).unwrap();

    let a = injector.get_type::<Logger>().unwrap();
    let b = injector.get_as::<Logger>(Token::of::<Logger>()).unwrap();

    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_class_registered_under_name() {
    let injector = Injector::create(vec![
        ProviderDefinition::provide("EmailService").use_class_with(|| Mandrill { id: 1 }),
    ])
    .unwrap();

    assert_eq!(injector.get_as::<Mandrill>("EmailService").unwrap().id, 1);
}

#[test]
fn test_factory_dependencies_in_order() {
    struct Mailer {
        key: Arc<String>,
        retries: Arc<u32>,
    }

    let injector = Injector::create(vec![
        ProviderDefinition::provide("APIKey").use_value(String::from("XYZ1234ABC")),
        ProviderDefinition::provide("Retries").use_value(3u32),
        ProviderDefinition::provide("Mailer").use_factory_with_deps(["APIKey", "Retries"], |deps| {
            assert_eq!(deps.len(), 2);
            Ok(Mailer {
                key: deps.get::<String>(0)?,
                retries: deps.get::<u32>(1)?,
            })
        }),
    ])
    .unwrap();

    let mailer = injector.get_as::<Mailer>("Mailer").unwrap();
    assert_eq!(mailer.key.as_str(), "XYZ1234ABC");
    assert_eq!(*mailer.retries, 3);

    // The dependency is the cached instance
    assert!(Arc::ptr_eq(&mailer.key, &injector.get_as::<String>("APIKey").unwrap()));
}

#[test]
fn test_factory_dependency_type_mismatch() {
    let injector = Injector::create(vec![
        ProviderDefinition::provide("Port").use_value("8080"),
        ProviderDefinition::provide("Server").use_factory_with_deps(["Port"], |deps| {
            let port = deps.get::<u16>(0)?;
            Ok(*port)
        }),
    ])
    .unwrap();

    match injector.get("Server") {
        Err(DiError::TypeMismatch { token, expected }) => {
            assert_eq!(token, Token::from("Port"));
            assert_eq!(expected, "u16");
        }
        other => panic!("Expected TypeMismatch, got {:?}", other),
    }
    assert!(!injector.is_cached("Server"));
}

#[test]
fn test_factory_reading_undeclared_dependency() {
    let injector = Injector::create(vec![
        ProviderDefinition::provide("Port").use_value(8080u16),
        ProviderDefinition::provide("Server").use_factory_with_deps(["Port"], |deps| {
            assert!(deps.instance(1).is_none());
            let host = deps.get::<String>(1)?;
            Ok(host.len())
        }),
    ])
    .unwrap();

    match injector.get("Server") {
        Err(DiError::Config(message)) => assert!(message.contains("index 1")),
        other => panic!("Expected Config error, got {:?}", other),
    }
    assert!(!injector.is_cached("Server"));
}

#[test]
fn test_unknown_token_creates_no_cache_entry() {
    let injector = Injector::create(vec![ProviderDefinition::provide("APIKey").use_value(1u8)]).unwrap();

    match injector.get("EmailService") {
        Err(DiError::UnknownToken(token)) => assert_eq!(token, Token::from("EmailService")),
        other => panic!("Expected UnknownToken, got {:?}", other),
    }
    assert!(!injector.is_cached("EmailService"));
    assert_eq!(injector.cached_count(), 0);
}

#[test]
fn test_typed_get_mismatch() {
    let injector = Injector::create(vec![ProviderDefinition::provide("APIKey").use_value(42u64)]).unwrap();

    assert!(matches!(
        injector.get_as::<String>("APIKey"),
        Err(DiError::TypeMismatch { .. })
    ));
    // The instance is still cached and usable with the right type
    assert_eq!(*injector.get_as::<u64>("APIKey").unwrap(), 42);
}

#[test]
fn test_get_optional() {
    let injector = Injector::create(vec![
        ProviderDefinition::provide("APIKey").use_value(1u8),
        ProviderDefinition::provide("Mailer").use_existing("EmailService"),
    ])
    .unwrap();

    assert!(injector.get_optional("APIKey").unwrap().is_some());
    assert!(injector.get_optional("Unregistered").unwrap().is_none());

    // A dangling alias below the requested token is still an error
    assert!(matches!(
        injector.get_optional("Mailer"),
        Err(DiError::UnknownToken(t)) if t == Token::from("EmailService")
    ));
}

#[test]
fn test_token_kinds_are_distinct() {
    struct Config;

    let handle = InjectionToken::new("Config");
    let injector = Injector::create(vec![
        ProviderDefinition::provide("Config").use_value("by name"),
        ProviderDefinition::provide(&handle).use_value("by handle"),
        ProviderDefinition::provide(Token::of::<Config>()).use_value("by type"),
    ])
    .unwrap();

    assert_eq!(*injector.get_as::<&str>("Config").unwrap(), "by name");
    assert_eq!(*injector.get_as::<&str>(&handle).unwrap(), "by handle");
    assert_eq!(*injector.get_as::<&str>(Token::of::<Config>()).unwrap(), "by type");

    // Same description, different handle
    assert!(matches!(
        injector.get(InjectionToken::new("Config")),
        Err(DiError::UnknownToken(_))
    ));
}

#[test]
fn test_injectors_do_not_share_instances() {
    let definitions = vec![ProviderDefinition::provide("EmailService").use_factory(|| Mandrill { id: 0 })];

    let first = Injector::create(definitions.clone()).unwrap();
    let second = Injector::create(definitions).unwrap();

    let a = first.get_as::<Mandrill>("EmailService").unwrap();
    let b = second.get_as::<Mandrill>("EmailService").unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
}

#[test]
fn test_clones_share_cache() {
    let injector = Injector::create(vec![ProviderDefinition::provide("EmailService").use_factory(|| SendGrid)]).unwrap();
    let clone = injector.clone();

    let a = injector.get_as::<SendGrid>("EmailService").unwrap();
    let b = clone.get_as::<SendGrid>("EmailService").unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(clone.cached_count(), 1);
}
