//! # ferrous-providers
//!
//! Token-based provider injection for Rust: register how each token is
//! produced, then ask the injector for instances.
//!
//! ## Features
//!
//! - **Four provider strategies**: class constructor, alias of another token, fixed value, factory
//! - **Singleton per injector**: every token is constructed at most once, even under concurrency
//! - **Alias identity**: an alias and its target resolve to the same `Arc`
//! - **Cycle detection**: alias and dependency cycles fail with the full path
//! - **Child injectors**: hierarchical lookup with shadowing
//! - **Observability**: pluggable observers, with `tracing` and counter implementations
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_providers::{Injector, ProviderDefinition, Resolver};
//! use std::sync::Arc;
//!
//! struct Mandrill {
//!     api_key: Arc<String>,
//! }
//!
//! let injector = Injector::create(vec![
//!     ProviderDefinition::provide("APIKey").use_value(String::from("XYZ1234ABC")),
//!     ProviderDefinition::provide("EmailService").use_factory_with_deps(["APIKey"], |deps| {
//!         Ok(Mandrill { api_key: deps.get::<String>(0)? })
//!     }),
//!     ProviderDefinition::provide("Mailer").use_existing("EmailService"),
//! ]).unwrap();
//!
//! let email = injector.get_as::<Mandrill>("EmailService").unwrap();
//! let mailer = injector.get_as::<Mandrill>("Mailer").unwrap();
//!
//! assert_eq!(email.api_key.as_str(), "XYZ1234ABC");
//! assert!(Arc::ptr_eq(&email, &mailer));
//! ```
//!
//! ## Tokens
//!
//! A [`Token`] is a Rust type, a string name or a unique [`InjectionToken`]
//! handle. A handle never equals a string token, even with the same
//! description.
//!
//! ```rust
//! use ferrous_providers::{InjectionToken, Injector, ProviderDefinition, Resolver, Token};
//!
//! #[derive(Default)]
//! struct Clock;
//!
//! let region = InjectionToken::new("Region");
//!
//! let injector = Injector::create(vec![
//!     ProviderDefinition::class::<Clock>(),
//!     ProviderDefinition::provide(&region).use_value("eu-west-1"),
//!     ProviderDefinition::provide("Region").use_value("us-east-1"),
//! ]).unwrap();
//!
//! injector.get_type::<Clock>().unwrap();
//! assert_eq!(*injector.get_as::<&str>(&region).unwrap(), "eu-west-1");
//! assert_eq!(*injector.get_as::<&str>("Region").unwrap(), "us-east-1");
//! assert_ne!(Token::from(&region), Token::from("Region"));
//! ```
//!
//! ## Errors
//!
//! Every failure is a [`DiError`]. Nothing is retried and no fallback token
//! is ever substituted.
//!
//! ```rust
//! use ferrous_providers::{DiError, Injector, ProviderDefinition, Resolver};
//!
//! let injector = Injector::create(vec![
//!     ProviderDefinition::provide("A").use_existing("B"),
//!     ProviderDefinition::provide("B").use_existing("A"),
//! ]).unwrap();
//!
//! match injector.get("A") {
//!     Err(DiError::CyclicAlias { path }) => assert_eq!(path.len(), 3),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

// Module declarations
pub mod config;
pub mod definition;
pub mod descriptors;
pub mod error;
pub mod injector;
pub mod observer;
pub mod token;
pub mod traits;
pub mod validation;

#[cfg(feature = "config")]
pub mod manifest;

// Internal modules
mod cache;
mod internal;
mod registration;

// Re-exports
pub use config::{
    ConfigSource, DuplicatePolicy, EnvironmentConfigSource, InjectorOptions, MapConfigSource, DEFAULT_MAX_DEPTH,
};
pub use definition::{Dependencies, Instance, ProviderDefinition};
pub use descriptors::{ProviderDescriptor, ProviderKind};
pub use error::{DiError, DiResult};
pub use injector::{Injector, InjectorBuilder};
pub use observer::{InjectorObserver, MetricsObserver, ResolutionStats, TracingObserver};
pub use token::{InjectionToken, Token};
pub use traits::{Resolver, ResolverCore};
pub use validation::{ValidationIssue, ValidationReport};

#[cfg(feature = "config")]
pub use manifest::definitions_from_json;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_value_resolution() {
        let injector = Injector::create(vec![ProviderDefinition::provide("answer").use_value(42usize)]).unwrap();

        let a = injector.get_as::<usize>("answer").unwrap();
        let b = injector.get_as::<usize>("answer").unwrap();

        assert_eq!(*a, 42);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_class_constructed_once() {
        static BUILT: AtomicUsize = AtomicUsize::new(0);

        struct Counter;
        impl Default for Counter {
            fn default() -> Self {
                BUILT.fetch_add(1, Ordering::SeqCst);
                Counter
            }
        }

        let injector = Injector::create(vec![ProviderDefinition::class::<Counter>()]).unwrap();
        injector.get_type::<Counter>().unwrap();
        injector.get_type::<Counter>().unwrap();

        assert_eq!(BUILT.load(Ordering::SeqCst), 1);
        assert_eq!(injector.cached_count(), 1);
    }

    #[test]
    fn test_trait_object_value() {
        trait Greeter: Send + Sync {
            fn greet(&self) -> String;
        }

        struct English;
        impl Greeter for English {
            fn greet(&self) -> String {
                "hello".to_string()
            }
        }

        let injector = Injector::create(vec![ProviderDefinition::provide(Token::of::<dyn Greeter>())
            .use_value(Arc::new(English) as Arc<dyn Greeter>)])
        .unwrap();

        let greeter = injector.get_trait::<dyn Greeter>(Token::of::<dyn Greeter>()).unwrap();
        assert_eq!(greeter.greet(), "hello");
    }

    #[test]
    fn test_failed_resolution_caches_nothing() {
        let injector = Injector::create(vec![ProviderDefinition::provide("Mailer").use_existing("missing")]).unwrap();

        assert!(matches!(injector.get("Mailer"), Err(DiError::UnknownToken(t)) if t == Token::from("missing")));
        assert_eq!(injector.cached_count(), 0);
    }
}
