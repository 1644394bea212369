//! Builder for configured injectors.

use std::sync::Arc;

use crate::cache::InstanceCache;
use crate::config::InjectorOptions;
use crate::definition::ProviderDefinition;
use crate::error::{DiError, DiResult};
use crate::observer::{InjectorObserver, Observers};
use crate::registration::TokenRegistry;

use super::{Injector, InjectorInner};

/// Collects providers, options and observers, then builds an [`Injector`].
///
/// [`Injector::create`] is the short form for a builder with only providers.
///
/// # Examples
///
/// ```
/// use ferrous_providers::{
///     DiError, DuplicatePolicy, Injector, InjectorOptions, ProviderDefinition, TracingObserver,
/// };
/// use std::sync::Arc;
///
/// let result = Injector::builder()
///     .provide(ProviderDefinition::provide("APIKey").use_value("first"))
///     .provide(ProviderDefinition::provide("APIKey").use_value("second"))
///     .options(InjectorOptions::default().with_duplicate_policy(DuplicatePolicy::Reject))
///     .observer(Arc::new(TracingObserver::new()))
///     .build();
///
/// assert!(matches!(result, Err(DiError::DuplicateToken(_))));
/// ```
#[derive(Default)]
pub struct InjectorBuilder {
    definitions: Vec<ProviderDefinition>,
    options: InjectorOptions,
    observers: Observers,
    parent: Option<Injector>,
}

impl InjectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one provider definition.
    pub fn provide(mut self, definition: ProviderDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Adds provider definitions, keeping their order.
    pub fn provide_all<I>(mut self, definitions: I) -> Self
    where
        I: IntoIterator<Item = ProviderDefinition>,
    {
        self.definitions.extend(definitions);
        self
    }

    pub fn options(mut self, options: InjectorOptions) -> Self {
        self.options = options;
        self
    }

    /// Attaches an observer. Observers are called in the order they were added.
    pub fn observer(mut self, observer: Arc<dyn InjectorObserver>) -> Self {
        self.observers.add(observer);
        self
    }

    pub(crate) fn inherit_observers(mut self, observers: Observers) -> Self {
        self.observers = observers;
        self
    }

    /// Makes unknown tokens fall back to `parent`.
    pub fn parent(mut self, parent: Injector) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Registers every definition and returns a ready injector.
    ///
    /// Fails without producing an injector if a definition is malformed, a
    /// duplicate is rejected, or eager validation finds a problem.
    pub fn build(self) -> DiResult<Injector> {
        if self.options.max_depth == 0 {
            return Err(DiError::Config("max_depth must be at least 1".to_string()));
        }

        let registry = TokenRegistry::register(self.definitions, self.options.duplicate_policy)?;

        tracing::debug!(
            providers = registry.len(),
            observers = self.observers.len(),
            child = self.parent.is_some(),
            "injector created"
        );

        let injector = Injector {
            inner: Arc::new(InjectorInner {
                registry,
                cache: InstanceCache::new(),
                parent: self.parent,
                options: self.options,
                observers: self.observers,
            }),
        };

        if injector.inner.options.eager_validation {
            injector.validate().into_result()?;
        }

        Ok(injector)
    }
}
