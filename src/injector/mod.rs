//! The injector: registry, instance cache and resolution entry point.

use std::fmt;
use std::sync::Arc;

use crate::cache::InstanceCache;
use crate::config::InjectorOptions;
use crate::definition::{Instance, ProviderDefinition};
use crate::descriptors::ProviderDescriptor;
use crate::error::DiResult;
use crate::internal::{Edge, ResolutionPath};
use crate::observer::Observers;
use crate::registration::TokenRegistry;
use crate::token::Token;
use crate::traits::ResolverCore;
use crate::validation::{self, ValidationReport};

mod builder;
mod resolver;

pub use builder::InjectorBuilder;
use resolver::ProviderResolver;

/// Resolves tokens to shared instances, constructing each at most once.
///
/// An `Injector` owns an immutable set of providers and a cache that holds
/// one instance per token for as long as the injector lives. Cloning is
/// cheap and every clone shares the same providers and cache, so an
/// injector can be handed to as many threads as needed.
///
/// # Examples
///
/// ```
/// use ferrous_providers::{Injector, ProviderDefinition, Resolver};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// struct Mandrill;
///
/// static CALLS: AtomicUsize = AtomicUsize::new(0);
///
/// let injector = Injector::create(vec![
///     ProviderDefinition::provide("EmailService").use_factory(|| {
///         CALLS.fetch_add(1, Ordering::SeqCst);
///         Mandrill
///     }),
/// ]).unwrap();
///
/// let first = injector.get_as::<Mandrill>("EmailService").unwrap();
/// let second = injector.get_as::<Mandrill>("EmailService").unwrap();
///
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(CALLS.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone)]
pub struct Injector {
    inner: Arc<InjectorInner>,
}

pub(crate) struct InjectorInner {
    pub(crate) registry: TokenRegistry,
    pub(crate) cache: InstanceCache,
    pub(crate) parent: Option<Injector>,
    pub(crate) options: InjectorOptions,
    pub(crate) observers: Observers,
}

impl Injector {
    /// Creates an injector from an ordered list of provider definitions.
    ///
    /// Every definition must carry exactly one strategy; otherwise this fails
    /// with [`DiError::MalformedProvider`](crate::DiError::MalformedProvider)
    /// and no injector is produced. Nothing is constructed until the first
    /// `get`.
    pub fn create<I>(definitions: I) -> DiResult<Self>
    where
        I: IntoIterator<Item = ProviderDefinition>,
    {
        Self::builder().provide_all(definitions).build()
    }

    pub fn builder() -> InjectorBuilder {
        InjectorBuilder::new()
    }

    /// Creates a child injector that falls back to `self` for unknown tokens.
    ///
    /// The child inherits options and observers. A token provided by both
    /// shadows the parent's provider in the child. Instances that come from
    /// the parent are cached in the parent only, so parent and child share
    /// them.
    ///
    /// ```
    /// use ferrous_providers::{Injector, ProviderDefinition, Resolver};
    /// use std::sync::Arc;
    ///
    /// let parent = Injector::create(vec![
    ///     ProviderDefinition::provide("APIKey").use_value(String::from("XYZ1234ABC")),
    /// ]).unwrap();
    /// let child = parent.create_child(vec![
    ///     ProviderDefinition::provide("Region").use_value("eu-west-1"),
    /// ]).unwrap();
    ///
    /// let from_child = child.get_as::<String>("APIKey").unwrap();
    /// let from_parent = parent.get_as::<String>("APIKey").unwrap();
    /// assert!(Arc::ptr_eq(&from_child, &from_parent));
    /// assert!(!parent.contains("Region"));
    /// ```
    pub fn create_child<I>(&self, definitions: I) -> DiResult<Self>
    where
        I: IntoIterator<Item = ProviderDefinition>,
    {
        Self::builder()
            .options(self.inner.options.clone())
            .inherit_observers(self.inner.observers.clone())
            .parent(self.clone())
            .provide_all(definitions)
            .build()
    }

    /// Whether `token` has a provider here or in an ancestor.
    pub fn contains(&self, token: impl Into<Token>) -> bool {
        let token = token.into();
        self.contains_token(&token)
    }

    pub(crate) fn contains_token(&self, token: &Token) -> bool {
        self.inner.registry.contains(token)
            || self.inner.parent.as_ref().is_some_and(|parent| parent.contains_token(token))
    }

    /// Whether this injector already holds an instance for `token`.
    ///
    /// Instances cached by a parent are not counted.
    pub fn is_cached(&self, token: impl Into<Token>) -> bool {
        self.inner.cache.contains(&token.into())
    }

    /// Number of instances cached by this injector.
    pub fn cached_count(&self) -> usize {
        self.inner.cache.len()
    }

    /// Number of providers registered directly on this injector.
    pub fn provider_count(&self) -> usize {
        self.inner.registry.len()
    }

    /// Describes this injector's own providers, in registration order.
    pub fn descriptors(&self) -> Vec<ProviderDescriptor> {
        self.inner.registry.iter().map(ProviderDescriptor::from_provider).collect()
    }

    pub fn parent(&self) -> Option<&Injector> {
        self.inner.parent.as_ref()
    }

    pub fn options(&self) -> &InjectorOptions {
        &self.inner.options
    }

    /// Checks aliases and factory dependencies without constructing anything.
    ///
    /// ```
    /// use ferrous_providers::{Injector, ProviderDefinition, ValidationIssue};
    ///
    /// let injector = Injector::create(vec![
    ///     ProviderDefinition::provide("Mailer").use_existing("EmailService"),
    /// ]).unwrap();
    ///
    /// let report = injector.validate();
    /// assert!(!report.is_ok());
    /// assert!(matches!(report.issues[0], ValidationIssue::DanglingAlias { .. }));
    /// ```
    pub fn validate(&self) -> ValidationReport {
        validation::validate(self)
    }

    pub(crate) fn inner(&self) -> &InjectorInner {
        &self.inner
    }
}

impl ResolverCore for Injector {
    fn resolve_token(&self, token: &Token) -> DiResult<Instance> {
        let mut path = ResolutionPath::new(self.inner.options.max_depth);
        ProviderResolver::new(&self.inner, &mut path).resolve(token, Edge::Root)
    }
}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("providers", &self.inner.registry.len())
            .field("cached", &self.inner.cache.len())
            .field("options", &self.inner.options)
            .field("observers", &self.inner.observers)
            .field("has_parent", &self.inner.parent.is_some())
            .finish()
    }
}
