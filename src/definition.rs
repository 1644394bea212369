//! Provider definitions: the user-facing `provide` / `use_*` records.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

use crate::descriptors::ProviderKind;
use crate::error::{DiError, DiResult};
use crate::token::Token;

/// Type-erased shared instance, as stored in the instance cache.
pub type Instance = Arc<dyn Any + Send + Sync>;

pub(crate) type Constructor = Arc<dyn Fn() -> Instance + Send + Sync>;
pub(crate) type FactoryFn = Arc<dyn Fn(&Dependencies<'_>) -> DiResult<Instance> + Send + Sync>;

/// Binds one token to one construction strategy.
///
/// A definition starts empty with [`provide`](Self::provide) and receives its
/// strategy through one of the `use_*` methods. Exactly one strategy must be
/// set; anything else is rejected with [`DiError::MalformedProvider`] when the
/// injector is created.
///
/// | method | strategy |
/// |---|---|
/// | [`use_class`](Self::use_class) | construct `T` with no arguments |
/// | [`use_existing`](Self::use_existing) | alias of another token |
/// | [`use_value`](Self::use_value) | fixed value, returned as is |
/// | [`use_factory`](Self::use_factory) | call a factory once |
///
/// # Examples
///
/// ```rust
/// use ferrous_providers::{Injector, ProviderDefinition, Resolver};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Mandrill;
///
/// let injector = Injector::create(vec![
///     ProviderDefinition::provide("APIKey").use_value("XYZ1234ABC"),
///     ProviderDefinition::provide("EmailService").use_factory(|| Mandrill),
///     ProviderDefinition::provide("Mailer").use_existing("EmailService"),
/// ]).unwrap();
///
/// let key = injector.get_as::<&str>("APIKey").unwrap();
/// assert_eq!(*key, "XYZ1234ABC");
///
/// let email = injector.get_as::<Mandrill>("EmailService").unwrap();
/// let mailer = injector.get_as::<Mandrill>("Mailer").unwrap();
/// assert!(Arc::ptr_eq(&email, &mailer));
/// ```
#[derive(Clone)]
pub struct ProviderDefinition {
    token: Token,
    use_class: Option<Constructor>,
    use_existing: Option<Token>,
    use_value: Option<Instance>,
    use_factory: Option<(FactoryFn, Vec<Token>)>,
}

impl ProviderDefinition {
    /// Starts a definition for `token` with no strategy yet.
    pub fn provide(token: impl Into<Token>) -> Self {
        Self {
            token: token.into(),
            use_class: None,
            use_existing: None,
            use_value: None,
            use_factory: None,
        }
    }

    /// Shorthand for a type token that provides itself: `provide(Token::of::<T>()).use_class::<T>()`.
    pub fn class<T>() -> Self
    where
        T: Default + Send + Sync + 'static,
    {
        Self::provide(Token::of::<T>()).use_class::<T>()
    }

    /// Constructs `T::default()` on first request.
    pub fn use_class<T>(self) -> Self
    where
        T: Default + Send + Sync + 'static,
    {
        self.use_class_with(T::default)
    }

    /// Constructs the instance with a zero-argument constructor on first request.
    pub fn use_class_with<T, F>(mut self, constructor: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.use_class = Some(Arc::new(move || Arc::new(constructor()) as Instance));
        self
    }

    /// Resolves to whatever `target` resolves to, sharing the same instance.
    pub fn use_existing(mut self, target: impl Into<Token>) -> Self {
        self.use_existing = Some(target.into());
        self
    }

    /// Resolves to `value` verbatim.
    pub fn use_value<T>(self, value: T) -> Self
    where
        T: Send + Sync + 'static,
    {
        self.use_shared_value(Arc::new(value))
    }

    /// Resolves to the given `Arc`, so callers keep identity with what they registered.
    pub fn use_shared_value<T>(mut self, value: Arc<T>) -> Self
    where
        T: Send + Sync + 'static,
    {
        self.use_value = Some(value as Instance);
        self
    }

    /// Calls `factory` once, on first request.
    pub fn use_factory<T, F>(self, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.use_factory_with_deps(Vec::<Token>::new(), move |_| Ok(factory()))
    }

    /// Resolves `deps` in order, then calls `factory` with them once.
    ///
    /// ```rust
    /// use ferrous_providers::{Injector, ProviderDefinition, Resolver};
    ///
    /// struct Greeter(String);
    ///
    /// let injector = Injector::create(vec![
    ///     ProviderDefinition::provide("name").use_value(String::from("world")),
    ///     ProviderDefinition::provide("greeter").use_factory_with_deps(["name"], |deps| {
    ///         let name = deps.get::<String>(0)?;
    ///         Ok(Greeter(format!("hello {}", name)))
    ///     }),
    /// ]).unwrap();
    ///
    /// assert_eq!(injector.get_as::<Greeter>("greeter").unwrap().0, "hello world");
    /// ```
    pub fn use_factory_with_deps<T, F, D>(mut self, deps: D, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Dependencies<'_>) -> DiResult<T> + Send + Sync + 'static,
        D: IntoIterator,
        D::Item: Into<Token>,
    {
        let deps = deps.into_iter().map(Into::into).collect();
        let factory = erase_factory(move |resolved| Ok(Arc::new(factory(resolved)?) as Instance));
        self.use_factory = Some((factory, deps));
        self
    }

    /// Token this definition provides.
    pub fn token(&self) -> &Token {
        &self.token
    }

    fn strategy_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.use_class.is_some() {
            names.push(ProviderKind::Class.field_name());
        }
        if self.use_existing.is_some() {
            names.push(ProviderKind::Existing.field_name());
        }
        if self.use_value.is_some() {
            names.push(ProviderKind::Value.field_name());
        }
        if self.use_factory.is_some() {
            names.push(ProviderKind::Factory.field_name());
        }
        names
    }

    /// Checks that exactly one strategy is set and converts into a provider.
    pub(crate) fn into_provider(self) -> DiResult<Provider> {
        let strategies = self.strategy_names();

        let strategy = match (self.use_class, self.use_existing, self.use_value, self.use_factory) {
            (Some(constructor), None, None, None) => Strategy::Class(constructor),
            (None, Some(target), None, None) => Strategy::Existing(target),
            (None, None, Some(value), None) => Strategy::Value(value),
            (None, None, None, Some((factory, deps))) => Strategy::Factory { factory, deps },
            _ => {
                return Err(DiError::MalformedProvider {
                    token: self.token,
                    strategies,
                })
            }
        };

        Ok(Provider {
            token: self.token,
            strategy,
        })
    }
}

impl fmt::Debug for ProviderDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderDefinition")
            .field("token", &self.token)
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

fn erase_factory<F>(factory: F) -> FactoryFn
where
    F: Fn(&Dependencies<'_>) -> DiResult<Instance> + Send + Sync + 'static,
{
    Arc::new(factory)
}

/// Validated construction strategy.
#[derive(Clone)]
pub(crate) enum Strategy {
    Class(Constructor),
    Existing(Token),
    Value(Instance),
    Factory { factory: FactoryFn, deps: Vec<Token> },
}

impl Strategy {
    pub(crate) fn kind(&self) -> ProviderKind {
        match self {
            Strategy::Class(_) => ProviderKind::Class,
            Strategy::Existing(_) => ProviderKind::Existing,
            Strategy::Value(_) => ProviderKind::Value,
            Strategy::Factory { .. } => ProviderKind::Factory,
        }
    }
}

/// A definition that passed validation.
#[derive(Clone)]
pub(crate) struct Provider {
    pub(crate) token: Token,
    pub(crate) strategy: Strategy,
}

/// Resolved factory dependencies, in the order they were declared.
pub struct Dependencies<'a> {
    tokens: &'a [Token],
    instances: &'a [Instance],
}

impl<'a> Dependencies<'a> {
    pub(crate) fn new(tokens: &'a [Token], instances: &'a [Instance]) -> Self {
        Self { tokens, instances }
    }

    /// Number of declared dependencies.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Untyped dependency at `index`, or `None` past the declared dependencies.
    pub fn instance(&self, index: usize) -> Option<&Instance> {
        self.instances.get(index)
    }

    /// Dependency at `index`, downcast to `T`.
    ///
    /// Asking for an index that was never declared is a [`DiError::Config`].
    pub fn get<T: Any + Send + Sync>(&self, index: usize) -> DiResult<Arc<T>> {
        let (token, instance) = self
            .tokens
            .get(index)
            .zip(self.instances.get(index))
            .ok_or_else(|| {
                DiError::Config(format!(
                    "dependency index {} out of range, factory declares {}",
                    index,
                    self.instances.len()
                ))
            })?;

        instance.clone().downcast::<T>().map_err(|_| DiError::TypeMismatch {
            token: token.clone(),
            expected: type_name::<T>(),
        })
    }
}
