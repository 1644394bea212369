//! Resolver traits for token resolution.

use std::any::{type_name, Any};
use std::sync::Arc;

use crate::definition::Instance;
use crate::error::{DiError, DiResult};
use crate::token::Token;

/// Core resolver trait for object-safe token resolution.
///
/// Implementors run the full resolution algorithm: cache check, provider
/// lookup, strategy dispatch and cycle detection. Most callers use the
/// generic methods of [`Resolver`] instead.
pub trait ResolverCore: Send + Sync {
    /// Resolves `token` to its type-erased instance.
    ///
    /// # Returns
    ///
    /// * `Ok(Instance)` - The cached or newly created instance
    /// * `Err(DiError)` - Unknown token, cyclic alias or dependency, depth exceeded
    fn resolve_token(&self, token: &Token) -> DiResult<Instance>;
}

/// High-level resolver interface with typed helpers.
///
/// Implemented for every [`ResolverCore`], including [`Injector`](crate::Injector).
///
/// # Examples
///
/// ```
/// use ferrous_providers::{Injector, ProviderDefinition, Resolver, Token};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Mandrill;
///
/// let injector = Injector::create(vec![
///     ProviderDefinition::class::<Mandrill>(),
///     ProviderDefinition::provide("APIKey").use_value(String::from("XYZ1234ABC")),
/// ]).unwrap();
///
/// // Untyped
/// let any = injector.get("APIKey").unwrap();
/// assert!(any.downcast_ref::<String>().is_some());
///
/// // Typed
/// let key = injector.get_as::<String>("APIKey").unwrap();
/// assert_eq!(&*key, "XYZ1234ABC");
///
/// // Type tokens
/// let a = injector.get_type::<Mandrill>().unwrap();
/// let b = injector.get_as::<Mandrill>(Token::of::<Mandrill>()).unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
///
/// // Optional
/// assert!(injector.get_optional("missing").unwrap().is_none());
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves `token` to its type-erased instance.
    fn get(&self, token: impl Into<Token>) -> DiResult<Instance> {
        self.resolve_token(&token.into())
    }

    /// Resolves `token` and downcasts the instance to `T`.
    ///
    /// Fails with [`DiError::TypeMismatch`] if the instance is not a `T`.
    fn get_as<T: Any + Send + Sync>(&self, token: impl Into<Token>) -> DiResult<Arc<T>> {
        let token = token.into();
        self.resolve_token(&token)?
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch {
                token,
                expected: type_name::<T>(),
            })
    }

    /// Resolves the type token of `T`.
    fn get_type<T: Any + Send + Sync>(&self) -> DiResult<Arc<T>> {
        self.get_as::<T>(Token::of::<T>())
    }

    /// Resolves a trait object registered as an `Arc<dyn Trait>` value.
    ///
    /// ```
    /// use ferrous_providers::{Injector, ProviderDefinition, Resolver, Token};
    /// use std::sync::Arc;
    ///
    /// trait EmailService: Send + Sync {
    ///     fn vendor(&self) -> &'static str;
    /// }
    ///
    /// struct SendGrid;
    /// impl EmailService for SendGrid {
    ///     fn vendor(&self) -> &'static str { "sendgrid" }
    /// }
    ///
    /// let injector = Injector::create(vec![
    ///     ProviderDefinition::provide(Token::of::<dyn EmailService>())
    ///         .use_class_with(|| Arc::new(SendGrid) as Arc<dyn EmailService>),
    /// ]).unwrap();
    ///
    /// let email = injector.get_trait::<dyn EmailService>(Token::of::<dyn EmailService>()).unwrap();
    /// assert_eq!(email.vendor(), "sendgrid");
    /// ```
    fn get_trait<T: ?Sized + Send + Sync + 'static>(&self, token: impl Into<Token>) -> DiResult<Arc<T>> {
        let token = token.into();
        self.resolve_token(&token)?
            .downcast::<Arc<T>>()
            .map(|outer| (*outer).clone())
            .map_err(|_| DiError::TypeMismatch {
                token,
                expected: type_name::<Arc<T>>(),
            })
    }

    /// Like [`get`](Self::get), but an unregistered `token` yields `Ok(None)`.
    ///
    /// Only a miss on `token` itself is absorbed. A dangling alias or factory
    /// dependency further down is still an error.
    fn get_optional(&self, token: impl Into<Token>) -> DiResult<Option<Instance>> {
        let token = token.into();
        match self.resolve_token(&token) {
            Ok(instance) => Ok(Some(instance)),
            Err(DiError::UnknownToken(missing)) if missing == token => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
