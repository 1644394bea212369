//! Token types used to look up providers.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque, uniquely identified token.
///
/// Two handles are equal only if one is a clone of the other. The description
/// is for diagnostics and never takes part in equality, so
/// `InjectionToken::new("config")` can't collide with the string token
/// `"config"` or with another handle that has the same description.
///
/// # Examples
///
/// ```rust
/// use ferrous_providers::{InjectionToken, Token};
///
/// let a = InjectionToken::new("app.config");
/// let b = InjectionToken::new("app.config");
///
/// assert_ne!(a, b);
/// assert_eq!(a, a.clone());
/// assert_ne!(Token::from(a), Token::from("app.config"));
/// ```
#[derive(Clone)]
pub struct InjectionToken {
    id: u64,
    description: Arc<str>,
}

impl InjectionToken {
    /// Creates a new handle with a process-unique id.
    pub fn new(description: impl Into<Arc<str>>) -> Self {
        Self {
            id: NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed),
            description: description.into(),
        }
    }

    /// Process-unique id of this handle.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Human readable description given at creation.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PartialEq for InjectionToken {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for InjectionToken {}

impl Hash for InjectionToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for InjectionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InjectionToken(#{} {})", self.id, self.description)
    }
}

impl fmt::Display for InjectionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InjectionToken({})", self.description)
    }
}

/// Key for provider registration and lookup.
///
/// A token identifies a requested dependency. It is one of three variants,
/// and tokens of different variants are never equal.
///
/// - **Type**: a type identity, compared by `TypeId` only
/// - **Name**: a string literal, compared by value
/// - **Handle**: an [`InjectionToken`], compared by its unique id
///
/// # Examples
///
/// ```rust
/// use ferrous_providers::Token;
///
/// struct Mandrill;
///
/// let by_type = Token::of::<Mandrill>();
/// let by_name = Token::from("EmailService");
///
/// assert_eq!(by_type, Token::of::<Mandrill>());
/// assert_eq!(by_name, Token::name("EmailService"));
/// assert_ne!(by_type, by_name);
/// assert!(by_type.display_name().ends_with("Mandrill"));
/// ```
#[derive(Debug, Clone)]
pub enum Token {
    /// Type identity with the type name kept for diagnostics
    Type(TypeId, &'static str),
    /// String literal
    Name(Arc<str>),
    /// Opaque injection-token handle
    Handle(InjectionToken),
}

impl Token {
    /// Type-identity token for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Token::Type(TypeId::of::<T>(), std::any::type_name::<T>())
    }

    /// String token.
    pub fn name(name: impl Into<Arc<str>>) -> Self {
        Token::Name(name.into())
    }

    /// Name used in diagnostics and error messages.
    pub fn display_name(&self) -> &str {
        match self {
            Token::Type(_, name) => name,
            Token::Name(name) => name,
            Token::Handle(handle) => handle.description(),
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(self, Token::Type(..))
    }
}

impl PartialEq for Token {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            // Type names are not guaranteed unique, the TypeId is
            (Token::Type(a, _), Token::Type(b, _)) => a == b,
            (Token::Name(a), Token::Name(b)) => a == b,
            (Token::Handle(a), Token::Handle(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Token::Type(id, _) => id.hash(state),
            Token::Name(name) => name.hash(state),
            Token::Handle(handle) => handle.hash(state),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Type(_, name) => f.write_str(name),
            Token::Name(name) => f.write_str(name),
            Token::Handle(handle) => fmt::Display::fmt(handle, f),
        }
    }
}

impl From<&str> for Token {
    fn from(name: &str) -> Self {
        Token::Name(name.into())
    }
}

impl From<String> for Token {
    fn from(name: String) -> Self {
        Token::Name(name.into())
    }
}

impl From<Arc<str>> for Token {
    fn from(name: Arc<str>) -> Self {
        Token::Name(name)
    }
}

impl From<InjectionToken> for Token {
    fn from(handle: InjectionToken) -> Self {
        Token::Handle(handle)
    }
}

impl From<&InjectionToken> for Token {
    fn from(handle: &InjectionToken) -> Self {
        Token::Handle(handle.clone())
    }
}

impl From<&Token> for Token {
    fn from(token: &Token) -> Self {
        token.clone()
    }
}

#[cfg(feature = "config")]
impl serde::Serialize for Token {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
