//! Error types for the provider injector.

use thiserror::Error;

use crate::token::Token;

/// Provider injector errors
///
/// Every error is local to one `get` call or to injector construction. The
/// injector never retries and never substitutes a fallback token.
///
/// # Examples
///
/// ```rust
/// use ferrous_providers::{DiError, Injector, Resolver};
///
/// let injector = Injector::create(Vec::new()).unwrap();
/// match injector.get("APIKey") {
///     Err(DiError::UnknownToken(token)) => assert_eq!(token.display_name(), "APIKey"),
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use ferrous_providers::{DiError, Token};
///
/// let cyclic = DiError::CyclicAlias {
///     path: vec![Token::from("A"), Token::from("B"), Token::from("A")],
/// };
/// assert_eq!(cyclic.to_string(), "Cyclic alias: A -> B -> A");
/// ```
#[derive(Debug, Clone, Error)]
pub enum DiError {
    /// No provider registered for the token
    #[error("No provider for token: {0}")]
    UnknownToken(Token),
    /// Alias chain revisits a token (includes path)
    #[error("Cyclic alias: {}", format_path(.path))]
    CyclicAlias { path: Vec<Token> },
    /// Factory dependencies revisit a token (includes path)
    #[error("Cyclic dependency: {}", format_path(.path))]
    CyclicDependency { path: Vec<Token> },
    /// Definition names zero or several construction strategies
    #[error("Malformed provider for {token}: expected exactly one strategy, found {}", describe_strategies(.strategies))]
    MalformedProvider {
        token: Token,
        strategies: Vec<&'static str>,
    },
    /// Token registered twice under the reject policy
    #[error("Duplicate provider for token: {0}")]
    DuplicateToken(Token),
    /// Resolved instance is not of the requested type
    #[error("Type mismatch for {token}: expected {expected}")]
    TypeMismatch { token: Token, expected: &'static str },
    /// Maximum resolution depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
    /// Invalid options or provider manifest
    #[error("Configuration error: {0}")]
    Config(String),
}

fn format_path(path: &[Token]) -> String {
    path.iter()
        .map(Token::display_name)
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn describe_strategies(strategies: &[&'static str]) -> String {
    if strategies.is_empty() {
        "none".to_string()
    } else {
        strategies.join(", ")
    }
}

/// Result type for injector operations
pub type DiResult<T> = Result<T, DiError>;
