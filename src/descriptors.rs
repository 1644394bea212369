//! Provider descriptors for introspection and diagnostics.

use std::fmt;

use crate::definition::{Provider, Strategy};
use crate::token::Token;

/// Construction strategy of a registered provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(serde::Serialize))]
pub enum ProviderKind {
    /// Zero-argument construction of a type
    Class,
    /// Alias of another token
    Existing,
    /// Fixed value
    Value,
    /// Factory function, optionally with dependencies
    Factory,
}

impl ProviderKind {
    /// Field name of the strategy in provider records (`useClass`, ...).
    pub fn field_name(&self) -> &'static str {
        match self {
            ProviderKind::Class => "useClass",
            ProviderKind::Existing => "useExisting",
            ProviderKind::Value => "useValue",
            ProviderKind::Factory => "useFactory",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Provider descriptor for introspection and diagnostics
///
/// Describes one registered provider without exposing its constructor,
/// factory or value. Descriptors are listed in registration order.
///
/// # Examples
///
/// ```rust
/// use ferrous_providers::{Injector, ProviderDefinition, ProviderKind, Token};
///
/// let injector = Injector::create(vec![
///     ProviderDefinition::provide("APIKey").use_value("XYZ1234ABC"),
///     ProviderDefinition::provide("Key").use_existing("APIKey"),
/// ]).unwrap();
///
/// let descriptors = injector.descriptors();
/// assert_eq!(descriptors.len(), 2);
/// assert_eq!(descriptors[0].kind, ProviderKind::Value);
/// assert_eq!(descriptors[1].target, Some(Token::from("APIKey")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Serialize))]
pub struct ProviderDescriptor {
    /// Token the provider is registered under
    pub token: Token,
    /// Construction strategy
    pub kind: ProviderKind,
    /// Alias target, for `useExisting` providers
    pub target: Option<Token>,
    /// Declared factory dependencies, in order
    pub dependencies: Vec<Token>,
}

impl ProviderDescriptor {
    pub(crate) fn from_provider(provider: &Provider) -> Self {
        let (target, dependencies) = match &provider.strategy {
            Strategy::Existing(target) => (Some(target.clone()), Vec::new()),
            Strategy::Factory { deps, .. } => (None, deps.clone()),
            Strategy::Class(_) | Strategy::Value(_) => (None, Vec::new()),
        };

        Self {
            token: provider.token.clone(),
            kind: provider.strategy.kind(),
            target,
            dependencies,
        }
    }

    /// Type name or token name, for display.
    pub fn display_name(&self) -> &str {
        self.token.display_name()
    }
}
