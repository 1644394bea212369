//! Token registry: one validated provider per token.

use std::collections::HashMap;

use crate::config::DuplicatePolicy;
use crate::definition::{Provider, ProviderDefinition};
use crate::error::{DiError, DiResult};
use crate::token::Token;

#[cfg(feature = "ahash")]
pub(crate) type TokenHasher = ahash::RandomState;
#[cfg(not(feature = "ahash"))]
pub(crate) type TokenHasher = std::collections::hash_map::RandomState;

/// Hash map keyed by token, using the crate-wide hasher.
pub(crate) type TokenMap<V> = HashMap<Token, V, TokenHasher>;

/// Token to provider mapping, immutable once built.
pub(crate) struct TokenRegistry {
    providers: TokenMap<Provider>,
    /// Registration order, for deterministic iteration
    order: Vec<Token>,
}

impl TokenRegistry {
    /// Validates and registers `definitions` in order.
    ///
    /// Under [`DuplicatePolicy::LastWins`] a later definition for a token
    /// replaces the earlier one but keeps its original position.
    pub(crate) fn register<I>(definitions: I, policy: DuplicatePolicy) -> DiResult<Self>
    where
        I: IntoIterator<Item = ProviderDefinition>,
    {
        let mut registry = Self {
            providers: TokenMap::default(),
            order: Vec::new(),
        };

        for definition in definitions {
            let provider = definition.into_provider()?;
            let token = provider.token.clone();

            if registry.providers.contains_key(&token) {
                match policy {
                    DuplicatePolicy::Reject => return Err(DiError::DuplicateToken(token)),
                    DuplicatePolicy::LastWins => {
                        tracing::debug!(token = %token, "provider replaced by a later registration");
                    }
                }
            } else {
                registry.order.push(token.clone());
            }

            registry.providers.insert(token, provider);
        }

        Ok(registry)
    }

    pub(crate) fn get(&self, token: &Token) -> Option<&Provider> {
        self.providers.get(token)
    }

    /// Like [`get`](Self::get), but a miss is an [`DiError::UnknownToken`].
    pub(crate) fn lookup(&self, token: &Token) -> DiResult<&Provider> {
        self.get(token).ok_or_else(|| DiError::UnknownToken(token.clone()))
    }

    pub(crate) fn contains(&self, token: &Token) -> bool {
        self.providers.contains_key(token)
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    /// Providers in registration order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Provider> + '_ {
        self.order.iter().filter_map(move |token| self.providers.get(token))
    }
}
