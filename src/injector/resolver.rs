//! The resolution algorithm behind [`Injector::get`](crate::Resolver::get).

use std::time::Instant;

use crate::definition::{Dependencies, Instance, Provider, Strategy};
use crate::error::{DiError, DiResult};
use crate::internal::{Edge, Owner, ResolutionPath};
use crate::token::Token;

use super::InjectorInner;

/// Resolves tokens against one injector, sharing a path with its callers.
///
/// A resolver is created per `get` call. Delegation to a parent injector
/// reuses the same path, so depth is counted across the hierarchy while
/// cycles are only matched within one injector.
pub(crate) struct ProviderResolver<'a, 'p> {
    inner: &'a InjectorInner,
    path: &'p mut ResolutionPath,
}

impl<'a, 'p> ProviderResolver<'a, 'p> {
    pub(crate) fn new(inner: &'a InjectorInner, path: &'p mut ResolutionPath) -> Self {
        Self { inner, path }
    }

    pub(crate) fn resolve(&mut self, token: &Token, edge: Edge) -> DiResult<Instance> {
        let inner = self.inner;

        if let Some(instance) = inner.cache.get(token) {
            if !inner.observers.is_empty() {
                inner.observers.cache_hit(token);
            }
            return Ok(instance);
        }

        let provider = match (inner.registry.lookup(token), &inner.parent) {
            (Ok(provider), _) => provider,
            (Err(_), Some(parent)) => {
                return ProviderResolver::new(&parent.inner, &mut *self.path).resolve(token, edge);
            }
            (Err(e), None) => return Err(self.failed(token, e)),
        };

        if let Err(e) = self.path.enter(self.owner(), token, edge) {
            return Err(self.failed(token, e));
        }

        let start = (!inner.observers.is_empty()).then(|| {
            inner.observers.resolving(token);
            Instant::now()
        });

        let result = self.construct(provider);
        self.path.leave();

        match result {
            Ok(instance) => {
                if let Some(start) = start {
                    inner.observers.resolved(token, start.elapsed());
                }
                Ok(instance)
            }
            Err(e) => Err(self.failed(token, e)),
        }
    }

    fn construct(&mut self, provider: &'a Provider) -> DiResult<Instance> {
        let inner = self.inner;
        let cache = &inner.cache;
        let token = &provider.token;

        match &provider.strategy {
            Strategy::Value(value) => cache.get_or_try_init(token, || Ok(value.clone())),
            Strategy::Class(constructor) => cache.get_or_try_init(token, || Ok(constructor())),
            Strategy::Factory { factory, deps } => {
                // Dependencies resolve outside this token's cell
                let instances = deps
                    .iter()
                    .map(|dep| self.resolve(dep, Edge::Dependency))
                    .collect::<DiResult<Vec<_>>>()?;
                cache.get_or_try_init(token, || factory(&Dependencies::new(deps, &instances)))
            }
            Strategy::Existing(target) => {
                let instance = self.resolve(target, Edge::Alias)?;
                cache.put(token.clone(), instance.clone());
                Ok(instance)
            }
        }
    }

    /// Frames are keyed per injector so a shadowed token is not a revisit.
    fn owner(&self) -> Owner {
        self.inner as *const InjectorInner as Owner
    }

    fn failed(&self, token: &Token, error: DiError) -> DiError {
        if !self.inner.observers.is_empty() {
            self.inner.observers.resolution_failed(token, &error);
        }
        error
    }
}
