//! Per-injector instance cache.
//!
//! Each token gets its own `OnceCell`, so construction of one token never
//! blocks resolution of another. The map lock is only held to find or create
//! a cell, never while user code runs.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::definition::Instance;
use crate::error::DiResult;
use crate::registration::TokenMap;
use crate::token::Token;

type Slot = Arc<OnceCell<Instance>>;

/// At most one instance per token for the lifetime of the injector.
///
/// Entries are created lazily and never evicted.
pub(crate) struct InstanceCache {
    slots: Mutex<TokenMap<Slot>>,
}

impl InstanceCache {
    pub(crate) fn new() -> Self {
        Self {
            slots: Mutex::new(TokenMap::default()),
        }
    }

    /// Cached instance for `token`, if one was stored.
    pub(crate) fn get(&self, token: &Token) -> Option<Instance> {
        self.slots.lock().get(token).and_then(|slot| slot.get().cloned())
    }

    /// Stores `instance` under `token`. A second put overwrites the first.
    pub(crate) fn put(&self, token: Token, instance: Instance) {
        let mut slots = self.slots.lock();
        if slots.get(&token).is_some_and(|slot| slot.get().is_some()) {
            tracing::trace!(token = %token, "cache entry overwritten");
        }
        slots.insert(token, Arc::new(OnceCell::with_value(instance)));
    }

    /// Returns the cached instance or runs `init` to create it.
    ///
    /// Concurrent callers for the same token wait for the first one and share
    /// its instance, so `init` runs at most once per successful entry. A
    /// failed `init` leaves the entry empty.
    pub(crate) fn get_or_try_init<F>(&self, token: &Token, init: F) -> DiResult<Instance>
    where
        F: FnOnce() -> DiResult<Instance>,
    {
        let slot = {
            let mut slots = self.slots.lock();
            slots
                .entry(token.clone())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };
        slot.get_or_try_init(init).cloned()
    }

    pub(crate) fn contains(&self, token: &Token) -> bool {
        self.get(token).is_some()
    }

    /// Number of tokens holding an instance.
    pub(crate) fn len(&self) -> usize {
        self.slots.lock().values().filter(|slot| slot.get().is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn instance<T: Send + Sync + 'static>(value: T) -> Instance {
        Arc::new(value)
    }

    #[test]
    fn test_get_or_try_init_runs_once() {
        let cache = InstanceCache::new();
        let token = Token::from("counter");
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_try_init(&token, || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(instance(1u32))
            })
            .unwrap();
        let second = cache
            .get_or_try_init(&token, || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(instance(2u32))
            })
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_init_leaves_no_entry() {
        let cache = InstanceCache::new();
        let token = Token::from("broken");

        let result = cache.get_or_try_init(&token, || Err(DiError::DepthExceeded(1)));

        assert!(result.is_err());
        assert!(!cache.contains(&token));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_put_overwrites() {
        let cache = InstanceCache::new();
        let token = Token::from("value");
        let first = instance("first");
        let second = instance("second");

        cache.put(token.clone(), first);
        cache.put(token.clone(), second.clone());

        assert!(Arc::ptr_eq(&cache.get(&token).unwrap(), &second));
        assert_eq!(cache.len(), 1);
    }
}
