//! Observers for resolution events.
//!
//! Observers are called synchronously on the resolving thread. Keep them
//! cheap; queue anything expensive.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::token::Token;

/// Observer trait for injector resolution events.
///
/// `resolving`/`resolved` bracket every provider that actually runs its
/// strategy. Cache hits only produce `cache_hit`.
///
/// # Examples
///
/// ```
/// use ferrous_providers::{Injector, InjectorObserver, ProviderDefinition, Resolver, Token};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder(Mutex<Vec<String>>);
///
/// impl InjectorObserver for Recorder {
///     fn resolving(&self, token: &Token) {
///         self.0.lock().unwrap().push(format!("resolving {}", token));
///     }
///
///     fn resolved(&self, token: &Token, _duration: Duration) {
///         self.0.lock().unwrap().push(format!("resolved {}", token));
///     }
/// }
///
/// let recorder = Arc::new(Recorder::default());
/// let injector = Injector::builder()
///     .provide(ProviderDefinition::provide("APIKey").use_value("XYZ1234ABC"))
///     .observer(recorder.clone())
///     .build()
///     .unwrap();
///
/// injector.get("APIKey").unwrap();
/// assert_eq!(*recorder.0.lock().unwrap(), vec!["resolving APIKey", "resolved APIKey"]);
/// ```
pub trait InjectorObserver: Send + Sync {
    /// Called before a provider's strategy runs.
    fn resolving(&self, token: &Token);

    /// Called after a provider's strategy produced an instance.
    fn resolved(&self, token: &Token, duration: Duration);

    /// Called when `token` was served from the instance cache.
    fn cache_hit(&self, _token: &Token) {}

    /// Called when resolving `token` failed.
    fn resolution_failed(&self, _token: &Token, _error: &DiError) {}
}

/// Observers attached to one injector.
#[derive(Clone, Default)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn InjectorObserver>>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Arc<dyn InjectorObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    pub(crate) fn resolving(&self, token: &Token) {
        for observer in &self.observers {
            observer.resolving(token);
        }
    }

    pub(crate) fn resolved(&self, token: &Token, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(token, duration);
        }
    }

    pub(crate) fn cache_hit(&self, token: &Token) {
        for observer in &self.observers {
            observer.cache_hit(token);
        }
    }

    pub(crate) fn resolution_failed(&self, token: &Token, error: &DiError) {
        for observer in &self.observers {
            observer.resolution_failed(token, error);
        }
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} observers>", self.observers.len())
    }
}

/// Observer that emits `tracing` events.
///
/// Resolutions are logged at `debug`, cache hits at `trace` and failures at
/// `warn`, all with the token as a structured field.
///
/// ```
/// use ferrous_providers::{Injector, TracingObserver};
/// use std::sync::Arc;
///
/// let injector = Injector::builder()
///     .observer(Arc::new(TracingObserver::new()))
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default, Clone)]
pub struct TracingObserver {
    _private: (),
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InjectorObserver for TracingObserver {
    fn resolving(&self, token: &Token) {
        tracing::debug!(token = %token, "resolving");
    }

    fn resolved(&self, token: &Token, duration: Duration) {
        tracing::debug!(token = %token, elapsed_us = duration.as_micros() as u64, "resolved");
    }

    fn cache_hit(&self, token: &Token) {
        tracing::trace!(token = %token, "cache hit");
    }

    fn resolution_failed(&self, token: &Token, error: &DiError) {
        tracing::warn!(token = %token, error = %error, "resolution failed");
    }
}

/// Counters for resolution activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolutionStats {
    /// Providers whose strategy ran to completion
    pub resolved: u64,
    /// Requests served from the cache
    pub cache_hits: u64,
    /// Failed resolutions, counted at every level of the path
    pub failures: u64,
}

/// Observer that counts resolutions, cache hits and failures.
///
/// ```
/// use ferrous_providers::{Injector, MetricsObserver, ProviderDefinition, Resolver};
/// use std::sync::Arc;
///
/// let metrics = Arc::new(MetricsObserver::new());
/// let injector = Injector::builder()
///     .provide(ProviderDefinition::provide("EmailService").use_factory(|| 42u32))
///     .observer(metrics.clone())
///     .build()
///     .unwrap();
///
/// injector.get("EmailService").unwrap();
/// injector.get("EmailService").unwrap();
///
/// let stats = metrics.snapshot();
/// assert_eq!(stats.resolved, 1);
/// assert_eq!(stats.cache_hits, 1);
/// ```
#[derive(Debug, Default)]
pub struct MetricsObserver {
    resolved: AtomicU64,
    cache_hits: AtomicU64,
    failures: AtomicU64,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current counter values.
    pub fn snapshot(&self) -> ResolutionStats {
        ResolutionStats {
            resolved: self.resolved.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

impl InjectorObserver for MetricsObserver {
    fn resolving(&self, _token: &Token) {}

    fn resolved(&self, _token: &Token, _duration: Duration) {
        self.resolved.fetch_add(1, Ordering::Relaxed);
    }

    fn cache_hit(&self, _token: &Token) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    fn resolution_failed(&self, _token: &Token, _error: &DiError) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }
}
