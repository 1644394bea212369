//! Injector configuration.
//!
//! Options can be built in code, read from environment variables, or (with
//! the `config` feature) deserialized from JSON.

use std::collections::HashMap;
use std::env;
use std::str::FromStr;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{DiError, DiResult};

/// Default limit on nested resolutions in one `get` call.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// What to do when one provider list registers the same token twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "kebab-case"))]
pub enum DuplicatePolicy {
    /// The later definition replaces the earlier one
    #[default]
    LastWins,
    /// Injector construction fails with [`DiError::DuplicateToken`]
    Reject,
}

impl FromStr for DuplicatePolicy {
    type Err = DiError;

    fn from_str(s: &str) -> DiResult<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "last-wins" => Ok(DuplicatePolicy::LastWins),
            "reject" => Ok(DuplicatePolicy::Reject),
            other => Err(DiError::Config(format!("unknown duplicate policy '{}'", other))),
        }
    }
}

/// Options applied to an injector and inherited by its children.
///
/// # Examples
///
/// ```rust
/// use ferrous_providers::{DuplicatePolicy, InjectorOptions};
///
/// let options = InjectorOptions::default()
///     .with_duplicate_policy(DuplicatePolicy::Reject)
///     .with_max_depth(64);
///
/// assert_eq!(options.duplicate_policy, DuplicatePolicy::Reject);
/// assert_eq!(options.max_depth, 64);
/// assert!(!options.eager_validation);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct InjectorOptions {
    /// Policy for a token registered twice in one provider list
    pub duplicate_policy: DuplicatePolicy,
    /// Maximum number of nested resolutions in one `get` call
    pub max_depth: usize,
    /// Validate aliases and dependencies when the injector is built
    pub eager_validation: bool,
}

impl Default for InjectorOptions {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::LastWins,
            max_depth: DEFAULT_MAX_DEPTH,
            eager_validation: false,
        }
    }
}

impl InjectorOptions {
    /// Prefix of the environment variables read by [`from_env`](Self::from_env).
    pub const ENV_PREFIX: &'static str = "FERROUS_PROVIDERS";

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_eager_validation(mut self, enabled: bool) -> Self {
        self.eager_validation = enabled;
        self
    }

    /// Reads options from `FERROUS_PROVIDERS_*` environment variables.
    ///
    /// Recognized keys are `DUPLICATE_POLICY`, `MAX_DEPTH` and
    /// `EAGER_VALIDATION`. Unset keys keep their defaults.
    pub fn from_env() -> DiResult<Self> {
        Self::from_source(&EnvironmentConfigSource::with_prefix(Self::ENV_PREFIX))
    }

    /// Reads options from any configuration source, keeping defaults for missing keys.
    pub fn from_source(source: &dyn ConfigSource) -> DiResult<Self> {
        let mut options = Self::default();

        if let Some(policy) = source.get("duplicate_policy") {
            options.duplicate_policy = policy.parse()?;
        }
        if let Some(depth) = source.get("max_depth") {
            options.max_depth = depth
                .trim()
                .parse()
                .map_err(|_| DiError::Config(format!("max_depth is not a number: '{}'", depth)))?;
        }
        if let Some(flag) = source.get("eager_validation") {
            options.eager_validation = parse_bool(&flag)?;
        }

        if options.max_depth == 0 {
            return Err(DiError::Config("max_depth must be at least 1".to_string()));
        }

        tracing::debug!(?options, "injector options loaded");
        Ok(options)
    }

    /// Parses options from a JSON object; missing fields keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> DiResult<Self> {
        let options: Self = serde_json::from_str(json).map_err(|e| DiError::Config(e.to_string()))?;
        if options.max_depth == 0 {
            return Err(DiError::Config("max_depth must be at least 1".to_string()));
        }
        Ok(options)
    }
}

fn parse_bool(value: &str) -> DiResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(DiError::Config(format!("not a boolean: '{}'", other))),
    }
}

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync + std::fmt::Debug {
    /// Get a configuration value by key
    fn get(&self, key: &str) -> Option<String>;
}

/// Environment variable configuration source
#[derive(Debug, Default)]
pub struct EnvironmentConfigSource {
    /// Prefix to filter environment variables
    prefix: Option<String>,
}

impl EnvironmentConfigSource {
    pub fn new() -> Self {
        Self { prefix: None }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

impl ConfigSource for EnvironmentConfigSource {
    fn get(&self, key: &str) -> Option<String> {
        let env_key = match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix.to_uppercase(), key.to_uppercase()),
            None => key.to_uppercase(),
        };
        env::var(env_key).ok()
    }
}

/// In-memory configuration source
#[derive(Debug, Default, Clone)]
pub struct MapConfigSource {
    values: HashMap<String, String>,
}

impl MapConfigSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl ConfigSource for MapConfigSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}
