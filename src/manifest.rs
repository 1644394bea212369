//! JSON provider manifests.
//!
//! A manifest is a JSON array of provider entries:
//!
//! ```json
//! [
//!   { "provide": "APIKey", "useValue": "XYZ1234ABC" },
//!   { "provide": "Mailer", "useExisting": "EmailService" }
//! ]
//! ```
//!
//! Values are stored as [`serde_json::Value`] instances. Class and factory
//! strategies need code, so manifest entries using them are rejected.

use serde_json::{Map, Value};

use crate::definition::ProviderDefinition;
use crate::descriptors::ProviderKind;
use crate::error::{DiError, DiResult};

const STRATEGY_KEYS: [ProviderKind; 4] = [
    ProviderKind::Class,
    ProviderKind::Existing,
    ProviderKind::Value,
    ProviderKind::Factory,
];

/// Parses a manifest into provider definitions, in manifest order.
///
/// Fails with [`DiError::Config`] on invalid JSON or a missing `provide`
/// name, and with [`DiError::MalformedProvider`] when an entry does not name
/// exactly one of `useValue` and `useExisting`.
///
/// ```
/// use ferrous_providers::{definitions_from_json, Injector, Resolver};
///
/// let definitions = definitions_from_json(r#"[
///     { "provide": "APIKey", "useValue": "XYZ1234ABC" },
///     { "provide": "Key", "useExisting": "APIKey" }
/// ]"#).unwrap();
///
/// let injector = Injector::create(definitions).unwrap();
/// let key = injector.get_as::<serde_json::Value>("Key").unwrap();
/// assert_eq!(*key, serde_json::json!("XYZ1234ABC"));
/// ```
pub fn definitions_from_json(json: &str) -> DiResult<Vec<ProviderDefinition>> {
    let entries: Vec<Map<String, Value>> =
        serde_json::from_str(json).map_err(|e| DiError::Config(format!("invalid manifest: {}", e)))?;

    let definitions = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| definition_from_entry(index, entry))
        .collect::<DiResult<Vec<_>>>()?;

    tracing::debug!(providers = definitions.len(), "manifest loaded");
    Ok(definitions)
}

fn definition_from_entry(index: usize, mut entry: Map<String, Value>) -> DiResult<ProviderDefinition> {
    let name = match entry.remove("provide") {
        Some(Value::String(name)) => name,
        Some(other) => {
            return Err(DiError::Config(format!(
                "manifest entry {}: 'provide' must be a string, found {}",
                index, other
            )))
        }
        None => return Err(DiError::Config(format!("manifest entry {}: missing 'provide'", index))),
    };

    let strategies: Vec<&'static str> = STRATEGY_KEYS
        .iter()
        .map(ProviderKind::field_name)
        .filter(|key| entry.contains_key(*key))
        .collect();

    let definition = ProviderDefinition::provide(name);

    match strategies.as_slice() {
        ["useValue"] => {
            let value = entry.remove("useValue").unwrap_or(Value::Null);
            Ok(definition.use_value(value))
        }
        ["useExisting"] => match entry.remove("useExisting") {
            Some(Value::String(target)) => Ok(definition.use_existing(target)),
            other => Err(DiError::Config(format!(
                "manifest entry {}: 'useExisting' must be a token name, found {}",
                index,
                other.unwrap_or(Value::Null)
            ))),
        },
        _ => Err(DiError::MalformedProvider {
            token: definition.token().clone(),
            strategies,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_value_counts_as_strategy() {
        let definitions = definitions_from_json(r#"[{ "provide": "Nothing", "useValue": null }]"#).unwrap();
        assert_eq!(definitions.len(), 1);
    }

    #[test]
    fn test_factory_entry_is_malformed() {
        let result = definitions_from_json(r#"[{ "provide": "EmailService", "useFactory": "mandrill" }]"#);

        match result {
            Err(DiError::MalformedProvider { strategies, .. }) => assert_eq!(strategies, vec!["useFactory"]),
            other => panic!("Expected MalformedProvider, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_provide_is_config_error() {
        assert!(matches!(
            definitions_from_json(r#"[{ "useValue": 1 }]"#),
            Err(DiError::Config(_))
        ));
    }
}
