//! Static validation of an injector's providers.
//!
//! Validation walks the registered providers without constructing anything
//! and reports aliases and factory dependencies that cannot resolve. It runs
//! on demand through [`Injector::validate`] or at build time when
//! [`InjectorOptions::eager_validation`](crate::InjectorOptions) is set.
//!
//! Cycles that pass through a factory dependency are only detected when the
//! token is resolved, as [`DiError::CyclicDependency`].

use std::collections::HashSet;
use std::fmt;

use crate::definition::Strategy;
use crate::error::{DiError, DiResult};
use crate::injector::Injector;
use crate::token::Token;

/// A problem found by [`Injector::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// Alias whose target has no provider here or in any parent
    DanglingAlias { alias: Token, target: Token },
    /// Factory dependency with no provider here or in any parent
    DanglingDependency { token: Token, dependency: Token },
    /// Alias chain that returns to a token already on it
    AliasCycle { path: Vec<Token> },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::DanglingAlias { alias, target } => {
                write!(f, "alias {} points to unknown token {}", alias, target)
            }
            ValidationIssue::DanglingDependency { token, dependency } => {
                write!(f, "{} depends on unknown token {}", token, dependency)
            }
            ValidationIssue::AliasCycle { path } => {
                let names: Vec<_> = path.iter().map(Token::display_name).collect();
                write!(f, "alias cycle {}", names.join(" -> "))
            }
        }
    }
}

/// Issues found in one injector, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    /// Converts the first issue into the error resolution would raise for it.
    pub fn into_result(self) -> DiResult<()> {
        match self.issues.into_iter().next() {
            None => Ok(()),
            Some(ValidationIssue::DanglingAlias { target, .. }) => Err(DiError::UnknownToken(target)),
            Some(ValidationIssue::DanglingDependency { dependency, .. }) => {
                Err(DiError::UnknownToken(dependency))
            }
            Some(ValidationIssue::AliasCycle { path }) => Err(DiError::CyclicAlias { path }),
        }
    }
}

pub(crate) fn validate(injector: &Injector) -> ValidationReport {
    let registry = &injector.inner().registry;
    let mut report = ValidationReport::default();
    let mut in_reported_cycle: HashSet<Token> = HashSet::new();

    for provider in registry.iter() {
        match &provider.strategy {
            Strategy::Existing(target) => {
                if !injector.contains_token(target) {
                    report.issues.push(ValidationIssue::DanglingAlias {
                        alias: provider.token.clone(),
                        target: target.clone(),
                    });
                } else if let Some(cycle) = alias_cycle(injector, &provider.token) {
                    if !in_reported_cycle.contains(&cycle[0]) {
                        in_reported_cycle.extend(cycle.iter().cloned());
                        report.issues.push(ValidationIssue::AliasCycle { path: cycle });
                    }
                }
            }
            Strategy::Factory { deps, .. } => {
                for dependency in deps.iter().filter(|dep| !injector.contains_token(dep)) {
                    report.issues.push(ValidationIssue::DanglingDependency {
                        token: provider.token.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
            Strategy::Class(_) | Strategy::Value(_) => {}
        }
    }

    if report.is_ok() {
        tracing::debug!(providers = registry.len(), "validation passed");
    } else {
        for issue in &report.issues {
            tracing::warn!(%issue, "provider validation issue");
        }
    }

    report
}

/// Follows local aliases from `start` and returns the cycle it runs into, if any.
///
/// The returned path starts and ends with the first revisited token. Aliases
/// that leave this injector stop the walk: a parent resolves its own aliases
/// against its own level, so a cycle never spans two injectors.
fn alias_cycle(injector: &Injector, start: &Token) -> Option<Vec<Token>> {
    let registry = &injector.inner().registry;
    let mut chain = vec![start.clone()];
    let mut current = start;

    while let Some(Strategy::Existing(target)) = registry.get(current).map(|p| &p.strategy) {
        if let Some(pos) = chain.iter().position(|t| t == target) {
            let mut cycle = chain.split_off(pos);
            cycle.push(target.clone());
            return Some(cycle);
        }
        chain.push(target.clone());
        current = target;
    }

    None
}
