//! Cycle and depth detection for one resolution call.

use crate::error::{DiError, DiResult};
use crate::token::Token;

/// How a token was reached from the token before it on the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Edge {
    /// Requested directly by the caller
    Root,
    /// Target of a `useExisting` provider
    Alias,
    /// Declared dependency of a factory
    Dependency,
}

/// Address of the injector that owns a frame.
///
/// Providers only resolve against their own injector and its ancestors, so a
/// real cycle never spans two owners. The same token at two levels is two
/// different frames.
pub(crate) type Owner = usize;

/// Stack of tokens currently being resolved by one `get` call.
pub(crate) struct ResolutionPath {
    frames: Vec<(Owner, Token, Edge)>,
    max_depth: usize,
}

impl ResolutionPath {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Pushes `token` for `owner`, failing if that pair is already on the path
    /// or the path is full.
    ///
    /// A revisit is a [`DiError::CyclicAlias`] when every edge of the cycle is
    /// an alias edge, otherwise a [`DiError::CyclicDependency`]. The reported
    /// path is the whole stack plus the revisited token.
    pub(crate) fn enter(&mut self, owner: Owner, token: &Token, edge: Edge) -> DiResult<()> {
        if let Some(start) = self.frames.iter().position(|(o, t, _)| *o == owner && t == token) {
            // Edge of the first frame leads into the cycle, not around it
            let alias_only = edge == Edge::Alias
                && self.frames[start + 1..].iter().all(|(_, _, e)| *e == Edge::Alias);

            let mut path: Vec<Token> = self.frames.iter().map(|(_, t, _)| t.clone()).collect();
            path.push(token.clone());

            return Err(if alias_only {
                DiError::CyclicAlias { path }
            } else {
                DiError::CyclicDependency { path }
            });
        }

        if self.frames.len() >= self.max_depth {
            return Err(DiError::DepthExceeded(self.max_depth));
        }

        self.frames.push((owner, token.clone(), edge));
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.frames.pop();
    }
}
