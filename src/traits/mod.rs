//! Core traits for the provider injector.

mod resolver;

pub use resolver::{Resolver, ResolverCore};
