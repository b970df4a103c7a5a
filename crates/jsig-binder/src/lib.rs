//! Scope model for the jsig checker.
//!
//! Scopes live in a `ScopeArena` and are addressed by `ScopeId`. The checker
//! threads the current `ScopeId` through every verification call; entering a
//! function or branch pushes a child scope and leaving it restores the saved
//! id. Lookups walk the parent chain and fall back to the shared
//! `GlobalScope`.

mod arena;
mod error;
mod global_scope;
mod scope;

pub use arena::ScopeArena;
pub use error::ScopeError;
pub use global_scope::GlobalScope;
pub use scope::{
    FunctionScopeData, LookupMode, Scope, ScopeId, ScopeKind, UntypedFunction, is_constructor_name,
};

#[cfg(test)]
#[path = "../tests/scope_tests.rs"]
mod scope_tests;
