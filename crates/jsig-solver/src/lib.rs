//! Interned Structural Type Solver
//!
//! Types are hash-consed into a `TypeInterner` and referred to by `TypeId`,
//! so equality of two types is an integer comparison and "modifying" a type
//! always produces a new id while every holder of the old id keeps its view.
//!
//! - `types` - `TypeData` variants and shapes
//! - `intern` - the interner and type constructors
//! - `subtype` - structural subtype checking with failure reasons
//! - `instantiate` - generic-location paths and substitution
//! - `narrowing` - union filtering used by control-flow narrowing
//! - `format` - single-line type display for diagnostics

mod format;
mod intern;
pub mod instantiate;
pub mod narrowing;
mod subtype;
pub mod types;

pub use format::TypeFormatter;
pub use intern::TypeInterner;
pub use subtype::{SubtypeChecker, SubtypeFailureReason};
pub use types::{
    FunctionShape, GenericVar, ObjectShape, ParamInfo, PathStep, PropertyInfo, TypeData, TypeId,
};

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod intern_tests;
#[cfg(test)]
#[path = "../tests/subtype_tests.rs"]
mod subtype_tests;
#[cfg(test)]
#[path = "../tests/instantiate_tests.rs"]
mod instantiate_tests;
#[cfg(test)]
#[path = "../tests/narrowing_tests.rs"]
mod narrowing_tests;
