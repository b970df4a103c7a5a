//! Common types and utilities for the jsig type checker.
//!
//! This crate provides foundational types used across the checker crates:
//! - String interning (`Atom`, `Interner`)
//! - Source positions (`Position`, `SourceLocation`)
//! - Diagnostics (`Diagnostic`, `DiagnosticKind`)
//! - Centralized limits

pub mod diagnostics;
pub mod interner;
pub mod limits;
pub mod position;

pub use diagnostics::{Diagnostic, DiagnosticKind, format_message};
pub use interner::{Atom, Interner, well_known};
pub use position::{Position, SourceLocation};

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod diagnostics_tests;
