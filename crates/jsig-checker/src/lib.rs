//! Header-signature checker for JavaScript.
//!
//! This crate is organized into several submodules:
//! - `program` - `Program`, the per-run driver and module cache
//! - `host` - `CompilerHost`, the boundary to parsers and the file system
//! - `header_file` - lowering header programs into interned types
//! - `globals` - the built-in global scope
//! - `state` - `CheckerState`, the per-file verifier
//! - `dispatch`, `statements` and the `*_checker` modules - node verification
//! - `control_flow_narrowing` - branch scopes and restrictions
//! - `error_reporter` - diagnostic construction

pub mod assignment_checker;
pub mod call_checker;
pub mod context;
pub mod control_flow_narrowing;
pub mod dispatch;
pub mod error_handler;
pub mod error_reporter;
pub mod function_checker;
pub mod generic_checker;
mod globals;
pub mod header_file;
pub mod host;
pub mod inference;
pub mod operator_checker;
pub mod options;
pub mod program;
pub mod property_checker;
pub mod state;
pub mod statements;

pub use context::CheckerContext;
pub use error_handler::{CheckResult, CheckerError};
pub use header_file::ResolvedHeader;
pub use host::{CompilerHost, MemoryHost};
pub use options::CheckerOptions;
pub use program::{CompileResult, FileResult, Program, RequireOutcome};
pub use state::CheckerState;

#[cfg(test)]
#[path = "../tests/test_utils.rs"]
mod test_utils;
#[cfg(test)]
#[path = "../tests/function_tests.rs"]
mod function_tests;
#[cfg(test)]
#[path = "../tests/narrowing_tests.rs"]
mod narrowing_tests;
#[cfg(test)]
#[path = "../tests/call_tests.rs"]
mod call_tests;
#[cfg(test)]
#[path = "../tests/header_tests.rs"]
mod header_tests;
#[cfg(test)]
#[path = "../tests/program_tests.rs"]
mod program_tests;
