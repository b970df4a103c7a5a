//! jsig: static type checking of JavaScript against header signatures.
//!
//! Source files are checked against a companion header (`main.js` against
//! `main.hjs`) declaring the types of their bindings. Parsing is left to the
//! host: a [`CompilerHost`] hands the checker ESTree-shaped source trees and
//! parsed header programs, either built directly or deserialized from JSON.
//!
//! ```ignore
//! let mut host = jsig::MemoryHost::new();
//! host.add_source_json("/app/main.js", text, estree_json)?;
//! host.add_header_json("/app/main.hjs", header_json)?;
//! let result = jsig::compile(host, jsig::CheckerOptions::default(), "/app/main.js")?;
//! for diagnostic in &result.diagnostics {
//!     eprintln!("{}", diagnostic.message_text);
//! }
//! ```

pub mod tracing_config;

pub use jsig_ast as ast;
pub use jsig_binder as binder;
pub use jsig_checker as checker;
pub use jsig_common as common;
pub use jsig_solver as solver;

pub use jsig_checker::{
    CheckResult, CheckerError, CheckerOptions, CompileResult, CompilerHost, MemoryHost, Program,
};
pub use jsig_common::{Diagnostic, DiagnosticKind, SourceLocation};
pub use tracing_config::init_tracing;

/// Check `path` and everything it requires in a fresh [`Program`].
///
/// Use a [`Program`] directly to check several entry files against one
/// shared cache.
pub fn compile(
    host: impl CompilerHost + 'static,
    options: CheckerOptions,
    path: &str,
) -> CheckResult<CompileResult> {
    let program = Program::new(host, options)?;
    program.compile(path)
}

/// Diagnostics as a JSON array, in reporting order.
pub fn diagnostics_json(result: &CompileResult) -> String {
    serde_json::to_string_pretty(&result.diagnostics).unwrap_or_else(|_| "[]".to_string())
}
