//! Per-file mutable state of a check run.

use jsig_binder::LookupMode;
use jsig_common::{Atom, Diagnostic};
use jsig_solver::TypeId;
use rustc_hash::FxHashSet;

/// Everything the verifier accumulates for one file besides its scopes.
#[derive(Debug)]
pub struct CheckerContext {
    pub file_name: String,
    pub diagnostics: Vec<Diagnostic>,

    /// Declared type of the assignment target currently being checked.
    /// Empty array literals, function expressions and untyped calls read
    /// it as their contextual type.
    pub assignment_type: Option<TypeId>,

    /// `Writable` while the left side of an assignment is resolved.
    pub lookup_mode: LookupMode,

    /// Set while resolving the member expression an assignment writes to;
    /// missing fields of open objects resolve to the open-field sentinel.
    pub assignment_target: bool,

    /// Type most recently assigned to `module.exports`.
    pub module_exports_type: Option<TypeId>,

    /// Variables whose initializer had no type. Reads of them stay silent
    /// instead of repeating an unknown-identifier error.
    pub unknown_identifiers: FxHashSet<Atom>,

    /// Modules required by this file, in first-require order.
    pub dependencies: Vec<String>,
}

impl CheckerContext {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            diagnostics: Vec::new(),
            assignment_type: None,
            lookup_mode: LookupMode::Normal,
            assignment_target: false,
            module_exports_type: None,
            unknown_identifiers: FxHashSet::default(),
            dependencies: Vec::new(),
        }
    }

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }
}
