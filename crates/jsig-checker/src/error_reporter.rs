//! Diagnostic construction.
//!
//! Every diagnostic the verifier records goes through this module so field
//! names and type rendering stay uniform across the taxonomy.

use crate::state::CheckerState;
use jsig_common::{Diagnostic, DiagnosticKind, SourceLocation};
use jsig_solver::{SubtypeChecker, SubtypeFailureReason, TypeId};
use tracing::debug;

impl<'a> CheckerState<'a> {
    // =========================================================================
    // Recording
    // =========================================================================

    pub(crate) fn diagnostic<I, K, V>(
        &self,
        kind: DiagnosticKind,
        loc: SourceLocation,
        fields: I,
    ) -> Diagnostic
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Diagnostic::new(kind, self.ctx.file_name.clone(), Some(loc), fields)
    }

    /// Record a diagnostic of `kind` at `loc`.
    pub(crate) fn error<I, K, V>(&mut self, kind: DiagnosticKind, loc: SourceLocation, fields: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let diagnostic = self.diagnostic(kind, loc, fields);
        debug!(code = kind.code(), line = loc.line(), "diagnostic");
        self.ctx.push_diagnostic(diagnostic);
    }

    // =========================================================================
    // Subtyping
    // =========================================================================

    /// Check `actual` against `expected` without recording anything.
    pub(crate) fn check_subtype_raw(
        &self,
        loc: SourceLocation,
        expected: TypeId,
        actual: TypeId,
    ) -> Option<Diagnostic> {
        let mut checker = SubtypeChecker::new(self.types);
        checker
            .check(expected, actual)
            .err()
            .map(|reason| self.subtype_diagnostic(loc, &reason))
    }

    /// Check `actual` against `expected`, recording the failure.
    pub(crate) fn check_subtype(&mut self, loc: SourceLocation, expected: TypeId, actual: TypeId) -> bool {
        match self.check_subtype_raw(loc, expected, actual) {
            Some(diagnostic) => {
                self.ctx.push_diagnostic(diagnostic);
                false
            }
            None => true,
        }
    }

    pub(crate) fn is_subtype(&self, expected: TypeId, actual: TypeId) -> bool {
        SubtypeChecker::new(self.types).is_subtype(expected, actual)
    }

    fn subtype_diagnostic(&self, loc: SourceLocation, reason: &SubtypeFailureReason) -> Diagnostic {
        match *reason {
            SubtypeFailureReason::TypeClassMismatch { expected, actual } => self.diagnostic(
                DiagnosticKind::TypeClassMismatch,
                loc,
                [
                    ("expected", self.format_type(expected)),
                    ("actual", self.format_type(actual)),
                ],
            ),
            SubtypeFailureReason::MissingObjectField {
                field,
                expected,
                actual,
            } => self.diagnostic(
                DiagnosticKind::MissingObjectField,
                loc,
                [
                    ("fieldName", self.atom_text(field).to_string()),
                    ("expected", self.format_type(expected)),
                    ("actual", self.format_type(actual)),
                ],
            ),
            SubtypeFailureReason::BrandMismatch { expected, actual } => self.diagnostic(
                DiagnosticKind::BrandMismatch,
                loc,
                [
                    ("expected", self.format_type(expected)),
                    ("actual", self.format_type(actual)),
                ],
            ),
            SubtypeFailureReason::FunctionArgCountMismatch { expected, actual } => self.diagnostic(
                DiagnosticKind::FunctionArgCountMismatch,
                loc,
                [
                    ("expected", self.format_type(expected)),
                    ("actual", self.format_type(actual)),
                ],
            ),
        }
    }

    // =========================================================================
    // Common reports
    // =========================================================================

    pub(crate) fn report_unknown_identifier(&mut self, loc: SourceLocation, name: &str) {
        self.error(DiagnosticKind::UnknownIdentifier, loc, [("token", name)]);
    }

    pub(crate) fn report_non_existent_field(&mut self, loc: SourceLocation, field: &str, obj_name: &str) {
        self.error(
            DiagnosticKind::NonExistentField,
            loc,
            [("fieldName", field), ("objName", obj_name)],
        );
    }

    pub(crate) fn report_untyped_function(&mut self, loc: SourceLocation, func_name: &str) {
        self.error(
            DiagnosticKind::UntypedFunctionFound,
            loc,
            [("funcName", func_name)],
        );
    }

    /// Declaration-side arity: parameter list vs declared argument list.
    pub(crate) fn report_function_arity(
        &mut self,
        loc: SourceLocation,
        func_name: &str,
        expected: usize,
        actual: usize,
    ) {
        let kind = if actual > expected {
            DiagnosticKind::TooManyArgsInFunc
        } else {
            DiagnosticKind::TooFewArgsInFunc
        };
        self.error(
            kind,
            loc,
            [
                ("funcName", func_name.to_string()),
                ("expectedArgs", expected.to_string()),
                ("actualArgs", actual.to_string()),
            ],
        );
    }

    /// Call-side arity.
    pub(crate) fn report_call_arity(
        &mut self,
        kind: DiagnosticKind,
        loc: SourceLocation,
        func_name: &str,
        expected: usize,
        actual: usize,
    ) {
        self.error(
            kind,
            loc,
            [
                ("funcName", func_name.to_string()),
                ("expectedArgs", expected.to_string()),
                ("actualArgs", actual.to_string()),
            ],
        );
    }
}
