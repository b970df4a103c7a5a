//! Generic resolution at call sites.
//!
//! Each occurrence of a type variable carries its path inside the function
//! type. Occurrences are visited in declaration order: one under an
//! argument or `this` reads the type at the same path inside the actual
//! argument or receiver, any other occurrence must already be solved. When
//! two occurrences disagree the more general type wins, and two unrelated
//! types are a mismatch.

use crate::error_handler::{CheckResult, CheckerError};
use crate::state::CheckerState;
use indexmap::IndexMap;
use jsig_ast::CallExpression;
use jsig_common::{Atom, DiagnosticKind, SourceLocation};
use jsig_solver::instantiate::{instantiate, type_at};
use jsig_solver::{FunctionShape, GenericVar, PathStep, TypeId};
use tracing::trace;

impl<'a> CheckerState<'a> {
    /// Instantiate a generic callee for this call. `None` after a
    /// diagnostic.
    #[tracing::instrument(level = "debug", skip_all, fields(generics = shape.generics.len()))]
    pub(crate) fn resolve_generics(
        &mut self,
        node: &'a CallExpression,
        callee_type: TypeId,
        shape: &FunctionShape,
        receiver: Option<TypeId>,
        arg_types: &[Option<TypeId>],
    ) -> CheckResult<Option<TypeId>> {
        let mut solved: IndexMap<Atom, TypeId> = IndexMap::new();

        for var in &shape.generics {
            let Some((&first, rest)) = var.location.split_first() else {
                return Err(CheckerError::MalformedGenericLocation {
                    name: self.atom_text(var.name).to_string(),
                    reason: "empty location".to_string(),
                });
            };

            let (source, loc): (TypeId, SourceLocation) = match first {
                PathStep::Arg(i) => match (node.arguments.get(i), arg_types.get(i).copied().flatten()) {
                    (Some(argument), Some(arg_type)) => (arg_type, argument.loc()),
                    // Missing optional argument, or a function expression
                    // still to be verified.
                    _ => continue,
                },
                PathStep::ThisArg => match receiver {
                    Some(receiver) => (receiver, node.callee.loc()),
                    None => continue,
                },
                _ => {
                    if !solved.contains_key(&var.name) {
                        self.report_unresolved_generic(node, var);
                        return Ok(None);
                    }
                    continue;
                }
            };

            // A shape mismatch here is reported by the argument check.
            let Some(found) = type_at(self.types, source, rest) else {
                continue;
            };

            let next = match solved.get(&var.name).copied() {
                None => found,
                Some(previous) => match self.reconcile_generic(previous, found) {
                    Some(next) => next,
                    None => {
                        self.error(
                            DiagnosticKind::TypeClassMismatch,
                            loc,
                            [
                                ("expected", self.format_type(previous)),
                                ("actual", self.format_type(found)),
                            ],
                        );
                        return Ok(None);
                    }
                },
            };
            trace!(name = %self.atom_text(var.name), solved = %self.format_type(next), "generic solved");
            solved.insert(var.name, next);
        }

        let bindings: Vec<(GenericVar, TypeId)> = shape
            .generics
            .iter()
            .filter_map(|var| solved.get(&var.name).map(|&ty| (var.clone(), ty)))
            .collect();
        let instantiated = instantiate(self.types, callee_type, &bindings);
        let Some(mut resolved) = self.types.function_shape(instantiated) else {
            return Ok(Some(instantiated));
        };
        resolved.generics.clear();
        Ok(Some(self.types.function(resolved)))
    }

    /// Combine two solutions of one variable. Unsolved placeholders yield
    /// to anything; otherwise the wider of the two is kept.
    fn reconcile_generic(&self, previous: TypeId, found: TypeId) -> Option<TypeId> {
        if self.types.is_free(found) {
            return Some(previous);
        }
        if self.types.is_free(previous) {
            return Some(found);
        }
        if self.is_subtype(previous, found) {
            return Some(previous);
        }
        if self.is_subtype(found, previous) {
            return Some(found);
        }
        None
    }

    fn report_unresolved_generic(&mut self, node: &CallExpression, var: &GenericVar) {
        self.error(
            DiagnosticKind::UnresolvedGeneric,
            node.loc,
            [
                ("funcName", self.snippet(&node.callee.loc())),
                ("genericName", self.atom_text(var.name).to_string()),
            ],
        );
    }
}
