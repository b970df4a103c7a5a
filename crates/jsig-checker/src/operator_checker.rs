//! Binary, unary and update operators.
//!
//! Operators are ordinary function types in the global scope; overloaded
//! ones such as `+` are intersections of function types. A use of an
//! operator is a call of that signature with the operand types.

use crate::error_handler::CheckResult;
use crate::state::CheckerState;
use jsig_ast::{AssignmentExpression, BinaryExpression, UnaryExpression, UpdateExpression};
use jsig_common::{Diagnostic, DiagnosticKind, SourceLocation};
use jsig_solver::TypeId;
use tracing::{debug, trace};

impl<'a> CheckerState<'a> {
    pub(crate) fn check_binary_expression(&mut self, node: &'a BinaryExpression) -> CheckResult<Option<TypeId>> {
        let left = self.with_assignment_type(None, |this| this.check_expression(&node.left))?;
        let right = self.with_assignment_type(None, |this| this.check_expression(&node.right))?;
        let (Some(left), Some(right)) = (left, right) else {
            return Ok(None);
        };
        Ok(self.check_operator_call(&node.operator, node.loc, &[left, right]))
    }

    pub(crate) fn check_unary_expression(&mut self, node: &'a UnaryExpression) -> CheckResult<Option<TypeId>> {
        let Some(argument) = self.with_assignment_type(None, |this| this.check_expression(&node.argument))? else {
            return Ok(None);
        };
        Ok(self.check_operator_call(&node.operator, node.loc, &[argument]))
    }

    pub(crate) fn check_update_expression(&mut self, node: &'a UpdateExpression) -> CheckResult<Option<TypeId>> {
        let Some(argument) = self.with_assignment_type(None, |this| this.check_expression(&node.argument))? else {
            return Ok(None);
        };
        Ok(self.check_operator_call(&node.operator, node.loc, &[argument]))
    }

    /// `x op= y`: `x op y` assigned back to `x`.
    pub(crate) fn check_compound_assignment(&mut self, node: &'a AssignmentExpression) -> CheckResult<Option<TypeId>> {
        let operator = node
            .operator
            .strip_suffix('=')
            .unwrap_or(&node.operator);
        let left = self.as_read(|this| this.check_expression(&node.left))?;
        let right = self.with_assignment_type(None, |this| this.check_expression(&node.right))?;
        let (Some(left), Some(right)) = (left, right) else {
            return Ok(None);
        };
        let Some(result) = self.check_operator_call(operator, node.loc, &[left, right]) else {
            return Ok(None);
        };

        let Some(target) = self.as_assignment_target(|this| this.check_expression(&node.left))? else {
            return Ok(None);
        };
        if !target.grows_freely() {
            self.check_subtype(node.loc, target, result);
        }
        Ok(Some(result))
    }

    /// Call the signature of `operator` with `operands`.
    ///
    /// Overloads are tried in order and the first that accepts the operands
    /// wins. A single signature reports its own argument errors; an
    /// overload set that rejects the operands reports one mismatch.
    fn check_operator_call(
        &mut self,
        operator: &str,
        loc: SourceLocation,
        operands: &[TypeId],
    ) -> Option<TypeId> {
        let Some(signature) = self.scopes.globals().get_operator(operator) else {
            debug!(operator, "operator has no signature");
            return Some(TypeId::ANY);
        };
        let overloads = self
            .types
            .intersection_members(signature)
            .unwrap_or_else(|| vec![signature]);

        if let [single] = overloads.as_slice() {
            let (result, errors) = self.try_operator_overload(*single, loc, operands);
            if errors.is_empty() {
                return result;
            }
            for diagnostic in errors {
                self.ctx.push_diagnostic(diagnostic);
            }
            return None;
        }

        for &overload in &overloads {
            let (result, errors) = self.try_operator_overload(overload, loc, operands);
            if errors.is_empty() {
                trace!(operator, overload = %self.format_type(overload), "operator overload selected");
                return result;
            }
        }

        let actual = operands
            .iter()
            .map(|&t| self.format_type(t))
            .collect::<Vec<_>>()
            .join(", ");
        self.error(
            DiagnosticKind::IntersectionOperatorCallMismatch,
            loc,
            [
                ("operator", operator.to_string()),
                ("actual", format!("({actual})")),
            ],
        );
        None
    }

    fn try_operator_overload(
        &self,
        overload: TypeId,
        loc: SourceLocation,
        operands: &[TypeId],
    ) -> (Option<TypeId>, Vec<Diagnostic>) {
        let Some(shape) = self.types.function_shape(overload) else {
            return (Some(TypeId::ANY), Vec::new());
        };
        if shape.params.len() != operands.len() {
            let diagnostic = self.diagnostic(
                DiagnosticKind::FunctionArgCountMismatch,
                loc,
                [
                    ("expected", self.format_type(overload)),
                    ("actual", operands.len().to_string()),
                ],
            );
            return (None, vec![diagnostic]);
        }
        let errors: Vec<Diagnostic> = shape
            .params
            .iter()
            .zip(operands)
            .filter_map(|(param, &operand)| self.check_subtype_raw(loc, param.type_id, operand))
            .collect();
        (Some(shape.result), errors)
    }
}
