//! Branching statements and type narrowing.
//!
//! Each arm of a branch runs in its own branch scope. A condition narrows
//! identifiers by recording restrictions in the arm scopes:
//! - `x` keeps the non-nullish members in the taken arm and the members
//!   that can be falsy in the other
//! - `!test` swaps the arms
//! - `typeof x === 'tag'` and `x === null` / `x === undefined` (and the
//!   negated forms) filter by tag or value
//! - `a && b` narrows both into the taken arm, `a || b` both into the other
//!
//! After an `if`, a restriction both arms agree on moves to the enclosing
//! scope.

use crate::error_handler::CheckResult;
use crate::state::CheckerState;
use jsig_ast::{
    BinaryExpression, ConditionalExpression, Expression, ForInit, ForStatement, IfStatement,
    LiteralKind, LogicalExpression, WhileStatement,
};
use jsig_binder::{LookupMode, ScopeId};
use jsig_common::{Atom, well_known};
use jsig_solver::{TypeId, TypeInterner};
use jsig_solver::narrowing::{falsy_part, narrow_by_typeof, narrow_by_value, remove_nullish};
use tracing::trace;

impl<'a> CheckerState<'a> {
    // =========================================================================
    // Statements
    // =========================================================================

    pub(crate) fn check_if_statement(&mut self, node: &'a IfStatement) -> CheckResult<()> {
        self.check_condition(&node.test)?;
        let if_branch = self.scopes.push_branch(self.current_scope);
        let else_branch = self.scopes.push_branch(self.current_scope);
        self.narrow_condition(&node.test, if_branch, else_branch)?;

        self.in_scope(if_branch, |this| this.check_statement(&node.consequent))?;
        if let Some(alternate) = &node.alternate {
            self.in_scope(else_branch, |this| this.check_statement(alternate))?;
        }
        self.merge_branches(if_branch, else_branch)
    }

    pub(crate) fn check_while_statement(&mut self, node: &'a WhileStatement) -> CheckResult<()> {
        self.check_condition(&node.test)?;
        let body = self.scopes.push_branch(self.current_scope);
        let exit = self.scopes.push_branch(self.current_scope);
        self.narrow_condition(&node.test, body, exit)?;
        self.in_scope(body, |this| this.check_statement(&node.body))
    }

    pub(crate) fn check_for_statement(&mut self, node: &'a ForStatement) -> CheckResult<()> {
        match &node.init {
            Some(ForInit::Declaration(decl)) => self.check_variable_declaration(decl)?,
            Some(ForInit::Expression(expr)) => {
                self.check_condition(expr)?;
            }
            None => {}
        }

        let body = self.scopes.push_branch(self.current_scope);
        let exit = self.scopes.push_branch(self.current_scope);
        if let Some(test) = &node.test {
            self.check_condition(test)?;
            self.narrow_condition(test, body, exit)?;
        }
        self.in_scope(body, |this| {
            this.check_statement(&node.body)?;
            if let Some(update) = &node.update {
                this.check_condition(update)?;
            }
            Ok(())
        })
    }

    /// Verify an expression whose value only steers control flow.
    fn check_condition(&mut self, test: &'a Expression) -> CheckResult<Option<TypeId>> {
        self.with_assignment_type(None, |this| this.check_expression(test))
    }

    /// Move restrictions both arms agree on into the current scope.
    fn merge_branches(&mut self, if_branch: ScopeId, else_branch: ScopeId) -> CheckResult<()> {
        let else_restrictions = self.scopes.restrictions(else_branch);
        let agreed: Vec<(Atom, TypeId)> = self
            .scopes
            .restrictions(if_branch)
            .iter()
            .filter(|&(name, ty)| *name != well_known::THIS && else_restrictions.get(name) == Some(ty))
            .map(|(&name, &ty)| (name, ty))
            .collect();

        let settled = !self.in_branch();
        for (name, ty) in agreed {
            if self.lookup_var(name) == Some(ty) {
                continue;
            }
            // File and function scopes take one restriction per name.
            if settled && self.scopes.restrictions(self.current_scope).contains_key(&name) {
                trace!(name = %self.atom_text(name), "restriction already settled");
                continue;
            }
            trace!(name = %self.atom_text(name), merged = %self.format_type(ty), "branch restriction merged");
            self.scopes.restrict_type(self.current_scope, name, ty)?;
        }
        Ok(())
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub(crate) fn check_logical_expression(&mut self, node: &'a LogicalExpression) -> CheckResult<Option<TypeId>> {
        let Some(left) = self.check_condition(&node.left)? else {
            return Ok(None);
        };

        let taken = self.scopes.push_branch(self.current_scope);
        let skipped = self.scopes.push_branch(self.current_scope);
        match node.operator.as_str() {
            "||" => self.narrow_condition(&node.left, skipped, taken)?,
            _ => self.narrow_condition(&node.left, taken, skipped)?,
        }

        let Some(right) = self.in_scope(taken, |this| this.check_expression(&node.right))? else {
            return Ok(None);
        };

        Ok(Some(match node.operator.as_str() {
            "||" => {
                let left = remove_nullish(self.types, left).unwrap_or(left);
                self.types.union2(left, right)
            }
            _ => right,
        }))
    }

    pub(crate) fn check_conditional_expression(
        &mut self,
        node: &'a ConditionalExpression,
    ) -> CheckResult<Option<TypeId>> {
        self.check_condition(&node.test)?;
        let if_branch = self.scopes.push_branch(self.current_scope);
        let else_branch = self.scopes.push_branch(self.current_scope);
        self.narrow_condition(&node.test, if_branch, else_branch)?;

        let consequent = self.in_scope(if_branch, |this| this.check_expression(&node.consequent))?;
        let alternate = self.in_scope(else_branch, |this| this.check_expression(&node.alternate))?;
        Ok(match (consequent, alternate) {
            (Some(consequent), Some(alternate)) => Some(self.types.union2(consequent, alternate)),
            _ => None,
        })
    }

    // =========================================================================
    // Narrowing
    // =========================================================================

    /// Record what `test` implies in the scope where it holds (`truthy`)
    /// and the scope where it does not (`falsy`).
    fn narrow_condition(&mut self, test: &Expression, truthy: ScopeId, falsy: ScopeId) -> CheckResult<()> {
        match test {
            Expression::Identifier(id) => {
                let name = self.atom(&id.name);
                self.narrow_in(truthy, name, remove_nullish)?;
                self.narrow_in(falsy, name, falsy_part)?;
            }
            Expression::UnaryExpression(unary) if unary.operator == "!" => {
                self.narrow_condition(&unary.argument, falsy, truthy)?;
            }
            Expression::BinaryExpression(binary) => self.narrow_comparison(binary, truthy, falsy)?,
            Expression::LogicalExpression(logical) => {
                let scratch = self.scopes.push_branch(self.current_scope);
                match logical.operator.as_str() {
                    "&&" => {
                        self.narrow_condition(&logical.left, truthy, scratch)?;
                        self.narrow_condition(&logical.right, truthy, scratch)?;
                    }
                    "||" => {
                        self.narrow_condition(&logical.left, scratch, falsy)?;
                        self.narrow_condition(&logical.right, scratch, falsy)?;
                    }
                    _ => {}
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn narrow_comparison(&mut self, node: &BinaryExpression, truthy: ScopeId, falsy: ScopeId) -> CheckResult<()> {
        let positive = match node.operator.as_str() {
            "===" | "==" => true,
            "!==" | "!=" => false,
            _ => return Ok(()),
        };

        if let Some((name, tag)) = typeof_guard(node) {
            let name = self.atom(name);
            let tag = tag.to_string();
            self.narrow_in(truthy, name, |types, ty| narrow_by_typeof(types, ty, &tag, positive))?;
            self.narrow_in(falsy, name, |types, ty| narrow_by_typeof(types, ty, &tag, !positive))?;
            return Ok(());
        }

        if let Some((name, value)) = value_guard(node) {
            let name = self.atom(name);
            self.narrow_in(truthy, name, |types, ty| narrow_by_value(types, ty, value, positive))?;
            self.narrow_in(falsy, name, |types, ty| narrow_by_value(types, ty, value, !positive))?;
        }
        Ok(())
    }

    /// Restrict `name` in `scope` to `narrow` of its type as seen there.
    fn narrow_in(
        &mut self,
        scope: ScopeId,
        name: Atom,
        narrow: impl FnOnce(&TypeInterner, TypeId) -> Option<TypeId>,
    ) -> CheckResult<()> {
        let Some(current) = self.scopes.get_var(scope, name, LookupMode::Normal) else {
            return Ok(());
        };
        if let Some(narrowed) = narrow(self.types, current) {
            trace!(name = %self.atom_text(name), narrowed = %self.format_type(narrowed), "restricted");
            self.scopes.restrict_type(scope, name, narrowed)?;
        }
        Ok(())
    }
}

/// `typeof x === 'tag'` in either operand order.
fn typeof_guard(node: &BinaryExpression) -> Option<(&str, &str)> {
    typeof_operand(&node.left)
        .zip(string_literal(&node.right))
        .or_else(|| typeof_operand(&node.right).zip(string_literal(&node.left)))
}

fn typeof_operand(expr: &Expression) -> Option<&str> {
    match expr {
        Expression::UnaryExpression(unary) if unary.operator == "typeof" => {
            unary.argument.as_identifier().map(|id| id.name.as_str())
        }
        _ => None,
    }
}

fn string_literal(expr: &Expression) -> Option<&str> {
    match expr {
        Expression::Literal(lit) => lit.as_str(),
        _ => None,
    }
}

/// `x === null` or `x === undefined` in either operand order.
fn value_guard(node: &BinaryExpression) -> Option<(&str, TypeId)> {
    guarded_identifier(&node.left)
        .zip(nullish_value(&node.right))
        .or_else(|| guarded_identifier(&node.right).zip(nullish_value(&node.left)))
}

fn guarded_identifier(expr: &Expression) -> Option<&str> {
    match expr {
        Expression::Identifier(id) if id.name != "undefined" => Some(id.name.as_str()),
        _ => None,
    }
}

fn nullish_value(expr: &Expression) -> Option<TypeId> {
    match expr {
        Expression::Literal(lit) if lit.kind() == LiteralKind::Null => Some(TypeId::NULL),
        Expression::Identifier(id) if id.name == "undefined" => Some(TypeId::UNDEFINED),
        _ => None,
    }
}
