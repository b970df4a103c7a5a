//! Node-kind dispatch.
//!
//! Statement and expression kinds are closed enums, so each visit is one
//! exhaustive `match` and adding a node kind is a compile error until every
//! dispatcher handles it.
//!
//! An expression visit yields `Ok(None)` when no type could be determined.
//! That only happens after a diagnostic was recorded (or for a node that
//! is intentionally untyped), and callers skip checks that need the type.

use crate::error_handler::CheckResult;
use crate::state::CheckerState;
use jsig_ast::{Expression, Statement};
use jsig_solver::TypeId;

/// Dispatcher for expression type computation.
pub struct ExpressionDispatcher<'s, 'a> {
    pub checker: &'s mut CheckerState<'a>,
}

impl<'s, 'a> ExpressionDispatcher<'s, 'a> {
    pub fn new(checker: &'s mut CheckerState<'a>) -> Self {
        Self { checker }
    }

    pub fn dispatch(&mut self, expr: &'a Expression) -> CheckResult<Option<TypeId>> {
        let checker = &mut *self.checker;
        match expr {
            Expression::Identifier(id) => Ok(checker.check_identifier(id)),
            Expression::Literal(lit) => Ok(Some(checker.infer_literal(lit))),
            Expression::ThisExpression(node) => Ok(checker.check_this_expression(node.loc)),
            Expression::ArrayExpression(node) => checker.infer_array_expression(node),
            Expression::ObjectExpression(node) => checker.infer_object_expression(node),
            Expression::FunctionExpression(func) => checker.check_function_expression(func),
            Expression::AssignmentExpression(node) => checker.check_assignment_expression(node),
            Expression::MemberExpression(node) => checker.check_member_expression(node),
            Expression::CallExpression(node) => checker.check_call_expression(node),
            Expression::NewExpression(node) => checker.check_new_expression(node),
            Expression::BinaryExpression(node) => checker.check_binary_expression(node),
            Expression::LogicalExpression(node) => checker.check_logical_expression(node),
            Expression::UnaryExpression(node) => checker.check_unary_expression(node),
            Expression::UpdateExpression(node) => checker.check_update_expression(node),
            Expression::ConditionalExpression(node) => checker.check_conditional_expression(node),
        }
    }
}

impl<'a> CheckerState<'a> {
    /// Compute the type of an expression.
    pub fn check_expression(&mut self, expr: &'a Expression) -> CheckResult<Option<TypeId>> {
        ExpressionDispatcher::new(self).dispatch(expr)
    }

    /// Verify a statement.
    pub fn check_statement(&mut self, stmt: &'a Statement) -> CheckResult<()> {
        match stmt {
            Statement::VariableDeclaration(decl) => self.check_variable_declaration(decl),
            Statement::FunctionDeclaration(func) => self.check_function_declaration(func),
            Statement::ExpressionStatement(node) => {
                self.check_expression(&node.expression)?;
                Ok(())
            }
            Statement::BlockStatement(block) => self.check_statement_list(&block.body, true),
            Statement::IfStatement(node) => self.check_if_statement(node),
            Statement::WhileStatement(node) => self.check_while_statement(node),
            Statement::ForStatement(node) => self.check_for_statement(node),
            Statement::ReturnStatement(node) => self.check_return_statement(node),
            Statement::ThrowStatement(node) => {
                self.check_expression(&node.argument)?;
                Ok(())
            }
            Statement::EmptyStatement(_) => Ok(()),
        }
    }
}
