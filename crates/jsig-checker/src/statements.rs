//! Statement checking.
//!
//! Statement lists are hoisted: function declarations are registered as
//! untyped entries first, then the remaining statements are verified in
//! source order, then the function declarations in source order. Calls
//! that run before a declaration is verified infer its type from the call
//! site.

use crate::error_handler::CheckResult;
use crate::state::CheckerState;
use jsig_ast::{Expression, Function, LiteralKind, ReturnStatement, Statement, VariableDeclaration};
use jsig_binder::LookupMode;
use jsig_solver::TypeId;
use tracing::trace;

impl<'a> CheckerState<'a> {
    /// Register the function declarations of `stmts` as untyped functions
    /// of the current scope.
    pub(crate) fn register_function_declarations(&mut self, stmts: &'a [Statement]) -> CheckResult<()> {
        for stmt in stmts {
            if let Statement::FunctionDeclaration(func) = stmt {
                let name = self.atom(func.name());
                self.scopes.add_function(self.current_scope, name, func)?;
            }
        }
        Ok(())
    }

    /// Verify a statement list with function declarations hoisted to the
    /// end. `register` is false when the caller already registered them.
    pub(crate) fn check_statement_list(&mut self, stmts: &'a [Statement], register: bool) -> CheckResult<()> {
        if register {
            self.register_function_declarations(stmts)?;
        }
        for stmt in stmts.iter().filter(|s| !s.is_function_declaration()) {
            self.check_statement(stmt)?;
        }
        for stmt in stmts.iter().filter(|s| s.is_function_declaration()) {
            self.check_statement(stmt)?;
        }
        Ok(())
    }

    pub(crate) fn check_function_declaration(&mut self, func: &'a Function) -> CheckResult<()> {
        let name = self.atom(func.name());
        let owner = self.declaring_scope();
        let already_checked = self
            .scopes
            .get(owner)
            .is_some_and(|scope| scope.function_scopes.contains_key(&name));
        if already_checked {
            trace!(name = func.name(), "function already verified through call-site inference");
            return Ok(());
        }

        match self.scopes.get_var(self.current_scope, name, LookupMode::Writable) {
            Some(declared) => self.check_function_type(func, declared, name),
            None => {
                self.report_untyped_function(func.loc, func.name());
                Ok(())
            }
        }
    }

    // =========================================================================
    // Variables
    // =========================================================================

    pub(crate) fn check_variable_declaration(&mut self, decl: &'a VariableDeclaration) -> CheckResult<()> {
        for declarator in &decl.declarations {
            let name = self.atom(&declarator.id.name);
            let scope = self.declaring_scope();
            let declared = if self.scopes.has_own_var(scope, name) {
                self.scopes.get_var(scope, name, LookupMode::Writable)
            } else {
                None
            };

            match (declared, &declarator.init) {
                (Some(declared), Some(init)) => {
                    let Some(actual) = self.check_initializer(init, Some(declared))? else {
                        continue;
                    };
                    if declared.grows_freely() {
                        self.scopes.force_update_var(scope, name, actual)?;
                    } else {
                        self.check_subtype(init.loc(), declared, actual);
                    }
                }
                (Some(_), None) => {}
                (None, None) => {
                    self.scopes.add_var(scope, name, TypeId::UNINITIALIZED)?;
                }
                (None, Some(init)) => {
                    if is_null_literal(init) {
                        self.scopes.add_var(scope, name, TypeId::NULL_DEFAULT)?;
                        continue;
                    }
                    match self.check_initializer(init, None)? {
                        Some(actual) => self.scopes.add_var(scope, name, actual)?,
                        None => {
                            self.ctx.unknown_identifiers.insert(name);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Type of a value flowing into a slot of type `expected`.
    ///
    /// An untyped function named here takes `expected` as its type instead
    /// of being inferred.
    pub(crate) fn check_initializer(
        &mut self,
        init: &'a Expression,
        expected: Option<TypeId>,
    ) -> CheckResult<Option<TypeId>> {
        if let Some(expected) = expected
            && let Some(bound) = self.bind_untyped_function_reference(init, expected)?
        {
            return Ok(Some(bound));
        }
        self.with_assignment_type(expected, |this| this.check_expression(init))
    }

    /// `x = someFunction` where `someFunction` is still untyped: give it the
    /// slot's function type.
    pub(crate) fn bind_untyped_function_reference(
        &mut self,
        expr: &'a Expression,
        expected: TypeId,
    ) -> CheckResult<Option<TypeId>> {
        let Expression::Identifier(id) = expr else {
            return Ok(None);
        };
        if !self.types.is_function(expected) {
            return Ok(None);
        }
        let name = self.atom(&id.name);
        if self.lookup_var(name).is_some() || self.scopes.get_function(self.current_scope, name).is_none() {
            return Ok(None);
        }
        trace!(name = %id.name, type_id = expected.0, "binding untyped function to slot type");
        self.scopes.update_function(self.current_scope, name, expected)?;
        Ok(Some(expected))
    }

    // =========================================================================
    // Return
    // =========================================================================

    pub(crate) fn check_return_statement(&mut self, node: &'a ReturnStatement) -> CheckResult<()> {
        let Some(declared) = self.scopes.function_data(self.current_scope).map(|d| d.return_type) else {
            if let Some(argument) = &node.argument {
                self.check_expression(argument)?;
            }
            return Ok(());
        };

        self.scopes
            .enter_return_statement(self.current_scope, declared)?;
        let actual = match &node.argument {
            Some(argument) => self.with_assignment_type(None, |this| this.check_expression(argument)),
            None => Ok(Some(TypeId::VOID)),
        };
        self.scopes.exit_return_statement(self.current_scope)?;

        // An argument that failed to type was already reported.
        let actual = actual?.unwrap_or(TypeId::ANY);
        self.scopes
            .mark_return_type(self.current_scope, actual, node.loc)?;
        Ok(())
    }
}

fn is_null_literal(expr: &Expression) -> bool {
    matches!(expr, Expression::Literal(lit) if lit.kind() == LiteralKind::Null)
}
