//! Function bodies checked against their declared type.

use crate::error_handler::CheckResult;
use crate::state::CheckerState;
use jsig_ast::Function;
use jsig_binder::FunctionScopeData;
use jsig_common::{Atom, DiagnosticKind, SourceLocation};
use jsig_solver::TypeId;
use tracing::trace;

impl<'a> CheckerState<'a> {
    /// Verify `func` against the function type `declared`.
    ///
    /// `key` names the function scope among its siblings; declarations use
    /// their name, expressions a name qualified by position.
    #[tracing::instrument(level = "debug", skip(self, func), fields(name = func.name()))]
    pub(crate) fn check_function_type(&mut self, func: &'a Function, declared: TypeId, key: Atom) -> CheckResult<()> {
        let Some(shape) = self.types.function_shape(declared) else {
            self.error(
                DiagnosticKind::TypeClassMismatch,
                func.loc,
                [
                    ("expected", self.format_type(declared)),
                    ("actual", "Function".to_string()),
                ],
            );
            return Ok(());
        };

        let mut data = FunctionScopeData::new(key, func.name(), declared);
        data.this_type = shape.this_arg;
        data.return_type = shape.result;
        let scope = self.scopes.push_function(self.current_scope, data)?;

        if func.params.len() != shape.params.len() {
            self.report_function_arity(func.loc, func.name(), shape.params.len(), func.params.len());
            return Ok(());
        }

        for (param, info) in func.params.iter().zip(&shape.params) {
            // `b?: T` reads as `T | undefined` inside the body.
            let param_type = if info.optional {
                self.types.union2(info.type_id, TypeId::UNDEFINED)
            } else {
                info.type_id
            };
            let name = self.atom(&param.name);
            self.scopes.add_var(scope, name, param_type)?;
        }

        self.in_scope(scope, |this| this.check_statement_list(&func.body.body, true))?;

        let Some(data) = self.scopes.get(scope).and_then(|s| s.function_data()).cloned() else {
            return Ok(());
        };
        if data.is_constructor {
            self.check_hidden_class(func, &data);
            self.check_constructor_return(func, &data);
        } else {
            self.check_return_type(func, &data);
        }
        Ok(())
    }

    /// A function expression takes its type from the context it appears
    /// in: an assignment target, a declared variable, a call parameter or
    /// the enclosing function's return type.
    pub(crate) fn check_function_expression(&mut self, func: &'a Function) -> CheckResult<Option<TypeId>> {
        let contextual = self
            .ctx
            .assignment_type
            .or_else(|| self.scopes.return_expression_type(self.current_scope))
            .filter(|&ty| self.types.is_function(ty));
        let Some(declared) = contextual else {
            self.report_untyped_function(func.loc, func.name());
            return Ok(None);
        };

        let key = self.atom(&format!(
            "{}@{}:{}",
            func.name(),
            func.loc.start.line,
            func.loc.start.column
        ));
        let owner = self.declaring_scope();
        let seen = self
            .scopes
            .get(owner)
            .is_some_and(|scope| scope.function_scopes.contains_key(&key));
        if !seen {
            self.check_function_type(func, declared, key)?;
        }
        Ok(Some(declared))
    }

    pub(crate) fn check_this_expression(&mut self, loc: SourceLocation) -> Option<TypeId> {
        let Some(func_name) = self.scopes.function_data(self.current_scope).map(|d| d.name) else {
            self.error(
                DiagnosticKind::ThisOutsideFunction,
                loc,
                std::iter::empty::<(&str, &str)>(),
            );
            return None;
        };
        if let Some(this_type) = self.scopes.this_type(self.current_scope) {
            return Some(this_type);
        }
        // Function expressions are keyed `name@line:column`.
        let key = self.atom_text(func_name);
        let name = key.split('@').next().unwrap_or_default();
        self.error(DiagnosticKind::MissingThisType, loc, [("funcName", name)]);
        None
    }

    /// Fields of the declared `this` object must be assigned in declaration
    /// order. Prototype fields of the same constructor are exempt. Only the
    /// first out-of-order field is reported.
    fn check_hidden_class(&mut self, func: &Function, data: &FunctionScopeData) {
        let Some(this_shape) = data.this_type.and_then(|t| self.types.object_shape(t)) else {
            return;
        };
        let constructor = self.atom(func.name());
        let prototype_fields = self
            .scopes
            .prototype_fields(self.current_scope, constructor)
            .cloned()
            .unwrap_or_default();

        for (i, prop) in this_shape.properties.iter().enumerate() {
            let known = data.known_fields.get(i).copied();
            if known == Some(prop.name) || prototype_fields.contains_key(&prop.name) {
                continue;
            }
            let other_field = known
                .map(|f| self.atom_text(f).to_string())
                .unwrap_or_else(|| "no-field".to_string());
            trace!(field = %self.atom_text(prop.name), other = %other_field, "hidden class mismatch");
            self.error(
                DiagnosticKind::MissingFieldInConstructor,
                func.loc,
                [
                    ("fieldName", self.atom_text(prop.name).to_string()),
                    ("otherField", other_field),
                ],
            );
            return;
        }
    }

    fn check_constructor_return(&mut self, func: &Function, data: &FunctionScopeData) {
        let Some(returned) = data.known_return_type else {
            return;
        };
        let loc = data.return_statement_loc.unwrap_or(func.loc);
        if returned == TypeId::VOID {
            self.error(
                DiagnosticKind::ReturnStatementInConstructor,
                loc,
                [("funcName", func.name())],
            );
        } else {
            self.error(
                DiagnosticKind::NonVoidReturnInConstructor,
                loc,
                [
                    ("funcName", func.name().to_string()),
                    ("returnType", self.format_type(returned)),
                ],
            );
        }
    }

    /// Only the last return statement verified is compared.
    fn check_return_type(&mut self, func: &Function, data: &FunctionScopeData) {
        let declared = data.return_type;
        if declared == TypeId::UNKNOWN_RETURN {
            return;
        }
        match data.known_return_type {
            Some(actual) => {
                let loc = data.return_statement_loc.unwrap_or(func.loc);
                self.check_subtype(loc, declared, actual);
            }
            None if declared != TypeId::VOID
                && declared != TypeId::UNDEFINED
                && !declared.is_any_like() =>
            {
                self.error(
                    DiagnosticKind::MissingReturnStatement,
                    func.loc,
                    [
                        ("funcName", func.name().to_string()),
                        ("expected", self.format_type(declared)),
                    ],
                );
            }
            None => {}
        }
    }
}
