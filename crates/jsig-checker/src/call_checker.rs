//! Call and `new` expressions, and `require`.
//!
//! A call is verified in this order:
//! 1. resolve the callee (and, for `obj.method(...)`, the receiver once)
//! 2. verify the arguments that are not function expressions
//! 3. check arity
//! 4. solve generics against those argument types and the receiver
//! 5. check each argument against its parameter; function expression
//!    arguments are verified here with the parameter type as their
//!    contextual type
//! 6. check the receiver against the declared `this`

use crate::error_handler::CheckResult;
use crate::program::RequireOutcome;
use crate::state::CheckerState;
use jsig_ast::{CallExpression, Expression};
use jsig_binder::{LookupMode, is_constructor_name};
use jsig_common::{DiagnosticKind, well_known};
use jsig_solver::instantiate::contains_free;
use jsig_solver::{FunctionShape, TypeId};
use tracing::{debug, trace};

impl<'a> CheckerState<'a> {
    #[tracing::instrument(level = "debug", skip(self, node), fields(line = node.loc.line()))]
    pub(crate) fn check_call_expression(&mut self, node: &'a CallExpression) -> CheckResult<Option<TypeId>> {
        if let Expression::Identifier(callee) = node.callee.as_ref() {
            let name = self.atom(&callee.name);
            if self.lookup_var(name).is_none() {
                if name == well_known::REQUIRE {
                    return self.check_require(node);
                }
                if let Some(untyped) = self.scopes.get_function(self.current_scope, name) {
                    return self.infer_call_expression(node, name, untyped);
                }
            }
        }

        let (callee_type, receiver) = match node.callee.as_ref() {
            Expression::MemberExpression(member) => {
                let Some(object_type) = self.as_read(|this| this.check_expression(&member.object))? else {
                    return Ok(None);
                };
                let Some(method) = self.member_type(member, object_type)? else {
                    return Ok(None);
                };
                (method, Some(object_type))
            }
            callee => {
                let Some(callee_type) = self.with_assignment_type(None, |this| this.check_expression(callee))? else {
                    return Ok(None);
                };
                (callee_type, None)
            }
        };

        if callee_type == TypeId::ANY {
            for argument in &node.arguments {
                self.with_assignment_type(None, |this| this.check_expression(argument))?;
            }
            return Ok(Some(TypeId::ANY));
        }

        let Some(shape) = self.types.function_shape(callee_type) else {
            self.report_calling_non_function(&node.callee, callee_type);
            return Ok(None);
        };

        if let Expression::Identifier(callee) = node.callee.as_ref()
            && is_constructor_name(&callee.name)
            && self.is_constructor_shape(&shape)
        {
            self.error(
                DiagnosticKind::CallingConstructorWithoutNew,
                node.loc,
                [("funcName", callee.name.as_str())],
            );
            return Ok(None);
        }

        let arg_types = self.verify_plain_arguments(node, &shape)?;
        let func_name = self.snippet(&node.callee.loc());
        if !self.check_call_arity(node, &shape, &func_name) {
            return Ok(None);
        }

        let shape = if shape.generics.is_empty() {
            shape
        } else {
            let Some(resolved) = self.resolve_generics(node, callee_type, &shape, receiver, &arg_types)? else {
                return Ok(None);
            };
            match self.types.function_shape(resolved) {
                Some(resolved) => resolved,
                None => return Ok(None),
            }
        };

        self.check_call_arguments(node, &shape, &arg_types)?;

        if let (Expression::MemberExpression(member), Some(receiver), Some(this_arg)) =
            (node.callee.as_ref(), receiver, shape.this_arg)
        {
            self.check_subtype(member.object.loc(), this_arg, receiver);
            self.refine_free_receiver(&member.object, receiver, this_arg)?;
        }

        Ok(Some(shape.result))
    }

    /// `new Foo(...)`.
    pub(crate) fn check_new_expression(&mut self, node: &'a CallExpression) -> CheckResult<Option<TypeId>> {
        let Some(callee_type) = self.with_assignment_type(None, |this| this.check_expression(&node.callee))? else {
            return Ok(None);
        };
        let func_name = self.snippet(&node.callee.loc());

        let Some(shape) = self.types.function_shape(callee_type) else {
            self.report_calling_non_function(&node.callee, callee_type);
            return Ok(None);
        };

        let this_object = shape
            .this_arg
            .filter(|&t| self.types.object_shape(t).is_some_and(|s| !s.properties.is_empty()));
        let Some(this_object) = this_object else {
            let this_type = shape
                .this_arg
                .map(|t| self.format_type(t))
                .unwrap_or_else(|| "void".to_string());
            self.error(
                DiagnosticKind::ConstructorThisTypeMustBeObject,
                node.loc,
                [("funcName", func_name), ("thisType", this_type)],
            );
            return Ok(None);
        };
        if shape.result != TypeId::VOID {
            self.error(
                DiagnosticKind::ConstructorMustReturnVoid,
                node.loc,
                [
                    ("funcName", func_name),
                    ("returnType", self.format_type(shape.result)),
                ],
            );
            return Ok(None);
        }
        let simple_name = match node.callee.as_ref() {
            Expression::Identifier(id) => Some(id.name.as_str()),
            Expression::MemberExpression(member) => member.property_name(),
            _ => None,
        };
        if simple_name.is_some_and(|name| !is_constructor_name(name)) {
            self.error(
                DiagnosticKind::ConstructorMustBePascalCase,
                node.loc,
                [("funcName", func_name)],
            );
            return Ok(None);
        }

        let arg_types = self.verify_plain_arguments(node, &shape)?;
        if !self.check_call_arity(node, &shape, &func_name) {
            return Ok(None);
        }
        self.check_call_arguments(node, &shape, &arg_types)?;

        let brand = self.atom_text(shape.brand);
        let instance = if brand.as_ref() == "Object" {
            this_object
        } else {
            self.types.with_brand(this_object, &brand)
        };
        Ok(Some(instance))
    }

    // =========================================================================
    // Arguments
    // =========================================================================

    /// Verify every argument that is not a function expression. Function
    /// expressions need their parameter type, which may depend on generics
    /// solved from the other arguments.
    fn verify_plain_arguments(
        &mut self,
        node: &'a CallExpression,
        shape: &FunctionShape,
    ) -> CheckResult<Vec<Option<TypeId>>> {
        let mut arg_types = Vec::with_capacity(node.arguments.len());
        for (i, argument) in node.arguments.iter().enumerate() {
            if matches!(argument, Expression::FunctionExpression(_)) {
                arg_types.push(None);
                continue;
            }
            let context = shape
                .params
                .get(i)
                .map(|p| p.type_id)
                .filter(|&t| !contains_free(self.types, t));
            arg_types.push(self.check_initializer(argument, context)?);
        }
        Ok(arg_types)
    }

    /// `false` after reporting a wrong argument count.
    fn check_call_arity(&mut self, node: &CallExpression, shape: &FunctionShape, func_name: &str) -> bool {
        let actual = node.arguments.len();
        let max = shape.params.len();
        let min = shape.required_params();
        if actual > max {
            self.report_call_arity(DiagnosticKind::TooManyArgsInCall, node.loc, func_name, max, actual);
            return false;
        }
        if actual < min {
            self.report_call_arity(DiagnosticKind::TooFewArgsInCall, node.loc, func_name, min, actual);
            return false;
        }
        true
    }

    fn check_call_arguments(
        &mut self,
        node: &'a CallExpression,
        shape: &FunctionShape,
        arg_types: &[Option<TypeId>],
    ) -> CheckResult<()> {
        for ((argument, param), verified) in node.arguments.iter().zip(&shape.params).zip(arg_types) {
            let actual = match (verified, argument) {
                (Some(actual), _) => Some(*actual),
                (None, Expression::FunctionExpression(_)) => self.check_initializer(argument, Some(param.type_id))?,
                (None, _) => None,
            };
            let Some(actual) = actual else {
                continue;
            };
            // An optional parameter also takes `undefined`.
            if param.optional
                && !self.is_subtype(param.type_id, actual)
                && self.is_subtype(self.types.union2(param.type_id, TypeId::UNDEFINED), actual)
            {
                continue;
            }
            self.check_subtype(argument.loc(), param.type_id, actual);
        }
        Ok(())
    }

    /// `var a = []; a.push(1)`: once the call pins the element type, the
    /// receiver keeps it.
    fn refine_free_receiver(&mut self, object: &Expression, receiver: TypeId, this_arg: TypeId) -> CheckResult<()> {
        let Expression::Identifier(id) = object else {
            return Ok(());
        };
        if !contains_free(self.types, receiver) || contains_free(self.types, this_arg) {
            return Ok(());
        }
        let name = self.atom(&id.name);
        if self
            .scopes
            .get_var(self.current_scope, name, LookupMode::Writable)
            .is_some()
        {
            trace!(name = %id.name, refined = %self.format_type(this_arg), "receiver type refined");
            self.scopes
                .force_update_var(self.current_scope, name, this_arg)?;
        }
        Ok(())
    }

    fn is_constructor_shape(&self, shape: &FunctionShape) -> bool {
        shape.result == TypeId::VOID
            && shape
                .this_arg
                .is_some_and(|this_arg| self.types.is_object(this_arg))
    }

    fn report_calling_non_function(&mut self, callee: &Expression, actual: TypeId) {
        self.error(
            DiagnosticKind::CallingNonFunction,
            callee.loc(),
            [
                ("objName", self.snippet(&callee.loc())),
                ("actual", self.format_type(actual)),
            ],
        );
    }

    // =========================================================================
    // require
    // =========================================================================

    fn check_require(&mut self, node: &'a CallExpression) -> CheckResult<Option<TypeId>> {
        let request = match node.arguments.as_slice() {
            [Expression::Literal(lit)] => lit.as_str(),
            _ => None,
        };
        let Some(request) = request else {
            self.error(
                DiagnosticKind::UnknownModuleRequire,
                node.loc,
                [("moduleName", self.snippet(&node.loc))],
            );
            return Ok(None);
        };

        match self.program.require(&self.ctx.file_name, request)? {
            RequireOutcome::Resolved { path, exports } => {
                debug!(request, path = %path, "module required");
                if !self.ctx.dependencies.contains(&path) {
                    self.ctx.dependencies.push(path);
                }
                Ok(Some(exports))
            }
            RequireOutcome::Cyclic => {
                self.error(
                    DiagnosticKind::CyclicModuleImport,
                    node.loc,
                    [("moduleName", request)],
                );
                Ok(None)
            }
            RequireOutcome::NotFound => {
                self.error(
                    DiagnosticKind::UnknownModuleRequire,
                    node.loc,
                    [("moduleName", request)],
                );
                Ok(None)
            }
        }
    }
}
