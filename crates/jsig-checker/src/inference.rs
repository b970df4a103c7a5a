//! Types computed from expressions themselves rather than from a
//! declaration: literals, identifiers, array and object literals, and
//! functions typed by their first call site.

use crate::error_handler::{CheckResult, CheckerError};
use crate::state::CheckerState;
use jsig_ast::{
    ArrayExpression, CallExpression, Expression, Identifier, Literal, LiteralKind, ObjectExpression,
};
use jsig_binder::UntypedFunction;
use jsig_common::Atom;
use jsig_solver::{FunctionShape, ParamInfo, PropertyInfo, TypeId};
use tracing::{debug, trace};

impl<'a> CheckerState<'a> {
    // =========================================================================
    // Identifiers and literals
    // =========================================================================

    pub(crate) fn check_identifier(&mut self, id: &Identifier) -> Option<TypeId> {
        let name = self.atom(&id.name);
        if let Some(type_id) = self.lookup_var(name) {
            return Some(type_id);
        }
        if id.name == "undefined" {
            return Some(TypeId::UNDEFINED);
        }
        if self.scopes.get_function(self.current_scope, name).is_some() {
            // Reading a function that was never given a type.
            self.report_untyped_function(id.loc, &id.name);
            return None;
        }
        if self.ctx.unknown_identifiers.contains(&name) {
            trace!(name = %id.name, "identifier already reported");
            return None;
        }
        self.report_unknown_identifier(id.loc, &id.name);
        None
    }

    pub(crate) fn infer_literal(&self, lit: &Literal) -> TypeId {
        match lit.kind() {
            LiteralKind::String => TypeId::STRING,
            LiteralKind::Number => TypeId::NUMBER,
            LiteralKind::Boolean => TypeId::BOOLEAN,
            LiteralKind::Null => TypeId::NULL,
            LiteralKind::RegExp => TypeId::REGEXP,
        }
    }

    // =========================================================================
    // Array literals
    // =========================================================================

    /// Arrays are homogeneous: every element must fit the first element's
    /// type. `[]` takes its element type from context or stays open.
    pub(crate) fn infer_array_expression(&mut self, node: &'a ArrayExpression) -> CheckResult<Option<TypeId>> {
        let contextual_element = self
            .ctx
            .assignment_type
            .and_then(|ty| self.types.array_element(ty));

        let Some((first, rest)) = node.elements.split_first() else {
            return Ok(Some(match contextual_element {
                Some(_) => self.ctx.assignment_type.unwrap_or(TypeId::ARRAY),
                None => self.types.array(self.types.free("T")),
            }));
        };

        let Some(first_type) = self.with_assignment_type(contextual_element, |this| this.check_expression(first))?
        else {
            return Ok(None);
        };
        let element_type = contextual_element.unwrap_or(first_type);

        let mut homogeneous = true;
        for element in rest {
            let Some(actual) = self.with_assignment_type(contextual_element, |this| this.check_expression(element))?
            else {
                homogeneous = false;
                continue;
            };
            if !self.check_subtype(element.loc(), element_type, actual) {
                homogeneous = false;
            }
        }

        Ok(homogeneous.then(|| self.types.array(element_type)))
    }

    // =========================================================================
    // Object literals
    // =========================================================================

    pub(crate) fn infer_object_expression(&mut self, node: &'a ObjectExpression) -> CheckResult<Option<TypeId>> {
        if node.properties.is_empty() {
            return Ok(Some(TypeId::OPEN_OBJECT));
        }

        let contextual = self
            .ctx
            .assignment_type
            .and_then(|ty| self.types.object_shape(ty));

        let mut properties = Vec::with_capacity(node.properties.len());
        let mut complete = true;
        for prop in &node.properties {
            if prop.kind != "init" {
                return Err(CheckerError::UnsupportedPropertyKind(prop.kind.clone()));
            }
            let Some(key) = prop.key_name() else {
                return Err(CheckerError::UnsupportedPropertyKind("computed".to_string()));
            };
            let key = self.atom(key);
            let field_context = contextual
                .as_ref()
                .and_then(|shape| shape.find(key))
                .map(|p| p.type_id);

            match self.check_initializer(&prop.value, field_context)? {
                Some(type_id) => properties.push(PropertyInfo::new(key, type_id)),
                None => complete = false,
            }
        }

        Ok(complete.then(|| self.types.object(properties)))
    }

    // =========================================================================
    // Call-site inference
    // =========================================================================

    /// Type an untyped function from its call site, verify its body against
    /// that type and bind it.
    #[tracing::instrument(level = "debug", skip(self, node, untyped), fields(name = untyped.node.name()))]
    pub(crate) fn infer_call_expression(
        &mut self,
        node: &'a CallExpression,
        name: Atom,
        untyped: UntypedFunction<'a>,
    ) -> CheckResult<Option<TypeId>> {
        let func = untyped.node;

        let mut params = Vec::with_capacity(node.arguments.len());
        for (i, argument) in node.arguments.iter().enumerate() {
            let Some(arg_type) = self.with_assignment_type(None, |this| this.check_expression(argument))? else {
                debug!(index = i, "argument of inferred call has no type");
                return Ok(None);
            };
            let mut param = ParamInfo::unnamed(arg_type);
            param.name = func.params.get(i).map(|p| self.atom(&p.name));
            params.push(param);
        }

        let result = self
            .ctx
            .assignment_type
            .or_else(|| self.scopes.return_expression_type(self.current_scope))
            .unwrap_or(TypeId::UNKNOWN_RETURN);

        let shape = FunctionShape {
            params,
            result,
            this_arg: None,
            generics: Vec::new(),
            brand: self.atom("Object"),
        };
        let func_type = self.types.function(shape.clone());
        self.scopes.update_function(self.current_scope, name, func_type)?;
        self.in_scope(untyped.defined_in, |this| this.check_function_type(func, func_type, name))?;

        if func.params.len() != node.arguments.len() {
            // Arity was reported against the declaration.
            return Ok(None);
        }

        if result == TypeId::UNKNOWN_RETURN {
            let returned = self
                .scopes
                .known_function(untyped.defined_in, name)
                .and_then(|scope| self.scopes.get(scope))
                .and_then(|scope| scope.function_data())
                .and_then(|data| data.known_return_type)
                .unwrap_or(TypeId::VOID);
            let func_type = self.types.function(FunctionShape {
                result: returned,
                ..shape
            });
            self.scopes
                .force_update_var(untyped.defined_in, name, func_type)?;
            trace!(name = func.name(), return_type = %self.format_type(returned), "inferred return type");
            return Ok(Some(returned));
        }
        Ok(Some(result))
    }

    /// Name used for the object of a member expression in diagnostics.
    pub(crate) fn describe_object(&self, object: &Expression) -> String {
        match object {
            Expression::ThisExpression(_) => "this".to_string(),
            Expression::Identifier(id) => id.name.clone(),
            other => self.snippet(&other.loc()),
        }
    }
}
