//! Assignment expressions.
//!
//! The left side is resolved as an assignment target: identifiers use their
//! declared (unnarrowed) type and a missing field of an open object
//! resolves to the open-field sentinel. A few left-hand types change what
//! the assignment does:
//! - `%Any%%ModuleExports` records the module's export type
//! - `%Void%%Uninitialized` / `%Null%%Default` take the right-hand type
//! - `%Mixed%%OpenField` adds the field to the open object
//!
//! Everything else is a subtype check of the right side against the left.

use crate::error_handler::CheckResult;
use crate::state::CheckerState;
use jsig_ast::{AssignmentExpression, Expression, MemberExpression};
use jsig_binder::LookupMode;
use jsig_solver::TypeId;
use tracing::{debug, trace};

impl<'a> CheckerState<'a> {
    pub(crate) fn check_assignment_expression(
        &mut self,
        node: &'a AssignmentExpression,
    ) -> CheckResult<Option<TypeId>> {
        if node.operator != "=" {
            return self.check_compound_assignment(node);
        }

        let Some(left_type) = self.as_assignment_target(|this| this.check_expression(&node.left))? else {
            return Ok(None);
        };

        if left_type == TypeId::MODULE_EXPORTS {
            let exported = self.check_initializer(&node.right, None)?;
            if let Some(exported) = exported {
                debug!(export = %self.format_type(exported), "module export assigned");
                self.ctx.module_exports_type = Some(exported);
            }
            return Ok(exported);
        }

        match node.left.as_ref() {
            Expression::Identifier(id) if left_type.grows_freely() => {
                let Some(right) = self.check_initializer(&node.right, None)? else {
                    return Ok(None);
                };
                let name = self.atom(&id.name);
                self.scopes.force_update_var(self.current_scope, name, right)?;
                return Ok(Some(right));
            }
            Expression::MemberExpression(member) if left_type == TypeId::OPEN_FIELD => {
                let Some(right) = self.check_initializer(&node.right, None)? else {
                    return Ok(None);
                };
                self.widen_open_object(member, right)?;
                return Ok(Some(right));
            }
            _ => {}
        }

        let expected = self.prototype_method_type(&node.left, left_type, &node.right);
        let Some(right) = self.check_initializer(&node.right, Some(expected))? else {
            return Ok(None);
        };
        self.check_subtype(node.right.loc(), expected, right);

        match node.left.as_ref() {
            Expression::Identifier(id) if self.in_branch() => {
                // The assigned type holds for the rest of the branch.
                let name = self.atom(&id.name);
                self.scopes.restrict_type(self.current_scope, name, right)?;
            }
            Expression::MemberExpression(member) => self.record_member_assignment(member, right)?,
            _ => {}
        }
        Ok(Some(right))
    }

    /// `obj.field = value` where `obj` is open and lacks `field`: rebind
    /// `obj` to a copy with the field added.
    fn widen_open_object(&mut self, member: &MemberExpression, value: TypeId) -> CheckResult<()> {
        let (Expression::Identifier(object), Some(field)) = (member.object.as_ref(), member.property_name())
        else {
            trace!("open field on a non-identifier receiver");
            return Ok(());
        };
        let name = self.atom(&object.name);
        let Some(current) = self
            .scopes
            .get_var(self.current_scope, name, LookupMode::Writable)
        else {
            return Ok(());
        };
        let field = self.atom(field);
        if let Some(widened) = self.types.with_property(current, field, value) {
            trace!(object = %object.name, widened = %self.format_type(widened), "open object widened");
            self.scopes.force_update_var(self.current_scope, name, widened)?;
        }
        Ok(())
    }

    /// `Foo.prototype.method = function () {}` where the declared method
    /// type has no `this`: check the body with `Foo`'s instance type.
    fn prototype_method_type(&self, left: &Expression, left_type: TypeId, right: &Expression) -> TypeId {
        if !matches!(right, Expression::FunctionExpression(_)) {
            return left_type;
        }
        let Some(mut shape) = self.types.function_shape(left_type) else {
            return left_type;
        };
        if shape.this_arg.is_some() {
            return left_type;
        }
        let this_arg = prototype_owner(left)
            .map(|name| self.atom(name))
            .and_then(|name| self.scopes.get_var(self.current_scope, name, LookupMode::Normal))
            .and_then(|ctor| self.types.function_shape(ctor))
            .and_then(|ctor| ctor.this_arg);
        match this_arg {
            Some(this_arg) => {
                shape.this_arg = Some(this_arg);
                self.types.function(shape)
            }
            None => left_type,
        }
    }

    /// Constructor field order and prototype fields.
    fn record_member_assignment(&mut self, member: &MemberExpression, value: TypeId) -> CheckResult<()> {
        if member.computed {
            return Ok(());
        }
        let Some(field) = member.property_name() else {
            return Ok(());
        };
        let field = self.atom(field);

        match member.object.as_ref() {
            Expression::ThisExpression(_) => {
                let in_constructor = self
                    .scopes
                    .function_data(self.current_scope)
                    .is_some_and(|data| data.is_constructor);
                if in_constructor {
                    self.scopes.add_known_field(self.current_scope, field)?;
                }
            }
            object => {
                if let Some(constructor) = prototype_receiver(object)
                    && self.in_file_scope()
                {
                    let constructor = self.atom(constructor);
                    self.scopes
                        .add_prototype_field(self.current_scope, constructor, field, value)?;
                }
            }
        }
        Ok(())
    }
}

/// `Foo` in `Foo.prototype.x`.
fn prototype_owner(left: &Expression) -> Option<&str> {
    match left {
        Expression::MemberExpression(member) => prototype_receiver(&member.object),
        _ => None,
    }
}

/// `Foo` in `Foo.prototype`.
fn prototype_receiver(object: &Expression) -> Option<&str> {
    let Expression::MemberExpression(inner) = object else {
        return None;
    };
    if inner.computed || inner.property_name() != Some("prototype") {
        return None;
    }
    inner.object.as_identifier().map(|id| id.name.as_str())
}
