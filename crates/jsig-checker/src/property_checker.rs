//! Member access: `obj.field` and `obj[index]`.
//!
//! Primitive receivers read their members from the virtual types registered
//! in the global scope (`TArray`, `TString`, `TNumber`). Generic members
//! such as `push` keep their type variables; the call checker solves them
//! against the receiver.

use crate::error_handler::CheckResult;
use crate::state::CheckerState;
use jsig_ast::{Expression, LiteralKind, MemberExpression};
use jsig_common::{Atom, DiagnosticKind, well_known};
use jsig_solver::{TypeData, TypeId};
use tracing::trace;

/// Outcome of looking a field up on a type, before anything is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FieldLookup {
    Found(TypeId),
    /// Missing on an open object that may still grow.
    Open,
    Missing,
    /// Field access on a union is rejected outright.
    OnUnion,
}

impl<'a> CheckerState<'a> {
    pub(crate) fn check_member_expression(&mut self, node: &'a MemberExpression) -> CheckResult<Option<TypeId>> {
        let Some(object_type) = self.as_read(|this| this.check_expression(&node.object))? else {
            return Ok(None);
        };
        self.member_type(node, object_type)
    }

    /// Type of `node` given the already computed type of its object.
    pub(crate) fn member_type(&mut self, node: &'a MemberExpression, object_type: TypeId) -> CheckResult<Option<TypeId>> {
        if node.computed {
            return self.computed_member_type(node, object_type);
        }
        let Some(field) = node.property_name() else {
            return Ok(None);
        };
        Ok(self.field_type(node, object_type, field))
    }

    fn field_type(&mut self, node: &MemberExpression, object_type: TypeId, field: &str) -> Option<TypeId> {
        let atom = self.atom(field);
        match self.lookup_field(object_type, atom, 0) {
            FieldLookup::Found(type_id) => Some(type_id),
            FieldLookup::Open if self.ctx.assignment_target => {
                trace!(field, "open object field");
                Some(TypeId::OPEN_FIELD)
            }
            FieldLookup::Open | FieldLookup::Missing => {
                let obj_name = self.describe_object(&node.object);
                self.report_non_existent_field(node.loc, field, &obj_name);
                None
            }
            FieldLookup::OnUnion => {
                self.error(
                    DiagnosticKind::UnionFieldAccess,
                    node.loc,
                    [
                        ("fieldName", field.to_string()),
                        ("unionType", self.format_type(object_type)),
                    ],
                );
                None
            }
        }
    }

    fn lookup_field(&self, object_type: TypeId, field: Atom, depth: u32) -> FieldLookup {
        if depth > jsig_common::limits::MAX_INLINE_DEPTH {
            return FieldLookup::Missing;
        }
        if object_type == TypeId::ANY {
            return FieldLookup::Found(TypeId::ANY);
        }
        let virtual_type = |name: &str| {
            self.scopes
                .globals()
                .get_virtual_type(name)
                .map_or(FieldLookup::Missing, |vt| self.lookup_field(vt, field, depth + 1))
        };

        let Some(data) = self.types.lookup(object_type) else {
            return FieldLookup::Missing;
        };
        match data.as_ref() {
            TypeData::Object(shape) => match shape.find(field) {
                Some(prop) => FieldLookup::Found(prop.type_id),
                None if shape.open => FieldLookup::Open,
                None => FieldLookup::Missing,
            },
            TypeData::Function(shape) if field == well_known::PROTOTYPE => {
                shape.this_arg.map_or(FieldLookup::Missing, FieldLookup::Found)
            }
            TypeData::Generic { base, .. } if *base == TypeId::ARRAY => virtual_type("TArray"),
            TypeData::Union(_) => FieldLookup::OnUnion,
            TypeData::Intersection(members) => members
                .iter()
                .map(|&m| self.lookup_field(m, field, depth + 1))
                .find(|r| matches!(r, FieldLookup::Found(_)))
                .unwrap_or(FieldLookup::Missing),
            TypeData::Renamed { original, .. } => self.lookup_field(*original, field, depth + 1),
            _ => match object_type {
                TypeId::STRING => virtual_type("TString"),
                TypeId::NUMBER => virtual_type("TNumber"),
                TypeId::ARRAY => virtual_type("TArray"),
                _ => FieldLookup::Missing,
            },
        }
    }

    // =========================================================================
    // Computed access
    // =========================================================================

    fn computed_member_type(&mut self, node: &'a MemberExpression, object_type: TypeId) -> CheckResult<Option<TypeId>> {
        let Some(index_type) = self.as_read(|this| this.check_expression(&node.property))? else {
            return Ok(None);
        };

        if object_type == TypeId::ANY {
            return Ok(Some(TypeId::ANY));
        }

        if let Some(element) = self.types.array_element(object_type) {
            return Ok(self.check_subtype(node.property.loc(), TypeId::NUMBER, index_type).then_some(element));
        }

        if let Some((base, args)) = self.types.generic_parts(object_type)
            && base == TypeId::OBJECT
            && args.len() == 2
        {
            // Object<K, V> used as a dictionary.
            return Ok(self.check_subtype(node.property.loc(), args[0], index_type).then_some(args[1]));
        }

        let literal = match node.property.as_ref() {
            Expression::Literal(lit) => Some(lit),
            _ => None,
        };
        match self.types.lookup(object_type).as_deref() {
            Some(TypeData::Tuple(elements)) => {
                let element = literal.and_then(|l| l.as_index()).and_then(|i| elements.get(i).copied());
                if element.is_none() {
                    self.report_dynamic_access(node);
                }
                Ok(element)
            }
            Some(TypeData::Object(_)) => {
                let key = literal
                    .filter(|l| l.kind() == LiteralKind::String)
                    .and_then(|l| l.as_str());
                match key {
                    Some(key) => Ok(self.field_type(node, object_type, key)),
                    None => {
                        self.report_dynamic_access(node);
                        Ok(None)
                    }
                }
            }
            _ => {
                self.report_dynamic_access(node);
                Ok(None)
            }
        }
    }

    /// An index that cannot be resolved to a field statically.
    fn report_dynamic_access(&mut self, node: &MemberExpression) {
        let field = self.snippet(&node.property.loc());
        let obj_name = self.describe_object(&node.object);
        self.report_non_existent_field(node.loc, &field, &obj_name);
    }
}
