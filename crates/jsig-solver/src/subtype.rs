//! Structural subtype checking.
//!
//! `SubtypeChecker::check(expected, actual)` succeeds iff a value of type
//! `actual` may be used where `expected` is required. Failures carry the
//! innermost mismatching pair so diagnostics name the precise types
//! (`expected: String, actual: Number`) rather than the enclosing shapes.

use crate::intern::TypeInterner;
use crate::types::{FunctionShape, ObjectShape, TypeData, TypeId};
use jsig_common::Atom;
use jsig_common::limits::MAX_SUBTYPE_DEPTH;
use tracing::trace;

/// Why a subtype check failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubtypeFailureReason {
    TypeClassMismatch {
        expected: TypeId,
        actual: TypeId,
    },
    MissingObjectField {
        field: Atom,
        expected: TypeId,
        actual: TypeId,
    },
    BrandMismatch {
        expected: TypeId,
        actual: TypeId,
    },
    FunctionArgCountMismatch {
        expected: TypeId,
        actual: TypeId,
    },
}

pub struct SubtypeChecker<'a> {
    interner: &'a TypeInterner,
    depth: u32,
    object_brand: Atom,
}

impl<'a> SubtypeChecker<'a> {
    pub fn new(interner: &'a TypeInterner) -> Self {
        Self {
            interner,
            depth: 0,
            object_brand: interner.intern_string("Object"),
        }
    }

    pub fn is_subtype(&mut self, expected: TypeId, actual: TypeId) -> bool {
        self.check(expected, actual).is_ok()
    }

    /// Check that `actual` is assignable to `expected`.
    pub fn check(&mut self, expected: TypeId, actual: TypeId) -> Result<(), SubtypeFailureReason> {
        if self.depth >= MAX_SUBTYPE_DEPTH {
            return Err(SubtypeFailureReason::TypeClassMismatch { expected, actual });
        }
        self.depth += 1;
        let result = self.check_inner(expected, actual);
        self.depth -= 1;
        trace!(expected = expected.0, actual = actual.0, ok = result.is_ok(), "subtype");
        result
    }

    fn check_inner(&mut self, expected: TypeId, actual: TypeId) -> Result<(), SubtypeFailureReason> {
        if expected == actual {
            return Ok(());
        }

        let mismatch = SubtypeFailureReason::TypeClassMismatch { expected, actual };
        let (Some(parent), Some(child)) =
            (self.interner.lookup(expected), self.interner.lookup(actual))
        else {
            return Err(mismatch);
        };

        // Unsolved generic placeholders fit anything in either direction.
        if matches!(*parent, TypeData::Free(_)) || matches!(*child, TypeData::Free(_)) {
            return Ok(());
        }

        match expected {
            TypeId::ANY
            | TypeId::MIXED
            | TypeId::OPEN_FIELD
            | TypeId::MODULE_EXPORTS
            | TypeId::UNINITIALIZED
            | TypeId::UNKNOWN_RETURN
            | TypeId::NULL_DEFAULT => return Ok(()),
            _ => {}
        }
        match actual {
            TypeId::ANY | TypeId::OPEN_FIELD | TypeId::UNKNOWN_RETURN => return Ok(()),
            TypeId::NULL_DEFAULT => return self.check(expected, TypeId::NULL),
            TypeId::UNINITIALIZED => return self.check(expected, TypeId::UNDEFINED),
            _ => {}
        }

        // Distribute over a union child before matching a union parent, so
        // `A | B <: A | B | C` compares member by member.
        if let TypeData::Union(members) = child.as_ref() {
            for &member in members {
                self.check(expected, member)?;
            }
            return Ok(());
        }

        match parent.as_ref() {
            TypeData::Union(members) => {
                for &member in members {
                    if self.is_subtype(member, actual) {
                        return Ok(());
                    }
                }
                return Err(mismatch);
            }
            TypeData::Intersection(members) => {
                for &member in members {
                    self.check(member, actual)?;
                }
                return Ok(());
            }
            _ => {}
        }

        if let TypeData::Intersection(members) = child.as_ref() {
            for &member in members {
                if self.is_subtype(expected, member) {
                    return Ok(());
                }
            }
            // `{a} & {b}` has the fields of both.
            if let (TypeData::Object(p), Some(merged)) = (parent.as_ref(), self.merge_objects(members)) {
                return self.check_object(expected, actual, p, &merged);
            }
            return Err(mismatch);
        }

        match (parent.as_ref(), child.as_ref()) {
            (TypeData::Literal { name: p, .. }, TypeData::Literal { name: c, .. }) => {
                if p == c { Ok(()) } else { Err(mismatch) }
            }
            (TypeData::Renamed { name: p, .. }, TypeData::Renamed { name: c, .. }) => {
                if p == c { Ok(()) } else { Err(mismatch) }
            }
            (_, TypeData::Renamed { original, .. }) => self.check(expected, *original),
            (TypeData::Literal { .. }, _) => self.check_literal_coercion(expected, &child, mismatch),
            (TypeData::Value { name: p, .. }, TypeData::Value { name: c, .. }) => {
                if p == c { Ok(()) } else { Err(mismatch) }
            }
            (TypeData::Object(p), TypeData::Object(c)) => self.check_object(expected, actual, p, c),
            (TypeData::Function(p), TypeData::Function(c)) => {
                self.check_function(expected, actual, p, c)
            }
            (
                TypeData::Generic { base: pb, args: pa },
                TypeData::Generic { base: cb, args: ca },
            ) => {
                if pa.len() != ca.len() {
                    return Err(mismatch);
                }
                self.check(*pb, *cb)?;
                for (&p, &c) in pa.iter().zip(ca.iter()) {
                    self.check(p, c)?;
                }
                Ok(())
            }
            (TypeData::Tuple(pv), TypeData::Tuple(cv)) => {
                if pv.len() != cv.len() {
                    return Err(mismatch);
                }
                for (&p, &c) in pv.iter().zip(cv.iter()) {
                    self.check(p, c)?;
                }
                Ok(())
            }
            _ => Err(mismatch),
        }
    }

    /// Built-in literal parents that accept a structurally different child.
    fn check_literal_coercion(
        &mut self,
        expected: TypeId,
        child: &TypeData,
        mismatch: SubtypeFailureReason,
    ) -> Result<(), SubtypeFailureReason> {
        let accepted = match (expected, child) {
            (TypeId::VOID, TypeData::Value { .. }) => {
                // Only `undefined` coerces to void.
                matches!(child, TypeData::Value { name, .. }
                    if self.interner.resolve_atom_ref(*name).as_ref() == "undefined")
            }
            (TypeId::OBJECT, TypeData::Object(_) | TypeData::Function(_)) => true,
            (TypeId::OBJECT, TypeData::Generic { .. }) => true,
            (TypeId::FUNCTION, TypeData::Function(_)) => true,
            (TypeId::ARRAY, TypeData::Generic { base, .. }) => *base == TypeId::ARRAY,
            _ => false,
        };
        if accepted { Ok(()) } else { Err(mismatch) }
    }

    fn check_object(
        &mut self,
        expected: TypeId,
        actual: TypeId,
        parent: &ObjectShape,
        child: &ObjectShape,
    ) -> Result<(), SubtypeFailureReason> {
        if parent.brand != self.object_brand && parent.brand != child.brand {
            return Err(SubtypeFailureReason::BrandMismatch { expected, actual });
        }

        for prop in &parent.properties {
            match child.find(prop.name) {
                Some(found) => self.check(prop.type_id, found.type_id)?,
                None if prop.optional => {}
                None => {
                    return Err(SubtypeFailureReason::MissingObjectField {
                        field: prop.name,
                        expected,
                        actual,
                    });
                }
            }
        }
        Ok(())
    }

    /// One shape holding every field of `members`, the first declaration
    /// of a name winning. `None` unless every member is an object.
    fn merge_objects(&self, members: &[TypeId]) -> Option<ObjectShape> {
        let mut merged = ObjectShape {
            properties: Vec::new(),
            open: false,
            brand: self.object_brand,
        };
        for &member in members {
            let shape = self.interner.object_shape(member)?;
            if merged.brand == self.object_brand {
                merged.brand = shape.brand;
            }
            for prop in shape.properties {
                if merged.find(prop.name).is_none() {
                    merged.properties.push(prop);
                }
            }
        }
        Some(merged)
    }

    fn check_function(
        &mut self,
        expected: TypeId,
        actual: TypeId,
        parent: &FunctionShape,
        child: &FunctionShape,
    ) -> Result<(), SubtypeFailureReason> {
        // A child may declare fewer parameters, never require more.
        if child.required_params() > parent.params.len() {
            return Err(SubtypeFailureReason::FunctionArgCountMismatch { expected, actual });
        }

        for (p, c) in parent.params.iter().zip(child.params.iter()) {
            self.check(c.type_id, p.type_id)?;
        }

        self.check(parent.result, child.result)?;

        if let (Some(p), Some(c)) = (parent.this_arg, child.this_arg) {
            self.check(p, c)?;
        }
        Ok(())
    }
}
