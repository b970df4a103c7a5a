//! Generic-location paths.
//!
//! A generic function type records, for every occurrence of a type variable,
//! the `PathStep` path from the function to that occurrence. Instantiation
//! reads and rewrites types along those paths; because types are interned,
//! rewriting rebuilds only the spine of the path and shares everything else.

use crate::TypeInterner;
use crate::types::{GenericVar, PathStep, TypeData, TypeId};

/// Follow `path` from `root`. `None` when a step does not fit the shape.
pub fn type_at(interner: &TypeInterner, root: TypeId, path: &[PathStep]) -> Option<TypeId> {
    let mut current = root;
    for step in path {
        current = child_at(interner, current, *step)?;
    }
    Some(current)
}

fn child_at(interner: &TypeInterner, id: TypeId, step: PathStep) -> Option<TypeId> {
    let data = interner.lookup(id)?;
    match (data.as_ref(), step) {
        (TypeData::Function(shape), PathStep::Arg(i)) => shape.params.get(i).map(|p| p.type_id),
        (TypeData::Function(shape), PathStep::ThisArg) => shape.this_arg,
        (TypeData::Function(shape), PathStep::Result) => Some(shape.result),
        (TypeData::Generic { args, .. }, PathStep::TypeArg(i)) => args.get(i).copied(),
        (TypeData::Object(shape), PathStep::Field(i)) => shape.properties.get(i).map(|p| p.type_id),
        (TypeData::Union(members) | TypeData::Intersection(members), PathStep::Member(i)) => {
            members.get(i).copied()
        }
        (TypeData::Tuple(elements), PathStep::Element(i)) => elements.get(i).copied(),
        (TypeData::Renamed { original, .. }, _) => child_at(interner, *original, step),
        _ => None,
    }
}

/// Rebuild `root` with the type at `path` replaced by `replacement`.
pub fn replace_at(
    interner: &TypeInterner,
    root: TypeId,
    path: &[PathStep],
    replacement: TypeId,
) -> Option<TypeId> {
    let Some((&step, rest)) = path.split_first() else {
        return Some(replacement);
    };
    let data = interner.lookup(root)?;
    let rebuilt = match (data.as_ref(), step) {
        (TypeData::Function(shape), PathStep::Arg(i)) => {
            let mut shape = shape.clone();
            let param = shape.params.get_mut(i)?;
            param.type_id = replace_at(interner, param.type_id, rest, replacement)?;
            interner.function(shape)
        }
        (TypeData::Function(shape), PathStep::ThisArg) => {
            let mut shape = shape.clone();
            let this_arg = shape.this_arg?;
            shape.this_arg = Some(replace_at(interner, this_arg, rest, replacement)?);
            interner.function(shape)
        }
        (TypeData::Function(shape), PathStep::Result) => {
            let mut shape = shape.clone();
            shape.result = replace_at(interner, shape.result, rest, replacement)?;
            interner.function(shape)
        }
        (TypeData::Generic { base, args }, PathStep::TypeArg(i)) => {
            let mut args = args.clone();
            let arg = args.get_mut(i)?;
            *arg = replace_at(interner, *arg, rest, replacement)?;
            interner.generic(*base, args)
        }
        (TypeData::Object(shape), PathStep::Field(i)) => {
            let mut shape = shape.clone();
            let prop = shape.properties.get_mut(i)?;
            prop.type_id = replace_at(interner, prop.type_id, rest, replacement)?;
            interner.object_with_shape(shape)
        }
        (TypeData::Union(members), PathStep::Member(i)) => {
            let mut members = members.clone();
            let member = members.get_mut(i)?;
            *member = replace_at(interner, *member, rest, replacement)?;
            interner.union(members)
        }
        (TypeData::Intersection(members), PathStep::Member(i)) => {
            let mut members = members.clone();
            let member = members.get_mut(i)?;
            *member = replace_at(interner, *member, rest, replacement)?;
            interner.intersection(members)
        }
        (TypeData::Tuple(elements), PathStep::Element(i)) => {
            let mut elements = elements.clone();
            let element = elements.get_mut(i)?;
            *element = replace_at(interner, *element, rest, replacement)?;
            interner.tuple(elements)
        }
        _ => return None,
    };
    Some(rebuilt)
}

/// Substitute every listed generic occurrence. Occurrences whose path no
/// longer fits are skipped.
pub fn instantiate(interner: &TypeInterner, root: TypeId, bindings: &[(GenericVar, TypeId)]) -> TypeId {
    let mut current = root;
    for (var, ty) in bindings {
        if let Some(next) = replace_at(interner, current, &var.location, *ty) {
            current = next;
        }
    }
    current
}

/// Whether an unsolved generic placeholder occurs anywhere inside `id`.
pub fn contains_free(interner: &TypeInterner, id: TypeId) -> bool {
    contains_free_at(interner, id, 0)
}

fn contains_free_at(interner: &TypeInterner, id: TypeId, depth: u32) -> bool {
    if depth > jsig_common::limits::MAX_INLINE_DEPTH {
        return false;
    }
    let Some(data) = interner.lookup(id) else {
        return false;
    };
    let any = |ids: Vec<TypeId>| {
        ids.into_iter()
            .any(|child| contains_free_at(interner, child, depth + 1))
    };
    match data.as_ref() {
        TypeData::Free(_) => true,
        TypeData::Literal { .. } | TypeData::Value { .. } => false,
        TypeData::Object(shape) => any(shape.properties.iter().map(|p| p.type_id).collect()),
        TypeData::Union(members) | TypeData::Intersection(members) | TypeData::Tuple(members) => {
            any(members.clone())
        }
        TypeData::Function(shape) => {
            let mut ids: Vec<TypeId> = shape.params.iter().map(|p| p.type_id).collect();
            ids.extend(shape.this_arg);
            ids.push(shape.result);
            any(ids)
        }
        TypeData::Generic { base, args } => {
            contains_free_at(interner, *base, depth + 1) || any(args.clone())
        }
        TypeData::Renamed { original, .. } => contains_free_at(interner, *original, depth + 1),
    }
}
