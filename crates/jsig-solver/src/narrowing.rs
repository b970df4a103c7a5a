//! Union filtering for control-flow narrowing.
//!
//! Every function returns `Some(narrowed)` only when the guard actually
//! changes the type; `None` means the branch keeps the declared type and no
//! restriction should be recorded.

use crate::TypeInterner;
use crate::types::{TypeData, TypeId};

fn members(interner: &TypeInterner, id: TypeId) -> Vec<TypeId> {
    interner.union_members(id).unwrap_or_else(|| vec![id])
}

/// Keep the members for which `keep` holds. `None` when nothing was removed
/// or nothing would remain.
fn filter(interner: &TypeInterner, id: TypeId, keep: impl Fn(TypeId) -> bool) -> Option<TypeId> {
    let all = members(interner, id);
    let kept: Vec<TypeId> = all.iter().copied().filter(|&m| keep(m)).collect();
    if kept.is_empty() || kept.len() == all.len() {
        return None;
    }
    Some(interner.union(kept))
}

/// Truthy branch of `if (x)`: drop `null` and `undefined`.
pub fn remove_nullish(interner: &TypeInterner, id: TypeId) -> Option<TypeId> {
    filter(interner, id, |m| !m.is_nullish())
}

/// Falsy branch of `if (x)`: keep the members that have a falsy value.
pub fn falsy_part(interner: &TypeInterner, id: TypeId) -> Option<TypeId> {
    filter(interner, id, |m| {
        m.is_nullish()
            || m.is_any_like()
            || matches!(m, TypeId::STRING | TypeId::NUMBER | TypeId::BOOLEAN)
    })
}

/// `typeof x === tag` (positive) or `!==` (negative).
pub fn narrow_by_typeof(
    interner: &TypeInterner,
    id: TypeId,
    tag: &str,
    positive: bool,
) -> Option<TypeId> {
    if id.is_any_like() {
        return if positive { typeof_type(tag) } else { None };
    }
    filter(interner, id, |m| matches_typeof(interner, m, tag) == positive)
}

/// The type a `typeof` tag denotes on its own.
fn typeof_type(tag: &str) -> Option<TypeId> {
    match tag {
        "string" => Some(TypeId::STRING),
        "number" => Some(TypeId::NUMBER),
        "boolean" => Some(TypeId::BOOLEAN),
        "function" => Some(TypeId::FUNCTION),
        "object" => Some(TypeId::OBJECT),
        "undefined" => Some(TypeId::UNDEFINED),
        _ => None,
    }
}

fn matches_typeof(interner: &TypeInterner, id: TypeId, tag: &str) -> bool {
    match tag {
        "string" => id == TypeId::STRING,
        "number" => id == TypeId::NUMBER,
        "boolean" => id == TypeId::BOOLEAN,
        "undefined" => matches!(id, TypeId::UNDEFINED | TypeId::UNINITIALIZED),
        "function" => id == TypeId::FUNCTION || interner.is_function(id),
        "object" => match interner.lookup(id).as_deref() {
            Some(TypeData::Object(_) | TypeData::Generic { .. } | TypeData::Tuple(_)) => true,
            _ => matches!(
                id,
                TypeId::NULL | TypeId::NULL_DEFAULT | TypeId::OBJECT | TypeId::REGEXP
            ),
        },
        _ => false,
    }
}

/// `x === null` / `x === undefined` (positive) or the `!==` forms.
pub fn narrow_by_value(
    interner: &TypeInterner,
    id: TypeId,
    value: TypeId,
    positive: bool,
) -> Option<TypeId> {
    let same = |m: TypeId| match value {
        TypeId::NULL => matches!(m, TypeId::NULL | TypeId::NULL_DEFAULT),
        TypeId::UNDEFINED => matches!(m, TypeId::UNDEFINED | TypeId::UNINITIALIZED),
        _ => m == value,
    };
    if positive && id.is_any_like() {
        return Some(value);
    }
    filter(interner, id, |m| same(m) == positive)
}
