use super::*;
use crate::narrowing::{falsy_part, narrow_by_typeof, narrow_by_value, remove_nullish};

#[test]
fn test_truthy_removes_nullish() {
    let interner = TypeInterner::new();
    let nullable = interner.union2(TypeId::STRING, TypeId::NULL);

    assert_eq!(remove_nullish(&interner, nullable), Some(TypeId::STRING));
    assert_eq!(remove_nullish(&interner, TypeId::STRING), None);
}

#[test]
fn test_falsy_part() {
    let interner = TypeInterner::new();
    let x = interner.intern_string("x");
    let obj = interner.object(vec![PropertyInfo::new(x, TypeId::NUMBER)]);
    let maybe_obj = interner.union2(obj, TypeId::NULL);

    assert_eq!(falsy_part(&interner, maybe_obj), Some(TypeId::NULL));
    let mixed = interner.union2(TypeId::STRING, TypeId::UNDEFINED);
    assert_eq!(falsy_part(&interner, mixed), None);
}

#[test]
fn test_typeof_positive_and_negative() {
    let interner = TypeInterner::new();
    let sn = interner.union2(TypeId::STRING, TypeId::NUMBER);

    assert_eq!(narrow_by_typeof(&interner, sn, "string", true), Some(TypeId::STRING));
    assert_eq!(narrow_by_typeof(&interner, sn, "string", false), Some(TypeId::NUMBER));
    assert_eq!(narrow_by_typeof(&interner, TypeId::STRING, "string", true), None);
}

#[test]
fn test_typeof_on_any() {
    let interner = TypeInterner::new();

    assert_eq!(narrow_by_typeof(&interner, TypeId::ANY, "number", true), Some(TypeId::NUMBER));
    assert_eq!(narrow_by_typeof(&interner, TypeId::MIXED, "number", false), None);
}

#[test]
fn test_typeof_function_and_object() {
    let interner = TypeInterner::new();
    let func = interner.function(FunctionShape {
        params: Vec::new(),
        result: TypeId::VOID,
        this_arg: None,
        generics: Vec::new(),
        brand: interner.intern_string("Object"),
    });
    let either = interner.union(vec![func, TypeId::OPEN_OBJECT, TypeId::STRING]);

    assert_eq!(narrow_by_typeof(&interner, either, "function", true), Some(func));
    assert_eq!(
        narrow_by_typeof(&interner, either, "object", true),
        Some(TypeId::OPEN_OBJECT)
    );
}

#[test]
fn test_value_comparison() {
    let interner = TypeInterner::new();
    let nullable = interner.union2(TypeId::STRING, TypeId::NULL);

    assert_eq!(narrow_by_value(&interner, nullable, TypeId::NULL, true), Some(TypeId::NULL));
    assert_eq!(narrow_by_value(&interner, nullable, TypeId::NULL, false), Some(TypeId::STRING));
    assert_eq!(narrow_by_value(&interner, nullable, TypeId::UNDEFINED, false), None);
}
