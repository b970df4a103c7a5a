use super::*;
use crate::instantiate::{contains_free, instantiate, replace_at, type_at};
use smallvec::smallvec;

/// `(this: Array<T>, T) => Number`
fn push_type(interner: &TypeInterner) -> TypeId {
    let t = interner.free("T");
    interner.function(FunctionShape {
        params: vec![ParamInfo::unnamed(t)],
        result: TypeId::NUMBER,
        this_arg: Some(interner.array(t)),
        generics: Vec::new(),
        brand: interner.intern_string("Object"),
    })
}

#[test]
fn test_type_at_walks_paths() {
    let interner = TypeInterner::new();
    let push = push_type(&interner);
    let t = interner.free("T");

    assert_eq!(type_at(&interner, push, &[PathStep::Arg(0)]), Some(t));
    assert_eq!(type_at(&interner, push, &[PathStep::ThisArg, PathStep::TypeArg(0)]), Some(t));
    assert_eq!(type_at(&interner, push, &[PathStep::Result]), Some(TypeId::NUMBER));
    assert_eq!(type_at(&interner, push, &[PathStep::Arg(3)]), None);
    assert_eq!(type_at(&interner, push, &[PathStep::Result, PathStep::TypeArg(0)]), None);
}

#[test]
fn test_replace_at_rebuilds_spine() {
    let interner = TypeInterner::new();
    let push = push_type(&interner);

    let replaced = replace_at(
        &interner,
        push,
        &[PathStep::ThisArg, PathStep::TypeArg(0)],
        TypeId::STRING,
    )
    .unwrap();
    let shape = interner.function_shape(replaced).unwrap();
    assert_eq!(shape.this_arg, Some(interner.array(TypeId::STRING)));
    assert_eq!(shape.params[0].type_id, interner.free("T"));

    // The original is untouched.
    assert!(contains_free(&interner, interner.function_shape(push).unwrap().this_arg.unwrap()));
}

#[test]
fn test_instantiate_all_locations() {
    let interner = TypeInterner::new();
    let push = push_type(&interner);
    let t = interner.intern_string("T");
    let bindings = vec![
        (
            GenericVar {
                name: t,
                location: smallvec![PathStep::ThisArg, PathStep::TypeArg(0)],
            },
            TypeId::STRING,
        ),
        (
            GenericVar {
                name: t,
                location: smallvec![PathStep::Arg(0)],
            },
            TypeId::STRING,
        ),
    ];

    let concrete = instantiate(&interner, push, &bindings);
    assert!(contains_free(&interner, push));
    assert!(!contains_free(&interner, concrete));
    assert_eq!(
        TypeFormatter::new(&interner).format(concrete),
        "(this: Array<String>, String) => Number"
    );
}

#[test]
fn test_object_field_path() {
    let interner = TypeInterner::new();
    let a = interner.intern_string("a");
    let b = interner.intern_string("b");
    let obj = interner.object(vec![
        PropertyInfo::new(a, TypeId::NUMBER),
        PropertyInfo::new(b, interner.free("K")),
    ]);

    assert_eq!(type_at(&interner, obj, &[PathStep::Field(1)]), Some(interner.free("K")));
    let replaced = replace_at(&interner, obj, &[PathStep::Field(1)], TypeId::STRING).unwrap();
    assert_eq!(
        interner.object_shape(replaced).unwrap().find(b).unwrap().type_id,
        TypeId::STRING
    );
}
