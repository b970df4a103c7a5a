use super::*;

#[test]
fn test_builtin_ids_are_fixed() {
    let interner = TypeInterner::new();

    assert_eq!(interner.literal("String", true), TypeId::STRING);
    assert_eq!(interner.literal("Number", true), TypeId::NUMBER);
    assert_eq!(interner.literal("void", true), TypeId::VOID);
    assert_eq!(interner.value("null"), TypeId::NULL);
    assert_eq!(interner.value("undefined"), TypeId::UNDEFINED);
    assert_eq!(interner.literal("%Void%%Uninitialized", true), TypeId::UNINITIALIZED);
    assert_eq!(interner.literal("%Any%%ModuleExports", true), TypeId::MODULE_EXPORTS);
}

#[test]
fn test_structural_dedup() {
    let interner = TypeInterner::new();
    let x = interner.intern_string("x");

    let a = interner.object(vec![PropertyInfo::new(x, TypeId::NUMBER)]);
    let b = interner.object(vec![PropertyInfo::new(x, TypeId::NUMBER)]);
    assert_eq!(a, b);

    let c = interner.object(vec![PropertyInfo::new(x, TypeId::STRING)]);
    assert_ne!(a, c);
}

#[test]
fn test_union_flattens_and_dedupes() {
    let interner = TypeInterner::new();

    let inner = interner.union2(TypeId::STRING, TypeId::NUMBER);
    let outer = interner.union(vec![inner, TypeId::STRING, TypeId::NULL]);
    assert_eq!(
        interner.union_members(outer),
        Some(vec![TypeId::STRING, TypeId::NUMBER, TypeId::NULL])
    );

    assert_eq!(interner.union(vec![TypeId::STRING]), TypeId::STRING);
    assert_eq!(interner.union(vec![TypeId::STRING, TypeId::STRING]), TypeId::STRING);
    assert_eq!(interner.union(Vec::new()), TypeId::VOID);
}

#[test]
fn test_with_property_is_copy_on_write() {
    let interner = TypeInterner::new();
    let x = interner.intern_string("x");
    let y = interner.intern_string("y");

    let original = interner.object(vec![PropertyInfo::new(x, TypeId::NUMBER)]);
    let updated = interner.with_property(original, y, TypeId::STRING).unwrap();

    assert_ne!(original, updated);
    assert_eq!(interner.object_shape(original).unwrap().properties.len(), 1);

    let shape = interner.object_shape(updated).unwrap();
    assert_eq!(shape.properties.len(), 2);
    assert_eq!(shape.position(y), Some(1));

    let replaced = interner.with_property(updated, x, TypeId::BOOLEAN).unwrap();
    let shape = interner.object_shape(replaced).unwrap();
    assert_eq!(shape.position(x), Some(0));
    assert_eq!(shape.find(x).unwrap().type_id, TypeId::BOOLEAN);
}

#[test]
fn test_with_property_keeps_open_flag() {
    let interner = TypeInterner::new();
    let a = interner.intern_string("a");

    let updated = interner.with_property(TypeId::OPEN_OBJECT, a, TypeId::NUMBER).unwrap();
    assert!(interner.object_shape(updated).unwrap().open);
    assert!(interner.with_property(TypeId::STRING, a, TypeId::NUMBER).is_none());
}

#[test]
fn test_with_brand() {
    let interner = TypeInterner::new();
    let x = interner.intern_string("x");
    let obj = interner.object(vec![PropertyInfo::new(x, TypeId::NUMBER)]);

    let branded = interner.with_brand(obj, "Foo");
    assert_ne!(obj, branded);
    let brand = interner.object_shape(branded).unwrap().brand;
    assert_eq!(interner.resolve_atom(brand), "Foo");

    assert_eq!(interner.with_brand(TypeId::STRING, "Foo"), TypeId::STRING);
}

#[test]
fn test_array_helpers() {
    let interner = TypeInterner::new();
    let arr = interner.array(TypeId::STRING);

    assert_eq!(interner.array_element(arr), Some(TypeId::STRING));
    assert_eq!(interner.generic_parts(arr), Some((TypeId::ARRAY, vec![TypeId::STRING])));
    assert_eq!(interner.array_element(TypeId::STRING), None);
}

#[test]
fn test_format_types() {
    let interner = TypeInterner::new();
    let fmt = TypeFormatter::new(&interner);
    let a = interner.intern_string("a");
    let b = interner.intern_string("b");

    assert_eq!(fmt.format(TypeId::STRING), "String");
    assert_eq!(fmt.format(TypeId::NULL), "null");
    assert_eq!(fmt.format(TypeId::EMPTY_OBJECT), "{}");
    assert_eq!(fmt.format(interner.union2(TypeId::STRING, TypeId::NULL)), "String | null");
    assert_eq!(fmt.format(interner.array(TypeId::NUMBER)), "Array<Number>");

    let obj = interner.object(vec![
        PropertyInfo::new(a, TypeId::NUMBER),
        PropertyInfo {
            name: b,
            type_id: TypeId::STRING,
            optional: true,
        },
    ]);
    assert_eq!(fmt.format(obj), "{ a: Number, b?: String }");

    let func = interner.function(FunctionShape {
        params: vec![
            ParamInfo {
                name: Some(a),
                type_id: TypeId::STRING,
                optional: false,
            },
            ParamInfo::unnamed(TypeId::NUMBER),
        ],
        result: TypeId::VOID,
        this_arg: Some(obj),
        generics: Vec::new(),
        brand: interner.intern_string("Object"),
    });
    assert_eq!(
        fmt.format(func),
        "(this: { a: Number, b?: String }, a: String, Number) => void"
    );
}
