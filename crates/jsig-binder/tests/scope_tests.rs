use super::*;
use jsig_ast::builder::js;
use jsig_ast::{Function, Statement};
use jsig_common::well_known;
use jsig_solver::{TypeId, TypeInterner};

fn function_node(name: &str) -> Function {
    match js::function_decl(name, &[], Vec::new()) {
        Statement::FunctionDeclaration(func) => func,
        _ => unreachable!(),
    }
}

#[test]
fn test_add_var_rejects_duplicates() {
    let types = TypeInterner::new();
    let globals = GlobalScope::new();
    let mut arena = ScopeArena::new(&globals, &types);
    let file = arena.push_file();
    let x = types.intern_string("x");

    arena.add_var(file, x, TypeId::NUMBER).unwrap();
    assert_eq!(
        arena.add_var(file, x, TypeId::STRING),
        Err(ScopeError::DuplicateIdentifier("x".to_string()))
    );
    assert_eq!(arena.get_var(file, x, LookupMode::Normal), Some(TypeId::NUMBER));
}

#[test]
fn test_lookup_walks_chain_then_globals() {
    let types = TypeInterner::new();
    let mut globals = GlobalScope::new();
    let g = types.intern_string("g");
    globals.add_var(g, TypeId::BOOLEAN);

    let mut arena = ScopeArena::new(&globals, &types);
    let file = arena.push_file();
    let x = types.intern_string("x");
    arena.add_var(file, x, TypeId::NUMBER).unwrap();
    let branch = arena.push_branch(file);

    assert_eq!(arena.get_var(branch, x, LookupMode::Normal), Some(TypeId::NUMBER));
    assert_eq!(arena.get_var(branch, g, LookupMode::Normal), Some(TypeId::BOOLEAN));
    assert_eq!(arena.get_var(branch, types.intern_string("nope"), LookupMode::Normal), None);
}

#[test]
fn test_restrictions_and_writable_lookup() {
    let types = TypeInterner::new();
    let globals = GlobalScope::new();
    let mut arena = ScopeArena::new(&globals, &types);
    let file = arena.push_file();
    let x = types.intern_string("x");
    let nullable = types.union2(TypeId::STRING, TypeId::NULL);
    arena.add_var(file, x, nullable).unwrap();

    let branch = arena.push_branch(file);
    arena.restrict_type(branch, x, TypeId::STRING).unwrap();
    let inner = arena.push_branch(branch);

    assert_eq!(arena.get_var(inner, x, LookupMode::Normal), Some(TypeId::STRING));
    assert_eq!(arena.get_var(inner, x, LookupMode::Writable), Some(nullable));
    assert_eq!(arena.get_var(file, x, LookupMode::Normal), Some(nullable));
}

#[test]
fn test_branch_restriction_overwrites() {
    let types = TypeInterner::new();
    let globals = GlobalScope::new();
    let mut arena = ScopeArena::new(&globals, &types);
    let file = arena.push_file();
    let branch = arena.push_branch(file);
    let x = types.intern_string("x");
    let y = types.intern_string("y");

    arena.restrict_type(branch, x, TypeId::STRING).unwrap();
    arena.restrict_type(branch, x, TypeId::NUMBER).unwrap();
    assert_eq!(arena.restrictions(branch).get(&x), Some(&TypeId::NUMBER));
    assert!(arena.restrictions(branch).get(&y).is_none());
}

#[test]
fn test_function_scope_rejects_double_restriction() {
    let types = TypeInterner::new();
    let globals = GlobalScope::new();
    let mut arena = ScopeArena::new(&globals, &types);
    let file = arena.push_file();
    let name = types.intern_string("foo");
    let func = arena
        .push_function(file, FunctionScopeData::new(name, "foo", TypeId::FUNCTION))
        .unwrap();
    let x = types.intern_string("x");

    arena.restrict_type(func, x, TypeId::STRING).unwrap();
    assert_eq!(
        arena.restrict_type(func, x, TypeId::STRING),
        Err(ScopeError::DoubleRestriction("x".to_string()))
    );
    assert_eq!(
        arena.restrict_type(func, well_known::THIS, TypeId::STRING),
        Err(ScopeError::CannotRestrictThis)
    );
}

#[test]
fn test_this_type_prefers_branch_restriction() {
    let types = TypeInterner::new();
    let globals = GlobalScope::new();
    let mut arena = ScopeArena::new(&globals, &types);
    let file = arena.push_file();
    let name = types.intern_string("Foo");
    let mut data = FunctionScopeData::new(name, "Foo", TypeId::FUNCTION);
    data.this_type = Some(TypeId::OPEN_OBJECT);
    let func = arena.push_function(file, data).unwrap();
    let branch = arena.push_branch(func);

    assert_eq!(arena.this_type(branch), Some(TypeId::OPEN_OBJECT));
    arena.restrict_type(branch, well_known::THIS, TypeId::EMPTY_OBJECT).unwrap();
    assert_eq!(arena.this_type(branch), Some(TypeId::EMPTY_OBJECT));
    assert_eq!(arena.this_type(func), Some(TypeId::OPEN_OBJECT));
    assert_eq!(arena.this_type(file), None);
}

#[test]
fn test_force_update_targets_declaring_scope() {
    let types = TypeInterner::new();
    let globals = GlobalScope::new();
    let mut arena = ScopeArena::new(&globals, &types);
    let file = arena.push_file();
    let x = types.intern_string("x");
    arena.add_var(file, x, TypeId::UNINITIALIZED).unwrap();
    let branch = arena.push_branch(file);

    assert_eq!(arena.force_update_var(branch, x, TypeId::NUMBER), Ok(file));
    assert_eq!(arena.get_var(file, x, LookupMode::Normal), Some(TypeId::NUMBER));
    assert_eq!(
        arena.force_update_var(branch, types.intern_string("y"), TypeId::NUMBER),
        Err(ScopeError::MissingIdentifier("y".to_string()))
    );
}

#[test]
fn test_untyped_function_lifecycle() {
    let types = TypeInterner::new();
    let globals = GlobalScope::new();
    let node = function_node("helper");
    let mut arena = ScopeArena::new(&globals, &types);
    let file = arena.push_file();
    let helper = types.intern_string("helper");

    arena.add_function(file, helper, &node).unwrap();
    let branch = arena.push_branch(file);
    let found = arena.get_function(branch, helper).unwrap();
    assert_eq!(found.defined_in, file);
    assert_eq!(found.node.name(), "helper");

    assert_eq!(arena.update_function(branch, helper, TypeId::FUNCTION), Ok(file));
    assert!(arena.get_function(branch, helper).is_none());
    assert_eq!(arena.get_var(branch, helper, LookupMode::Normal), Some(TypeId::FUNCTION));
    assert_eq!(
        arena.update_function(branch, helper, TypeId::FUNCTION),
        Err(ScopeError::MissingFunction("helper".to_string()))
    );
}

#[test]
fn test_function_scopes_registered_once() {
    let types = TypeInterner::new();
    let globals = GlobalScope::new();
    let mut arena = ScopeArena::new(&globals, &types);
    let file = arena.push_file();
    let branch = arena.push_branch(file);
    let name = types.intern_string("foo");

    let func = arena
        .push_function(branch, FunctionScopeData::new(name, "foo", TypeId::FUNCTION))
        .unwrap();
    assert_eq!(arena.known_function(file, name), Some(func));
    assert_eq!(arena.parent(func), Some(branch));
    assert!(
        arena
            .push_function(file, FunctionScopeData::new(name, "foo", TypeId::FUNCTION))
            .is_err()
    );
}

#[test]
fn test_prototype_fields_from_nested_scope() {
    let types = TypeInterner::new();
    let globals = GlobalScope::new();
    let mut arena = ScopeArena::new(&globals, &types);
    let file = arena.push_file();
    let ctor = types.intern_string("Foo");
    let method = types.intern_string("bar");

    arena.add_prototype_field(file, ctor, method, TypeId::FUNCTION).unwrap();
    let func = arena
        .push_function(file, FunctionScopeData::new(ctor, "Foo", TypeId::FUNCTION))
        .unwrap();
    let branch = arena.push_branch(func);

    assert!(arena.prototype_fields(branch, ctor).unwrap().contains_key(&method));
    assert_eq!(
        arena.add_prototype_field(func, ctor, method, TypeId::FUNCTION),
        Err(ScopeError::PrototypeOutsideFile)
    );
}

#[test]
fn test_constructor_bookkeeping() {
    let types = TypeInterner::new();
    let globals = GlobalScope::new();
    let mut arena = ScopeArena::new(&globals, &types);
    let file = arena.push_file();
    let ctor = types.intern_string("Foo");
    let func = arena
        .push_function(file, FunctionScopeData::new(ctor, "Foo", TypeId::FUNCTION))
        .unwrap();
    let branch = arena.push_branch(func);
    let a = types.intern_string("a");
    let b = types.intern_string("b");

    arena.add_known_field(branch, b).unwrap();
    arena.add_known_field(func, a).unwrap();
    arena.add_known_field(func, b).unwrap();

    let data = arena.function_data(branch).unwrap();
    assert!(data.is_constructor);
    assert_eq!(data.known_fields, vec![b, a]);
    assert_eq!(arena.add_known_field(file, a), Err(ScopeError::NotInFunction(file.0)));
}

#[test]
fn test_return_bookkeeping() {
    let types = TypeInterner::new();
    let globals = GlobalScope::new();
    let mut arena = ScopeArena::new(&globals, &types);
    let file = arena.push_file();
    let name = types.intern_string("foo");
    let func = arena
        .push_function(file, FunctionScopeData::new(name, "foo", TypeId::FUNCTION))
        .unwrap();
    let branch = arena.push_branch(func);

    arena.enter_return_statement(branch, TypeId::STRING).unwrap();
    assert_eq!(arena.return_expression_type(func), Some(TypeId::STRING));
    arena.exit_return_statement(branch).unwrap();
    assert_eq!(arena.return_expression_type(func), None);

    let loc = jsig_common::SourceLocation::on_line(3, 2, 10);
    arena.mark_return_type(branch, TypeId::NUMBER, loc).unwrap();
    let data = arena.function_data(func).unwrap();
    assert_eq!(data.known_return_type, Some(TypeId::NUMBER));
    assert_eq!(data.return_statement_loc, Some(loc));
}

#[test]
fn test_constructor_names() {
    assert!(is_constructor_name("Foo"));
    assert!(!is_constructor_name("foo"));
    assert!(!is_constructor_name("_Foo"));
    assert!(!is_constructor_name(""));
}
