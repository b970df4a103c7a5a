use super::*;
use crate::test_utils::*;
use jsig_ast::builder::js::*;
use jsig_ast::builder::sig;
use jsig_common::DiagnosticKind;

fn number() -> jsig_ast::TypeExpr {
    sig::literal("Number")
}

#[test]
fn test_function_with_extra_parameter() {
    let result = check(
        vec![at(1, function_decl("add", &["a", "b", "c"], vec![at(2, return_(Some(ident("a"))))]))],
        vec![sig::assignment("add", sig::function(vec![number(), number()], number()))],
    );

    let diagnostic = single(&result);
    assert_eq!(diagnostic.kind, DiagnosticKind::TooManyArgsInFunc);
    assert_eq!(diagnostic.field("funcName"), Some("add"));
    assert_eq!(diagnostic.field("expectedArgs"), Some("2"));
    assert_eq!(diagnostic.field("actualArgs"), Some("3"));
    assert_eq!(diagnostic.line, Some(1));
}

#[test]
fn test_function_with_missing_parameter() {
    let result = check(
        vec![at(1, function_decl("add", &["a"], vec![at(2, return_(Some(ident("a"))))]))],
        vec![sig::assignment("add", sig::function(vec![number(), number()], number()))],
    );

    let diagnostic = single(&result);
    assert_eq!(diagnostic.kind, DiagnosticKind::TooFewArgsInFunc);
    assert_eq!(diagnostic.field("actualArgs"), Some("1"));
}

#[test]
fn test_return_type_mismatch() {
    let result = check(
        vec![at(1, function_decl("greet", &["name"], vec![at(2, return_(Some(ident("name"))))]))],
        vec![sig::assignment(
            "greet",
            sig::function(vec![sig::literal("String")], number()),
        )],
    );

    let diagnostic = single(&result);
    assert_eq!(diagnostic.code(), "jsig.sub-type.type-class-mismatch");
    assert_eq!(diagnostic.field("expected"), Some("Number"));
    assert_eq!(diagnostic.field("actual"), Some("String"));
    assert_eq!(diagnostic.line, Some(2));
}

#[test]
fn test_missing_return_statement() {
    let result = check(
        vec![at(1, function_decl("name", &[], Vec::new()))],
        vec![sig::assignment("name", sig::function(Vec::new(), sig::literal("String")))],
    );

    let diagnostic = single(&result);
    assert_eq!(diagnostic.kind, DiagnosticKind::MissingReturnStatement);
    assert_eq!(diagnostic.field("funcName"), Some("name"));
    assert_eq!(diagnostic.field("expected"), Some("String"));
}

#[test]
fn test_void_function_needs_no_return() {
    let result = check(
        vec![at(1, function_decl("noop", &[], Vec::new()))],
        vec![sig::assignment("noop", sig::function(Vec::new(), sig::literal("void")))],
    );
    assert_clean(&result);
}

#[test]
fn test_constructor_fields_out_of_order() {
    let this_type = sig::object(vec![("a", number()), ("b", number())]);
    let result = check(
        vec![at(
            1,
            function_decl(
                "Point",
                &[],
                vec![
                    at(2, expr(assign(member(this(), "b"), number_lit(1)))),
                    at(3, expr(assign(member(this(), "a"), number_lit(2)))),
                ],
            ),
        )],
        vec![sig::assignment(
            "Point",
            sig::method(this_type, Vec::new(), sig::literal("void")),
        )],
    );

    let diagnostic = single(&result);
    assert_eq!(diagnostic.kind, DiagnosticKind::MissingFieldInConstructor);
    assert_eq!(diagnostic.field("fieldName"), Some("a"));
    assert_eq!(diagnostic.field("otherField"), Some("b"));
}

#[test]
fn test_constructor_missing_field() {
    let this_type = sig::object(vec![("a", number()), ("b", number())]);
    let result = check(
        vec![at(
            1,
            function_decl(
                "Point",
                &[],
                vec![at(2, expr(assign(member(this(), "a"), number_lit(1))))],
            ),
        )],
        vec![sig::assignment(
            "Point",
            sig::method(this_type, Vec::new(), sig::literal("void")),
        )],
    );

    let diagnostic = single(&result);
    assert_eq!(diagnostic.field("fieldName"), Some("b"));
    assert_eq!(diagnostic.field("otherField"), Some("no-field"));
}

#[test]
fn test_constructor_returning_value() {
    let this_type = sig::object(vec![("a", number())]);
    let result = check(
        vec![at(
            1,
            function_decl(
                "Box",
                &[],
                vec![
                    at(2, expr(assign(member(this(), "a"), number_lit(1)))),
                    at(3, return_(Some(number_lit(5)))),
                ],
            ),
        )],
        vec![sig::assignment(
            "Box",
            sig::method(this_type, Vec::new(), sig::literal("void")),
        )],
    );

    let diagnostic = single(&result);
    assert_eq!(diagnostic.kind, DiagnosticKind::NonVoidReturnInConstructor);
    assert_eq!(diagnostic.field("returnType"), Some("Number"));
    assert_eq!(diagnostic.line, Some(3));
}

#[test]
fn test_this_outside_function() {
    let result = check(vec![at(1, var("x", Some(this())))], Vec::new());
    assert_eq!(single(&result).kind, DiagnosticKind::ThisOutsideFunction);
}

#[test]
fn test_this_without_declared_type() {
    let result = check(
        vec![at(1, function_decl("run", &[], vec![at(2, var("self", Some(this())))]))],
        vec![sig::assignment("run", sig::function(Vec::new(), sig::literal("void")))],
    );

    let diagnostic = single(&result);
    assert_eq!(diagnostic.kind, DiagnosticKind::MissingThisType);
    assert_eq!(diagnostic.field("funcName"), Some("run"));
}

#[test]
fn test_untyped_function_declaration() {
    let result = check(vec![at(1, function_decl("helper", &[], Vec::new()))], Vec::new());

    let diagnostic = single(&result);
    assert_eq!(diagnostic.kind, DiagnosticKind::UntypedFunctionFound);
    assert_eq!(diagnostic.field("funcName"), Some("helper"));
}

#[test]
fn test_untyped_function_inferred_from_first_call() {
    let result = check(
        vec![
            at(1, function_decl("double", &["x"], vec![at(2, return_(Some(binary("*", ident("x"), number_lit(2)))))])),
            at(3, var("y", Some(call(ident("double"), vec![number_lit(5)])))),
            at(4, expr(call(ident("double"), vec![string("five")]))),
        ],
        Vec::new(),
    );

    // The first call fixes `double : (Number) => Number`.
    let diagnostic = single(&result);
    assert_eq!(diagnostic.kind, DiagnosticKind::TypeClassMismatch);
    assert_eq!(diagnostic.field("expected"), Some("Number"));
    assert_eq!(diagnostic.field("actual"), Some("String"));
    assert_eq!(diagnostic.line, Some(4));
}

#[test]
fn test_function_expression_without_context() {
    let result = check(
        vec![at(1, var("f", Some(function_expr(None, &[], Vec::new()))))],
        Vec::new(),
    );
    assert_eq!(single(&result).kind, DiagnosticKind::UntypedFunctionFound);
}

#[test]
fn test_function_expression_typed_by_declared_variable() {
    let result = check(
        vec![at(
            1,
            var(
                "inc",
                Some(function_expr(
                    None,
                    &["n"],
                    vec![at(2, return_(Some(binary("+", ident("n"), number_lit(1)))))],
                )),
            ),
        )],
        vec![sig::assignment("inc", sig::function(vec![number()], number()))],
    );
    assert_clean(&result);
}

fn number_lit(value: i64) -> jsig_ast::Expression {
    jsig_ast::builder::js::number(value)
}
