use super::*;
use crate::test_utils::*;
use jsig_ast::builder::js::*;
use jsig_ast::builder::sig;
use jsig_ast::{LocationSegment, TypeStatement};
use jsig_common::DiagnosticKind;

fn compile_with_headers(body: Vec<jsig_ast::Statement>, headers: Vec<(&str, Vec<TypeStatement>)>) -> CompileResult {
    let mut host = MemoryHost::new();
    host.add_source(source(MAIN, "", body));
    for (path, statements) in headers {
        host.add_header(path, sig::program(statements));
    }
    let (_, result) = compile_host(host, CheckerOptions::default(), MAIN);
    result
}

fn shapes_header() -> Vec<TypeStatement> {
    vec![sig::declaration(
        "Point",
        &[],
        sig::object(vec![("x", sig::literal("Number"))]),
    )]
}

#[test]
fn test_unknown_literal_reported_against_header() {
    let result = check(
        Vec::new(),
        vec![sig::assignment("thing", sig::literal("Widget"))],
    );

    let diagnostic = single(&result);
    assert_eq!(diagnostic.kind, DiagnosticKind::UnknownLiteral);
    assert_eq!(diagnostic.field("literal"), Some("Widget"));
    assert_eq!(diagnostic.file_name, MAIN_HEADER);
    assert_eq!(diagnostic.line, None);
}

#[test]
fn test_type_declaration_binds_its_shape() {
    let header = vec![
        sig::declaration("Point", &[], sig::object(vec![("x", sig::literal("Number"))])),
        sig::assignment("origin", sig::literal("Point")),
    ];

    let (program, result) = check_program(
        vec![at(1, var("origin", Some(object(vec![("x", number(0))]))))],
        header.clone(),
    );
    assert_clean(&result);
    let lowered = program
        .resolved_header(MAIN_HEADER)
        .expect("header lowers")
        .expect("header exists");
    assert_eq!(program.format_type(lowered.declarations["Point"]), "{ x: Number }");

    let result = check(
        vec![at(1, var("origin", Some(object(vec![("x", string("0"))]))))],
        header,
    );
    let diagnostic = single(&result);
    assert_eq!(diagnostic.kind, DiagnosticKind::TypeClassMismatch);
    assert_eq!(diagnostic.field("expected"), Some("Number"));
}

#[test]
fn test_generic_declaration_applies_its_arguments() {
    let header = vec![
        sig::declaration(
            "Box",
            &["T"],
            sig::object(vec![("value", sig::literal("T"))]),
        ),
        sig::assignment(
            "boxed",
            sig::generic(sig::literal("Box"), vec![sig::literal("String")]),
        ),
    ];

    let result = check(
        vec![at(1, var("boxed", Some(object(vec![("value", number(1))]))))],
        header,
    );
    let diagnostic = single(&result);
    assert_eq!(diagnostic.kind, DiagnosticKind::TypeClassMismatch);
    assert_eq!(diagnostic.field("expected"), Some("String"));
    assert_eq!(diagnostic.field("actual"), Some("Number"));
}

#[test]
fn test_self_referential_declaration_stays_nominal() {
    let header = vec![
        sig::declaration(
            "Node",
            &[],
            sig::object(vec![(
                "next",
                sig::union(vec![sig::literal("Node"), sig::value("null")]),
            )]),
        ),
        sig::assignment("head", sig::literal("Node")),
    ];
    let (program, result) = check_program(Vec::new(), header);
    assert_clean(&result);

    let lowered = program
        .resolved_header(MAIN_HEADER)
        .expect("header lowers")
        .expect("header exists");
    assert_eq!(
        program.format_type(lowered.declarations["Node"]),
        "{ next: Node | null }"
    );
}

#[test]
fn test_import_from_sibling_header() {
    let result = compile_with_headers(
        vec![at(1, var("origin", Some(object(vec![("x", string("0"))]))))],
        vec![
            ("/app/shapes.hjs", shapes_header()),
            (
                MAIN_HEADER,
                vec![
                    sig::import("./shapes", vec![sig::literal("Point")]),
                    sig::assignment("origin", sig::literal("Point")),
                ],
            ),
        ],
    );

    let diagnostic = single(&result);
    assert_eq!(diagnostic.kind, DiagnosticKind::TypeClassMismatch);
    assert_eq!(diagnostic.field("expected"), Some("Number"));
    assert_eq!(diagnostic.field("actual"), Some("String"));
}

#[test]
fn test_renamed_import_keeps_the_local_name() {
    let result = compile_with_headers(
        vec![
            at(1, var("n", Some(binary("+", member(ident("origin"), "x"), number(1))))),
            at(2, var("m", Some(member(ident("origin"), "y")))),
        ],
        vec![
            ("/app/shapes.hjs", shapes_header()),
            (
                MAIN_HEADER,
                vec![
                    sig::import("./shapes", vec![sig::renamed("P", sig::literal("Point"))]),
                    sig::assignment("origin", sig::literal("P")),
                ],
            ),
        ],
    );

    let diagnostic = single(&result);
    assert_eq!(diagnostic.kind, DiagnosticKind::NonExistentField);
    assert_eq!(diagnostic.field("fieldName"), Some("y"));
    assert_eq!(diagnostic.line, Some(2));
}

#[test]
fn test_import_of_undeclared_name() {
    let result = compile_with_headers(
        Vec::new(),
        vec![
            ("/app/shapes.hjs", shapes_header()),
            (
                MAIN_HEADER,
                vec![sig::import("./shapes", vec![sig::literal("Circle")])],
            ),
        ],
    );

    let diagnostic = single(&result);
    assert_eq!(diagnostic.kind, DiagnosticKind::UnknownLiteral);
    assert_eq!(diagnostic.field("literal"), Some("Circle"));
}

#[test]
fn test_import_from_missing_header() {
    let result = check(
        Vec::new(),
        vec![sig::import("./missing", vec![sig::literal("Point")])],
    );

    let diagnostic = single(&result);
    assert_eq!(diagnostic.kind, DiagnosticKind::UnresolvedHeaderImport);
    assert_eq!(diagnostic.field("moduleName"), Some("./missing"));
}

#[test]
fn test_import_from_bare_module_name() {
    let result = check(
        Vec::new(),
        vec![sig::import("lodash", vec![sig::literal("Chain")])],
    );

    let diagnostic = single(&result);
    assert_eq!(diagnostic.kind, DiagnosticKind::MissingDefinition);
    assert_eq!(diagnostic.field("moduleName"), Some("lodash"));
}

#[test]
fn test_cyclic_header_imports() {
    let result = compile_with_headers(
        Vec::new(),
        vec![
            (
                "/app/a.hjs",
                vec![
                    sig::import("./main", vec![sig::literal("Root")]),
                    sig::declaration("Leaf", &[], sig::literal("String")),
                ],
            ),
            (
                MAIN_HEADER,
                vec![
                    sig::import("./a", vec![sig::literal("Leaf")]),
                    sig::declaration("Root", &[], sig::literal("Number")),
                ],
            ),
        ],
    );

    let diagnostic = single(&result);
    assert_eq!(diagnostic.code(), "jsig.header-file.unresolved-import");
    assert_eq!(diagnostic.file_name, "/app/a.hjs");
    assert_eq!(diagnostic.field("moduleName"), Some("./main"));
}

#[test]
fn test_optional_assignment_aborts() {
    let mut host = MemoryHost::new();
    host.add_source(source(MAIN, "", Vec::new()));
    host.add_header(
        MAIN_HEADER,
        sig::program(vec![sig::assignment("name", sig::optional(sig::literal("String")))]),
    );
    let program = Program::new(host, CheckerOptions::default()).expect("program should build");

    let err = program.compile(MAIN).expect_err("optional binding must abort");
    assert_eq!(err, CheckerError::OptionalAssignment("name".to_string()));
}

fn compile_identity_with_location(location: Vec<LocationSegment>) -> CheckerError {
    let identity = sig::with_generics(
        sig::function(vec![sig::literal("T")], sig::literal("T")),
        vec![("T", location), ("T", vec![LocationSegment::Key("result".to_string())])],
    );
    let mut host = MemoryHost::new();
    host.add_source(source(
        MAIN,
        "",
        vec![at(1, expr(call(ident("id"), vec![number(1)])))],
    ));
    host.add_header(MAIN_HEADER, sig::program(vec![sig::assignment("id", identity)]));
    let program = Program::new(host, CheckerOptions::default()).expect("program should build");
    program.compile(MAIN).expect_err("bad location must abort")
}

#[test]
fn test_malformed_generic_location_aborts() {
    let err = compile_identity_with_location(vec![LocationSegment::Key("params".to_string()), 0usize.into()]);
    assert!(
        matches!(&err, CheckerError::MalformedGenericLocation { name, .. } if name == "T"),
        "unexpected error: {err}"
    );
}

#[test]
fn test_generic_location_outside_the_function_aborts() {
    let err = compile_identity_with_location(vec![LocationSegment::Key("args".to_string()), 3usize.into()]);
    assert!(
        matches!(&err, CheckerError::MalformedGenericLocation { name, .. } if name == "T"),
        "unexpected error: {err}"
    );
}

#[test]
fn test_constructor_assignment_is_branded() {
    let header = vec![
        sig::assignment(
            "Counter",
            sig::method(
                sig::object(vec![("count", sig::literal("Number"))]),
                Vec::new(),
                sig::literal("void"),
            ),
        ),
        sig::assignment(
            "tally",
            sig::method(
                sig::object(vec![("count", sig::literal("Number"))]),
                Vec::new(),
                sig::literal("void"),
            ),
        ),
    ];
    let (program, result) = check_program(Vec::new(), header);
    assert_clean(&result);

    let lowered = program
        .resolved_header(MAIN_HEADER)
        .expect("header lowers")
        .expect("header exists");
    let types = program.types();
    let brand_of = |index: usize| {
        let shape = types
            .function_shape(lowered.assignments[index].1)
            .expect("function type");
        let instance = types
            .object_shape(shape.this_arg.expect("this type"))
            .expect("object this");
        (
            types.resolve_atom(shape.brand),
            types.resolve_atom(instance.brand),
        )
    };
    assert_eq!(brand_of(0), ("Counter".to_string(), "Counter".to_string()));
    assert_eq!(brand_of(1), ("Object".to_string(), "Object".to_string()));
}

#[test]
fn test_branded_instances_are_not_interchangeable() {
    let reading = || sig::object(vec![("value", sig::literal("Number"))]);
    let header = vec![
        sig::assignment("Meters", sig::method(reading(), Vec::new(), sig::literal("void"))),
        sig::assignment("Feet", sig::method(reading(), Vec::new(), sig::literal("void"))),
    ];
    let result = check(
        vec![
            at(1, var("length", Some(new(ident("Meters"), Vec::new())))),
            at(2, expr(assign(ident("length"), new(ident("Feet"), Vec::new())))),
        ],
        header,
    );

    let diagnostic = single(&result);
    assert_eq!(diagnostic.kind, DiagnosticKind::BrandMismatch);
    assert_eq!(diagnostic.line, Some(2));
}

// =============================================================================
// Globals file
// =============================================================================

#[test]
fn test_globals_file_extends_global_scope() {
    let options = CheckerOptions {
        globals_file: Some("/lib/globals.hjs".to_string()),
        ..CheckerOptions::default()
    };
    let mut host = MemoryHost::new();
    host.add_header(
        "/lib/globals.hjs",
        sig::program(vec![sig::assignment("appName", sig::literal("String"))]),
    );
    host.add_source(source(
        MAIN,
        "",
        vec![
            at(1, var("size", Some(member(ident("appName"), "length")))),
            at(2, var("twice", Some(binary("*", ident("appName"), number(2))))),
        ],
    ));

    let (_, result) = compile_host(host, options, MAIN);
    let diagnostic = single(&result);
    assert_eq!(diagnostic.kind, DiagnosticKind::TypeClassMismatch);
    assert_eq!(diagnostic.field("actual"), Some("String"));
    assert_eq!(diagnostic.line, Some(2));
}

#[test]
fn test_missing_globals_file_is_an_error() {
    let options = CheckerOptions {
        globals_file: Some("/lib/globals.hjs".to_string()),
        ..CheckerOptions::default()
    };
    let err = Program::new(MemoryHost::new(), options)
        .err()
        .expect("missing globals file must fail");
    assert_eq!(err, CheckerError::SourceNotFound("/lib/globals.hjs".to_string()));
}
