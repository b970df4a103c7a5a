use super::*;
use crate::test_utils::*;
use jsig_ast::builder::js::*;
use jsig_ast::builder::sig;
use jsig_ast::Statement;
use jsig_common::DiagnosticKind;

fn host_with(files: Vec<(&str, Vec<Statement>)>) -> MemoryHost {
    let mut host = MemoryHost::new();
    for (path, body) in files {
        host.add_source(source(path, "", body));
    }
    host
}

fn require_stmt(line: u32, name: &str, request: &str) -> Statement {
    at(line, var(name, Some(call(ident("require"), vec![string(request)]))))
}

fn foo_module(host: &mut MemoryHost) {
    host.add_source(source(
        "/app/foo.js",
        "",
        vec![
            at(
                1,
                function_decl(
                    "Foo",
                    &["x"],
                    vec![at(2, expr(assign(member(this(), "x"), ident("x"))))],
                ),
            ),
            at(4, expr(assign(member(ident("module"), "exports"), ident("Foo")))),
        ],
    ));
    host.add_header(
        "/app/foo.hjs",
        sig::program(vec![sig::assignment(
            "Foo",
            sig::method(
                sig::object(vec![("x", sig::literal("Number"))]),
                vec![sig::literal("Number")],
                sig::literal("void"),
            ),
        )]),
    );
}

#[test]
fn test_required_constructor_is_usable() {
    let mut host = host_with(vec![(
        MAIN,
        vec![
            require_stmt(1, "Foo", "./foo"),
            at(2, var("foo", Some(new(ident("Foo"), vec![number(1)])))),
            at(3, var("x", Some(binary("+", member(ident("foo"), "x"), number(1))))),
            at(4, expr(new(ident("Foo"), vec![string("one")]))),
        ],
    )]);
    foo_module(&mut host);

    let (program, result) = compile_host(host, CheckerOptions::default(), MAIN);
    let diagnostic = single(&result);
    assert_eq!(diagnostic.kind, DiagnosticKind::TypeClassMismatch);
    assert_eq!(diagnostic.file_name, MAIN);
    assert_eq!(diagnostic.line, Some(4));

    let dependency = program.compile("/app/foo.js").expect("dependency compiles");
    assert!(!dependency.has_errors());
    let exports = dependency.module_exports_type.expect("module exports");
    assert_eq!(
        program.format_type(exports),
        "(this: { x: Number }, Number) => void"
    );
}

#[test]
fn test_require_without_extension_or_with_dot_segments() {
    let mut host = host_with(vec![(
        "/app/lib/main.js",
        vec![require_stmt(1, "Foo", "../foo.js"), require_stmt(2, "Again", "./../foo")],
    )]);
    foo_module(&mut host);

    let (_, result) = compile_host(host, CheckerOptions::default(), "/app/lib/main.js");
    assert_clean(&result);
}

#[test]
fn test_cyclic_require() {
    let host = host_with(vec![
        ("/app/a.js", vec![require_stmt(1, "b", "./b")]),
        ("/app/b.js", vec![require_stmt(1, "a", "./a")]),
    ]);

    let (_, result) = compile_host(host, CheckerOptions::default(), "/app/a.js");
    let diagnostic = single(&result);
    assert_eq!(diagnostic.kind, DiagnosticKind::CyclicModuleImport);
    assert_eq!(diagnostic.file_name, "/app/b.js");
    assert_eq!(diagnostic.field("moduleName"), Some("./a"));
}

#[test]
fn test_unknown_modules() {
    let host = host_with(vec![(
        MAIN,
        vec![require_stmt(1, "nope", "./nope"), require_stmt(2, "lib", "lodash")],
    )]);

    let (_, result) = compile_host(host, CheckerOptions::default(), MAIN);
    let modules: Vec<_> = result
        .diagnostics
        .iter()
        .map(|d| (d.kind, d.field("moduleName")))
        .collect();
    assert_eq!(
        modules,
        vec![
            (DiagnosticKind::UnknownModuleRequire, Some("./nope")),
            (DiagnosticKind::UnknownModuleRequire, Some("lodash")),
        ]
    );
}

#[test]
fn test_bare_require_reads_definitions_directory() {
    let options = CheckerOptions {
        definitions: Some("/defs/".to_string()),
        ..CheckerOptions::default()
    };
    let mut host = host_with(vec![(
        MAIN,
        vec![
            require_stmt(1, "units", "units"),
            at(2, var("n", Some(call(member(ident("units"), "parse"), vec![string("3m")])))),
            at(3, var("m", Some(call(member(ident("units"), "parse"), vec![number(3)])))),
        ],
    )]);
    host.add_header(
        "/defs/units.hjs",
        sig::program(vec![sig::assignment(
            "parse",
            sig::function(vec![sig::literal("String")], sig::literal("Number")),
        )]),
    );

    let (_, result) = compile_host(host, options, MAIN);
    let diagnostic = single(&result);
    assert_eq!(diagnostic.kind, DiagnosticKind::TypeClassMismatch);
    assert_eq!(diagnostic.field("expected"), Some("String"));
    assert_eq!(diagnostic.line, Some(3));
}

#[test]
fn test_dependency_diagnostics_come_first_and_once() {
    let bad = |line: u32| at(line, var("bad", Some(binary("*", string("a"), number(1)))));
    let host = host_with(vec![
        (
            MAIN,
            vec![
                require_stmt(1, "a", "./a"),
                require_stmt(2, "b", "./b"),
                bad(3),
            ],
        ),
        ("/app/a.js", vec![bad(1)]),
        ("/app/b.js", vec![require_stmt(1, "a", "./a"), bad(2)]),
    ]);

    let (_, result) = compile_host(host, CheckerOptions::default(), MAIN);
    let files: Vec<_> = result
        .diagnostics
        .iter()
        .map(|d| (d.file_name.as_str(), d.line))
        .collect();
    assert_eq!(
        files,
        vec![("/app/a.js", Some(1)), ("/app/b.js", Some(2)), (MAIN, Some(3))]
    );
}

#[test]
fn test_missing_entry_file() {
    let program = Program::new(MemoryHost::new(), CheckerOptions::default()).expect("program should build");
    let err = program.compile("/app/./missing.js").expect_err("no such file");
    assert_eq!(err, CheckerError::SourceNotFound("/app/missing.js".to_string()));
}

#[test]
fn test_compile_is_memoized() {
    let host = host_with(vec![(
        MAIN,
        vec![at(1, var("bad", Some(binary("*", string("a"), number(1)))))],
    )]);
    let (program, first) = compile_host(host, CheckerOptions::default(), MAIN);
    let second = program.compile(MAIN).expect("second compile");
    assert_eq!(first.diagnostics, second.diagnostics);
}

// =============================================================================
// JSON ingestion
// =============================================================================

const TOTAL_JS: &str = "var total = add(1, \"2\");";

const TOTAL_ESTREE: &str = r#"{
  "type": "Program",
  "body": [{
    "type": "VariableDeclaration",
    "kind": "var",
    "declarations": [{
      "type": "VariableDeclarator",
      "id": { "type": "Identifier", "name": "total" },
      "init": {
        "type": "CallExpression",
        "callee": { "type": "Identifier", "name": "add",
          "loc": { "start": { "line": 1, "column": 12 }, "end": { "line": 1, "column": 15 } } },
        "arguments": [
          { "type": "Literal", "value": 1, "raw": "1",
            "loc": { "start": { "line": 1, "column": 16 }, "end": { "line": 1, "column": 17 } } },
          { "type": "Literal", "value": "2", "raw": "\"2\"",
            "loc": { "start": { "line": 1, "column": 19 }, "end": { "line": 1, "column": 22 } } }
        ],
        "loc": { "start": { "line": 1, "column": 12 }, "end": { "line": 1, "column": 23 } }
      }
    }],
    "loc": { "start": { "line": 1, "column": 0 }, "end": { "line": 1, "column": 24 } }
  }]
}"#;

const TOTAL_HEADER: &str = r#"{
  "type": "program",
  "statements": [
    { "type": "assignment", "identifier": "add",
      "typeExpression": {
        "type": "function",
        "args": [
          { "type": "typeLiteral", "name": "Number" },
          { "type": "typeLiteral", "name": "Number" }
        ],
        "result": { "type": "typeLiteral", "name": "Number" }
      } }
  ]
}"#;

#[test]
fn test_json_inputs_check_end_to_end() {
    let mut host = MemoryHost::new();
    host.add_source_json(MAIN, TOTAL_JS, TOTAL_ESTREE)
        .expect("valid estree json");
    host.add_header_json(MAIN_HEADER, TOTAL_HEADER)
        .expect("valid header json");

    let (_, result) = compile_host(host, CheckerOptions::default(), MAIN);
    let diagnostic = single(&result);
    assert_eq!(diagnostic.kind, DiagnosticKind::TypeClassMismatch);
    assert_eq!(diagnostic.field("actual"), Some("String"));
    assert_eq!(diagnostic.line, Some(1));
    let loc = diagnostic.loc.expect("located");
    assert_eq!(loc.snippet(&[TOTAL_JS]), "\"2\"");
}

#[test]
fn test_invalid_json_is_rejected() {
    let mut host = MemoryHost::new();
    let err = host
        .add_header_json(MAIN_HEADER, "{ \"type\": \"program\", \"statements\": 3 }")
        .err()
        .expect("malformed header");
    assert!(matches!(err, CheckerError::InvalidJson { kind: "header", .. }));
}

#[test]
fn test_module_tokens_are_bound() {
    let mut host = host_with(vec![(
        MAIN,
        vec![
            at(1, var("dir", Some(ident("__dirname")))),
            at(2, var("count", Some(ident("__filename")))),
        ],
    )]);
    host.add_header(
        MAIN_HEADER,
        sig::program(vec![
            sig::assignment("dir", sig::literal("String")),
            sig::assignment("count", sig::literal("Number")),
        ]),
    );
    let (_, result) = compile_host(host, CheckerOptions::default(), MAIN);

    let diagnostic = single(&result);
    assert_eq!(diagnostic.kind, DiagnosticKind::TypeClassMismatch);
    assert_eq!(diagnostic.field("expected"), Some("Number"));
    assert_eq!(diagnostic.field("actual"), Some("String"));
    assert_eq!(diagnostic.line, Some(2));
}
