//! `require` resolution across files.

use jsig::ast::builder::js::*;
use jsig::ast::builder::sig;
use jsig::ast::Statement;
use jsig::{CheckerError, CheckerOptions, DiagnosticKind, MemoryHost};

fn require_stmt(line: u32, name: &str, request: &str) -> Statement {
    at(line, var(name, Some(call(ident("require"), vec![string(request)]))))
}

fn exporting(value: jsig::ast::Expression) -> Vec<Statement> {
    vec![at(1, expr(assign(member(ident("module"), "exports"), value)))]
}

#[test]
fn test_export_types_flow_through_a_chain() {
    let mut host = MemoryHost::new();
    host.add_source(source("/lib/config.js", "", exporting(object(vec![("port", number(80))]))));
    host.add_source(source(
        "/lib/server.js",
        "",
        vec![
            require_stmt(1, "config", "./config"),
            at(2, expr(assign(member(ident("module"), "exports"), member(ident("config"), "port")))),
        ],
    ));
    host.add_source(source(
        "/app.js",
        "",
        vec![
            require_stmt(1, "port", "./lib/server"),
            at(2, var("next", Some(binary("+", ident("port"), number(1))))),
            at(3, var("bad", Some(member(ident("port"), "host")))),
        ],
    ));

    let result = jsig::compile(host, CheckerOptions::default(), "/app.js").expect("compile should succeed");
    let kinds: Vec<_> = result.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DiagnosticKind::NonExistentField]);
    assert_eq!(result.diagnostics[0].field("fieldName"), Some("host"));
}

#[test]
fn test_module_without_exports_is_any() {
    let mut host = MemoryHost::new();
    host.add_source(source("/side.js", "", vec![at(1, var("unused", Some(number(1))))]));
    host.add_source(source(
        "/main.js",
        "",
        vec![
            require_stmt(1, "side", "./side"),
            at(2, expr(call(member(ident("side"), "anything"), vec![number(1)]))),
        ],
    ));

    let result = jsig::compile(host, CheckerOptions::default(), "/main.js").expect("compile should succeed");
    assert!(!result.has_errors(), "unexpected: {:#?}", result.diagnostics);
}

#[test]
fn test_cycle_reported_on_the_closing_require() {
    let mut host = MemoryHost::new();
    host.add_source(source("/a.js", "", vec![require_stmt(1, "b", "./b")]));
    host.add_source(source("/b.js", "", vec![require_stmt(1, "c", "./c")]));
    host.add_source(source("/c.js", "", vec![require_stmt(1, "a", "./a")]));

    let result = jsig::compile(host, CheckerOptions::default(), "/a.js").expect("compile should succeed");
    let reported: Vec<_> = result
        .diagnostics
        .iter()
        .map(|d| (d.kind, d.file_name.as_str()))
        .collect();
    assert_eq!(reported, vec![(DiagnosticKind::CyclicModuleImport, "/c.js")]);
}

#[test]
fn test_definitions_directory_for_bare_names() {
    let options = CheckerOptions {
        definitions: Some("/types".to_string()),
        ..CheckerOptions::default()
    };
    let mut host = MemoryHost::new();
    host.add_header(
        "/types/path.hjs",
        sig::program(vec![
            sig::assignment(
                "join",
                sig::function(
                    vec![sig::literal("String"), sig::literal("String")],
                    sig::literal("String"),
                ),
            ),
            sig::assignment("sep", sig::literal("String")),
        ]),
    );
    host.add_source(source(
        "/main.js",
        "",
        vec![
            require_stmt(1, "path", "path"),
            at(2, var("full", Some(call(member(ident("path"), "join"), vec![string("a"), member(ident("path"), "sep")])))),
            at(3, var("broken", Some(call(member(ident("path"), "join"), vec![string("a")])))),
        ],
    ));

    let result = jsig::compile(host, options, "/main.js").expect("compile should succeed");
    let kinds: Vec<_> = result.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DiagnosticKind::TooFewArgsInCall]);
    assert_eq!(result.diagnostics[0].line, Some(3));
}

#[test]
fn test_missing_entry_is_an_error() {
    let err = jsig::compile(MemoryHost::new(), CheckerOptions::default(), "/nowhere.js")
        .expect_err("no entry file");
    assert_eq!(err, CheckerError::SourceNotFound("/nowhere.js".to_string()));
}
