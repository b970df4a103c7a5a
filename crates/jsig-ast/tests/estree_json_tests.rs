use crate::builder::js;
use crate::estree::*;

const PROGRAM_JSON: &str = r#"{
  "type": "Program",
  "body": [
    {
      "type": "VariableDeclaration",
      "kind": "var",
      "declarations": [{
        "type": "VariableDeclarator",
        "id": { "type": "Identifier", "name": "foo", "loc": { "start": { "line": 1, "column": 4 }, "end": { "line": 1, "column": 7 } } },
        "init": { "type": "ArrayExpression", "elements": [] },
        "loc": { "start": { "line": 1, "column": 4 }, "end": { "line": 1, "column": 12 } }
      }],
      "loc": { "start": { "line": 1, "column": 0 }, "end": { "line": 1, "column": 13 } }
    },
    {
      "type": "ExpressionStatement",
      "expression": {
        "type": "CallExpression",
        "callee": {
          "type": "MemberExpression",
          "object": { "type": "Identifier", "name": "foo" },
          "property": { "type": "Identifier", "name": "push" },
          "computed": false
        },
        "arguments": [{ "type": "Literal", "value": "bar", "raw": "\"bar\"" }],
        "loc": { "start": { "line": 2, "column": 0 }, "end": { "line": 2, "column": 15 } }
      }
    },
    {
      "type": "ForStatement",
      "init": {
        "type": "VariableDeclaration",
        "kind": "var",
        "declarations": [{ "type": "VariableDeclarator", "id": { "type": "Identifier", "name": "i" }, "init": { "type": "Literal", "value": 0 } }]
      },
      "test": null,
      "update": { "type": "UpdateExpression", "operator": "++", "prefix": false, "argument": { "type": "Identifier", "name": "i" } },
      "body": { "type": "BlockStatement", "body": [] }
    }
  ]
}"#;

#[test]
fn test_program_deserializes_from_estree_json() {
    let source = SourceFile::from_json("a.js", "var foo = [];\nfoo.push(\"bar\");", PROGRAM_JSON)
        .expect("valid estree json");
    let body = &source.program.body;
    assert_eq!(body.len(), 3);

    let Statement::VariableDeclaration(decl) = &body[0] else {
        panic!("expected a variable declaration");
    };
    assert_eq!(decl.declarations[0].id.name, "foo");
    assert!(matches!(
        decl.declarations[0].init,
        Some(Expression::ArrayExpression(_))
    ));

    let Statement::ExpressionStatement(stmt) = &body[1] else {
        panic!("expected an expression statement");
    };
    let Expression::CallExpression(call) = &stmt.expression else {
        panic!("expected a call");
    };
    assert_eq!(call.loc.line(), 2);
    let member = call.callee.as_member().expect("member callee");
    assert_eq!(member.property_name(), Some("push"));

    let Statement::ForStatement(for_stmt) = &body[2] else {
        panic!("expected a for statement");
    };
    assert!(matches!(for_stmt.init, Some(ForInit::Declaration(_))));
    assert!(for_stmt.test.is_none());
}

#[test]
fn test_literal_kinds() {
    let kind = |e: Expression| match e {
        Expression::Literal(lit) => lit.kind(),
        _ => panic!("not a literal"),
    };
    assert_eq!(kind(js::string("a")), LiteralKind::String);
    assert_eq!(kind(js::number(3)), LiteralKind::Number);
    assert_eq!(kind(js::boolean(true)), LiteralKind::Boolean);
    assert_eq!(kind(js::null()), LiteralKind::Null);
    assert_eq!(kind(js::regex("a+")), LiteralKind::RegExp);
}

#[test]
fn test_at_places_unplaced_nodes_only() {
    let inner = js::at(3, js::expr(js::ident("b")));
    let func = js::at(2, js::function_decl("f", &["a"], vec![inner]));

    let Statement::FunctionDeclaration(f) = &func else {
        panic!("expected function");
    };
    assert_eq!(f.loc.line(), 2);
    assert_eq!(f.params[0].loc.line(), 2);
    assert_eq!(f.body.body[0].loc().line(), 3);
}

#[test]
fn test_source_snippet_uses_text() {
    let source = js::source("a.js", "var x = foo.bar;", vec![]);
    let loc = jsig_common::SourceLocation::on_line(1, 8, 15);
    assert_eq!(source.snippet(&loc), "foo.bar");
}
