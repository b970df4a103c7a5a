//! Syntax trees consumed by the jsig checker.
//!
//! Two trees live here:
//! - `estree` - the analyzed JavaScript source, in ESTree shape with `loc`
//!   spans on every node
//! - `type_expr` - the signature-language tree produced from header files
//!
//! Both are plain data and deserialize from the JSON their external
//! parsers emit. `builder` has constructors for writing trees by hand.

pub mod builder;
pub mod estree;
pub mod type_expr;

pub use estree::{
    ArrayExpression, AssignmentExpression, BinaryExpression, BlockStatement, CallExpression,
    ConditionalExpression, Expression, ExpressionStatement, ForInit, ForStatement, Function,
    Identifier, IfStatement, Literal, LiteralKind, LogicalExpression, MemberExpression,
    ObjectExpression, Program, Property, ReturnStatement, SourceFile, Statement, ThisExpression,
    ThrowStatement, UnaryExpression, UpdateExpression, VariableDeclaration, VariableDeclarator,
    WhileStatement,
};
pub use type_expr::{
    GenericDescriptor, KeyValue, LocationSegment, TypeExpr, TypeProgram, TypeStatement,
};

#[cfg(test)]
#[path = "../tests/estree_json_tests.rs"]
mod estree_json_tests;
#[cfg(test)]
#[path = "../tests/type_expr_tests.rs"]
mod type_expr_tests;
