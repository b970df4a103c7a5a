//! ESTree-shaped source syntax tree.
//!
//! Node kinds are closed enums tagged by the ESTree `type` field, so the
//! verifier dispatches with an exhaustive `match`. Only the subset of the
//! language the checker understands is modeled; every node carries the `loc`
//! span used in diagnostics.

use jsig_common::SourceLocation;
use serde::{Deserialize, Serialize};

/// A parsed source file together with its text.
///
/// The text is kept for extracting source snippets of receivers in
/// diagnostics.
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub path: String,
    pub text: String,
    pub program: Program,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, text: impl Into<String>, program: Program) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            program,
        }
    }

    /// Parse a program from the JSON emitted by an ESTree parser.
    pub fn from_json(
        path: impl Into<String>,
        text: impl Into<String>,
        json: &str,
    ) -> serde_json::Result<Self> {
        let program: Program = serde_json::from_str(json)?;
        Ok(Self::new(path, text, program))
    }

    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }

    /// Source text covered by `loc`.
    pub fn snippet(&self, loc: &SourceLocation) -> String {
        loc.snippet(&self.lines())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<Statement>,
    #[serde(default)]
    pub loc: SourceLocation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Statement {
    VariableDeclaration(VariableDeclaration),
    FunctionDeclaration(Function),
    ExpressionStatement(ExpressionStatement),
    BlockStatement(BlockStatement),
    IfStatement(IfStatement),
    WhileStatement(WhileStatement),
    ForStatement(ForStatement),
    ReturnStatement(ReturnStatement),
    ThrowStatement(ThrowStatement),
    EmptyStatement(EmptyStatement),
}

impl Statement {
    pub fn loc(&self) -> SourceLocation {
        match self {
            Statement::VariableDeclaration(n) => n.loc,
            Statement::FunctionDeclaration(n) => n.loc,
            Statement::ExpressionStatement(n) => n.loc,
            Statement::BlockStatement(n) => n.loc,
            Statement::IfStatement(n) => n.loc,
            Statement::WhileStatement(n) => n.loc,
            Statement::ForStatement(n) => n.loc,
            Statement::ReturnStatement(n) => n.loc,
            Statement::ThrowStatement(n) => n.loc,
            Statement::EmptyStatement(n) => n.loc,
        }
    }

    pub fn is_function_declaration(&self) -> bool {
        matches!(self, Statement::FunctionDeclaration(_))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub declarations: Vec<VariableDeclarator>,
    #[serde(default = "default_var_kind")]
    pub kind: String,
    #[serde(default)]
    pub loc: SourceLocation,
}

fn default_var_kind() -> String {
    "var".to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclarator {
    pub id: Identifier,
    #[serde(default)]
    pub init: Option<Expression>,
    #[serde(default)]
    pub loc: SourceLocation,
}

/// Function declarations and function expressions share one shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Function {
    #[serde(default)]
    pub id: Option<Identifier>,
    pub params: Vec<Identifier>,
    pub body: BlockStatement,
    #[serde(default)]
    pub loc: SourceLocation,
}

impl Function {
    /// Declared name, or `anonymous` for unnamed function expressions.
    pub fn name(&self) -> &str {
        self.id.as_ref().map_or("anonymous", |id| id.name.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpressionStatement {
    pub expression: Expression,
    #[serde(default)]
    pub loc: SourceLocation,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockStatement {
    pub body: Vec<Statement>,
    #[serde(default)]
    pub loc: SourceLocation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IfStatement {
    pub test: Expression,
    pub consequent: Box<Statement>,
    #[serde(default)]
    pub alternate: Option<Box<Statement>>,
    #[serde(default)]
    pub loc: SourceLocation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WhileStatement {
    pub test: Expression,
    pub body: Box<Statement>,
    #[serde(default)]
    pub loc: SourceLocation,
}

/// `for` initializer: a declaration or a bare expression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ForInit {
    Declaration(VariableDeclaration),
    Expression(Expression),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForStatement {
    #[serde(default)]
    pub init: Option<ForInit>,
    #[serde(default)]
    pub test: Option<Expression>,
    #[serde(default)]
    pub update: Option<Expression>,
    pub body: Box<Statement>,
    #[serde(default)]
    pub loc: SourceLocation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReturnStatement {
    #[serde(default)]
    pub argument: Option<Expression>,
    #[serde(default)]
    pub loc: SourceLocation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThrowStatement {
    pub argument: Expression,
    #[serde(default)]
    pub loc: SourceLocation,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EmptyStatement {
    #[serde(default)]
    pub loc: SourceLocation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expression {
    Identifier(Identifier),
    Literal(Literal),
    ThisExpression(ThisExpression),
    ArrayExpression(ArrayExpression),
    ObjectExpression(ObjectExpression),
    FunctionExpression(Function),
    AssignmentExpression(AssignmentExpression),
    MemberExpression(MemberExpression),
    CallExpression(CallExpression),
    NewExpression(CallExpression),
    BinaryExpression(BinaryExpression),
    LogicalExpression(LogicalExpression),
    UnaryExpression(UnaryExpression),
    UpdateExpression(UpdateExpression),
    ConditionalExpression(ConditionalExpression),
}

impl Expression {
    pub fn loc(&self) -> SourceLocation {
        match self {
            Expression::Identifier(n) => n.loc,
            Expression::Literal(n) => n.loc,
            Expression::ThisExpression(n) => n.loc,
            Expression::ArrayExpression(n) => n.loc,
            Expression::ObjectExpression(n) => n.loc,
            Expression::FunctionExpression(n) => n.loc,
            Expression::AssignmentExpression(n) => n.loc,
            Expression::MemberExpression(n) => n.loc,
            Expression::CallExpression(n) | Expression::NewExpression(n) => n.loc,
            Expression::BinaryExpression(n) => n.loc,
            Expression::LogicalExpression(n) => n.loc,
            Expression::UnaryExpression(n) => n.loc,
            Expression::UpdateExpression(n) => n.loc,
            Expression::ConditionalExpression(n) => n.loc,
        }
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Expression::Identifier(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_member(&self) -> Option<&MemberExpression> {
        match self {
            Expression::MemberExpression(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_this(&self) -> bool {
        matches!(self, Expression::ThisExpression(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    #[serde(default)]
    pub loc: SourceLocation,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexLiteral {
    pub pattern: String,
    #[serde(default)]
    pub flags: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub regex: Option<RegexLiteral>,
    #[serde(default)]
    pub raw: Option<String>,
    #[serde(default)]
    pub loc: SourceLocation,
}

/// The primitive class of a literal's value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiteralKind {
    String,
    Number,
    Boolean,
    Null,
    RegExp,
}

impl Literal {
    pub fn kind(&self) -> LiteralKind {
        if self.regex.is_some() {
            return LiteralKind::RegExp;
        }
        match &self.value {
            serde_json::Value::String(_) => LiteralKind::String,
            serde_json::Value::Number(_) => LiteralKind::Number,
            serde_json::Value::Bool(_) => LiteralKind::Boolean,
            serde_json::Value::Null => LiteralKind::Null,
            // Parsers without RegExp support emit `{}` for regex values.
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => LiteralKind::RegExp,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    pub fn as_index(&self) -> Option<usize> {
        self.value.as_u64().map(|n| n as usize)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThisExpression {
    #[serde(default)]
    pub loc: SourceLocation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArrayExpression {
    pub elements: Vec<Expression>,
    #[serde(default)]
    pub loc: SourceLocation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectExpression {
    pub properties: Vec<Property>,
    #[serde(default)]
    pub loc: SourceLocation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub key: Expression,
    pub value: Expression,
    #[serde(default = "default_property_kind")]
    pub kind: String,
    #[serde(default)]
    pub loc: SourceLocation,
}

fn default_property_kind() -> String {
    "init".to_string()
}

impl Property {
    /// Key name for `a: ..` and `"a": ..` forms.
    pub fn key_name(&self) -> Option<&str> {
        match &self.key {
            Expression::Identifier(id) => Some(&id.name),
            Expression::Literal(lit) => lit.as_str(),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssignmentExpression {
    #[serde(default = "default_assign_op")]
    pub operator: String,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    #[serde(default)]
    pub loc: SourceLocation,
}

fn default_assign_op() -> String {
    "=".to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberExpression {
    pub object: Box<Expression>,
    pub property: Box<Expression>,
    #[serde(default)]
    pub computed: bool,
    #[serde(default)]
    pub loc: SourceLocation,
}

impl MemberExpression {
    /// Static property name for `a.b`; `None` for computed access.
    pub fn property_name(&self) -> Option<&str> {
        if self.computed {
            return None;
        }
        self.property.as_identifier().map(|id| id.name.as_str())
    }
}

/// Shared by call and `new` expressions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallExpression {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
    #[serde(default)]
    pub loc: SourceLocation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpression {
    pub operator: String,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    #[serde(default)]
    pub loc: SourceLocation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogicalExpression {
    pub operator: String,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    #[serde(default)]
    pub loc: SourceLocation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpression {
    pub operator: String,
    pub argument: Box<Expression>,
    #[serde(default = "default_true")]
    pub prefix: bool,
    #[serde(default)]
    pub loc: SourceLocation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateExpression {
    pub operator: String,
    pub argument: Box<Expression>,
    #[serde(default)]
    pub prefix: bool,
    #[serde(default)]
    pub loc: SourceLocation,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConditionalExpression {
    pub test: Box<Expression>,
    pub consequent: Box<Expression>,
    pub alternate: Box<Expression>,
    #[serde(default)]
    pub loc: SourceLocation,
}
