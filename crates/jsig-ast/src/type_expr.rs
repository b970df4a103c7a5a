//! Signature-language type-expression tree.
//!
//! This is the immutable output of the header-file grammar. The checker never
//! parses signature text itself; it lowers these trees into interned types.
//! The serde layout follows the JSON the grammar emits (`type` discriminant,
//! camelCase keys).

use serde::{Deserialize, Serialize};

/// Type names that the grammar treats as built in.
pub const BUILTIN_TYPE_NAMES: &[&str] = &[
    "String", "Number", "Boolean", "void", "Any", "Mixed", "Object", "Array", "RegExp",
    "Function", "Error", "Date", "Buffer",
];

pub fn is_builtin_type_name(name: &str) -> bool {
    BUILTIN_TYPE_NAMES.contains(&name)
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeProgram {
    pub statements: Vec<TypeStatement>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TypeStatement {
    #[serde(rename = "typeDeclaration", rename_all = "camelCase")]
    TypeDeclaration {
        identifier: String,
        type_expression: TypeExpr,
        #[serde(default)]
        generics: Vec<TypeExpr>,
    },
    #[serde(rename = "assignment", rename_all = "camelCase")]
    Assignment {
        identifier: String,
        type_expression: TypeExpr,
    },
    #[serde(rename = "import")]
    Import {
        dependency: String,
        types: Vec<TypeExpr>,
    },
    #[serde(rename = "comment")]
    Comment { text: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TypeExpr {
    #[serde(rename = "object")]
    Object(ObjectExpr),
    #[serde(rename = "unionType")]
    Union(UnionExpr),
    #[serde(rename = "intersectionType")]
    Intersection(IntersectionExpr),
    #[serde(rename = "typeLiteral")]
    Literal(LiteralExpr),
    #[serde(rename = "valueLiteral")]
    Value(ValueExpr),
    #[serde(rename = "function")]
    Function(FunctionExpr),
    #[serde(rename = "genericLiteral")]
    Generic(GenericExpr),
    #[serde(rename = "tuple")]
    Tuple(TupleExpr),
    #[serde(rename = "renamedLiteral")]
    Renamed(RenamedExpr),
    #[serde(rename = "freeLiteral")]
    Free(FreeExpr),
}

impl TypeExpr {
    /// Display name when embedded as a field or argument.
    pub fn label(&self) -> Option<&str> {
        match self {
            TypeExpr::Object(e) => e.label.as_deref(),
            TypeExpr::Union(e) => e.label.as_deref(),
            TypeExpr::Intersection(e) => e.label.as_deref(),
            TypeExpr::Literal(e) => e.label.as_deref(),
            TypeExpr::Value(e) => e.label.as_deref(),
            TypeExpr::Function(e) => e.label.as_deref(),
            TypeExpr::Generic(e) => e.label.as_deref(),
            TypeExpr::Tuple(e) => e.label.as_deref(),
            TypeExpr::Renamed(e) => e.label.as_deref(),
            TypeExpr::Free(_) => None,
        }
    }

    /// Optional is only meaningful as an argument or field attribute.
    pub fn is_optional(&self) -> bool {
        match self {
            TypeExpr::Object(e) => e.optional,
            TypeExpr::Union(e) => e.optional,
            TypeExpr::Intersection(e) => e.optional,
            TypeExpr::Literal(e) => e.optional,
            TypeExpr::Function(e) => e.optional,
            TypeExpr::Tuple(e) => e.optional,
            TypeExpr::Renamed(e) => e.optional,
            TypeExpr::Value(_) | TypeExpr::Generic(_) | TypeExpr::Free(_) => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectExpr {
    pub key_values: Vec<KeyValue>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub open: bool,
    #[serde(default = "default_brand")]
    pub brand: String,
}

fn default_brand() -> String {
    "Object".to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: TypeExpr,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnionExpr {
    pub unions: Vec<TypeExpr>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntersectionExpr {
    pub intersections: Vec<TypeExpr>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LiteralExpr {
    pub name: String,
    #[serde(default)]
    pub builtin: Option<bool>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

impl LiteralExpr {
    /// Explicit flag from the grammar, else the built-in name table.
    pub fn is_builtin(&self) -> bool {
        self.builtin
            .unwrap_or_else(|| is_builtin_type_name(&self.name))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueExpr {
    pub value: String,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionExpr {
    pub args: Vec<TypeExpr>,
    pub result: Box<TypeExpr>,
    #[serde(default)]
    pub this_arg: Option<Box<TypeExpr>>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub generics: Vec<GenericDescriptor>,
    #[serde(default = "default_brand")]
    pub brand: String,
}

/// A generic variable and the path to one place it occurs in the function.
///
/// A variable occurring in several places has one descriptor per occurrence,
/// e.g. `T` at `["thisArg", "generics", 0]` and at `["args", 0]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericDescriptor {
    pub name: String,
    pub location: Vec<LocationSegment>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationSegment {
    Index(usize),
    Key(String),
}

impl From<usize> for LocationSegment {
    fn from(value: usize) -> Self {
        LocationSegment::Index(value)
    }
}

impl From<&str> for LocationSegment {
    fn from(value: &str) -> Self {
        LocationSegment::Key(value.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenericExpr {
    pub value: Box<TypeExpr>,
    pub generics: Vec<TypeExpr>,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TupleExpr {
    pub values: Vec<TypeExpr>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

/// `Foo as Bar`: a nominal alias for `original`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenamedExpr {
    pub name: String,
    #[serde(default)]
    pub builtin: bool,
    pub original: Box<TypeExpr>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeExpr {
    pub name: String,
}
