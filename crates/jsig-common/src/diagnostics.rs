//! Structured diagnostics produced by the checker.
//!
//! Every diagnostic has a stable kind code (e.g.
//! `jsig.verify.too-many-function-args`), the file it belongs to, an optional
//! source span, and an ordered set of named fields. The human-readable
//! message is rendered from the kind's template by substituting `{field}`
//! placeholders.

use crate::position::SourceLocation;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    TooManyArgsInFunc,
    TooFewArgsInFunc,
    TooManyArgsInCall,
    TooFewArgsInCall,
    MissingFieldInConstructor,
    NonExistentField,
    UnionFieldAccess,
    UntypedFunctionCall,
    UntypedFunctionFound,
    UnknownIdentifier,
    ThisOutsideFunction,
    MissingThisType,
    NonVoidReturnInConstructor,
    ReturnStatementInConstructor,
    MissingReturnStatement,
    CallingConstructorWithoutNew,
    ConstructorThisTypeMustBeObject,
    ConstructorMustReturnVoid,
    ConstructorMustBePascalCase,
    CallingNonFunction,
    UnresolvedGeneric,
    IntersectionOperatorCallMismatch,
    UnknownModuleRequire,
    CyclicModuleImport,
    TypeClassMismatch,
    MissingObjectField,
    BrandMismatch,
    FunctionArgCountMismatch,
    UnknownLiteral,
    MissingDefinition,
    UnresolvedHeaderImport,
}

impl DiagnosticKind {
    /// Stable string code used by consumers to match diagnostics.
    pub const fn code(self) -> &'static str {
        match self {
            Self::TooManyArgsInFunc => "jsig.verify.too-many-function-args",
            Self::TooFewArgsInFunc => "jsig.verify.too-few-function-args",
            Self::TooManyArgsInCall => "jsig.verify.too-many-args-in-call",
            Self::TooFewArgsInCall => "jsig.verify.too-few-args-in-call",
            Self::MissingFieldInConstructor => "jsig.verify.missing-field-in-constructor",
            Self::NonExistentField => "jsig.verify.non-existant-field",
            Self::UnionFieldAccess => "jsig.verify.accessing-field-on-union",
            Self::UntypedFunctionCall => "jsig.verify.calling-untyped-function",
            Self::UntypedFunctionFound => "jsig.verify.untyped-function-found",
            Self::UnknownIdentifier => "jsig.verify.unknown-identifier",
            Self::ThisOutsideFunction => "jsig.verify.this-outside-function",
            Self::MissingThisType => "jsig.verify.missing-this-type",
            Self::NonVoidReturnInConstructor => "jsig.verify.non-void-return-in-constructor",
            Self::ReturnStatementInConstructor => "jsig.verify.return-statement-in-constructor",
            Self::MissingReturnStatement => "jsig.verify.missing-return-statement",
            Self::CallingConstructorWithoutNew => "jsig.verify.constructor-without-new",
            Self::ConstructorThisTypeMustBeObject => {
                "jsig.verify.constructor-this-type-must-be-object"
            }
            Self::ConstructorMustReturnVoid => "jsig.verify.constructor-must-return-void",
            Self::ConstructorMustBePascalCase => "jsig.verify.constructor-must-be-pascal-case",
            Self::CallingNonFunction => "jsig.verify.calling-non-function",
            Self::UnresolvedGeneric => "jsig.verify.unresolved-generic",
            Self::IntersectionOperatorCallMismatch => {
                "jsig.verify.intersection-operator-call-mismatch"
            }
            Self::UnknownModuleRequire => "jsig.verify.unknown-module-require",
            Self::CyclicModuleImport => "jsig.verify.cyclic-module-import",
            Self::TypeClassMismatch => "jsig.sub-type.type-class-mismatch",
            Self::MissingObjectField => "jsig.sub-type.missing-object-field",
            Self::BrandMismatch => "jsig.sub-type.brand-mismatch",
            Self::FunctionArgCountMismatch => "jsig.sub-type.function-arg-count-mismatch",
            Self::UnknownLiteral => "jsig.header-file.unknown-literal",
            Self::MissingDefinition => "jsig.header-file.missing-definition",
            Self::UnresolvedHeaderImport => "jsig.header-file.unresolved-import",
        }
    }

    /// Message template; `{name}` placeholders are filled from the fields.
    pub const fn template(self) -> &'static str {
        match self {
            Self::TooManyArgsInFunc | Self::TooFewArgsInFunc => {
                "@{line}: Expected the function {funcName} to have exactly {expectedArgs} arguments but instead has {actualArgs}."
            }
            Self::TooManyArgsInCall => {
                "@{line}: Expected the function {funcName} to be called with at most {expectedArgs} arguments but got {actualArgs}."
            }
            Self::TooFewArgsInCall => {
                "@{line}: Expected the function {funcName} to be called with at least {expectedArgs} arguments but got {actualArgs}."
            }
            Self::MissingFieldInConstructor => {
                "@{line}: Expected the field: {fieldName} to be defined but instead found: {otherField}."
            }
            Self::NonExistentField => "@{line}: Object {objName} does not have field {fieldName}.",
            Self::UnionFieldAccess => {
                "@{line}: Cannot access field {fieldName} of union type {unionType} without narrowing."
            }
            Self::UntypedFunctionCall => "@{line}: Cannot call untyped function {funcName}.",
            Self::UntypedFunctionFound => {
                "@{line}: Found untyped function {funcName}; it needs a type signature."
            }
            Self::UnknownIdentifier => "@{line}: Could not find identifier {token}.",
            Self::ThisOutsideFunction => "@{line}: Cannot use `this` outside of a function.",
            Self::MissingThisType => {
                "@{line}: The function {funcName} uses `this` but declares no this type."
            }
            Self::NonVoidReturnInConstructor => {
                "@{line}: The constructor {funcName} must not return a value but returns {returnType}."
            }
            Self::ReturnStatementInConstructor => {
                "@{line}: The constructor {funcName} must not contain a return statement."
            }
            Self::MissingReturnStatement => {
                "@{line}: Expected the function {funcName} to return {expected} but found no return statement."
            }
            Self::CallingConstructorWithoutNew => {
                "@{line}: The constructor {funcName} must be called with `new`."
            }
            Self::ConstructorThisTypeMustBeObject => {
                "@{line}: The constructor {funcName} must have an object this type but has {thisType}."
            }
            Self::ConstructorMustReturnVoid => {
                "@{line}: The constructor {funcName} must return void but returns {returnType}."
            }
            Self::ConstructorMustBePascalCase => {
                "@{line}: The constructor {funcName} must start with an uppercase letter."
            }
            Self::CallingNonFunction => "@{line}: Cannot call {objName} of type {actual}.",
            Self::UnresolvedGeneric => {
                "@{line}: Could not resolve generic {genericName} when calling {funcName}."
            }
            Self::IntersectionOperatorCallMismatch => {
                "@{line}: No overload of operator {operator} accepts {actual}."
            }
            Self::UnknownModuleRequire => "@{line}: Could not resolve module {moduleName}.",
            Self::CyclicModuleImport => {
                "@{line}: Module {moduleName} is already being compiled; cyclic imports are not supported."
            }
            Self::TypeClassMismatch => "@{line}: Expected to get a {expected} but found {actual}.",
            Self::MissingObjectField => {
                "@{line}: Expected {actual} to have the field {fieldName} of {expected}."
            }
            Self::BrandMismatch => "@{line}: Expected a {expected} but found a {actual}.",
            Self::FunctionArgCountMismatch => {
                "@{line}: Expected a function like {expected} but found {actual}."
            }
            Self::UnknownLiteral => "Could not resolve {literal}",
            Self::MissingDefinition => {
                "Could not find a definition for {moduleName}; only relative and absolute imports are supported."
            }
            Self::UnresolvedHeaderImport => "Could not resolve header import {moduleName}.",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for DiagnosticKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    #[serde(rename = "type")]
    pub kind: DiagnosticKind,
    pub file_name: String,
    pub loc: Option<SourceLocation>,
    pub line: Option<u32>,
    pub message_text: String,
    #[serde(flatten)]
    pub fields: IndexMap<String, String>,
}

impl Diagnostic {
    /// Build a diagnostic and render its message.
    pub fn new<I, K, V>(
        kind: DiagnosticKind,
        file_name: impl Into<String>,
        loc: Option<SourceLocation>,
        fields: I,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let fields: IndexMap<String, String> = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let line = loc.map(|l| l.line());
        let mut diagnostic = Self {
            kind,
            file_name: file_name.into(),
            loc,
            line,
            message_text: String::new(),
            fields,
        };
        diagnostic.render();
        diagnostic
    }

    /// Field value by name, e.g. `expected` or `fieldName`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    fn render(&mut self) {
        let mut message = format_message(self.kind.template(), &self.fields);
        let line = self.line.map(|l| l.to_string()).unwrap_or_default();
        message = message.replace("{line}", &line);
        self.message_text = message;
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.file_name, self.message_text, self.kind)
    }
}

/// Substitute `{name}` placeholders in `template` with the matching field.
///
/// Placeholders without a field are left in place.
pub fn format_message(template: &str, fields: &IndexMap<String, String>) -> String {
    let mut result = template.to_string();
    for (name, value) in fields {
        result = result.replace(&format!("{{{name}}}"), value);
    }
    result
}
