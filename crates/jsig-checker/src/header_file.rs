//! Lowering header programs into interned types.
//!
//! A header is processed in three passes: declarations are indexed by name,
//! imports are resolved against the headers they name, then declarations
//! and assignments are lowered. Names resolve in this order: generic
//! parameters in scope, built-ins, declarations, imports. An unknown name
//! is reported once per occurrence and lowers to `Any`. Diagnostics of an
//! imported header travel with the importer.

use crate::error_handler::{CheckResult, CheckerError};
use crate::host::{is_path_request, resolve_request, with_default_extension};
use crate::program::Program;
use indexmap::IndexMap;
use jsig_ast::type_expr::{FunctionExpr, GenericExpr, LiteralExpr, ObjectExpr};
use jsig_ast::{GenericDescriptor, LocationSegment, TypeExpr, TypeProgram, TypeStatement};
use jsig_binder::is_constructor_name;
use jsig_common::{Atom, Diagnostic, DiagnosticKind};
use jsig_solver::instantiate::type_at;
use jsig_solver::{
    FunctionShape, GenericVar, ObjectShape, ParamInfo, PathStep, PropertyInfo, TypeId, TypeInterner,
};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::{debug, trace};

/// Everything a header contributes once lowered.
#[derive(Debug, Default)]
pub struct ResolvedHeader {
    /// `name : Type` bindings, in header order.
    pub assignments: Vec<(Atom, TypeId)>,
    /// `type Name : ...` declarations, available to importing headers.
    pub declarations: IndexMap<String, TypeId>,
    pub diagnostics: Vec<Diagnostic>,
}

struct Declaration<'p> {
    params: Vec<String>,
    body: &'p TypeExpr,
}

pub(crate) struct HeaderLowering<'p> {
    program: &'p Program,
    types: &'p TypeInterner,
    path: String,
    declarations: IndexMap<&'p str, Declaration<'p>>,
    resolved: FxHashMap<String, TypeId>,
    in_progress: FxHashSet<String>,
    imported: FxHashMap<String, TypeId>,
    /// Innermost last. Function generics bind to free variables, applied
    /// declarations to their arguments.
    generic_scopes: Vec<FxHashMap<String, TypeId>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'p> HeaderLowering<'p> {
    pub(crate) fn new(program: &'p Program, path: &str) -> Self {
        Self {
            program,
            types: program.types(),
            path: path.to_string(),
            declarations: IndexMap::new(),
            resolved: FxHashMap::default(),
            in_progress: FxHashSet::default(),
            imported: FxHashMap::default(),
            generic_scopes: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(path = %self.path))]
    pub(crate) fn lower_program(mut self, header: &'p TypeProgram) -> CheckResult<ResolvedHeader> {
        for statement in &header.statements {
            if let TypeStatement::TypeDeclaration {
                identifier,
                type_expression,
                generics,
            } = statement
            {
                let params = generics
                    .iter()
                    .filter_map(|g| match g {
                        TypeExpr::Literal(lit) => Some(lit.name.clone()),
                        TypeExpr::Free(free) => Some(free.name.clone()),
                        _ => None,
                    })
                    .collect();
                self.declarations.insert(
                    identifier.as_str(),
                    Declaration {
                        params,
                        body: type_expression,
                    },
                );
            }
        }

        for statement in &header.statements {
            if let TypeStatement::Import { dependency, types } = statement {
                self.lower_import(dependency, types)?;
            }
        }

        let mut declarations = IndexMap::new();
        let names: Vec<&'p str> = self.declarations.keys().copied().collect();
        for name in names {
            let type_id = self.lower_declaration(name, &[])?;
            declarations.insert(name.to_string(), type_id);
        }

        let mut assignments = Vec::new();
        for statement in &header.statements {
            let TypeStatement::Assignment {
                identifier,
                type_expression,
            } = statement
            else {
                continue;
            };
            if type_expression.is_optional() {
                return Err(CheckerError::OptionalAssignment(identifier.clone()));
            }
            let mut type_id = self.lower(type_expression)?;
            if is_constructor_name(identifier) {
                type_id = self.brand_constructor(identifier, type_id);
            }
            trace!(name = %identifier, "header assignment lowered");
            assignments.push((self.types.intern_string(identifier), type_id));
        }

        debug!(
            assignments = assignments.len(),
            declarations = declarations.len(),
            diagnostics = self.diagnostics.len(),
            "header lowered"
        );
        Ok(ResolvedHeader {
            assignments,
            declarations,
            diagnostics: self.diagnostics,
        })
    }

    // =========================================================================
    // Imports
    // =========================================================================

    fn lower_import(&mut self, dependency: &str, imported: &[TypeExpr]) -> CheckResult<()> {
        if !is_path_request(dependency) {
            self.report(DiagnosticKind::MissingDefinition, [("moduleName", dependency)]);
            return Ok(());
        }
        let target = with_default_extension(
            &resolve_request(&self.path, dependency),
            &self.program.options().header_extension,
        );
        let Some(header) = self.program.resolved_header(&target)? else {
            self.report(DiagnosticKind::UnresolvedHeaderImport, [("moduleName", dependency)]);
            return Ok(());
        };
        self.diagnostics.extend(header.diagnostics.iter().cloned());

        for item in imported {
            let (local, original) = match item {
                TypeExpr::Literal(lit) => (lit.name.as_str(), lit.name.as_str()),
                TypeExpr::Renamed(renamed) => match renamed.original.as_ref() {
                    TypeExpr::Literal(lit) => (renamed.name.as_str(), lit.name.as_str()),
                    _ => continue,
                },
                _ => continue,
            };
            let Some(&type_id) = header.declarations.get(original) else {
                self.report(DiagnosticKind::UnknownLiteral, [("literal", original)]);
                continue;
            };
            let type_id = if local == original {
                type_id
            } else {
                self.types.renamed(local, type_id)
            };
            self.imported.insert(local.to_string(), type_id);
        }
        Ok(())
    }

    // =========================================================================
    // Type expressions
    // =========================================================================

    fn lower(&mut self, expr: &'p TypeExpr) -> CheckResult<TypeId> {
        match expr {
            TypeExpr::Literal(lit) => self.lower_literal(lit),
            TypeExpr::Value(value) => Ok(self.types.value(&value.value)),
            TypeExpr::Object(object) => self.lower_object(object),
            TypeExpr::Union(union) => {
                let members = self.lower_all(&union.unions)?;
                Ok(self.types.union(members))
            }
            TypeExpr::Intersection(intersection) => {
                let members = self.lower_all(&intersection.intersections)?;
                Ok(self.types.intersection(members))
            }
            TypeExpr::Function(function) => self.lower_function(function),
            TypeExpr::Generic(generic) => self.lower_generic(generic),
            TypeExpr::Tuple(tuple) => {
                let elements = self.lower_all(&tuple.values)?;
                Ok(self.types.tuple(elements))
            }
            TypeExpr::Renamed(renamed) => {
                let original = self.lower(&renamed.original)?;
                Ok(self.types.renamed(&renamed.name, original))
            }
            TypeExpr::Free(free) => Ok(self.types.free(&free.name)),
        }
    }

    fn lower_all(&mut self, exprs: &'p [TypeExpr]) -> CheckResult<Vec<TypeId>> {
        exprs.iter().map(|e| self.lower(e)).collect()
    }

    fn lower_literal(&mut self, lit: &'p LiteralExpr) -> CheckResult<TypeId> {
        let name = lit.name.as_str();
        if let Some(bound) = self.generic_binding(name) {
            return Ok(bound);
        }
        if lit.is_builtin() || TypeId::SENTINEL_NAMES.contains(&name) {
            return Ok(self.types.literal(name, true));
        }
        if self.declarations.contains_key(name) {
            return self.lower_declaration(name, &[]);
        }
        if let Some(&imported) = self.imported.get(name) {
            return Ok(imported);
        }
        self.report(DiagnosticKind::UnknownLiteral, [("literal", name)]);
        Ok(TypeId::ANY)
    }

    fn generic_binding(&self, name: &str) -> Option<TypeId> {
        self.generic_scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    /// Lower a declaration, applying `args` to its parameters. A missing
    /// argument leaves its parameter free.
    fn lower_declaration(&mut self, name: &'p str, args: &[TypeId]) -> CheckResult<TypeId> {
        let Some(declaration) = self.declarations.get(name) else {
            return Ok(TypeId::ANY);
        };
        let body = declaration.body;
        let params = declaration.params.clone();

        if params.is_empty() {
            if let Some(&done) = self.resolved.get(name) {
                return Ok(done);
            }
            // A self-reference stays nominal.
            if !self.in_progress.insert(name.to_string()) {
                return Ok(self.types.literal(name, false));
            }
            let lowered = self.lower(body);
            self.in_progress.remove(name);
            let lowered = lowered?;
            self.resolved.insert(name.to_string(), lowered);
            return Ok(lowered);
        }

        let key = format!("{name}<>");
        if !self.in_progress.insert(key.clone()) {
            return Ok(self.types.literal(name, false));
        }
        let scope = params
            .iter()
            .enumerate()
            .map(|(i, param)| {
                let bound = args.get(i).copied().unwrap_or_else(|| self.types.free(param));
                (param.clone(), bound)
            })
            .collect();
        self.generic_scopes.push(scope);
        let lowered = self.lower(body);
        self.generic_scopes.pop();
        self.in_progress.remove(&key);
        lowered
    }

    fn lower_object(&mut self, object: &'p ObjectExpr) -> CheckResult<TypeId> {
        let mut properties = Vec::with_capacity(object.key_values.len());
        for kv in &object.key_values {
            let type_id = self.lower(&kv.value)?;
            properties.push(PropertyInfo {
                name: self.types.intern_string(&kv.key),
                type_id,
                optional: kv.optional || kv.value.is_optional(),
            });
        }
        Ok(self.types.object_with_shape(ObjectShape {
            properties,
            open: object.open,
            brand: self.types.intern_string(&object.brand),
        }))
    }

    fn lower_generic(&mut self, generic: &'p GenericExpr) -> CheckResult<TypeId> {
        let args = self.lower_all(&generic.generics)?;
        if let TypeExpr::Literal(base) = generic.value.as_ref()
            && self.generic_binding(&base.name).is_none()
            && self.declarations.contains_key(base.name.as_str())
        {
            return self.lower_declaration(base.name.as_str(), &args);
        }
        let base = self.lower(&generic.value)?;
        Ok(self.types.generic(base, args))
    }

    fn lower_function(&mut self, function: &'p FunctionExpr) -> CheckResult<TypeId> {
        let scope: FxHashMap<String, TypeId> = function
            .generics
            .iter()
            .map(|g| (g.name.clone(), self.types.free(&g.name)))
            .collect();
        let scoped = !scope.is_empty();
        if scoped {
            self.generic_scopes.push(scope);
        }
        let lowered = self.lower_function_parts(function);
        if scoped {
            self.generic_scopes.pop();
        }
        let (params, this_arg, result) = lowered?;

        let generics = function
            .generics
            .iter()
            .map(|descriptor| {
                Ok(GenericVar {
                    name: self.types.intern_string(&descriptor.name),
                    location: generic_location(descriptor)?,
                })
            })
            .collect::<CheckResult<Vec<_>>>()?;

        let function_id = self.types.function(FunctionShape {
            params,
            result,
            this_arg,
            generics: generics.clone(),
            brand: self.types.intern_string(&function.brand),
        });

        // Every location must lead to a type inside this function.
        for (descriptor, var) in function.generics.iter().zip(&generics) {
            if type_at(self.types, function_id, &var.location).is_none() {
                return Err(CheckerError::MalformedGenericLocation {
                    name: descriptor.name.clone(),
                    reason: format!("{:?} is outside the function type", descriptor.location),
                });
            }
        }
        Ok(function_id)
    }

    #[allow(clippy::type_complexity)]
    fn lower_function_parts(
        &mut self,
        function: &'p FunctionExpr,
    ) -> CheckResult<(Vec<ParamInfo>, Option<TypeId>, TypeId)> {
        let mut params = Vec::with_capacity(function.args.len());
        for arg in &function.args {
            let type_id = self.lower(arg)?;
            params.push(ParamInfo {
                name: arg.label().map(|label| self.types.intern_string(label)),
                type_id,
                optional: arg.is_optional(),
            });
        }
        let this_arg = match &function.this_arg {
            Some(this_arg) => Some(self.lower(this_arg)?),
            None => None,
        };
        let result = self.lower(&function.result)?;
        Ok((params, this_arg, result))
    }

    /// `Foo : (this: {...}) => void` brands the constructor and its
    /// instances `Foo`.
    fn brand_constructor(&self, name: &str, type_id: TypeId) -> TypeId {
        let Some(mut shape) = self.types.function_shape(type_id) else {
            return type_id;
        };
        let Some(this_arg) = shape.this_arg.filter(|&t| self.types.is_object(t)) else {
            return type_id;
        };
        if shape.result != TypeId::VOID {
            return type_id;
        }
        shape.this_arg = Some(self.types.with_brand(this_arg, name));
        shape.brand = self.types.intern_string(name);
        self.types.function(shape)
    }

    fn report<'f>(&mut self, kind: DiagnosticKind, fields: impl IntoIterator<Item = (&'f str, &'f str)>) {
        self.diagnostics
            .push(Diagnostic::new(kind, self.path.clone(), None, fields));
    }
}

/// Convert a grammar location such as `["args", 0, "generics", 0]` into
/// path steps.
fn generic_location(descriptor: &GenericDescriptor) -> CheckResult<SmallVec<[PathStep; 4]>> {
    let malformed = |reason: String| CheckerError::MalformedGenericLocation {
        name: descriptor.name.clone(),
        reason,
    };
    let mut steps = SmallVec::new();
    let mut segments = descriptor.location.iter();
    while let Some(segment) = segments.next() {
        let LocationSegment::Key(key) = segment else {
            return Err(malformed("unexpected index".to_string()));
        };
        let step = match key.as_str() {
            "thisArg" => PathStep::ThisArg,
            "result" => PathStep::Result,
            "args" | "generics" | "unions" | "intersections" | "values" | "keyValues" => {
                let Some(LocationSegment::Index(i)) = segments.next() else {
                    return Err(malformed(format!("expected an index after `{key}`")));
                };
                let i = *i;
                match key.as_str() {
                    "args" => PathStep::Arg(i),
                    "generics" => PathStep::TypeArg(i),
                    "values" => PathStep::Element(i),
                    "keyValues" => match segments.next() {
                        Some(LocationSegment::Key(value)) if value == "value" => PathStep::Field(i),
                        _ => return Err(malformed("expected `value` after a key-value index".to_string())),
                    },
                    _ => PathStep::Member(i),
                }
            }
            other => return Err(malformed(format!("unknown segment `{other}`"))),
        };
        steps.push(step);
    }
    Ok(steps)
}
