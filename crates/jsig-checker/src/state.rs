//! Checker state shared by every verification module.
//!
//! `CheckerState` owns the scope arena and per-file context for one source
//! file. The verification logic is split across modules that each add an
//! `impl<'a> CheckerState<'a>` block:
//! - `dispatch` - exhaustive node-kind dispatch
//! - `statements` - program hoisting and statements
//! - `assignment_checker`, `property_checker`, `call_checker`,
//!   `operator_checker` - expressions
//! - `function_checker` - function bodies, arity and hidden classes
//! - `inference`, `generic_checker` - fallback inference and generics
//! - `control_flow_narrowing` - branch scopes and restrictions
//! - `error_reporter` - diagnostic construction

use crate::context::CheckerContext;
use crate::error_handler::CheckResult;
use crate::program::{FileResult, Program};
use jsig_ast::SourceFile;
use jsig_binder::{LookupMode, ScopeArena, ScopeId};
use jsig_common::{Atom, SourceLocation, well_known};
use jsig_solver::{PropertyInfo, TypeFormatter, TypeId, TypeInterner};
use std::rc::Rc;
use tracing::debug;

pub struct CheckerState<'a> {
    pub ctx: CheckerContext,
    pub types: &'a TypeInterner,
    pub scopes: ScopeArena<'a>,
    /// Scope the node being verified belongs to. Entering a function or
    /// branch saves this and restores it on exit.
    pub current_scope: ScopeId,
    pub file_scope: ScopeId,
    pub source: &'a SourceFile,
    pub(crate) program: &'a Program,
}

impl<'a> CheckerState<'a> {
    pub fn new(program: &'a Program, source: &'a SourceFile) -> Self {
        let types = program.types();
        let mut scopes = ScopeArena::new(program.globals(), types);
        let file_scope = scopes.push_file();
        Self {
            ctx: CheckerContext::new(source.path.clone()),
            types,
            scopes,
            current_scope: file_scope,
            file_scope,
            source,
            program,
        }
    }

    /// Verify the whole file.
    #[tracing::instrument(level = "debug", skip(self), fields(file = %self.source.path))]
    pub fn check_source_file(&mut self) -> CheckResult<()> {
        self.load_module_tokens()?;
        let source = self.source;
        let body = &source.program.body;
        self.register_function_declarations(body)?;
        self.load_header_file()?;
        self.check_statement_list(body, false)?;
        debug!(
            diagnostics = self.ctx.error_count(),
            exports = ?self.ctx.module_exports_type,
            "file checked"
        );
        Ok(())
    }

    pub fn into_result(self) -> FileResult {
        FileResult {
            file_name: self.ctx.file_name,
            diagnostics: self.ctx.diagnostics,
            module_exports_type: self.ctx.module_exports_type,
            dependencies: self.ctx.dependencies,
        }
    }

    /// `module`, `__dirname` and `__filename`.
    fn load_module_tokens(&mut self) -> CheckResult<()> {
        let module_type = self.types.object(vec![PropertyInfo::new(
            well_known::EXPORTS,
            TypeId::MODULE_EXPORTS,
        )]);
        self.scopes
            .add_var(self.file_scope, well_known::MODULE, module_type)?;
        for name in ["__dirname", "__filename"] {
            let atom = self.atom(name);
            self.scopes.add_var(self.file_scope, atom, TypeId::STRING)?;
        }
        Ok(())
    }

    /// Bind every assignment of the companion header in file scope.
    fn load_header_file(&mut self) -> CheckResult<()> {
        let header_path = self.program.options().header_path(&self.source.path);
        let Some(header) = self.program.resolved_header(&header_path)? else {
            return Ok(());
        };
        self.ctx
            .diagnostics
            .extend(header.diagnostics.iter().cloned());
        for &(name, type_id) in &header.assignments {
            self.scopes.add_var(self.file_scope, name, type_id)?;
        }
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[inline]
    pub(crate) fn atom(&self, text: &str) -> Atom {
        self.types.intern_string(text)
    }

    #[inline]
    pub(crate) fn atom_text(&self, atom: Atom) -> Rc<str> {
        self.types.resolve_atom_ref(atom)
    }

    pub(crate) fn format_type(&self, type_id: TypeId) -> String {
        TypeFormatter::new(self.types).format(type_id)
    }

    /// Source text covered by `loc`.
    pub(crate) fn snippet(&self, loc: &SourceLocation) -> String {
        self.source.snippet(loc)
    }

    /// Resolve an identifier from the current scope in the current lookup
    /// mode.
    pub(crate) fn lookup_var(&self, name: Atom) -> Option<TypeId> {
        self.scopes
            .get_var(self.current_scope, name, self.ctx.lookup_mode)
    }

    /// Nearest file or function scope: where `var` and nested function
    /// declarations live.
    pub(crate) fn declaring_scope(&self) -> ScopeId {
        let mut id = self.current_scope;
        while let Some(scope) = self.scopes.get(id) {
            match scope.parent {
                Some(parent) if scope.is_branch() => id = parent,
                _ => break,
            }
        }
        id
    }

    pub(crate) fn in_branch(&self) -> bool {
        self.scopes
            .get(self.current_scope)
            .is_some_and(|scope| scope.is_branch())
    }

    pub(crate) fn in_file_scope(&self) -> bool {
        self.current_scope == self.file_scope
    }

    /// Run `f` with `scope` as the current scope.
    pub(crate) fn in_scope<T>(
        &mut self,
        scope: ScopeId,
        f: impl FnOnce(&mut Self) -> CheckResult<T>,
    ) -> CheckResult<T> {
        let saved = std::mem::replace(&mut self.current_scope, scope);
        let result = f(self);
        self.current_scope = saved;
        result
    }

    /// Run `f` with `assignment_type` as the contextual type.
    pub(crate) fn with_assignment_type<T>(
        &mut self,
        assignment_type: Option<TypeId>,
        f: impl FnOnce(&mut Self) -> CheckResult<T>,
    ) -> CheckResult<T> {
        let saved = std::mem::replace(&mut self.ctx.assignment_type, assignment_type);
        let result = f(self);
        self.ctx.assignment_type = saved;
        result
    }

    /// Run `f` with assignment-target lookups: writable identifiers and
    /// open-field growth.
    pub(crate) fn as_assignment_target<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> CheckResult<T>,
    ) -> CheckResult<T> {
        let saved_mode = std::mem::replace(&mut self.ctx.lookup_mode, LookupMode::Writable);
        let saved_target = std::mem::replace(&mut self.ctx.assignment_target, true);
        let result = f(self);
        self.ctx.lookup_mode = saved_mode;
        self.ctx.assignment_target = saved_target;
        result
    }

    /// Run `f` with ordinary reads; used for sub-expressions of an
    /// assignment target such as the object of `a.b.c`.
    pub(crate) fn as_read<T>(&mut self, f: impl FnOnce(&mut Self) -> CheckResult<T>) -> CheckResult<T> {
        let saved_mode = std::mem::replace(&mut self.ctx.lookup_mode, LookupMode::Normal);
        let saved_target = std::mem::replace(&mut self.ctx.assignment_target, false);
        let result = f(self);
        self.ctx.lookup_mode = saved_mode;
        self.ctx.assignment_target = saved_target;
        result
    }
}
