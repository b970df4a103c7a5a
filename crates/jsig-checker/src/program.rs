//! Compilation driver.
//!
//! A `Program` owns everything shared between the files of one run: the
//! type interner, the global scope, and the memoized results of checked
//! source files and lowered headers. Each file is checked at most once.
//! `require` checks the required file on demand, so a file's dependencies
//! finish before it does, and a file required while it is still being
//! checked is a cycle.

use crate::error_handler::{CheckResult, CheckerError};
use crate::globals::build_global_scope;
use crate::header_file::{HeaderLowering, ResolvedHeader};
use crate::host::{CompilerHost, is_path_request, normalize_path, resolve_request, with_default_extension};
use crate::options::CheckerOptions;
use crate::state::CheckerState;
use jsig_ast::SourceFile;
use jsig_binder::GlobalScope;
use jsig_common::Diagnostic;
use jsig_common::limits::MAX_MODULE_DEPTH;
use jsig_solver::{PropertyInfo, TypeFormatter, TypeId, TypeInterner};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Outcome of checking one source file.
#[derive(Clone, Debug)]
pub struct FileResult {
    pub file_name: String,
    pub diagnostics: Vec<Diagnostic>,
    pub module_exports_type: Option<TypeId>,
    /// Files this one required, in first-require order.
    pub dependencies: Vec<String>,
}

/// Outcome of `Program::compile`.
#[derive(Clone, Debug)]
pub struct CompileResult {
    pub file_name: String,
    /// Globals-file errors, then each dependency's, then the file's own.
    pub diagnostics: Vec<Diagnostic>,
    pub module_exports_type: Option<TypeId>,
}

impl CompileResult {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// What a `require(...)` call resolves to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequireOutcome {
    Resolved { path: String, exports: TypeId },
    /// The module is still being checked further up the require chain.
    Cyclic,
    NotFound,
}

pub struct Program {
    host: Box<dyn CompilerHost>,
    options: CheckerOptions,
    types: TypeInterner,
    globals: GlobalScope,
    global_diagnostics: Vec<Diagnostic>,
    files: RefCell<FxHashMap<String, Rc<FileResult>>>,
    /// `None` for a path with no header.
    headers: RefCell<FxHashMap<String, Option<Rc<ResolvedHeader>>>>,
    /// Source files being checked, outermost first.
    compiling: RefCell<Vec<String>>,
    /// Headers being lowered, outermost first.
    lowering: RefCell<Vec<String>>,
}

impl Program {
    pub fn new(host: impl CompilerHost + 'static, options: CheckerOptions) -> CheckResult<Self> {
        let types = TypeInterner::new();
        let globals = build_global_scope(&types);
        let mut program = Self {
            host: Box::new(host),
            options,
            types,
            globals,
            global_diagnostics: Vec::new(),
            files: RefCell::new(FxHashMap::default()),
            headers: RefCell::new(FxHashMap::default()),
            compiling: RefCell::new(Vec::new()),
            lowering: RefCell::new(Vec::new()),
        };
        program.load_globals_file()?;
        debug!(identifiers = program.globals.identifier_count(), "global scope ready");
        Ok(program)
    }

    fn load_globals_file(&mut self) -> CheckResult<()> {
        let Some(path) = self.options.globals_file.as_deref().map(normalize_path) else {
            return Ok(());
        };
        let header = self
            .resolved_header(&path)?
            .ok_or_else(|| CheckerError::SourceNotFound(path.clone()))?;
        for &(name, type_id) in &header.assignments {
            self.globals.add_var(name, type_id);
        }
        self.global_diagnostics
            .extend(header.diagnostics.iter().cloned());
        Ok(())
    }

    pub fn types(&self) -> &TypeInterner {
        &self.types
    }

    pub fn globals(&self) -> &GlobalScope {
        &self.globals
    }

    pub fn options(&self) -> &CheckerOptions {
        &self.options
    }

    pub fn format_type(&self, type_id: TypeId) -> String {
        TypeFormatter::new(&self.types).format(type_id)
    }

    // =========================================================================
    // Entry point
    // =========================================================================

    /// Check `path` and everything it requires.
    #[tracing::instrument(level = "info", skip(self))]
    pub fn compile(&self, path: &str) -> CheckResult<CompileResult> {
        let path = normalize_path(path);
        let result = self
            .check_file(&path)?
            .ok_or_else(|| CheckerError::SourceNotFound(path.clone()))?;

        let mut diagnostics = self.global_diagnostics.clone();
        let mut seen = FxHashSet::default();
        seen.insert(path.clone());
        self.collect_diagnostics(&result, &mut seen, &mut diagnostics);

        info!(file = %path, errors = diagnostics.len(), "compiled");
        Ok(CompileResult {
            file_name: path,
            diagnostics,
            module_exports_type: result.module_exports_type,
        })
    }

    /// Dependencies depth-first, each once, then `result` itself.
    fn collect_diagnostics(&self, result: &FileResult, seen: &mut FxHashSet<String>, out: &mut Vec<Diagnostic>) {
        for dependency in &result.dependencies {
            if !seen.insert(dependency.clone()) {
                continue;
            }
            let checked = self.files.borrow().get(dependency).cloned();
            if let Some(checked) = checked {
                self.collect_diagnostics(&checked, seen, out);
            }
        }
        out.extend(result.diagnostics.iter().cloned());
    }

    // =========================================================================
    // Source files
    // =========================================================================

    /// Check a source file once. `None` if the host has no such file.
    fn check_file(&self, path: &str) -> CheckResult<Option<Rc<FileResult>>> {
        let done = self.files.borrow().get(path).cloned();
        if let Some(done) = done {
            return Ok(Some(done));
        }
        let Some(source) = self.host.source_file(path) else {
            return Ok(None);
        };

        {
            let mut compiling = self.compiling.borrow_mut();
            if compiling.len() >= MAX_MODULE_DEPTH {
                warn!(file = %path, depth = compiling.len(), "require chain too deep");
                return Err(CheckerError::ModuleDepthExceeded(MAX_MODULE_DEPTH));
            }
            compiling.push(path.to_string());
        }
        let checked = self.run_checker(&source);
        self.compiling.borrow_mut().pop();

        let result = Rc::new(checked?);
        self.files
            .borrow_mut()
            .insert(path.to_string(), Rc::clone(&result));
        Ok(Some(result))
    }

    fn run_checker(&self, source: &SourceFile) -> CheckResult<FileResult> {
        let mut state = CheckerState::new(self, source);
        state.check_source_file()?;
        Ok(state.into_result())
    }

    /// Resolve `require(request)` issued from `from`.
    pub(crate) fn require(&self, from: &str, request: &str) -> CheckResult<RequireOutcome> {
        if !is_path_request(request) {
            return self.require_definition(request);
        }

        let path = with_default_extension(&resolve_request(from, request), &self.options.source_extension);
        if self.compiling.borrow().contains(&path) {
            debug!(from, path = %path, "cyclic require");
            return Ok(RequireOutcome::Cyclic);
        }
        Ok(match self.check_file(&path)? {
            Some(result) => RequireOutcome::Resolved {
                path,
                exports: result.module_exports_type.unwrap_or(TypeId::ANY),
            },
            None => RequireOutcome::NotFound,
        })
    }

    /// A bare module name: its header in the definitions directory, viewed
    /// as an object of the header's assignments.
    fn require_definition(&self, module_name: &str) -> CheckResult<RequireOutcome> {
        let Some(path) = self.options.definition_path(module_name) else {
            return Ok(RequireOutcome::NotFound);
        };
        let path = normalize_path(&path);
        let Some(header) = self.resolved_header(&path)? else {
            return Ok(RequireOutcome::NotFound);
        };
        let exports = self.types.object(
            header
                .assignments
                .iter()
                .map(|&(name, type_id)| PropertyInfo::new(name, type_id))
                .collect(),
        );
        Ok(RequireOutcome::Resolved { path, exports })
    }

    // =========================================================================
    // Headers
    // =========================================================================

    /// Lower the header at `path` once. `None` if the host has no such
    /// header, or if it is already being lowered further up an import
    /// chain.
    pub(crate) fn resolved_header(&self, path: &str) -> CheckResult<Option<Rc<ResolvedHeader>>> {
        let path = normalize_path(path);
        let path = path.as_str();
        let cached = self.headers.borrow().get(path).cloned();
        if let Some(cached) = cached {
            return Ok(cached);
        }
        if self.lowering.borrow().iter().any(|p| p == path) {
            debug!(path, "cyclic header import");
            return Ok(None);
        }
        let Some(program) = self.host.header_file(path) else {
            self.headers.borrow_mut().insert(path.to_string(), None);
            return Ok(None);
        };

        self.lowering.borrow_mut().push(path.to_string());
        let lowered = HeaderLowering::new(self, path).lower_program(&program);
        self.lowering.borrow_mut().pop();

        let header = Rc::new(lowered?);
        self.headers
            .borrow_mut()
            .insert(path.to_string(), Some(Rc::clone(&header)));
        Ok(Some(header))
    }
}
