//! Scope arena and the scope operations the verifier drives.

use crate::error::ScopeError;
use crate::global_scope::GlobalScope;
use crate::scope::{FunctionScopeData, LookupMode, Scope, ScopeId, ScopeKind, UntypedFunction};
use indexmap::IndexMap;
use jsig_ast::Function;
use jsig_common::{Atom, SourceLocation, well_known};
use jsig_solver::{TypeId, TypeInterner};
use tracing::trace;

/// Owns every scope created while verifying one file.
pub struct ScopeArena<'a> {
    scopes: Vec<Scope<'a>>,
    globals: &'a GlobalScope,
    types: &'a TypeInterner,
}

impl<'a> ScopeArena<'a> {
    pub fn new(globals: &'a GlobalScope, types: &'a TypeInterner) -> Self {
        Self {
            scopes: Vec::with_capacity(16),
            globals,
            types,
        }
    }

    pub fn globals(&self) -> &'a GlobalScope {
        self.globals
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    fn alloc(&mut self, scope: Scope<'a>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(scope);
        id
    }

    fn name(&self, atom: Atom) -> String {
        self.types.resolve_atom(atom)
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope<'a>> {
        self.scopes.get(id.index())
    }

    fn scope(&self, id: ScopeId) -> &Scope<'a> {
        &self.scopes[id.index()]
    }

    fn scope_mut(&mut self, id: ScopeId) -> &mut Scope<'a> {
        &mut self.scopes[id.index()]
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.scope(id).parent
    }

    // ===== Allocation =====

    pub fn push_file(&mut self) -> ScopeId {
        self.alloc(Scope::new(
            None,
            ScopeKind::File {
                prototypes: IndexMap::new(),
            },
        ))
    }

    pub fn push_branch(&mut self, parent: ScopeId) -> ScopeId {
        self.alloc(Scope::new(
            Some(parent),
            ScopeKind::Branch {
                restricted_this: None,
            },
        ))
    }

    /// Allocate a function scope and register it, by function name, with
    /// the nearest enclosing file or function scope.
    pub fn push_function(
        &mut self,
        parent: ScopeId,
        data: FunctionScopeData,
    ) -> Result<ScopeId, ScopeError> {
        let name = data.name;
        let owner = self.non_branch_ancestor(parent);
        if self.scope(owner).function_scopes.contains_key(&name) {
            return Err(ScopeError::DuplicateFunctionScope(self.name(name)));
        }
        let id = self.alloc(Scope::new(Some(parent), ScopeKind::Function(Box::new(data))));
        self.scope_mut(owner).function_scopes.insert(name, id);
        Ok(id)
    }

    fn non_branch_ancestor(&self, mut id: ScopeId) -> ScopeId {
        while self.scope(id).is_branch() {
            match self.scope(id).parent {
                Some(parent) => id = parent,
                None => break,
            }
        }
        id
    }

    // ===== Identifiers =====

    pub fn add_var(&mut self, scope: ScopeId, name: Atom, type_id: TypeId) -> Result<(), ScopeError> {
        if self.scope(scope).identifiers.contains_key(&name) {
            return Err(ScopeError::DuplicateIdentifier(self.name(name)));
        }
        trace!(scope = scope.0, name = %self.name(name), type_id = type_id.0, "add_var");
        self.scope_mut(scope).identifiers.insert(name, type_id);
        Ok(())
    }

    /// Resolve `name` from `scope` outward, then in the global scope.
    pub fn get_var(&self, scope: ScopeId, name: Atom, mode: LookupMode) -> Option<TypeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scope(id);
            if mode == LookupMode::Normal
                && let Some(&restricted) = s.restrictions.get(&name)
            {
                return Some(restricted);
            }
            if let Some(&declared) = s.identifiers.get(&name) {
                return Some(declared);
            }
            current = s.parent;
        }
        self.globals.get_var(name)
    }

    /// Whether `name` is bound in `scope` itself.
    pub fn has_own_var(&self, scope: ScopeId, name: Atom) -> bool {
        self.scope(scope).identifiers.contains_key(&name)
    }

    /// Replace the type of an existing binding in the nearest scope that
    /// declares it. Returns that scope.
    pub fn force_update_var(
        &mut self,
        scope: ScopeId,
        name: Atom,
        type_id: TypeId,
    ) -> Result<ScopeId, ScopeError> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if self.scope(id).identifiers.contains_key(&name) {
                trace!(scope = id.0, name = %self.name(name), type_id = type_id.0, "force_update_var");
                self.scope_mut(id).identifiers.insert(name, type_id);
                return Ok(id);
            }
            current = self.scope(id).parent;
        }
        Err(ScopeError::MissingIdentifier(self.name(name)))
    }

    // ===== Restrictions =====

    /// Record a narrowed type for `name` in `scope`.
    ///
    /// Branch scopes overwrite freely and keep `this` separately. File and
    /// function scopes accept each name once and never narrow `this`.
    pub fn restrict_type(&mut self, scope: ScopeId, name: Atom, type_id: TypeId) -> Result<(), ScopeError> {
        let is_branch = self.scope(scope).is_branch();
        if is_branch {
            if name == well_known::THIS {
                if let ScopeKind::Branch { restricted_this } = &mut self.scope_mut(scope).kind {
                    *restricted_this = Some(type_id);
                }
                return Ok(());
            }
        } else {
            if name == well_known::THIS {
                return Err(ScopeError::CannotRestrictThis);
            }
            if self.scope(scope).restrictions.contains_key(&name) {
                return Err(ScopeError::DoubleRestriction(self.name(name)));
            }
        }
        self.scope_mut(scope).restrictions.insert(name, type_id);
        Ok(())
    }

    pub fn restrictions(&self, scope: ScopeId) -> &IndexMap<Atom, TypeId> {
        &self.scope(scope).restrictions
    }

    pub fn restricted_this(&self, scope: ScopeId) -> Option<TypeId> {
        match self.scope(scope).kind {
            ScopeKind::Branch { restricted_this } => restricted_this,
            _ => None,
        }
    }

    // ===== Untyped functions =====

    pub fn add_function(&mut self, scope: ScopeId, name: Atom, node: &'a Function) -> Result<(), ScopeError> {
        let owner = self.non_branch_ancestor(scope);
        if self.scope(owner).identifiers.contains_key(&name) {
            return Err(ScopeError::ShadowedFunction(self.name(name)));
        }
        self.scope_mut(owner).untyped_functions.insert(
            name,
            UntypedFunction {
                node,
                defined_in: owner,
            },
        );
        Ok(())
    }

    pub fn get_function(&self, scope: ScopeId, name: Atom) -> Option<UntypedFunction<'a>> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scope(id);
            if let Some(func) = s.untyped_functions.get(&name) {
                return Some(*func);
            }
            current = s.parent;
        }
        None
    }

    /// Bind an untyped function to its now-known type, in the scope that
    /// declared it.
    pub fn update_function(&mut self, scope: ScopeId, name: Atom, type_id: TypeId) -> Result<ScopeId, ScopeError> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if self.scope_mut(id).untyped_functions.shift_remove(&name).is_some() {
                self.add_var(id, name, type_id)?;
                return Ok(id);
            }
            current = self.scope(id).parent;
        }
        Err(ScopeError::MissingFunction(self.name(name)))
    }

    /// The function scope created for `name`, searching outward.
    pub fn known_function(&self, scope: ScopeId, name: Atom) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scope(id);
            if let Some(&found) = s.function_scopes.get(&name) {
                return Some(found);
            }
            current = s.parent;
        }
        None
    }

    // ===== Prototypes =====

    pub fn add_prototype_field(
        &mut self,
        scope: ScopeId,
        constructor: Atom,
        field: Atom,
        type_id: TypeId,
    ) -> Result<(), ScopeError> {
        match &mut self.scope_mut(scope).kind {
            ScopeKind::File { prototypes } => {
                prototypes.entry(constructor).or_default().insert(field, type_id);
                Ok(())
            }
            _ => Err(ScopeError::PrototypeOutsideFile),
        }
    }

    /// Prototype fields declared for `constructor` in the enclosing file.
    pub fn prototype_fields(&self, scope: ScopeId, constructor: Atom) -> Option<&IndexMap<Atom, TypeId>> {
        let root = self.root(scope);
        match &self.scope(root).kind {
            ScopeKind::File { prototypes } => prototypes.get(&constructor),
            _ => None,
        }
    }

    pub fn root(&self, mut scope: ScopeId) -> ScopeId {
        while let Some(parent) = self.scope(scope).parent {
            scope = parent;
        }
        scope
    }

    // ===== Function bookkeeping =====

    /// Nearest function scope at or above `scope`.
    pub fn function_scope(&self, scope: ScopeId) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scope(id);
            if s.is_function() {
                return Some(id);
            }
            if s.is_file() {
                return None;
            }
            current = s.parent;
        }
        None
    }

    pub fn function_data(&self, scope: ScopeId) -> Option<&FunctionScopeData> {
        let id = self.function_scope(scope)?;
        self.scope(id).function_data()
    }

    fn function_data_mut(&mut self, scope: ScopeId) -> Result<&mut FunctionScopeData, ScopeError> {
        let id = self
            .function_scope(scope)
            .ok_or(ScopeError::NotInFunction(scope.0))?;
        match &mut self.scope_mut(id).kind {
            ScopeKind::Function(data) => Ok(&mut **data),
            _ => Err(ScopeError::NotInFunction(scope.0)),
        }
    }

    /// `this` as seen from `scope`: a branch's narrowed `this` wins over the
    /// enclosing function's declared one.
    pub fn this_type(&self, scope: ScopeId) -> Option<TypeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scope(id);
            match &s.kind {
                ScopeKind::Branch {
                    restricted_this: Some(this),
                } => return Some(*this),
                ScopeKind::Branch { .. } => {}
                ScopeKind::Function(data) => return data.this_type,
                ScopeKind::File { .. } => return None,
            }
            current = s.parent;
        }
        None
    }

    pub fn add_known_field(&mut self, scope: ScopeId, field: Atom) -> Result<(), ScopeError> {
        let data = self.function_data_mut(scope)?;
        if !data.known_fields.contains(&field) {
            data.known_fields.push(field);
        }
        Ok(())
    }

    pub fn mark_return_type(
        &mut self,
        scope: ScopeId,
        type_id: TypeId,
        loc: SourceLocation,
    ) -> Result<(), ScopeError> {
        let data = self.function_data_mut(scope)?;
        data.known_return_type = Some(type_id);
        data.return_statement_loc = Some(loc);
        Ok(())
    }

    pub fn enter_return_statement(&mut self, scope: ScopeId, expected: TypeId) -> Result<(), ScopeError> {
        self.function_data_mut(scope)?.return_expression_type = Some(expected);
        Ok(())
    }

    pub fn exit_return_statement(&mut self, scope: ScopeId) -> Result<(), ScopeError> {
        self.function_data_mut(scope)?.return_expression_type = None;
        Ok(())
    }

    pub fn return_expression_type(&self, scope: ScopeId) -> Option<TypeId> {
        self.function_data(scope)?.return_expression_type
    }
}
