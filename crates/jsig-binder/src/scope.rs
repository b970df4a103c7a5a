//! Scope records stored in the arena.

use indexmap::IndexMap;
use jsig_ast::Function;
use jsig_common::{Atom, SourceLocation};
use jsig_solver::TypeId;

/// Handle to a scope in a `ScopeArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

impl ScopeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How `get_var` treats branch restrictions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LookupMode {
    #[default]
    Normal,
    /// Assignment targets resolve to the declared type, ignoring every
    /// restriction on the chain.
    Writable,
}

/// A function declaration seen before its type is known.
#[derive(Clone, Copy, Debug)]
pub struct UntypedFunction<'a> {
    pub node: &'a Function,
    /// Scope the declaration appeared in; its body is verified from there.
    pub defined_in: ScopeId,
}

#[derive(Clone, Debug)]
pub struct FunctionScopeData {
    pub name: Atom,
    pub this_type: Option<TypeId>,
    /// Declared result; `UNKNOWN_RETURN` while inferring from a call site.
    pub return_type: TypeId,
    pub func_type: TypeId,
    pub is_constructor: bool,
    /// Fields assigned through `this.<field>`, in first-assignment order.
    pub known_fields: Vec<Atom>,
    /// Type of the last return statement verified.
    pub known_return_type: Option<TypeId>,
    pub return_statement_loc: Option<SourceLocation>,
    /// Set while the argument of a return statement is being verified.
    pub return_expression_type: Option<TypeId>,
}

impl FunctionScopeData {
    pub fn new(name: Atom, name_text: &str, func_type: TypeId) -> Self {
        Self {
            name,
            this_type: None,
            return_type: TypeId::UNKNOWN_RETURN,
            func_type,
            is_constructor: is_constructor_name(name_text),
            known_fields: Vec::new(),
            known_return_type: None,
            return_statement_loc: None,
            return_expression_type: None,
        }
    }
}

/// A function is a constructor iff its name starts with an uppercase letter.
pub fn is_constructor_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

#[derive(Clone, Debug)]
pub enum ScopeKind {
    File {
        /// Constructor name -> prototype field -> type.
        prototypes: IndexMap<Atom, IndexMap<Atom, TypeId>>,
    },
    Function(Box<FunctionScopeData>),
    Branch {
        restricted_this: Option<TypeId>,
    },
}

#[derive(Clone, Debug)]
pub struct Scope<'a> {
    pub parent: Option<ScopeId>,
    pub kind: ScopeKind,
    pub identifiers: IndexMap<Atom, TypeId>,
    pub restrictions: IndexMap<Atom, TypeId>,
    pub untyped_functions: IndexMap<Atom, UntypedFunction<'a>>,
    /// Function scopes created for functions declared here.
    pub function_scopes: IndexMap<Atom, ScopeId>,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(parent: Option<ScopeId>, kind: ScopeKind) -> Self {
        Self {
            parent,
            kind,
            identifiers: IndexMap::new(),
            restrictions: IndexMap::new(),
            untyped_functions: IndexMap::new(),
            function_scopes: IndexMap::new(),
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, ScopeKind::File { .. })
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, ScopeKind::Function(_))
    }

    pub fn is_branch(&self) -> bool {
        matches!(self.kind, ScopeKind::Branch { .. })
    }

    pub fn function_data(&self) -> Option<&FunctionScopeData> {
        match &self.kind {
            ScopeKind::Function(data) => Some(&**data),
            _ => None,
        }
    }
}
