use jsig_common::Atom;
use jsig_solver::TypeId;
use rustc_hash::FxHashMap;

/// Process-wide bindings shared by every file: language identifiers,
/// operator signatures and the virtual types used for member access on
/// primitive receivers.
#[derive(Clone, Debug, Default)]
pub struct GlobalScope {
    identifiers: FxHashMap<Atom, TypeId>,
    operators: FxHashMap<String, TypeId>,
    virtual_types: FxHashMap<String, TypeId>,
}

impl GlobalScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_var(&self, name: Atom) -> Option<TypeId> {
        self.identifiers.get(&name).copied()
    }

    /// Later definitions replace earlier ones; the globals file may override
    /// a language identifier.
    pub fn add_var(&mut self, name: Atom, type_id: TypeId) {
        self.identifiers.insert(name, type_id);
    }

    pub fn get_operator(&self, op: &str) -> Option<TypeId> {
        self.operators.get(op).copied()
    }

    pub fn add_operator(&mut self, op: &str, type_id: TypeId) {
        self.operators.insert(op.to_string(), type_id);
    }

    pub fn get_virtual_type(&self, name: &str) -> Option<TypeId> {
        self.virtual_types.get(name).copied()
    }

    pub fn add_virtual_type(&mut self, name: &str, type_id: TypeId) {
        self.virtual_types.insert(name.to_string(), type_id);
    }

    pub fn identifier_count(&self) -> usize {
        self.identifiers.len()
    }
}
