//! Type interning for structural deduplication.
//!
//! This module converts `TypeData` structures into lightweight `TypeId`
//! handles. Interning gives:
//! - O(1) type equality (compare `TypeId` values)
//! - Copy-on-write updates: building a modified type yields a new id and
//!   never disturbs another scope's view of the original
//!
//! The checker is single-threaded, so the tables use `RefCell` rather than
//! locks; every method takes `&self`.

use crate::types::{FunctionShape, ObjectShape, PropertyInfo, TypeData, TypeId};
use jsig_common::{Atom, Interner};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Type interning table.
pub struct TypeInterner {
    types: RefCell<Vec<Rc<TypeData>>>,
    map: RefCell<FxHashMap<Rc<TypeData>, TypeId>>,
    /// String interner for names, brands and field keys
    strings: RefCell<Interner>,
}

impl TypeInterner {
    /// Create a new type interner with the built-in types pre-registered at
    /// their fixed `TypeId`s.
    pub fn new() -> Self {
        let interner = TypeInterner {
            types: RefCell::new(Vec::with_capacity(256)),
            map: RefCell::new(FxHashMap::default()),
            strings: RefCell::new(Interner::new()),
        };

        for name in [
            "Any", "Mixed", "String", "Number", "Boolean", "void", "RegExp", "Object", "Array",
            "Function",
        ] {
            interner.literal(name, true);
        }
        interner.value("null");
        interner.value("undefined");
        for name in TypeId::SENTINEL_NAMES {
            interner.literal(name, true);
        }
        let brand = interner.intern_string("Object");
        interner.intern(TypeData::Object(ObjectShape {
            properties: Vec::new(),
            open: false,
            brand,
        }));
        interner.intern(TypeData::Object(ObjectShape {
            properties: Vec::new(),
            open: true,
            brand,
        }));

        debug_assert_eq!(interner.len() as u32, TypeId::FIRST_USER);
        interner
    }

    /// Intern a string into an Atom.
    pub fn intern_string(&self, s: &str) -> Atom {
        self.strings.borrow_mut().intern(s)
    }

    /// Resolve an Atom back to its string value.
    pub fn resolve_atom(&self, atom: Atom) -> String {
        self.strings.borrow().resolve(atom).to_string()
    }

    /// Resolve an Atom without copying the string.
    pub fn resolve_atom_ref(&self, atom: Atom) -> Rc<str> {
        self.strings.borrow().resolve_rc(atom)
    }

    /// Intern a type and return its TypeId.
    /// If an equal type already exists, returns the existing TypeId.
    pub fn intern(&self, data: TypeData) -> TypeId {
        if let Some(&id) = self.map.borrow().get(&data) {
            return id;
        }

        let mut types = self.types.borrow_mut();
        let id = TypeId(types.len() as u32);
        let data = Rc::new(data);
        types.push(data.clone());
        self.map.borrow_mut().insert(data, id);
        id
    }

    /// Look up the TypeData for a given TypeId.
    pub fn lookup(&self, id: TypeId) -> Option<Rc<TypeData>> {
        self.types.borrow().get(id.0 as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.types.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn literal(&self, name: &str, builtin: bool) -> TypeId {
        let name = self.intern_string(name);
        self.intern(TypeData::Literal { name, builtin })
    }

    /// `null` or `undefined`.
    pub fn value(&self, value: &str) -> TypeId {
        let value = self.intern_string(value);
        self.intern(TypeData::Value { value, name: value })
    }

    /// Closed object with the default `Object` brand.
    pub fn object(&self, properties: Vec<PropertyInfo>) -> TypeId {
        let brand = self.intern_string("Object");
        self.intern(TypeData::Object(ObjectShape {
            properties,
            open: false,
            brand,
        }))
    }

    pub fn object_with_shape(&self, shape: ObjectShape) -> TypeId {
        self.intern(TypeData::Object(shape))
    }

    /// Intern a union, flattening nested unions and dropping duplicates.
    ///
    /// A single distinct member is returned as itself; an empty member list
    /// yields `void`.
    pub fn union(&self, members: Vec<TypeId>) -> TypeId {
        let flat = self.flatten(members, |data| match data {
            TypeData::Union(inner) => Some(inner.clone()),
            _ => None,
        });
        match flat.len() {
            0 => TypeId::VOID,
            1 => flat[0],
            _ => self.intern(TypeData::Union(flat)),
        }
    }

    pub fn union2(&self, left: TypeId, right: TypeId) -> TypeId {
        self.union(vec![left, right])
    }

    /// Intern an intersection, flattening nested intersections.
    pub fn intersection(&self, members: Vec<TypeId>) -> TypeId {
        let flat = self.flatten(members, |data| match data {
            TypeData::Intersection(inner) => Some(inner.clone()),
            _ => None,
        });
        match flat.len() {
            0 => TypeId::ANY,
            1 => flat[0],
            _ => self.intern(TypeData::Intersection(flat)),
        }
    }

    fn flatten(
        &self,
        members: Vec<TypeId>,
        nested: impl Fn(&TypeData) -> Option<Vec<TypeId>>,
    ) -> Vec<TypeId> {
        let mut flat: Vec<TypeId> = Vec::with_capacity(members.len());
        for member in members {
            let inner = self.lookup(member).and_then(|data| nested(data.as_ref()));
            match inner {
                Some(inner) => {
                    for m in inner {
                        if !flat.contains(&m) {
                            flat.push(m);
                        }
                    }
                }
                None => {
                    if !flat.contains(&member) {
                        flat.push(member);
                    }
                }
            }
        }
        flat
    }

    pub fn function(&self, shape: FunctionShape) -> TypeId {
        self.intern(TypeData::Function(shape))
    }

    pub fn generic(&self, base: TypeId, args: Vec<TypeId>) -> TypeId {
        self.intern(TypeData::Generic { base, args })
    }

    /// `Array<element>`.
    pub fn array(&self, element: TypeId) -> TypeId {
        self.generic(TypeId::ARRAY, vec![element])
    }

    pub fn tuple(&self, elements: Vec<TypeId>) -> TypeId {
        self.intern(TypeData::Tuple(elements))
    }

    pub fn renamed(&self, name: &str, original: TypeId) -> TypeId {
        let name = self.intern_string(name);
        self.intern(TypeData::Renamed {
            name,
            builtin: false,
            original,
        })
    }

    pub fn free(&self, name: &str) -> TypeId {
        let name = self.intern_string(name);
        self.intern(TypeData::Free(name))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn object_shape(&self, id: TypeId) -> Option<ObjectShape> {
        match self.lookup(id)?.as_ref() {
            TypeData::Object(shape) => Some(shape.clone()),
            _ => None,
        }
    }

    pub fn function_shape(&self, id: TypeId) -> Option<FunctionShape> {
        match self.lookup(id)?.as_ref() {
            TypeData::Function(shape) => Some(shape.clone()),
            _ => None,
        }
    }

    pub fn union_members(&self, id: TypeId) -> Option<Vec<TypeId>> {
        match self.lookup(id)?.as_ref() {
            TypeData::Union(members) => Some(members.clone()),
            _ => None,
        }
    }

    pub fn intersection_members(&self, id: TypeId) -> Option<Vec<TypeId>> {
        match self.lookup(id)?.as_ref() {
            TypeData::Intersection(members) => Some(members.clone()),
            _ => None,
        }
    }

    /// `(base, args)` of a generic application.
    pub fn generic_parts(&self, id: TypeId) -> Option<(TypeId, Vec<TypeId>)> {
        match self.lookup(id)?.as_ref() {
            TypeData::Generic { base, args } => Some((*base, args.clone())),
            _ => None,
        }
    }

    /// Element type of `Array<T>`.
    pub fn array_element(&self, id: TypeId) -> Option<TypeId> {
        match self.generic_parts(id)? {
            (TypeId::ARRAY, args) if args.len() == 1 => Some(args[0]),
            _ => None,
        }
    }

    /// Name of a literal, renamed literal or free variable.
    pub fn type_name(&self, id: TypeId) -> Option<Rc<str>> {
        match self.lookup(id)?.as_ref() {
            TypeData::Literal { name, .. }
            | TypeData::Renamed { name, .. }
            | TypeData::Free(name) => Some(self.resolve_atom_ref(*name)),
            _ => None,
        }
    }

    pub fn is_free(&self, id: TypeId) -> bool {
        matches!(self.lookup(id).as_deref(), Some(TypeData::Free(_)))
    }

    pub fn is_object(&self, id: TypeId) -> bool {
        matches!(self.lookup(id).as_deref(), Some(TypeData::Object(_)))
    }

    pub fn is_function(&self, id: TypeId) -> bool {
        matches!(self.lookup(id).as_deref(), Some(TypeData::Function(_)))
    }

    // =========================================================================
    // Copy-on-write updates
    // =========================================================================

    /// Set `name` on an object type, replacing an existing field in place or
    /// appending a new one. The `open` flag and brand are preserved.
    pub fn with_property(&self, object: TypeId, name: Atom, type_id: TypeId) -> Option<TypeId> {
        let mut shape = self.object_shape(object)?;
        match shape.properties.iter_mut().find(|p| p.name == name) {
            Some(prop) => {
                prop.type_id = type_id;
                prop.optional = false;
            }
            None => shape.properties.push(PropertyInfo::new(name, type_id)),
        }
        Some(self.object_with_shape(shape))
    }

    /// Re-brand an object or function type. Other types are returned as is.
    pub fn with_brand(&self, id: TypeId, brand: &str) -> TypeId {
        let brand = self.intern_string(brand);
        match self.lookup(id).as_deref() {
            Some(TypeData::Object(shape)) => {
                let mut shape = shape.clone();
                shape.brand = brand;
                self.object_with_shape(shape)
            }
            Some(TypeData::Function(shape)) => {
                let mut shape = shape.clone();
                shape.brand = brand;
                self.function(shape)
            }
            _ => id,
        }
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}
