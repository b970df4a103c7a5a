//! Type representation.
//!
//! A type is a `TypeData` value interned into a `TypeInterner`. Shapes hold
//! `TypeId`s for their children, so structurally equal types share one id.
//!
//! Sentinel pseudo-types are ordinary built-in literals with reserved names;
//! their special behavior lives in the subtype checker and in the verifier's
//! assignment rules.

use jsig_common::Atom;
use serde::Serialize;
use smallvec::SmallVec;

/// Handle to an interned type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const ANY: TypeId = TypeId(0);
    pub const MIXED: TypeId = TypeId(1);
    pub const STRING: TypeId = TypeId(2);
    pub const NUMBER: TypeId = TypeId(3);
    pub const BOOLEAN: TypeId = TypeId(4);
    pub const VOID: TypeId = TypeId(5);
    pub const REGEXP: TypeId = TypeId(6);
    /// The `Object` literal, not an object shape.
    pub const OBJECT: TypeId = TypeId(7);
    /// The bare `Array` literal; `Array<T>` is a generic over it.
    pub const ARRAY: TypeId = TypeId(8);
    pub const FUNCTION: TypeId = TypeId(9);
    pub const NULL: TypeId = TypeId(10);
    pub const UNDEFINED: TypeId = TypeId(11);

    /// `var x;` before the first assignment.
    pub const UNINITIALIZED: TypeId = TypeId(12);
    /// Declared result of a function whose return type is being inferred.
    pub const UNKNOWN_RETURN: TypeId = TypeId(13);
    /// `var x = null;` before the first non-null assignment.
    pub const NULL_DEFAULT: TypeId = TypeId(14);
    /// Field of an open object that has not been assigned yet.
    pub const OPEN_FIELD: TypeId = TypeId(15);
    /// `module.exports` before the export is assigned.
    pub const MODULE_EXPORTS: TypeId = TypeId(16);

    /// Closed `{}`.
    pub const EMPTY_OBJECT: TypeId = TypeId(17);
    /// Open `{}`: fields may be added by assignment.
    pub const OPEN_OBJECT: TypeId = TypeId(18);

    pub(crate) const FIRST_USER: u32 = 19;

    /// Reserved names of the sentinel literals, indexed from `UNINITIALIZED`.
    pub const SENTINEL_NAMES: [&'static str; 5] = [
        "%Void%%Uninitialized",
        "%Void%%UnknownReturn",
        "%Null%%Default",
        "%Mixed%%OpenField",
        "%Any%%ModuleExports",
    ];

    #[inline]
    pub fn is_sentinel(self) -> bool {
        self.0 >= Self::UNINITIALIZED.0 && self.0 <= Self::MODULE_EXPORTS.0
    }

    /// Sentinels whose binding is replaced by the first assigned type.
    #[inline]
    pub fn grows_freely(self) -> bool {
        self == Self::UNINITIALIZED || self == Self::NULL_DEFAULT
    }

    /// Values that are `null` or `undefined` at runtime.
    #[inline]
    pub fn is_nullish(self) -> bool {
        matches!(
            self,
            Self::NULL | Self::UNDEFINED | Self::NULL_DEFAULT | Self::UNINITIALIZED
        )
    }

    #[inline]
    pub fn is_any_like(self) -> bool {
        self == Self::ANY || self == Self::MIXED
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    /// A named type such as `String`, or a generic parameter name.
    Literal { name: Atom, builtin: bool },
    /// Singleton value: `null` or `undefined`.
    Value { value: Atom, name: Atom },
    Object(ObjectShape),
    Union(Vec<TypeId>),
    Intersection(Vec<TypeId>),
    Function(FunctionShape),
    /// `base<args...>`, e.g. `Array<String>`.
    Generic { base: TypeId, args: Vec<TypeId> },
    Tuple(Vec<TypeId>),
    /// Nominal alias produced by `import { Foo as Bar }`.
    Renamed {
        name: Atom,
        builtin: bool,
        original: TypeId,
    },
    /// Unsolved generic placeholder; compatible with anything.
    Free(Atom),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyInfo {
    pub name: Atom,
    pub type_id: TypeId,
    pub optional: bool,
}

impl PropertyInfo {
    pub fn new(name: Atom, type_id: TypeId) -> Self {
        Self {
            name,
            type_id,
            optional: false,
        }
    }
}

/// Object fields in declaration order; lookup is by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectShape {
    pub properties: Vec<PropertyInfo>,
    pub open: bool,
    pub brand: Atom,
}

impl ObjectShape {
    pub fn find(&self, name: Atom) -> Option<&PropertyInfo> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn position(&self, name: Atom) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamInfo {
    pub name: Option<Atom>,
    pub type_id: TypeId,
    pub optional: bool,
}

impl ParamInfo {
    pub fn unnamed(type_id: TypeId) -> Self {
        Self {
            name: None,
            type_id,
            optional: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShape {
    pub params: Vec<ParamInfo>,
    pub result: TypeId,
    pub this_arg: Option<TypeId>,
    pub generics: Vec<GenericVar>,
    pub brand: Atom,
}

impl FunctionShape {
    /// Parameters that must be supplied at a call site.
    pub fn required_params(&self) -> usize {
        self.params.iter().filter(|p| !p.optional).count()
    }
}

/// One occurrence of a generic variable inside a function type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GenericVar {
    pub name: Atom,
    pub location: SmallVec<[PathStep; 4]>,
}

/// One step of a path from a function type to a nested type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathStep {
    Arg(usize),
    ThisArg,
    Result,
    /// Type argument of a generic.
    TypeArg(usize),
    /// Field of an object, by position.
    Field(usize),
    /// Member of a union or intersection.
    Member(usize),
    /// Element of a tuple.
    Element(usize),
}
