//! String interner for identifier and type-name deduplication.
//!
//! Names are interned into a pool and passed around as u32 indices (Atoms),
//! so scope lookups and type hashing compare integers instead of strings.

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::rc::Rc;

/// An interned string identifier.
///
/// Atoms are cheap to copy (just a u32) and can be compared with == in O(1).
/// To get the actual string, use `Interner::resolve(atom)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// A sentinel value representing no atom / empty string.
    pub const NONE: Atom = Atom(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Atoms for the names in `COMMON_STRINGS`, valid for every `Interner`.
pub mod well_known {
    use super::Atom;

    pub const THIS: Atom = Atom(1);
    pub const PROTOTYPE: Atom = Atom(2);
    pub const MODULE: Atom = Atom(3);
    pub const EXPORTS: Atom = Atom(4);
    pub const REQUIRE: Atom = Atom(5);
    pub const LENGTH: Atom = Atom(6);
}

/// Names every checker run touches; interned up front, in this order, so the
/// `well_known` atoms are stable.
const COMMON_STRINGS: &[&str] = &[
    "this",
    "prototype",
    "module",
    "exports",
    "require",
    "length",
    "push",
    "slice",
    "create",
    "keys",
    "__dirname",
    "__filename",
    "undefined",
    "null",
];

/// String interner that deduplicates strings and returns Atom handles.
///
/// # Example
/// ```
/// use jsig_common::Interner;
/// let mut interner = Interner::new();
/// let a1 = interner.intern("hello");
/// let a2 = interner.intern("hello");
/// assert_eq!(a1, a2);
/// assert_eq!(interner.resolve(a1), "hello");
/// ```
#[derive(Default)]
pub struct Interner {
    /// Map from string to atom index
    map: FxHashMap<Rc<str>, Atom>,
    /// All interned strings (index 0 is the empty string)
    strings: Vec<Rc<str>>,
}

impl Interner {
    /// Create a new interner with the empty string pre-interned at index 0.
    pub fn new() -> Self {
        let mut interner = Interner {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(256),
        };
        let empty: Rc<str> = Rc::from("");
        interner.strings.push(empty.clone());
        interner.map.insert(empty, Atom::NONE);
        for s in COMMON_STRINGS {
            interner.intern(s);
        }
        interner
    }

    /// Intern a string, returning its Atom handle.
    #[inline]
    pub fn intern(&mut self, s: &str) -> Atom {
        if let Some(&atom) = self.map.get(s) {
            return atom;
        }
        let atom = Atom(self.strings.len() as u32);
        let owned: Rc<str> = Rc::from(s);
        self.strings.push(owned.clone());
        self.map.insert(owned, atom);
        atom
    }

    /// Look up a string without interning it.
    #[inline]
    pub fn get(&self, s: &str) -> Option<Atom> {
        self.map.get(s).copied()
    }

    /// Resolve an Atom back to its string value.
    /// Returns the empty string if the atom is out of bounds.
    #[inline]
    pub fn resolve(&self, atom: Atom) -> &str {
        self.strings
            .get(atom.0 as usize)
            .map(|s| s.as_ref())
            .unwrap_or("")
    }

    /// Resolve to a shared handle that outlives a borrow of the interner.
    #[inline]
    pub fn resolve_rc(&self, atom: Atom) -> Rc<str> {
        self.strings
            .get(atom.0 as usize)
            .cloned()
            .unwrap_or_else(|| Rc::from(""))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if the interner only holds the empty string.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.len() <= 1
    }
}
