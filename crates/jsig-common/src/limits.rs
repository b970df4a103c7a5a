//! Centralized limits for the checker.

/// Maximum nesting of `require` chains compiled recursively.
///
/// Cyclic chains are reported long before this; the limit only guards
/// pathological acyclic chains from exhausting the stack.
pub const MAX_MODULE_DEPTH: usize = 128;

/// Maximum depth of type structure walked by the subtype checker.
pub const MAX_SUBTYPE_DEPTH: u32 = 256;

/// Maximum depth of nested type-declaration inlining in a header file.
pub const MAX_INLINE_DEPTH: u32 = 64;
