use thiserror::Error;

/// Scope invariant violations. These abort the run; they signal a header or
/// checker state the verifier cannot recover from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("identifier `{0}` must not already exist in this scope")]
    DuplicateIdentifier(String),

    #[error("identifier `{0}` must already exist to be updated")]
    MissingIdentifier(String),

    #[error("function `{0}` must exist already")]
    MissingFunction(String),

    #[error("cannot shadow identifier `{0}` with an untyped function")]
    ShadowedFunction(String),

    #[error("cannot add function scope twice: {0}")]
    DuplicateFunctionScope(String),

    #[error("cannot double restrict type: {0}")]
    DoubleRestriction(String),

    #[error("cannot restrict `this` outside a branch")]
    CannotRestrictThis,

    #[error("prototype fields can only be declared at file scope")]
    PrototypeOutsideFile,

    #[error("scope {0} is not inside a function")]
    NotInFunction(u32),
}
