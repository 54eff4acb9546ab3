//! Error types shared by every stage of the XCSP3 pipeline.

use thiserror::Error;

/// Convenience alias used end-to-end: every fallible operation in this
/// workspace returns `xcsp3_diagnostic::Result<T>`.
pub type Result<T> = std::result::Result<T, ParseError>;

/// The fatal error kinds a streaming XCSP3 parse can raise.
///
/// These map onto the `throw`/`std::runtime_error` sites scattered across
/// the original C++ implementation: XCSP3 parsing has no recoverable-error
/// model, so any of these aborts the parse.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed XML at byte {offset}: {message}")]
    MalformedXml { offset: usize, message: String },

    #[error("domain is not a strictly increasing sequence: {message}")]
    DomainFormatError { message: String },

    #[error("malformed compact notation at position {position}: {fragment}")]
    CompactSyntaxError { position: usize, fragment: String },

    #[error("unexpected text under <{tag}>, which forbids character data")]
    UnexpectedTextError { tag: String },

    #[error("no handler registered for tag <{name}>")]
    UnknownTagError { name: String },

    #[error("<{tag}> expected parent <{expected_parent}>, found <{actual_parent}>")]
    ParentMismatchError {
        tag: String,
        expected_parent: String,
        actual_parent: String,
    },

    #[error("unknown variable reference: {name}")]
    UnknownVariable { name: String },

    #[error("malformed expression: {message}")]
    ExpressionSyntaxError { message: String },

    #[error("'in'/'notin' operand is not a set: {message}")]
    UnsupportedSetOperandError { message: String },

    #[error("constraint '{id}' has the wrong number of arguments: {message}")]
    ConstraintArityError { id: String, message: String },

    #[error("group or slide template references unresolved parameter %{index}")]
    UnresolvedParameter { index: u32 },

    #[error("unsupported or unrecognised constraint shape: {message}")]
    UnsupportedConstruct { message: String },
}
