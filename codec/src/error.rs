//! Error types for codec operations

use crate::wire::WireType;
use thiserror::Error;

/// Error type for codec operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    #[error("invalid varint")]
    InvalidVarint,
    #[error("invalid length: {0}")]
    InvalidLength(u64),
    #[error("invalid wire type: {0}")]
    InvalidWireType(u8),
    #[error("invalid field number: {0}")]
    InvalidFieldNumber(u64),
    #[error("wire type mismatch: expected {expected:?}, found {found:?}")]
    WireTypeMismatch { expected: WireType, found: WireType },
    #[error("unable to skip unknown field {0}")]
    UnskippableField(u32),
    #[error("invalid utf-8 in string field")]
    InvalidUtf8,
    #[error("unexpected field {0} in map entry")]
    InvalidMapEntry(u32),
    #[error("no oneof alternative at index {0}")]
    InvalidAlternative(usize),
    #[error("recursion limit exceeded")]
    RecursionLimit,
    #[error("duplicate field number: {0}")]
    DuplicateFieldNumber(u32),
}
