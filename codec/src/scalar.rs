//! Transfer of a single, already-typed value.
//!
//! A [Scalar] knows the wire type it travels as and how to write, measure, and read its value
//! bytes. Keys, default elision, and repetition are the business of [crate::Field].

use crate::{wire::WireType, Error};
use bytes::BufMut;

/// A value that occupies exactly one wire value.
pub trait Scalar: Default + PartialEq + Sized {
    /// The wire type written in front of this value.
    const WIRE_TYPE: WireType;

    /// Returns the number of bytes [Scalar::write_value] will write.
    fn encoded_len(&self) -> usize;

    /// Writes the value without a key.
    fn write_value(&self, buf: &mut impl BufMut);

    /// Reads a value written by [Scalar::write_value], advancing `buf` past it.
    fn read_value(buf: &mut &[u8]) -> Result<Self, Error>;

    /// Returns true if the value equals the type's zero or empty default.
    #[inline]
    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
