//! Per-field encoding policy.
//!
//! A [Field] decides, for one member bound to one field number, whether anything is emitted
//! and in which shape:
//! - Scalars are elided when they hold their default value, unless `always` is set (a selected
//!   oneof alternative or a present optional value).
//! - Nested messages are emitted only when they encode to at least one byte, unless `always` is
//!   set.
//! - Repeated scalars are packed into one length-delimited run; repeated messages, strings and
//!   byte runs get one key per element (see [Repeated]). An empty packed run is written only
//!   when `always` is set.
//! - Maps emit one length-delimited entry per key/value pair.
//!
//! [Field::field_size] must always agree with the number of bytes [Field::write_field] writes.

use crate::{
    scalar::Scalar,
    varint,
    wire::{self, WireType},
    Error,
};
use bytes::BufMut;

/// A member that can be bound to a field number.
pub trait Field: Default {
    /// Whether writing with `always` set emits at least one entry for every value.
    ///
    /// A oneof alternative must satisfy this, otherwise a selected alternative could encode to
    /// nothing and decode back as an empty union. [crate::oneof!] checks it at compile time.
    const ALWAYS_EMITTED: bool = true;

    /// Returns the number of bytes [Field::write_field] writes, key included.
    fn field_size(&self, number: u32, always: bool) -> usize;

    /// Writes the key and value for this member, or nothing if the member is elided.
    ///
    /// `always` disables default elision.
    fn write_field(&self, number: u32, always: bool, buf: &mut impl BufMut);

    /// Reads the value following a key with the given wire type into this member.
    ///
    /// `depth` is the number of nested message levels still allowed below this point.
    fn merge_field(
        &mut self,
        wire_type: WireType,
        buf: &mut &[u8],
        depth: usize,
    ) -> Result<(), Error>;
}

/// A [Field] that may appear as the element of a repeated field.
///
/// Optional values, maps, and sequences do not implement this trait, so they cannot be nested
/// inside a `Vec`.
pub trait Repeated: Field {
    /// Whether a run of elements is written as one packed length-delimited entry.
    const PACKED: bool;

    /// Returns the encoded length of a run of elements.
    fn repeated_size(items: &[Self], number: u32) -> usize;

    /// Writes a run of elements.
    fn write_repeated(items: &[Self], number: u32, buf: &mut impl BufMut);

    /// Reads one occurrence of the field, appending whatever it holds.
    fn merge_repeated(
        items: &mut Vec<Self>,
        wire_type: WireType,
        buf: &mut &[u8],
        depth: usize,
    ) -> Result<(), Error>;
}

/// Returns the encoded length of a scalar field.
#[inline]
pub fn scalar_size<S: Scalar>(value: &S, number: u32, always: bool) -> usize {
    if !always && value.is_default() {
        return 0;
    }
    wire::key_size(number) + value.encoded_len()
}

/// Writes a scalar field.
#[inline]
pub fn write_scalar<S: Scalar>(value: &S, number: u32, always: bool, buf: &mut impl BufMut) {
    if !always && value.is_default() {
        return;
    }
    wire::write_key(number, S::WIRE_TYPE, buf);
    value.write_value(buf);
}

/// Reads a scalar field, checking the wire type first.
#[inline]
pub fn merge_scalar<S: Scalar>(
    value: &mut S,
    wire_type: WireType,
    buf: &mut &[u8],
) -> Result<(), Error> {
    wire::expect(S::WIRE_TYPE, wire_type)?;
    *value = S::read_value(buf)?;
    Ok(())
}

fn packed_len<S: Scalar>(items: &[S]) -> usize {
    items.iter().map(Scalar::encoded_len).sum()
}

/// Returns the encoded length of a packed run.
pub fn packed_size<S: Scalar>(items: &[S], number: u32) -> usize {
    wire::key_size(number) + wire::length_delimited_size(packed_len(items))
}

/// Writes all elements as one length-delimited run of concatenated values.
pub fn write_packed<S: Scalar>(items: &[S], number: u32, buf: &mut impl BufMut) {
    wire::write_key(number, WireType::LengthDelimited, buf);
    varint::write(packed_len(items) as u64, buf);
    for item in items {
        item.write_value(buf);
    }
}

/// Reads a packed run, or a single unpacked element carrying the scalar's own wire type.
pub fn merge_packed<S: Scalar>(
    items: &mut Vec<S>,
    wire_type: WireType,
    buf: &mut &[u8],
) -> Result<(), Error> {
    if wire_type == WireType::LengthDelimited {
        let mut run = wire::read_length_delimited(buf)?;
        while !run.is_empty() {
            items.push(S::read_value(&mut run)?);
        }
        return Ok(());
    }
    wire::expect(S::WIRE_TYPE, wire_type)?;
    items.push(S::read_value(buf)?);
    Ok(())
}

/// Returns the encoded length of a run of independently keyed elements.
pub fn unpacked_size<T: Field>(items: &[T], number: u32) -> usize {
    items.iter().map(|item| item.field_size(number, true)).sum()
}

/// Writes each element under its own key.
///
/// Elements are never elided: an empty string or message still occupies its slot.
pub fn write_unpacked<T: Field>(items: &[T], number: u32, buf: &mut impl BufMut) {
    for item in items {
        item.write_field(number, true, buf);
    }
}

/// Reads one element and appends it.
pub fn merge_unpacked<T: Field>(
    items: &mut Vec<T>,
    wire_type: WireType,
    buf: &mut &[u8],
    depth: usize,
) -> Result<(), Error> {
    let mut item = T::default();
    item.merge_field(wire_type, buf, depth)?;
    items.push(item);
    Ok(())
}

/// Implements [Field] for a [Scalar].
#[doc(hidden)]
#[macro_export]
macro_rules! __scalar_field {
    ($type:ty) => {
        impl $crate::Field for $type {
            #[inline]
            fn field_size(&self, number: u32, always: bool) -> usize {
                $crate::field::scalar_size(self, number, always)
            }

            #[inline]
            fn write_field(
                &self,
                number: u32,
                always: bool,
                buf: &mut impl $crate::bytes::BufMut,
            ) {
                $crate::field::write_scalar(self, number, always, buf)
            }

            #[inline]
            fn merge_field(
                &mut self,
                wire_type: $crate::WireType,
                buf: &mut &[u8],
                _: usize,
            ) -> ::core::result::Result<(), $crate::Error> {
                $crate::field::merge_scalar(self, wire_type, buf)
            }
        }
    };
}

/// Implements [Repeated] for a [Scalar] encoded as a packed run.
#[doc(hidden)]
#[macro_export]
macro_rules! __packed_repeated {
    ($type:ty) => {
        impl $crate::Repeated for $type {
            const PACKED: bool = true;

            #[inline]
            fn repeated_size(items: &[Self], number: u32) -> usize {
                $crate::field::packed_size(items, number)
            }

            #[inline]
            fn write_repeated(items: &[Self], number: u32, buf: &mut impl $crate::bytes::BufMut) {
                $crate::field::write_packed(items, number, buf)
            }

            #[inline]
            fn merge_repeated(
                items: &mut ::std::vec::Vec<Self>,
                wire_type: $crate::WireType,
                buf: &mut &[u8],
                _: usize,
            ) -> ::core::result::Result<(), $crate::Error> {
                $crate::field::merge_packed(items, wire_type, buf)
            }
        }
    };
}

/// Implements [Repeated] for a [Field] written once per element.
#[doc(hidden)]
#[macro_export]
macro_rules! __unpacked_repeated {
    ($type:ty) => {
        impl $crate::Repeated for $type {
            const PACKED: bool = false;

            #[inline]
            fn repeated_size(items: &[Self], number: u32) -> usize {
                $crate::field::unpacked_size(items, number)
            }

            #[inline]
            fn write_repeated(items: &[Self], number: u32, buf: &mut impl $crate::bytes::BufMut) {
                $crate::field::write_unpacked(items, number, buf)
            }

            #[inline]
            fn merge_repeated(
                items: &mut ::std::vec::Vec<Self>,
                wire_type: $crate::WireType,
                buf: &mut &[u8],
                depth: usize,
            ) -> ::core::result::Result<(), $crate::Error> {
                $crate::field::merge_unpacked(items, wire_type, buf, depth)
            }
        }
    };
}
