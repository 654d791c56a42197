//! Tagged unions.
//!
//! A [Oneof] holds at most one of several alternatives. Index `0` is always the empty
//! alternative; the remaining alternatives are numbered from `1` in declaration order and bound,
//! one to one and in the same order, to the field numbers listed in the message binding.
//!
//! The selected alternative is always written, even when it holds its default value. An empty
//! union writes nothing. Alternatives whose type could still write nothing (an `Option`, a map,
//! or a sequence of strings, byte runs or messages) are rejected at compile time.
//!
//! # Example
//!
//! ```
//! protowire::oneof! {
//!     #[derive(Debug, PartialEq)]
//!     pub enum Payload {
//!         Number(i32),
//!         Text(String),
//!     }
//! }
//!
//! #[derive(Debug, Default, PartialEq)]
//! pub struct Envelope {
//!     id: u64,
//!     payload: Payload,
//! }
//!
//! protowire::message!(Envelope { id: 1, payload: [2, 3] });
//!
//! use protowire::Message;
//! let envelope = Envelope { id: 0, payload: Payload::Number(0) };
//! assert_eq!(&envelope.encode()[..], &[0x10, 0x00]);
//! assert_eq!(Envelope::decode(&[0x1A, 0x01, b'a']).unwrap().payload, Payload::Text("a".into()));
//! ```

use crate::{wire::WireType, Error};
use bytes::BufMut;

/// A tagged union with an empty alternative at index `0`.
pub trait Oneof: Default {
    /// The number of non-empty alternatives.
    const ALTERNATIVES: usize;

    /// Returns the index of the selected alternative, or `0` if the union is empty.
    fn index(&self) -> usize;

    /// Returns the encoded length of the selected alternative under `number`.
    fn alternative_size(&self, number: u32) -> usize;

    /// Writes the selected alternative under `number`.
    fn write_alternative(&self, number: u32, buf: &mut impl BufMut);

    /// Reads the alternative at `index` (starting at `1`) and selects it.
    ///
    /// Fails with [Error::InvalidAlternative] if no alternative has that index. On failure the
    /// union is left unchanged.
    fn merge_alternative(
        &mut self,
        index: usize,
        wire_type: WireType,
        buf: &mut &[u8],
        depth: usize,
    ) -> Result<(), Error>;
}

/// Checks at compile time that `numbers` has one entry per alternative of `O`.
#[inline]
pub fn bind<'a, O: Oneof, const N: usize>(_: &O, numbers: &'a [u32; N]) -> &'a [u32] {
    const {
        assert!(
            O::ALTERNATIVES == N,
            "oneof binding must list one field number per alternative"
        );
    };
    numbers
}

/// Returns the field number bound to the selected alternative, if any.
#[inline]
pub fn selected<O: Oneof>(member: &O, numbers: &[u32]) -> Option<u32> {
    member
        .index()
        .checked_sub(1)
        .and_then(|position| numbers.get(position))
        .copied()
}

/// Returns the encoded length of a union field.
#[inline]
pub fn size<O: Oneof>(member: &O, numbers: &[u32]) -> usize {
    selected(member, numbers).map_or(0, |number| member.alternative_size(number))
}

/// Writes the selected alternative of a union field, if any.
#[inline]
pub fn write<O: Oneof>(member: &O, numbers: &[u32], buf: &mut impl BufMut) {
    if let Some(number) = selected(member, numbers) {
        member.write_alternative(number, buf);
    }
}

/// Declares a tagged union usable as a message field.
///
/// An empty variant named `None` is added in front of the listed alternatives and is the
/// [Default]. Do not derive `Default` on the enum yourself.
///
/// Every alternative type must always leave an entry on the wire (see
/// [crate::Field::ALWAYS_EMITTED]):
///
/// ```compile_fail
/// protowire::oneof! {
///     pub enum Maybe {
///         Value(Option<u32>),
///     }
/// }
/// ```
#[macro_export]
macro_rules! oneof {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident($type:ty)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            None,
            $($variant($type),)+
        }

        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self::None
            }
        }

        const _: () = {
            $(assert!(
                <$type as $crate::Field>::ALWAYS_EMITTED,
                concat!(
                    stringify!($name), "::", stringify!($variant),
                    " may encode to nothing and cannot be a oneof alternative"
                )
            );)+
        };

        impl $crate::Oneof for $name {
            const ALTERNATIVES: usize = <[&str]>::len(&[$(stringify!($variant)),+]);

            fn index(&self) -> usize {
                let mut index = 0usize;
                $(
                    index += 1;
                    if let Self::$variant(_) = self {
                        return index;
                    }
                )+
                0
            }

            fn alternative_size(&self, number: u32) -> usize {
                match self {
                    Self::None => 0,
                    $(Self::$variant(value) => $crate::Field::field_size(value, number, true),)+
                }
            }

            fn write_alternative(&self, number: u32, buf: &mut impl $crate::bytes::BufMut) {
                match self {
                    Self::None => {}
                    $(Self::$variant(value) => $crate::Field::write_field(value, number, true, buf),)+
                }
            }

            fn merge_alternative(
                &mut self,
                index: usize,
                wire_type: $crate::WireType,
                buf: &mut &[u8],
                depth: usize,
            ) -> ::core::result::Result<(), $crate::Error> {
                let mut current = 0usize;
                $(
                    current += 1;
                    if current == index {
                        let mut value = <$type as ::core::default::Default>::default();
                        $crate::Field::merge_field(&mut value, wire_type, buf, depth)?;
                        *self = Self::$variant(value);
                        return ::core::result::Result::Ok(());
                    }
                )+
                ::core::result::Result::Err($crate::Error::InvalidAlternative(index))
            }
        }
    };
}
