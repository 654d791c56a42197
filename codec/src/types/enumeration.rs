//! Enumerations.
//!
//! An enumeration travels as its `i32` value, sign-extended to a 64-bit varint like any other
//! `int32`. Its first variant must be zero and is the default, so it is elided from the output
//! like every other default scalar.
//!
//! Enumerations are open: a value no variant names decodes to `Unrecognized(value)` and is
//! written back unchanged, so data from a newer schema survives a round trip.
//!
//! Use the [crate::enumeration!] macro to declare an enumeration; it checks the zero-first rule
//! and value uniqueness at compile time and wires up [crate::Scalar], [crate::Field], and
//! [crate::Repeated].

use crate::{varint, Error};
use bytes::BufMut;

/// An open set of named `i32` values.
pub trait Enumeration: Copy + Default + PartialEq {
    /// Returns the value written to the wire.
    fn to_i32(self) -> i32;

    /// Returns the variant carrying `value`, or the unrecognized variant holding it.
    fn from_i32(value: i32) -> Self;
}

/// Returns the encoded length of an enumeration value.
#[inline]
pub fn encoded_len<E: Enumeration>(value: E) -> usize {
    varint::size(value.to_i32() as i64 as u64)
}

/// Writes an enumeration value.
#[inline]
pub fn write<E: Enumeration>(value: E, buf: &mut impl BufMut) {
    varint::write(value.to_i32() as i64 as u64, buf);
}

/// Reads an enumeration value. Any `int32` is accepted.
#[inline]
pub fn read<E: Enumeration>(buf: &mut &[u8]) -> Result<E, Error> {
    Ok(E::from_i32(varint::read::<u64>(buf)? as i32))
}

/// Returns true if no value appears twice in `values`.
pub const fn distinct<const N: usize>(values: [i32; N]) -> bool {
    let mut i = 0;
    while i < N {
        let mut j = i + 1;
        while j < N {
            if values[i] == values[j] {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

/// Declares an enumeration usable as a message field.
///
/// The first variant must have value `0`; it becomes the [Default]. A trailing
/// `Unrecognized(i32)` variant is added to hold values the declaration does not name. Do not
/// derive `Default` on the enum yourself.
///
/// ```
/// use protowire::Enumeration;
///
/// protowire::enumeration! {
///     #[derive(Debug)]
///     pub enum Color {
///         Unspecified = 0,
///         Red = 1,
///         Blue = 2,
///         Dark = -1,
///     }
/// }
///
/// assert_eq!(Color::default(), Color::Unspecified);
/// assert_eq!(Color::from_i32(-1), Color::Dark);
/// assert_eq!(Color::from_i32(9), Color::Unrecognized(9));
/// assert_eq!(Color::Unrecognized(9).to_i32(), 9);
/// ```
///
/// Values must be distinct:
///
/// ```compile_fail
/// protowire::enumeration! {
///     pub enum Twice {
///         Zero = 0,
///         One = 1,
///         Again = 1,
///     }
/// }
/// ```
#[macro_export]
macro_rules! enumeration {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $first:ident = $first_value:literal
            $(, $variant:ident = $value:literal)* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $first,
            $($variant,)*
            /// A value this declaration does not name.
            Unrecognized(i32),
        }

        const _: () = {
            assert!(
                $first_value == 0,
                concat!("first variant of ", stringify!($name), " must be zero")
            );
            assert!(
                $crate::types::enumeration::distinct([$first_value $(, $value)*]),
                concat!("values of ", stringify!($name), " must be distinct")
            );
        };

        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self::$first
            }
        }

        impl $crate::Enumeration for $name {
            #[inline]
            fn to_i32(self) -> i32 {
                match self {
                    Self::$first => $first_value,
                    $(Self::$variant => $value,)*
                    Self::Unrecognized(value) => value,
                }
            }

            #[inline]
            fn from_i32(value: i32) -> Self {
                match value {
                    $first_value => Self::$first,
                    $($value => Self::$variant,)*
                    other => Self::Unrecognized(other),
                }
            }
        }

        impl $crate::Scalar for $name {
            const WIRE_TYPE: $crate::WireType = $crate::WireType::Varint;

            #[inline]
            fn encoded_len(&self) -> usize {
                $crate::types::enumeration::encoded_len(*self)
            }

            #[inline]
            fn write_value(&self, buf: &mut impl $crate::bytes::BufMut) {
                $crate::types::enumeration::write(*self, buf)
            }

            #[inline]
            fn read_value(buf: &mut &[u8]) -> ::core::result::Result<Self, $crate::Error> {
                $crate::types::enumeration::read(buf)
            }
        }

        $crate::__scalar_field!($name);
        $crate::__packed_repeated!($name);
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Enumeration, Field, Scalar, WireType};

    crate::enumeration! {
        #[derive(Debug)]
        enum Corpus {
            Universal = 0,
            Web = 1,
            Images = 2,
            Negative = -1,
        }
    }

    #[test]
    fn test_default_is_first() {
        assert_eq!(Corpus::default(), Corpus::Universal);
        assert!(Corpus::default().is_default());
    }

    #[test]
    fn test_values() {
        for value in [Corpus::Universal, Corpus::Web, Corpus::Images, Corpus::Negative] {
            let mut buf = Vec::new();
            value.write_value(&mut buf);
            assert_eq!(buf.len(), value.encoded_len());
            assert_eq!(Corpus::read_value(&mut &buf[..]).unwrap(), value);
        }
        assert_eq!(Corpus::Negative.encoded_len(), varint::MAX_LEN);
    }

    #[test]
    fn test_field() {
        let mut buf = Vec::new();
        Corpus::Images.write_field(4, false, &mut buf);
        Corpus::Universal.write_field(4, false, &mut buf);
        assert_eq!(buf, [0x20, 0x02]);
    }

    #[test]
    fn test_unrecognized_value() {
        let mut value = Corpus::Web;
        value
            .merge_field(WireType::Varint, &mut &[0x07u8][..], 0)
            .unwrap();
        assert_eq!(value, Corpus::Unrecognized(7));
        assert_eq!(value.to_i32(), 7);

        let mut buf = Vec::new();
        value.write_field(4, false, &mut buf);
        assert_eq!(buf, [0x20, 0x07]);

        // Negative values outside the declaration are kept as well.
        let mut buf = Vec::new();
        Corpus::Unrecognized(-2).write_value(&mut buf);
        assert_eq!(Corpus::read_value(&mut &buf[..]).unwrap(), Corpus::Unrecognized(-2));
    }

    #[test]
    fn test_named_values() {
        assert_eq!(Corpus::Negative.to_i32(), -1);
        assert_eq!(Corpus::from_i32(-1), Corpus::Negative);
        assert_eq!(Corpus::from_i32(2), Corpus::Images);
        assert!(distinct([0, 1, -1]));
        assert!(!distinct([0, 3, 3]));
    }

    #[test]
    fn test_packed() {
        let mut buf = Vec::new();
        vec![Corpus::Web, Corpus::Images].write_field(2, false, &mut buf);
        assert_eq!(buf, [0x12, 0x02, 0x01, 0x02]);

        let mut decoded = Vec::<Corpus>::new();
        decoded
            .merge_field(WireType::LengthDelimited, &mut &buf[1..], 0)
            .unwrap();
        assert_eq!(decoded, [Corpus::Web, Corpus::Images]);
    }
}
