//! Scalar implementations for Rust primitive types.
//!
//! # Integers
//!
//! All integers are varints. Signed values are not ZigZag'ed: a negative `i32` is sign-extended
//! to 64 bits first, so it always occupies ten bytes, exactly as the reference `int32` type
//! does. Use [crate::SInt32] and [crate::SInt64] for compact negative values.
//!
//! 32-bit types are read as 64-bit varints and truncated, which lets an `int32` field accept
//! values written by an `int64` writer.
//!
//! # Floats
//!
//! `f32` and `f64` are copied little-endian with no transform, as `FIXED32` and `FIXED64`.

use crate::{
    varint,
    wire::{self, WireType},
    Error, Scalar,
};
use bytes::{Buf, BufMut};
use paste::paste;

macro_rules! impl_varint {
    ($type:ty, $wide:ty) => {
        impl Scalar for $type {
            const WIRE_TYPE: WireType = WireType::Varint;

            #[inline]
            #[allow(clippy::unnecessary_cast)]
            fn encoded_len(&self) -> usize {
                varint::size(*self as $wide as u64)
            }

            #[inline]
            #[allow(clippy::unnecessary_cast)]
            fn write_value(&self, buf: &mut impl BufMut) {
                varint::write(*self as $wide as u64, buf);
            }

            #[inline]
            fn read_value(buf: &mut &[u8]) -> Result<Self, Error> {
                Ok(varint::read::<u64>(buf)? as $type)
            }
        }

        crate::__scalar_field!($type);
        crate::__packed_repeated!($type);
    };
}

impl_varint!(i32, i64);
impl_varint!(i64, i64);
impl_varint!(u32, u64);
impl_varint!(u64, u64);

macro_rules! impl_float {
    ($type:ty, $wire_type:ident) => {
        paste! {
            impl Scalar for $type {
                const WIRE_TYPE: WireType = WireType::$wire_type;

                #[inline]
                fn encoded_len(&self) -> usize {
                    std::mem::size_of::<$type>()
                }

                #[inline]
                fn write_value(&self, buf: &mut impl BufMut) {
                    buf.[<put_ $type _le>](*self);
                }

                #[inline]
                fn read_value(buf: &mut &[u8]) -> Result<Self, Error> {
                    wire::at_least(buf, std::mem::size_of::<$type>())?;
                    Ok(buf.[<get_ $type _le>]())
                }
            }
        }

        crate::__scalar_field!($type);
        crate::__packed_repeated!($type);
    };
}

impl_float!(f32, Fixed32);
impl_float!(f64, Fixed64);

// Bool implementation
impl Scalar for bool {
    const WIRE_TYPE: WireType = WireType::Varint;

    #[inline]
    fn encoded_len(&self) -> usize {
        1
    }

    #[inline]
    fn write_value(&self, buf: &mut impl BufMut) {
        buf.put_u8(u8::from(*self));
    }

    #[inline]
    fn read_value(buf: &mut &[u8]) -> Result<Self, Error> {
        Ok(varint::read::<u64>(buf)? != 0)
    }
}

crate::__scalar_field!(bool);
crate::__packed_repeated!(bool);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Field;

    fn field_bytes<F: Field>(value: &F, number: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        value.write_field(number, false, &mut buf);
        assert_eq!(buf.len(), value.field_size(number, false));
        buf
    }

    macro_rules! impl_num_test {
        ($type:ty) => {
            paste! {
                #[test]
                fn [<test_ $type>]() {
                    let values: [$type; 5] =
                        [0 as $type, 1 as $type, 42 as $type, <$type>::MAX, <$type>::MIN];
                    for value in values.iter() {
                        let mut buf = Vec::new();
                        value.write_value(&mut buf);
                        assert_eq!(buf.len(), value.encoded_len());
                        let mut reader = &buf[..];
                        let decoded = <$type>::read_value(&mut reader).unwrap();
                        assert_eq!(*value, decoded);
                        assert!(reader.is_empty());
                    }
                }
            }
        };
    }
    impl_num_test!(i32);
    impl_num_test!(i64);
    impl_num_test!(u32);
    impl_num_test!(u64);
    impl_num_test!(f32);
    impl_num_test!(f64);

    #[test]
    fn test_conformity() {
        assert_eq!(field_bytes(&5i32, 1), [0x08, 0x05]);
        assert_eq!(field_bytes(&150u32, 1), [0x08, 0x96, 0x01]);
        assert_eq!(field_bytes(&1u64, 16), [0x80, 0x01, 0x01]);
        assert_eq!(field_bytes(&true, 11), [0x58, 0x01]);

        // Negative int32 is sign-extended to ten bytes.
        assert_eq!(
            field_bytes(&-1i32, 1),
            [0x08, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]
        );
        assert_eq!(field_bytes(&-1i32, 1), field_bytes(&-1i64, 1));

        // Floats are little-endian.
        assert_eq!(field_bytes(&2.0f32, 12), [0x65, 0x00, 0x00, 0x00, 0x40]);
        assert_eq!(
            field_bytes(&3.0f64, 13),
            [0x69, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x08, 0x40]
        );
    }

    #[test]
    fn test_default_elision() {
        assert!(field_bytes(&0i32, 1).is_empty());
        assert!(field_bytes(&0u64, 1).is_empty());
        assert!(field_bytes(&false, 1).is_empty());
        assert!(field_bytes(&0.0f32, 1).is_empty());
        assert!(field_bytes(&0.0f64, 1).is_empty());
    }

    #[test]
    fn test_int32_reads_int64_writer() {
        let mut buf = Vec::new();
        (-5i64).write_value(&mut buf);
        assert_eq!(i32::read_value(&mut &buf[..]).unwrap(), -5);
    }

    #[test]
    fn test_bool_nonzero_is_true() {
        assert!(bool::read_value(&mut &[0x02u8][..]).unwrap());
        assert!(!bool::read_value(&mut &[0x00u8][..]).unwrap());
    }

    #[test]
    fn test_merge_wire_type_mismatch() {
        let mut value = 0u32;
        assert_eq!(
            value.merge_field(WireType::LengthDelimited, &mut &[0x01u8][..], 0),
            Err(Error::WireTypeMismatch {
                expected: WireType::Varint,
                found: WireType::LengthDelimited,
            })
        );

        let mut value = 0f64;
        assert_eq!(
            value.merge_field(WireType::Fixed64, &mut &[0u8; 7][..], 0),
            Err(Error::EndOfBuffer)
        );
    }
}
