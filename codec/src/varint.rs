//! Base-128 varints and ZigZag.
//!
//! A varint stores an unsigned integer in groups of seven bits, least significant group first.
//! The high bit of every byte except the last is set. A 64-bit value therefore occupies between
//! one and [MAX_LEN] bytes.
//!
//! ZigZag interleaves signed values (`0, -1, 1, -2, ...` becomes `0, 1, 2, 3, ...`) so that
//! small negative numbers stay short once written as varints.
//!
//! Only the 32 and 64-bit widths used by the wire format are implemented.

use crate::Error;
use bytes::{Buf, BufMut};
use std::ops::{BitOrAssign, Shl, ShrAssign};

const GROUP_BITS: usize = 7;
const GROUP_MASK: u8 = 0x7F;
const MORE: u8 = 0x80;

/// The maximum number of bytes a 64-bit varint can occupy.
pub const MAX_LEN: usize = 10;

/// An unsigned integer that can be written as a varint.
pub trait UInt:
    Copy
    + From<u8>
    + ShrAssign<usize>
    + Shl<usize, Output = Self>
    + BitOrAssign<Self>
    + PartialOrd
{
    /// The width of the integer in bits.
    const BITS: usize;

    /// Returns the number of leading zero bits.
    fn leading_zeros(self) -> u32;

    /// Returns the low eight bits.
    fn low_byte(self) -> u8;
}

macro_rules! impl_uint {
    ($type:ty) => {
        impl UInt for $type {
            const BITS: usize = <$type>::BITS as usize;

            #[inline]
            fn leading_zeros(self) -> u32 {
                <$type>::leading_zeros(self)
            }

            #[inline]
            fn low_byte(self) -> u8 {
                self as u8
            }
        }
    };
}
impl_uint!(u32);
impl_uint!(u64);

/// A signed integer with a ZigZag mapping onto the unsigned integer of the same width.
pub trait SInt<U: UInt> {
    /// Maps the value onto its unsigned ZigZag form.
    fn as_zigzag(&self) -> U;

    /// Maps an unsigned ZigZag form back onto the signed value.
    fn un_zigzag(value: U) -> Self;
}

macro_rules! impl_sint {
    ($type:ty, $utype:ty) => {
        impl SInt<$utype> for $type {
            #[inline]
            fn as_zigzag(&self) -> $utype {
                // The arithmetic shift spreads the sign bit over the whole word.
                ((*self as $utype) << 1) ^ ((*self >> (<$type>::BITS - 1)) as $utype)
            }

            #[inline]
            fn un_zigzag(value: $utype) -> Self {
                ((value >> 1) as $type) ^ -((value & 1) as $type)
            }
        }
    };
}
impl_sint!(i32, u32);
impl_sint!(i64, u64);

/// Writes `value` as a varint.
pub fn write<T: UInt>(value: T, buf: &mut impl BufMut) {
    let more = T::from(MORE);
    let mut rest = value;
    while rest >= more {
        buf.put_u8(rest.low_byte() | MORE);
        rest >>= GROUP_BITS;
    }
    buf.put_u8(rest.low_byte());
}

/// Reads a varint into a `T`.
///
/// Fails with [Error::EndOfBuffer] if the buffer ends before the final byte and with
/// [Error::InvalidVarint] if the encoding carries bits that do not fit in `T`.
pub fn read<T: UInt>(buf: &mut impl Buf) -> Result<T, Error> {
    let mut value = T::from(0);
    let mut shift = 0;
    loop {
        if !buf.has_remaining() {
            return Err(Error::EndOfBuffer);
        }
        let byte = buf.get_u8();

        // On the last group that fits, any bit past the width of `T` is an overflow. The
        // continuation bit is the highest bit, so this also rejects a varint that keeps going.
        let room = T::BITS - shift;
        if room <= GROUP_BITS && (u8::BITS - byte.leading_zeros()) as usize > room {
            return Err(Error::InvalidVarint);
        }

        value |= T::from(byte & GROUP_MASK) << shift;
        if byte & MORE == 0 {
            return Ok(value);
        }
        shift += GROUP_BITS;
    }
}

/// Returns the number of bytes [write] uses for `value`.
pub fn size<T: UInt>(value: T) -> usize {
    let bits = T::BITS - value.leading_zeros() as usize;
    bits.div_ceil(GROUP_BITS).max(1)
}

/// Writes `value` as a ZigZag varint.
pub fn write_signed<U: UInt, S: SInt<U>>(value: S, buf: &mut impl BufMut) {
    write(value.as_zigzag(), buf);
}

/// Returns the number of bytes [write_signed] uses for `value`.
pub fn size_signed<U: UInt, S: SInt<U>>(value: S) -> usize {
    size(value.as_zigzag())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_known_encodings() {
        let cases: [(u64, &[u8]); 7] = [
            (0, &[0x00]),
            (1, &[0x01]),
            (127, &[0x7F]),
            (128, &[0x80, 0x01]),
            (150, &[0x96, 0x01]),
            (300, &[0xAC, 0x02]),
            (
                u64::MAX,
                &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01],
            ),
        ];
        for (value, expected) in cases {
            let mut buf = Vec::new();
            write(value, &mut buf);
            assert_eq!(buf, expected);
            assert_eq!(size(value), expected.len());
            assert_eq!(read::<u64>(&mut &buf[..]).unwrap(), value);
        }
    }

    #[test]
    fn test_group_boundaries() {
        for bits in 0..64 {
            for value in [(1u64 << bits) - 1, 1u64 << bits] {
                let mut buf = Vec::new();
                write(value, &mut buf);
                assert_eq!(buf.len(), size(value));
                assert!(buf.len() <= MAX_LEN);

                let mut reader = &buf[..];
                assert_eq!(read::<u64>(&mut reader).unwrap(), value);
                assert!(reader.is_empty());
            }
        }
    }

    #[test]
    fn test_u32() {
        for value in [0u32, 1, 0x7F, 0x80, 0x3FFF, 0x4000, u32::MAX] {
            let mut buf = Vec::new();
            write(value, &mut buf);
            assert_eq!(buf.len(), size(value));
            assert_eq!(read::<u32>(&mut &buf[..]).unwrap(), value);
        }
        assert_eq!(size(u32::MAX), 5);
    }

    #[test]
    fn test_zigzag() {
        assert_eq!(0i32.as_zigzag(), 0u32);
        assert_eq!((-1i32).as_zigzag(), 1u32);
        assert_eq!(1i32.as_zigzag(), 2u32);
        assert_eq!((-2i32).as_zigzag(), 3u32);
        assert_eq!(i32::MAX.as_zigzag(), 0xFFFF_FFFE);
        assert_eq!(i32::MIN.as_zigzag(), 0xFFFF_FFFF);
        assert_eq!(i64::MIN.as_zigzag(), u64::MAX);

        for value in [0i64, 1, -1, 63, -64, 64, -65, i64::MIN, i64::MAX] {
            assert_eq!(<i64 as SInt<u64>>::un_zigzag(value.as_zigzag()), value);
        }
        for value in [0i32, -300, 300, i32::MIN, i32::MAX] {
            assert_eq!(<i32 as SInt<u32>>::un_zigzag(value.as_zigzag()), value);
        }
    }

    #[test]
    fn test_signed_size() {
        assert_eq!(size_signed::<u64, i64>(-64), 1);
        assert_eq!(size_signed::<u64, i64>(64), 2);
        assert_eq!(size_signed::<u64, i64>(i64::MIN), MAX_LEN);

        let mut buf = Vec::new();
        write_signed::<u32, i32>(-3, &mut buf);
        assert_eq!(buf, [0x05]);
    }

    #[test]
    fn test_end_of_buffer() {
        let mut buf = Bytes::from_static(&[0x80]);
        assert_eq!(read::<u64>(&mut buf), Err(Error::EndOfBuffer));
        assert_eq!(read::<u64>(&mut &[0u8; 0][..]), Err(Error::EndOfBuffer));
    }

    #[test]
    fn test_overflow() {
        // Continuation bit on the tenth byte.
        let mut buf = Bytes::from_static(&[0x80; 11]);
        assert_eq!(read::<u64>(&mut buf), Err(Error::InvalidVarint));

        // Tenth byte carries bits beyond 64.
        let mut buf =
            Bytes::from_static(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x02]);
        assert_eq!(read::<u64>(&mut buf), Err(Error::InvalidVarint));

        // The fifth byte of a u32 may only carry four bits.
        let mut buf = Bytes::from_static(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]);
        assert_eq!(read::<u32>(&mut buf), Err(Error::InvalidVarint));
    }
}
