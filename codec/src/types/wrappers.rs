//! Alternative integer encodings.
//!
//! Plain Rust integers always travel as two's-complement varints. These wrappers select the
//! other integer encodings of the reference scheme:
//!
//! | Wrapper      | Reference type | Encoding                     |
//! |--------------|----------------|------------------------------|
//! | [SInt32]     | `sint32`       | ZigZag varint                |
//! | [SInt64]     | `sint64`       | ZigZag varint                |
//! | [Fixed32]    | `fixed32`      | 4 bytes, little-endian       |
//! | [Fixed64]    | `fixed64`      | 8 bytes, little-endian       |
//! | [SFixed32]   | `sfixed32`     | 4 bytes, little-endian       |
//! | [SFixed64]   | `sfixed64`     | 8 bytes, little-endian       |

use crate::{
    varint::{self, SInt},
    wire::{self, WireType},
    Error, Scalar,
};
use bytes::{Buf, BufMut};
use paste::paste;

macro_rules! impl_zigzag {
    ($(#[$meta:meta])* $name:ident, $type:ty, $utype:ty) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub $type);

        impl From<$type> for $name {
            fn from(value: $type) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $type {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl Scalar for $name {
            const WIRE_TYPE: WireType = WireType::Varint;

            #[inline]
            fn encoded_len(&self) -> usize {
                varint::size_signed::<$utype, $type>(self.0)
            }

            #[inline]
            fn write_value(&self, buf: &mut impl BufMut) {
                varint::write_signed::<$utype, $type>(self.0, buf);
            }

            #[inline]
            fn read_value(buf: &mut &[u8]) -> Result<Self, Error> {
                let raw = varint::read::<u64>(buf)? as $utype;
                Ok(Self(<$type as SInt<$utype>>::un_zigzag(raw)))
            }
        }

        crate::__scalar_field!($name);
        crate::__packed_repeated!($name);
    };
}

impl_zigzag!(
    /// A signed 32-bit integer written as a ZigZag varint.
    SInt32, i32, u32
);
impl_zigzag!(
    /// A signed 64-bit integer written as a ZigZag varint.
    SInt64, i64, u64
);

macro_rules! impl_fixed {
    ($(#[$meta:meta])* $name:ident, $type:ty, $wire_type:ident) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub $type);

        impl From<$type> for $name {
            fn from(value: $type) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $type {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        paste! {
            impl Scalar for $name {
                const WIRE_TYPE: WireType = WireType::$wire_type;

                #[inline]
                fn encoded_len(&self) -> usize {
                    std::mem::size_of::<$type>()
                }

                #[inline]
                fn write_value(&self, buf: &mut impl BufMut) {
                    buf.[<put_ $type _le>](self.0);
                }

                #[inline]
                fn read_value(buf: &mut &[u8]) -> Result<Self, Error> {
                    wire::at_least(buf, std::mem::size_of::<$type>())?;
                    Ok(Self(buf.[<get_ $type _le>]()))
                }
            }
        }

        crate::__scalar_field!($name);
        crate::__packed_repeated!($name);
    };
}

impl_fixed!(
    /// An unsigned 32-bit integer written as four little-endian bytes.
    Fixed32, u32, Fixed32
);
impl_fixed!(
    /// An unsigned 64-bit integer written as eight little-endian bytes.
    Fixed64, u64, Fixed64
);
impl_fixed!(
    /// A signed 32-bit integer written as four little-endian bytes.
    SFixed32, i32, Fixed32
);
impl_fixed!(
    /// A signed 64-bit integer written as eight little-endian bytes.
    SFixed64, i64, Fixed64
);
