//! Keys, wire types, and skipping.
//!
//! Every entry of an encoded message is a key followed by a value. The key is a varint holding
//! `(field_number << 3) | wire_type`, and the wire type alone determines how many bytes of
//! value follow. That is enough to step over fields this side of the schema does not know about.

use crate::{varint, Error};
use bytes::{Buf, BufMut};

/// The largest field number that fits in a key after the 3-bit wire type shift.
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

const WIRE_TYPE_BITS: u32 = 3;
const WIRE_TYPE_MASK: u64 = 0x7;

/// Byte layout of the value following a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireType {
    /// Base-128 varint.
    Varint = 0,
    /// Eight little-endian bytes.
    Fixed64 = 1,
    /// Varint length followed by that many bytes.
    LengthDelimited = 2,
    /// Four little-endian bytes.
    Fixed32 = 5,
}

impl TryFrom<u8> for WireType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Varint),
            1 => Ok(Self::Fixed64),
            2 => Ok(Self::LengthDelimited),
            5 => Ok(Self::Fixed32),
            other => Err(Error::InvalidWireType(other)),
        }
    }
}

/// Combines a field number and a wire type into a tag.
#[inline]
pub const fn make_tag(number: u32, wire_type: WireType) -> u64 {
    ((number as u64) << WIRE_TYPE_BITS) | wire_type as u64
}

/// Returns the encoded length of the key for `number`.
#[inline]
pub fn key_size(number: u32) -> usize {
    varint::size(make_tag(number, WireType::Varint))
}

/// Writes the key for a field.
#[inline]
pub fn write_key(number: u32, wire_type: WireType, buf: &mut impl BufMut) {
    varint::write(make_tag(number, wire_type), buf);
}

/// Reads a key, returning the field number and wire type.
pub fn read_key(buf: &mut impl Buf) -> Result<(u32, WireType), Error> {
    let tag = varint::read::<u64>(buf)?;
    let wire_type = WireType::try_from((tag & WIRE_TYPE_MASK) as u8)?;
    let number = tag >> WIRE_TYPE_BITS;
    if number == 0 || number > MAX_FIELD_NUMBER as u64 {
        return Err(Error::InvalidFieldNumber(number));
    }
    Ok((number as u32, wire_type))
}

/// Returns an error if the wire type read from a key is not the one a field requires.
#[inline]
pub fn expect(expected: WireType, found: WireType) -> Result<(), Error> {
    if expected != found {
        return Err(Error::WireTypeMismatch { expected, found });
    }
    Ok(())
}

/// Ensures the buffer has at least `len` bytes remaining.
#[inline]
pub fn at_least<B: Buf>(buf: &mut B, len: usize) -> Result<(), Error> {
    let rem = buf.remaining();
    if rem < len {
        return Err(Error::EndOfBuffer);
    }
    Ok(())
}

/// Reads a varint length and returns that many bytes, advancing `buf` past them.
pub fn read_length_delimited<'a>(buf: &mut &'a [u8]) -> Result<&'a [u8], Error> {
    let len = varint::read::<u64>(buf)?;
    let len = usize::try_from(len).map_err(|_| Error::InvalidLength(len))?;
    at_least(buf, len)?;
    let data: &'a [u8] = *buf;
    let (value, rest) = data.split_at(len);
    *buf = rest;
    Ok(value)
}

/// Writes a varint length followed by `value`.
#[inline]
pub fn write_length_delimited(value: &[u8], buf: &mut impl BufMut) {
    varint::write(value.len() as u64, buf);
    buf.put_slice(value);
}

/// Returns the encoded length of a length-delimited value of `len` bytes.
#[inline]
pub fn length_delimited_size(len: usize) -> usize {
    varint::size(len as u64) + len
}

/// Advances `buf` past one value of the given wire type without interpreting it.
pub fn skip_field(wire_type: WireType, buf: &mut impl Buf) -> Result<(), Error> {
    match wire_type {
        WireType::Varint => {
            varint::read::<u64>(buf)?;
        }
        WireType::Fixed64 => {
            at_least(buf, 8)?;
            buf.advance(8);
        }
        WireType::LengthDelimited => {
            let len = varint::read::<u64>(buf)?;
            let len = usize::try_from(len).map_err(|_| Error::InvalidLength(len))?;
            at_least(buf, len)?;
            buf.advance(len);
        }
        WireType::Fixed32 => {
            at_least(buf, 4)?;
            buf.advance(4);
        }
    }
    Ok(())
}
