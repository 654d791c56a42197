//! Scalar implementations for strings and byte runs.
//!
//! Both travel as a varint length followed by exactly that many bytes. Decoding a [String]
//! additionally checks that the bytes are valid UTF-8.
//!
//! As elements of a repeated field, strings and byte runs are written once per element rather
//! than packed.

use crate::{
    wire::{self, WireType},
    Error, Scalar,
};
use bytes::{BufMut, Bytes};

impl Scalar for String {
    const WIRE_TYPE: WireType = WireType::LengthDelimited;

    #[inline]
    fn encoded_len(&self) -> usize {
        wire::length_delimited_size(self.len())
    }

    #[inline]
    fn write_value(&self, buf: &mut impl BufMut) {
        wire::write_length_delimited(self.as_bytes(), buf);
    }

    #[inline]
    fn read_value(buf: &mut &[u8]) -> Result<Self, Error> {
        let value = wire::read_length_delimited(buf)?;
        std::str::from_utf8(value)
            .map(str::to_owned)
            .map_err(|_| Error::InvalidUtf8)
    }

    #[inline]
    fn is_default(&self) -> bool {
        self.is_empty()
    }
}

crate::__scalar_field!(String);
crate::__unpacked_repeated!(String);

impl Scalar for Bytes {
    const WIRE_TYPE: WireType = WireType::LengthDelimited;

    #[inline]
    fn encoded_len(&self) -> usize {
        wire::length_delimited_size(self.len())
    }

    #[inline]
    fn write_value(&self, buf: &mut impl BufMut) {
        wire::write_length_delimited(self, buf);
    }

    #[inline]
    fn read_value(buf: &mut &[u8]) -> Result<Self, Error> {
        wire::read_length_delimited(buf).map(Bytes::copy_from_slice)
    }

    #[inline]
    fn is_default(&self) -> bool {
        self.is_empty()
    }
}

crate::__scalar_field!(Bytes);
crate::__unpacked_repeated!(Bytes);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Field;

    #[test]
    fn test_string() {
        let values = ["", "test", "héllo"];
        for value in values {
            let value = value.to_string();
            let mut buf = Vec::new();
            value.write_value(&mut buf);
            assert_eq!(buf.len(), value.encoded_len());
            assert_eq!(buf[0] as usize, value.len());
            let decoded = String::read_value(&mut &buf[..]).unwrap();
            assert_eq!(value, decoded);
        }
    }

    #[test]
    fn test_string_field() {
        let mut buf = Vec::new();
        "test".to_string().write_field(7, false, &mut buf);
        assert_eq!(buf, [0x3A, 0x04, b't', b'e', b's', b't']);

        let mut buf = Vec::new();
        String::new().write_field(7, false, &mut buf);
        assert!(buf.is_empty());
        String::new().write_field(7, true, &mut buf);
        assert_eq!(buf, [0x3A, 0x00]);
    }

    #[test]
    fn test_bytes() {
        let values = [
            Bytes::new(),
            Bytes::from_static(&[1, 2, 3]),
            Bytes::from(vec![0; 300]),
        ];
        for value in values {
            let mut buf = Vec::new();
            value.write_value(&mut buf);
            assert_eq!(buf.len(), value.encoded_len());
            assert_eq!(buf.len(), wire::length_delimited_size(value.len()));
            let decoded = Bytes::read_value(&mut &buf[..]).unwrap();
            assert_eq!(value, decoded);
        }
    }

    #[test]
    fn test_length_exceeds_buffer() {
        let mut reader = &[0x05u8, b'a', b'b'][..];
        assert_eq!(String::read_value(&mut reader), Err(Error::EndOfBuffer));
        let mut reader = &[0x05u8, b'a', b'b'][..];
        assert_eq!(Bytes::read_value(&mut reader), Err(Error::EndOfBuffer));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut reader = &[0x02u8, 0xC3, 0x28][..];
        assert_eq!(String::read_value(&mut reader), Err(Error::InvalidUtf8));
    }
}
