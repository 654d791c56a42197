//! Optional and boxed fields.
//!
//! `Some` is written even when the inner value is its default, which is how presence survives
//! a round trip. `None` writes nothing. Any occurrence on the wire makes the field `Some`.
//!
//! A `Box<T>` is encoded exactly like `T`. Together with `Option` it allows recursive messages.
//!
//! An `Option` cannot be a oneof alternative: `None` would leave nothing on the wire.

use crate::{wire::WireType, Error, Field};
use bytes::BufMut;

impl<T: Field> Field for Option<T> {
    const ALWAYS_EMITTED: bool = false;

    #[inline]
    fn field_size(&self, number: u32, _: bool) -> usize {
        match self {
            Some(value) => value.field_size(number, true),
            None => 0,
        }
    }

    #[inline]
    fn write_field(&self, number: u32, _: bool, buf: &mut impl BufMut) {
        if let Some(value) = self {
            value.write_field(number, true, buf);
        }
    }

    #[inline]
    fn merge_field(
        &mut self,
        wire_type: WireType,
        buf: &mut &[u8],
        depth: usize,
    ) -> Result<(), Error> {
        let mut value = T::default();
        value.merge_field(wire_type, buf, depth)?;
        *self = Some(value);
        Ok(())
    }
}

impl<T: Field> Field for Box<T> {
    const ALWAYS_EMITTED: bool = T::ALWAYS_EMITTED;

    #[inline]
    fn field_size(&self, number: u32, always: bool) -> usize {
        (**self).field_size(number, always)
    }

    #[inline]
    fn write_field(&self, number: u32, always: bool, buf: &mut impl BufMut) {
        (**self).write_field(number, always, buf)
    }

    #[inline]
    fn merge_field(
        &mut self,
        wire_type: WireType,
        buf: &mut &[u8],
        depth: usize,
    ) -> Result<(), Error> {
        (**self).merge_field(wire_type, buf, depth)
    }
}
