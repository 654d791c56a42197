//! Repeated fields.
//!
//! A `Vec<T>` delegates to [Repeated]: scalar elements are packed into one run, every other
//! element type is written under its own key. An empty sequence writes nothing, except that a
//! packed sequence selected as a oneof alternative writes an empty run. Each occurrence of the
//! field on the wire appends to the existing elements.

use crate::{wire::WireType, Error, Field, Repeated};
use bytes::BufMut;

impl<T: Repeated> Field for Vec<T> {
    const ALWAYS_EMITTED: bool = T::PACKED;

    #[inline]
    fn field_size(&self, number: u32, always: bool) -> usize {
        if self.is_empty() && !always {
            return 0;
        }
        T::repeated_size(self, number)
    }

    #[inline]
    fn write_field(&self, number: u32, always: bool, buf: &mut impl BufMut) {
        if self.is_empty() && !always {
            return;
        }
        T::write_repeated(self, number, buf);
    }

    #[inline]
    fn merge_field(
        &mut self,
        wire_type: WireType,
        buf: &mut &[u8],
        depth: usize,
    ) -> Result<(), Error> {
        T::merge_repeated(self, wire_type, buf, depth)
    }
}
