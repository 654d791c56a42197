//! Structure codec.
//!
//! A [Message] exposes its field descriptor by walking its members with a [Visitor] (for size
//! and encode) or a [VisitorMut] (for decode). Each member is reported together with its field
//! number, or with the ordered list of field numbers bound to a [Oneof]'s alternatives.
//!
//! Implementations are normally generated with [crate::message!], which validates every field
//! number at compile time.
//!
//! # Encoding
//!
//! Members are written in declaration order, not in field-number order. Each member follows the
//! rules of its [Field] implementation; a union writes only its selected alternative.
//!
//! # Decoding
//!
//! The target is reset to its default, then keys are read until the buffer is exhausted:
//! - A key bound to a member is merged into that member. If the value cannot be read, the
//!   cursor returns to the start of the value, the failure is recorded, and decoding continues.
//! - A key bound to a union alternative selects that alternative. If the value cannot be read,
//!   the union is reset to empty and decoding continues without recording a failure.
//! - A key bound to nothing is skipped. If it cannot be skipped, decoding stops.
//!
//! The first recorded failure is returned once the loop ends.

use crate::{
    oneof::{self, Oneof},
    wire::{self, WireType},
    Config, Error, Field,
};
use bytes::{BufMut, BytesMut};
use tracing::{debug, trace};

/// Receives each binding of a [Message] by reference.
pub trait Visitor {
    /// Visits a member bound to one field number.
    fn field<F: Field>(&mut self, name: &'static str, member: &F, number: u32);

    /// Visits a union bound to one field number per alternative.
    fn oneof<O: Oneof>(&mut self, name: &'static str, member: &O, numbers: &[u32]);
}

/// Receives each binding of a [Message] by mutable reference.
pub trait VisitorMut {
    /// Visits a member bound to one field number.
    fn field<F: Field>(&mut self, name: &'static str, member: &mut F, number: u32);

    /// Visits a union bound to one field number per alternative.
    fn oneof<O: Oneof>(&mut self, name: &'static str, member: &mut O, numbers: &[u32]);
}

/// A structure with a static field descriptor.
pub trait Message: Default {
    /// Reports every binding, in declaration order, to `visitor`.
    fn visit<V: Visitor>(&self, visitor: &mut V);

    /// Reports every binding, in declaration order, to `visitor` for mutation.
    fn visit_mut<V: VisitorMut>(&mut self, visitor: &mut V);

    /// Returns the number of bytes [Message::encode_to] writes.
    #[inline]
    fn encoded_len(&self) -> usize {
        encoded_len(self)
    }

    /// Writes the encoded message to `buf`.
    #[inline]
    fn encode_to(&self, buf: &mut impl BufMut) {
        write(self, buf)
    }

    /// Encodes the message into a new buffer.
    ///
    /// # Panics
    ///
    /// Panics if the number of bytes written differs from [Message::encoded_len].
    fn encode(&self) -> BytesMut {
        let len = self.encoded_len();
        let mut buffer = BytesMut::with_capacity(len);
        self.encode_to(&mut buffer);
        assert_eq!(buffer.len(), len, "write() did not write expected bytes");
        buffer
    }

    /// Resets the message and decodes `buf` into it.
    #[inline]
    fn merge_from(&mut self, buf: &[u8], cfg: &Config) -> Result<(), Error> {
        merge(self, buf, cfg.max_depth)
    }

    /// Decodes a message with the given configuration.
    fn decode_cfg(buf: &[u8], cfg: &Config) -> Result<Self, Error> {
        let mut message = Self::default();
        message.merge_from(buf, cfg)?;
        Ok(message)
    }

    /// Decodes a message with the default configuration.
    #[inline]
    fn decode(buf: &[u8]) -> Result<Self, Error> {
        Self::decode_cfg(buf, &Config::default())
    }
}

struct Sizer {
    total: usize,
}

impl Visitor for Sizer {
    fn field<F: Field>(&mut self, _: &'static str, member: &F, number: u32) {
        self.total += member.field_size(number, false);
    }

    fn oneof<O: Oneof>(&mut self, _: &'static str, member: &O, numbers: &[u32]) {
        self.total += oneof::size(member, numbers);
    }
}

struct Writer<'a, B: BufMut> {
    buf: &'a mut B,
}

impl<B: BufMut> Visitor for Writer<'_, B> {
    fn field<F: Field>(&mut self, _: &'static str, member: &F, number: u32) {
        member.write_field(number, false, self.buf);
    }

    fn oneof<O: Oneof>(&mut self, _: &'static str, member: &O, numbers: &[u32]) {
        oneof::write(member, numbers, self.buf);
    }
}

/// Routes one key to the binding that claims its field number.
struct Merger<'a, 'b> {
    number: u32,
    wire_type: WireType,
    buf: &'a mut &'b [u8],
    depth: usize,
    handled: bool,
    result: Result<(), Error>,
}

impl VisitorMut for Merger<'_, '_> {
    fn field<F: Field>(&mut self, name: &'static str, member: &mut F, number: u32) {
        if self.handled || number != self.number {
            return;
        }
        self.handled = true;

        let start = *self.buf;
        if let Err(err) = merge_member(member, self.wire_type, self.buf, self.depth) {
            debug!(
                field = name,
                number,
                wire_type = ?self.wire_type,
                ?err,
                "failed to decode field"
            );
            *self.buf = start;
            self.result = Err(err);
        }
    }

    fn oneof<O: Oneof>(&mut self, name: &'static str, member: &mut O, numbers: &[u32]) {
        if self.handled {
            return;
        }
        let Some(position) = numbers.iter().position(|number| *number == self.number) else {
            return;
        };
        self.handled = true;

        let start = *self.buf;
        if let Err(err) =
            member.merge_alternative(position + 1, self.wire_type, self.buf, self.depth)
        {
            debug!(
                field = name,
                number = self.number,
                wire_type = ?self.wire_type,
                ?err,
                "failed to decode oneof alternative"
            );
            *self.buf = start;
            *member = O::default();
        }
    }
}

/// Returns the encoded length of a message body.
pub fn encoded_len<M: Message>(message: &M) -> usize {
    let mut sizer = Sizer { total: 0 };
    message.visit(&mut sizer);
    sizer.total
}

/// Writes a message body, in declaration order.
pub fn write<M: Message, B: BufMut>(message: &M, buf: &mut B) {
    message.visit(&mut Writer { buf });
}

/// Resets `message` and decodes `buf` into it.
///
/// `depth` is the number of nested message levels allowed below this one.
pub fn merge<M: Message>(message: &mut M, mut buf: &[u8], depth: usize) -> Result<(), Error> {
    *message = M::default();

    let mut result = Ok(());
    while !buf.is_empty() {
        let (number, wire_type) = match wire::read_key(&mut buf) {
            Ok(key) => key,
            Err(err) => {
                debug!(?err, "failed to read key");
                return result.and(Err(err));
            }
        };

        let mut merger = Merger {
            number,
            wire_type,
            buf: &mut buf,
            depth,
            handled: false,
            result: Ok(()),
        };
        message.visit_mut(&mut merger);
        let Merger {
            handled,
            result: field_result,
            ..
        } = merger;
        result = result.and(field_result);
        if handled {
            continue;
        }

        trace!(number, ?wire_type, "skipping unknown field");
        if let Err(err) = wire::skip_field(wire_type, &mut buf) {
            debug!(number, ?err, "failed to skip unknown field");
            return result.and(Err(Error::UnskippableField(number)));
        }
    }
    result
}

/// Merges one occurrence of a field into a member.
///
/// A key that ends the buffer leaves nothing to read; the member is reset to its default.
pub fn merge_member<F: Field>(
    member: &mut F,
    wire_type: WireType,
    buf: &mut &[u8],
    depth: usize,
) -> Result<(), Error> {
    if buf.is_empty() {
        *member = F::default();
        return Ok(());
    }
    member.merge_field(wire_type, buf, depth)
}

/// Returns the encoded length of a message used as a field.
///
/// A message with an empty body is elided unless `always` is set.
pub fn field_size<M: Message>(message: &M, number: u32, always: bool) -> usize {
    let len = encoded_len(message);
    if len == 0 && !always {
        return 0;
    }
    wire::key_size(number) + wire::length_delimited_size(len)
}

/// Writes a message used as a field: key, length, then body.
pub fn write_field<M: Message>(message: &M, number: u32, always: bool, buf: &mut impl BufMut) {
    let len = encoded_len(message);
    if len == 0 && !always {
        return;
    }
    wire::write_key(number, WireType::LengthDelimited, buf);
    crate::varint::write(len as u64, buf);
    let remaining = buf.remaining_mut();
    write(message, buf);
    debug_assert_eq!(
        remaining - buf.remaining_mut(),
        len,
        "write() did not write expected bytes"
    );
}

/// Reads a message used as a field, replacing any earlier value.
pub fn merge_field<M: Message>(
    message: &mut M,
    wire_type: WireType,
    buf: &mut &[u8],
    depth: usize,
) -> Result<(), Error> {
    wire::expect(WireType::LengthDelimited, wire_type)?;
    let body = wire::read_length_delimited(buf)?;
    let depth = depth.checked_sub(1).ok_or(Error::RecursionLimit)?;
    merge(message, body, depth)
}

/// Binds the members of a struct to field numbers.
///
/// A bare number binds a member implementing [Field]. A bracketed list binds a [Oneof], one
/// field number per alternative in declaration order. Field numbers are checked at compile time.
///
/// The struct must implement [Default]. The macro implements [Message], [Field], and
/// [crate::Repeated] for it, so it can be nested, repeated, and used as a map value.
///
/// ```
/// use protowire::Message;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
///     label: String,
/// }
///
/// protowire::message!(Point { x: 1, y: 2, label: 3 });
///
/// let point = Point { x: 5, y: 0, label: "a".into() };
/// let encoded = point.encode();
/// assert_eq!(&encoded[..], &[0x08, 0x05, 0x1A, 0x01, b'a']);
/// assert_eq!(Point::decode(&encoded).unwrap(), point);
/// ```
///
/// Invalid bindings are rejected:
///
/// ```compile_fail
/// #[derive(Default)]
/// struct Zero {
///     x: i32,
/// }
///
/// protowire::message!(Zero { x: 0 });
/// ```
#[macro_export]
macro_rules! message {
    (@visit $self:ident, $visitor:ident, $field:ident, [$($n:literal),+ $(,)?]) => {{
        let numbers = const { $crate::descriptor::field_numbers([$($n),+]) };
        $visitor.oneof(
            stringify!($field),
            &$self.$field,
            $crate::oneof::bind(&$self.$field, &numbers),
        );
    }};
    (@visit $self:ident, $visitor:ident, $field:ident, $n:literal) => {{
        let number = const { $crate::descriptor::field_number($n) };
        $visitor.field(stringify!($field), &$self.$field, number);
    }};
    (@visit_mut $self:ident, $visitor:ident, $field:ident, [$($n:literal),+ $(,)?]) => {{
        let numbers = const { $crate::descriptor::field_numbers([$($n),+]) };
        let numbers = $crate::oneof::bind(&$self.$field, &numbers);
        $visitor.oneof(stringify!($field), &mut $self.$field, numbers);
    }};
    (@visit_mut $self:ident, $visitor:ident, $field:ident, $n:literal) => {{
        let number = const { $crate::descriptor::field_number($n) };
        $visitor.field(stringify!($field), &mut $self.$field, number);
    }};
    ($type:ty { $($field:ident : $numbers:tt),* $(,)? }) => {
        impl $crate::Message for $type {
            #[allow(unused_variables)]
            fn visit<V: $crate::Visitor>(&self, visitor: &mut V) {
                $($crate::message!(@visit self, visitor, $field, $numbers);)*
            }

            #[allow(unused_variables)]
            fn visit_mut<V: $crate::VisitorMut>(&mut self, visitor: &mut V) {
                $($crate::message!(@visit_mut self, visitor, $field, $numbers);)*
            }
        }

        impl $crate::Field for $type {
            #[inline]
            fn field_size(&self, number: u32, always: bool) -> usize {
                $crate::message::field_size(self, number, always)
            }

            #[inline]
            fn write_field(
                &self,
                number: u32,
                always: bool,
                buf: &mut impl $crate::bytes::BufMut,
            ) {
                $crate::message::write_field(self, number, always, buf)
            }

            #[inline]
            fn merge_field(
                &mut self,
                wire_type: $crate::WireType,
                buf: &mut &[u8],
                depth: usize,
            ) -> ::core::result::Result<(), $crate::Error> {
                $crate::message::merge_field(self, wire_type, buf, depth)
            }
        }

        $crate::__unpacked_repeated!($type);
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Inner {
        value: i32,
    }

    crate::message!(Inner { value: 1 });

    crate::oneof! {
        #[derive(Debug, Clone, PartialEq)]
        enum Kind {
            Count(u32),
            Name(String),
            Child(Inner),
            Counts(Vec<u32>),
        }
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Outer {
        id: u64,
        inner: Inner,
        tags: Vec<u32>,
        kind: Kind,
    }

    crate::message!(Outer {
        id: 1,
        inner: 2,
        tags: 3,
        kind: [4, 5, 6, 7],
    });

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Node {
        child: Option<Box<Node>>,
    }

    crate::message!(Node { child: 1 });

    #[derive(Debug, Default, PartialEq)]
    struct Empty {}

    crate::message!(Empty {});

    fn nested(levels: usize) -> Node {
        let mut node = Node::default();
        for _ in 0..levels {
            node = Node {
                child: Some(Box::new(node)),
            };
        }
        node
    }

    #[test]
    fn test_declaration_order() {
        let outer = Outer {
            id: 1,
            inner: Inner { value: 99 },
            tags: vec![],
            kind: Kind::None,
        };
        assert_eq!(&outer.encode()[..], &[0x08, 0x01, 0x12, 0x02, 0x08, 0x63]);
    }

    #[test]
    fn test_empty_nested_is_elided() {
        let outer = Outer::default();
        assert_eq!(outer.encoded_len(), 0);
        assert!(outer.encode().is_empty());
        assert_eq!(Outer::decode(&[]).unwrap(), outer);
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(Empty {}.encoded_len(), 0);
        assert_eq!(Empty::decode(&[0x08, 0x01]).unwrap(), Empty {});
    }

    #[test]
    fn test_oneof_message_always_emitted() {
        let outer = Outer {
            kind: Kind::Child(Inner::default()),
            ..Default::default()
        };
        let encoded = outer.encode();
        assert_eq!(&encoded[..], &[0x32, 0x00]);
        assert_eq!(Outer::decode(&encoded).unwrap(), outer);
    }

    #[test]
    fn test_oneof_empty_sequence_emitted() {
        let outer = Outer {
            kind: Kind::Counts(vec![]),
            ..Default::default()
        };
        let encoded = outer.encode();
        assert_eq!(&encoded[..], &[0x3A, 0x00]);
        assert_eq!(Outer::decode(&encoded).unwrap(), outer);

        let outer = Outer {
            kind: Kind::Counts(vec![1, 2]),
            ..Default::default()
        };
        let encoded = outer.encode();
        assert_eq!(&encoded[..], &[0x3A, 0x02, 0x01, 0x02]);
        assert_eq!(Outer::decode(&encoded).unwrap(), outer);
    }

    #[test]
    fn test_oneof_last_wins() {
        let buf = [0x20, 0x07, 0x2A, 0x01, b'b'];
        let outer = Outer::decode(&buf).unwrap();
        assert_eq!(outer.kind, Kind::Name("b".into()));
    }

    #[test]
    fn test_oneof_failure_resets() {
        // The string alternative arrives as a varint. Its value bytes are then read as the
        // next key (field 1).
        let buf = [0x20, 0x07, 0x28, 0x08, 0x01];
        let outer = Outer::decode(&buf).unwrap();
        assert_eq!(outer.kind, Kind::None);
        assert_eq!(outer.id, 1);
    }

    #[test]
    fn test_field_failure_continues() {
        // Field 1 arrives as a fixed32: the failure is recorded, the cursor returns to the
        // start of the value, and the value bytes are then read as keys (field 1 varint 0).
        let buf = [0x0D, 0x08, 0x00, 0x18, 0x05];
        let mut outer = Outer::default();
        let result = merge(&mut outer, &buf, 4);
        assert_eq!(
            result,
            Err(Error::WireTypeMismatch {
                expected: WireType::Varint,
                found: WireType::Fixed32,
            })
        );
        assert_eq!(outer.tags, [5]);
    }

    #[test]
    fn test_first_error_wins() {
        // A bad wire type for field 1, then an invalid key.
        let buf = [0x0D, 0x0F];
        assert!(matches!(
            Outer::decode(&buf),
            Err(Error::WireTypeMismatch { .. })
        ));
        assert_eq!(Outer::decode(&[0x0F]), Err(Error::InvalidWireType(7)));
    }

    #[test]
    fn test_unknown_fields_skipped() {
        let buf = [0x08, 0x01, 0x50, 0x96, 0x01, 0x5A, 0x01, 0xFF, 0x18, 0x02];
        let outer = Outer::decode(&buf).unwrap();
        assert_eq!(outer.id, 1);
        assert_eq!(outer.tags, [2]);
    }

    #[test]
    fn test_unskippable_field() {
        // Field 10, length 5, but only one byte follows.
        let buf = [0x08, 0x01, 0x52, 0x05, 0x00];
        assert_eq!(Outer::decode(&buf), Err(Error::UnskippableField(10)));
    }

    #[test]
    fn test_key_at_end() {
        let mut outer = Outer::default();
        assert!(merge(&mut outer, &[0x08], 4).is_ok());
        assert_eq!(outer.id, 0);
    }

    #[test]
    fn test_nested_replaces() {
        let buf = [0x12, 0x02, 0x08, 0x01, 0x12, 0x00];
        let outer = Outer::decode(&buf).unwrap();
        assert_eq!(outer.inner, Inner::default());
    }

    #[test]
    fn test_recursion_limit() {
        let node = nested(8);
        let encoded = node.encode();
        assert_eq!(
            Node::decode_cfg(&encoded, &Config { max_depth: 8 }).unwrap(),
            node
        );
        assert_eq!(
            Node::decode_cfg(&encoded, &Config { max_depth: 7 }),
            Err(Error::RecursionLimit)
        );
    }

    #[test]
    fn test_merge_from_resets() {
        let mut outer = Outer {
            id: 3,
            tags: vec![1, 2],
            ..Default::default()
        };
        outer.merge_from(&[0x18, 0x09], &Config::default()).unwrap();
        assert_eq!(outer.id, 0);
        assert_eq!(outer.tags, [9]);
    }
}
