//! Map fields.
//!
//! Each entry is written as its own length-delimited submessage holding the key under field `1`
//! and the value under field `2`. Inside an entry both follow the ordinary scalar rules, so a
//! default key or value is omitted and decodes back to its default.
//!
//! Entries are written in the iteration order of the host map. A later entry with an equal key
//! replaces an earlier one. An empty map writes nothing, so a map cannot be a oneof alternative.

use crate::{
    message,
    wire::{self, WireType},
    Error, Field,
};
use bytes::BufMut;
use std::{
    collections::{BTreeMap, HashMap},
    hash::{BuildHasher, Hash},
};

const KEY: u32 = 1;
const VALUE: u32 = 2;

fn entry_len<K: Field, V: Field>(key: &K, value: &V) -> usize {
    key.field_size(KEY, false) + value.field_size(VALUE, false)
}

fn entries_size<'a, K: Field + 'a, V: Field + 'a>(
    entries: impl Iterator<Item = (&'a K, &'a V)>,
    number: u32,
) -> usize {
    let key_size = wire::key_size(number);
    entries
        .map(|(key, value)| key_size + wire::length_delimited_size(entry_len(key, value)))
        .sum()
}

fn write_entries<'a, K: Field + 'a, V: Field + 'a>(
    entries: impl Iterator<Item = (&'a K, &'a V)>,
    number: u32,
    buf: &mut impl BufMut,
) {
    for (key, value) in entries {
        wire::write_key(number, WireType::LengthDelimited, buf);
        crate::varint::write(entry_len(key, value) as u64, buf);
        key.write_field(KEY, false, buf);
        value.write_field(VALUE, false, buf);
    }
}

/// Reads one entry, returning its key and value.
fn merge_entry<K: Field, V: Field>(
    wire_type: WireType,
    buf: &mut &[u8],
    depth: usize,
) -> Result<(K, V), Error> {
    wire::expect(WireType::LengthDelimited, wire_type)?;
    let mut entry = wire::read_length_delimited(buf)?;

    let mut key = K::default();
    let mut value = V::default();
    while !entry.is_empty() {
        let (number, wire_type) = wire::read_key(&mut entry)?;
        match number {
            KEY => message::merge_member(&mut key, wire_type, &mut entry, depth)?,
            VALUE => message::merge_member(&mut value, wire_type, &mut entry, depth)?,
            other => return Err(Error::InvalidMapEntry(other)),
        }
    }
    Ok((key, value))
}

impl<K: Field + Ord, V: Field> Field for BTreeMap<K, V> {
    const ALWAYS_EMITTED: bool = false;

    #[inline]
    fn field_size(&self, number: u32, _: bool) -> usize {
        entries_size(self.iter(), number)
    }

    #[inline]
    fn write_field(&self, number: u32, _: bool, buf: &mut impl BufMut) {
        write_entries(self.iter(), number, buf);
    }

    fn merge_field(
        &mut self,
        wire_type: WireType,
        buf: &mut &[u8],
        depth: usize,
    ) -> Result<(), Error> {
        let (key, value) = merge_entry(wire_type, buf, depth)?;
        self.insert(key, value);
        Ok(())
    }
}

impl<K: Field + Eq + Hash, V: Field, S: BuildHasher + Default> Field for HashMap<K, V, S> {
    const ALWAYS_EMITTED: bool = false;

    #[inline]
    fn field_size(&self, number: u32, _: bool) -> usize {
        entries_size(self.iter(), number)
    }

    #[inline]
    fn write_field(&self, number: u32, _: bool, buf: &mut impl BufMut) {
        write_entries(self.iter(), number, buf);
    }

    fn merge_field(
        &mut self,
        wire_type: WireType,
        buf: &mut &[u8],
        depth: usize,
    ) -> Result<(), Error> {
        let (key, value) = merge_entry(wire_type, buf, depth)?;
        self.insert(key, value);
        Ok(())
    }
}
