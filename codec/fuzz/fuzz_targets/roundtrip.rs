#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use protowire::{Message, SInt64};
use std::collections::BTreeMap;

protowire::enumeration! {
    #[derive(Debug, Arbitrary)]
    pub enum Level {
        Low = 0,
        Mid = 1,
        High = 2,
    }
}

#[derive(Debug, Default, Clone, PartialEq, Arbitrary)]
pub struct Child {
    id: u32,
    tag: String,
    weights: Vec<f32>,
}

protowire::message!(Child {
    id: 1,
    tag: 2,
    weights: 3,
});

protowire::oneof! {
    #[derive(Debug, Clone, PartialEq, Arbitrary)]
    pub enum Pick {
        Number(i32),
        Text(String),
        Node(Child),
        Tier(Level),
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Record {
    id: u64,
    delta: SInt64,
    ratio: f64,
    level: Level,
    name: String,
    raw: Bytes,
    counts: Vec<u32>,
    children: Vec<Child>,
    labels: BTreeMap<String, i32>,
    pick: Pick,
    maybe: Option<u32>,
}

protowire::message!(Record {
    id: 1,
    delta: 2,
    ratio: 3,
    level: 4,
    name: 5,
    raw: 6,
    counts: 7,
    children: 8,
    labels: 9,
    pick: [10, 11, 12, 13],
    maybe: 14,
});

#[derive(Debug, Arbitrary)]
struct RecordInput {
    id: u64,
    delta: i64,
    ratio: f64,
    level: Level,
    name: String,
    raw: Vec<u8>,
    counts: Vec<u32>,
    children: Vec<Child>,
    labels: BTreeMap<String, i32>,
    pick: Pick,
    maybe: Option<u32>,
}

impl From<RecordInput> for Record {
    fn from(input: RecordInput) -> Self {
        Self {
            id: input.id,
            delta: SInt64(input.delta),
            ratio: input.ratio,
            level: input.level,
            name: input.name,
            raw: Bytes::from(input.raw),
            counts: input.counts,
            children: input.children,
            labels: input.labels,
            pick: input.pick,
            maybe: input.maybe,
        }
    }
}

#[derive(Debug, Arbitrary)]
enum FuzzInput<'a> {
    Bytes(&'a [u8]),
    Record(RecordInput),
}

// Floats may be NaN, so equality is checked on the re-encoded bytes.
fn roundtrip_record(record: Record) {
    let encoded = record.encode();
    assert_eq!(encoded.len(), protowire::size_of(&record));
    let decoded =
        Record::decode(&encoded).expect("Failed to decode a successfully encoded input!");
    assert_eq!(decoded.encode(), encoded);
}

fn decode_bytes(buf: &[u8]) {
    let Ok(record) = Record::decode(buf) else {
        return;
    };
    roundtrip_record(record);
}

fn fuzz(input: FuzzInput) {
    match input {
        FuzzInput::Bytes(it) => decode_bytes(it),
        FuzzInput::Record(it) => roundtrip_record(it.into()),
    }
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
