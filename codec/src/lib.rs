//! Encode and decode the protobuf wire format from static field descriptors.
//!
//! # Overview
//!
//! Messages are plain Rust structs. A one-line binding ([message!]) ties each member to a field
//! number; the codec walks that binding to measure, write, and read the struct, with no schema
//! compiler and no per-type hand-written logic. Field numbers are validated at compile time.
//!
//! The encoding is byte-compatible with the reference format:
//! - Scalars holding their default value are omitted.
//! - Repeated scalars are packed; repeated strings, byte runs, and messages are not.
//! - Maps are sequences of two-field entries (key = `1`, value = `2`).
//! - A union ([oneof!]) writes only its selected alternative, even when it holds a default.
//! - Unknown fields are skipped on decode, and enum values a schema does not name are kept, so
//!   older and newer schemas can read each other.
//!
//! # Supported Types
//!
//! | Rust type                                   | Wire type         |
//! |---------------------------------------------|-------------------|
//! | `i32`, `i64`, `u32`, `u64`, `bool`          | varint            |
//! | [SInt32], [SInt64]                          | ZigZag varint     |
//! | `f32`, [Fixed32], [SFixed32]                | 4 bytes           |
//! | `f64`, [Fixed64], [SFixed64]                | 8 bytes           |
//! | `String`, [bytes::Bytes], messages          | length-delimited  |
//! | [enumeration!] types                        | varint            |
//! | `Option<T>`, `Box<T>`                       | as `T`            |
//! | `Vec<T>`                                    | repeated `T`      |
//! | `BTreeMap<K, V>`, `HashMap<K, V>`           | map entries       |
//!
//! # Example
//!
//! ```
//! use protowire::{Message, SInt32};
//! use std::collections::BTreeMap;
//!
//! protowire::enumeration! {
//!     #[derive(Debug)]
//!     pub enum Status {
//!         Unknown = 0,
//!         Active = 1,
//!     }
//! }
//!
//! protowire::oneof! {
//!     #[derive(Debug, Clone, PartialEq)]
//!     pub enum Contact {
//!         Email(String),
//!         Phone(u64),
//!     }
//! }
//!
//! #[derive(Debug, Default, Clone, PartialEq)]
//! pub struct Account {
//!     id: u64,
//!     status: Status,
//!     offset: SInt32,
//!     labels: BTreeMap<String, i32>,
//!     scores: Vec<u32>,
//!     contact: Contact,
//! }
//!
//! protowire::message!(Account {
//!     id: 1,
//!     status: 2,
//!     offset: 3,
//!     labels: 4,
//!     scores: 5,
//!     contact: [6, 7],
//! });
//!
//! let account = Account {
//!     id: 42,
//!     status: Status::Active,
//!     offset: SInt32(-3),
//!     labels: BTreeMap::from([("tier".to_string(), 2)]),
//!     scores: vec![7, 8, 9],
//!     contact: Contact::Phone(5551234),
//! };
//! let encoded = account.encode();
//! assert_eq!(encoded.len(), account.encoded_len());
//! assert_eq!(Account::decode(&encoded).unwrap(), account);
//! ```

pub mod config;
pub mod descriptor;
pub mod error;
pub mod field;
pub mod message;
pub mod oneof;
pub mod scalar;
pub mod types;
pub mod varint;
pub mod wire;

pub use config::Config;
pub use error::Error;
pub use field::{Field, Repeated};
pub use message::{Message, Visitor, VisitorMut};
pub use oneof::Oneof;
pub use scalar::Scalar;
pub use types::{
    enumeration::Enumeration,
    wrappers::{Fixed32, Fixed64, SFixed32, SFixed64, SInt32, SInt64},
};
pub use wire::WireType;

#[doc(hidden)]
pub use bytes;

/// Returns the number of bytes [encode] writes for `message`.
#[inline]
pub fn size_of<M: Message>(message: &M) -> usize {
    message.encoded_len()
}

/// Writes `message` to `buf`.
///
/// `buf` must have room for [size_of] bytes.
#[inline]
pub fn encode<M: Message>(message: &M, buf: &mut impl bytes::BufMut) {
    message.encode_to(buf)
}

/// Resets `message` and decodes `buf` into it with the default [Config].
#[inline]
pub fn decode<M: Message>(message: &mut M, buf: &[u8]) -> Result<(), Error> {
    message.merge_from(buf, &Config::default())
}

/// Resets `message` and decodes `buf` into it.
#[inline]
pub fn decode_cfg<M: Message>(message: &mut M, buf: &[u8], cfg: &Config) -> Result<(), Error> {
    message.merge_from(buf, cfg)
}
