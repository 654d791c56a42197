//! Field kinds for common types.
//!
//! - [primitives]: integers, booleans, and floats.
//! - [bytes]: strings and byte runs.
//! - [wrappers]: ZigZag and fixed-width integer encodings.
//! - [enumeration]: closed `i32`-backed enums.
//! - [vec], [option], [map]: repeated, presence-tracked, and mapping fields.

pub mod bytes;
pub mod enumeration;
pub mod map;
pub mod option;
pub mod primitives;
pub mod vec;
pub mod wrappers;
