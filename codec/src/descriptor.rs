//! Field descriptor checks and introspection.
//!
//! [field_number] and [field_numbers] are `const fn`s evaluated by [crate::message!] so that a
//! binding to field `0`, to a number that does not fit in a key, or a union listing the same
//! number twice fails to compile. [validate] catches what a single binding cannot see: two
//! bindings of one message sharing a field number.

use crate::{
    message::{Message, Visitor},
    wire::MAX_FIELD_NUMBER,
    Error, Field, Oneof,
};
use std::collections::BTreeSet;

/// Returns `number` if it is a valid field number, failing const evaluation otherwise.
pub const fn field_number(number: u32) -> u32 {
    assert!(
        number >= 1 && number <= MAX_FIELD_NUMBER,
        "field number must be between 1 and 2^29 - 1"
    );
    number
}

/// Returns `numbers` if they are valid, distinct field numbers, failing const evaluation
/// otherwise.
pub const fn field_numbers<const N: usize>(numbers: [u32; N]) -> [u32; N] {
    assert!(N > 0, "oneof binding must list at least one field number");
    let mut i = 0;
    while i < N {
        field_number(numbers[i]);
        let mut j = i + 1;
        while j < N {
            assert!(numbers[i] != numbers[j], "oneof field numbers must be distinct");
            j += 1;
        }
        i += 1;
    }
    numbers
}

/// One binding of a message's field descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldInfo {
    /// The member name.
    pub name: &'static str,
    /// The bound field number, or one number per alternative for a union.
    pub numbers: Vec<u32>,
    /// Whether the binding is a union.
    pub oneof: bool,
}

struct Describer {
    fields: Vec<FieldInfo>,
}

impl Visitor for Describer {
    fn field<F: Field>(&mut self, name: &'static str, _: &F, number: u32) {
        self.fields.push(FieldInfo {
            name,
            numbers: vec![number],
            oneof: false,
        });
    }

    fn oneof<O: Oneof>(&mut self, name: &'static str, _: &O, numbers: &[u32]) {
        self.fields.push(FieldInfo {
            name,
            numbers: numbers.to_vec(),
            oneof: true,
        });
    }
}

/// Returns the bindings of `M` in declaration order.
pub fn describe<M: Message>() -> Vec<FieldInfo> {
    let mut describer = Describer { fields: Vec::new() };
    M::default().visit(&mut describer);
    describer.fields
}

/// Checks that no field number of `M` is bound more than once.
pub fn validate<M: Message>() -> Result<(), Error> {
    let mut seen = BTreeSet::new();
    for number in describe::<M>().into_iter().flat_map(|field| field.numbers) {
        if !seen.insert(number) {
            return Err(Error::DuplicateFieldNumber(number));
        }
    }
    Ok(())
}
