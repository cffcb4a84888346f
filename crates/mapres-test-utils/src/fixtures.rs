//! Value fixtures for container tests.

/// A person with a heap-allocated name.
///
/// The `String` makes the value non-trivially droppable, so container
/// tests exercise real destructors.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Person {
    pub name: String,
    pub age: u32,
}

impl Person {
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }
}
