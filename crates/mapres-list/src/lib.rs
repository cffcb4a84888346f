//! A singly-linked list that takes all of its storage from a
//! [`MemoryResource`].
//!
//! [`SList`] never touches the global allocator: every node is allocated
//! through the resource it was built with and released back to it when the
//! element is popped, cleared or dropped. Building a list over a
//! `MapResource` from `mapres-arena` keeps all nodes inside one fixed
//! buffer.
//!
//! ```text
//! SList { resource, head }
//!          │
//!          ▼
//!        Node ──► Node ──► Node ──► ∅
//!     (newest)              (oldest)
//! ```
//!
//! Insertion and removal happen at the front only, so iteration yields the
//! most recently pushed element first.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod iter;
pub mod list;
mod node;

pub use iter::{IntoIter, Iter, IterMut};
pub use list::SList;
pub use mapres_core::{AllocError, MemoryResource};
