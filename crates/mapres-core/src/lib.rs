//! Core allocation contract for the mapres workspace.
//!
//! Everything that hands out memory in mapres does so through the
//! [`MemoryResource`] trait: a `(size, alignment)` request in, a pointer
//! out, and the same `(size, alignment)` replayed on release. This crate
//! defines that contract, its single error kind, the process-wide default
//! resource, and [`ResourceBox`], the owning handle that pairs construction
//! with release.
//!
//! `unsafe` is denied crate-wide. The modules that implement or call
//! `deallocate` opt back in with `#![allow(unsafe_code)]`, as do their
//! counterparts in `mapres-arena` and `mapres-list`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod boxed;
pub mod error;
pub mod resource;
pub mod system;

pub use boxed::ResourceBox;
pub use error::AllocError;
pub use resource::{same_resource, MemoryResource};
pub use system::{default_resource, set_default_resource, system_resource, SystemResource};
