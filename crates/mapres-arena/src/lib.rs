//! Fixed-capacity arena allocation with size-class block recycling.
//!
//! Provides [`MapResource`], a [`MemoryResource`] that carves every block
//! out of one buffer allocated at construction and freed at drop. Released
//! blocks are never returned to the buffer; they are filed by size and
//! reissued to later requests of the same or smaller size.
//!
//! # Architecture
//!
//! ```text
//! MapResource (facade, one Mutex)
//! └── ArenaState
//!     ├── Arena              (RawBuffer + monotonic bump offset)
//!     └── FreeBlockRegistry  (size -> LIFO stack of block offsets)
//! ```
//!
//! `allocate` consults the registry first (smallest size class at least as
//! large as the request, newest suitably aligned block) and falls back to
//! bump allocation. `deallocate` always files the block in the registry.
//! Only the bump path can fail, and a failed call changes nothing.
//!
//! # Recycling and alignment
//!
//! Size classes are keyed by byte size alone, but a recycled block is only
//! reissued when its address satisfies the new request's alignment.
//! Blocks that do not are left in place for later requests, and the
//! request is served from the bump path instead.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod arena;
pub mod config;
pub mod error;
mod raw;
pub mod registry;
pub mod resource;
pub mod stats;

// Public re-exports for the primary API surface.
pub use arena::Arena;
pub use config::ArenaConfig;
pub use error::ConfigError;
pub use mapres_core::{AllocError, MemoryResource};
pub use registry::FreeBlockRegistry;
pub use resource::MapResource;
pub use stats::ArenaStats;
