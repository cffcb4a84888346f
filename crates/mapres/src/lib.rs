//! mapres: a fixed-capacity arena memory resource with size-class block
//! recycling, and a singly-linked list that draws all of its storage from it.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all mapres sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use mapres::prelude::*;
//!
//! // One 4 KiB buffer, allocated now and freed when `mem` is dropped.
//! let mem = MapResource::new(4096);
//!
//! let mut list = SList::new_in(&mem);
//! list.push_front(10).unwrap();
//! list.push_front(20).unwrap();
//! list.push_front(30).unwrap();
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![30, 20, 10]);
//!
//! // Popped nodes are recycled, not returned to the buffer.
//! let used = mem.used();
//! list.pop_front();
//! list.push_front(40).unwrap();
//! assert_eq!(mem.used(), used);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`resource`] | `mapres-core` | `MemoryResource`, `AllocError`, default resource, `ResourceBox` |
//! | [`arena`] | `mapres-arena` | `MapResource`, bump `Arena`, `FreeBlockRegistry`, config, stats |
//! | [`list`] | `mapres-list` | `SList` and its iterators |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// The allocation contract (`mapres-core`).
///
/// Implement [`resource::MemoryResource`] to plug a new allocator into
/// [`list::SList`].
pub use mapres_core as resource;

/// The arena resource (`mapres-arena`).
///
/// [`arena::MapResource`] is the main entry point; [`arena::ArenaConfig`]
/// controls the backing buffer.
pub use mapres_arena as arena;

/// The resource-backed list (`mapres-list`).
pub use mapres_list as list;

/// Common imports for typical mapres usage.
///
/// ```rust
/// use mapres::prelude::*;
/// ```
pub mod prelude {
    // Allocation contract
    pub use mapres_core::{
        default_resource, set_default_resource, AllocError, MemoryResource, ResourceBox,
        SystemResource,
    };

    // Arena
    pub use mapres_arena::{ArenaConfig, ArenaStats, ConfigError, MapResource};

    // List
    pub use mapres_list::SList;
}
