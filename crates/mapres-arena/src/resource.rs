//! The allocator facade: arena and registry behind one lock.
//!
//! [`MapResource`] is the only entry point for callers. Every operation
//! takes the same mutex for its whole duration, so calls are totally
//! ordered; there is no read/write distinction and no per-class sharding.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::fmt;
use std::ptr::NonNull;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, trace};
use mapres_core::{same_resource, AllocError, MemoryResource};

use crate::arena::Arena;
use crate::config::ArenaConfig;
use crate::error::ConfigError;
use crate::registry::FreeBlockRegistry;
use crate::stats::ArenaStats;

/// A fixed-capacity [`MemoryResource`] with size-class recycling.
///
/// The backing buffer is allocated once in the constructor and freed once
/// when the resource is dropped; it never grows. Allocation tries the
/// [`FreeBlockRegistry`] first and falls back to bump allocation in the
/// [`Arena`]. Deallocation always files the block in the registry.
///
/// Two resources are [`is_equal`](MemoryResource::is_equal) only if they
/// are the same object.
pub struct MapResource {
    state: Mutex<ArenaState>,
}

struct ArenaState {
    arena: Arena,
    free: FreeBlockRegistry,
}

impl ArenaState {
    fn allocate(&mut self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        // Zero-sized blocks never occupy a size class.
        if layout.size() == 0 {
            return self.arena.carve(layout);
        }
        let arena = &self.arena;
        let reused = self.free.reclaim(layout.size(), |block| {
            arena.is_aligned_at(block, layout.align())
        });
        if let Some((block, class)) = reused {
            trace!(
                "reused {class}-byte block at offset {block} for {} bytes (align {})",
                layout.size(),
                layout.align()
            );
            return Ok(self.arena.ptr_at(block));
        }
        self.arena.carve(layout)
    }

    fn deallocate(&mut self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() == 0 {
            return;
        }
        let offset = self.arena.offset_of(ptr);
        debug_assert!(
            offset.is_some(),
            "released pointer {ptr:p} was not allocated from this arena"
        );
        if let Some(offset) = offset {
            self.free.release(layout.size(), offset);
        }
    }

    fn stats(&self) -> ArenaStats {
        ArenaStats {
            capacity: self.arena.capacity(),
            used: self.arena.used(),
            free_blocks: self.free.free_blocks(),
            free_bytes: self.free.free_bytes(),
            size_classes: self.free.size_classes(),
        }
    }
}

impl MapResource {
    /// Create a resource over a buffer of `capacity` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds `isize::MAX` once rounded up to
    /// [`ArenaConfig::DEFAULT_BUFFER_ALIGN`]. Use
    /// [`MapResource::with_config`] to handle that case as an error.
    pub fn new(capacity: usize) -> Self {
        Self::with_config(ArenaConfig::new(capacity))
            .unwrap_or_else(|err| panic!("cannot create arena: {err}"))
    }

    /// Create a resource from a validated configuration.
    pub fn with_config(config: ArenaConfig) -> Result<Self, ConfigError> {
        let arena = Arena::new(&config)?;
        debug!(
            "map resource created: {} bytes, base alignment {}",
            config.capacity, config.buffer_align
        );
        Ok(Self {
            state: Mutex::new(ArenaState {
                arena,
                free: FreeBlockRegistry::new(),
            }),
        })
    }

    /// No critical section can leave the state half-updated, so a poisoned
    /// lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, ArenaState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Size of the backing buffer in bytes.
    pub fn capacity(&self) -> usize {
        self.lock().arena.capacity()
    }

    /// Bytes consumed by the bump offset, padding included.
    pub fn used(&self) -> usize {
        self.lock().arena.used()
    }

    /// Bytes not yet reached by the bump offset.
    pub fn remaining(&self) -> usize {
        self.lock().arena.remaining()
    }

    /// Snapshot of the current usage counters.
    pub fn stats(&self) -> ArenaStats {
        self.lock().stats()
    }
}

// SAFETY: blocks are carved from the owned buffer at aligned absolute
// addresses, or reclaimed only when their address satisfies the requested
// alignment. A block is never live twice, and the buffer outlives `self`.
unsafe impl MemoryResource for MapResource {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let mut state = self.lock();
        let result = state.allocate(layout);
        if let Err(err) = &result {
            debug!("{err}; {}", state.stats());
        }
        result
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.lock().deallocate(ptr, layout);
    }

    fn is_equal(&self, other: &dyn MemoryResource) -> bool {
        let _state = self.lock();
        same_resource(self, other)
    }
}

impl Drop for MapResource {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        debug!("map resource dropped: {}", state.stats());
    }
}

impl fmt::Debug for MapResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapResource")
            .field("stats", &self.stats())
            .finish()
    }
}
