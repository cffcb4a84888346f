//! The bump core: one fixed buffer and a monotonic offset.
//!
//! An [`Arena`] serves requests by advancing its offset past the next
//! suitably aligned address. The offset never moves backwards; memory is
//! only reclaimed when the whole arena is dropped. Recycling of released
//! blocks is layered on top by [`MapResource`](crate::MapResource).

use std::alloc::Layout;
use std::ptr::NonNull;

use log::trace;
use mapres_core::AllocError;

use crate::config::ArenaConfig;
use crate::error::ConfigError;
use crate::raw::{self, RawBuffer};

/// A fixed-capacity bump allocator over one owned buffer.
///
/// Not synchronised: `carve` takes `&mut self`. Wrap it in a lock (as
/// [`MapResource`](crate::MapResource) does) for shared use.
pub struct Arena {
    /// Backing storage. Allocated to full capacity at creation.
    buffer: RawBuffer,
    /// Bump pointer: byte offset of the next free byte.
    offset: usize,
}

impl Arena {
    /// Allocate the backing buffer described by `config`.
    pub fn new(config: &ArenaConfig) -> Result<Self, ConfigError> {
        let layout = config.buffer_layout()?;
        Ok(Self {
            buffer: RawBuffer::new(layout),
            offset: 0,
        })
    }

    /// Bump-allocate a block satisfying `layout`.
    ///
    /// The block starts at the first address at or after the current
    /// offset that is a multiple of `layout.align()`. Alignment is computed
    /// on the absolute address, not on the offset. Fails with
    /// [`AllocError::OutOfMemory`] when the block would end past the
    /// buffer; the offset is left untouched in that case.
    pub fn carve(&mut self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let start = self
            .aligned_offset(layout.align())
            .filter(|&start| {
                start
                    .checked_add(layout.size())
                    .is_some_and(|end| end <= self.capacity())
            })
            .ok_or(AllocError::OutOfMemory {
                requested: layout.size(),
                align: layout.align(),
            })?;
        self.offset = start + layout.size();
        trace!(
            "carved {} bytes (align {}) at offset {start}, used {}/{}",
            layout.size(),
            layout.align(),
            self.offset,
            self.capacity()
        );
        Ok(self.buffer.ptr_at(start))
    }

    /// Offset at which a block aligned to `align` would start, if the
    /// aligned address is representable.
    fn aligned_offset(&self, align: usize) -> Option<usize> {
        let base = self.buffer.addr();
        raw::align_up(base + self.offset, align).map(|addr| addr - base)
    }

    /// Offset of `ptr` within the buffer, if it lies in the carved region.
    pub fn offset_of(&self, ptr: NonNull<u8>) -> Option<usize> {
        (ptr.as_ptr() as usize)
            .checked_sub(self.buffer.addr())
            .filter(|&offset| offset <= self.offset)
    }

    /// Pointer to the byte at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset` exceeds the capacity.
    pub fn ptr_at(&self, offset: usize) -> NonNull<u8> {
        self.buffer.ptr_at(offset)
    }

    /// Whether the block at `offset` is aligned to `align` in absolute terms.
    pub fn is_aligned_at(&self, offset: usize, align: usize) -> bool {
        raw::is_aligned(self.buffer.addr() + offset, align)
    }

    /// Whether `ptr` was carved from this arena.
    pub fn contains(&self, ptr: NonNull<u8>) -> bool {
        self.offset_of(ptr).is_some()
    }

    /// Bytes consumed by the bump offset, padding included.
    pub fn used(&self) -> usize {
        self.offset
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes not yet reached by the bump offset.
    pub fn remaining(&self) -> usize {
        self.capacity() - self.offset
    }
}
