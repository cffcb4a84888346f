//! Low-level primitives for arena memory operations.
//!
//! [`RawBuffer`] owns the arena's backing bytes. Its contents are never
//! read or written here and no reference to them is ever formed: the arena
//! only computes addresses inside it and hands them out as raw pointers.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::NonNull;

/// One heap allocation, made at construction and freed on drop.
pub(crate) struct RawBuffer {
    ptr: NonNull<u8>,
    layout: Layout,
}

// SAFETY: `RawBuffer` is a uniquely owned heap allocation whose bytes it
// never touches; the pointers it hands out carry their own contracts.
unsafe impl Send for RawBuffer {}
// SAFETY: all `&self` methods only read `ptr` and `layout`.
unsafe impl Sync for RawBuffer {}

impl RawBuffer {
    /// Allocate an uninitialised buffer described by `layout`.
    ///
    /// A zero-sized layout allocates nothing and uses a dangling pointer
    /// aligned to `layout.align()`. Aborts via `handle_alloc_error` if the
    /// global allocator fails.
    pub(crate) fn new(layout: Layout) -> Self {
        let ptr = if layout.size() == 0 {
            // SAFETY: a `Layout`'s alignment is never zero.
            unsafe { NonNull::new_unchecked(std::ptr::without_provenance_mut(layout.align())) }
        } else {
            // SAFETY: `layout` has a non-zero size.
            let raw = unsafe { alloc::alloc(layout) };
            NonNull::new(raw).unwrap_or_else(|| alloc::handle_alloc_error(layout))
        };
        Self { ptr, layout }
    }

    /// Address of the first byte.
    pub(crate) fn addr(&self) -> usize {
        self.ptr.as_ptr() as usize
    }

    /// Length in bytes.
    pub(crate) fn len(&self) -> usize {
        self.layout.size()
    }

    /// Pointer to the byte at `offset`.
    ///
    /// `offset` may equal `len()` (the one-past-the-end address, handed out
    /// for zero-sized requests at the very end of the buffer).
    pub(crate) fn ptr_at(&self, offset: usize) -> NonNull<u8> {
        assert!(offset <= self.len(), "offset {offset} outside arena buffer");
        // SAFETY: `offset <= len`, so the result stays within (or one past)
        // the allocation and cannot wrap to null.
        unsafe { self.ptr.add(offset) }
    }
}

impl Drop for RawBuffer {
    fn drop(&mut self) {
        if self.layout.size() != 0 {
            // SAFETY: `ptr` was allocated in `new` with this exact layout.
            unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) }
        }
    }
}

/// Round `addr` up to the next multiple of `align` (a power of two).
///
/// Returns `None` if the result does not fit in `usize`.
pub(crate) fn align_up(addr: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    let mask = align - 1;
    addr.checked_add(mask).map(|a| a & !mask)
}

/// Whether `addr` is a multiple of `align` (a power of two).
pub(crate) fn is_aligned(addr: usize, align: usize) -> bool {
    debug_assert!(align.is_power_of_two());
    addr & (align - 1) == 0
}
