//! The allocation contract shared by every memory resource.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::ptr::NonNull;

use crate::error::AllocError;

/// A source of raw, aligned memory blocks.
///
/// Callers request a block with a [`Layout`] and must hand back the exact
/// same `Layout` when releasing it. Implementations are shared across
/// threads, so every method takes `&self` and implementations synchronise
/// internally.
///
/// # Safety
///
/// [`ResourceBox`](crate::ResourceBox) and the containers built on it write
/// through returned pointers without further checks, so implementors must
/// guarantee:
///
/// - A pointer returned by [`allocate`](MemoryResource::allocate) addresses
///   at least `layout.size()` writable bytes and is aligned to
///   `layout.align()`.
/// - The block stays valid, and is not handed out again, until it is passed
///   to [`deallocate`](MemoryResource::deallocate) or the resource is
///   dropped.
/// - A failed `allocate` leaves the resource exactly as it was.
/// - [`is_equal`](MemoryResource::is_equal) returns `true` only for a
///   resource that can release this one's blocks.
///
/// A safe `impl` is rejected:
///
/// ```compile_fail,E0200
/// use std::alloc::Layout;
/// use std::ptr::NonNull;
/// use mapres_core::{AllocError, MemoryResource};
///
/// struct Dangling;
///
/// impl MemoryResource for Dangling {
///     fn allocate(&self, _: Layout) -> Result<NonNull<u8>, AllocError> {
///         Ok(NonNull::<u64>::dangling().cast())
///     }
///     unsafe fn deallocate(&self, _: NonNull<u8>, _: Layout) {}
///     fn is_equal(&self, other: &dyn MemoryResource) -> bool {
///         mapres_core::same_resource(self, other)
///     }
/// }
/// ```
pub unsafe trait MemoryResource: Send + Sync {
    /// Allocate a block satisfying `layout`.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Release a block previously returned by [`allocate`](MemoryResource::allocate).
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate` on a resource that
    /// [`is_equal`](MemoryResource::is_equal) to this one, called with this
    /// same `layout`, and must not have been released already. The size is
    /// not checked; a wrong size corrupts the resource's bookkeeping.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Whether memory allocated by `other` may be released through `self`.
    fn is_equal(&self, other: &dyn MemoryResource) -> bool;
}

/// Identity comparison of two resources.
///
/// Compares object addresses only, so two resources with identical
/// configuration are never considered the same.
pub fn same_resource(a: &dyn MemoryResource, b: &dyn MemoryResource) -> bool {
    std::ptr::addr_eq(a, b)
}
