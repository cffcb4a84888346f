//! Single-ownership handle over resource-allocated storage.
//!
//! [`ResourceBox`] is to a [`MemoryResource`] what `Box` is to the global
//! allocator: it owns one value in one block and releases both together.
//! Construction and release are paired on every exit path:
//!
//! - if the resource refuses the block, no value is constructed;
//! - if constructing the value panics, the block is released before the
//!   panic continues;
//! - dropping the handle drops the value, then releases the block (even if
//!   the value's destructor panics).
//!
//! Containers that keep raw links (see `mapres-list`) convert a handle
//! into a pointer with [`ResourceBox::into_raw`] and back with
//! [`ResourceBox::from_raw_in`], so the pairing holds across the link too.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::fmt;
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};

use crate::error::AllocError;
use crate::resource::MemoryResource;

/// Owning pointer to a `T` stored in a block from a [`MemoryResource`].
///
/// Associated functions (rather than methods) are used for everything
/// besides `Deref`, as with `Box`, so they never shadow methods of `T`.
pub struct ResourceBox<'r, T> {
    ptr: NonNull<T>,
    resource: &'r dyn MemoryResource,
    _owns: PhantomData<T>,
}

// SAFETY: the handle owns its `T` exclusively; the resource is `Sync`.
unsafe impl<T: Send> Send for ResourceBox<'_, T> {}
// SAFETY: shared access to the handle only yields `&T`.
unsafe impl<T: Sync> Sync for ResourceBox<'_, T> {}

impl<'r, T> ResourceBox<'r, T> {
    /// Move `value` into a block allocated from `resource`.
    ///
    /// On failure `value` is dropped and the resource is unchanged.
    pub fn new_in(value: T, resource: &'r dyn MemoryResource) -> Result<Self, AllocError> {
        Self::new_with_in(move || value, resource)
    }

    /// Allocate a block from `resource`, then construct the value in it.
    ///
    /// `init` runs only after the allocation succeeded. If `init` panics
    /// the block is returned to `resource`.
    pub fn new_with_in<F>(init: F, resource: &'r dyn MemoryResource) -> Result<Self, AllocError>
    where
        F: FnOnce() -> T,
    {
        let layout = Layout::new::<T>();
        let block = resource.allocate(layout)?;
        let guard = ReleaseGuard {
            ptr: block,
            layout,
            resource,
        };
        let value = init();
        let ptr = block.cast::<T>();
        debug_assert!(ptr.as_ptr().is_aligned(), "resource returned a misaligned block");
        // SAFETY: `MemoryResource` is an unsafe trait whose implementors
        // guarantee the block holds `size_of::<T>()` bytes aligned for `T`;
        // nothing else refers to it.
        unsafe { ptr.as_ptr().write(value) };
        std::mem::forget(guard);
        Ok(Self {
            ptr,
            resource,
            _owns: PhantomData,
        })
    }

    /// Move the value out and release its block.
    pub fn into_inner(this: Self) -> T {
        let this = ManuallyDrop::new(this);
        let _guard = ReleaseGuard::for_box(&this);
        // SAFETY: `ptr` holds an initialised `T`; the handle is never used
        // again, so the value is read exactly once.
        unsafe { this.ptr.as_ptr().read() }
    }

    /// Give up ownership, returning the raw pointer.
    ///
    /// The value and its block stay alive until the pointer is turned back
    /// into a handle with [`ResourceBox::from_raw_in`].
    pub fn into_raw(this: Self) -> NonNull<T> {
        ManuallyDrop::new(this).ptr
    }

    /// Re-take ownership of a pointer produced by [`ResourceBox::into_raw`].
    ///
    /// # Safety
    ///
    /// `ptr` must come from `into_raw` on a handle whose resource
    /// [`is_equal`](MemoryResource::is_equal) to `resource`, and must not
    /// be owned by any other handle.
    pub unsafe fn from_raw_in(ptr: NonNull<T>, resource: &'r dyn MemoryResource) -> Self {
        Self {
            ptr,
            resource,
            _owns: PhantomData,
        }
    }

    /// The resource the block was allocated from.
    pub fn resource(this: &Self) -> &'r dyn MemoryResource {
        this.resource
    }

    /// Address of the owned value.
    pub fn as_ptr(this: &Self) -> NonNull<T> {
        this.ptr
    }
}

impl<T> Deref for ResourceBox<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: `ptr` holds an initialised `T` owned by this handle.
        unsafe { self.ptr.as_ref() }
    }
}

impl<T> DerefMut for ResourceBox<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: `ptr` holds an initialised `T` owned exclusively by this handle.
        unsafe { self.ptr.as_mut() }
    }
}

impl<T> Drop for ResourceBox<'_, T> {
    fn drop(&mut self) {
        let _guard = ReleaseGuard::for_box(self);
        // SAFETY: `ptr` holds an initialised `T` that is dropped exactly once.
        unsafe { ptr::drop_in_place(self.ptr.as_ptr()) }
    }
}

impl<T: fmt::Debug> fmt::Debug for ResourceBox<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

/// Releases a block when dropped, including during unwinding.
struct ReleaseGuard<'r> {
    ptr: NonNull<u8>,
    layout: Layout,
    resource: &'r dyn MemoryResource,
}

impl<'r> ReleaseGuard<'r> {
    fn for_box<T>(owner: &ResourceBox<'r, T>) -> Self {
        Self {
            ptr: owner.ptr.cast(),
            layout: Layout::new::<T>(),
            resource: owner.resource,
        }
    }
}

impl Drop for ReleaseGuard<'_> {
    fn drop(&mut self) {
        // SAFETY: guards are only built for a block allocated from
        // `resource` with `layout`, by the block's last user.
        unsafe { self.resource.deallocate(self.ptr, self.layout) }
    }
}
