//! The global-allocator resource and the process-wide default.
//!
//! [`SystemResource`] forwards to Rust's global allocator. A single
//! instance lives in a `static` and is the initial value of the
//! process-wide default returned by [`default_resource`].
//!
//! # Lifetime of the default
//!
//! The default slot is a `static` initialised at compile time, so there is
//! no initialisation-order hazard: it holds [`SystemResource`] before
//! `main` runs. [`set_default_resource`] swaps in any `'static` resource
//! (a `static`, a `LazyLock`, or a leaked `Box`). Statics are never
//! dropped, so a resource installed as the default lives until process
//! exit; `SystemResource` itself holds no state that needs tearing down.
//!
//! Only containers constructed without an explicit resource consult the
//! default. Swapping it does not affect containers that already exist.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::NonNull;
use std::sync::{PoisonError, RwLock};

use crate::error::AllocError;
use crate::resource::{same_resource, MemoryResource};

/// Stateless resource over the global allocator.
///
/// Zero-sized requests never reach the global allocator; they receive a
/// dangling, suitably aligned pointer that must still be released with the
/// same layout.
///
/// Equality is address identity, as for every resource. The type is
/// zero-sized, so only the [`system_resource`] instance has a meaningful
/// identity: it equals itself and the default slot while the slot holds it.
/// Separately constructed values may or may not compare equal. Blocks from
/// any `SystemResource` may still be released through any other, since they
/// all forward to the same global allocator.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemResource;

// SAFETY: non-zero sizes are served by the global allocator, which honours
// `layout`; zero sizes get a non-null pointer aligned to `layout.align()`.
unsafe impl MemoryResource for SystemResource {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Ok(dangling(layout));
        }
        // SAFETY: `layout` has a non-zero size.
        let ptr = unsafe { alloc::alloc(layout) };
        NonNull::new(ptr).ok_or(AllocError::OutOfMemory {
            requested: layout.size(),
            align: layout.align(),
        })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() == 0 {
            return;
        }
        // SAFETY: caller guarantees `ptr` came from `allocate` with `layout`,
        // and non-zero sizes always went through the global allocator.
        unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
    }

    fn is_equal(&self, other: &dyn MemoryResource) -> bool {
        same_resource(self, other)
    }
}

fn dangling(layout: Layout) -> NonNull<u8> {
    // SAFETY: a `Layout`'s alignment is never zero.
    unsafe { NonNull::new_unchecked(std::ptr::without_provenance_mut(layout.align())) }
}

static SYSTEM: SystemResource = SystemResource;

static DEFAULT: RwLock<&'static dyn MemoryResource> =
    RwLock::new(&SYSTEM as &'static dyn MemoryResource);

/// The process-wide [`SystemResource`] instance.
pub fn system_resource() -> &'static SystemResource {
    &SYSTEM
}

/// The resource used by containers built without an explicit one.
pub fn default_resource() -> &'static dyn MemoryResource {
    *DEFAULT.read().unwrap_or_else(PoisonError::into_inner)
}

/// Replace the process-wide default resource, returning the previous one.
pub fn set_default_resource(resource: &'static dyn MemoryResource) -> &'static dyn MemoryResource {
    let mut slot = DEFAULT.write().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *slot, resource)
}
