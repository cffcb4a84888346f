//! Instrumented memory resources.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use mapres_core::{same_resource, AllocError, MemoryResource, SystemResource};

/// Records every live block handed out by an inner resource.
///
/// Live blocks are kept in allocation order. Releasing a block that is not
/// live, or releasing it with a layout other than the one it was allocated
/// with, panics. Zero-sized blocks may share addresses, so they are only
/// counted, not recorded.
pub struct TrackingResource<R = SystemResource> {
    inner: R,
    live: Mutex<IndexMap<usize, Layout>>,
    live_zero_sized: AtomicUsize,
    allocations: AtomicUsize,
    deallocations: AtomicUsize,
}

impl TrackingResource {
    /// Track blocks from the global allocator.
    pub fn new() -> Self {
        Self::wrap(SystemResource)
    }
}

impl Default for TrackingResource {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: MemoryResource> TrackingResource<R> {
    /// Track blocks from `inner`.
    pub fn wrap(inner: R) -> Self {
        Self {
            inner,
            live: Mutex::new(IndexMap::new()),
            live_zero_sized: AtomicUsize::new(0),
            allocations: AtomicUsize::new(0),
            deallocations: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Blocks allocated and not yet released.
    pub fn live_count(&self) -> usize {
        self.live().len() + self.live_zero_sized.load(Ordering::SeqCst)
    }

    /// Total size of the live blocks.
    pub fn live_bytes(&self) -> usize {
        self.live().values().map(Layout::size).sum()
    }

    /// Layouts of the live non-zero-sized blocks, oldest first.
    pub fn live_layouts(&self) -> Vec<Layout> {
        self.live().values().copied().collect()
    }

    /// Successful allocations so far.
    pub fn allocations(&self) -> usize {
        self.allocations.load(Ordering::SeqCst)
    }

    /// Releases so far.
    pub fn deallocations(&self) -> usize {
        self.deallocations.load(Ordering::SeqCst)
    }

    fn live(&self) -> MutexGuard<'_, IndexMap<usize, Layout>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// SAFETY: every block comes unchanged from `inner`, which upholds the
// contract itself.
unsafe impl<R: MemoryResource> MemoryResource for TrackingResource<R> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let ptr = self.inner.allocate(layout)?;
        self.allocations.fetch_add(1, Ordering::SeqCst);
        if layout.size() == 0 {
            self.live_zero_sized.fetch_add(1, Ordering::SeqCst);
        } else {
            let clash = self.live().insert(ptr.as_ptr() as usize, layout);
            assert!(
                clash.is_none(),
                "block {ptr:p} handed out while still live ({layout:?})"
            );
        }
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.deallocations.fetch_add(1, Ordering::SeqCst);
        if layout.size() == 0 {
            self.live_zero_sized.fetch_sub(1, Ordering::SeqCst);
        } else {
            let recorded = self.live().shift_remove(&(ptr.as_ptr() as usize));
            match recorded {
                None => panic!("release of block {ptr:p} that is not live ({layout:?})"),
                Some(recorded) => assert_eq!(
                    recorded, layout,
                    "block {ptr:p} released with a different layout"
                ),
            }
        }
        // SAFETY: the block is live and `layout` matches its allocation.
        unsafe { self.inner.deallocate(ptr, layout) }
    }

    fn is_equal(&self, other: &dyn MemoryResource) -> bool {
        same_resource(self, other)
    }
}

/// Succeeds a fixed number of allocations, then refuses every request
/// with [`AllocError::OutOfMemory`].
pub struct FailingResource<R = SystemResource> {
    inner: R,
    pub succeed_count: usize,
    call_count: AtomicUsize,
}

impl FailingResource {
    /// Allow `succeed_count` allocations from the global allocator.
    pub fn after(succeed_count: usize) -> Self {
        Self::wrap(SystemResource, succeed_count)
    }
}

impl<R: MemoryResource> FailingResource<R> {
    /// Allow `succeed_count` allocations from `inner`.
    pub fn wrap(inner: R, succeed_count: usize) -> Self {
        Self {
            inner,
            succeed_count,
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// How many times `allocate` has been called, refusals included.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Reset the call counter, re-arming the successful allocations.
    pub fn reset(&self) {
        self.call_count.store(0, Ordering::Relaxed);
    }
}

// SAFETY: as for `TrackingResource`; refusals hand out nothing.
unsafe impl<R: MemoryResource> MemoryResource for FailingResource<R> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let n = self.call_count.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            return Err(AllocError::OutOfMemory {
                requested: layout.size(),
                align: layout.align(),
            });
        }
        self.inner.allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded unchanged from the caller.
        unsafe { self.inner.deallocate(ptr, layout) }
    }

    fn is_equal(&self, other: &dyn MemoryResource) -> bool {
        same_resource(self, other)
    }
}
