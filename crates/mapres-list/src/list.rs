//! The [`SList`] container.

#![allow(unsafe_code)]

use std::fmt;
use std::marker::PhantomData;

use mapres_core::{default_resource, AllocError, MemoryResource, ResourceBox};

use crate::iter::{Iter, IterMut};
use crate::node::{Link, Node};

/// A singly-linked list whose nodes live in a [`MemoryResource`].
///
/// The list borrows its resource for `'r`, so the resource always outlives
/// every node allocated from it. `SList` is deliberately not `Clone`;
/// ownership of the chain moves with the value, or explicitly with
/// [`take`](SList::take) and [`assign_from`](SList::assign_from).
pub struct SList<'r, T> {
    head: Link<T>,
    resource: &'r dyn MemoryResource,
    _owns: PhantomData<T>,
}

// SAFETY: the list owns its nodes exclusively; the resource is `Sync`.
unsafe impl<T: Send> Send for SList<'_, T> {}
// SAFETY: shared access to the list only yields `&T`.
unsafe impl<T: Sync> Sync for SList<'_, T> {}

impl<T> SList<'static, T> {
    /// Create an empty list over the process-wide default resource.
    ///
    /// The default is read once, here; later calls to
    /// [`set_default_resource`](mapres_core::set_default_resource) do not
    /// affect this list.
    pub fn new() -> Self {
        Self::new_in(default_resource())
    }
}

impl<T> Default for SList<'static, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r, T> SList<'r, T> {
    /// Create an empty list that allocates from `resource`.
    pub const fn new_in(resource: &'r dyn MemoryResource) -> Self {
        Self {
            head: None,
            resource,
            _owns: PhantomData,
        }
    }

    /// Insert `value` at the front.
    ///
    /// On [`AllocError`] the list is unchanged and `value` is dropped.
    pub fn push_front(&mut self, value: T) -> Result<(), AllocError> {
        self.push_front_with(move || value)
    }

    /// Allocate a node, then construct its value with `init` in place.
    ///
    /// `init` only runs once the node's block has been obtained. If it
    /// panics, the block goes back to the resource and the list is
    /// unchanged.
    pub fn push_front_with<F>(&mut self, init: F) -> Result<(), AllocError>
    where
        F: FnOnce() -> T,
    {
        let next = self.head;
        let node = ResourceBox::new_with_in(|| Node { value: init(), next }, self.resource)?;
        self.head = Some(ResourceBox::into_raw(node));
        Ok(())
    }

    /// Remove the front element and return it. `None` if empty.
    pub fn pop_front(&mut self) -> Option<T> {
        let ptr = self.head?;
        // SAFETY: `head` was produced by `ResourceBox::into_raw` over
        // `self.resource` in `push_front_with` and is owned only by this list.
        let node = unsafe { ResourceBox::from_raw_in(ptr, self.resource) };
        self.head = node.next;
        Some(ResourceBox::into_inner(node).value)
    }

    /// Drop every element, releasing all nodes to the resource.
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    /// Whether the list holds no elements.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Number of elements. Walks the whole chain.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// The front element, if any.
    pub fn front(&self) -> Option<&T> {
        // SAFETY: every link in the chain points at a live node owned by
        // this list; the borrow of `self` keeps it alive.
        self.head.map(|node| unsafe { &node.as_ref().value })
    }

    /// The front element, mutably, if any.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        // SAFETY: as in `front`; `&mut self` makes the access exclusive.
        self.head.map(|mut node| unsafe { &mut node.as_mut().value })
    }

    /// The resource this list allocates from.
    pub fn resource(&self) -> &'r dyn MemoryResource {
        self.resource
    }

    /// Move the whole chain into a new list over the same resource,
    /// leaving `self` empty.
    pub fn take(&mut self) -> Self {
        Self {
            head: self.head.take(),
            resource: self.resource,
            _owns: PhantomData,
        }
    }

    /// Replace the contents of `self` with those of `other`.
    ///
    /// The current elements of `self` are dropped first. `self` then adopts
    /// `other`'s chain and resource, and `other` is left empty (still bound
    /// to its resource).
    pub fn assign_from(&mut self, other: &mut SList<'r, T>) {
        self.clear();
        self.resource = other.resource;
        self.head = other.head.take();
    }

    /// Iterate over shared references, front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        // SAFETY: the chain is valid and borrowed for the iterator's lifetime.
        unsafe { Iter::from_link(self.head) }
    }

    /// Iterate over mutable references, front to back.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        // SAFETY: the chain is valid and exclusively borrowed for the
        // iterator's lifetime.
        unsafe { IterMut::from_link(self.head) }
    }

    /// Position of the front element. Equal to [`end`](SList::end) when
    /// the list is empty.
    pub fn begin(&self) -> Iter<'_, T> {
        self.iter()
    }

    /// The position past the last element.
    pub fn end(&self) -> Iter<'_, T> {
        Iter::end()
    }
}

impl<T> Drop for SList<'_, T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: fmt::Debug> fmt::Debug for SList<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for SList<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for SList<'_, T> {}
