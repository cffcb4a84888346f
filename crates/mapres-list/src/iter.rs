//! Iterators over an [`SList`].
//!
//! [`Iter`] doubles as a position in the list: two `Iter`s are equal when
//! they point at the same node, and every exhausted `Iter` equals
//! [`SList::end`]. This mirrors a forward cursor.

#![allow(unsafe_code)]

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr;

use crate::list::SList;
use crate::node::{Link, Node};

/// Shared iterator over an [`SList`], front to back.
pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
}

// SAFETY: an `Iter` only hands out `&T`.
unsafe impl<T: Sync> Send for Iter<'_, T> {}
// SAFETY: as above.
unsafe impl<T: Sync> Sync for Iter<'_, T> {}

impl<'a, T> Iter<'a, T> {
    /// # Safety
    ///
    /// Every node reachable from `link` must stay alive and unmodified for
    /// `'a`.
    pub(crate) unsafe fn from_link(link: Link<T>) -> Self {
        Self {
            // SAFETY: upheld by the caller.
            next: link.map(|node| unsafe { node.as_ref() }),
        }
    }

    pub(crate) fn end() -> Self {
        Self { next: None }
    }

    /// The element at the current position, without advancing.
    pub fn peek(&self) -> Option<&'a T> {
        self.next.map(|node| &node.value)
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.next?;
        // SAFETY: successors of a live node stay alive for `'a` (see
        // `from_link`).
        self.next = node.next.map(|next| unsafe { next.as_ref() });
        Some(&node.value)
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self { next: self.next }
    }
}

impl<T> PartialEq for Iter<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.next.map(ptr::from_ref) == other.next.map(ptr::from_ref)
    }
}

impl<T> Eq for Iter<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.clone().collect::<Vec<_>>()).finish()
    }
}

/// Mutable iterator over an [`SList`], front to back.
pub struct IterMut<'a, T> {
    next: Link<T>,
    _borrow: PhantomData<&'a mut T>,
}

// SAFETY: an `IterMut` hands out `&mut T`, which is as sendable as `T`.
unsafe impl<T: Send> Send for IterMut<'_, T> {}
// SAFETY: a shared `IterMut` gives no access to elements.
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

impl<'a, T> IterMut<'a, T> {
    /// # Safety
    ///
    /// Every node reachable from `link` must stay alive for `'a` and must
    /// not be accessed other than through this iterator.
    pub(crate) unsafe fn from_link(link: Link<T>) -> Self {
        Self {
            next: link,
            _borrow: PhantomData,
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        let mut ptr = self.next?;
        // SAFETY: the node is alive and exclusively ours for `'a`; each node
        // is visited once, so no two returned references alias.
        let node = unsafe { ptr.as_mut() };
        self.next = node.next;
        Some(&mut node.value)
    }
}

impl<T> FusedIterator for IterMut<'_, T> {}

impl<T> fmt::Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").finish_non_exhaustive()
    }
}

/// Owning iterator that pops elements off the front of an [`SList`].
pub struct IntoIter<'r, T> {
    list: SList<'r, T>,
}

impl<T> Iterator for IntoIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }
}

impl<T> FusedIterator for IntoIter<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.list).finish()
    }
}

impl<'r, T> IntoIterator for SList<'r, T> {
    type Item = T;
    type IntoIter = IntoIter<'r, T>;

    fn into_iter(self) -> IntoIter<'r, T> {
        IntoIter { list: self }
    }
}

impl<'a, T> IntoIterator for &'a SList<'_, T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut SList<'_, T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use crate::SList;
    use mapres_arena::MapResource;
    use mapres_test_utils::TrackingResource;

    fn list_of<'r>(mem: &'r MapResource, values: &[i32]) -> SList<'r, i32> {
        let mut list = SList::new_in(mem);
        for &v in values.iter().rev() {
            list.push_front(v).unwrap();
        }
        list
    }

    #[test]
    fn positions_compare_by_node() {
        let mem = MapResource::new(1024);
        let list = list_of(&mem, &[1, 2, 3]);

        let mut it1 = list.begin();
        let it2 = list.begin();
        assert_eq!(it1, it2);
        assert_eq!(it1.peek(), Some(&1));

        it1.next();
        assert_ne!(it1, it2);
        assert_eq!(it1.peek(), Some(&2));

        it1.next();
        assert_eq!(it1.peek(), Some(&3));

        it1.next();
        assert_eq!(it1, list.end());
        assert_eq!(it1.peek(), None);
    }

    #[test]
    fn equal_values_at_different_nodes_are_different_positions() {
        let mem = MapResource::new(1024);
        let list = list_of(&mem, &[5, 5]);
        let first = list.begin();
        let mut second = list.begin();
        second.next();
        assert_eq!(first.peek(), second.peek());
        assert_ne!(first, second);
    }

    #[test]
    fn iteration_is_fused() {
        let mem = MapResource::new(1024);
        let list = list_of(&mem, &[1]);
        let mut it = list.iter();
        assert_eq!(it.next(), Some(&1));
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
        assert_eq!(it, list.end());
    }

    #[test]
    fn for_loops_over_all_three_forms() {
        let mem = MapResource::new(1024);
        let mut list = list_of(&mem, &[1, 2, 3]);

        let mut sum = 0;
        for v in &list {
            sum += v;
        }
        assert_eq!(sum, 6);

        for v in &mut list {
            *v += 10;
        }

        let mut owned = Vec::new();
        for v in list {
            owned.push(v);
        }
        assert_eq!(owned, vec![11, 12, 13]);
    }

    #[test]
    fn dropping_into_iter_early_releases_the_rest() {
        let mem = TrackingResource::new();
        let mut list = SList::new_in(&mem);
        for i in 0..4 {
            list.push_front(i).unwrap();
        }
        let mut it = list.into_iter();
        assert_eq!(it.next(), Some(3));
        assert_eq!(mem.live_count(), 3);
        drop(it);
        assert_eq!(mem.live_count(), 0);
    }

    #[test]
    fn debug_shows_remaining_elements() {
        let mem = MapResource::new(1024);
        let list = list_of(&mem, &[1, 2]);
        let mut it = list.iter();
        it.next();
        assert_eq!(format!("{it:?}"), "Iter([2])");
        assert_eq!(format!("{:?}", list.into_iter()), "IntoIter([1, 2])");
    }
}
