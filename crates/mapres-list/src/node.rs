use std::ptr::NonNull;

/// Owning link to the next node, or the end of the chain.
pub(crate) type Link<T> = Option<NonNull<Node<T>>>;

/// One element of the chain. Each node is allocated as a single block of
/// `Layout::new::<Node<T>>()` from the list's resource.
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) next: Link<T>,
}
