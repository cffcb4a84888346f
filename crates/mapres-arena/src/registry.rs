//! Size-keyed registry of released blocks.
//!
//! [`FreeBlockRegistry`] files every released block under the byte size it
//! was released with. Blocks are recorded as offsets into the owning
//! arena's buffer, so the registry holds no pointers and is trivially
//! `Send`.
//!
//! Lookup is "at least": a request is matched against the smallest size
//! class whose key is `>=` the requested size. Only that one class is
//! consulted. Size classes are never removed once created, so an emptied
//! class still shadows larger ones for requests it would have covered.
//!
//! Within a class, reuse is LIFO: the most recently released block is
//! offered first.

use std::collections::BTreeMap;

use smallvec::SmallVec;

/// Stack of block offsets for one size class.
///
/// Most classes hold a handful of blocks at a time; four fit inline.
type FreeStack = SmallVec<[usize; 4]>;

/// Ordered mapping `size -> LIFO stack of released block offsets`.
#[derive(Clone, Debug, Default)]
pub struct FreeBlockRegistry {
    classes: BTreeMap<usize, FreeStack>,
}

impl FreeBlockRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// File `block` under size class `size`.
    ///
    /// The registry trusts `size`: it must be the size the block was last
    /// handed out for.
    pub fn release(&mut self, size: usize, block: usize) {
        let stack = self.classes.entry(size).or_default();
        debug_assert!(
            !stack.contains(&block),
            "block at offset {block} released twice into size class {size}"
        );
        stack.push(block);
    }

    /// Take a block for a request of `size` bytes.
    ///
    /// Consults the smallest size class `>= size`, scanning it from newest
    /// to oldest and removing the first block for which `fits` returns
    /// true. Returns the block's offset and the size class it came from,
    /// or `None` if there is no such class or no block in it fits.
    pub fn reclaim<F>(&mut self, size: usize, fits: F) -> Option<(usize, usize)>
    where
        F: Fn(usize) -> bool,
    {
        let (&class, stack) = self.classes.range_mut(size..).next()?;
        let pos = stack.iter().rposition(|&block| fits(block))?;
        Some((stack.remove(pos), class))
    }

    /// Number of released blocks currently on file.
    pub fn free_blocks(&self) -> usize {
        self.classes.values().map(|stack| stack.len()).sum()
    }

    /// Total bytes on file, counted by size class.
    pub fn free_bytes(&self) -> usize {
        self.classes
            .iter()
            .map(|(size, stack)| size * stack.len())
            .sum()
    }

    /// Number of size classes ever created, empty ones included.
    pub fn size_classes(&self) -> usize {
        self.classes.len()
    }

    /// Number of blocks on file under exactly `size`.
    pub fn class_len(&self, size: usize) -> usize {
        self.classes.get(&size).map_or(0, |stack| stack.len())
    }

    /// Whether no released blocks are on file.
    pub fn is_empty(&self) -> bool {
        self.classes.values().all(|stack| stack.is_empty())
    }
}
