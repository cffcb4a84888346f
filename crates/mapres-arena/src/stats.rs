//! Point-in-time usage snapshot of a [`MapResource`](crate::MapResource).

use std::fmt;

/// Usage counters captured under the resource's lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaStats {
    /// Size of the backing buffer in bytes.
    pub capacity: usize,
    /// Bytes consumed by the bump offset, padding included.
    pub used: usize,
    /// Released blocks waiting in the registry.
    pub free_blocks: usize,
    /// Bytes waiting in the registry, counted by size class.
    pub free_bytes: usize,
    /// Size classes in the registry, empty ones included.
    pub size_classes: usize,
}

impl ArenaStats {
    /// Bytes not yet reached by the bump offset.
    pub fn remaining(&self) -> usize {
        self.capacity - self.used
    }
}

impl fmt::Display for ArenaStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "used {}/{} bytes, {} free blocks ({} bytes) in {} size classes",
            self.used, self.capacity, self.free_blocks, self.free_bytes, self.size_classes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_is_capacity_minus_used() {
        let stats = ArenaStats {
            capacity: 1024,
            used: 100,
            free_blocks: 0,
            free_bytes: 0,
            size_classes: 0,
        };
        assert_eq!(stats.remaining(), 924);
    }

    #[test]
    fn display_summarises_counters() {
        let stats = ArenaStats {
            capacity: 256,
            used: 128,
            free_blocks: 2,
            free_bytes: 64,
            size_classes: 1,
        };
        assert_eq!(
            stats.to_string(),
            "used 128/256 bytes, 2 free blocks (64 bytes) in 1 size classes"
        );
    }
}
