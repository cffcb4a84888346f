//! Arena configuration parameters.

use std::alloc::Layout;

use crate::error::ConfigError;

/// Configuration for a [`MapResource`](crate::MapResource).
///
/// Fixes the size and base alignment of the backing buffer. Validated at
/// construction; both values are immutable for the resource's lifetime
/// (there is no resize operation).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Total size of the backing buffer in bytes.
    ///
    /// Default: 1 MiB.
    pub capacity: usize,

    /// Alignment of the first byte of the backing buffer.
    ///
    /// Default: 16, the global allocator's guarantee for ordinary types.
    /// Must be a non-zero power of two. Request alignment is computed on
    /// absolute addresses, so this only affects how much padding the first
    /// strongly-aligned request costs.
    pub buffer_align: usize,
}

impl ArenaConfig {
    /// Default buffer size: 1 MiB.
    pub const DEFAULT_CAPACITY: usize = 1024 * 1024;

    /// Default alignment of the buffer's base address.
    pub const DEFAULT_BUFFER_ALIGN: usize = 16;

    /// Create a config for a buffer of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buffer_align: Self::DEFAULT_BUFFER_ALIGN,
        }
    }

    /// Override the base alignment of the backing buffer.
    pub fn with_buffer_align(mut self, buffer_align: usize) -> Self {
        self.buffer_align = buffer_align;
        self
    }

    /// Check that the config describes an allocatable buffer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.buffer_layout().map(|_| ())
    }

    /// Layout of the backing buffer.
    pub(crate) fn buffer_layout(&self) -> Result<Layout, ConfigError> {
        if self.buffer_align == 0 {
            return Err(ConfigError::ZeroBufferAlign);
        }
        if !self.buffer_align.is_power_of_two() {
            return Err(ConfigError::BufferAlignNotPowerOfTwo {
                align: self.buffer_align,
            });
        }
        Layout::from_size_align(self.capacity, self.buffer_align).map_err(|_| {
            ConfigError::CapacityTooLarge {
                capacity: self.capacity,
            }
        })
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_is_one_mib() {
        let config = ArenaConfig::default();
        assert_eq!(config.capacity, 1 << 20);
        assert_eq!(config.buffer_align, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_capacity_is_valid() {
        assert!(ArenaConfig::new(0).validate().is_ok());
    }

    #[test]
    fn rejects_zero_align() {
        let config = ArenaConfig::new(64).with_buffer_align(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroBufferAlign));
    }

    #[test]
    fn rejects_non_power_of_two_align() {
        let config = ArenaConfig::new(64).with_buffer_align(24);
        assert_eq!(
            config.validate(),
            Err(ConfigError::BufferAlignNotPowerOfTwo { align: 24 })
        );
    }

    #[test]
    fn rejects_capacity_beyond_isize_max() {
        let config = ArenaConfig::new(usize::MAX);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CapacityTooLarge { .. })
        ));
    }
}
