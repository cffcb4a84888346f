//! Arena-specific error types.
//!
//! Allocation failures use [`AllocError`](mapres_core::AllocError) from
//! `mapres-core`; this module only covers rejected configurations.

use std::error::Error;
use std::fmt;

/// Errors from validating an [`ArenaConfig`](crate::ArenaConfig).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `buffer_align` was zero.
    ZeroBufferAlign,
    /// `buffer_align` was not a power of two.
    BufferAlignNotPowerOfTwo {
        /// The rejected alignment.
        align: usize,
    },
    /// The buffer cannot be described by a `Layout` (it would exceed
    /// `isize::MAX` bytes once rounded up to `buffer_align`).
    CapacityTooLarge {
        /// The rejected capacity in bytes.
        capacity: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroBufferAlign => write!(f, "buffer alignment must be non-zero"),
            Self::BufferAlignNotPowerOfTwo { align } => {
                write!(f, "buffer alignment {align} is not a power of two")
            }
            Self::CapacityTooLarge { capacity } => {
                write!(f, "arena capacity {capacity} bytes exceeds isize::MAX")
            }
        }
    }
}

impl Error for ConfigError {}
