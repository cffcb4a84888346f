//! Allocation error types.

use std::error::Error;
use std::fmt;

/// Errors returned by [`MemoryResource::allocate`](crate::MemoryResource::allocate).
///
/// There is exactly one failure mode. Releasing memory never fails, and
/// nothing retries on the caller's behalf: recovering (e.g. by clearing a
/// container and trying again) is the caller's decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The resource has no block that satisfies the request.
    OutOfMemory {
        /// Number of bytes requested.
        requested: usize,
        /// Alignment requested, in bytes.
        align: usize,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { requested, align } => {
                write!(
                    f,
                    "out of memory: requested {requested} bytes aligned to {align}"
                )
            }
        }
    }
}

impl Error for AllocError {}
