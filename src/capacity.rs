//! Chunk capacity: the size ceiling handed to the chunker.
//!
//! The ceiling comes from the LLM's context window, so it is measured in
//! characters (Unicode scalar values), not bytes. A prompt template plus one
//! chunk has to fit, which is why the default is well below typical model
//! limits.
//!
//! The ceiling is soft in exactly one case: a single sentence longer than
//! the capacity is kept whole. See [`HierarchicalChunker`](crate::HierarchicalChunker).

use crate::{Error, Result};

/// Maximum chunk size, in characters.
///
/// # Examples
///
/// ```rust
/// use precis::ChunkCapacity;
///
/// let cap = ChunkCapacity::new(4000).unwrap();
/// assert_eq!(cap.max(), 4000);
/// assert!(cap.admits(4000));
/// assert!(!cap.admits(4001));
///
/// assert!(ChunkCapacity::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkCapacity {
    max: usize,
}

impl ChunkCapacity {
    /// Default ceiling: 4000 characters.
    pub const DEFAULT_MAX: usize = 4000;

    /// Create a capacity with the given ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChunkSize`] if `max == 0`.
    pub fn new(max: usize) -> Result<Self> {
        if max == 0 {
            return Err(Error::InvalidChunkSize(max));
        }
        Ok(Self { max })
    }

    /// The maximum allowed chunk size in characters.
    #[must_use]
    pub const fn max(&self) -> usize {
        self.max
    }

    /// Whether a chunk of `len` characters fits.
    #[must_use]
    pub const fn admits(&self, len: usize) -> bool {
        len <= self.max
    }

    /// Check if appending `additional` characters to a buffer of `current`
    /// characters would exceed the ceiling.
    ///
    /// Useful for incremental chunk building.
    #[must_use]
    pub const fn would_overflow(&self, current: usize, additional: usize) -> bool {
        current.saturating_add(additional) > self.max
    }
}

impl Default for ChunkCapacity {
    fn default() -> Self {
        Self {
            max: Self::DEFAULT_MAX,
        }
    }
}

impl TryFrom<usize> for ChunkCapacity {
    type Error = Error;

    fn try_from(max: usize) -> Result<Self> {
        Self::new(max)
    }
}
