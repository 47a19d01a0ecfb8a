use thiserror::Error;

/// Errors that can occur when constructing or operating on a [`crate::Handle`]
/// and its producer/consumer siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PipeError {
    /// `elem_size` was zero at construction time.
    #[error("elem_size must be non-zero")]
    ZeroElemSize,

    /// The ring buffer failed to grow to the requested capacity.
    #[error("failed to allocate {requested} bytes for ring buffer (capacity {capacity})")]
    AllocationFailed {
        /// Total bytes the resize attempted to allocate.
        requested: usize,
        /// The record-count capacity that allocation was targeting.
        capacity: usize,
    },

    /// A source or target buffer's length did not equal `count * elem_size`
    /// for the `count` passed to the same call.
    #[error("buffer length {len} does not equal count ({count}) * elem_size ({elem_size})")]
    MisalignedBuffer {
        /// The length, in bytes, of the offending slice.
        len: usize,
        /// The `count` passed to the same call.
        count: usize,
        /// The pipe's fixed record size.
        elem_size: usize,
    },
}
