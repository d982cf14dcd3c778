//! Error types.

/// Error returned by [`ByteCursor`](crate::ByteCursor) and
/// [`ByteCursorMut`](crate::ByteCursorMut) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    /// The operation needs more bytes than the cursor has left.
    #[error("not enough bytes: needed {needed}, {available} remaining")]
    InsufficientBytes {
        /// The number of bytes the operation needed.
        needed: usize,
        /// The number of bytes left in the buffer.
        available: usize,
    },
    /// A string read found bytes that are not valid UTF-8.
    #[error("invalid utf-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}
