//! Error types shared by the trees and the editor facade.

use thiserror::Error;

/// Errors returned by buffer operations.
///
/// Every bounds violation is reported here instead of panicking, so callers
/// can decide whether to clamp, ignore, or surface the failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferError {
    /// A line or column index is outside the current bounds.
    #[error("index {index} out of bounds (length {len})")]
    InvalidIndex {
        /// The rejected index.
        index: usize,
        /// The length of the addressed axis at the time of the call.
        len: usize,
    },

    /// A range extends past the end of the addressed axis.
    #[error("range {start}..{end} exceeds length {len}")]
    InvalidRange {
        /// Start of the rejected range.
        start: usize,
        /// End (exclusive) of the rejected range.
        end: usize,
        /// The length of the addressed axis at the time of the call.
        len: usize,
    },

    /// The other end of a highlight channel has been dropped.
    #[error("highlight channel disconnected")]
    Disconnected,
}

impl BufferError {
    /// Fail with `InvalidIndex` unless `index < len`.
    #[inline]
    pub(crate) const fn check_index(index: usize, len: usize) -> Result<(), Self> {
        if index < len {
            Ok(())
        } else {
            Err(Self::InvalidIndex { index, len })
        }
    }

    /// Fail with `InvalidIndex` unless `index <= len` (insertion points).
    #[inline]
    pub(crate) const fn check_position(index: usize, len: usize) -> Result<(), Self> {
        if index <= len {
            Ok(())
        } else {
            Err(Self::InvalidIndex { index, len })
        }
    }

    /// Fail with `InvalidRange` unless `start + length <= len`.
    #[inline]
    pub(crate) const fn check_range(start: usize, length: usize, len: usize) -> Result<(), Self> {
        let end = start.saturating_add(length);
        if end <= len {
            Ok(())
        } else {
            Err(Self::InvalidRange { start, end, len })
        }
    }
}

/// Result alias for buffer operations.
pub type Result<T, E = BufferError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_index() {
        assert!(BufferError::check_index(0, 1).is_ok());
        assert_eq!(
            BufferError::check_index(1, 1),
            Err(BufferError::InvalidIndex { index: 1, len: 1 })
        );
    }

    #[test]
    fn test_check_position_allows_end() {
        assert!(BufferError::check_position(3, 3).is_ok());
        assert!(BufferError::check_position(4, 3).is_err());
    }

    #[test]
    fn test_check_range() {
        assert!(BufferError::check_range(2, 3, 5).is_ok());
        assert_eq!(
            BufferError::check_range(2, 4, 5),
            Err(BufferError::InvalidRange { start: 2, end: 6, len: 5 })
        );
        // Overflowing ranges are rejected rather than wrapping.
        assert!(BufferError::check_range(1, usize::MAX, 5).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = BufferError::InvalidIndex { index: 7, len: 3 };
        assert_eq!(err.to_string(), "index 7 out of bounds (length 3)");
    }
}
