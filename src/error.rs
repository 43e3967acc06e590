// src/error.rs
//! Error types and sticky fault flags for buffer operations

use std::fmt;

/// Errors that can occur during buffer operations.
///
/// Variants fall into three groups with different propagation rules:
///
/// - **Capacity faults** ([`PutOverflow`](Self::PutOverflow),
///   [`GetUnderflow`](Self::GetUnderflow)) also set the buffer's sticky
///   [`ErrorFlags`]; once set, subsequent operations on the same side
///   short-circuit until [`clear`](crate::Buffer::clear).
/// - **Grammar faults** ([`TokenMismatch`](Self::TokenMismatch),
///   [`MalformedNumber`](Self::MalformedNumber),
///   [`DelimiterMismatch`](Self::DelimiterMismatch)) are reported per call,
///   leave the read cursor unchanged, and never stick.
/// - **Contract faults** ([`LayoutMismatch`](Self::LayoutMismatch),
///   [`ReadOnlyBuffer`](Self::ReadOnlyBuffer), [`WrongMode`](Self::WrongMode))
///   indicate caller errors and are always reported loudly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Write exceeded capacity of a non-growable buffer
    PutOverflow,
    /// Read ran past the high-water mark
    GetUnderflow,
    /// Token grammar did not match; cursor unchanged
    TokenMismatch,
    /// Text scan found no valid number; cursor unchanged
    MalformedNumber,
    /// Delimited string missing its delimiter; cursor unchanged
    DelimiterMismatch,
    /// Slice or record size disagrees with the descriptor
    LayoutMismatch {
        /// Byte count the descriptor requires
        expected: usize,
        /// Byte count actually supplied
        actual: usize,
    },
    /// Write attempted on a read-only buffer
    ReadOnlyBuffer,
    /// Operation only valid in the other (text/binary) mode
    WrongMode,
    /// I/O error (for compatibility)
    Io(String),
}

impl BufferError {
    /// Returns `true` for grammar faults, which never set sticky flags
    /// and never move the cursor.
    pub fn is_grammar(&self) -> bool {
        matches!(
            self,
            Self::TokenMismatch | Self::MalformedNumber | Self::DelimiterMismatch
        )
    }
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PutOverflow => write!(f, "Put overflow: write exceeds buffer capacity"),
            Self::GetUnderflow => write!(f, "Get underflow: read exceeds valid data"),
            Self::TokenMismatch => write!(f, "Token grammar mismatch"),
            Self::MalformedNumber => write!(f, "Malformed number in text scan"),
            Self::DelimiterMismatch => write!(f, "Delimited string missing delimiter"),
            Self::LayoutMismatch { expected, actual } => {
                write!(
                    f,
                    "Layout mismatch: expected {} bytes, got {}",
                    expected, actual
                )
            }
            Self::ReadOnlyBuffer => write!(f, "Buffer is read-only"),
            Self::WrongMode => write!(f, "Operation not valid in this buffer mode"),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for BufferError {}

/// Convert BufferError to std::io::Error
impl From<BufferError> for std::io::Error {
    fn from(err: BufferError) -> Self {
        use std::io::ErrorKind;
        match err {
            BufferError::PutOverflow => std::io::Error::new(ErrorKind::WriteZero, err),
            BufferError::GetUnderflow => std::io::Error::new(ErrorKind::UnexpectedEof, err),
            BufferError::TokenMismatch
            | BufferError::MalformedNumber
            | BufferError::DelimiterMismatch => std::io::Error::new(ErrorKind::InvalidData, err),
            BufferError::Io(msg) => std::io::Error::other(msg),
            _ => std::io::Error::new(ErrorKind::InvalidInput, err),
        }
    }
}

/// Convert std::io::Error to BufferError
impl From<std::io::Error> for BufferError {
    fn from(err: std::io::Error) -> Self {
        BufferError::Io(err.to_string())
    }
}

/// Convert BufferError to anyhow::Error
#[cfg(feature = "anyhow")]
impl From<BufferError> for anyhow::Error {
    fn from(err: BufferError) -> Self {
        anyhow::anyhow!("{}", err)
    }
}

/// Allow using ? with anyhow::Error
#[cfg(feature = "anyhow")]
impl From<anyhow::Error> for BufferError {
    fn from(err: anyhow::Error) -> Self {
        BufferError::Io(err.to_string())
    }
}

/// Result type alias for buffer operations
///
/// Note: When using with other Result types (like anyhow::Result),
/// either qualify the type (`serbuf::Result<T>`) or use the conversion traits.
pub type Result<T> = std::result::Result<T, BufferError>;

/// Sticky fault state of a buffer.
///
/// Set on the first capacity fault of either side and never cleared except
/// by [`clear`](crate::Buffer::clear) or [`purge`](crate::Buffer::purge).
/// Queryable at any time so callers can batch operations and check validity
/// once at the end.
///
/// # Examples
///
/// ```
/// use serbuf::{Buffer, ErrorFlags};
///
/// let mut buf = Buffer::from_vec(vec![0u8; 4]);
/// buf.seek_put(serbuf::SeekType::Head, 0).unwrap();
/// let _ = buf.put_u32(1);
/// let _ = buf.put_u32(2); // overflows the fixed 4-byte region
/// assert!(buf.error_flags().contains(ErrorFlags::PUT_OVERFLOW));
/// assert!(!buf.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ErrorFlags(u8);

impl ErrorFlags {
    /// Write overflowed a non-growable buffer
    pub const PUT_OVERFLOW: ErrorFlags = ErrorFlags(0x1);
    /// Read ran past the high-water mark
    pub const GET_UNDERFLOW: ErrorFlags = ErrorFlags(0x2);

    /// No faults recorded.
    pub const fn empty() -> Self {
        ErrorFlags(0)
    }

    /// Returns `true` if every bit of `other` is set in `self`.
    pub const fn contains(self, other: ErrorFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no fault bit is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub(crate) fn insert(&mut self, other: ErrorFlags) {
        self.0 |= other.0;
    }

    pub(crate) fn clear(&mut self) {
        self.0 = 0;
    }
}

/// Extension trait for converting Results between different error types
pub trait ResultExt<T> {
    /// Convert to anyhow::Result
    #[cfg(feature = "anyhow")]
    fn into_anyhow(self) -> anyhow::Result<T>;

    /// Convert to io::Result
    fn into_io(self) -> std::io::Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    #[cfg(feature = "anyhow")]
    fn into_anyhow(self) -> anyhow::Result<T> {
        self.map_err(|e| e.into())
    }

    fn into_io(self) -> std::io::Result<T> {
        self.map_err(|e| e.into())
    }
}

/// Convenience macro for converting buffer operations to any Result type.
///
/// Requires an explicit target error type as the second argument so the
/// conversion is unambiguous — necessary because error types like
/// `anyhow::Error` have multiple overlapping `From` impls.
///
/// # Example
/// ```ignore
/// use serbuf::prelude::*;
/// use serbuf::buffer_op;
///
/// fn handler_function() -> anyhow::Result<()> {
///     let mut buf = Buffer::new(1024);
///     buffer_op!(buf.put_u32(42), anyhow::Error)?;
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! buffer_op {
    // Two-arg form: explicit target type (use this with anyhow, Box<dyn Error>, etc.)
    ($expr:expr, $target:ty) => {
        $expr.map_err(|e: $crate::BufferError| -> $target { e.into() })
    };
    // One-arg form: defaults to std::io::Error (unambiguous, no overlapping impls)
    ($expr:expr) => {
        $expr.map_err(|e: $crate::BufferError| -> std::io::Error { e.into() })
    };
}

/// Try a buffer operation with automatic error conversion
#[macro_export]
macro_rules! buffer_try {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(e) => return Err(e.into()),
        }
    };
}
