// src/lib.rs
//! # serbuf
//!
//! A cursor-based serialization buffer with binary and text modes,
//! controllable byte order, and growable or caller-adopted storage.
//!
//! The central type is [`Buffer`]: a contiguous byte region with
//! independent read and write cursors and a high-water mark bounding
//! valid content. Typed operations (`put_u32`, `get_f32`, ...) encode
//! raw scalar images in binary mode and ASCII in text mode; the same
//! call sites serialize either way depending on how the buffer was
//! constructed.
//!
//! Failed operations return a [`BufferError`]; capacity faults also set
//! sticky [`ErrorFlags`] on the buffer, so a batch of writes can be
//! issued without per-call checks and validated once with
//! [`Buffer::is_valid`]. Reads after a fault yield errors rather than
//! stale data; callers that want the classic zero-on-failure contract
//! write `buf.get_u32().unwrap_or_default()`.
//!
//! ## Binary round trip
//!
//! ```
//! use serbuf::{Buffer, SeekType};
//!
//! let mut buf = Buffer::new(64);
//! buf.put_u32(0x1234_5678)?;
//! buf.put_string(b"header")?;
//!
//! buf.seek_get(SeekType::Head, 0)?;
//! assert_eq!(buf.get_u32()?, 0x1234_5678);
//! assert_eq!(buf.get_string()?, b"header");
//! # Ok::<(), serbuf::BufferError>(())
//! ```
//!
//! ## Cross-endian files
//!
//! A [`ByteSwapper`] (standalone, or embedded in every buffer) swaps
//! scalars and whole fixed-layout records between the machine's byte
//! order and a chosen target:
//!
//! ```
//! use serbuf::{Buffer, SeekType};
//!
//! let mut buf = Buffer::new(64);
//! buf.set_big_endian(true);
//! buf.put_u32(0xFACE_F00D)?;
//!
//! // A reader targeting the same order gets the value back intact.
//! buf.seek_get(SeekType::Head, 0)?;
//! assert_eq!(buf.get_u32()?, 0xFACE_F00D);
//! # Ok::<(), serbuf::BufferError>(())
//! ```
//!
//! ## Text parsing
//!
//! ```
//! use serbuf::Buffer;
//!
//! let mut buf = Buffer::text_from_str("count 3 scale 1.5");
//! buf.get_token("count")?;
//! assert_eq!(buf.get_i32()?, 3);
//! buf.get_token("scale")?;
//! assert_eq!(buf.get_f32()?, 1.5);
//! # Ok::<(), serbuf::BufferError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod buffer;
pub mod convert;
pub mod error;
pub mod record;
pub mod storage;
pub mod swap;

pub use buffer::{Buffer, BufferMode, BufferOptions, SeekType};
pub use convert::{c_string_conversion, no_escape_conversion, CharConversion, CharacterSet};
pub use error::{BufferError, ErrorFlags, Result, ResultExt};
pub use record::{FieldDesc, FieldKind, RecordLayout};
pub use storage::{Growth, Storage, DEFAULT_GROW_INCREMENT, STORAGE_MAX_SIZE};
pub use swap::{classify, reverse_into, reverse_slice, ByteSwapper, EndianClass, Scalar};

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use crate::buffer::{Buffer, BufferMode, BufferOptions, SeekType};
    pub use crate::convert::{c_string_conversion, no_escape_conversion, CharConversion};
    pub use crate::error::{BufferError, ErrorFlags, Result, ResultExt};
    pub use crate::swap::{ByteSwapper, EndianClass};
}
