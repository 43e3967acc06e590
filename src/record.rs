// src/record.rs
//! Field-layout descriptors for fixed-layout records
//!
//! A [`RecordLayout`] is an explicit, statically declared list of
//! `(offset, kind, count)` descriptors for one fixed-layout record. It is
//! consumed by [`ByteSwapper::swap_record`](crate::ByteSwapper::swap_record)
//! and by [`Buffer::put_record`](crate::Buffer::put_record) /
//! [`Buffer::get_record`](crate::Buffer::get_record) so whole structures
//! can be byte-swapped member-wise rather than as an undifferentiated blob
//! (a struct's in-memory image is not simply its reversed byte image —
//! padding and multi-field structs must be swapped field by field).
//!
//! Layouts are authored by hand with the builder methods; nothing here
//! inspects real memory layouts.
//!
//! # Examples
//!
//! ```
//! use serbuf::{FieldKind, RecordLayout};
//!
//! // struct Header { magic: u32, version: u16, flags: u16, scale: f32 }
//! let layout = RecordLayout::new(12)
//!     .field(0, FieldKind::U32)
//!     .field(4, FieldKind::U16)
//!     .field(6, FieldKind::U16)
//!     .field(8, FieldKind::F32);
//! assert!(layout.validate().is_ok());
//! ```

use crate::error::{BufferError, Result};

/// Primitive kind of a single record field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Unsigned byte (never swapped)
    U8,
    /// Signed byte (never swapped)
    I8,
    /// Unsigned 16-bit integer
    U16,
    /// Signed 16-bit integer
    I16,
    /// Unsigned 32-bit integer
    U32,
    /// Signed 32-bit integer
    I32,
    /// Unsigned 64-bit integer
    U64,
    /// Signed 64-bit integer
    I64,
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
    /// Nested fixed-layout sub-record, swapped member-wise
    Record(Box<RecordLayout>),
}

impl FieldKind {
    /// Size in bytes of one element of this kind.
    pub fn size(&self) -> usize {
        match self {
            FieldKind::U8 | FieldKind::I8 => 1,
            FieldKind::U16 | FieldKind::I16 => 2,
            FieldKind::U32 | FieldKind::I32 | FieldKind::F32 => 4,
            FieldKind::U64 | FieldKind::I64 | FieldKind::F64 => 8,
            FieldKind::Record(layout) => layout.size,
        }
    }
}

/// One field of a record: byte offset, primitive kind, element count.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDesc {
    /// Byte offset of the field within the record image
    pub offset: usize,
    /// Primitive kind of each element
    pub kind: FieldKind,
    /// Number of contiguous elements (1 for scalars)
    pub count: usize,
}

impl FieldDesc {
    /// Total byte span of the field.
    pub fn byte_len(&self) -> usize {
        self.kind.size() * self.count
    }
}

/// Ordered field descriptors for one fixed-layout record type.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordLayout {
    /// Total record size in bytes, including any padding
    pub size: usize,
    /// Fields in declaration order
    pub fields: Vec<FieldDesc>,
}

impl RecordLayout {
    /// Creates an empty layout for a record of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            fields: Vec::new(),
        }
    }

    /// Adds a scalar field at `offset`.
    pub fn field(self, offset: usize, kind: FieldKind) -> Self {
        self.array(offset, kind, 1)
    }

    /// Adds an array field of `count` elements at `offset`.
    pub fn array(mut self, offset: usize, kind: FieldKind, count: usize) -> Self {
        self.fields.push(FieldDesc {
            offset,
            kind,
            count,
        });
        self
    }

    /// Checks that every field (recursively) lies within the record bounds.
    ///
    /// # Errors
    ///
    /// [`BufferError::LayoutMismatch`] naming the record size and the first
    /// offending field's end offset.
    pub fn validate(&self) -> Result<()> {
        for f in &self.fields {
            let end = f.offset + f.byte_len();
            if end > self.size {
                return Err(BufferError::LayoutMismatch {
                    expected: self.size,
                    actual: end,
                });
            }
            if let FieldKind::Record(sub) = &f.kind {
                sub.validate()?;
            }
        }
        Ok(())
    }
}
