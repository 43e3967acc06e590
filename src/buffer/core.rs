// src/buffer/core.rs
//! Core buffer structure: cursors, flags, capacity and seek plumbing
//!
//! This module provides the fundamental [`Buffer`] type: a contiguous
//! memory region with independent read and write cursors, a high-water
//! mark bounding valid content, a sticky fault state, and the mode flags
//! that select binary or text encoding.

use crate::error::{BufferError, ErrorFlags, Result};
use crate::storage::{Growth, Storage};
use crate::swap::ByteSwapper;

/// How put and get encode values: raw bytes or ASCII text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferMode {
    /// Typed operations move raw (possibly byte-swapped) scalar images.
    #[default]
    Binary,
    /// Typed operations format and scan ASCII representations.
    Text,
}

/// Origin for [`Buffer::seek_get`] and [`Buffer::seek_put`].
///
/// `Tail` offsets count backwards from the high-water mark (the most ever
/// written), not from the allocated capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekType {
    /// Absolute position from the start of the buffer
    Head,
    /// Relative to the current cursor
    Current,
    /// Counting back from the high-water mark
    Tail,
}

/// Construction-time configuration for a [`Buffer`].
///
/// The growth policy is the overflow strategy: a `Growth::Fixed` buffer
/// faults when a put runs out of room, a growable one reallocates.
#[derive(Debug, Clone, Copy)]
pub struct BufferOptions {
    /// Binary or text encoding
    pub mode: BufferMode,
    /// Fixed or growable capacity, selected once
    pub growth: Growth,
    /// Suppresses writes (and automatic null termination)
    pub read_only: bool,
    /// Text buffers only: content uses `\r\n` line endings
    pub contains_crlf: bool,
    /// Enables pretty-print indentation after line feeds in text mode
    pub auto_tabs: bool,
}

impl Default for BufferOptions {
    fn default() -> Self {
        Self {
            mode: BufferMode::Binary,
            growth: Growth::growable(),
            read_only: false,
            contains_crlf: false,
            auto_tabs: true,
        }
    }
}

impl BufferOptions {
    /// Text-mode options with everything else defaulted.
    pub fn text() -> Self {
        Self {
            mode: BufferMode::Text,
            ..Self::default()
        }
    }
}

/// A cursor-based serialization buffer.
///
/// Put operations append encoded bytes at the write cursor, growing
/// storage when the growth policy allows and recording a sticky
/// [`ErrorFlags::PUT_OVERFLOW`] fault when it does not. Get operations
/// decode bytes at the read cursor, faulting with
/// [`ErrorFlags::GET_UNDERFLOW`] when insufficient data remains; once
/// faulted, every further get short-circuits until [`clear`](Self::clear).
///
/// Binary buffers maintain a null terminator just past the write cursor
/// so their contents are always safe to hand to C-string-style consumers.
///
/// # Examples
///
/// ```
/// use serbuf::{Buffer, SeekType};
///
/// let mut buf = Buffer::new(64);
/// buf.put_u32(0xDEAD_BEEF)?;
/// buf.put_f32(3.5)?;
///
/// buf.seek_get(SeekType::Head, 0)?;
/// assert_eq!(buf.get_u32()?, 0xDEAD_BEEF);
/// assert_eq!(buf.get_f32()?, 3.5);
/// # Ok::<(), serbuf::BufferError>(())
/// ```
#[derive(Debug)]
pub struct Buffer {
    pub(crate) storage: Storage,
    pub(crate) get: usize,
    pub(crate) put: usize,
    /// Greatest write-cursor position ever reached; bounds valid reads.
    pub(crate) max_put: usize,
    /// Offset subtracted from absolute positions when storage is a
    /// window over a larger stream. Nothing in this crate sets it
    /// non-zero yet; a streaming layer feeding windows of a larger
    /// source would.
    pub(crate) window: usize,
    pub(crate) error: ErrorFlags,
    pub(crate) mode: BufferMode,
    pub(crate) read_only: bool,
    pub(crate) contains_crlf: bool,
    pub(crate) auto_tabs: bool,
    /// Pretty-print indentation depth, text mode only.
    pub(crate) tab: usize,
    pub(crate) swap: ByteSwapper,
}

impl Buffer {
    /// Creates a growable binary buffer with `init_size` bytes
    /// pre-allocated.
    pub fn new(init_size: usize) -> Self {
        Self::with_options(init_size, BufferOptions::default())
    }

    /// Creates a growable text buffer with `init_size` bytes
    /// pre-allocated.
    pub fn text(init_size: usize) -> Self {
        Self::with_options(init_size, BufferOptions::text())
    }

    /// Creates an owned buffer with explicit options.
    pub fn with_options(init_size: usize, opts: BufferOptions) -> Self {
        Self::from_storage(Storage::with_capacity(init_size, opts.growth), 0, opts)
    }

    /// Adopts caller memory without copying.
    ///
    /// The vector's full length is the capacity; `initial_put` positions
    /// the write cursor and high-water mark over already-valid content
    /// (pass `data.len()` for a fully populated region, `0` for scratch).
    /// A non-growable adoption faults rather than reallocating; a growable
    /// one transparently switches to owned memory on first growth.
    pub fn attach(data: Vec<u8>, initial_put: usize, opts: BufferOptions) -> Self {
        let initial_put = initial_put.min(data.len());
        let growable = matches!(opts.growth, Growth::Growable { .. });
        Self::from_storage(Storage::attach(data, growable), initial_put, opts)
    }

    /// Adopts a fully populated vector as a fixed binary buffer, ready
    /// for reading from the head.
    ///
    /// # Examples
    ///
    /// ```
    /// use serbuf::Buffer;
    ///
    /// let buf = Buffer::from_vec(vec![0x01, 0x02, 0x03, 0x04]);
    /// assert_eq!(buf.bytes_remaining(), 4);
    /// ```
    pub fn from_vec(data: Vec<u8>) -> Self {
        let len = data.len();
        Self::attach(
            data,
            len,
            BufferOptions {
                growth: Growth::Fixed,
                ..BufferOptions::default()
            },
        )
    }

    /// Copies `text` into a fixed text buffer positioned for parsing.
    pub fn text_from_str(text: &str) -> Self {
        let data = text.as_bytes().to_vec();
        let len = data.len();
        Self::attach(
            data,
            len,
            BufferOptions {
                mode: BufferMode::Text,
                growth: Growth::Fixed,
                contains_crlf: text.contains("\r\n"),
                ..BufferOptions::default()
            },
        )
    }

    fn from_storage(storage: Storage, initial_put: usize, opts: BufferOptions) -> Self {
        Self {
            storage,
            get: 0,
            put: initial_put,
            max_put: initial_put,
            window: 0,
            error: ErrorFlags::empty(),
            mode: opts.mode,
            read_only: opts.read_only,
            contains_crlf: opts.contains_crlf,
            auto_tabs: opts.auto_tabs,
            tab: 0,
            swap: ByteSwapper::new(),
        }
    }

    /// Consumes the buffer and returns the backing vector.
    pub fn into_inner(self) -> Vec<u8> {
        self.storage.into_inner()
    }

    // ------------------------------------------------------------------
    // Cursor and state accessors
    // ------------------------------------------------------------------

    /// Current read cursor.
    #[inline(always)]
    pub fn tell_get(&self) -> usize {
        self.get
    }

    /// Current write cursor.
    #[inline(always)]
    pub fn tell_put(&self) -> usize {
        self.put
    }

    /// The most ever written: the high-water mark bounding valid reads.
    #[inline(always)]
    pub fn tell_max_put(&self) -> usize {
        self.max_put
    }

    /// Bytes remaining to be read (high-water mark minus read cursor).
    #[inline(always)]
    pub fn bytes_remaining(&self) -> usize {
        self.max_put.saturating_sub(self.get)
    }

    /// Allocated capacity; does *not* reflect how much was written or
    /// read — use [`tell_put`](Self::tell_put) /
    /// [`tell_get`](Self::tell_get) for that.
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.storage.capacity()
    }

    /// The raw storage region, including bytes past the high-water mark.
    #[inline(always)]
    pub fn base(&self) -> &[u8] {
        self.storage.base()
    }

    /// The valid written region, up to the high-water mark.
    #[inline(always)]
    pub fn data(&self) -> &[u8] {
        &self.storage.base()[..self.max_put - self.window]
    }

    /// Offset subtracted from absolute cursor positions when the storage
    /// is a sliding window over a larger external stream. Always zero
    /// today: the offset is reserved for a streaming layer, and no
    /// constructor in this crate produces a windowed buffer.
    #[inline(always)]
    pub fn window_base(&self) -> usize {
        self.window
    }

    /// Am I a text buffer?
    #[inline(always)]
    pub fn is_text(&self) -> bool {
        self.mode == BufferMode::Text
    }

    /// Can I grow when a put overflows?
    #[inline(always)]
    pub fn is_growable(&self) -> bool {
        self.storage.is_growable()
    }

    /// Was my memory adopted from the caller (and not yet regrown)?
    #[inline(always)]
    pub fn is_externally_allocated(&self) -> bool {
        self.storage.is_external()
    }

    /// Am I read-only?
    #[inline(always)]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Text buffers only: does the content use `\r\n` line endings?
    #[inline(always)]
    pub fn contains_crlf(&self) -> bool {
        self.is_text() && self.contains_crlf
    }

    /// Am I valid? `false` once any overflow or underflow fault has
    /// occurred; stays `false` until [`clear`](Self::clear).
    #[inline(always)]
    pub fn is_valid(&self) -> bool {
        self.error.is_empty()
    }

    /// The sticky fault flags.
    #[inline(always)]
    pub fn error_flags(&self) -> ErrorFlags {
        self.error
    }

    /// Recasts the buffer's encoding flags. The meaningful conversion is
    /// binary to text (with a truthful `contains_crlf`) after filling a
    /// buffer with raw file contents.
    pub fn set_buffer_type(&mut self, is_text: bool, contains_crlf: bool) {
        self.mode = if is_text {
            BufferMode::Text
        } else {
            BufferMode::Binary
        };
        self.contains_crlf = contains_crlf;
    }

    // ------------------------------------------------------------------
    // Byte order
    // ------------------------------------------------------------------

    /// Controls the endianness of binary scalar encoding; the default
    /// matches the current platform.
    pub fn set_big_endian(&mut self, big_endian: bool) {
        self.swap.set_target_big_endian(big_endian);
    }

    /// Is the binary encoding target big endian?
    pub fn is_big_endian(&self) -> bool {
        self.swap.is_target_big_endian()
    }

    /// Forces byte swapping on or off regardless of platform.
    pub fn activate_byte_swapping(&mut self, activate: bool) {
        self.swap.activate_byte_swapping(activate);
    }

    /// Are binary scalars being byte-swapped?
    pub fn is_swapping_bytes(&self) -> bool {
        self.swap.is_swapping_bytes()
    }

    // ------------------------------------------------------------------
    // Reset
    // ------------------------------------------------------------------

    /// Resets cursors, high-water mark and fault flags without freeing
    /// memory.
    pub fn clear(&mut self) {
        self.get = 0;
        self.put = 0;
        self.max_put = 0;
        self.window = 0;
        self.error.clear();
        if !self.read_only && self.storage.capacity() > 0 {
            self.storage.base_mut()[0] = 0;
        }
    }

    /// Clears out the buffer and securely releases its memory.
    pub fn purge(&mut self) {
        self.get = 0;
        self.put = 0;
        self.max_put = 0;
        self.window = 0;
        self.error.clear();
        self.storage.purge();
    }

    // ------------------------------------------------------------------
    // Seeks
    // ------------------------------------------------------------------

    /// Moves the read cursor. `Tail` counts back from the high-water
    /// mark.
    ///
    /// # Errors
    ///
    /// An out-of-range target sets the sticky
    /// [`GET_UNDERFLOW`](ErrorFlags::GET_UNDERFLOW) fault and returns
    /// [`BufferError::GetUnderflow`].
    pub fn seek_get(&mut self, seek: SeekType, offset: isize) -> Result<()> {
        let target = match seek {
            SeekType::Head => offset,
            SeekType::Current => self.get as isize + offset,
            SeekType::Tail => self.max_put as isize - offset,
        };
        if target < 0 || target as usize > self.max_put {
            self.error.insert(ErrorFlags::GET_UNDERFLOW);
            return Err(BufferError::GetUnderflow);
        }
        self.get = target as usize;
        Ok(())
    }

    /// Moves the write cursor. `Tail` counts back from the high-water
    /// mark (not the allocated capacity).
    ///
    /// # Errors
    ///
    /// A target outside a fixed buffer's capacity sets the sticky
    /// [`PUT_OVERFLOW`](ErrorFlags::PUT_OVERFLOW) fault and returns
    /// [`BufferError::PutOverflow`].
    pub fn seek_put(&mut self, seek: SeekType, offset: isize) -> Result<()> {
        let target = match seek {
            SeekType::Head => offset,
            SeekType::Current => self.put as isize + offset,
            SeekType::Tail => self.max_put as isize - offset,
        };
        if target < 0 {
            self.error.insert(ErrorFlags::PUT_OVERFLOW);
            return Err(BufferError::PutOverflow);
        }
        let target = target as usize;
        if !self.storage.is_growable()
            && target > self.storage.capacity() + self.window
        {
            self.error.insert(ErrorFlags::PUT_OVERFLOW);
            return Err(BufferError::PutOverflow);
        }
        self.put = target;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Capacity plumbing (shared by the binary and text paths)
    // ------------------------------------------------------------------

    /// Makes sure we've got at least `num` bytes of capacity.
    ///
    /// # Errors
    ///
    /// [`BufferError::PutOverflow`] (without a sticky fault) when the
    /// buffer cannot grow.
    pub fn ensure_capacity(&mut self, num: usize) -> Result<()> {
        self.storage.ensure_capacity(num)
    }

    /// Checks whether a put of `size` bytes is ok, growing if allowed.
    /// On an unsatisfiable shortfall the sticky put fault is set and the
    /// write must be dropped.
    pub(crate) fn check_put(&mut self, size: usize) -> Result<()> {
        if self.error.contains(ErrorFlags::PUT_OVERFLOW) {
            return Err(BufferError::PutOverflow);
        }
        if self.read_only {
            return Err(BufferError::ReadOnlyBuffer);
        }
        let needed = self.put - self.window + size;
        if needed > self.storage.capacity() && self.storage.ensure_capacity(needed).is_err() {
            self.error.insert(ErrorFlags::PUT_OVERFLOW);
            return Err(BufferError::PutOverflow);
        }
        Ok(())
    }

    /// Checks whether a get of `size` bytes is ok against the high-water
    /// mark; sets the sticky get fault on shortfall.
    pub(crate) fn check_get(&mut self, size: usize) -> Result<()> {
        if self.error.contains(ErrorFlags::GET_UNDERFLOW) {
            return Err(BufferError::GetUnderflow);
        }
        if self.get + size > self.max_put {
            self.error.insert(ErrorFlags::GET_UNDERFLOW);
            return Err(BufferError::GetUnderflow);
        }
        Ok(())
    }

    /// Keeps the buffer treatable as a null-terminated region: after the
    /// write cursor passes the old high-water mark, writes a terminator
    /// byte past the cursor without advancing it. The terminator is
    /// capacity-checked; if it alone does not fit a fixed buffer it is
    /// skipped without faulting, so exact-capacity writes stay valid.
    pub(crate) fn add_null_termination(&mut self) {
        if self.put <= self.max_put {
            return;
        }
        if !self.read_only && !self.error.contains(ErrorFlags::PUT_OVERFLOW) {
            let at = self.put - self.window;
            if at < self.storage.capacity() || self.storage.ensure_capacity(at + 1).is_ok() {
                self.storage.base_mut()[at] = 0;
            }
        }
        self.max_put = self.put;
    }

    /// Absolute-to-storage translation for the write cursor.
    #[inline(always)]
    pub(crate) fn put_index(&self) -> usize {
        self.put - self.window
    }

    /// Absolute-to-storage translation for the read cursor.
    #[inline(always)]
    pub(crate) fn get_index(&self) -> usize {
        self.get - self.window
    }

    /// Non-faulting peek at the byte `offset` past the read cursor.
    pub(crate) fn peek_byte(&self, offset: usize) -> Option<u8> {
        let pos = self.get + offset;
        if pos < self.max_put {
            Some(self.storage.base()[pos - self.window])
        } else {
            None
        }
    }

    /// The unread region between the read cursor and the high-water mark.
    pub(crate) fn unread(&self) -> &[u8] {
        &self.storage.base()[self.get_index()..self.max_put - self.window]
    }

    /// Peeks `len` bytes at `offset` past the read cursor without moving
    /// it or faulting.
    ///
    /// # Errors
    ///
    /// [`BufferError::GetUnderflow`] (no sticky fault) when fewer than
    /// `len` bytes remain.
    pub fn peek_get(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let start = self.get + offset;
        if start + len > self.max_put {
            return Err(BufferError::GetUnderflow);
        }
        let at = start - self.window;
        Ok(&self.storage.base()[at..at + len])
    }

    /// Reserves and exposes `len` writable bytes at the write cursor
    /// without advancing it; pair with [`seek_put`](Self::seek_put) to
    /// commit. Grows a growable buffer as needed.
    pub fn peek_put_mut(&mut self, len: usize) -> Result<&mut [u8]> {
        self.check_put(len)?;
        let at = self.put_index();
        Ok(&mut self.storage.base_mut()[at..at + len])
    }
}
