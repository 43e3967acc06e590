// src/buffer/text.rs
//! Text-mode formatting, scanning and pretty-print indentation
//!
//! In text mode the typed operations of `binary.rs` delegate here:
//! numbers are written as ASCII and scanned back with leading-whitespace
//! skipping. A scan that cannot produce a value is a grammar error, not a
//! buffer fault: the read cursor is restored to where it was before the
//! scan and no sticky flag is raised, so the caller can retry with a
//! different shape.

use std::fmt;

use crate::buffer::core::Buffer;
use crate::error::{BufferError, ErrorFlags, Result};

impl Buffer {
    // ------------------------------------------------------------------
    // Pretty-print indentation
    // ------------------------------------------------------------------

    /// Increases the indentation depth applied after each line feed.
    pub fn push_tab(&mut self) {
        self.tab += 1;
    }

    /// Decreases the indentation depth, flooring at zero.
    pub fn pop_tab(&mut self) {
        self.tab = self.tab.saturating_sub(1);
    }

    /// Enables or disables automatic indentation without losing the
    /// current depth.
    pub fn enable_tabs(&mut self, enable: bool) {
        self.auto_tabs = enable;
    }

    /// True when the byte just behind the write cursor is a line feed,
    /// meaning the next text put starts a fresh line.
    pub(crate) fn was_last_character_lf(&self) -> bool {
        let at = self.put_index();
        if at == 0 || at > self.storage.capacity() {
            return false;
        }
        self.storage.base()[at - 1] == b'\n'
    }

    /// Writes the current indentation as tab characters. A no-op while
    /// auto-tabs are disabled.
    pub(crate) fn put_tabs(&mut self) -> Result<()> {
        let count = if self.auto_tabs { self.tab } else { 0 };
        for _ in 0..count {
            self.put_scalar_bin(b'\t')?;
        }
        Ok(())
    }

    /// Writes text verbatim, inserting indentation at the start of each
    /// fresh line.
    pub(crate) fn put_text(&mut self, s: &[u8]) -> Result<()> {
        if s.is_empty() {
            return Ok(());
        }
        if self.was_last_character_lf() {
            self.put_tabs()?;
        }
        let mut rest = s;
        while let Some(nl) = rest.iter().position(|&b| b == b'\n') {
            self.put_bytes(&rest[..=nl])?;
            rest = &rest[nl + 1..];
            if !rest.is_empty() {
                self.put_tabs()?;
            }
        }
        if !rest.is_empty() {
            self.put_bytes(rest)?;
        }
        Ok(())
    }

    /// Formats a value with its `Display` impl and writes it as text.
    pub(crate) fn put_text_display<T: fmt::Display>(&mut self, val: T) -> Result<()> {
        let s = val.to_string();
        self.put_text(s.as_bytes())
    }

    // ------------------------------------------------------------------
    // Whitespace and comments
    // ------------------------------------------------------------------

    /// Advances the read cursor past ASCII whitespace. Returns whether
    /// any unread data remains afterwards. Never faults.
    pub fn eat_white_space(&mut self) -> bool {
        while let Some(b) = self.peek_byte(0) {
            if !b.is_ascii_whitespace() {
                break;
            }
            self.get += 1;
        }
        self.bytes_remaining() > 0
    }

    /// Skips a comment the read cursor is sitting on: `//` through its
    /// line feed, or `/*` through the matching `*/` (an unterminated
    /// block comment eats the rest of the data). Returns whether a
    /// comment was eaten.
    pub fn eat_cpp_comment(&mut self) -> bool {
        if self.peek_byte(0) != Some(b'/') {
            return false;
        }
        match self.peek_byte(1) {
            Some(b'/') => {
                self.get += 2;
                while let Some(b) = self.peek_byte(0) {
                    self.get += 1;
                    if b == b'\n' {
                        break;
                    }
                }
                true
            }
            Some(b'*') => {
                self.get += 2;
                while let Some(b) = self.peek_byte(0) {
                    self.get += 1;
                    if b == b'*' && self.peek_byte(0) == Some(b'/') {
                        self.get += 1;
                        break;
                    }
                }
                true
            }
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Scanning
    // ------------------------------------------------------------------

    /// Shared scan entry: refuses to scan through a sticky read fault,
    /// then skips leading whitespace. Returns the pre-skip cursor so a
    /// failed scan can restore it.
    fn scan_start(&mut self) -> Result<usize> {
        if self.error.contains(ErrorFlags::GET_UNDERFLOW) {
            return Err(BufferError::GetUnderflow);
        }
        let start = self.get;
        self.eat_white_space();
        Ok(start)
    }

    pub(crate) fn scan_signed(&mut self) -> Result<i64> {
        let start = self.scan_start()?;
        let parsed = {
            let text = self.unread();
            let mut i = 0;
            if matches!(text.first(), Some(b'+' | b'-')) {
                i = 1;
            }
            let digits = i;
            while i < text.len() && text[i].is_ascii_digit() {
                i += 1;
            }
            if i == digits {
                None
            } else {
                // The slice is pure ASCII sign and digits.
                std::str::from_utf8(&text[..i])
                    .ok()
                    .and_then(|s| s.parse::<i64>().ok())
                    .map(|v| (v, i))
            }
        };
        match parsed {
            Some((val, consumed)) => {
                self.get += consumed;
                Ok(val)
            }
            None => {
                self.get = start;
                Err(BufferError::MalformedNumber)
            }
        }
    }

    pub(crate) fn scan_unsigned(&mut self) -> Result<u64> {
        let start = self.scan_start()?;
        let parsed = {
            let text = self.unread();
            let mut i = 0;
            if text.first() == Some(&b'+') {
                i = 1;
            }
            let digits = i;
            while i < text.len() && text[i].is_ascii_digit() {
                i += 1;
            }
            if i == digits {
                None
            } else {
                std::str::from_utf8(&text[..i])
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .map(|v| (v, i))
            }
        };
        match parsed {
            Some((val, consumed)) => {
                self.get += consumed;
                Ok(val)
            }
            None => {
                self.get = start;
                Err(BufferError::MalformedNumber)
            }
        }
    }

    /// Scans a signed decimal and narrows it to the target type,
    /// restoring the cursor and failing when the value is out of range.
    pub(crate) fn scan_signed_as<T: TryFrom<i64>>(&mut self) -> Result<T> {
        let start = self.get;
        let v = self.scan_signed()?;
        T::try_from(v).map_err(|_| {
            self.get = start;
            BufferError::MalformedNumber
        })
    }

    /// Scans an unsigned decimal and narrows it to the target type,
    /// restoring the cursor and failing when the value is out of range.
    pub(crate) fn scan_unsigned_as<T: TryFrom<u64>>(&mut self) -> Result<T> {
        let start = self.get;
        let v = self.scan_unsigned()?;
        T::try_from(v).map_err(|_| {
            self.get = start;
            BufferError::MalformedNumber
        })
    }

    /// Scans a hexadecimal integer, with or without a `0x` prefix.
    pub(crate) fn scan_hex(&mut self) -> Result<u32> {
        let start = self.scan_start()?;
        let parsed = {
            let text = self.unread();
            let mut i = 0;
            if text.len() >= 2 && text[0] == b'0' && (text[1] == b'x' || text[1] == b'X') {
                i = 2;
            }
            let digits = i;
            while i < text.len() && text[i].is_ascii_hexdigit() {
                i += 1;
            }
            if i == digits {
                None
            } else {
                std::str::from_utf8(&text[digits..i])
                    .ok()
                    .and_then(|s| u32::from_str_radix(s, 16).ok())
                    .map(|v| (v, i))
            }
        };
        match parsed {
            Some((val, consumed)) => {
                self.get += consumed;
                Ok(val)
            }
            None => {
                self.get = start;
                Err(BufferError::MalformedNumber)
            }
        }
    }

    /// Scans a decimal floating-point number with an optional fraction
    /// and exponent.
    pub(crate) fn scan_float(&mut self) -> Result<f64> {
        let start = self.scan_start()?;
        let parsed = {
            let text = self.unread();
            let mut i = 0;
            if matches!(text.first(), Some(b'+' | b'-')) {
                i = 1;
            }
            let int_start = i;
            while i < text.len() && text[i].is_ascii_digit() {
                i += 1;
            }
            let has_int = i > int_start;
            let mut has_frac = false;
            if text.get(i) == Some(&b'.') {
                let frac_start = i + 1;
                let mut j = frac_start;
                while j < text.len() && text[j].is_ascii_digit() {
                    j += 1;
                }
                if j > frac_start || has_int {
                    has_frac = j > frac_start;
                    i = j;
                }
            }
            if !has_int && !has_frac {
                None
            } else {
                // Take an exponent only when digits actually follow it.
                if matches!(text.get(i), Some(b'e' | b'E')) {
                    let mut j = i + 1;
                    if matches!(text.get(j), Some(b'+' | b'-')) {
                        j += 1;
                    }
                    let exp_start = j;
                    while j < text.len() && text[j].is_ascii_digit() {
                        j += 1;
                    }
                    if j > exp_start {
                        i = j;
                    }
                }
                std::str::from_utf8(&text[..i])
                    .ok()
                    .and_then(|s| s.parse::<f64>().ok())
                    .map(|v| (v, i))
            }
        };
        match parsed {
            Some((val, consumed)) => {
                self.get += consumed;
                Ok(val)
            }
            None => {
                self.get = start;
                Err(BufferError::MalformedNumber)
            }
        }
    }
}

/// `write!` support for text buffers; formatting failures surface as
/// `fmt::Error` since the trait cannot carry a [`BufferError`].
impl fmt::Write for Buffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.put_text(s.as_bytes()).map_err(|_| fmt::Error)
    }
}
