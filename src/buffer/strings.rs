// src/buffer/strings.rs
//! String I/O: null-terminated strings, delimited (escaped) strings, and
//! token parsing
//!
//! Binary buffers store strings with a terminating nul; text buffers
//! store bare words separated by whitespace, with optional delimiter
//! quoting and escape conversion through a
//! [`CharConversion`](crate::CharConversion) table. Token parsing is
//! transactional: a failed match leaves the read cursor exactly where it
//! was.

use crate::buffer::core::Buffer;
use crate::convert::{CharConversion, CharacterSet};
use crate::error::{BufferError, ErrorFlags, Result};

impl Buffer {
    // ------------------------------------------------------------------
    // Plain strings
    // ------------------------------------------------------------------

    /// Writes a string: bytes plus a terminating nul in binary mode,
    /// verbatim (with indentation, no terminator) in text mode.
    pub fn put_string(&mut self, s: &[u8]) -> Result<()> {
        if self.is_text() {
            return self.put_text(s);
        }
        self.put_bytes(s)?;
        self.put_scalar_bin(0u8)
    }

    /// Reads a string: up to and excluding the nul terminator in binary
    /// mode (the terminator is consumed), the next whitespace-separated
    /// word in text mode.
    ///
    /// # Errors
    ///
    /// [`BufferError::GetUnderflow`] (sticky) when no string data
    /// remains.
    pub fn get_string(&mut self) -> Result<Vec<u8>> {
        let len = self.peek_string_len();
        if len == 0 {
            self.error.insert(ErrorFlags::GET_UNDERFLOW);
            return Err(BufferError::GetUnderflow);
        }
        if self.is_text() {
            self.eat_white_space();
            let word = self.unread()[..len - 1].to_vec();
            self.get += len - 1;
            Ok(word)
        } else {
            let s = self.unread()[..len - 1].to_vec();
            // Consume the terminator too, unless the data ran out first.
            self.get += len.min(self.bytes_remaining());
            Ok(s)
        }
    }

    /// Length the next string needs including its terminator slot, without
    /// moving the read cursor. Binary mode counts to the nul (or to the
    /// end of valid data); text mode counts the next word after
    /// whitespace. Returns 0 when no string data remains or the buffer
    /// has a sticky read fault.
    pub fn peek_string_len(&self) -> usize {
        if self.error.contains(ErrorFlags::GET_UNDERFLOW) {
            return 0;
        }
        if self.is_text() {
            let mut off = 0;
            while let Some(b) = self.peek_byte(off) {
                if !b.is_ascii_whitespace() {
                    break;
                }
                off += 1;
            }
            let mut len = 0;
            while let Some(b) = self.peek_byte(off + len) {
                if b.is_ascii_whitespace() {
                    break;
                }
                len += 1;
            }
            if len == 0 { 0 } else { len + 1 }
        } else {
            let unread = self.unread();
            if unread.is_empty() {
                return 0;
            }
            match unread.iter().position(|&b| b == 0) {
                Some(i) => i + 1,
                // Unterminated tail: the remainder is the string.
                None => unread.len() + 1,
            }
        }
    }

    // ------------------------------------------------------------------
    // Delimited strings
    // ------------------------------------------------------------------

    /// Writes a string wrapped in the table's delimiter with its special
    /// characters escaped. Binary mode falls through to
    /// [`put_string`](Self::put_string).
    pub fn put_delimited_string(&mut self, conv: &CharConversion, s: &[u8]) -> Result<()> {
        if !self.is_text() {
            return self.put_string(s);
        }
        if self.was_last_character_lf() {
            self.put_tabs()?;
        }
        let mut encoded = Vec::with_capacity(s.len() + 2);
        encoded.push(conv.delimiter());
        for &b in s {
            match conv.find_conversion(b) {
                Some(replacement) => {
                    encoded.push(conv.escape_char());
                    encoded.extend_from_slice(replacement.as_bytes());
                }
                None => encoded.push(b),
            }
        }
        encoded.push(conv.delimiter());
        self.put_bytes(&encoded)
    }

    /// Reads a delimiter-wrapped string, undoing escape conversions.
    /// Binary mode falls through to [`get_string`](Self::get_string).
    ///
    /// # Errors
    ///
    /// [`BufferError::DelimiterMismatch`] when the opening or closing
    /// delimiter is missing; the read cursor is left untouched.
    pub fn get_delimited_string(&mut self, conv: &CharConversion) -> Result<Vec<u8>> {
        if !self.is_text() {
            return self.get_string();
        }
        let saved = self.get;
        self.eat_white_space();
        if self.peek_byte(0) != Some(conv.delimiter()) {
            self.get = saved;
            return Err(BufferError::DelimiterMismatch);
        }
        self.get += 1;
        let mut out = Vec::new();
        loop {
            let Some(b) = self.peek_byte(0) else {
                self.get = saved;
                return Err(BufferError::DelimiterMismatch);
            };
            self.get += 1;
            if b == conv.delimiter() {
                return Ok(out);
            }
            if b == conv.escape_char() {
                let tail = self.unread().to_vec();
                let Some((decoded, consumed)) = conv.find_escape(&tail) else {
                    self.get = saved;
                    return Err(BufferError::DelimiterMismatch);
                };
                out.push(decoded);
                self.get += consumed;
            } else {
                out.push(b);
            }
        }
    }

    /// Writes one character with escape conversion applied (no
    /// delimiters). Binary mode writes the raw character.
    pub fn put_delimited_char(&mut self, conv: &CharConversion, c: u8) -> Result<()> {
        if !self.is_text() {
            return self.put_char(c);
        }
        match conv.find_conversion(c) {
            Some(replacement) => {
                let mut encoded = Vec::with_capacity(1 + replacement.len());
                encoded.push(conv.escape_char());
                encoded.extend_from_slice(replacement.as_bytes());
                self.put_bytes(&encoded)
            }
            None => self.put_char(c),
        }
    }

    /// Reads one possibly-escaped character. Binary mode reads the raw
    /// character.
    ///
    /// # Errors
    ///
    /// [`BufferError::DelimiterMismatch`] when the escape character is
    /// not followed by a recognized replacement; the read cursor is left
    /// untouched.
    pub fn get_delimited_char(&mut self, conv: &CharConversion) -> Result<u8> {
        if !self.is_text() {
            return self.get_char();
        }
        let saved = self.get;
        let c = self.get_char()?;
        if c != conv.escape_char() {
            return Ok(c);
        }
        let tail = self.unread().to_vec();
        let Some((decoded, consumed)) = conv.find_escape(&tail) else {
            self.get = saved;
            return Err(BufferError::DelimiterMismatch);
        };
        self.get += consumed;
        Ok(decoded)
    }

    /// Length needed for the next delimited string without moving the
    /// read cursor: the decoded character count plus a terminator slot
    /// when `actual_size` is set, the on-wire byte count (delimiters and
    /// escapes included) otherwise. Returns 0 when no properly delimited
    /// string is next.
    pub fn peek_delimited_string_len(&self, conv: &CharConversion, actual_size: bool) -> usize {
        if !self.is_text() {
            return self.peek_string_len();
        }
        let mut off = 0;
        while let Some(b) = self.peek_byte(off) {
            if !b.is_ascii_whitespace() {
                break;
            }
            off += 1;
        }
        if self.peek_byte(off) != Some(conv.delimiter()) {
            return 0;
        }
        let start = off;
        off += 1;
        let mut decoded = 0;
        loop {
            let Some(b) = self.peek_byte(off) else {
                return 0;
            };
            off += 1;
            if b == conv.delimiter() {
                break;
            }
            decoded += 1;
            if b == conv.escape_char() {
                let tail_start = self.get + off;
                let tail = &self.unread()[tail_start - self.get..];
                let Some((_, consumed)) = conv.find_escape(tail) else {
                    return 0;
                };
                off += consumed;
            }
        }
        if actual_size { decoded + 1 } else { off - start }
    }

    // ------------------------------------------------------------------
    // Token parsing
    // ------------------------------------------------------------------

    /// Offset past the read cursor where `needle` next occurs, compared
    /// ASCII case-insensitively.
    fn find_nocase(&self, needle: &[u8]) -> Option<usize> {
        let hay = self.unread();
        if needle.is_empty() || needle.len() > hay.len() {
            return None;
        }
        hay.windows(needle.len())
            .position(|w| w.eq_ignore_ascii_case(needle))
    }

    /// Searches forward for `token` (ASCII case-insensitive) and advances
    /// the read cursor past it.
    ///
    /// # Errors
    ///
    /// [`BufferError::TokenMismatch`] when the token does not occur; the
    /// read cursor is left untouched.
    pub fn get_token(&mut self, token: &str) -> Result<()> {
        match self.find_nocase(token.as_bytes()) {
            Some(off) => {
                self.get += off + token.len();
                Ok(())
            }
            None => Err(BufferError::TokenMismatch),
        }
    }

    /// Extracts the text between `start_delim` and the following
    /// `end_delim` (both matched ASCII case-insensitively), trimmed of
    /// surrounding whitespace and truncated to `max_len` bytes. The
    /// start delimiter must be the first thing after leading whitespace;
    /// on success the read cursor lands just past the ending delimiter.
    ///
    /// # Errors
    ///
    /// [`BufferError::TokenMismatch`] when the start delimiter is not
    /// next or the ending delimiter never follows; the read cursor is
    /// left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use serbuf::Buffer;
    ///
    /// let mut buf = Buffer::text_from_str("  < answer > rest");
    /// assert_eq!(buf.parse_token("<", ">", 64)?, "answer");
    /// # Ok::<(), serbuf::BufferError>(())
    /// ```
    pub fn parse_token(&mut self, start_delim: &str, end_delim: &str, max_len: usize) -> Result<String> {
        let saved = self.get;
        self.eat_white_space();
        let sd = start_delim.as_bytes();
        let unread = self.unread();
        if unread.len() < sd.len() || !unread[..sd.len()].eq_ignore_ascii_case(sd) {
            self.get = saved;
            return Err(BufferError::TokenMismatch);
        }
        self.get += sd.len();
        let Some(end) = self.find_nocase(end_delim.as_bytes()) else {
            self.get = saved;
            return Err(BufferError::TokenMismatch);
        };
        let raw = &self.unread()[..end];
        let trimmed = raw
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .map(|first| {
                let last = raw.iter().rposition(|b| !b.is_ascii_whitespace()).unwrap_or(first);
                &raw[first..=last]
            })
            .unwrap_or(&[]);
        let token = String::from_utf8_lossy(&trimmed[..trimmed.len().min(max_len)]).into_owned();
        self.get += end + end_delim.len();
        Ok(token)
    }

    /// Extracts the next whitespace-separated token, treating any
    /// character in `breaks` as a one-character token of its own. With
    /// `skip_comments` set, `//` comments are skipped like whitespace.
    /// The token is truncated to `max_len` bytes.
    ///
    /// # Errors
    ///
    /// [`BufferError::TokenMismatch`] when only whitespace (and comments)
    /// remain.
    pub fn parse_token_breaks(
        &mut self,
        breaks: &CharacterSet,
        max_len: usize,
        skip_comments: bool,
    ) -> Result<String> {
        loop {
            if !self.eat_white_space() {
                return Err(BufferError::TokenMismatch);
            }
            if skip_comments && self.eat_cpp_comment() {
                continue;
            }
            break;
        }
        let Some(first) = self.peek_byte(0) else {
            return Err(BufferError::TokenMismatch);
        };
        if breaks.contains(first) {
            self.get += 1;
            return Ok((first as char).to_string());
        }
        let mut out = Vec::new();
        while let Some(b) = self.peek_byte(0) {
            if b.is_ascii_whitespace() || breaks.contains(b) || out.len() >= max_len {
                break;
            }
            out.push(b);
            self.get += 1;
        }
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}
