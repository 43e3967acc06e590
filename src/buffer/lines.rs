// src/buffer/lines.rs
//! Line-oriented reads and CRLF normalization
//!
//! Line reads treat a line feed as the terminator and hand back the line
//! including it; the final unterminated line counts too. The borrowed
//! variants return views into the buffer's own storage, tied to the
//! `&mut self` borrow, so scanning a large text buffer line by line
//! copies nothing.

use crate::buffer::core::{Buffer, BufferMode, BufferOptions};
use crate::error::{BufferError, ErrorFlags, Result};
use crate::storage::Growth;

impl Buffer {
    /// Bytes in the next line including its line feed (or to the end of
    /// valid data for an unterminated final line). 0 when nothing
    /// remains.
    fn peek_line_length(&self) -> usize {
        if self.get > self.max_put {
            return 0;
        }
        let unread = self.unread();
        match unread.iter().position(|&b| b == b'\n') {
            Some(i) => i + 1,
            None => unread.len(),
        }
    }

    /// Reads the next line, including its line feed, as an owned copy.
    ///
    /// # Errors
    ///
    /// [`BufferError::GetUnderflow`] (sticky) at the end of valid data.
    pub fn get_line(&mut self) -> Result<Vec<u8>> {
        if self.error.contains(ErrorFlags::GET_UNDERFLOW) {
            return Err(BufferError::GetUnderflow);
        }
        let len = self.peek_line_length();
        if len == 0 {
            self.error.insert(ErrorFlags::GET_UNDERFLOW);
            return Err(BufferError::GetUnderflow);
        }
        let line = self.unread()[..len].to_vec();
        self.get += len;
        Ok(line)
    }

    /// Reads the next line as a borrowed view into the buffer, including
    /// its line feed. Returns `None` at the end of valid data without
    /// faulting, making it the natural loop condition:
    ///
    /// ```
    /// use serbuf::Buffer;
    ///
    /// let mut buf = Buffer::text_from_str("one\ntwo\n");
    /// let mut count = 0;
    /// while let Some(line) = buf.get_line_ref() {
    ///     assert!(line.ends_with(b"\n"));
    ///     count += 1;
    /// }
    /// assert_eq!(count, 2);
    /// ```
    pub fn get_line_ref(&mut self) -> Option<&[u8]> {
        let len = self.peek_line_length();
        if len == 0 {
            return None;
        }
        let at = self.get_index();
        self.get += len;
        Some(&self.storage.base()[at..at + len])
    }

    /// Like [`get_line_ref`](Self::get_line_ref) with the trailing
    /// `\r\n` or `\n` stripped.
    pub fn get_line_trimmed(&mut self) -> Option<&[u8]> {
        let line = self.get_line_ref()?;
        let line = line
            .strip_suffix(b"\r\n")
            .or_else(|| line.strip_suffix(b"\n"))
            .unwrap_or(line);
        Some(line)
    }

    /// Produces a copy of this text buffer with every `\r\n` collapsed to
    /// `\n`, cursors adjusted to address the same logical positions.
    /// Returns `None` when the buffer is not text or is not marked as
    /// containing CRLF line endings; the source is never modified.
    pub fn convert_crlf(&self) -> Option<Buffer> {
        if !self.contains_crlf() {
            return None;
        }
        let src = self.data();
        let mut out = Vec::with_capacity(src.len());
        let mut new_get = self.get;
        let mut new_put = self.put;
        let mut i = 0;
        while i < src.len() {
            if src[i] == b'\r' && src.get(i + 1) == Some(&b'\n') {
                out.push(b'\n');
                if i < self.get {
                    new_get -= 1;
                }
                if i < self.put {
                    new_put -= 1;
                }
                i += 2;
            } else {
                out.push(src[i]);
                i += 1;
            }
        }
        let len = out.len();
        let mut converted = Buffer::attach(
            out,
            len,
            BufferOptions {
                mode: BufferMode::Text,
                growth: if self.is_growable() {
                    Growth::growable()
                } else {
                    Growth::Fixed
                },
                read_only: self.read_only,
                contains_crlf: false,
                auto_tabs: self.auto_tabs,
            },
        );
        converted.get = new_get;
        converted.put = new_put;
        converted.tab = self.tab;
        converted.swap = self.swap;
        Some(converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_line_includes_terminator() {
        let mut buf = Buffer::text_from_str("first\nsecond\n");
        assert_eq!(buf.get_line().unwrap(), b"first\n");
        assert_eq!(buf.get_line().unwrap(), b"second\n");
        assert!(buf.get_line().is_err());
        assert!(!buf.is_valid());
    }

    #[test]
    fn test_final_unterminated_line() {
        let mut buf = Buffer::text_from_str("a\nno newline");
        assert_eq!(buf.get_line().unwrap(), b"a\n");
        assert_eq!(buf.get_line().unwrap(), b"no newline");
    }

    #[test]
    fn test_get_line_ref_does_not_fault_at_end() {
        let mut buf = Buffer::text_from_str("only\n");
        assert_eq!(buf.get_line_ref(), Some(&b"only\n"[..]));
        assert_eq!(buf.get_line_ref(), None);
        assert!(buf.is_valid());
    }

    #[test]
    fn test_get_line_trimmed() {
        let mut buf = Buffer::text_from_str("crlf\r\nlf\nbare");
        assert_eq!(buf.get_line_trimmed(), Some(&b"crlf"[..]));
        assert_eq!(buf.get_line_trimmed(), Some(&b"lf"[..]));
        assert_eq!(buf.get_line_trimmed(), Some(&b"bare"[..]));
        assert_eq!(buf.get_line_trimmed(), None);
    }

    #[test]
    fn test_convert_crlf() {
        let buf = Buffer::text_from_str("a\r\nb\r\n");
        assert!(buf.contains_crlf());
        let converted = buf.convert_crlf().unwrap();
        assert_eq!(converted.data(), b"a\nb\n");
        assert!(!converted.contains_crlf());
        // Source untouched.
        assert_eq!(buf.data(), b"a\r\nb\r\n");
    }

    #[test]
    fn test_convert_crlf_adjusts_cursors() {
        let mut buf = Buffer::text_from_str("x\r\ny\r\nz");
        buf.get_line().unwrap();
        buf.get_line().unwrap();
        let converted = buf.convert_crlf().unwrap();
        // Two pairs collapsed behind the read cursor.
        assert_eq!(converted.tell_get(), buf.tell_get() - 2);
        assert_eq!(converted.tell_put(), buf.tell_put() - 2);
        let mut converted = converted;
        assert_eq!(converted.get_line().unwrap(), b"z");
    }

    #[test]
    fn test_convert_crlf_refuses_wrong_kind() {
        let buf = Buffer::text_from_str("no pairs here\n");
        assert!(buf.convert_crlf().is_none());
        let binary = Buffer::from_vec(b"a\r\nb".to_vec());
        assert!(binary.convert_crlf().is_none());
    }

    #[test]
    fn test_lone_carriage_return_preserved() {
        let mut buf = Buffer::text_from_str("a\rb\r\n");
        buf.set_buffer_type(true, true);
        let converted = buf.convert_crlf().unwrap();
        assert_eq!(converted.data(), b"a\rb\n");
    }
}
