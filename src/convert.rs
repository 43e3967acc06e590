// src/convert.rs
//! Character conversion tables for delimited strings, and break sets
//! for tokenizing
//!
//! A [`CharConversion`] maps individual characters to escape replacement
//! strings and back. It is consulted only by the delimited-string codec
//! ([`Buffer::put_delimited_string`](crate::Buffer::put_delimited_string)
//! and friends). Two standard tables are provided:
//! [`c_string_conversion`] (backslash escapes in the C tradition) and
//! [`no_escape_conversion`] (delimiter quoting only).

use std::sync::OnceLock;

/// Mapping between raw characters and their escaped replacement strings.
///
/// Built once from an ordered list of `(character, replacement)` pairs plus
/// an escape character and a delimiter character. Replacements are what
/// follows the escape character on the wire: the pair `('\n', "n")` encodes
/// a line feed as `\n`.
#[derive(Debug)]
pub struct CharConversion {
    escape: u8,
    delimiter: u8,
    max_len: usize,
    replacements: Vec<(u8, String)>,
    // byte -> index into replacements
    lookup: [Option<u8>; 256],
}

impl CharConversion {
    /// Builds a table from `(character, replacement)` pairs.
    ///
    /// # Panics
    ///
    /// Panics if more than 255 pairs are supplied or a replacement is
    /// empty; both are authoring errors in a statically declared table.
    pub fn new(escape: char, delimiter: char, pairs: &[(char, &str)]) -> Self {
        assert!(pairs.len() < 256, "too many conversion pairs");
        let mut conv = Self {
            escape: escape as u8,
            delimiter: delimiter as u8,
            max_len: 0,
            replacements: Vec::with_capacity(pairs.len()),
            lookup: [None; 256],
        };
        for (i, (c, replacement)) in pairs.iter().enumerate() {
            assert!(!replacement.is_empty(), "empty replacement string");
            conv.max_len = conv.max_len.max(replacement.len());
            conv.lookup[*c as usize] = Some(i as u8);
            conv.replacements.push((*c as u8, (*replacement).to_string()));
        }
        conv
    }

    /// The escape character that prefixes replacements on the wire.
    #[inline(always)]
    pub fn escape_char(&self) -> u8 {
        self.escape
    }

    /// The delimiter character wrapped around encoded strings.
    #[inline(always)]
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Longest replacement string length; bounds pre-allocation for
    /// consumers scanning escaped text.
    #[inline(always)]
    pub fn max_conversion_length(&self) -> usize {
        self.max_len
    }

    /// Returns the replacement string for `c`, or `None` if `c` needs no
    /// escaping.
    pub fn find_conversion(&self, c: u8) -> Option<&str> {
        self.lookup[c as usize].map(|i| self.replacements[i as usize].1.as_str())
    }

    /// Scans for the longest replacement string at the start of `text`
    /// (which begins immediately *after* an escape character) and returns
    /// the decoded character plus the number of bytes consumed.
    ///
    /// Returns `None` when the text does not begin with any recognized
    /// replacement.
    pub fn find_escape(&self, text: &[u8]) -> Option<(u8, usize)> {
        let mut best: Option<(u8, usize)> = None;
        for (c, replacement) in &self.replacements {
            let r = replacement.as_bytes();
            if text.starts_with(r) {
                match best {
                    Some((_, len)) if len >= r.len() => {}
                    _ => best = Some((*c, r.len())),
                }
            }
        }
        best
    }
}

/// Character conversions for C strings: backslash escapes with a `"`
/// delimiter, matching the classic `\n`, `\t`, `\\`, `\"` family.
pub fn c_string_conversion() -> &'static CharConversion {
    static TABLE: OnceLock<CharConversion> = OnceLock::new();
    TABLE.get_or_init(|| {
        CharConversion::new(
            '\\',
            '"',
            &[
                ('\n', "n"),
                ('\t', "t"),
                ('\x0B', "v"),
                ('\x08', "b"),
                ('\r', "r"),
                ('\x0C', "f"),
                ('\x07', "a"),
                ('\\', "\\"),
                ('?', "?"),
                ('\'', "'"),
                ('"', "\""),
            ],
        )
    })
}

/// Character conversions for quoted strings with no escape sequences:
/// only the `"` delimiter is special.
pub fn no_escape_conversion() -> &'static CharConversion {
    static TABLE: OnceLock<CharConversion> = OnceLock::new();
    TABLE.get_or_init(|| CharConversion::new('\x7F', '"', &[]))
}

/// A set of single-byte break characters for
/// [`Buffer::parse_token_breaks`](crate::Buffer::parse_token_breaks).
#[derive(Debug, Clone)]
pub struct CharacterSet {
    set: [bool; 256],
}

impl CharacterSet {
    /// Builds a set from the bytes of `chars`.
    pub fn new(chars: &str) -> Self {
        let mut set = [false; 256];
        for b in chars.bytes() {
            set[b as usize] = true;
        }
        Self { set }
    }

    /// Whether `b` is in the set.
    #[inline(always)]
    pub fn contains(&self, b: u8) -> bool {
        self.set[b as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_conversion() {
        let conv = c_string_conversion();
        assert_eq!(conv.find_conversion(b'\n'), Some("n"));
        assert_eq!(conv.find_conversion(b'\t'), Some("t"));
        assert_eq!(conv.find_conversion(b'\\'), Some("\\"));
        assert_eq!(conv.find_conversion(b'"'), Some("\""));
        assert_eq!(conv.find_conversion(b'x'), None);
    }

    #[test]
    fn test_find_escape() {
        let conv = c_string_conversion();
        assert_eq!(conv.find_escape(b"n rest"), Some((b'\n', 1)));
        assert_eq!(conv.find_escape(b"tab"), Some((b'\t', 1)));
        assert_eq!(conv.find_escape(b"zzz"), None);
        assert_eq!(conv.find_escape(b""), None);
    }

    #[test]
    fn test_escape_round_trip() {
        let conv = c_string_conversion();
        for c in [b'\n', b'\t', b'\r', b'\\', b'"', b'\''] {
            let replacement = conv.find_conversion(c).unwrap();
            let (decoded, consumed) = conv.find_escape(replacement.as_bytes()).unwrap();
            assert_eq!(decoded, c);
            assert_eq!(consumed, replacement.len());
        }
    }

    #[test]
    fn test_max_conversion_length() {
        assert_eq!(c_string_conversion().max_conversion_length(), 1);
        assert_eq!(no_escape_conversion().max_conversion_length(), 0);
    }

    #[test]
    fn test_no_escape_table() {
        let conv = no_escape_conversion();
        assert_eq!(conv.delimiter(), b'"');
        assert_eq!(conv.find_conversion(b'"'), None);
        assert_eq!(conv.find_escape(b"anything"), None);
    }

    #[test]
    fn test_character_set() {
        let breaks = CharacterSet::new("{}()");
        assert!(breaks.contains(b'{'));
        assert!(breaks.contains(b')'));
        assert!(!breaks.contains(b'a'));
        assert!(!breaks.contains(b' '));
    }
}
