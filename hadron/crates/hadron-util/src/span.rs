//! Span module - Source location tracking.
//!
//! A [`Span`] carries two coordinate systems at once: line/column for
//! humans, and absolute byte offsets so the lexer can re-read a token's
//! text from its input source after the token has been classified.
//!
//! # Examples
//!
//! ```
//! use hadron_util::Span;
//!
//! // `42` on line 3, columns 5..7, bytes 20..22
//! let span = Span::new(3, 5, 7, 20, 22);
//! assert_eq!(span.len(), 2);
//! assert_eq!(span.to_string(), "3:5");
//! ```

use std::fmt;

/// Source location span
///
/// Columns are 1-based within `line`, `col_end` is exclusive. Byte offsets
/// are 0-based and absolute over the whole input, `byte_end` is exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// Line number (1-based)
    pub line: u32,
    /// First column of the token (1-based)
    pub col_start: u32,
    /// Column one past the last character of the token
    pub col_end: u32,
    /// Absolute offset of the first byte
    pub byte_start: usize,
    /// Absolute offset one past the last byte
    pub byte_end: usize,
}

impl Span {
    /// Placeholder span for diagnostics with no source location.
    pub const DUMMY: Span = Span {
        line: 0,
        col_start: 0,
        col_end: 0,
        byte_start: 0,
        byte_end: 0,
    };

    /// Create a new span.
    #[inline]
    pub const fn new(
        line: u32,
        col_start: u32,
        col_end: u32,
        byte_start: usize,
        byte_end: usize,
    ) -> Self {
        Self {
            line,
            col_start,
            col_end,
            byte_start,
            byte_end,
        }
    }

    /// Create an empty span pointing at a single position.
    ///
    /// # Examples
    ///
    /// ```
    /// use hadron_util::Span;
    ///
    /// let point = Span::point(2, 4, 11);
    /// assert!(point.is_empty());
    /// ```
    #[inline]
    pub const fn point(line: u32, column: u32, byte: usize) -> Self {
        Self::new(line, column, column, byte, byte)
    }

    /// Number of bytes covered by the span.
    #[inline]
    pub const fn len(&self) -> usize {
        self.byte_end.saturating_sub(self.byte_start)
    }

    /// Whether the span covers no bytes.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this is the placeholder span.
    #[inline]
    pub fn is_dummy(&self) -> bool {
        *self == Self::DUMMY
    }

    /// Combine two spans into one covering both.
    ///
    /// Line and start column come from whichever span starts first.
    ///
    /// # Examples
    ///
    /// ```
    /// use hadron_util::Span;
    ///
    /// let lhs = Span::new(1, 1, 2, 0, 1);
    /// let rhs = Span::new(1, 5, 6, 4, 5);
    /// let both = lhs.to(rhs);
    /// assert_eq!((both.byte_start, both.byte_end), (0, 5));
    /// assert_eq!((both.col_start, both.col_end), (1, 6));
    /// ```
    pub fn to(self, other: Span) -> Span {
        let (first, last) = if self.byte_start <= other.byte_start {
            (self, other)
        } else {
            (other, self)
        };
        let col_end = if first.line == last.line {
            last.col_end.max(first.col_end)
        } else {
            first.col_end
        };
        Span {
            line: first.line,
            col_start: first.col_start,
            col_end,
            byte_start: first.byte_start,
            byte_end: first.byte_end.max(last.byte_end),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dummy_span() {
        assert!(Span::DUMMY.is_dummy());
        assert!(Span::DUMMY.is_empty());
        assert!(!Span::new(1, 1, 2, 0, 1).is_dummy());
    }

    #[test]
    fn test_span_merge_is_order_independent() {
        let a = Span::new(1, 3, 4, 2, 3);
        let b = Span::new(1, 7, 9, 6, 8);
        assert_eq!(a.to(b), b.to(a));
        assert_eq!(a.to(b).len(), 6);
    }

    #[test]
    fn test_span_merge_across_lines_keeps_first_line() {
        let a = Span::new(1, 3, 4, 2, 3);
        let b = Span::new(2, 1, 2, 10, 11);
        let merged = a.to(b);
        assert_eq!(merged.line, 1);
        assert_eq!(merged.col_end, 4);
        assert_eq!(merged.byte_end, 11);
    }

    #[test]
    fn test_span_display() {
        assert_eq!(Span::new(12, 40, 41, 300, 301).to_string(), "12:40");
    }
}
