//! Core lexer implementation.
//!
//! This module contains the Lexer struct, position bookkeeping and the
//! first-byte dispatch in [`Lexer::next_token`].

use bumpalo::Bump;
use hadron_util::{Limits, Span};

use crate::error::{LexError, LexResult};
use crate::input::InputSource;
use crate::token::{Literal, Token, TokenKind};

/// Lexer for Hadron source text.
///
/// Pulls bytes from an [`InputSource`] and produces one [`Token`] per call to
/// [`next_token`](Lexer::next_token). String and identifier text is copied
/// into the arena passed at construction, so tokens stay valid for as long
/// as the arena does.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use hadron_lex::{Lexer, StringInput, TokenKind};
///
/// let arena = Bump::new();
/// let mut lexer = Lexer::new(StringInput::new("1 + 2"), &arena);
/// let kinds: Vec<_> = lexer
///     .by_ref()
///     .map(|token| token.map(|t| t.kind))
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(
///     kinds,
///     vec![TokenKind::Decimal, TokenKind::Plus, TokenKind::Decimal, TokenKind::End]
/// );
/// ```
pub struct Lexer<'a, S: InputSource> {
    pub(crate) input: S,

    arena: &'a Bump,
    arena_capacity: usize,
    arena_used: usize,

    /// Line of the current byte (1-based).
    line: u32,
    /// Column of the current byte (1-based).
    column: u32,
    /// Absolute offset of the current byte.
    pub(crate) offset: usize,

    /// Absolute offset where the current token starts.
    pub(crate) token_start: usize,
    token_line: u32,
    token_column: u32,

    /// Next literal constant index to hand out.
    constants: u8,

    /// Set once `End` (or an error) has been yielded by the iterator.
    finished: bool,

    /// Reusable buffer for `read_chunk`.
    scratch: Vec<u8>,
}

impl<'a, S: InputSource> Lexer<'a, S> {
    /// Creates a lexer with the default arena ceiling.
    pub fn new(input: S, arena: &'a Bump) -> Self {
        Self::with_limits(input, arena, &Limits::default())
    }

    /// Creates a lexer whose literal text may use at most
    /// `limits.arena_bytes` of the arena.
    pub fn with_limits(mut input: S, arena: &'a Bump, limits: &Limits) -> Self {
        // Load the one-byte lookahead.
        input.next();
        Self {
            input,
            arena,
            arena_capacity: limits.arena_bytes,
            arena_used: 0,
            line: 1,
            column: 1,
            offset: 0,
            token_start: 0,
            token_line: 1,
            token_column: 1,
            constants: 0,
            finished: false,
            scratch: Vec::new(),
        }
    }

    /// Returns the next token.
    ///
    /// Skips whitespace and comments, then dispatches on the first
    /// significant byte. At end of input every call returns a
    /// [`TokenKind::End`] token.
    pub fn next_token(&mut self) -> LexResult<Token<'a>> {
        self.skip_whitespace_and_comments()?;
        self.begin_token();

        if self.at_end() {
            return Ok(self.token(TokenKind::End));
        }

        let c = self.current();
        self.advance();

        let kind = match c {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b':' => TokenKind::Colon,
            b'?' => TokenKind::Question,
            b'@' => TokenKind::At,
            b'~' => TokenKind::Tilde,
            b'+' => self.lex_plus(),
            b'-' => self.lex_minus(),
            b'*' => self.lex_star(),
            b'/' => self.lex_slash(),
            b'%' => self.lex_percent(),
            b'!' => self.lex_bang(),
            b'=' => self.lex_equals(),
            b'<' => self.lex_less(),
            b'>' => self.lex_greater(),
            b'&' => self.lex_ampersand(),
            b'|' => self.lex_pipe(),
            b'^' => self.lex_caret(),
            b'#' => self.lex_hash(),
            b'.' => self.lex_dot()?,
            b'$' => {
                if is_ident_continue(self.current()) && !self.at_end() {
                    return self.lex_identifier();
                }
                self.lex_dollar()
            },
            b'"' | b'\'' | b'`' => return self.lex_string(c),
            c if is_ident_start(c) => return self.lex_identifier(),
            c if c.is_ascii_digit() => return self.lex_number(c),
            c => return Err(LexError::unexpected(c, self.span())),
        };

        Ok(self.token(kind))
    }

    /// Returns the current line number (1-based).
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Returns the current column number (1-based).
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Returns the absolute byte offset of the next byte to be lexed.
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Bytes of arena budget consumed by literal text so far.
    pub fn arena_used(&self) -> usize {
        self.arena_used
    }

    // ------------------------------------------------------------------
    // Cursor helpers
    // ------------------------------------------------------------------

    #[inline]
    pub(crate) fn current(&self) -> u8 {
        self.input.current()
    }

    #[inline]
    pub(crate) fn peek(&mut self) -> u8 {
        self.input.peek()
    }

    #[inline]
    pub(crate) fn at_end(&self) -> bool {
        self.input.is_ended()
    }

    /// Step past the current byte, keeping line/column in sync.
    pub(crate) fn advance(&mut self) {
        if self.at_end() {
            return;
        }
        if self.current() == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.offset += 1;
        self.input.next();
    }

    /// Consume the current byte iff it equals `expected`.
    pub(crate) fn match_byte(&mut self, expected: u8) -> bool {
        if self.at_end() || self.current() != expected {
            return false;
        }
        self.advance();
        true
    }

    pub(crate) fn begin_token(&mut self) {
        self.token_start = self.offset;
        self.token_line = self.line;
        self.token_column = self.column;
    }

    /// Span from the token start to the current position.
    pub(crate) fn span(&self) -> Span {
        let col_end = if self.line == self.token_line {
            self.column
        } else {
            self.token_column
        };
        Span::new(
            self.token_line,
            self.token_column,
            col_end,
            self.token_start,
            self.offset,
        )
    }

    pub(crate) fn token(&self, kind: TokenKind) -> Token<'a> {
        Token::new(kind, self.span())
    }

    /// Build a literal token, assigning the next constant index.
    pub(crate) fn literal_token(&mut self, kind: TokenKind, literal: Literal<'a>) -> Token<'a> {
        let constant_index = self.constants;
        self.constants = self.constants.wrapping_add(1);
        Token {
            kind,
            span: self.span(),
            literal,
            constant_index,
        }
    }

    /// Re-read `length` bytes at `start` into the scratch buffer.
    pub(crate) fn reread(&mut self, start: usize, length: usize) -> LexResult<&[u8]> {
        let span = self.span();
        self.input
            .read_chunk(&mut self.scratch, start, length)
            .map_err(|source| LexError::Io { span, source })?;
        Ok(&self.scratch)
    }

    /// Re-read a byte range and copy it into the arena.
    pub(crate) fn materialize(&mut self, start: usize, length: usize) -> LexResult<&'a str> {
        let span = self.span();
        let capacity = self.arena_capacity;
        let available = capacity.saturating_sub(self.arena_used);
        let arena: &'a Bump = self.arena;

        let bytes = self.reread(start, length)?;
        let text = std::str::from_utf8(bytes).map_err(|err| LexError::InvalidUtf8 {
            valid_up_to: err.valid_up_to(),
            span,
        })?;
        if text.len() > available {
            return Err(LexError::ArenaExhausted {
                requested: text.len(),
                available,
                capacity,
                span,
            });
        }

        let stored = arena.alloc_str(text);
        self.arena_used += stored.len();
        Ok(stored)
    }
}

impl<'a, S: InputSource> Iterator for Lexer<'a, S> {
    type Item = LexResult<Token<'a>>;

    /// Yields every token up to and including `End`, or up to the first
    /// error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        match &result {
            Ok(token) if token.is_end() => self.finished = true,
            Err(_) => self.finished = true,
            Ok(token) => tracing::trace!("token {} at {}", token, token.span),
        }
        Some(result)
    }
}

#[inline]
pub(crate) fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b'$'
}

#[inline]
pub(crate) fn is_ident_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'$'
}
