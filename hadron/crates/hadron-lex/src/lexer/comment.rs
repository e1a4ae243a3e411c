//! Whitespace and comment skipping.

use crate::error::{LexError, LexResult};
use crate::input::InputSource;
use crate::Lexer;

impl<'a, S: InputSource> Lexer<'a, S> {
    /// Skips whitespace, line continuations and comments.
    ///
    /// A backslash outside a string is a line continuation and is skipped
    /// like whitespace.
    pub(crate) fn skip_whitespace_and_comments(&mut self) -> LexResult<()> {
        while !self.at_end() {
            match self.current() {
                b' ' | b'\t' | b'\r' | b'\n' | b'\\' => self.advance(),
                b'/' => match self.peek() {
                    b'/' => self.skip_line_comment(),
                    b'*' => self.skip_block_comment()?,
                    _ => break,
                },
                _ => break,
            }
        }
        Ok(())
    }

    /// Skips `//` up to (not including) the newline.
    fn skip_line_comment(&mut self) {
        while !self.at_end() && self.current() != b'\n' {
            self.advance();
        }
    }

    /// Skips `/* ... */`. The first `*/` closes the comment.
    fn skip_block_comment(&mut self) -> LexResult<()> {
        self.begin_token();
        self.advance();
        self.advance();

        while !self.at_end() {
            if self.current() == b'*' && self.peek() == b'/' {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError::UnterminatedComment { span: self.span() })
    }
}
