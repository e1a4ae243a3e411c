//! String literal lexing.

use crate::error::{LexError, LexResult};
use crate::input::InputSource;
use crate::token::{Literal, Token, TokenKind};
use crate::Lexer;

impl<'a, S: InputSource> Lexer<'a, S> {
    /// Lexes a string delimited by `quote` (`"`, `'` or `` ` ``).
    ///
    /// The opening quote has been consumed. A backslash skips the byte after
    /// it; escapes are kept verbatim in the literal text. Only backtick
    /// strings may contain a newline.
    pub(crate) fn lex_string(&mut self, quote: u8) -> LexResult<Token<'a>> {
        let content_start = self.offset;

        loop {
            if self.at_end() {
                return Err(LexError::UnterminatedString { span: self.span() });
            }
            match self.current() {
                c if c == quote => break,
                b'\n' if quote != b'`' => {
                    return Err(LexError::UnterminatedString { span: self.span() });
                },
                b'\\' => {
                    self.advance();
                    if self.at_end() {
                        return Err(LexError::UnterminatedString { span: self.span() });
                    }
                    self.advance();
                },
                _ => self.advance(),
            }
        }

        let content_len = self.offset - content_start;
        // Closing quote.
        self.advance();

        let text = self.materialize(content_start, content_len)?;
        Ok(self.literal_token(TokenKind::String, Literal::Text(text)))
    }
}
