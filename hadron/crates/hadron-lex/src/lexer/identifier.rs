//! Identifier and keyword lexing.

use crate::error::LexResult;
use crate::input::InputSource;
use crate::lexer::core::is_ident_continue;
use crate::token::{keyword_from_ident, Literal, Token, TokenKind};
use crate::Lexer;

impl<'a, S: InputSource> Lexer<'a, S> {
    /// Lexes a name or keyword. The first byte has been consumed.
    ///
    /// The name's bytes are re-read from the input once its extent is known,
    /// then checked against the keyword set.
    pub(crate) fn lex_identifier(&mut self) -> LexResult<Token<'a>> {
        while !self.at_end() && is_ident_continue(self.current()) {
            self.advance();
        }

        let start = self.token_start;
        let length = self.offset - start;

        let keyword = {
            let bytes = self.reread(start, length)?;
            std::str::from_utf8(bytes).ok().and_then(keyword_from_ident)
        };
        if let Some(kind) = keyword {
            return Ok(self.token(kind));
        }

        let text = self.materialize(start, length)?;
        Ok(Token {
            literal: Literal::Text(text),
            ..self.token(TokenKind::Name)
        })
    }
}
