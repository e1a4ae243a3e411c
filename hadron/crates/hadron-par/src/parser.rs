//! Pratt parser that writes bytecode as it goes.
//!
//! There is no syntax tree. Each handler parses its operands by recursing
//! into [`Parser::parse_expression`] and then appends its own instruction,
//! so the chunk comes out in stack-machine (postfix) order.

use hadron_bc::{Chunk, OpCode};
use hadron_lex::{InputSource, Lexer, Literal, Token, TokenKind};
use hadron_util::{Limits, Span};
use tracing::{debug, trace};

use crate::error::{ParseError, ParseResult};
use crate::rules::{precedence, rule, Precedence};
use crate::symbol::{truncate_name, SymbolError, SymbolKind, SymbolTable};

/// Variable slots addressable by `LOAD`/`STORE`.
pub const MAX_VARIABLES: usize = 256;

/// Parser and code generator for one compilation unit.
///
/// Holds only the current and previous token; everything else it learns
/// goes straight into the chunk or the symbol table.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use hadron_bc::OpCode;
/// use hadron_lex::{Lexer, StringInput};
/// use hadron_par::Parser;
///
/// let arena = Bump::new();
/// let lexer = Lexer::new(StringInput::new("2 + 3"), &arena);
/// let mut parser = Parser::new(lexer).unwrap();
/// assert_eq!(parser.parse_program().unwrap(), 1);
/// assert_eq!(parser.chunk().last_op(), Some(OpCode::Return));
/// ```
pub struct Parser<'a, S: InputSource> {
    lexer: Lexer<'a, S>,
    current: Token<'a>,
    previous: Token<'a>,
    chunk: Chunk,
    symbols: SymbolTable,
    /// Declared variable names; the index is the slot.
    variables: Vec<String>,
    /// Open parentheses; line breaks do not end an expression inside them.
    parens: u32,
    /// Active `parse_expression` calls.
    nesting: usize,
    max_depth: usize,
    statements: usize,
}

impl<'a, S: InputSource> Parser<'a, S> {
    /// Parser with default chunk and symbol table sizes.
    pub fn new(lexer: Lexer<'a, S>) -> ParseResult<Self> {
        Self::with_limits(lexer, &Limits::default())
    }

    /// Parser sized by `limits`. Reads the first token.
    ///
    /// Fails with [`ParseError::Limits`] if `limits` does not validate.
    pub fn with_limits(lexer: Lexer<'a, S>, limits: &Limits) -> ParseResult<Self> {
        limits.validate()?;
        let start = Token::new(TokenKind::End, Span::DUMMY);
        let mut parser = Self {
            lexer,
            current: start,
            previous: start,
            chunk: Chunk::with_capacity(limits.chunk_capacity),
            symbols: SymbolTable::with_slots(limits.symbol_slots),
            variables: Vec::new(),
            parens: 0,
            nesting: 0,
            max_depth: limits.max_depth,
            statements: 0,
        };
        parser.advance()?;
        Ok(parser)
    }

    // =========================================================================
    // TOKEN CURSOR
    // =========================================================================

    /// Move to the next token.
    pub fn advance(&mut self) -> ParseResult<()> {
        self.previous = self.current;
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    /// Whether the current token is `kind`.
    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Consume the current token if it is `kind`.
    pub fn match_token(&mut self, kind: TokenKind) -> ParseResult<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume a required token and return it.
    pub fn consume(&mut self, kind: TokenKind, message: &'static str) -> ParseResult<Token<'a>> {
        if self.check(kind) {
            self.advance()?;
            Ok(self.previous)
        } else {
            Err(ParseError::expected(message, &self.current))
        }
    }

    /// The token about to be consumed.
    pub fn current(&self) -> &Token<'a> {
        &self.current
    }

    fn on_new_line(&self) -> bool {
        self.current.span.line != self.previous.span.line
    }

    // =========================================================================
    // EMISSION
    // =========================================================================

    fn chunk_error(&self, source: hadron_bc::ChunkError) -> ParseError {
        ParseError::Chunk {
            source,
            span: self.previous.span,
        }
    }

    fn emit(&mut self, op: OpCode) -> ParseResult<()> {
        match self.chunk.emit(op) {
            Ok(_) => Ok(()),
            Err(err) => Err(self.chunk_error(err)),
        }
    }

    fn emit_slot(&mut self, op: OpCode, slot: u8) -> ParseResult<()> {
        match self.chunk.emit_slot(op, slot) {
            Ok(_) => Ok(()),
            Err(err) => Err(self.chunk_error(err)),
        }
    }

    // =========================================================================
    // PRATT CORE
    // =========================================================================

    /// Parse one expression whose operators bind tighter than `min`.
    ///
    /// Outside parentheses an expression also ends where a token starts a
    /// new line.
    ///
    /// Every parenthesis and prefix operator re-enters this function; past
    /// `limits.max_depth` active calls it fails with [`ParseError::TooDeep`].
    pub fn parse_expression(&mut self, min: Precedence) -> ParseResult<()> {
        if self.nesting >= self.max_depth {
            return Err(ParseError::TooDeep {
                max: self.max_depth,
                span: self.current.span,
            });
        }
        self.nesting += 1;
        let parsed = self.parse_nested(min);
        self.nesting -= 1;
        parsed
    }

    fn parse_nested(&mut self, min: Precedence) -> ParseResult<()> {
        let token = self.current;
        self.advance()?;
        let nud = rule::<S>(token.kind)
            .nud
            .ok_or_else(|| ParseError::unexpected_token(&token))?;
        nud(self, token)?;

        while precedence(self.current.kind) > min && !(self.parens == 0 && self.on_new_line()) {
            let operator = self.current;
            self.advance()?;
            let led = rule::<S>(operator.kind)
                .led
                .ok_or_else(|| ParseError::unexpected_operator(&operator))?;
            led(self, operator)?;
        }
        Ok(())
    }

    /// Compile statements until end of input; returns how many were
    /// compiled. Every statement is followed by `RETURN`.
    pub fn parse_program(&mut self) -> ParseResult<usize> {
        debug!("compiling unit");
        while !self.check(TokenKind::End) {
            if self.match_token(TokenKind::Semicolon)? {
                continue;
            }
            self.parse_expression(Precedence::Null)?;
            self.end_statement()?;
        }
        debug!(
            statements = self.statements,
            bytes = self.chunk.len(),
            symbols = self.symbols.len(),
            "compiled unit"
        );
        Ok(self.statements)
    }

    fn end_statement(&mut self) -> ParseResult<()> {
        match self.current.kind {
            TokenKind::Semicolon => self.advance()?,
            TokenKind::End => {},
            _ if self.on_new_line() => {},
            _ => {
                return Err(ParseError::expected(
                    "expected ';' or a line break after expression",
                    &self.current,
                ))
            },
        }
        self.emit(OpCode::Return)?;
        self.statements += 1;
        trace!(statement = self.statements, end = self.chunk.cursor(), "statement");
        Ok(())
    }

    // =========================================================================
    // HANDLERS
    // =========================================================================

    pub(crate) fn literal(&mut self, token: Token<'a>) -> ParseResult<()> {
        match token.literal {
            Literal::Number(value) => match self.chunk.emit_move(token.constant_index, value) {
                Ok(_) => Ok(()),
                Err(err) => Err(self.chunk_error(err)),
            },
            Literal::Text(text) => match self.symbols.insert(text, 0, SymbolKind::Str) {
                Ok(_) | Err(SymbolError::Duplicate { .. }) => Ok(()),
                Err(source) => Err(ParseError::Symbol {
                    source,
                    span: token.span,
                }),
            },
            Literal::None => Err(ParseError::unexpected_token(&token)),
        }
    }

    pub(crate) fn unary(&mut self, token: Token<'a>) -> ParseResult<()> {
        self.parse_expression(precedence(token.kind))?;
        match token.kind {
            TokenKind::Plus => Ok(()),
            TokenKind::Minus => self.emit(OpCode::Negate),
            TokenKind::Bang => self.emit(OpCode::Not),
            TokenKind::Tilde => self.emit(OpCode::BNot),
            _ => Err(ParseError::unexpected_token(&token)),
        }
    }

    pub(crate) fn binary(&mut self, token: Token<'a>) -> ParseResult<()> {
        let operand = match token.kind {
            // Right-associative: another `**` must bind inside the right operand.
            TokenKind::StarStar => Precedence::Factor,
            kind => precedence(kind),
        };
        self.parse_expression(operand)?;

        let op = match token.kind {
            TokenKind::Plus => OpCode::Add,
            TokenKind::Minus => OpCode::Sub,
            TokenKind::Star => OpCode::Mul,
            TokenKind::Slash => OpCode::Div,
            TokenKind::Percent => OpCode::Rem,
            TokenKind::StarStar => OpCode::Pow,
            TokenKind::AndAnd => OpCode::LAnd,
            TokenKind::OrOr => OpCode::LOr,
            TokenKind::And => OpCode::BAnd,
            TokenKind::Or => OpCode::BOr,
            TokenKind::Caret => OpCode::BXor,
            TokenKind::Shl => OpCode::LShift,
            TokenKind::Shr => OpCode::RShift,
            TokenKind::EqEq => OpCode::CmpEq,
            TokenKind::BangEq => OpCode::CmpNeq,
            TokenKind::Less => OpCode::CmpLt,
            TokenKind::LessEq => OpCode::CmpLeq,
            TokenKind::Greater => OpCode::CmpGt,
            TokenKind::GreaterEq => OpCode::CmpGeq,
            _ => return Err(ParseError::unexpected_operator(&token)),
        };
        self.emit(op)
    }

    pub(crate) fn range(&mut self, token: Token<'a>) -> ParseResult<()> {
        self.parse_expression(Precedence::Range)?;
        let op = match token.kind {
            TokenKind::DotDot => OpCode::RangeExcl,
            TokenKind::EqDotDot => OpCode::RangeLIn,
            TokenKind::DotDotEq => OpCode::RangeRIn,
            TokenKind::EqDotDotEq => OpCode::RangeIncl,
            _ => return Err(ParseError::unexpected_operator(&token)),
        };
        self.emit(op)
    }

    pub(crate) fn grouping(&mut self, _token: Token<'a>) -> ParseResult<()> {
        self.parenthesized(Precedence::Null, "expected ')' after expression")
    }

    fn parenthesized(&mut self, min: Precedence, message: &'static str) -> ParseResult<()> {
        self.parens += 1;
        let inner = self.parse_expression(min);
        self.parens -= 1;
        inner?;
        self.consume(TokenKind::RParen, message)?;
        Ok(())
    }

    /// `fx name() { expr* }`
    pub(crate) fn function(&mut self, _token: Token<'a>) -> ParseResult<()> {
        let name = self.consume(TokenKind::Name, "expected function name")?;
        self.consume(TokenKind::LParen, "expected '(' after function name")?;
        self.consume(TokenKind::RParen, "expected ')' after function name")?;

        self.emit(OpCode::FxEntry)?;
        self.consume(TokenKind::LBrace, "expected '{' to start function body")?;
        let body_start = self.chunk.cursor();
        loop {
            if self.match_token(TokenKind::RBrace)? {
                break;
            }
            if self.check(TokenKind::End) {
                return Err(ParseError::expected(
                    "expected '}' to close function body",
                    &self.current,
                ));
            }
            if self.match_token(TokenKind::Semicolon)? {
                continue;
            }
            self.parse_expression(Precedence::Null)?;
        }
        self.emit(OpCode::FxExit)?;

        let text = name.text().unwrap_or_default();
        self.symbols
            .insert(text, body_start, SymbolKind::Function)
            .map_err(|source| ParseError::Symbol {
                source,
                span: name.span,
            })?;
        debug!(name = text, offset = body_start, "function");
        Ok(())
    }

    /// A name, told apart by the token after it on the same line.
    pub(crate) fn name(&mut self, token: Token<'a>) -> ParseResult<()> {
        if self.on_new_line() {
            return self.reference(token);
        }
        match self.current.kind {
            TokenKind::Name => self.declaration(),
            TokenKind::Colon => {
                self.advance()?;
                self.parse_expression(Precedence::Null)
            },
            TokenKind::LParen => {
                self.advance()?;
                self.parenthesized(Precedence::Grouping, "expected ')'")
            },
            TokenKind::Eq => self.assignment(token),
            _ => self.reference(token),
        }
    }

    /// `type name = expr`; the type name has already been consumed.
    fn declaration(&mut self) -> ParseResult<()> {
        let name = self.consume(TokenKind::Name, "expected variable name")?;
        self.consume(TokenKind::Eq, "expected '=' after variable name")?;
        let location = self.chunk.cursor();
        self.parse_expression(Precedence::Null)?;

        let text = truncate_name(name.text().unwrap_or_default());
        let slot = u8::try_from(self.variables.len()).map_err(|_| ParseError::TooManyVariables {
            max: MAX_VARIABLES,
            span: name.span,
        })?;
        self.symbols
            .insert(text, location, SymbolKind::I32)
            .map_err(|source| ParseError::Symbol {
                source,
                span: name.span,
            })?;
        self.variables.push(text.to_string());
        trace!(name = text, slot, "variable");
        self.emit_slot(OpCode::Store, slot)
    }

    /// `name = expr` for an already declared variable.
    fn assignment(&mut self, name: Token<'a>) -> ParseResult<()> {
        let slot = self.slot_of(&name)?;
        self.advance()?;
        self.parse_expression(Precedence::Null)?;
        self.emit_slot(OpCode::Store, slot)
    }

    fn reference(&mut self, name: Token<'a>) -> ParseResult<()> {
        let slot = self.slot_of(&name)?;
        self.emit_slot(OpCode::Load, slot)
    }

    fn slot_of(&self, name: &Token<'a>) -> ParseResult<u8> {
        let text = truncate_name(name.text().unwrap_or_default());
        self.variables
            .iter()
            .position(|v| v == text)
            .and_then(|slot| u8::try_from(slot).ok())
            .ok_or_else(|| ParseError::UndefinedName {
                name: text.to_string(),
                span: name.span,
            })
    }

    // =========================================================================
    // RESULTS
    // =========================================================================

    /// Code generated so far.
    pub fn chunk(&self) -> &Chunk {
        &self.chunk
    }

    /// Symbols recorded so far.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Statements compiled so far.
    pub fn statements(&self) -> usize {
        self.statements
    }

    /// Take the chunk and symbol table.
    pub fn into_parts(self) -> (Chunk, SymbolTable) {
        (self.chunk, self.symbols)
    }
}
