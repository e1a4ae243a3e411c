//! Reports shown to the user, and the policy deciding when a run stops.
//!
//! Library crates never print. They return typed errors which implement
//! [`ToDiagnostic`]; the driver turns those into [`Diagnostic`] values and
//! hands them to a [`Handler`], which records them and decides (through its
//! [`ErrorMode`]) whether the run must stop.
//!
//! # Examples
//!
//! ```
//! use hadron_util::diagnostic::{Diagnostic, ErrorMode, Handler, E_PARSER_EXPECTED_TOKEN};
//! use hadron_util::Span;
//!
//! let handler = Handler::new(ErrorMode::Accumulate);
//! let diag = Diagnostic::error("expected ')' after expression", Span::new(1, 7, 8, 6, 7))
//!     .with_code(E_PARSER_EXPECTED_TOKEN);
//! assert_eq!(diag.to_string(), "error[E0203]: expected ')' after expression at 1:7");
//!
//! handler.emit_diagnostic(diag);
//! assert!(handler.has_errors());
//! assert!(!handler.should_abort());
//! ```

mod codes;

pub use codes::DiagnosticCode;
pub use codes::{
    E_CHUNK_CAPACITY, E_DRIVER_CONFIG, E_DRIVER_IO, E_FORMAT_BAD_MAGIC, E_FORMAT_INVALID_NAME,
    E_FORMAT_IO, E_FORMAT_NAME_TOO_LONG, E_FORMAT_TRUNCATED, E_LEXER_ARENA_EXHAUSTED, E_LEXER_INPUT,
    E_LEXER_INVALID_DIGIT, E_LEXER_INVALID_UTF8, E_LEXER_INVALID_RANGE, E_LEXER_MALFORMED_NUMBER,
    E_LEXER_MISSING_DIGITS, E_LEXER_UNEXPECTED_CHAR, E_LEXER_UNTERMINATED_COMMENT,
    E_LEXER_UNTERMINATED_STRING, E_PARSER_DUPLICATE_SYMBOL, E_PARSER_EXPECTED_TOKEN,
    E_PARSER_INVALID_LIMITS, E_PARSER_SYMBOL_TABLE_FULL, E_PARSER_TOO_DEEP,
    E_PARSER_TOO_MANY_VARIABLES, E_PARSER_UNDEFINED_NAME,
    E_PARSER_UNEXPECTED_OPERATOR, E_PARSER_UNEXPECTED_TOKEN, E_VM_MISSING_RETURN,
    E_VM_NOT_AN_INTEGER, E_VM_STACK_OVERFLOW, E_VM_STACK_UNDERFLOW,
    E_VM_TRUNCATED_INSTRUCTION, E_VM_UNINITIALIZED_VARIABLE, E_VM_UNKNOWN_OPCODE,
};

use crate::Span;
use std::cell::RefCell;
use std::fmt;

/// How bad a [`Diagnostic`] is.
///
/// # Examples
///
/// ```
/// use hadron_util::Level;
///
/// assert_eq!(Level::Error.to_string(), "error");
/// assert_eq!(Level::Warning.to_string(), "warning");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// A failure that abandons the current unit
    Error,
    /// Reported, but never changes the outcome of a run
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => f.write_str("error"),
            Level::Warning => f.write_str("warning"),
        }
    }
}

/// One report: `level[code]: message at line:col`, then its notes.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// Severity
    pub level: Level,
    /// Headline text, without the level or code prefix
    pub message: String,
    /// Source location, [`Span::DUMMY`] when there is none
    pub span: Span,
    /// Stable `Exxxx` code
    pub code: Option<DiagnosticCode>,
    /// Rendered as `= note:` lines
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// A diagnostic without code or notes.
    pub fn new(level: Level, message: impl Into<String>, span: Span) -> Self {
        Self {
            level,
            message: message.into(),
            span,
            code: None,
            notes: Vec::new(),
        }
    }

    /// Shorthand for [`Level::Error`].
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Error, message, span)
    }

    /// Shorthand for [`Level::Warning`].
    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Warning, message, span)
    }

    /// Tag with a stable code.
    pub fn with_code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Append a `= note:` line.
    ///
    /// # Examples
    ///
    /// ```
    /// use hadron_util::{Diagnostic, Span};
    ///
    /// let diag = Diagnostic::error("unknown opcode 0x07", Span::DUMMY)
    ///     .with_note("at offset 0x0012");
    /// assert_eq!(diag.notes.len(), 1);
    /// ```
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Attach the name of the unit being processed, e.g. the source path.
    pub fn in_unit(self, unit: impl fmt::Display) -> Self {
        self.with_note(format!("in {}", unit))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)?;
        if !self.span.is_dummy() {
            write!(f, " at {}", self.span)?;
        }
        for note in &self.notes {
            write!(f, "\n  = note: {}", note)?;
        }
        Ok(())
    }
}

/// Conversion from a phase-specific error into a [`Diagnostic`].
pub trait ToDiagnostic {
    /// Build the diagnostic for this error.
    fn to_diagnostic(&self) -> Diagnostic;
}

/// What the driver does after an error
///
/// # Examples
///
/// ```
/// use hadron_util::ErrorMode;
///
/// assert_eq!(ErrorMode::default(), ErrorMode::Strict);
/// assert_eq!(ErrorMode::from_keep_going(true), ErrorMode::Accumulate);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorMode {
    /// First error ends the run
    #[default]
    Strict,
    /// The failing unit is abandoned, later units still run
    Accumulate,
}

impl ErrorMode {
    /// Map the `--keep-going` switch onto a mode.
    pub fn from_keep_going(keep_going: bool) -> Self {
        if keep_going {
            ErrorMode::Accumulate
        } else {
            ErrorMode::Strict
        }
    }
}

/// Collects the diagnostics of a run and applies its [`ErrorMode`].
///
/// # Examples
///
/// ```
/// use hadron_util::{Diagnostic, ErrorMode, Handler, Span};
///
/// let handler = Handler::new(ErrorMode::Strict);
/// assert!(!handler.should_abort());
/// handler.emit_diagnostic(Diagnostic::warning("deprecated flag", Span::DUMMY));
/// assert!(!handler.should_abort());
/// handler.emit_diagnostic(Diagnostic::error("bad magic", Span::DUMMY));
/// assert!(handler.should_abort());
/// assert_eq!(handler.error_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Handler {
    mode: ErrorMode,
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    /// An empty handler applying `mode`.
    pub fn new(mode: ErrorMode) -> Self {
        Self {
            mode,
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// The error mode this handler applies.
    pub fn mode(&self) -> ErrorMode {
        self.mode
    }

    /// Record a diagnostic.
    pub fn emit_diagnostic(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Record the diagnostic for a phase error.
    pub fn emit_error<E: ToDiagnostic + ?Sized>(&self, error: &E) {
        self.emit_diagnostic(error.to_diagnostic());
    }

    /// At least one error was recorded.
    pub fn has_errors(&self) -> bool {
        self.count(Level::Error) > 0
    }

    /// Errors recorded so far.
    pub fn error_count(&self) -> usize {
        self.count(Level::Error)
    }

    /// Warnings recorded so far.
    pub fn warning_count(&self) -> usize {
        self.count(Level::Warning)
    }

    fn count(&self, level: Level) -> usize {
        self.diagnostics.borrow().iter().filter(|d| d.level == level).count()
    }

    /// Whether the run must stop now.
    ///
    /// Only strict mode ever aborts, and only once an error was recorded.
    pub fn should_abort(&self) -> bool {
        self.mode == ErrorMode::Strict && self.has_errors()
    }

    /// Snapshot of everything recorded so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Remove and return every recorded diagnostic.
    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.borrow_mut())
    }
}
