//! Diagnostic codes for categorizing pipeline errors.
//!
//! Codes are grouped by phase: `E01xx` lexer, `E02xx` parser and code
//! generation, `E03xx` bytecode chunk and file format, `E04xx` VM,
//! `E05xx` driver.
//!
//! # Examples
//!
//! ```
//! use hadron_util::diagnostic::{DiagnosticCode, E_LEXER_UNTERMINATED_STRING};
//!
//! assert_eq!(E_LEXER_UNTERMINATED_STRING.as_str(), "E0102");
//! assert_eq!(DiagnosticCode::new("E", 7).to_string(), "E0007");
//! ```

use std::fmt;

/// Stable identifier such as `E0102`, printed between brackets.
///
/// Codes follow the format `{prefix}{number:04}`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    /// The prefix ("E" for errors, "W" for warnings)
    pub prefix: &'static str,
    /// Number part, e.g. `102`.
    pub number: u32,
}

impl DiagnosticCode {
    /// Code `prefix` followed by `number` padded to four digits.
    #[inline]
    pub const fn new(prefix: &'static str, number: u32) -> Self {
        Self { prefix, number }
    }

    /// Get the prefix
    #[inline]
    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Get the numeric part
    #[inline]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Render the code as a string, e.g. `E0102`.
    pub fn as_str(&self) -> String {
        format!("{}{:04}", self.prefix, self.number)
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:04}", self.prefix, self.number)
    }
}

impl fmt::Debug for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DiagnosticCode({})", self)
    }
}

// Lexer

/// A byte that cannot start any token
pub const E_LEXER_UNEXPECTED_CHAR: DiagnosticCode = DiagnosticCode::new("E", 101);
/// Quoted string reached a newline or end of input
pub const E_LEXER_UNTERMINATED_STRING: DiagnosticCode = DiagnosticCode::new("E", 102);
/// `/*` without a matching `*/`
pub const E_LEXER_UNTERMINATED_COMMENT: DiagnosticCode = DiagnosticCode::new("E", 103);
/// Structurally invalid numeric literal
pub const E_LEXER_MALFORMED_NUMBER: DiagnosticCode = DiagnosticCode::new("E", 104);
/// Digit outside the literal's base
pub const E_LEXER_INVALID_DIGIT: DiagnosticCode = DiagnosticCode::new("E", 105);
/// Base prefix or exponent with no digits
pub const E_LEXER_MISSING_DIGITS: DiagnosticCode = DiagnosticCode::new("E", 106);
/// `...` or another impossible range spelling
pub const E_LEXER_INVALID_RANGE: DiagnosticCode = DiagnosticCode::new("E", 107);
/// Literal text no longer fits in the unit's arena
pub const E_LEXER_ARENA_EXHAUSTED: DiagnosticCode = DiagnosticCode::new("E", 108);
/// Re-reading token text from the input failed
pub const E_LEXER_INPUT: DiagnosticCode = DiagnosticCode::new("E", 109);
/// Literal or name bytes are not valid UTF-8
pub const E_LEXER_INVALID_UTF8: DiagnosticCode = DiagnosticCode::new("E", 110);

// Parser / code generation

/// Token with no prefix handler in expression position
pub const E_PARSER_UNEXPECTED_TOKEN: DiagnosticCode = DiagnosticCode::new("E", 201);
/// Token with no infix handler after an operand
pub const E_PARSER_UNEXPECTED_OPERATOR: DiagnosticCode = DiagnosticCode::new("E", 202);
/// A specific token was required
pub const E_PARSER_EXPECTED_TOKEN: DiagnosticCode = DiagnosticCode::new("E", 203);
/// Name already present in the symbol table
pub const E_PARSER_DUPLICATE_SYMBOL: DiagnosticCode = DiagnosticCode::new("E", 204);
/// Symbol table has no free slot
pub const E_PARSER_SYMBOL_TABLE_FULL: DiagnosticCode = DiagnosticCode::new("E", 205);
/// Reference to a name that was never declared
pub const E_PARSER_UNDEFINED_NAME: DiagnosticCode = DiagnosticCode::new("E", 206);
/// More variables than LOAD/STORE can address
pub const E_PARSER_TOO_MANY_VARIABLES: DiagnosticCode = DiagnosticCode::new("E", 207);
/// Expression nested deeper than `limits.max_depth`
pub const E_PARSER_TOO_DEEP: DiagnosticCode = DiagnosticCode::new("E", 208);
/// Limits handed to the compiler failed validation
pub const E_PARSER_INVALID_LIMITS: DiagnosticCode = DiagnosticCode::new("E", 209);

// Bytecode and file format

/// Write past the chunk's capacity
pub const E_CHUNK_CAPACITY: DiagnosticCode = DiagnosticCode::new("E", 301);
/// File does not start with the bytecode magic
pub const E_FORMAT_BAD_MAGIC: DiagnosticCode = DiagnosticCode::new("E", 302);
/// File ends inside the header or name
pub const E_FORMAT_TRUNCATED: DiagnosticCode = DiagnosticCode::new("E", 303);
/// Unit name does not fit the one-byte length field
pub const E_FORMAT_NAME_TOO_LONG: DiagnosticCode = DiagnosticCode::new("E", 304);
/// Reading or writing a bytecode file failed
pub const E_FORMAT_IO: DiagnosticCode = DiagnosticCode::new("E", 305);
/// Unit name in the header is not valid UTF-8
pub const E_FORMAT_INVALID_NAME: DiagnosticCode = DiagnosticCode::new("E", 306);

// VM

/// Pop from an empty operand stack
pub const E_VM_STACK_UNDERFLOW: DiagnosticCode = DiagnosticCode::new("E", 401);
/// Push onto a full operand stack
pub const E_VM_STACK_OVERFLOW: DiagnosticCode = DiagnosticCode::new("E", 402);
/// Byte that is not a known opcode
pub const E_VM_UNKNOWN_OPCODE: DiagnosticCode = DiagnosticCode::new("E", 403);
/// Instruction operands run past the end of the chunk
pub const E_VM_TRUNCATED_INSTRUCTION: DiagnosticCode = DiagnosticCode::new("E", 404);
/// End of chunk reached without RETURN
pub const E_VM_MISSING_RETURN: DiagnosticCode = DiagnosticCode::new("E", 405);
/// Bitwise operation on a non-integral value
pub const E_VM_NOT_AN_INTEGER: DiagnosticCode = DiagnosticCode::new("E", 406);
/// LOAD from a slot never written by STORE
pub const E_VM_UNINITIALIZED_VARIABLE: DiagnosticCode = DiagnosticCode::new("E", 407);

// Driver

/// Reading or writing a file failed
pub const E_DRIVER_IO: DiagnosticCode = DiagnosticCode::new("E", 501);
/// Configuration file could not be loaded
pub const E_DRIVER_CONFIG: DiagnosticCode = DiagnosticCode::new("E", 502);
