//! Fixed-capacity ceilings for one compilation unit.
//!
//! Every buffer in the pipeline has a hard ceiling chosen up front: the
//! bytecode chunk, the VM operand stack, the symbol table, the arena that
//! holds literal text and the parser's expression nesting. Overflowing any
//! of them is a defined error in the owning phase. The values are deserialized from the `[limits]` table of
//! `hadron.toml`; missing keys fall back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::error::{LimitsError, LimitsResult};

/// Default chunk capacity in bytes.
pub const DEFAULT_CHUNK_CAPACITY: usize = 1024;
/// Default operand stack depth.
pub const DEFAULT_STACK_CAPACITY: usize = 256;
/// Default number of symbol table slots.
pub const DEFAULT_SYMBOL_SLOTS: usize = 256;
/// Default literal arena size in bytes.
pub const DEFAULT_ARENA_BYTES: usize = 2048;
/// Default expression nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Largest accepted chunk capacity (16 MiB).
pub const MAX_CHUNK_CAPACITY: usize = 1 << 24;
/// Largest accepted operand stack depth.
pub const MAX_STACK_CAPACITY: usize = 1 << 20;
/// Largest accepted symbol table size.
pub const MAX_SYMBOL_SLOTS: usize = 65_536;
/// Largest accepted expression nesting; the parser recurses once per level.
pub const MAX_DEPTH: usize = 1024;

/// Resource ceilings shared by the lexer, parser, chunk and VM.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Limits {
    /// Maximum bytes of bytecode per unit.
    #[serde(default = "default_chunk_capacity")]
    pub chunk_capacity: usize,

    /// Maximum operand stack depth.
    #[serde(default = "default_stack_capacity")]
    pub stack_capacity: usize,

    /// Number of open-addressing slots in the symbol table.
    #[serde(default = "default_symbol_slots")]
    pub symbol_slots: usize,

    /// Bytes available for literal and identifier text.
    #[serde(default = "default_arena_bytes")]
    pub arena_bytes: usize,

    /// Deepest nesting of parentheses and prefix operators in one expression.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_chunk_capacity() -> usize {
    DEFAULT_CHUNK_CAPACITY
}

fn default_stack_capacity() -> usize {
    DEFAULT_STACK_CAPACITY
}

fn default_symbol_slots() -> usize {
    DEFAULT_SYMBOL_SLOTS
}

fn default_arena_bytes() -> usize {
    DEFAULT_ARENA_BYTES
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            chunk_capacity: DEFAULT_CHUNK_CAPACITY,
            stack_capacity: DEFAULT_STACK_CAPACITY,
            symbol_slots: DEFAULT_SYMBOL_SLOTS,
            arena_bytes: DEFAULT_ARENA_BYTES,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Limits {
    /// Check that every ceiling is non-zero and within its maximum.
    ///
    /// # Examples
    ///
    /// ```
    /// use hadron_util::Limits;
    ///
    /// assert!(Limits::default().validate().is_ok());
    ///
    /// let limits = Limits { stack_capacity: 0, ..Limits::default() };
    /// assert!(limits.validate().is_err());
    /// ```
    pub fn validate(&self) -> LimitsResult<()> {
        let fields = [
            ("chunk_capacity", self.chunk_capacity),
            ("stack_capacity", self.stack_capacity),
            ("symbol_slots", self.symbol_slots),
            ("arena_bytes", self.arena_bytes),
            ("max_depth", self.max_depth),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(LimitsError::Zero { name });
            }
        }
        let ceilings = [
            ("chunk_capacity", self.chunk_capacity, MAX_CHUNK_CAPACITY),
            ("stack_capacity", self.stack_capacity, MAX_STACK_CAPACITY),
            ("symbol_slots", self.symbol_slots, MAX_SYMBOL_SLOTS),
            ("max_depth", self.max_depth, MAX_DEPTH),
        ];
        for (name, value, max) in ceilings {
            if value > max {
                return Err(LimitsError::TooLarge { name, value, max });
            }
        }
        Ok(())
    }
}
