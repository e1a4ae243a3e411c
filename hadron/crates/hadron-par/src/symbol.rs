//! Fixed-size symbol table.
//!
//! Open addressing with linear probing over a slot count chosen at
//! construction. Names are truncated to [`MAX_NAME_LEN`] bytes before they
//! are hashed or compared, so two names sharing their first 31 bytes are
//! the same symbol.

use std::fmt;

use hadron_util::limits::DEFAULT_SYMBOL_SLOTS;
use thiserror::Error;

/// Longest stored name, in bytes.
pub const MAX_NAME_LEN: usize = 31;

/// What a symbol names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SymbolKind {
    /// Unclassified
    #[default]
    None,
    /// `fx` definition; location is the body start
    Function,
    /// Variable; location is the start of its initializer
    I32,
    /// String literal
    Str,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SymbolKind::None => "none",
            SymbolKind::Function => "function",
            SymbolKind::I32 => "i32",
            SymbolKind::Str => "str",
        };
        f.write_str(s)
    }
}

/// A named entity recorded during code generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    /// Name, at most [`MAX_NAME_LEN`] bytes
    pub name: String,
    /// Chunk offset associated with the symbol
    pub location: usize,
    /// Symbol kind
    pub kind: SymbolKind,
}

/// Symbol table insertion failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SymbolError {
    /// The (truncated) name is already present
    #[error("symbol '{name}' is already defined")]
    Duplicate {
        /// Offending name
        name: String,
    },

    /// Every slot is occupied
    #[error("out of free symbols: all {capacity} slots in use, cannot add '{name}'")]
    Full {
        /// Name that did not fit
        name: String,
        /// Slot count of the table
        capacity: usize,
    },
}

/// Cut `name` to at most [`MAX_NAME_LEN`] bytes on a character boundary.
///
/// # Examples
///
/// ```
/// use hadron_par::symbol::truncate_name;
///
/// assert_eq!(truncate_name("short"), "short");
/// assert_eq!(truncate_name(&"x".repeat(40)).len(), 31);
/// ```
pub fn truncate_name(name: &str) -> &str {
    if name.len() <= MAX_NAME_LEN {
        return name;
    }
    let mut end = MAX_NAME_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

/// djb2: `hash * 33 + byte`, seeded with 5381.
fn djb2(bytes: &[u8]) -> u64 {
    bytes.iter().fold(5381u64, |hash, &b| {
        hash.wrapping_shl(5).wrapping_add(hash).wrapping_add(u64::from(b))
    })
}

/// Open-addressing symbol table.
///
/// # Examples
///
/// ```
/// use hadron_par::{SymbolKind, SymbolTable};
///
/// let mut table = SymbolTable::with_slots(8);
/// table.insert("main", 1, SymbolKind::Function).unwrap();
/// assert_eq!(table.lookup("main").map(|s| s.location), Some(1));
/// assert!(table.insert("main", 9, SymbolKind::Function).is_err());
/// assert!(table.lookup("other").is_none());
/// ```
#[derive(Clone, Debug)]
pub struct SymbolTable {
    slots: Vec<Option<Symbol>>,
    len: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Table with the default 256 slots.
    pub fn new() -> Self {
        Self::with_slots(DEFAULT_SYMBOL_SLOTS)
    }

    /// Table with `slots` slots. A zero-slot table rejects every insert.
    pub fn with_slots(slots: usize) -> Self {
        Self {
            slots: vec![None; slots],
            len: 0,
        }
    }

    /// Slot a probe for `name` stops at: either the slot holding `name` or
    /// the first free one. `None` when every slot holds another name.
    fn probe(&self, name: &str) -> Option<usize> {
        let capacity = self.slots.len();
        if capacity == 0 {
            return None;
        }
        let start = (djb2(name.as_bytes()) % capacity as u64) as usize;
        (0..capacity)
            .map(|i| (start + i) % capacity)
            .find(|&idx| match &self.slots[idx] {
                None => true,
                Some(symbol) => symbol.name == name,
            })
    }

    /// Add a symbol, returning its slot.
    pub fn insert(
        &mut self,
        name: &str,
        location: usize,
        kind: SymbolKind,
    ) -> Result<usize, SymbolError> {
        let name = truncate_name(name);
        let idx = self.probe(name).ok_or_else(|| SymbolError::Full {
            name: name.to_string(),
            capacity: self.slots.len(),
        })?;
        if self.slots[idx].is_some() {
            return Err(SymbolError::Duplicate {
                name: name.to_string(),
            });
        }
        self.slots[idx] = Some(Symbol {
            name: name.to_string(),
            location,
            kind,
        });
        self.len += 1;
        Ok(idx)
    }

    /// Find a symbol by name.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        let idx = self.probe(truncate_name(name))?;
        self.slots[idx].as_ref()
    }

    /// Occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing was inserted.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Occupied entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.slots.iter().flatten()
    }
}
