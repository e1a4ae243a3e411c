//! Append-only bytecode buffer.
//!
//! A [`Chunk`] has a capacity fixed at construction. Writes append at the
//! cursor (the current length) and either fit completely or fail with
//! [`ChunkError::CapacityExceeded`] without touching the buffer.

use hadron_util::limits::DEFAULT_CHUNK_CAPACITY;

use crate::error::ChunkError;
use crate::opcode::{OpCode, MOVE_WIDTH};

/// A value with a fixed little-endian encoding.
pub trait Encode {
    /// Encoded size in bytes.
    fn width(&self) -> usize;

    /// Append the encoding to `out`.
    fn encode(&self, out: &mut Vec<u8>);
}

impl Encode for OpCode {
    fn width(&self) -> usize {
        1
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.push(self.byte());
    }
}

macro_rules! impl_encode_le {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Encode for $ty {
                fn width(&self) -> usize {
                    std::mem::size_of::<$ty>()
                }

                fn encode(&self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_encode_le!(u8, i8, u16, i16, u32, i32, u64, i64, f64);

impl Encode for [u8] {
    fn width(&self) -> usize {
        self.len()
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self);
    }
}

impl Encode for str {
    fn width(&self) -> usize {
        self.len()
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.as_bytes());
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn encode(&self, out: &mut Vec<u8>) {
        (**self).encode(out)
    }
}

/// The instruction stream of one compiled unit.
///
/// # Examples
///
/// ```
/// use hadron_bc::{Chunk, OpCode};
///
/// let mut chunk = Chunk::with_capacity(16);
/// chunk.emit_move(0, 42.0).unwrap();
/// chunk.emit(OpCode::Return).unwrap();
/// assert_eq!(chunk.cursor(), 11);
/// assert_eq!(chunk.read_f64(2), Some(42.0));
/// assert!(chunk.emit_move(1, 1.0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    code: Vec<u8>,
    capacity: usize,
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunk {
    /// Chunk with the default 1024-byte capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHUNK_CAPACITY)
    }

    /// Chunk holding at most `capacity` bytes.
    ///
    /// `capacity` is a logical ceiling; storage grows on demand past the
    /// default size.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            code: Vec::with_capacity(capacity.min(DEFAULT_CHUNK_CAPACITY)),
            capacity,
        }
    }

    /// Wrap existing instruction bytes, e.g. read back from a file.
    pub fn from_bytes(code: Vec<u8>, capacity: usize) -> Result<Self, ChunkError> {
        if code.len() > capacity {
            return Err(ChunkError::CapacityExceeded {
                needed: code.len(),
                remaining: capacity,
                capacity,
            });
        }
        Ok(Self { code, capacity })
    }

    /// Append one value, returning the offset it was written at.
    pub fn write<T: Encode + ?Sized>(&mut self, value: &T) -> Result<usize, ChunkError> {
        let offset = self.code.len();
        self.reserve(value.width())?;
        value.encode(&mut self.code);
        Ok(offset)
    }

    /// Append a single-byte instruction.
    pub fn emit(&mut self, op: OpCode) -> Result<usize, ChunkError> {
        self.write(&op)
    }

    /// Append `MOVE index value` as one unit.
    pub fn emit_move(&mut self, index: u8, value: f64) -> Result<usize, ChunkError> {
        let offset = self.code.len();
        self.reserve(MOVE_WIDTH)?;
        OpCode::Move.encode(&mut self.code);
        index.encode(&mut self.code);
        value.encode(&mut self.code);
        Ok(offset)
    }

    /// Append `LOAD slot` or `STORE slot` as one unit.
    pub fn emit_slot(&mut self, op: OpCode, slot: u8) -> Result<usize, ChunkError> {
        let offset = self.code.len();
        self.reserve(2)?;
        op.encode(&mut self.code);
        slot.encode(&mut self.code);
        Ok(offset)
    }

    fn reserve(&self, needed: usize) -> Result<(), ChunkError> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(ChunkError::CapacityExceeded {
                needed,
                remaining,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Offset of the next write.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.code.len()
    }

    /// Bytes written.
    #[inline]
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Whether nothing was written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Fixed capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes still free.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.code.len()
    }

    /// The instruction bytes.
    #[inline]
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    /// Byte at `offset`.
    pub fn read_u8(&self, offset: usize) -> Option<u8> {
        self.code.get(offset).copied()
    }

    /// Little-endian `f64` starting at `offset`.
    pub fn read_f64(&self, offset: usize) -> Option<f64> {
        let bytes = self.code.get(offset..offset.checked_add(8)?)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Some(f64::from_le_bytes(raw))
    }

    /// Opcode of the last complete instruction, found by walking the
    /// stream from the start.
    pub fn last_op(&self) -> Option<OpCode> {
        let mut offset = 0;
        let mut last = None;
        while offset < self.code.len() {
            let op = OpCode::from_byte(self.code[offset])?;
            last = Some(op);
            offset += op.width();
        }
        if offset == self.code.len() {
            last
        } else {
            None
        }
    }
}
