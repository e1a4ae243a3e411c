//! Human-readable chunk listings.

use std::fmt::Write;

use crate::chunk::Chunk;
use crate::opcode::OpCode;

/// Bytes shown per listing line.
const BYTE_COLUMNS: usize = 10;

/// Render `chunk` as a listing headed by `=== name ===`.
///
/// Each line shows the offset, the raw instruction bytes padded to ten
/// columns, the mnemonic and its decoded operands.
///
/// # Examples
///
/// ```
/// use hadron_bc::{disassemble, Chunk, OpCode};
///
/// let mut chunk = Chunk::new();
/// chunk.emit_move(0, 42.0).unwrap();
/// chunk.emit(OpCode::Return).unwrap();
///
/// let listing = disassemble(&chunk, "answer");
/// let lines: Vec<&str> = listing.lines().collect();
/// assert_eq!(lines[0], "=== answer ===");
/// assert!(lines[1].ends_with("MOVE #0 42"));
/// assert!(lines[2].starts_with(" 000a: 72 "));
/// assert!(lines[2].ends_with("RET"));
/// ```
pub fn disassemble(chunk: &Chunk, name: &str) -> String {
    let code = chunk.code();
    let mut out = String::with_capacity(code.len() * 8 + name.len() + 8);
    let _ = writeln!(out, "=== {} ===", name);

    let mut offset = 0;
    while offset < code.len() {
        match OpCode::from_byte(code[offset]) {
            None => {
                line(&mut out, offset, &code[offset..=offset]);
                let _ = writeln!(out, "UNKNOWN {:#04x}", code[offset]);
                offset += 1;
            }
            Some(op) => {
                let end = offset + op.width();
                if end > code.len() {
                    line(&mut out, offset, &code[offset..]);
                    let _ = writeln!(out, "{} <truncated>", op.mnemonic());
                    break;
                }
                line(&mut out, offset, &code[offset..end]);
                out.push_str(op.mnemonic());
                operands(&mut out, chunk, op, offset);
                out.push('\n');
                offset = end;
            }
        }
    }
    out
}

fn line(out: &mut String, offset: usize, bytes: &[u8]) {
    let _ = write!(out, " {:04x}: ", offset);
    for byte in bytes.iter().take(BYTE_COLUMNS) {
        let _ = write!(out, "{:02x} ", byte);
    }
    for _ in bytes.len()..BYTE_COLUMNS {
        out.push_str("   ");
    }
}

fn operands(out: &mut String, chunk: &Chunk, op: OpCode, offset: usize) {
    match op {
        OpCode::Move => {
            if let (Some(index), Some(value)) =
                (chunk.read_u8(offset + 1), chunk.read_f64(offset + 2))
            {
                let _ = write!(out, " #{} {}", index, value);
            }
        }
        OpCode::Load | OpCode::Store => {
            if let Some(slot) = chunk.read_u8(offset + 1) {
                let _ = write!(out, " {}", slot);
            }
        }
        _ => {}
    }
}
