//! Stack machine that runs one chunk.
//!
//! The VM walks the chunk from offset 0, decoding one instruction at a
//! time. Values are `f64`; truth is `1`/`0`. Execution stops at the first
//! `RETURN`, whose popped operand is the unit's result.

use std::io::Write;
use std::ops;

use hadron_bc::{Chunk, OpCode};
use hadron_util::limits::DEFAULT_STACK_CAPACITY;
use hadron_util::Limits;
use tracing::{debug, trace};

use crate::error::{RuntimeError, RuntimeResult};
use crate::format::format_g;

/// Number of variable slots `LOAD`/`STORE` can address.
pub const VARIABLE_SLOTS: usize = 256;

/// Outcome of running one unit through the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterpretResult {
    /// The unit produced a value
    Ok,
    /// Lexing or parsing failed
    CompileError,
    /// The VM faulted
    RuntimeError,
}

impl InterpretResult {
    /// Whether the unit succeeded.
    pub fn is_ok(self) -> bool {
        self == InterpretResult::Ok
    }
}

impl<T> From<&RuntimeResult<T>> for InterpretResult {
    fn from(result: &RuntimeResult<T>) -> Self {
        match result {
            Ok(_) => InterpretResult::Ok,
            Err(_) => InterpretResult::RuntimeError,
        }
    }
}

/// The instruction being executed, for error reporting.
#[derive(Clone, Copy, Debug)]
struct Step {
    op: OpCode,
    offset: usize,
}

/// Bytecode interpreter.
///
/// # Examples
///
/// ```
/// use hadron_bc::{Chunk, OpCode};
/// use hadron_util::Limits;
/// use hadron_vm::Vm;
///
/// let mut chunk = Chunk::new();
/// chunk.emit_move(0, 6.0).unwrap();
/// chunk.emit_move(1, 7.0).unwrap();
/// chunk.emit(OpCode::Mul).unwrap();
/// chunk.emit(OpCode::Return).unwrap();
///
/// let mut vm = Vm::new(&Limits::default());
/// assert_eq!(vm.execute(&chunk).unwrap(), 42.0);
/// ```
#[derive(Debug, Clone)]
pub struct Vm {
    stack: Vec<f64>,
    capacity: usize,
    variables: Vec<Option<f64>>,
}

impl Vm {
    /// VM whose stack depth is `limits.stack_capacity`.
    pub fn new(limits: &Limits) -> Self {
        Self::with_stack_capacity(limits.stack_capacity)
    }

    /// VM with an explicit stack depth.
    pub fn with_stack_capacity(capacity: usize) -> Self {
        Self {
            stack: Vec::with_capacity(capacity.min(DEFAULT_STACK_CAPACITY)),
            capacity,
            variables: vec![None; VARIABLE_SLOTS],
        }
    }

    /// Operand stack as left by the last run, bottom first.
    pub fn stack(&self) -> &[f64] {
        &self.stack
    }

    /// Run `chunk` until its first `RETURN` and hand back the popped value.
    ///
    /// Stack and variables are cleared first; nothing carries over between
    /// runs.
    pub fn execute(&mut self, chunk: &Chunk) -> RuntimeResult<f64> {
        self.stack.clear();
        self.variables.fill(None);

        let code = chunk.code();
        debug!(bytes = code.len(), "execute");

        let mut ip = 0;
        while ip < code.len() {
            let byte = code[ip];
            let op = OpCode::from_byte(byte)
                .ok_or(RuntimeError::UnknownOpcode { byte, offset: ip })?;
            let step = Step { op, offset: ip };
            if code.len() - ip < op.width() {
                return Err(RuntimeError::TruncatedInstruction { op, offset: ip });
            }
            ip += op.width();

            trace!(offset = step.offset, op = %op, depth = self.stack.len(), "step");

            match op {
                OpCode::Return => {
                    let value = self.pop(step)?;
                    debug!(value, "return");
                    return Ok(value);
                },
                OpCode::Move => {
                    let value = chunk
                        .read_f64(step.offset + 2)
                        .ok_or(RuntimeError::TruncatedInstruction {
                            op,
                            offset: step.offset,
                        })?;
                    self.push(value, step)?;
                },

                OpCode::Add => self.arithmetic(step, <f64 as ops::Add>::add)?,
                OpCode::Sub => self.arithmetic(step, <f64 as ops::Sub>::sub)?,
                OpCode::Mul => self.arithmetic(step, <f64 as ops::Mul>::mul)?,
                OpCode::Div => self.arithmetic(step, <f64 as ops::Div>::div)?,
                OpCode::Rem => self.arithmetic(step, <f64 as ops::Rem>::rem)?,
                OpCode::Pow => self.arithmetic(step, f64::powf)?,

                OpCode::LAnd => self.compare(step, |a, b| *a != 0.0 && *b != 0.0)?,
                OpCode::LOr => self.compare(step, |a, b| *a != 0.0 || *b != 0.0)?,
                OpCode::CmpEq => self.compare(step, <f64 as PartialEq>::eq)?,
                OpCode::CmpNeq => self.compare(step, <f64 as PartialEq>::ne)?,
                OpCode::CmpLt => self.compare(step, <f64 as PartialOrd>::lt)?,
                OpCode::CmpLeq => self.compare(step, <f64 as PartialOrd>::le)?,
                OpCode::CmpGt => self.compare(step, <f64 as PartialOrd>::gt)?,
                OpCode::CmpGeq => self.compare(step, <f64 as PartialOrd>::ge)?,

                OpCode::BAnd => self.bitwise(step, |a, b| Some(a & b))?,
                OpCode::BOr => self.bitwise(step, |a, b| Some(a | b))?,
                OpCode::BXor => self.bitwise(step, |a, b| Some(a ^ b))?,
                OpCode::LShift => {
                    self.bitwise(step, |a, b| u32::try_from(b).ok().and_then(|n| a.checked_shl(n)))?
                },
                OpCode::RShift => {
                    self.bitwise(step, |a, b| u32::try_from(b).ok().and_then(|n| a.checked_shr(n)))?
                },
                OpCode::BNot => {
                    let value = self.pop(step)?;
                    let n = to_integer(value, step)?;
                    self.push(!n as f64, step)?;
                },

                OpCode::Negate => self.transform(step, |v| -v)?,
                OpCode::Not => self.transform(step, |v| truth(v == 0.0))?,

                OpCode::Load => {
                    let slot = code[step.offset + 1];
                    let value = self.variables[usize::from(slot)].ok_or(
                        RuntimeError::UninitializedVariable {
                            slot,
                            offset: step.offset,
                        },
                    )?;
                    self.push(value, step)?;
                },
                OpCode::Store => {
                    let slot = code[step.offset + 1];
                    let top = *self.stack.last().ok_or(RuntimeError::StackUnderflow {
                        op,
                        offset: step.offset,
                    })?;
                    self.variables[usize::from(slot)] = Some(top);
                },

                OpCode::RangeExcl | OpCode::RangeLIn | OpCode::RangeRIn | OpCode::RangeIncl => {
                    let (start, end) = self.pop_pair(step)?;
                    debug!(op = %op, start, end, "range");
                    self.push(0.0, step)?;
                },

                OpCode::FxEntry | OpCode::FxExit => {},
            }
        }

        Err(RuntimeError::MissingReturn { len: code.len() })
    }

    /// Run `chunk` and print its result to `out` followed by a newline.
    pub fn interpret<W: Write>(&mut self, chunk: &Chunk, out: &mut W) -> RuntimeResult<f64> {
        let value = self.execute(chunk)?;
        writeln!(out, "{}", format_g(value))?;
        Ok(value)
    }

    fn push(&mut self, value: f64, step: Step) -> RuntimeResult<()> {
        if self.stack.len() >= self.capacity {
            return Err(RuntimeError::StackOverflow {
                capacity: self.capacity,
                offset: step.offset,
            });
        }
        self.stack.push(value);
        Ok(())
    }

    fn pop(&mut self, step: Step) -> RuntimeResult<f64> {
        self.stack.pop().ok_or(RuntimeError::StackUnderflow {
            op: step.op,
            offset: step.offset,
        })
    }

    /// Pop `b` then `a`, returning `(a, b)`.
    fn pop_pair(&mut self, step: Step) -> RuntimeResult<(f64, f64)> {
        if self.stack.len() < 2 {
            return Err(RuntimeError::StackUnderflow {
                op: step.op,
                offset: step.offset,
            });
        }
        let b = self.pop(step)?;
        let a = self.pop(step)?;
        Ok((a, b))
    }

    fn arithmetic(&mut self, step: Step, f: impl Fn(f64, f64) -> f64) -> RuntimeResult<()> {
        let (a, b) = self.pop_pair(step)?;
        self.push(f(a, b), step)
    }

    fn compare(&mut self, step: Step, f: impl Fn(&f64, &f64) -> bool) -> RuntimeResult<()> {
        let (a, b) = self.pop_pair(step)?;
        self.push(truth(f(&a, &b)), step)
    }

    /// `f` returns `None` when `b` is outside the operation's domain.
    fn bitwise(&mut self, step: Step, f: impl Fn(i64, i64) -> Option<i64>) -> RuntimeResult<()> {
        let (a, b) = self.pop_pair(step)?;
        let (x, y) = (to_integer(a, step)?, to_integer(b, step)?);
        let result = f(x, y).ok_or(RuntimeError::NotAnInteger {
            op: step.op,
            value: b,
            offset: step.offset,
        })?;
        self.push(result as f64, step)
    }

    fn transform(&mut self, step: Step, f: impl Fn(f64) -> f64) -> RuntimeResult<()> {
        let top = self.stack.last_mut().ok_or(RuntimeError::StackUnderflow {
            op: step.op,
            offset: step.offset,
        })?;
        *top = f(*top);
        Ok(())
    }
}

fn truth(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

fn to_integer(value: f64, step: Step) -> RuntimeResult<i64> {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Ok(value as i64)
    } else {
        Err(RuntimeError::NotAnInteger {
            op: step.op,
            value,
            offset: step.offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_of(values: &[f64], ops: &[OpCode]) -> Chunk {
        let mut chunk = Chunk::new();
        for (i, value) in values.iter().enumerate() {
            chunk.emit_move(i as u8, *value).unwrap();
        }
        for op in ops {
            chunk.emit(*op).unwrap();
        }
        chunk
    }

    fn run(values: &[f64], ops: &[OpCode]) -> RuntimeResult<f64> {
        Vm::new(&Limits::default()).execute(&chunk_of(values, ops))
    }

    #[test]
    fn test_huge_stack_capacity_is_only_a_ceiling() {
        let mut vm = Vm::with_stack_capacity(usize::MAX);
        let chunk = chunk_of(&[1.0; 100], &[OpCode::Return]);
        assert_eq!(vm.execute(&chunk).unwrap(), 1.0);
        assert_eq!(vm.stack().len(), 99);
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(run(&[2.0, 3.0], &[OpCode::Add, OpCode::Return]).unwrap(), 5.0);
        assert_eq!(run(&[2.0, 3.0], &[OpCode::Sub, OpCode::Return]).unwrap(), -1.0);
        assert_eq!(run(&[7.0, 2.0], &[OpCode::Div, OpCode::Return]).unwrap(), 3.5);
        assert_eq!(run(&[7.0, 4.0], &[OpCode::Rem, OpCode::Return]).unwrap(), 3.0);
        assert_eq!(run(&[2.0, 10.0], &[OpCode::Pow, OpCode::Return]).unwrap(), 1024.0);
    }

    #[test]
    fn test_operand_order() {
        // 10 - 4 * 2 as postfix: 10 4 2 * -
        let result = run(&[10.0, 4.0, 2.0], &[OpCode::Mul, OpCode::Sub, OpCode::Return]);
        assert_eq!(result.unwrap(), 2.0);
    }

    #[test]
    fn test_comparisons_and_logic_yield_one_or_zero() {
        assert_eq!(run(&[1.0, 2.0], &[OpCode::CmpLt, OpCode::Return]).unwrap(), 1.0);
        assert_eq!(run(&[1.0, 2.0], &[OpCode::CmpGeq, OpCode::Return]).unwrap(), 0.0);
        assert_eq!(run(&[3.0, 3.0], &[OpCode::CmpEq, OpCode::Return]).unwrap(), 1.0);
        assert_eq!(run(&[5.0, 0.0], &[OpCode::LAnd, OpCode::Return]).unwrap(), 0.0);
        assert_eq!(run(&[5.0, 0.0], &[OpCode::LOr, OpCode::Return]).unwrap(), 1.0);
        assert_eq!(run(&[0.0], &[OpCode::Not, OpCode::Return]).unwrap(), 1.0);
        assert_eq!(run(&[-2.5], &[OpCode::Not, OpCode::Return]).unwrap(), 0.0);
    }

    #[test]
    fn test_bitwise() {
        assert_eq!(run(&[12.0, 10.0], &[OpCode::BAnd, OpCode::Return]).unwrap(), 8.0);
        assert_eq!(run(&[12.0, 10.0], &[OpCode::BOr, OpCode::Return]).unwrap(), 14.0);
        assert_eq!(run(&[12.0, 10.0], &[OpCode::BXor, OpCode::Return]).unwrap(), 6.0);
        assert_eq!(run(&[1.0, 4.0], &[OpCode::LShift, OpCode::Return]).unwrap(), 16.0);
        assert_eq!(run(&[-16.0, 2.0], &[OpCode::RShift, OpCode::Return]).unwrap(), -4.0);
        assert_eq!(run(&[5.0], &[OpCode::BNot, OpCode::Return]).unwrap(), -6.0);
    }

    #[test]
    fn test_bitwise_rejects_fractions() {
        let err = run(&[1.5, 1.0], &[OpCode::BAnd, OpCode::Return]).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::NotAnInteger { op: OpCode::BAnd, value, offset: 20 } if value == 1.5
        ));
        assert!(matches!(
            run(&[f64::INFINITY], &[OpCode::BNot, OpCode::Return]),
            Err(RuntimeError::NotAnInteger { .. })
        ));
    }

    #[test]
    fn test_shift_count_out_of_range() {
        for count in [-1.0, 64.0] {
            let err = run(&[1.0, count], &[OpCode::LShift, OpCode::Return]).unwrap_err();
            assert!(matches!(err, RuntimeError::NotAnInteger { value, .. } if value == count));
        }
    }

    #[test]
    fn test_negate_transforms_top() {
        let mut vm = Vm::new(&Limits::default());
        let chunk = chunk_of(&[1.0, 3.0], &[OpCode::Negate, OpCode::Return]);
        assert_eq!(vm.execute(&chunk).unwrap(), -3.0);
        assert_eq!(vm.stack(), &[1.0]);
    }

    #[test]
    fn test_ranges_push_placeholder() {
        for op in [
            OpCode::RangeExcl,
            OpCode::RangeLIn,
            OpCode::RangeRIn,
            OpCode::RangeIncl,
        ] {
            let mut vm = Vm::new(&Limits::default());
            assert_eq!(vm.execute(&chunk_of(&[1.0, 10.0], &[op, OpCode::Return])).unwrap(), 0.0);
            assert!(vm.stack().is_empty());
        }
    }

    #[test]
    fn test_function_markers_are_no_ops() {
        let result = run(&[4.0], &[OpCode::FxEntry, OpCode::FxExit, OpCode::Return]);
        assert_eq!(result.unwrap(), 4.0);
    }

    #[test]
    fn test_store_keeps_value_and_load_reads_it() {
        let mut chunk = Chunk::new();
        chunk.emit_move(0, 9.0).unwrap();
        chunk.emit_slot(OpCode::Store, 3).unwrap();
        chunk.emit_slot(OpCode::Load, 3).unwrap();
        chunk.emit(OpCode::Add).unwrap();
        chunk.emit(OpCode::Return).unwrap();
        assert_eq!(Vm::new(&Limits::default()).execute(&chunk).unwrap(), 18.0);
    }

    #[test]
    fn test_load_of_unset_slot() {
        let mut chunk = Chunk::new();
        chunk.emit_slot(OpCode::Load, 7).unwrap();
        chunk.emit(OpCode::Return).unwrap();
        let err = Vm::new(&Limits::default()).execute(&chunk).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::UninitializedVariable { slot: 7, offset: 0 }
        ));
    }

    #[test]
    fn test_variables_reset_between_runs() {
        let mut vm = Vm::new(&Limits::default());
        let mut store = Chunk::new();
        store.emit_move(0, 1.0).unwrap();
        store.emit_slot(OpCode::Store, 0).unwrap();
        store.emit(OpCode::Return).unwrap();
        vm.execute(&store).unwrap();

        let mut load = Chunk::new();
        load.emit_slot(OpCode::Load, 0).unwrap();
        load.emit(OpCode::Return).unwrap();
        assert!(vm.execute(&load).is_err());
    }

    #[test]
    fn test_underflow() {
        let err = run(&[1.0], &[OpCode::Add, OpCode::Return]).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::StackUnderflow { op: OpCode::Add, offset: 10 }
        ));
        assert!(matches!(
            run(&[], &[OpCode::Return]),
            Err(RuntimeError::StackUnderflow { op: OpCode::Return, .. })
        ));
    }

    #[test]
    fn test_overflow() {
        let mut vm = Vm::with_stack_capacity(2);
        let err = vm
            .execute(&chunk_of(&[1.0, 2.0, 3.0], &[OpCode::Return]))
            .unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::StackOverflow { capacity: 2, offset: 20 }
        ));
    }

    #[test]
    fn test_unknown_opcode() {
        let chunk = Chunk::from_bytes(vec![0x07], 1024).unwrap();
        let err = Vm::new(&Limits::default()).execute(&chunk).unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownOpcode { byte: 0x07, offset: 0 }));
    }

    #[test]
    fn test_truncated_move() {
        let chunk = Chunk::from_bytes(vec![b'm', 0, 0, 0], 1024).unwrap();
        let err = Vm::new(&Limits::default()).execute(&chunk).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::TruncatedInstruction { op: OpCode::Move, offset: 0 }
        ));
    }

    #[test]
    fn test_missing_return() {
        assert!(matches!(
            run(&[1.0, 2.0], &[OpCode::Add]),
            Err(RuntimeError::MissingReturn { len: 21 })
        ));
        assert!(matches!(
            run(&[], &[]),
            Err(RuntimeError::MissingReturn { len: 0 })
        ));
    }

    #[test]
    fn test_stops_at_first_return() {
        let result = run(&[1.0, 2.0], &[OpCode::Return, OpCode::Return]);
        assert_eq!(result.unwrap(), 2.0);
    }

    #[test]
    fn test_interpret_prints_result() {
        let mut out = Vec::new();
        let chunk = chunk_of(&[1.0, 3.0], &[OpCode::Div, OpCode::Return]);
        Vm::new(&Limits::default()).interpret(&chunk, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0.333333\n");
    }

    #[test]
    fn test_interpret_result_summary() {
        let ok: RuntimeResult<f64> = Ok(1.0);
        let err: RuntimeResult<f64> = Err(RuntimeError::MissingReturn { len: 0 });
        assert!(InterpretResult::from(&ok).is_ok());
        assert_eq!(InterpretResult::from(&err), InterpretResult::RuntimeError);
    }
}
