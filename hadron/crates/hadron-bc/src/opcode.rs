//! Instruction set.
//!
//! Every instruction is one opcode byte followed by a fixed number of
//! operand bytes determined by the opcode alone; there is no length
//! prefix. Operands are little-endian.

use std::fmt;

/// Bytecode operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    /// Pop the top of stack and stop with it as the result.
    Return = b'r',
    /// Push an immediate: `u8` constant index, then an `f64`.
    Move = b'm',
    /// `a + b`
    Add = b'+',
    /// `a - b`
    Sub = b'-',
    /// `a * b`
    Mul = b'*',
    /// `a / b`
    Div = b'/',
    /// `a ** b`
    Pow = b'p',
    /// `a % b`
    Rem = b'%',
    /// Logical and, yields 1 or 0
    LAnd = b'a',
    /// Logical or, yields 1 or 0
    LOr = b'o',
    /// Bitwise and of integral operands
    BAnd = b'&',
    /// Bitwise or of integral operands
    BOr = b'|',
    /// Bitwise xor of integral operands
    BXor = b'^',
    /// Bitwise complement of an integral operand
    BNot = b'~',
    /// Logical not, yields 1 or 0
    Not = b'!',
    /// Arithmetic negation
    Negate = b'n',
    /// Push variable slot `u8`
    Load = b'l',
    /// Copy top of stack into variable slot `u8`
    Store = b's',
    /// `a .. b`
    RangeExcl = 0x80,
    /// `a =.. b`
    RangeLIn = 0x81,
    /// `a ..= b`
    RangeRIn = 0x82,
    /// `a =..= b`
    RangeIncl = 0x83,
    /// Start of an inlined function body
    FxEntry = 0x90,
    /// End of an inlined function body
    FxExit = 0x91,
    /// `a == b`
    CmpEq = 0xA0,
    /// `a != b`
    CmpNeq = 0xA1,
    /// `a < b`
    CmpLt = 0xA2,
    /// `a <= b`
    CmpLeq = 0xA3,
    /// `a > b`
    CmpGt = 0xA4,
    /// `a >= b`
    CmpGeq = 0xA5,
    /// `a << b`
    LShift = 0xA6,
    /// `a >> b`
    RShift = 0xA7,
}

/// Encoded width of `MOVE`: opcode, constant index, `f64`.
pub const MOVE_WIDTH: usize = 10;

impl OpCode {
    /// Every opcode.
    pub const ALL: [OpCode; 32] = [
        OpCode::Rem,
        OpCode::Mul,
        OpCode::Add,
        OpCode::Sub,
        OpCode::Div,
        OpCode::Not,
        OpCode::BAnd,
        OpCode::BXor,
        OpCode::LAnd,
        OpCode::Load,
        OpCode::Move,
        OpCode::Negate,
        OpCode::LOr,
        OpCode::Pow,
        OpCode::Return,
        OpCode::Store,
        OpCode::BOr,
        OpCode::BNot,
        OpCode::RangeExcl,
        OpCode::RangeLIn,
        OpCode::RangeRIn,
        OpCode::RangeIncl,
        OpCode::FxEntry,
        OpCode::FxExit,
        OpCode::CmpEq,
        OpCode::CmpNeq,
        OpCode::CmpLt,
        OpCode::CmpLeq,
        OpCode::CmpGt,
        OpCode::CmpGeq,
        OpCode::LShift,
        OpCode::RShift,
    ];

    /// Decode an opcode byte.
    ///
    /// # Examples
    ///
    /// ```
    /// use hadron_bc::OpCode;
    ///
    /// assert_eq!(OpCode::from_byte(b'r'), Some(OpCode::Return));
    /// assert_eq!(OpCode::from_byte(0x83), Some(OpCode::RangeIncl));
    /// assert_eq!(OpCode::from_byte(0x00), None);
    /// ```
    pub fn from_byte(byte: u8) -> Option<OpCode> {
        let op = match byte {
            b'r' => OpCode::Return,
            b'm' => OpCode::Move,
            b'+' => OpCode::Add,
            b'-' => OpCode::Sub,
            b'*' => OpCode::Mul,
            b'/' => OpCode::Div,
            b'p' => OpCode::Pow,
            b'%' => OpCode::Rem,
            b'a' => OpCode::LAnd,
            b'o' => OpCode::LOr,
            b'&' => OpCode::BAnd,
            b'|' => OpCode::BOr,
            b'^' => OpCode::BXor,
            b'~' => OpCode::BNot,
            b'!' => OpCode::Not,
            b'n' => OpCode::Negate,
            b'l' => OpCode::Load,
            b's' => OpCode::Store,
            0x80 => OpCode::RangeExcl,
            0x81 => OpCode::RangeLIn,
            0x82 => OpCode::RangeRIn,
            0x83 => OpCode::RangeIncl,
            0x90 => OpCode::FxEntry,
            0x91 => OpCode::FxExit,
            0xA0 => OpCode::CmpEq,
            0xA1 => OpCode::CmpNeq,
            0xA2 => OpCode::CmpLt,
            0xA3 => OpCode::CmpLeq,
            0xA4 => OpCode::CmpGt,
            0xA5 => OpCode::CmpGeq,
            0xA6 => OpCode::LShift,
            0xA7 => OpCode::RShift,
            _ => return None,
        };
        Some(op)
    }

    /// The encoded byte.
    #[inline]
    pub fn byte(self) -> u8 {
        self as u8
    }

    /// Total instruction width in bytes, opcode included.
    pub fn width(self) -> usize {
        match self {
            OpCode::Move => MOVE_WIDTH,
            OpCode::Load | OpCode::Store => 2,
            _ => 1,
        }
    }

    /// Listing name used by the disassembler.
    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Return => "RET",
            OpCode::Move => "MOVE",
            OpCode::Add => "ADD",
            OpCode::Sub => "SUB",
            OpCode::Mul => "MUL",
            OpCode::Div => "DIV",
            OpCode::Pow => "POW",
            OpCode::Rem => "REM",
            OpCode::LAnd => "L_AND",
            OpCode::LOr => "L_OR",
            OpCode::BAnd => "B_AND",
            OpCode::BOr => "B_OR",
            OpCode::BXor => "B_XOR",
            OpCode::BNot => "B_NOT",
            OpCode::Not => "NOT",
            OpCode::Negate => "NEG",
            OpCode::Load => "LOAD",
            OpCode::Store => "STORE",
            OpCode::RangeExcl => "RANGE_EXCL",
            OpCode::RangeLIn => "RANGE_L_IN",
            OpCode::RangeRIn => "RANGE_R_IN",
            OpCode::RangeIncl => "RANGE_INCL",
            OpCode::FxEntry => "FX_ENTRY",
            OpCode::FxExit => "FX_EXIT",
            OpCode::CmpEq => "CMP_EQ",
            OpCode::CmpNeq => "CMP_NEQ",
            OpCode::CmpLt => "CMP_LT",
            OpCode::CmpLeq => "CMP_LEQ",
            OpCode::CmpGt => "CMP_GT",
            OpCode::CmpGeq => "CMP_GEQ",
            OpCode::LShift => "SHL",
            OpCode::RShift => "SHR",
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
