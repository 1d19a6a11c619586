//! Instruction formats and operation classification.
//!
//! The major opcode alone determines the instruction format and, for most
//! opcodes, the operation type. Six operate groups (0x10, 0x11, 0x15,
//! 0x16, 0x17, 0x18) need the function code to finish classification;
//! [`refine_op_type`] handles those.

use super::opcodes::{self as op, func};

/// The Alpha instruction formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsFormat {
    /// Integer conditional or unconditional branch.
    Bra,
    /// Floating-point conditional branch.
    FPBra,
    /// Floating-point operate.
    FP,
    /// Memory load/store.
    Mem,
    /// Memory-format jump (JMP/JSR/RET).
    Mbr,
    /// Memory-format with function code (MISC group).
    Mfc,
    /// Integer operate.
    Opr,
    /// CALL_PAL.
    Pcd,
    /// PAL-reserved hardware instructions (HW_LD/HW_ST/HW_RET/HW_MxPR).
    Pal,
    /// Reserved opcode.
    #[default]
    Res,
}

/// Coarse operation classes driving dispatch and retirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpType {
    /// Memory read (or read-like IPR/FPCR transfer).
    Load,
    /// Memory write (or write-like transfer).
    Store,
    /// Control transfer.
    Branch,
    /// Integer or floating arithmetic.
    Arith,
    /// Logical, shift, or compare operation.
    Logic,
    /// Operations with no data class (AMASK, IMPLVER).
    Oper,
    /// Not yet classified; refined via the function code.
    #[default]
    Other,
}

/// Per-opcode format table, indexed by major opcode.
const FORMATS: [InsFormat; 64] = {
    use InsFormat::{Bra, FP, FPBra, Mbr, Mem, Mfc, Opr, Pal, Pcd, Res};
    let mut t = [Res; 64];
    t[op::CALL_PAL as usize] = Pcd;
    let mut i = op::LDA as usize;
    while i <= op::STQ_U as usize {
        t[i] = Mem;
        i += 1;
    }
    t[op::INTA as usize] = Opr;
    t[op::INTL as usize] = Opr;
    t[op::INTS as usize] = Opr;
    t[op::INTM as usize] = Opr;
    t[op::ITFP as usize] = FP;
    t[op::FLTV as usize] = FP;
    t[op::FLTI as usize] = FP;
    t[op::FLTL as usize] = FP;
    t[op::MISC as usize] = Mfc;
    t[op::HW_MFPR as usize] = Pal;
    t[op::JMP as usize] = Mbr;
    t[op::HW_LD as usize] = Pal;
    t[op::FPTI as usize] = Opr;
    t[op::HW_MTPR as usize] = Pal;
    t[op::HW_RET as usize] = Pal;
    t[op::HW_ST as usize] = Pal;
    let mut i = op::LDF as usize;
    while i <= op::STQ_C as usize {
        t[i] = Mem;
        i += 1;
    }
    t[op::BR as usize] = Bra;
    t[op::FBEQ as usize] = FPBra;
    t[op::FBLT as usize] = FPBra;
    t[op::FBLE as usize] = FPBra;
    t[op::BSR as usize] = Bra;
    t[op::FBNE as usize] = FPBra;
    t[op::FBGE as usize] = FPBra;
    t[op::FBGT as usize] = FPBra;
    let mut i = op::BLBC as usize;
    while i <= op::BGT as usize {
        t[i] = Bra;
        i += 1;
    }
    t
};

/// Per-opcode base operation type, indexed by major opcode.
const OP_TYPES: [OpType; 64] = {
    use OpType::{Arith, Branch, Load, Logic, Oper, Other, Store};
    let mut t = [Other; 64];
    t[op::CALL_PAL as usize] = Oper;
    // LDA/LDAH only compute addresses; they never touch memory.
    t[op::LDA as usize] = Arith;
    t[op::LDAH as usize] = Arith;
    t[op::LDBU as usize] = Load;
    t[op::LDQ_U as usize] = Load;
    t[op::LDW_U as usize] = Load;
    t[op::STW as usize] = Store;
    t[op::STB as usize] = Store;
    t[op::STQ_U as usize] = Store;
    t[op::INTS as usize] = Logic;
    t[op::INTM as usize] = Arith;
    t[op::ITFP as usize] = Arith;
    t[op::JMP as usize] = Branch;
    t[op::HW_LD as usize] = Load;
    t[op::FPTI as usize] = Arith;
    t[op::HW_RET as usize] = Branch;
    t[op::HW_ST as usize] = Store;
    let mut i = op::LDF as usize;
    while i <= op::LDT as usize {
        t[i] = Load;
        i += 1;
    }
    let mut i = op::STF as usize;
    while i <= op::STT as usize {
        t[i] = Store;
        i += 1;
    }
    let mut i = op::LDL as usize;
    while i <= op::LDQ_L as usize {
        t[i] = Load;
        i += 1;
    }
    let mut i = op::STL as usize;
    while i <= op::STQ_C as usize {
        t[i] = Store;
        i += 1;
    }
    let mut i = op::BR as usize;
    while i <= op::BGT as usize {
        t[i] = Branch;
        i += 1;
    }
    t
};

/// The instruction format for a major opcode.
#[inline]
pub fn format_of(opcode: u8) -> InsFormat {
    FORMATS[opcode as usize & 0x3f]
}

/// The base operation type for a major opcode.
///
/// Returns [`OpType::Other`] for the operate groups whose class depends on
/// the function code; call [`refine_op_type`] to finish those.
#[inline]
pub fn op_type_of(opcode: u8) -> OpType {
    OP_TYPES[opcode as usize & 0x3f]
}

/// Finishes classification for the function-code-dependent groups.
///
/// The FPCR moves classify as Load/Store because they transfer a value
/// between register files rather than compute one, and RPCC/RC/RS read
/// machine state the way a load does.
pub fn refine_op_type(opcode: u8, function: u32) -> OpType {
    match opcode {
        op::INTA => {
            if function == func::CMPBGE {
                OpType::Logic
            } else {
                OpType::Arith
            }
        }
        op::INTL => match function {
            func::AMASK | func::IMPLVER => OpType::Oper,
            _ => OpType::Logic,
        },
        op::FLTV => match function {
            func::CMPGEQ | func::CMPGLT | func::CMPGLE | func::CMPGEQ_S | func::CMPGLT_S
            | func::CMPGLE_S => OpType::Logic,
            _ => OpType::Arith,
        },
        op::FLTI => match function {
            func::CMPTUN | func::CMPTEQ | func::CMPTLT | func::CMPTLE | func::CMPTUN_SU
            | func::CMPTEQ_SU | func::CMPTLT_SU | func::CMPTLE_SU => OpType::Logic,
            _ => OpType::Arith,
        },
        op::FLTL => match function {
            func::MT_FPCR => OpType::Load,
            func::MF_FPCR => OpType::Store,
            _ => OpType::Arith,
        },
        op::MISC => match function {
            func::RPCC | func::RC | func::RS => OpType::Load,
            _ => OpType::Store,
        },
        _ => OpType::Other,
    }
}
