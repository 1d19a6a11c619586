//! Alpha AXP major opcodes and the function codes decode cares about.
//!
//! Major opcodes occupy bits [31:26] of every instruction word. The full
//! 0x00-0x3f space is defined; 0x01-0x07 are reserved on the 21264.

/// CALL_PAL.
pub const CALL_PAL: u8 = 0x00;
/// Load address.
pub const LDA: u8 = 0x08;
/// Load address high.
pub const LDAH: u8 = 0x09;
/// Load zero-extended byte.
pub const LDBU: u8 = 0x0a;
/// Load unaligned quadword.
pub const LDQ_U: u8 = 0x0b;
/// Load zero-extended word.
pub const LDW_U: u8 = 0x0c;
/// Store word.
pub const STW: u8 = 0x0d;
/// Store byte.
pub const STB: u8 = 0x0e;
/// Store unaligned quadword.
pub const STQ_U: u8 = 0x0f;
/// Integer arithmetic operate group.
pub const INTA: u8 = 0x10;
/// Integer logical operate group.
pub const INTL: u8 = 0x11;
/// Integer shift operate group.
pub const INTS: u8 = 0x12;
/// Integer multiply operate group.
pub const INTM: u8 = 0x13;
/// Integer-to-floating transfer and FP square-root group.
pub const ITFP: u8 = 0x14;
/// VAX floating-point operate group.
pub const FLTV: u8 = 0x15;
/// IEEE floating-point operate group.
pub const FLTI: u8 = 0x16;
/// Floating-point operate group (converts, FPCR moves).
pub const FLTL: u8 = 0x17;
/// Miscellaneous group (memory barriers, RPCC, FETCH).
pub const MISC: u8 = 0x18;
/// PAL-reserved: move from processor register.
pub const HW_MFPR: u8 = 0x19;
/// Jump group (JMP/JSR/RET/JSR_COROUTINE).
pub const JMP: u8 = 0x1a;
/// PAL-reserved: load.
pub const HW_LD: u8 = 0x1b;
/// Integer group: sign extension, counts, and floating-to-integer moves.
pub const FPTI: u8 = 0x1c;
/// PAL-reserved: move to processor register.
pub const HW_MTPR: u8 = 0x1d;
/// PAL-reserved: return from PAL code.
pub const HW_RET: u8 = 0x1e;
/// PAL-reserved: store.
pub const HW_ST: u8 = 0x1f;
/// Load VAX F-float.
pub const LDF: u8 = 0x20;
/// Load VAX G-float.
pub const LDG: u8 = 0x21;
/// Load IEEE S-float.
pub const LDS: u8 = 0x22;
/// Load IEEE T-float.
pub const LDT: u8 = 0x23;
/// Store VAX F-float.
pub const STF: u8 = 0x24;
/// Store VAX G-float.
pub const STG: u8 = 0x25;
/// Store IEEE S-float.
pub const STS: u8 = 0x26;
/// Store IEEE T-float.
pub const STT: u8 = 0x27;
/// Load sign-extended longword.
pub const LDL: u8 = 0x28;
/// Load quadword.
pub const LDQ: u8 = 0x29;
/// Load longword locked.
pub const LDL_L: u8 = 0x2a;
/// Load quadword locked.
pub const LDQ_L: u8 = 0x2b;
/// Store longword.
pub const STL: u8 = 0x2c;
/// Store quadword.
pub const STQ: u8 = 0x2d;
/// Store longword conditional.
pub const STL_C: u8 = 0x2e;
/// Store quadword conditional.
pub const STQ_C: u8 = 0x2f;
/// Unconditional branch.
pub const BR: u8 = 0x30;
/// Floating branch if equal to zero.
pub const FBEQ: u8 = 0x31;
/// Floating branch if less than zero.
pub const FBLT: u8 = 0x32;
/// Floating branch if less than or equal to zero.
pub const FBLE: u8 = 0x33;
/// Branch to subroutine.
pub const BSR: u8 = 0x34;
/// Floating branch if not equal to zero.
pub const FBNE: u8 = 0x35;
/// Floating branch if greater than or equal to zero.
pub const FBGE: u8 = 0x36;
/// Floating branch if greater than zero.
pub const FBGT: u8 = 0x37;
/// Branch if low bit clear.
pub const BLBC: u8 = 0x38;
/// Branch if equal to zero.
pub const BEQ: u8 = 0x39;
/// Branch if less than zero.
pub const BLT: u8 = 0x3a;
/// Branch if less than or equal to zero.
pub const BLE: u8 = 0x3b;
/// Branch if low bit set.
pub const BLBS: u8 = 0x3c;
/// Branch if not equal to zero.
pub const BNE: u8 = 0x3d;
/// Branch if greater than or equal to zero.
pub const BGE: u8 = 0x3e;
/// Branch if greater than zero.
pub const BGT: u8 = 0x3f;

/// Function codes consulted during classification and register decoding.
pub mod func {
    /// INTA: compare bytes (the one logical op in the arithmetic group).
    pub const CMPBGE: u32 = 0x0f;

    /// INTL: architecture mask.
    pub const AMASK: u32 = 0x61;
    /// INTL: implementation version.
    pub const IMPLVER: u32 = 0x6c;

    /// FLTV: compare G equal.
    pub const CMPGEQ: u32 = 0x0a5;
    /// FLTV: compare G less than.
    pub const CMPGLT: u32 = 0x0a6;
    /// FLTV: compare G less than or equal.
    pub const CMPGLE: u32 = 0x0a7;
    /// FLTV: compare G equal, software completion.
    pub const CMPGEQ_S: u32 = 0x4a5;
    /// FLTV: compare G less than, software completion.
    pub const CMPGLT_S: u32 = 0x4a6;
    /// FLTV: compare G less than or equal, software completion.
    pub const CMPGLE_S: u32 = 0x4a7;

    /// FLTI: compare T unordered.
    pub const CMPTUN: u32 = 0x0a4;
    /// FLTI: compare T equal.
    pub const CMPTEQ: u32 = 0x0a5;
    /// FLTI: compare T less than.
    pub const CMPTLT: u32 = 0x0a6;
    /// FLTI: compare T less than or equal.
    pub const CMPTLE: u32 = 0x0a7;
    /// FLTI: compare T unordered, software completion + underflow.
    pub const CMPTUN_SU: u32 = 0x5a4;
    /// FLTI: compare T equal, software completion + underflow.
    pub const CMPTEQ_SU: u32 = 0x5a5;
    /// FLTI: compare T less than, software completion + underflow.
    pub const CMPTLT_SU: u32 = 0x5a6;
    /// FLTI: compare T less than or equal, software completion + underflow.
    pub const CMPTLE_SU: u32 = 0x5a7;

    /// FLTL: move to floating-point control register.
    pub const MT_FPCR: u32 = 0x024;
    /// FLTL: move from floating-point control register.
    pub const MF_FPCR: u32 = 0x025;

    /// MISC: trap barrier.
    pub const TRAPB: u32 = 0x0000;
    /// MISC: exception barrier.
    pub const EXCB: u32 = 0x0400;
    /// MISC: memory barrier.
    pub const MB: u32 = 0x4000;
    /// MISC: write memory barrier.
    pub const WMB: u32 = 0x4400;
    /// MISC: read processor cycle counter.
    pub const RPCC: u32 = 0xc000;
    /// MISC: read and clear.
    pub const RC: u32 = 0xe000;
    /// MISC: read and set.
    pub const RS: u32 = 0xf000;

    /// ITFP: integer to F-float.
    pub const ITOFF: u32 = 0x014;
    /// ITFP: integer to S-float.
    pub const ITOFS: u32 = 0x004;
    /// ITFP: integer to T-float.
    pub const ITOFT: u32 = 0x024;

    /// FPTI: T-float to integer.
    pub const FTOIT: u32 = 0x70;
    /// FPTI: S-float to integer.
    pub const FTOIS: u32 = 0x78;
}
