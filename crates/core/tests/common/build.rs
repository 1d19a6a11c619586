//! Alpha instruction-word builders.
//!
//! Hand-assembling words keeps the scenarios readable: each function
//! packs one format's fields exactly as the decoder unpacks them.

/// Memory-format instruction: `op ra, disp(rb)`.
pub fn mem(opcode: u8, ra: u32, rb: u32, disp: i16) -> u32 {
    (u32::from(opcode) << 26) | (ra << 21) | (rb << 16) | (disp as u16 as u32)
}

/// Integer operate, register form: `op ra, rb, rc`.
pub fn operate(opcode: u8, ra: u32, rb: u32, func: u32, rc: u32) -> u32 {
    (u32::from(opcode) << 26) | (ra << 21) | (rb << 16) | (func << 5) | rc
}

/// Floating operate: `op fa, fb, fc` with an 11-bit function.
pub fn fp_operate(opcode: u8, fa: u32, fb: u32, func: u32, fc: u32) -> u32 {
    (u32::from(opcode) << 26) | (fa << 21) | (fb << 16) | (func << 5) | fc
}

/// Branch-format instruction: `op ra, disp` (disp in instructions).
pub fn branch(opcode: u8, ra: u32, disp: i32) -> u32 {
    (u32::from(opcode) << 26) | (ra << 21) | ((disp as u32) & 0x1f_ffff)
}

/// CALL_PAL with the given function code.
pub fn call_pal(func: u32) -> u32 {
    func & 0x03ff_ffff
}

/// HW_MFPR: read IPR `index` into Ra.
pub fn hw_mfpr(ra: u32, index: u32) -> u32 {
    (0x19 << 26) | (ra << 21) | (index << 8)
}

/// HW_MTPR: write Rb into IPR `index`.
pub fn hw_mtpr(rb: u32, index: u32) -> u32 {
    (0x1d << 26) | (rb << 16) | (index << 8)
}

/// ADDQ ra, rb, rc.
pub fn addq(ra: u32, rb: u32, rc: u32) -> u32 {
    operate(0x10, ra, rb, 0x20, rc)
}

/// ADDT fa, fb, fc.
pub fn addt(fa: u32, fb: u32, fc: u32) -> u32 {
    fp_operate(0x16, fa, fb, 0x0a0, fc)
}

/// BNE ra, disp.
pub fn bne(ra: u32, disp: i32) -> u32 {
    branch(0x3d, ra, disp)
}

/// The canonical no-op: BIS R31, R31, R31.
pub fn nop() -> u32 {
    operate(0x11, 31, 31, 0x20, 31)
}

/// STQ ra, disp(rb).
pub fn stq(ra: u32, rb: u32, disp: i16) -> u32 {
    mem(0x2d, ra, rb, disp)
}

/// LDQ ra, disp(rb).
pub fn ldq(ra: u32, rb: u32, disp: i16) -> u32 {
    mem(0x29, ra, rb, disp)
}
