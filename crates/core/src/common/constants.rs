//! Architectural constants of the 21264 front end.
//!
//! These numbers come from the EV6 hardware definition and are not
//! configuration: queue depths, register-file geometry, and cache shape are
//! fixed by the chip being emulated.

/// Maximum number of instructions in flight (ROB depth and VPC ring depth).
pub const INFLIGHT_MAX: usize = 80;

/// Number of instructions handed to decode per I-cache fetch.
pub const NUM_FETCH_INS: usize = 4;

/// Integer issue queue depth.
pub const IQ_LEN: usize = 20;

/// Floating-point issue queue depth.
pub const FQ_LEN: usize = 15;

/// Integer physical register count.
pub const INT_PHYS_REGS: usize = 80;

/// Floating-point physical register count.
pub const FP_PHYS_REGS: usize = 72;

/// Integer architectural registers: R0-R31 plus the eight PAL shadows.
pub const INT_ARCH_REGS: usize = 40;

/// Floating-point architectural registers (no shadows exist for these).
pub const FP_ARCH_REGS: usize = 32;

/// Integer rename free-list capacity.
///
/// Must equal `INT_PHYS_REGS - INT_ARCH_REGS`; the register file constructor
/// asserts this relationship.
pub const INT_FREELIST_SIZE: usize = INT_PHYS_REGS - INT_ARCH_REGS;

/// Floating-point rename free-list capacity.
pub const FP_FREELIST_SIZE: usize = FP_PHYS_REGS - FP_ARCH_REGS;

/// The architectural register number that reads as zero and discards writes.
pub const UNMAPPED_REG: u8 = 31;

/// First shadow index in the extended integer map (R8 maps here in PAL mode).
pub const SHADOW_BASE: u8 = 32;

/// Shadow index for R25 in PAL mode.
pub const SHADOW_R25: u8 = 39;

/// I-cache associativity.
pub const ICACHE_WAYS: usize = 2;

/// I-cache set count (index bits [14:6] of the virtual address).
pub const ICACHE_SETS: usize = 512;

/// Instructions held by one I-cache line.
pub const ICACHE_LINE_INS: usize = 16;

/// Bytes in one I-cache line fill (16 instructions of 4 bytes).
pub const ICACHE_BUF_LEN: usize = 64;

/// Bytes in the packed on-disk/bus image of one I-cache line.
pub const ICACHE_LINE_IMAGE: usize = 128;

/// Instruction translation buffer entry count.
pub const ITB_LEN: usize = 128;

/// Base virtual-memory page size in bytes.
pub const PAGE_SIZE: u64 = 8192;

/// Maps an architectural integer register to its PAL-shadow index.
///
/// Registers R8-R14 and R25 have shadows; everything else maps to itself.
/// Floating-point registers are never shadowed.
#[inline]
pub const fn shadow_register(reg: u8, pal_mode: bool) -> u8 {
    if !pal_mode {
        return reg;
    }
    match reg {
        8..=14 => SHADOW_BASE + (reg - 8),
        25 => SHADOW_R25,
        _ => reg,
    }
}
