//! Virtual program counter and PAL entry-point composition.
//!
//! The 21264 virtual PC is a 64-bit value carrying more than an address:
//! bit 0 is the PAL-mode flag, bit 1 is reserved, and bits [63:2] count
//! instructions (the byte address divided by four). PAL entry points are
//! composed bit-exactly from `PAL_BASE` and an 8-bit function code; the
//! 21164 and 21264 place the fields differently, so both layouts are here
//! and the CPU major type selects between them.
//!
//! All field access is explicit shift-and-mask. Nothing in this module
//! relies on struct layout.

use serde::Deserialize;

/// PAL-mode flag, bit 0 of the raw PC.
const PAL_BIT: u64 = 1;

/// Reserved bit 1 of the raw PC, always cleared on construction.
const RES_BIT: u64 = 1 << 1;

/// One instruction step in raw-PC units (bits [63:2] count instructions).
const PC_STEP: u64 = 1 << 2;

/// CPU generations that matter to PAL PC composition.
///
/// Everything from the 21264 (EV6) on uses the 49-bit-base layout; the
/// 21164 family uses the 50-bit-base layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MajorType {
    /// Alpha 21164 (EV56).
    Ev56,
    /// Alpha 21164PC (PCA56).
    Pca56,
    /// Alpha 21264 (EV6).
    #[default]
    Ev6,
    /// Alpha 21264A (EV67).
    Ev67,
    /// Alpha 21264B (EV68).
    Ev68,
}

impl MajorType {
    /// True for the 21264 family, which uses the 15-bit-aligned PAL base.
    #[inline]
    pub const fn is_ev6(self) -> bool {
        matches!(self, Self::Ev6 | Self::Ev67 | Self::Ev68)
    }
}

/// A virtual program counter with its embedded PAL-mode bit.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct VirtPc(u64);

impl VirtPc {
    /// Builds a VPC from a raw 64-bit value, clearing the reserved bit and
    /// forcing the PAL flag to `pal`.
    #[inline]
    pub const fn new(raw: u64, pal: bool) -> Self {
        let base = raw & !(PAL_BIT | RES_BIT);
        Self(if pal { base | PAL_BIT } else { base })
    }

    /// The raw 64-bit value, flags included.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// The byte address of the instruction (flag bits cleared).
    #[inline]
    pub const fn addr(self) -> u64 {
        self.0 & !(PAL_BIT | RES_BIT)
    }

    /// The instruction counter, bits [63:2].
    #[inline]
    pub const fn counter(self) -> u64 {
        self.0 >> 2
    }

    /// Whether this PC executes in PAL mode.
    #[inline]
    pub const fn pal(self) -> bool {
        self.0 & PAL_BIT != 0
    }

    /// The PC advanced by `n` instructions, preserving the PAL flag.
    #[inline]
    pub const fn incr(self, n: u64) -> Self {
        Self(self.0.wrapping_add(n.wrapping_mul(PC_STEP)))
    }

    /// The branch-displacement target: `self + 1 + displacement` in
    /// instruction units, preserving the PAL flag.
    #[inline]
    pub const fn displace(self, displacement: i64) -> Self {
        let steps = 1i64.wrapping_add(displacement);
        Self(self.0.wrapping_add((steps as u64).wrapping_mul(PC_STEP)))
    }
}

impl std::fmt::Debug for VirtPc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VirtPc({:#x}{})", self.addr(), if self.pal() { ", pal" } else { "" })
    }
}

/// Composes the PC of a PAL routine from `PAL_BASE` and a function code.
///
/// 21264 layout: palMode at bit 0, func[5:0] at bits [11:6], func[7] at
/// bit 12, must-be-one at bit 13, and the PAL base's bits [63:15].
/// 21164 layout: the same low fields, must-be-one at bit 13, and the base's
/// bits [63:14]. Bit 6 of the function code does not exist in either layout
/// and must be zero in the supplied `func`.
pub fn pal_function_pc(major: MajorType, pal_base: u64, func: u32) -> VirtPc {
    let func = u64::from(func);
    let low = ((func & 0x3f) << 6) | ((func >> 7 & 1) << 12) | (1 << 13) | PAL_BIT;
    let raw = if major.is_ev6() {
        (pal_base & !0x7fff) | low
    } else {
        (pal_base & !0x3fff) | low
    };
    VirtPc(raw)
}

/// Decomposes a PAL routine PC back into `(pal_base, func)`.
///
/// Inverse of [`pal_function_pc`] for any function code with bit 6 clear.
pub fn pal_function_of(major: MajorType, pc: VirtPc) -> (u64, u32) {
    let raw = pc.raw();
    let func = ((raw >> 6) & 0x3f) as u32 | (((raw >> 12) & 1) as u32) << 7;
    let base = if major.is_ev6() {
        raw & !0x7fff
    } else {
        raw & !0x3fff
    };
    (base, func)
}

/// The PC at a byte offset from `PAL_BASE`, in PAL mode.
pub fn pal_offset_pc(pal_base: u64, offset: u64) -> VirtPc {
    VirtPc::new(pal_base.wrapping_add(offset), true)
}
