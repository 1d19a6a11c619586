//! Alpha instruction-word field extraction.
//!
//! Every Alpha instruction is 32 bits with the major opcode in bits
//! [31:26] and register fields at fixed positions; the remainder is
//! interpreted per format. [`InsWord`] exposes each field through a
//! shift-and-mask accessor so layout is identical on every target.

/// Bit mask for a 5-bit register field.
const REG_MASK: u32 = 0x1f;

/// A raw 32-bit Alpha instruction word.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct InsWord(pub u32);

impl InsWord {
    /// The major opcode, bits [31:26].
    #[inline]
    pub const fn opcode(self) -> u8 {
        (self.0 >> 26) as u8 & 0x3f
    }

    /// Register field Ra, bits [25:21].
    #[inline]
    pub const fn ra(self) -> u8 {
        (self.0 >> 21 & REG_MASK) as u8
    }

    /// Register field Rb, bits [20:16].
    #[inline]
    pub const fn rb(self) -> u8 {
        (self.0 >> 16 & REG_MASK) as u8
    }

    /// Register field Rc, bits [4:0].
    #[inline]
    pub const fn rc(self) -> u8 {
        (self.0 & REG_MASK) as u8
    }

    /// Branch-format displacement, bits [20:0], sign-extended.
    ///
    /// The value is in instruction units, not bytes.
    #[inline]
    pub const fn branch_disp(self) -> i64 {
        ((self.0 << 11) as i32 >> 11) as i64
    }

    /// Memory-format displacement, bits [15:0], sign-extended.
    #[inline]
    pub const fn mem_disp(self) -> i64 {
        self.0 as u16 as i16 as i64
    }

    /// Memory-format function code, bits [15:0] (MISC and jump groups).
    #[inline]
    pub const fn mem_func(self) -> u32 {
        self.0 & 0xffff
    }

    /// Jump hint, bits [15:14] of the jump group encoding.
    #[inline]
    pub const fn jmp_hint(self) -> u8 {
        (self.0 >> 14 & 0x3) as u8
    }

    /// Floating-operate function code, bits [15:5].
    #[inline]
    pub const fn fp_func(self) -> u32 {
        self.0 >> 5 & 0x7ff
    }

    /// Integer-operate function code, bits [11:5].
    #[inline]
    pub const fn opr_func(self) -> u32 {
        self.0 >> 5 & 0x7f
    }

    /// True when the integer-operate form carries a literal instead of Rb.
    #[inline]
    pub const fn opr_is_literal(self) -> bool {
        self.0 & (1 << 12) != 0
    }

    /// The 8-bit integer-operate literal, bits [20:13].
    #[inline]
    pub const fn opr_literal(self) -> u8 {
        (self.0 >> 13) as u8
    }

    /// CALL_PAL function code, bits [25:0].
    #[inline]
    pub const fn pal_func(self) -> u32 {
        self.0 & 0x03ff_ffff
    }

    /// HW_LD/HW_ST displacement, bits [11:0], sign-extended.
    #[inline]
    pub const fn hw_disp(self) -> i64 {
        ((self.0 << 20) as i32 >> 20) as i64
    }

    /// HW_LD/HW_ST length bit (quadword when set).
    #[inline]
    pub const fn hw_len(self) -> bool {
        self.0 & (1 << 12) != 0
    }

    /// HW_LD/HW_ST access type, bits [15:13].
    #[inline]
    pub const fn hw_type(self) -> u8 {
        (self.0 >> 13 & 0x7) as u8
    }

    /// HW_RET displacement, bits [12:0], sign-extended.
    #[inline]
    pub const fn hw_ret_disp(self) -> i64 {
        ((self.0 << 19) as i32 >> 19) as i64
    }

    /// HW_RET stall bit.
    #[inline]
    pub const fn hw_ret_stall(self) -> bool {
        self.0 & (1 << 13) != 0
    }

    /// HW_RET hint, bits [15:14].
    #[inline]
    pub const fn hw_ret_hint(self) -> u8 {
        (self.0 >> 14 & 0x3) as u8
    }

    /// HW_MFPR/HW_MTPR processor-register index, bits [15:8].
    #[inline]
    pub const fn hw_index(self) -> u16 {
        (self.0 >> 8 & 0xff) as u16
    }

    /// HW_MTPR scoreboard mask, bits [7:0].
    #[inline]
    pub const fn hw_scbd_mask(self) -> u8 {
        self.0 as u8
    }
}

impl std::fmt::Debug for InsWord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InsWord({:#010x}, op={:#04x})", self.0, self.opcode())
    }
}
