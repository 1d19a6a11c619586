//! Fault taxonomy and fatal error definitions.
//!
//! Two kinds of "going wrong" exist in the front end and they are kept
//! apart deliberately:
//! 1. **Faults** are architectural events: they redirect the PC into PAL
//!    code and are part of normal operation (a TLB miss is how pages get
//!    mapped). They are plain values, not `Err`.
//! 2. **[`CoreError`]** covers conditions the emulated machine can never
//!    reach — a rename free-list underflow or an inconsistent decode table
//!    means the emulator itself is broken, and the driver aborts.

use thiserror::Error;

/// Architectural faults delivered through the event channel.
///
/// Each fault carries the PAL function code used to compose its entry-point
/// PC from `PAL_BASE`. The codes are 8-bit with bit 6 clear so the PAL PC
/// layout composes and decomposes losslessly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Fault {
    /// Double data-TLB miss, three-level page tables.
    DtbmDouble3 = 0x01,
    /// Double data-TLB miss, four-level page tables.
    DtbmDouble4 = 0x02,
    /// Floating-point instruction with the FP unit disabled.
    Fen = 0x03,
    /// Unaligned data access.
    Unaligned = 0x04,
    /// Single data-TLB miss.
    DtbmSingle = 0x05,
    /// Data access violation.
    DFault = 0x06,
    /// Illegal or reserved opcode.
    OpcDec = 0x07,
    /// Instruction access violation.
    Iacv = 0x08,
    /// Machine check.
    Mchk = 0x09,
    /// Instruction-TLB miss.
    ItbMiss = 0x0a,
    /// Arithmetic trap.
    Arith = 0x0b,
    /// Interrupt delivery.
    Interrupt = 0x0c,
    /// Trap raised by writing the floating-point control register.
    MtFpcrTrap = 0x0d,
    /// Reset or wakeup from sleep.
    ResetWakeup = 0x0e,
}

impl Fault {
    /// The PAL function code for this fault.
    #[inline]
    pub const fn pal_function(self) -> u32 {
        self as u32
    }
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::DtbmDouble3 => "DTBM_DOUBLE_3",
            Self::DtbmDouble4 => "DTBM_DOUBLE_4",
            Self::Fen => "FEN",
            Self::Unaligned => "UNALIGNED",
            Self::DtbmSingle => "DTBM_SINGLE",
            Self::DFault => "DFAULT",
            Self::OpcDec => "OPCDEC",
            Self::Iacv => "IACV",
            Self::Mchk => "MCHK",
            Self::ItbMiss => "ITB_MISS",
            Self::Arith => "ARITH",
            Self::Interrupt => "INTERRUPT",
            Self::MtFpcrTrap => "MT_FPCR_TRAP",
            Self::ResetWakeup => "RESET_WAKEUP",
        };
        f.write_str(name)
    }
}

/// Unrecoverable emulator failures.
///
/// Any of these aborts the driver loop with a diagnostic; none correspond
/// to behavior of the emulated machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The rename stage asked for a physical register and none was free.
    #[error("{file} rename free-list underflow")]
    FreeListUnderflow {
        /// Which register file ran dry ("integer" or "floating").
        file: &'static str,
    },

    /// The reorder buffer wrapped onto an entry that never retired.
    #[error("reorder buffer overflow: slot {slot} still in flight")]
    RobOverflow {
        /// The slot that should have been free.
        slot: usize,
    },

    /// An opcode fell outside every decode table.
    #[error("unknown opcode {opcode:#04x} at pc {pc:#x}")]
    UnknownOpcode {
        /// The offending major opcode.
        opcode: u8,
        /// Address of the instruction.
        pc: u64,
    },
}
