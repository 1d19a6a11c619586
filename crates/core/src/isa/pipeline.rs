//! Execution-pipe assignment and issue-queue selection.
//!
//! The EV6 has four integer pipes (upper and lower pairs U0/U1, L0/L1)
//! and two floating pipes (add and multiply). Decode tags every
//! instruction with the set of pipes able to execute it; a tag of
//! [`PipeSet::None`] marks instructions with nothing to execute (trap
//! barriers and friends), which skip the issue queues entirely.
//!
//! Queue selection is by opcode except for the two transfer groups
//! (ITFP/FPTI), which split on the function code: the variant that reads
//! the integer file issues to the IQ, the reverse to the FQ.

use super::opcodes::{self as op, func};

/// The set of execution pipes an instruction may issue to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipeSet {
    /// Nothing to execute; complete at dispatch.
    #[default]
    None,
    /// Upper integer pipe 0 only.
    U0,
    /// Upper integer pipe 1 only.
    U1,
    /// Lower integer pipe 0 only.
    L0,
    /// Either upper integer pipe.
    U0U1,
    /// Either lower integer pipe.
    L0L1,
    /// Any integer pipe.
    AnyInt,
    /// Floating add pipe.
    FAdd,
    /// Floating multiply pipe.
    FMul,
    /// Either floating pipe.
    FEither,
}

/// Issue queue targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueTarget {
    /// Integer issue queue.
    Iq,
    /// Floating-point issue queue.
    Fq,
    /// Depends on the function code (ITFP/FPTI).
    Cond,
}

/// Assigns the pipe set for an `(opcode, function)` pair.
///
/// For HW_MFPR/HW_MTPR the caller passes the IPR index as the function.
pub fn pipeline_of(opcode: u8, function: u32) -> PipeSet {
    match opcode {
        op::CALL_PAL | op::HW_RET => PipeSet::U0U1,
        op::LDA | op::LDAH => PipeSet::AnyInt,
        op::LDBU | op::LDQ_U | op::LDW_U | op::HW_LD | op::STW | op::STB | op::STQ_U
        | op::HW_ST => PipeSet::L0L1,
        op::INTA | op::INTL => PipeSet::AnyInt,
        op::INTS => PipeSet::U0U1,
        op::INTM => PipeSet::U1,
        op::ITFP => PipeSet::L0,
        op::FLTV | op::FLTI => {
            // Multiply function codes have low hex digit 2; everything
            // else in these groups runs down the add pipe.
            if function & 0xf == 0x2 {
                PipeSet::FMul
            } else {
                PipeSet::FAdd
            }
        }
        op::FLTL => PipeSet::FAdd,
        op::MISC => match function {
            func::TRAPB | func::EXCB => PipeSet::None,
            func::RPCC | func::RC | func::RS => PipeSet::L0,
            _ => PipeSet::L0L1,
        },
        op::HW_MFPR | op::HW_MTPR => PipeSet::L0,
        op::JMP => PipeSet::L0,
        op::FPTI => match function {
            func::FTOIT | func::FTOIS => PipeSet::FAdd,
            _ => PipeSet::U0,
        },
        0x20..=0x2f => PipeSet::L0L1,
        op::BR | op::BSR | 0x38..=0x3f => PipeSet::U0U1,
        0x31..=0x33 | 0x35..=0x37 => PipeSet::FAdd,
        _ => PipeSet::None,
    }
}

/// Selects the issue queue for a major opcode.
///
/// Memory operations issue to the IQ for address computation even when the
/// data register is floating.
pub fn queue_of(opcode: u8) -> IssueTarget {
    match opcode {
        op::FLTV | op::FLTI | op::FLTL => IssueTarget::Fq,
        0x31..=0x33 | 0x35..=0x37 => IssueTarget::Fq,
        op::ITFP | op::FPTI => IssueTarget::Cond,
        _ => IssueTarget::Iq,
    }
}

/// Resolves [`IssueTarget::Cond`] using the function code.
pub fn resolve_queue(opcode: u8, function: u32) -> IssueTarget {
    match queue_of(opcode) {
        IssueTarget::Cond => {
            if opcode == op::ITFP {
                match function {
                    func::ITOFS | func::ITOFF | func::ITOFT => IssueTarget::Iq,
                    _ => IssueTarget::Fq,
                }
            } else {
                match function {
                    func::FTOIT | func::FTOIS => IssueTarget::Fq,
                    _ => IssueTarget::Iq,
                }
            }
        }
        target => target,
    }
}
