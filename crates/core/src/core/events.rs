//! Exception and interrupt intake.
//!
//! Faults arrive from any box (including the Ibox itself). The first
//! event in a retirement window wins: while `exc_pend` is set, later
//! events are swallowed so the IPRs keep describing the fault PAL code
//! is about to handle. Recording an event populates the fault IPRs,
//! composes the PAL entry PC from `PAL_BASE` and the fault's function
//! code, and leaves the redirect for the driver to consume at the top of
//! its next fetch cycle.

use tracing::debug;

use crate::common::constants::UNMAPPED_REG;
use crate::common::error::Fault;
use crate::common::pc::{MajorType, VirtPc, pal_function_pc};
use crate::core::ipr::IprFile;
use crate::isa::opcodes as op;

/// Everything a fault reporter knows about the event.
#[derive(Debug, Clone, Copy)]
pub struct EventInfo {
    /// Which fault fired.
    pub fault: Fault,
    /// PC of the instruction associated with the fault.
    pub pc: VirtPc,
    /// Faulting virtual address, where meaningful.
    pub va: u64,
    /// Opcode of the associated instruction.
    pub opcode: u8,
    /// Architectural register associated with the fault.
    pub reg: u8,
    /// The faulting access was a write.
    pub write: bool,
}

impl EventInfo {
    /// An event with no associated instruction (fetch-side faults).
    pub fn fetch_side(fault: Fault, pc: VirtPc, va: u64) -> Self {
        Self { fault, pc, va, opcode: op::CALL_PAL, reg: UNMAPPED_REG, write: false }
    }
}

/// Latched redirect state shared between intake and the driver loop.
#[derive(Debug, Default)]
pub struct PendingEvent {
    /// An event is waiting for the driver to consume.
    pub armed: bool,
    /// PAL entry PC of the recorded event.
    pub pc: VirtPc,
}

impl PendingEvent {
    /// Takes the redirect, clearing the pending flag.
    pub fn consume(&mut self) -> Option<VirtPc> {
        if self.armed {
            self.armed = false;
            Some(self.pc)
        } else {
            None
        }
    }
}

/// Records `event` into the IPRs unless an earlier one is still pending.
///
/// Returns `true` when the event was recorded, `false` when swallowed.
/// `irq_lines` is latched into `ISUM.ei` (and cleared) for interrupts.
pub fn record_event(
    pending: &mut PendingEvent,
    iprs: &mut IprFile,
    irq_lines: &mut u8,
    major: MajorType,
    event: EventInfo,
) -> bool {
    if pending.armed {
        debug!(fault = %event.fault, "event swallowed; earlier exception pending");
        return false;
    }

    // HW_LD (0x1b) and HW_ST (0x1f) store as 0x03/0x07 in MM_STAT.
    let mut mm_opcode = event.opcode;
    if event.opcode == op::HW_LD || event.opcode == op::HW_ST {
        mm_opcode -= 0x18;
    }

    iprs.ibox.exc_addr = event.pc.raw();
    iprs.ebox.va = 0;
    iprs.ibox.exc_sum.0 = 0;
    iprs.mbox.mm_stat.0 = 0;

    match event.fault {
        Fault::DtbmDouble3 | Fault::DtbmDouble4 | Fault::ItbMiss | Fault::DtbmSingle => {
            iprs.mbox.mm_stat.set_opcodes(mm_opcode);
            iprs.mbox.mm_stat.set_wr(event.write);
            iprs.ebox.va = event.va;
            iprs.ibox.exc_sum.set_reg(event.reg);
        }
        Fault::DFault | Fault::Unaligned => {
            iprs.ibox.exc_sum.set_reg(event.reg);
            iprs.mbox.mm_stat.set_opcodes(mm_opcode);
            iprs.mbox.mm_stat.set_wr(event.write);
            iprs.mbox.mm_stat.set_fault_on_write(event.write);
            iprs.mbox.mm_stat.set_fault_on_read(!event.write);
            iprs.mbox.mm_stat.set_acv(true);
            iprs.ebox.va = event.va;
        }
        Fault::Iacv => {
            iprs.ibox.exc_sum.set_bad_iva(false);
            iprs.ebox.va = event.va;
        }
        Fault::Arith | Fault::Fen | Fault::MtFpcrTrap => {
            iprs.ibox.exc_sum.set_reg(event.reg);
        }
        Fault::OpcDec => {
            iprs.mbox.mm_stat.set_opcodes(mm_opcode);
        }
        Fault::Interrupt => {
            iprs.ibox.isum.set_ei(*irq_lines);
            *irq_lines = 0;
        }
        Fault::Mchk | Fault::ResetWakeup => {}
    }

    // Hardware quirk: a set integer-overflow bit sign-extends through the
    // top sixteen bits of EXC_SUM.
    if iprs.ibox.exc_sum.set_iov() {
        iprs.ibox.exc_sum.set_sext_set_iov(0xffff);
    }

    pending.pc = pal_function_pc(major, iprs.ibox.pal_base, event.fault.pal_function());
    pending.armed = true;
    debug!(fault = %event.fault, pc = event.pc.raw(), exc_pc = pending.pc.raw(), "event recorded");
    true
}
