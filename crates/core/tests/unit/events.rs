//! Event intake and PAL redirection scenarios.

use pretty_assertions::assert_eq;

use axpsim_core::Fault;
use axpsim_core::common::pc::{MajorType, VirtPc, pal_function_of};
use axpsim_core::core::events::EventInfo;

use crate::common::build;
use crate::common::harness::TestCore;

#[test]
fn second_event_is_swallowed_while_one_is_pending() {
    let mut core = TestCore::at(0x1000);
    core.load_line(0x1000, false, &[build::addq(1, 2, 3)]);
    let _ = core.step();

    // An arithmetic trap lands on the ADDQ.
    core.ibox.fault_inflight(0, Fault::Arith);
    let _ = core.retire();
    assert!(core.ibox.pending.armed);
    let arith_sum = core.iprs.ibox.exc_sum;
    let arith_va = core.iprs.ebox.va;

    // A DTB miss reported while the trap is pending is swallowed.
    let swallowed = core.ibox.raise(
        &mut core.iprs,
        EventInfo {
            fault: Fault::DtbmSingle,
            pc: VirtPc::new(0x5000, false),
            va: 0xdead,
            opcode: 0x29,
            reg: 7,
            write: false,
        },
    );

    assert!(!swallowed);
    assert_eq!(core.iprs.ibox.exc_sum, arith_sum);
    assert_eq!(core.iprs.ebox.va, arith_va);
    assert_eq!(core.iprs.mbox.mm_stat.opcodes(), 0);
    assert_eq!(core.ibox.stats.events_swallowed, 1);
}

#[test]
fn the_redirect_decomposes_back_to_base_and_fault() {
    let mut core = TestCore::at(0x1000);
    core.iprs.ibox.pal_base = 0x20_0000;
    core.load_line(0x1000, false, &[build::addq(1, 2, 3)]);
    let _ = core.step();

    core.ibox.fault_inflight(0, Fault::Arith);
    let _ = core.retire();

    let exc_pc = core.ibox.pending.pc;
    assert!(exc_pc.pal());
    let (base, func) = pal_function_of(MajorType::Ev6, exc_pc);
    assert_eq!(base, 0x20_0000);
    assert_eq!(func, Fault::Arith.pal_function());
}

#[test]
fn a_fault_squashes_younger_instructions() {
    let mut core = TestCore::at(0x1000);
    core.load_line(
        0x1000,
        false,
        &[build::addq(1, 2, 3), build::addq(3, 4, 5), build::addq(5, 6, 7)],
    );
    let _ = core.step();
    let free_at_dispatch = core.ibox.regs.int.free_len();

    // The Ebox picks up the oldest ADDQ and reports an arithmetic trap.
    let entry = core.ibox.iq.pop().unwrap();
    core.ibox.begin_execution(entry.rob_slot);
    core.ibox.fault_inflight(entry.rob_slot, Fault::Arith);
    core.ibox.iq.release(entry.index);
    let _ = core.retire();

    // All three renames are undone: two squashed, one discarded.
    assert_eq!(core.ibox.regs.int.free_len(), free_at_dispatch + 3);
    assert_eq!(core.ibox.regs.int.source(3), 3);
    assert_eq!(core.ibox.regs.int.source(5), 5);
    assert_eq!(core.ibox.regs.int.source(7), 7);
    assert!(core.ibox.rob.is_empty());
    assert!(core.ibox.iq.is_empty());
}

#[test]
fn the_driver_fetches_from_the_redirect_next_cycle() {
    let mut core = TestCore::at(0x1000);
    core.iprs.ibox.pal_base = 0x20_0000;
    core.load_line(0x1000, false, &[build::addq(1, 2, 3)]);
    let _ = core.step();
    core.ibox.fault_inflight(0, Fault::Mchk);
    let _ = core.retire();

    let exc_pc = core.ibox.pending.pc;
    // Install PAL code at the redirect so the fetch hits.
    core.load_line(exc_pc.addr() & !0x3f, true, &[build::nop()]);
    let _ = core.step();

    assert!(!core.ibox.pending.armed);
    assert!(core.ibox.vpc.current().pal());
    assert!(core.ibox.stats.icache_hits >= 1);
}
