//! Fetch → decode → dispatch → retire scenarios.

use pretty_assertions::assert_eq;

use axpsim_core::Fault;
use axpsim_core::common::constants::{INFLIGHT_MAX, SHADOW_BASE};
use axpsim_core::common::pc::{MajorType, VirtPc, pal_function_of};
use axpsim_core::core::ibox::StepOutcome;
use axpsim_core::core::ipr::index;
use axpsim_core::core::rob::MemSlot;
use axpsim_core::sim::ports::MafKind;

use crate::common::build;
use crate::common::harness::TestCore;

#[test]
fn pal_mode_shadows_integer_but_not_floating_registers() {
    let mut core = TestCore::at(0x1000);
    core.load_line(0x1000, true, &[build::addq(8, 9, 10), build::addt(8, 9, 10)]);
    core.ibox.vpc.append(VirtPc::new(0x1000, true));

    let _ = core.step();

    let addq = core.ibox.rob.entry(0);
    assert_eq!(addq.a_src1, SHADOW_BASE);
    assert_eq!(addq.a_src2, SHADOW_BASE + 1);
    assert_eq!(addq.a_dest, 10);

    let addt = core.ibox.rob.entry(1);
    assert_eq!((addt.a_src1, addt.a_src2, addt.a_dest), (8, 9, 10));
    assert!(addt.dest_float);
}

#[test]
fn way_miss_with_no_translation_raises_itb_miss() {
    let mut core = TestCore::at(0x2000);

    let outcome = core.step();

    assert_eq!(outcome, StepOutcome::ItbMiss);
    assert!(core.ibox.pending.armed);
    assert_eq!(core.iprs.ibox.exc_addr, 0x2000);
    assert_eq!(core.iprs.ebox.va, 0x2000);
    assert_eq!(core.ibox.stats.icache_way_misses, 1);
    assert_eq!(core.ibox.stats.events_recorded, 1);
}

#[test]
fn way_miss_with_a_translation_requests_a_fill() {
    let mut core = TestCore::at(0x2000);
    core.ibox.itb.insert(0x2000, 0x40, 0, 0xf, false, 0);

    let outcome = core.step();

    let pa = (0x40 << 13) | 0x2000 % 8192;
    assert_eq!(outcome, StepOutcome::FillRequested { pa });
    assert_eq!(core.cbox.requests.len(), 1);
    assert_eq!(core.cbox.requests[0].kind, MafKind::Istream);
    assert_eq!(core.cbox.requests[0].pa, pa);
    assert_eq!(core.cbox.requests[0].len, 64);
}

#[test]
fn rob_wrap_returns_to_empty_after_a_full_cycle() {
    let mut core = TestCore::at(0x1000);
    // A line of pure no-ops: every dispatch completes immediately.
    core.load_line(0x1000, false, &[]);

    let mut dispatched = 0;
    while dispatched < INFLIGHT_MAX {
        match core.step() {
            StepOutcome::Dispatched(n) => dispatched += n,
            other => panic!("unexpected outcome {other:?}"),
        }
        let _ = core.retire();
        core.ibox.vpc.append(VirtPc::new(0x1000, false));
    }

    assert_eq!(dispatched, INFLIGHT_MAX);
    assert_eq!(core.ibox.rob.start(), core.ibox.rob.end());
    assert!(core.ibox.rob.is_empty());
    assert_eq!(core.ibox.stats.retired, INFLIGHT_MAX as u64);
}

#[test]
fn stores_commit_to_the_mbox_in_retirement_order() {
    let mut core = TestCore::at(0x1000);
    core.load_line(
        0x1000,
        false,
        &[build::stq(1, 2, 0), build::stq(3, 4, 8), build::ldq(5, 6, 0)],
    );

    let _ = core.step();
    core.execute_all_with(false);
    let retired = core.retire();

    assert_eq!(retired, 4);
    assert_eq!(core.mem.retired_writes, vec![MemSlot::Sq(0), MemSlot::Sq(1)]);
}

#[test]
fn mtpr_moves_a_register_value_into_the_ipr_file() {
    let mut core = TestCore::at(0x1000);
    // ADDQ produces into R3; the MTPR reads R3 through the rename map.
    core.load_line(
        0x1000,
        true,
        &[build::addq(1, 2, 3), build::hw_mtpr(3, u32::from(index::PAL_BASE))],
    );
    core.ibox.vpc.append(VirtPc::new(0x1000, true));

    let _ = core.step();
    core.execute_all(|ins| {
        if ins.opcode == 0x10 {
            crate::common::harness::Resolution::Value(0x0003_0000)
        } else {
            crate::common::harness::Resolution::Value(0)
        }
    });
    let _ = core.retire();

    assert_eq!(core.iprs.ibox.pal_base, 0x0003_0000);
}

#[test]
fn mfpr_reads_an_ipr_into_the_renamed_destination() {
    let mut core = TestCore::at(0x1000);
    core.iprs.ibox.pal_base = 0x8000;
    core.load_line(0x1000, true, &[build::hw_mfpr(5, u32::from(index::PAL_BASE))]);
    core.ibox.vpc.append(VirtPc::new(0x1000, true));

    let _ = core.step();
    core.execute_all_with(false);
    let _ = core.retire();

    let pr = core.ibox.regs.int.source(5);
    assert_eq!(core.ibox.regs.int.value(pr), 0x8000);
}

#[test]
fn predicted_taken_branch_prefetches_an_uncached_target() {
    let mut core = TestCore::at(0x1000);
    core.load_line(0x1000, false, &[build::bne(1, 0x100)]);
    // Map the target so the prefetch can translate it.
    core.ibox.itb.insert(0x1000 + 4 + 0x400, 0x99, 0, 0xf, false, 0);

    // Train until the branch predicts taken, refetching each round.
    for _ in 0..8 {
        let _ = core.step();
        core.execute_all_with(true);
        let _ = core.retire();
        core.ibox.vpc.append(VirtPc::new(0x1000, false));
    }

    assert!(
        core.cbox.requests.iter().any(|r| r.kind == MafKind::Istream),
        "no prefetch was issued for the branch target"
    );
    assert!(core.ibox.stats.fetch_redirects > 0);
}

#[test]
fn reserved_opcodes_redirect_through_opcdec() {
    let mut core = TestCore::at(0x1000);
    core.iprs.ibox.pal_base = 0x20_0000;
    // Opcode 0x03 is reserved on the 21264.
    core.load_line(0x1000, false, &[0x03 << 26]);

    let outcome = core.step();

    assert_eq!(outcome, StepOutcome::IllegalOpcode);
    assert!(core.ibox.pending.armed);
    assert_eq!(core.iprs.ibox.exc_addr, 0x1000);
    assert_eq!(core.iprs.mbox.mm_stat.opcodes(), 0x03);
    assert!(core.ibox.rob.is_empty());
    // The redirect lands in the OPCDEC PAL routine.
    let (base, func) = pal_function_of(MajorType::Ev6, core.ibox.pending.pc);
    assert_eq!(base, 0x20_0000);
    assert_eq!(func, Fault::OpcDec.pal_function());
}

#[test]
fn call_pal_renames_its_linkage_register() {
    let mut core = TestCore::at(0x1000);
    core.load_line(0x1000, false, &[build::call_pal(0x83)]);

    let _ = core.step();

    let ins = core.ibox.rob.entry(0).clone();
    assert_eq!(ins.a_dest, 27);
    assert_eq!(ins.function, 0x83);
    // The linkage register got a fresh physical mapping.
    assert_eq!(core.ibox.regs.int.source(27), ins.rename.dest);

    // With I_CTL.call_pal_r23 set, the linkage moves to R23.
    let mut core = TestCore::at(0x1000);
    core.iprs.ibox.i_ctl.set_call_pal_r23(true);
    core.load_line(0x1000, false, &[build::call_pal(0x83)]);
    let _ = core.step();
    assert_eq!(core.ibox.rob.entry(0).a_dest, 23);
}

#[test]
fn conditional_branches_issue_to_the_fq_when_floating() {
    let mut core = TestCore::at(0x1000);
    core.load_line(0x1000, false, &[build::branch(0x31, 2, 4), build::bne(1, 4)]);

    let _ = core.step();

    assert_eq!(core.ibox.fq.len(), 1);
    assert_eq!(core.ibox.iq.len(), 1);
}
