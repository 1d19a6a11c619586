//! Rename/retire/rollback conservation, driven through the full front
//! end and as generative properties on the register file alone.

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use axpsim_core::common::pc::VirtPc;
use axpsim_core::core::regfile::RenameSet;

use crate::common::build;
use crate::common::harness::TestCore;

#[test]
fn a_dependency_chain_retires_with_the_freelist_conserved() {
    let mut core = TestCore::at(0x1000);
    core.load_line(
        0x1000,
        false,
        &[build::addq(1, 2, 3), build::addq(3, 4, 5), build::addq(5, 6, 7)],
    );
    let initial_free = core.ibox.regs.int.free_len();

    let _ = core.step();
    // Each instruction's source reads its predecessor's fresh rename.
    let first = core.ibox.rob.entry(0).clone();
    let second = core.ibox.rob.entry(1).clone();
    let third = core.ibox.rob.entry(2).clone();
    assert_eq!(second.src1, first.rename.dest);
    assert_eq!(third.src1, second.rename.dest);

    core.execute_all_with(false);
    let retired = core.retire();
    assert_eq!(retired, 4);

    assert_eq!(core.ibox.regs.int.free_len(), initial_free);
    assert_eq!(core.ibox.regs.int.source(3), first.rename.dest);
    assert_eq!(core.ibox.regs.int.source(5), second.rename.dest);
    assert_eq!(core.ibox.regs.int.source(7), third.rename.dest);
}

#[test]
fn rename_then_retire_without_execution_restores_the_freelist() {
    let mut core = TestCore::at(0x1000);
    core.load_line(0x1000, false, &[build::addq(1, 2, 3)]);
    let initial_free = core.ibox.regs.int.free_len();

    let _ = core.step();
    core.execute_all_with(false);
    let _ = core.retire();

    assert_eq!(core.ibox.regs.int.free_len(), initial_free);
}

#[test]
fn sources_of_r31_read_the_zero_register() {
    let mut core = TestCore::at(0x1000);
    core.load_line(0x1000, false, &[build::addq(31, 31, 5)]);

    let _ = core.step();
    let ins = core.ibox.rob.entry(0).clone();
    assert_eq!(ins.src1, 31);
    assert_eq!(ins.src2, 31);
    assert_eq!(core.ibox.regs.int.value(ins.src1), 0);

    core.execute_all_with(false);
    let _ = core.retire();
    // The zero register itself never moved.
    assert_eq!(core.ibox.regs.int.value(31), 0);
}

#[test]
fn a_predicted_branch_trains_only_at_retirement() {
    let mut core = TestCore::at(0x1000);
    core.load_line(0x1000, false, &[build::bne(1, 8)]);

    // Dispatch without retiring: the predictor must stay cold.
    let _ = core.step();
    let cold = core.ibox.predictor.predict(VirtPc::new(0x1000, false));
    assert!(!cold.taken);

    core.execute_all_with(true);
    let _ = core.retire();

    // Committed outcomes do train: a few more rounds flip the predictor.
    for _ in 0..6 {
        core.ibox.vpc.append(VirtPc::new(0x1000, false));
        let _ = core.step();
        core.execute_all_with(true);
        let _ = core.retire();
    }
    assert!(core.ibox.predictor.predict(VirtPc::new(0x1000, false)).taken);
}

proptest! {
    /// Any interleaving of renames and in-order retirements conserves
    /// free-list size plus live previous mappings.
    #[test]
    fn conservation_holds_under_random_traffic(ops in prop::collection::vec(0u8..8, 1..200)) {
        let mut regs = RenameSet::new();
        let freelist_size = regs.int.free_len();
        let mut in_flight: Vec<(u8, axpsim_core::core::regfile::RenameOutcome)> = Vec::new();

        for op in ops {
            if op < 6 {
                // Rename one of six architectural registers.
                let arch = 1 + op;
                if regs.int.free_len() > 0 {
                    let out = regs.int.rename(arch).unwrap();
                    in_flight.push((arch, out));
                }
            } else if op == 6 {
                // Retire the oldest in-flight rename.
                if !in_flight.is_empty() {
                    let (arch, out) = in_flight.remove(0);
                    regs.int.retire(arch, out, 0);
                }
            } else {
                // Flush: roll back everything, newest first.
                while let Some((arch, out)) = in_flight.pop() {
                    regs.int.rollback(arch, out);
                }
            }
            prop_assert_eq!(
                regs.int.free_len() + regs.int.pending_previous(),
                freelist_size
            );
        }
    }

    /// Rolling back every in-flight rename restores the reset mapping.
    #[test]
    fn full_rollback_restores_reset_mappings(archs in prop::collection::vec(1u8..30, 1..30)) {
        let mut regs = RenameSet::new();
        let initial_free = regs.int.free_len();
        let mut in_flight = Vec::new();
        for arch in archs {
            in_flight.push((arch, regs.int.rename(arch).unwrap()));
        }
        while let Some((arch, out)) = in_flight.pop() {
            regs.int.rollback(arch, out);
        }
        prop_assert_eq!(regs.int.free_len(), initial_free);
        for arch in 1..30u8 {
            prop_assert_eq!(regs.int.source(arch), u16::from(arch));
        }
    }
}
