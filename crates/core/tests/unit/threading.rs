//! Threaded CPU assembly: driver thread, execution-box drain, and
//! shutdown.

use std::time::{Duration, Instant};

use axpsim_core::Config;
use axpsim_core::core::icache::LineAttrs;
use axpsim_core::isa::format::OpType;
use axpsim_core::sim::cpu::{Cpu, QueueSide};
use axpsim_core::sim::ports::{RecordingCbox, RecordingMbox};

use crate::common::build;

fn noop_line(words: &[u32]) -> [u32; 16] {
    let mut all = [build::nop(); 16];
    all[..words.len()].copy_from_slice(words);
    all
}

fn wait_until(deadline: Duration, mut done: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if done() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    done()
}

#[test]
fn the_driver_dispatches_and_an_exec_thread_retires() {
    let config = Config { reset_pc: 0x1000, ..Config::default() };
    let cpu = Cpu::new(
        &config,
        Box::new(RecordingMbox::default()),
        Box::new(RecordingCbox::default()),
    );
    // Reset fetches in PAL mode at the reset PC.
    cpu.fill_icache(
        0x1000,
        true,
        noop_line(&[build::addq(1, 2, 3), build::addq(3, 4, 5)]),
        LineAttrs { pal: true, access: 0xf, ..LineAttrs::default() },
    );

    let driver = cpu.start();

    // A stand-in Ebox drains the integer queue.
    let ebox = {
        let cpu = cpu.clone();
        std::thread::spawn(move || {
            while let Some((entry, ins)) = cpu.wait_queued(QueueSide::Int) {
                if ins.op_type == OpType::Branch {
                    cpu.complete_branch(QueueSide::Int, entry, false, None);
                } else {
                    cpu.complete(QueueSide::Int, entry, 7);
                }
            }
        })
    };

    cpu.set_run();

    let retired_enough = wait_until(Duration::from_secs(5), || cpu.stats().retired >= 2);
    cpu.shutdown();
    driver.join().expect("driver thread panicked");
    ebox.join().expect("ebox thread panicked");

    assert!(retired_enough, "front end never retired the ADDQ pair");
    let stats = cpu.stats();
    assert!(stats.dispatched >= 2);
    assert!(stats.retired >= 2);

    // Both ADDQ results were committed through the rename map.
    cpu.with_front(|ibox| {
        let pr = ibox.regs.int.source(3);
        assert_eq!(ibox.regs.int.value(pr), 7);
    });
}

#[test]
fn raise_from_another_box_wakes_the_driver_into_pal() {
    let config = Config { reset_pc: 0x1000, pal_base: 0x40_0000, ..Config::default() };
    let cpu = Cpu::new(
        &config,
        Box::new(RecordingMbox::default()),
        Box::new(RecordingCbox::default()),
    );
    let driver = cpu.start();
    cpu.set_run();

    // Nothing is cached: the driver parks on ITB_MISS immediately, then
    // an external interrupt arrives.
    cpu.with_front(|ibox| ibox.irq_lines = 0x3);
    let _ = wait_until(Duration::from_secs(2), || cpu.stats().events_recorded >= 1);

    let recorded = cpu.raise(axpsim_core::core::events::EventInfo::fetch_side(
        axpsim_core::Fault::Interrupt,
        axpsim_core::VirtPc::new(0x1000, false),
        0,
    ));
    // Either the interrupt recorded, or the ITB_MISS got there first and
    // swallowed it; both are legal outcomes of the race.
    let swallowed_or_recorded =
        wait_until(Duration::from_secs(2), || {
            let stats = cpu.stats();
            stats.events_recorded + stats.events_swallowed >= 2
        });

    cpu.shutdown();
    driver.join().expect("driver thread panicked");

    assert!(swallowed_or_recorded);
    let _ = recorded;
}
