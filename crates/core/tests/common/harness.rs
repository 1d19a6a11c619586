//! Single-threaded front-end harness.
//!
//! Drives an [`Ibox`] with recording Mbox/Cbox stubs, standing in for
//! the execution boxes by draining the issue queues with a caller-chosen
//! resolution policy.

use axpsim_core::Config;
use axpsim_core::common::pc::VirtPc;
use axpsim_core::core::ibox::{Ibox, StepOutcome};
use axpsim_core::core::icache::LineAttrs;
use axpsim_core::core::ipr::IprFile;
use axpsim_core::core::rob::Inflight;
use axpsim_core::isa::format::OpType;
use axpsim_core::sim::ports::{RecordingCbox, RecordingMbox};

use super::build;

/// The front end plus everything it talks to.
pub struct TestCore {
    /// The front end under test.
    pub ibox: Ibox,
    /// The IPR file.
    pub iprs: IprFile,
    /// Recording memory port.
    pub mem: RecordingMbox,
    /// Recording cache port.
    pub cbox: RecordingCbox,
}

impl TestCore {
    /// A core fetching non-PAL code at `pc`, with nothing cached.
    pub fn at(pc: u64) -> Self {
        let config = Config { reset_pc: pc, ..Config::default() };
        let mut ibox = Ibox::new(&config);
        ibox.vpc.append(VirtPc::new(pc, false));
        Self {
            ibox,
            iprs: IprFile::reset(),
            mem: RecordingMbox::default(),
            cbox: RecordingCbox::default(),
        }
    }

    /// Installs a fully accessible line at `pc`, padding with no-ops.
    pub fn load_line(&mut self, pc: u64, pal: bool, words: &[u32]) {
        let mut all = [build::nop(); 16];
        all[..words.len()].copy_from_slice(words);
        self.ibox.icache.fill(
            VirtPc::new(pc, pal),
            all,
            LineAttrs { pal, access: 0xf, ..LineAttrs::default() },
        );
    }

    /// One fetch cycle.
    pub fn step(&mut self) -> StepOutcome {
        self.ibox
            .step(&mut self.iprs, &mut self.mem, &mut self.cbox)
            .expect("step failed")
    }

    /// One retirement sweep; returns the number retired.
    pub fn retire(&mut self) -> usize {
        self.ibox.retire(&mut self.iprs, &mut self.mem)
    }

    /// Drains both issue queues, resolving every instruction through
    /// `resolve`, which returns either a value or a branch outcome.
    pub fn execute_all(&mut self, mut resolve: impl FnMut(&Inflight) -> Resolution) {
        loop {
            let entry = if let Some(e) = self.ibox.iq.pop() {
                (e, false)
            } else if let Some(e) = self.ibox.fq.pop() {
                (e, true)
            } else {
                break;
            };
            let (entry, from_fq) = entry;
            self.ibox.begin_execution(entry.rob_slot);
            let snapshot = self.ibox.rob.entry(entry.rob_slot).clone();
            match resolve(&snapshot) {
                Resolution::Value(v) => self.ibox.complete(entry.rob_slot, v),
                Resolution::Branch { taken, target } => {
                    self.ibox.complete_branch(entry.rob_slot, taken, target);
                }
            }
            if from_fq {
                self.ibox.fq.release(entry.index);
            } else {
                self.ibox.iq.release(entry.index);
            }
        }
    }

    /// Drains the queues resolving values to zero and branches to
    /// their displacement direction being `taken`.
    pub fn execute_all_with(&mut self, taken: bool) {
        self.execute_all(|ins| {
            if ins.op_type == OpType::Branch {
                Resolution::Branch { taken, target: None }
            } else {
                Resolution::Value(0)
            }
        });
    }
}

/// How the stand-in execution box resolves one instruction.
pub enum Resolution {
    /// A plain result value.
    Value(u64),
    /// A branch outcome.
    Branch {
        /// Committed direction.
        taken: bool,
        /// Resolved target for register-indirect branches.
        target: Option<u64>,
    },
}
