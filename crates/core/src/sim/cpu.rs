//! Threaded CPU assembly.
//!
//! Each box runs as its own thread and owns its state behind its own
//! lock: the front end (Ibox and everything inside it) sits behind the
//! front mutex with a condition the driver sleeps on, the IPR file sits
//! behind the IPR mutex (acquired by event intake and HW_MFPR/HW_MTPR
//! retirement, with [`crate::core::ipr::bank_for`] naming the logical
//! owner), and CPU lifecycle is a small state machine behind its own
//! mutex and condition.
//!
//! Lock order is lifecycle → front → IPRs; nothing sleeps holding the
//! IPR lock.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;

use crate::config::Config;
use crate::core::events::EventInfo;
use crate::core::ibox::Ibox;
use crate::core::icache::LineAttrs;
use crate::core::ipr::IprFile;
use crate::core::queue::QueueEntry;
use crate::core::rob::Inflight;
use crate::sim::ports::{CachePort, MemoryPort};
use crate::stats::IboxStats;

/// CPU lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CpuState {
    /// Built but not yet told to run.
    #[default]
    Init,
    /// Executing.
    Run,
    /// Winding down; the driver thread exits at its next check.
    ShuttingDown,
}

/// Which issue queue an execution box drains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueSide {
    /// Integer queue (Ebox side).
    Int,
    /// Floating queue (Fbox side).
    Float,
}

struct FrontEnd {
    ibox: Ibox,
    mem: Box<dyn MemoryPort + Send>,
    cbox: Box<dyn CachePort + Send>,
}

struct Shared {
    lifecycle: Mutex<CpuState>,
    lifecycle_cond: Condvar,
    front: Mutex<FrontEnd>,
    front_cond: Condvar,
    iprs: Mutex<IprFile>,
    work_ready: Condvar,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to a running CPU front end.
#[derive(Clone)]
pub struct Cpu {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu").finish_non_exhaustive()
    }
}

impl Cpu {
    /// Builds a CPU in the `Init` state with the given collaborators.
    pub fn new(
        config: &Config,
        mem: Box<dyn MemoryPort + Send>,
        cbox: Box<dyn CachePort + Send>,
    ) -> Self {
        let mut iprs = IprFile::reset();
        iprs.ibox.pal_base = config.pal_base;
        iprs.ibox.i_ctl.set_call_pal_r23(config.call_pal_r23);
        Self {
            shared: Arc::new(Shared {
                lifecycle: Mutex::new(CpuState::Init),
                lifecycle_cond: Condvar::new(),
                front: Mutex::new(FrontEnd { ibox: Ibox::new(config), mem, cbox }),
                front_cond: Condvar::new(),
                iprs: Mutex::new(iprs),
                work_ready: Condvar::new(),
            }),
        }
    }

    /// Spawns the Ibox driver thread.
    ///
    /// The thread blocks until [`Cpu::set_run`], then loops: retire,
    /// fetch/dispatch, and sleep whenever there is nothing to fetch or
    /// nowhere to put it.
    pub fn start(&self) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        std::thread::spawn(move || {
            {
                let mut state = lock(&shared.lifecycle);
                while *state == CpuState::Init {
                    state = shared
                        .lifecycle_cond
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
            debug!("ibox driver running");

            loop {
                if *lock(&shared.lifecycle) != CpuState::Run {
                    break;
                }

                let mut front = lock(&shared.front);
                {
                    let mut iprs = lock(&shared.iprs);
                    let FrontEnd { ibox, mem, cbox } = &mut *front;
                    let _ = ibox.retire(&mut iprs, mem.as_mut());
                    let _ = ibox.step(&mut iprs, mem.as_mut(), cbox.as_mut());
                }
                if !front.ibox.iq.is_empty() || !front.ibox.fq.is_empty() {
                    shared.work_ready.notify_all();
                }

                if front.ibox.should_wait() {
                    // Timed so a shutdown between the check and the wait
                    // cannot strand the thread.
                    let (guard, _) = shared
                        .front_cond
                        .wait_timeout(front, Duration::from_millis(20))
                        .unwrap_or_else(PoisonError::into_inner);
                    drop(guard);
                }
            }
            debug!("ibox driver stopped");
        })
    }

    /// Moves the CPU into `Run` and wakes the driver.
    pub fn set_run(&self) {
        *lock(&self.shared.lifecycle) = CpuState::Run;
        self.shared.lifecycle_cond.notify_all();
    }

    /// Begins shutdown and wakes every sleeper.
    pub fn shutdown(&self) {
        *lock(&self.shared.lifecycle) = CpuState::ShuttingDown;
        self.shared.lifecycle_cond.notify_all();
        self.shared.front_cond.notify_all();
        self.shared.work_ready.notify_all();
    }

    /// Event intake for the other boxes (Mbox, Ebox, Cbox).
    ///
    /// Takes the front lock (the caller is not the Ibox), records under
    /// the IPR lock, and signals the driver.
    pub fn raise(&self, event: EventInfo) -> bool {
        let mut front = lock(&self.shared.front);
        let recorded = {
            let mut iprs = lock(&self.shared.iprs);
            front.ibox.raise(&mut iprs, event)
        };
        drop(front);
        self.shared.front_cond.notify_all();
        recorded
    }

    /// Cbox fill completion: installs a line and wakes the driver.
    pub fn fill_icache(&self, pc: u64, pal: bool, words: [u32; 16], attrs: LineAttrs) {
        let mut front = lock(&self.shared.front);
        front
            .ibox
            .icache
            .fill(crate::common::pc::VirtPc::new(pc, pal), words, attrs);
        drop(front);
        self.shared.front_cond.notify_all();
    }

    /// Execution-box side: takes the oldest queued instruction, marking
    /// it `Executing`. Returns the queue entry and a snapshot of the
    /// instruction.
    pub fn take_queued(&self, side: QueueSide) -> Option<(QueueEntry, Inflight)> {
        let mut front = lock(&self.shared.front);
        let entry = match side {
            QueueSide::Int => front.ibox.iq.pop(),
            QueueSide::Float => front.ibox.fq.pop(),
        }?;
        front.ibox.begin_execution(entry.rob_slot);
        let snapshot = front.ibox.rob.entry(entry.rob_slot).clone();
        Some((entry, snapshot))
    }

    /// Blocks until an instruction is queued on `side` or the CPU shuts
    /// down.
    pub fn wait_queued(&self, side: QueueSide) -> Option<(QueueEntry, Inflight)> {
        loop {
            if let Some(taken) = self.take_queued(side) {
                return Some(taken);
            }
            if *lock(&self.shared.lifecycle) == CpuState::ShuttingDown {
                return None;
            }
            let front = lock(&self.shared.front);
            let (guard, _) = self
                .shared
                .work_ready
                .wait_timeout(front, Duration::from_millis(20))
                .unwrap_or_else(PoisonError::into_inner);
            drop(guard);
        }
    }

    /// Execution-box writeback: result value, entry release, driver
    /// wakeup.
    pub fn complete(&self, side: QueueSide, entry: QueueEntry, value: u64) {
        let mut front = lock(&self.shared.front);
        front.ibox.complete(entry.rob_slot, value);
        match side {
            QueueSide::Int => front.ibox.iq.release(entry.index),
            QueueSide::Float => front.ibox.fq.release(entry.index),
        }
        drop(front);
        self.shared.front_cond.notify_all();
    }

    /// Execution-box writeback for branches.
    pub fn complete_branch(
        &self,
        side: QueueSide,
        entry: QueueEntry,
        taken: bool,
        target: Option<u64>,
    ) {
        let mut front = lock(&self.shared.front);
        front.ibox.complete_branch(entry.rob_slot, taken, target);
        match side {
            QueueSide::Int => front.ibox.iq.release(entry.index),
            QueueSide::Float => front.ibox.fq.release(entry.index),
        }
        drop(front);
        self.shared.front_cond.notify_all();
    }

    /// Snapshot of the front-end counters.
    pub fn stats(&self) -> IboxStats {
        lock(&self.shared.front).ibox.stats
    }

    /// Runs a closure against the front end under its lock (test and
    /// diagnostic support).
    pub fn with_front<R>(&self, f: impl FnOnce(&mut Ibox) -> R) -> R {
        f(&mut lock(&self.shared.front).ibox)
    }

    /// Runs a closure against the IPR file under the IPR lock.
    pub fn with_iprs<R>(&self, f: impl FnOnce(&mut IprFile) -> R) -> R {
        f(&mut lock(&self.shared.iprs))
    }
}
