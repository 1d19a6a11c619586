//! Reorder buffer: the ring of in-flight instructions.
//!
//! A fixed ring of [`INFLIGHT_MAX`] slots with two cursors: `start` names
//! the oldest in-flight instruction, `end` the next allocation. The live
//! range is `[start, end)` modulo wrap; `start == end` is empty and
//! `(end + 1) % N == start` is full. Slots are allocated at dispatch and
//! released only by in-order retirement (or a flush), so the ring order
//! *is* program order.

use crate::common::constants::INFLIGHT_MAX;
use crate::common::error::{CoreError, Fault};
use crate::common::pc::VirtPc;
use crate::core::regfile::RenameOutcome;
use crate::isa::format::{InsFormat, OpType};
use crate::isa::pipeline::PipeSet;

/// Lifecycle of an in-flight instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstrState {
    /// Slot is unoccupied (initial state, and after retirement).
    #[default]
    Retired,
    /// Dispatched into an issue queue.
    Queued,
    /// Picked up by an execution box.
    Executing,
    /// Execution finished; value parked here until the in-order sweep.
    WaitingRetirement,
}

/// Memory-queue slot handed out by the Mbox at dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemSlot {
    /// Load-queue slot.
    Lq(u8),
    /// Store-queue slot.
    Sq(u8),
}

/// One decoded, renamed, in-flight instruction.
#[derive(Debug, Clone, Default)]
pub struct Inflight {
    /// Wrapping per-instruction id, for trace correlation.
    pub unique_id: u8,
    /// Instruction format.
    pub format: InsFormat,
    /// Major opcode.
    pub opcode: u8,
    /// Function code (or IPR index for HW_MFPR/HW_MTPR).
    pub function: u32,
    /// Branch or memory displacement, sign-extended.
    pub displacement: i64,
    /// Integer-operate literal, when the literal form is used.
    pub literal: Option<u8>,
    /// Architectural source 1 (31 = unused).
    pub a_src1: u8,
    /// Architectural source 2 (31 = unused).
    pub a_src2: u8,
    /// Architectural destination (31 = discarded).
    pub a_dest: u8,
    /// Renamed physical source 1.
    pub src1: u16,
    /// Renamed physical source 2.
    pub src2: u16,
    /// Renamed physical destination with its rollback record.
    pub rename: RenameOutcome,
    /// Source 1 reads the floating file.
    pub src1_float: bool,
    /// Source 2 reads the floating file.
    pub src2_float: bool,
    /// Destination writes the floating file.
    pub dest_float: bool,
    /// True when the instruction names a destination field at all.
    pub has_dest: bool,
    /// Operation class.
    pub op_type: OpType,
    /// Execution-pipe assignment.
    pub pipeline: PipeSet,
    /// The instruction's own VPC.
    pub pc: VirtPc,
    /// A branch prediction was recorded for this instruction.
    pub predicted: bool,
    /// Predicted direction.
    pub predicted_taken: bool,
    /// Local predictor's vote at prediction time.
    pub local_taken: bool,
    /// Global predictor's vote at prediction time.
    pub global_taken: bool,
    /// Actual direction, written by the executing box.
    pub branch_taken: bool,
    /// Resolved target for register-indirect branches (raw VPC).
    pub branch_target: Option<u64>,
    /// LQ/SQ slot for memory operations.
    pub mem_slot: Option<MemSlot>,
    /// Lifecycle state.
    pub state: InstrState,
    /// Result value, written by the executing box.
    pub dest_value: u64,
    /// Fault recorded during execution, delivered at retirement.
    pub exc: Option<Fault>,
    /// HW_MFPR/HW_MTPR scoreboard mask.
    pub scbd_mask: u8,
    /// HW_LD/HW_ST length bit.
    pub hw_len: bool,
    /// HW_LD/HW_ST access type.
    pub hw_type: u8,
}

/// The reorder buffer.
#[derive(Debug)]
pub struct Rob {
    slots: Vec<Inflight>,
    start: usize,
    end: usize,
}

impl Default for Rob {
    fn default() -> Self {
        Self::new()
    }
}

impl Rob {
    /// Creates an empty ROB; every slot begins `Retired`.
    pub fn new() -> Self {
        let mut slots = Vec::with_capacity(INFLIGHT_MAX);
        slots.resize_with(INFLIGHT_MAX, Inflight::default);
        Self { slots, start: 0, end: 0 }
    }

    /// Oldest in-flight slot index.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Next allocation slot index.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// True when nothing is in flight.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when allocating one more entry would collide with `start`.
    #[inline]
    pub fn is_full(&self) -> bool {
        (self.end + 1) % INFLIGHT_MAX == self.start
    }

    /// Number of in-flight entries.
    pub fn len(&self) -> usize {
        (self.end + INFLIGHT_MAX - self.start) % INFLIGHT_MAX
    }

    /// Claims the next slot, or `Ok(None)` when the ring is full and the
    /// driver must wait for retirement to drain.
    ///
    /// Every slot outside the live range is `Retired`; wrapping onto one
    /// that is not means retirement can no longer drain the ring, and the
    /// emulator aborts rather than overwrite an in-flight instruction.
    pub fn allocate(&mut self) -> Result<Option<usize>, CoreError> {
        if self.is_full() {
            return Ok(None);
        }
        let slot = self.end;
        if self.slots[slot].state != InstrState::Retired {
            return Err(CoreError::RobOverflow { slot });
        }
        self.end = (self.end + 1) % INFLIGHT_MAX;
        self.slots[slot] = Inflight::default();
        Ok(Some(slot))
    }

    /// Borrow of one slot.
    #[inline]
    pub fn entry(&self, slot: usize) -> &Inflight {
        &self.slots[slot]
    }

    /// Mutable borrow of one slot.
    #[inline]
    pub fn entry_mut(&mut self, slot: usize) -> &mut Inflight {
        &mut self.slots[slot]
    }

    /// Marks the oldest entry retired and advances `start`.
    pub fn retire_oldest(&mut self) {
        debug_assert!(!self.is_empty());
        self.slots[self.start].state = InstrState::Retired;
        self.start = (self.start + 1) % INFLIGHT_MAX;
    }

    /// In-flight slot indices, oldest first.
    ///
    /// The wrap case walks in two passes: `start` to the physical end of
    /// the ring, then the beginning of the ring to `end`.
    pub fn live_slots(&self) -> impl Iterator<Item = usize> + '_ {
        let (first, second) = if self.end >= self.start {
            (self.start..self.end, 0..0)
        } else {
            (self.start..INFLIGHT_MAX, 0..self.end)
        };
        first.chain(second)
    }

    /// In-flight slot indices newer than `slot`, newest first.
    pub fn slots_newer_than(&self, slot: usize) -> Vec<usize> {
        let mut newer: Vec<usize> = self.live_slots().skip_while(|&s| s != slot).skip(1).collect();
        newer.reverse();
        newer
    }

    /// Discards every entry newer than `slot`, rewinding `end`.
    ///
    /// The caller is responsible for rolling back each discarded rename
    /// first (see `slots_newer_than`).
    pub fn truncate_after(&mut self, slot: usize) {
        for s in self.slots_newer_than(slot) {
            self.slots[s].state = InstrState::Retired;
        }
        self.end = (slot + 1) % INFLIGHT_MAX;
    }
}
