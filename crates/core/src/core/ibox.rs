//! The Ibox driver: fetch, decode/rename, dispatch, and retirement.
//!
//! One `step` performs one fetch cycle: consume a pending exception
//! redirect if armed, probe the I-cache, and on a hit push up to four
//! instructions through decode/rename into the ROB and the issue
//! queues. Misses turn into Cbox fill requests or ITB_MISS events.
//!
//! `retire` is the in-order sweep: it walks the ROB from the oldest
//! entry, committing values, training the branch predictor on committed
//! outcomes, handing stores to the Mbox, applying HW_MFPR/HW_MTPR, and
//! stopping at the first entry still in flight. Mispredicts and faults
//! detected here squash everything younger, walking the rename maps
//! back through each squashed entry's recorded previous mapping.

use tracing::trace;

use crate::common::constants::{FQ_LEN, ICACHE_BUF_LEN, IQ_LEN, UNMAPPED_REG};
use crate::common::error::{CoreError, Fault};
use crate::common::pc::{MajorType, VirtPc};
use crate::config::Config;
use crate::core::decode::{DecodeContext, decode_rename};
use crate::core::events::{EventInfo, PendingEvent, record_event};
use crate::core::icache::{AccessMode, FetchGroup, FetchOutcome, Icache};
use crate::core::ipr::{IprFile, index};
use crate::core::itb::{Itb, TranslateError};
use crate::core::predictor::TournamentPredictor;
use crate::core::queue::IssueQueue;
use crate::core::regfile::RenameSet;
use crate::core::rob::{Inflight, InstrState, MemSlot, Rob};
use crate::core::vpc::VpcRing;
use crate::isa::format::{InsFormat, OpType};
use crate::isa::opcodes::{self as op, func};
use crate::isa::pipeline::{IssueTarget, PipeSet, resolve_queue};
use crate::sim::ports::{CachePort, MafKind, MemoryPort};
use crate::stats::IboxStats;

/// What one fetch cycle accomplished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// This many instructions entered the ROB.
    Dispatched(usize),
    /// I-cache miss with a valid translation; a fill was requested.
    FillRequested {
        /// Physical address handed to the Cbox.
        pa: u64,
    },
    /// No ITB entry covers the fetch PC; an ITB_MISS event was raised.
    ItbMiss,
    /// The ITB forbids fetching in the current mode; IACV was raised.
    AccessViolation,
    /// Fetch reached a reserved opcode; an OPCDEC event was raised.
    IllegalOpcode,
    /// ROB or an issue queue is full; nothing was consumed.
    Stalled,
}

/// The instruction-issue box.
#[derive(Debug)]
pub struct Ibox {
    major: MajorType,
    /// In-flight VPC ring.
    pub vpc: VpcRing,
    /// Tournament branch predictor.
    pub predictor: TournamentPredictor,
    /// Instruction cache.
    pub icache: Icache,
    /// Instruction translation buffer.
    pub itb: Itb,
    /// Rename maps and physical register files.
    pub regs: RenameSet,
    /// Reorder buffer.
    pub rob: Rob,
    /// Integer issue queue.
    pub iq: IssueQueue,
    /// Floating-point issue queue.
    pub fq: IssueQueue,
    /// Latched exception redirect.
    pub pending: PendingEvent,
    /// Raw external interrupt request lines.
    pub irq_lines: u8,
    instr_counter: u8,
    /// Front-end counters.
    pub stats: IboxStats,
}

impl Ibox {
    /// Builds the front end in its reset state, fetching from
    /// `config.reset_pc`.
    pub fn new(config: &Config) -> Self {
        let mut vpc = VpcRing::new();
        vpc.append(VirtPc::new(config.reset_pc, true));
        Self {
            major: config.major_type,
            vpc,
            predictor: TournamentPredictor::new(&config.predictor),
            icache: Icache::new(),
            itb: Itb::new(),
            regs: RenameSet::new(),
            rob: Rob::new(),
            iq: IssueQueue::new("IQ", IQ_LEN),
            fq: IssueQueue::new("FQ", FQ_LEN),
            pending: PendingEvent::default(),
            irq_lines: 0,
            instr_counter: 0,
            stats: IboxStats::default(),
        }
    }

    /// Records an event, honoring the first-event-wins policy.
    ///
    /// Callers outside the Ibox thread go through the `sim` layer, which
    /// takes the locks this function assumes are held.
    pub fn raise(&mut self, iprs: &mut IprFile, event: EventInfo) -> bool {
        let recorded =
            record_event(&mut self.pending, iprs, &mut self.irq_lines, self.major, event);
        if recorded {
            self.stats.events_recorded += 1;
        } else {
            self.stats.events_swallowed += 1;
        }
        recorded
    }

    /// One fetch/decode/dispatch cycle.
    pub fn step(
        &mut self,
        iprs: &mut IprFile,
        mem: &mut dyn MemoryPort,
        cbox: &mut dyn CachePort,
    ) -> Result<StepOutcome, CoreError> {
        let fetch_pc = match self.pending.consume() {
            Some(exc_pc) => {
                self.vpc.append(exc_pc);
                exc_pc
            }
            None => self.vpc.current(),
        };

        let mode = AccessMode::from_cm(iprs.ibox.ier_cm.cm());
        let asn = iprs.ibox.pctx.asn();

        match self.icache.fetch(fetch_pc, mode, asn) {
            FetchOutcome::Hit(group) => {
                self.stats.icache_hits += 1;
                self.dispatch_group(&group, iprs, mem, cbox)
            }
            FetchOutcome::Miss => {
                self.stats.icache_misses += 1;
                self.request_fill(fetch_pc, iprs, cbox, mode, asn)
            }
            FetchOutcome::WayMiss => {
                self.stats.icache_way_misses += 1;
                self.request_fill(fetch_pc, iprs, cbox, mode, asn)
            }
        }
    }

    /// Decodes, renames, and queues the instructions of one fetch group.
    fn dispatch_group(
        &mut self,
        group: &FetchGroup,
        iprs: &mut IprFile,
        mem: &mut dyn MemoryPort,
        cbox: &mut dyn CachePort,
    ) -> Result<StepOutcome, CoreError> {
        let mode = AccessMode::from_cm(iprs.ibox.ier_cm.cm());
        let asn = iprs.ibox.pctx.asn();
        let mut dispatched = 0;

        for i in 0..group.count {
            // Reserved opcodes never reach decode: they redirect into the
            // OPCDEC PAL routine, leaving the fetch stream at the fault.
            if group.formats[i] == InsFormat::Res {
                let _ = self.raise(
                    iprs,
                    EventInfo {
                        fault: Fault::OpcDec,
                        pc: group.pcs[i],
                        va: 0,
                        opcode: group.words[i].opcode(),
                        reg: UNMAPPED_REG,
                        write: false,
                    },
                );
                return Ok(if dispatched > 0 {
                    StepOutcome::Dispatched(dispatched)
                } else {
                    StepOutcome::IllegalOpcode
                });
            }
            if self.rob.is_full() || self.iq.is_full() || self.fq.is_full() {
                return Ok(if dispatched > 0 {
                    StepOutcome::Dispatched(dispatched)
                } else {
                    StepOutcome::Stalled
                });
            }
            let Some(slot) = self.rob.allocate()? else {
                return Ok(StepOutcome::Stalled);
            };

            let ctx = DecodeContext {
                pc: group.pcs[i],
                unique_id: self.instr_counter,
                call_pal_r23: iprs.ibox.i_ctl.call_pal_r23(),
            };
            self.instr_counter = self.instr_counter.wrapping_add(1);
            let mut ins = decode_rename(group.words[i], ctx, &mut self.regs)?;
            trace!(
                pc = ins.pc.addr(),
                opcode = ins.opcode,
                id = ins.unique_id,
                slot,
                "dispatch"
            );

            let mut redirect = None;
            if ins.op_type == OpType::Branch {
                let prediction = self.predictor.predict(ins.pc);
                ins.predicted = true;
                ins.predicted_taken = prediction.taken;
                ins.local_taken = prediction.local_taken;
                ins.global_taken = prediction.global_taken;
                self.stats.branches_predicted += 1;
                if prediction.taken {
                    self.stats.predicted_taken += 1;
                    let target = ins.pc.displace(ins.displacement);
                    if !self.icache.valid(target) {
                        // Prefetch the target line; a translation gap is
                        // resolved when fetch actually reaches the target.
                        if let Ok(pa) = self.itb.translate(target.addr(), asn, mode) {
                            cbox.add_maf(MafKind::Istream, pa, 0, ICACHE_BUF_LEN, false);
                            self.stats.maf_requests += 1;
                        }
                    }
                    redirect = Some(target);
                }
            }

            if Self::completes_at_dispatch(&ins) {
                ins.state = InstrState::WaitingRetirement;
                self.stats.noops_completed += 1;
                *self.rob.entry_mut(slot) = ins;
            } else {
                match ins.opcode {
                    op::LDBU | op::LDQ_U | op::LDW_U | op::HW_LD | op::LDF | op::LDG | op::LDS
                    | op::LDT | op::LDL | op::LDQ | op::LDL_L | op::LDQ_L => {
                        ins.mem_slot = Some(MemSlot::Lq(mem.get_lq_slot()));
                    }
                    op::STW | op::STB | op::STQ_U | op::HW_ST | op::STF | op::STG | op::STS
                    | op::STT | op::STL | op::STQ | op::STL_C | op::STQ_C => {
                        ins.mem_slot = Some(MemSlot::Sq(mem.get_sq_slot()));
                    }
                    _ => {}
                }

                let target = resolve_queue(ins.opcode, ins.function);
                ins.state = InstrState::Queued;
                let function = ins.function;
                *self.rob.entry_mut(slot) = ins;
                match target {
                    IssueTarget::Fq => {
                        let _ = self.fq.push(slot);
                        self.stats.fq_dispatched += 1;
                    }
                    IssueTarget::Iq | IssueTarget::Cond => {
                        debug_assert!(
                            target == IssueTarget::Iq,
                            "queue unresolved for function {function:#x}"
                        );
                        let _ = self.iq.push(slot);
                        self.stats.iq_dispatched += 1;
                    }
                }
            }

            dispatched += 1;
            self.stats.dispatched += 1;
            if let Some(target) = redirect {
                self.vpc.append(target);
                self.stats.fetch_redirects += 1;
                break;
            }
            self.vpc.append(group.pcs[i].incr(1));
        }

        Ok(StepOutcome::Dispatched(dispatched))
    }

    /// Instructions that have nothing to execute finish at dispatch:
    /// no-pipe barriers, and register writes whose destination is R31/F31
    /// (except MT_FPCR, whose side effect is the write itself).
    fn completes_at_dispatch(ins: &Inflight) -> bool {
        if ins.pipeline == PipeSet::None {
            return true;
        }
        if ins.a_dest != UNMAPPED_REG {
            return false;
        }
        match ins.opcode {
            op::INTA | op::INTL | op::INTS | op::INTM | op::LDQ_U | op::ITFP => true,
            op::FLTI | op::FLTL | op::FLTV => ins.function != func::MT_FPCR,
            _ => false,
        }
    }

    /// Handles a fetch miss: translate and request a fill, or raise the
    /// appropriate event.
    fn request_fill(
        &mut self,
        fetch_pc: VirtPc,
        iprs: &mut IprFile,
        cbox: &mut dyn CachePort,
        mode: AccessMode,
        asn: u8,
    ) -> Result<StepOutcome, CoreError> {
        match self.itb.translate(fetch_pc.addr(), asn, mode) {
            Ok(pa) => {
                cbox.add_maf(MafKind::Istream, pa, 0, ICACHE_BUF_LEN, false);
                self.stats.maf_requests += 1;
                Ok(StepOutcome::FillRequested { pa })
            }
            Err(TranslateError::NotMapped) => {
                let _ = self.raise(
                    iprs,
                    EventInfo::fetch_side(Fault::ItbMiss, fetch_pc, fetch_pc.raw()),
                );
                Ok(StepOutcome::ItbMiss)
            }
            Err(TranslateError::AccessViolation) => {
                let _ = self.raise(
                    iprs,
                    EventInfo::fetch_side(Fault::Iacv, fetch_pc, fetch_pc.raw()),
                );
                Ok(StepOutcome::AccessViolation)
            }
        }
    }

    /// Marks a queued instruction as picked up by an execution box.
    pub fn begin_execution(&mut self, slot: usize) {
        self.rob.entry_mut(slot).state = InstrState::Executing;
    }

    /// Execution-box writeback: records the result and parks the entry
    /// for the in-order sweep.
    pub fn complete(&mut self, slot: usize, value: u64) {
        let entry = self.rob.entry_mut(slot);
        entry.dest_value = value;
        entry.state = InstrState::WaitingRetirement;
        if entry.has_dest && entry.a_dest != UNMAPPED_REG {
            let (dest, float) = (entry.rename.dest, entry.dest_float);
            if float {
                self.regs.fp.mark_executed(dest);
            } else {
                self.regs.int.mark_executed(dest);
            }
        }
    }

    /// Execution-box writeback for branches: direction plus, for
    /// register-indirect branches, the resolved target.
    pub fn complete_branch(&mut self, slot: usize, taken: bool, target: Option<u64>) {
        {
            let entry = self.rob.entry_mut(slot);
            entry.branch_taken = taken;
            entry.branch_target = target;
        }
        self.complete(slot, 0);
    }

    /// Records a fault against an in-flight instruction; it is delivered
    /// when the entry reaches the head of the ROB.
    pub fn fault_inflight(&mut self, slot: usize, fault: Fault) {
        let entry = self.rob.entry_mut(slot);
        entry.exc = Some(fault);
        entry.state = InstrState::WaitingRetirement;
    }

    /// The in-order retirement sweep. Returns the number retired.
    pub fn retire(&mut self, iprs: &mut IprFile, mem: &mut dyn MemoryPort) -> usize {
        let mut retired = 0;

        while !self.rob.is_empty() {
            let slot = self.rob.start();
            if self.rob.entry(slot).state != InstrState::WaitingRetirement {
                break;
            }
            let entry = self.rob.entry(slot).clone();

            if let Some(fault) = entry.exc {
                self.deliver_fault(slot, &entry, fault, iprs);
                retired += 1;
                break;
            }

            let mut mispredicted = false;
            if entry.predicted {
                self.predictor.train(
                    entry.pc,
                    entry.branch_taken,
                    entry.local_taken,
                    entry.global_taken,
                );
                if entry.branch_taken != entry.predicted_taken {
                    mispredicted = true;
                    self.stats.mispredicts += 1;
                    self.flush_newer_than(slot);
                    let correct = if entry.branch_taken {
                        entry
                            .branch_target
                            .map_or(entry.pc.displace(entry.displacement), |raw| {
                                VirtPc::new(raw, entry.pc.pal())
                            })
                    } else {
                        entry.pc.incr(1)
                    };
                    trace!(pc = entry.pc.addr(), to = correct.addr(), "mispredict recovery");
                    self.vpc.append(correct);
                }
            }

            let value = if entry.opcode == op::HW_MFPR {
                Self::read_ipr(iprs, entry.function as u16)
            } else {
                entry.dest_value
            };
            if entry.has_dest && entry.a_dest != UNMAPPED_REG {
                if entry.dest_float {
                    self.regs.fp.retire(entry.a_dest, entry.rename, value);
                } else {
                    self.regs.int.retire(entry.a_dest, entry.rename, value);
                }
            }

            if let Some(mem_slot @ MemSlot::Sq(_)) = entry.mem_slot {
                mem.retire_write(mem_slot);
            }

            if entry.opcode == op::HW_MTPR {
                let src = self.regs.int.value(entry.src1);
                self.write_ipr(iprs, entry.function as u16, src);
            }

            self.rob.retire_oldest();
            self.stats.retired += 1;
            retired += 1;
            if mispredicted {
                break;
            }
        }

        retired
    }

    /// Delivers a fault parked on the ROB head: squash younger entries,
    /// discard the faulting instruction's own rename, and redirect into
    /// PAL code.
    fn deliver_fault(&mut self, slot: usize, entry: &Inflight, fault: Fault, iprs: &mut IprFile) {
        self.flush_newer_than(slot);
        if entry.has_dest && entry.a_dest != UNMAPPED_REG {
            if entry.dest_float {
                self.regs.fp.rollback(entry.a_dest, entry.rename);
            } else {
                self.regs.int.rollback(entry.a_dest, entry.rename);
            }
        }
        let _ = self.raise(
            iprs,
            EventInfo {
                fault,
                pc: entry.pc,
                va: 0,
                opcode: entry.opcode,
                reg: entry.a_dest,
                write: entry.op_type == OpType::Store,
            },
        );
        self.rob.retire_oldest();
        self.stats.retired += 1;
    }

    /// Squashes every ROB entry newer than `slot`, newest first, undoing
    /// renames and reclaiming queue entries.
    fn flush_newer_than(&mut self, slot: usize) {
        for s in self.rob.slots_newer_than(slot) {
            let entry = self.rob.entry(s).clone();
            if entry.state == InstrState::Queued {
                self.iq.squash(s);
                self.fq.squash(s);
            }
            if entry.has_dest && entry.a_dest != UNMAPPED_REG {
                if entry.dest_float {
                    self.regs.fp.rollback(entry.a_dest, entry.rename);
                } else {
                    self.regs.int.rollback(entry.a_dest, entry.rename);
                }
            }
            self.stats.flushed += 1;
        }
        self.rob.truncate_after(slot);
    }

    /// HW_MFPR: reads the indexed IPR under the owning bank's lock.
    fn read_ipr(iprs: &IprFile, idx: u16) -> u64 {
        match idx {
            index::EXC_ADDR => iprs.ibox.exc_addr,
            index::IVA_FORM => iprs.ibox.iva_form,
            index::CM => u64::from(iprs.ibox.ier_cm.cm()) << 3,
            index::IER | index::IER_CM => iprs.ibox.ier_cm.0,
            index::SIRR => iprs.ibox.sirr,
            index::ISUM => iprs.ibox.isum.0,
            index::EXC_SUM => iprs.ibox.exc_sum.0,
            index::PAL_BASE => iprs.ibox.pal_base,
            index::I_CTL => iprs.ibox.i_ctl.0,
            index::PCTR_CTL => iprs.ibox.pctr_ctl,
            index::I_STAT => iprs.ibox.i_stat.0,
            index::MM_STAT => iprs.mbox.mm_stat.0,
            index::DC_STAT => iprs.mbox.dc_stat,
            index::C_DATA => iprs.cbox.c_data,
            // Process-context reads return every field regardless of the
            // select bits in the index.
            index::PCXT0..=index::PCXT1_END => iprs.ibox.pctx.0,
            index::CC => iprs.ebox.cc,
            index::VA => iprs.ebox.va,
            index::VA_FORM => iprs.ebox.va_form,
            _ => 0,
        }
    }

    /// HW_MTPR: writes the indexed IPR, applying side effects (ITB
    /// fills and flushes, I-cache flushes).
    fn write_ipr(&mut self, iprs: &mut IprFile, idx: u16, value: u64) {
        match idx {
            index::ITB_TAG => iprs.ibox.itb_tag.0 = value,
            index::ITB_PTE => {
                iprs.ibox.itb_pte.0 = value;
                // Retiring the PTE write commits tag and PTE together.
                let tag = iprs.ibox.itb_tag;
                let pte = iprs.ibox.itb_pte;
                self.itb.insert(
                    tag.va(),
                    pte.pfn(),
                    pte.gh(),
                    pte.access(),
                    pte.asm_(),
                    iprs.ibox.pctx.asn(),
                );
                self.stats.itb_fills += 1;
            }
            index::ITB_IAP => self.itb.invalidate_process(),
            index::ITB_IA => self.itb.invalidate_all(),
            index::ITB_IS => {
                iprs.ibox.itb_is = value;
                self.itb.invalidate_single(value);
            }
            index::CM => iprs.ibox.ier_cm.set_cm((value >> 3) as u8),
            index::IER => {
                let cm = iprs.ibox.ier_cm.cm();
                iprs.ibox.ier_cm.0 = value;
                iprs.ibox.ier_cm.set_cm(cm);
            }
            index::IER_CM => iprs.ibox.ier_cm.0 = value,
            index::SIRR => iprs.ibox.sirr = value,
            index::HW_INT_CLR => iprs.ibox.hw_int_clr = value,
            index::PAL_BASE => iprs.ibox.pal_base = value,
            index::I_CTL => iprs.ibox.i_ctl.0 = value,
            index::IC_FLUSH_ASM => self.icache.flush_non_asm(),
            index::IC_FLUSH => self.icache.flush(),
            index::PCTR_CTL => iprs.ibox.pctr_ctl = value,
            index::I_STAT => iprs.ibox.i_stat.0 = value,
            index::PCXT0..=index::PCXT1_END => iprs.ibox.pctx.0 = value,
            index::DTB_ALTMODE => iprs.mbox.dtb_altmode = value,
            index::M_CTL => iprs.mbox.m_ctl = value,
            index::DC_CTL => iprs.mbox.dc_ctl = value,
            index::DC_STAT => iprs.mbox.dc_stat = value,
            index::C_DATA => iprs.cbox.c_data = value,
            index::C_SHFT => iprs.cbox.c_shft = value,
            index::CC => iprs.ebox.cc = value,
            index::CC_CTL => iprs.ebox.cc_ctl = value,
            index::VA_CTL => iprs.ebox.va_ctl = value,
            _ => {}
        }
    }

    /// The loop-bottom wait condition: nothing to fetch and nowhere to
    /// put what a fetch would produce.
    pub fn should_wait(&self) -> bool {
        (!self.pending.armed && !self.icache.valid(self.vpc.current()))
            || self.iq.is_full()
            || self.fq.is_full()
    }
}
