//! Instruction decode and register rename.
//!
//! Takes one fetched word and produces a fully renamed [`Inflight`]
//! record ready for the ROB: format fields extracted, operation type
//! classified, architectural registers pulled out of the right fields,
//! PAL shadows substituted, and destinations renamed onto the physical
//! files.
//!
//! CALL_PAL is the one instruction whose destination comes from nowhere
//! in the word: its linkage register is R23 or R27, chosen by
//! `I_CTL.call_pal_r23`.

use crate::common::constants::shadow_register;
use crate::common::error::CoreError;
use crate::common::pc::VirtPc;
use crate::core::rob::Inflight;
use crate::core::regfile::RenameSet;
use crate::isa::format::{InsFormat, OpType, format_of, op_type_of, refine_op_type};
use crate::isa::instruction::InsWord;
use crate::isa::opcodes as op;
use crate::isa::pipeline::pipeline_of;
use crate::isa::registers::{RegSelector, decode_registers};

/// Decode-time inputs that live outside the word itself.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext {
    /// The instruction's own VPC (PAL bit included).
    pub pc: VirtPc,
    /// Wrapping id assigned by the driver.
    pub unique_id: u8,
    /// `I_CTL.call_pal_r23`: CALL_PAL links through R23 instead of R27.
    pub call_pal_r23: bool,
}

/// Decodes one instruction and renames its registers.
///
/// The returned record carries everything retirement and rollback need;
/// the caller installs it into the ROB slot it already claimed.
pub fn decode_rename(
    word: InsWord,
    ctx: DecodeContext,
    regs: &mut RenameSet,
) -> Result<Inflight, CoreError> {
    let mut ins = Inflight {
        unique_id: ctx.unique_id,
        opcode: word.opcode(),
        format: format_of(word.opcode()),
        pc: ctx.pc,
        ..Inflight::default()
    };

    match ins.format {
        InsFormat::Bra | InsFormat::FPBra => ins.displacement = word.branch_disp(),
        InsFormat::FP => ins.function = word.fp_func(),
        InsFormat::Mem => ins.displacement = word.mem_disp(),
        InsFormat::Mbr => {
            ins.displacement = word.mem_disp();
            ins.function = u32::from(word.jmp_hint());
        }
        InsFormat::Mfc => ins.function = word.mem_func(),
        InsFormat::Opr => {
            ins.function = word.opr_func();
            if word.opr_is_literal() {
                ins.literal = Some(word.opr_literal());
            }
        }
        InsFormat::Pcd => ins.function = word.pal_func(),
        InsFormat::Pal => match ins.opcode {
            op::HW_LD | op::HW_ST => {
                ins.displacement = word.hw_disp();
                ins.hw_type = word.hw_type();
                ins.hw_len = word.hw_len();
            }
            op::HW_RET => {
                ins.displacement = word.hw_ret_disp();
                ins.hw_type = word.hw_ret_hint();
                ins.hw_len = word.hw_ret_stall();
            }
            op::HW_MFPR | op::HW_MTPR => {
                ins.function = u32::from(word.hw_index());
                ins.scbd_mask = word.hw_scbd_mask();
            }
            // The format table maps Pal to the five hardware opcodes
            // above; any other opcode here means the tables disagree.
            _ => return Err(CoreError::UnknownOpcode { opcode: ins.opcode, pc: ctx.pc.addr() }),
        },
        InsFormat::Res => {}
    }

    ins.op_type = op_type_of(ins.opcode);
    if ins.op_type == OpType::Other && ins.format != InsFormat::Res {
        ins.op_type = refine_op_type(ins.opcode, ins.function);
    }
    ins.pipeline = pipeline_of(ins.opcode, ins.function);

    let usage = decode_registers(word);
    ins.src1_float = usage.src1.is_float();
    ins.src2_float = usage.src2.is_float();
    ins.dest_float = usage.dest.is_float();
    ins.has_dest = usage.dest != RegSelector::None || ins.opcode == op::CALL_PAL;

    ins.a_src1 = usage.src1.extract(word).unwrap_or(crate::common::UNMAPPED_REG);
    ins.a_src2 = usage.src2.extract(word).unwrap_or(crate::common::UNMAPPED_REG);
    // The literal form carries its operand in the Rb field bits.
    if ins.literal.is_some() {
        ins.a_src2 = crate::common::UNMAPPED_REG;
    }
    ins.a_dest = match usage.dest.extract(word) {
        Some(reg) => reg,
        None if ins.opcode == op::CALL_PAL => {
            if ctx.call_pal_r23 { 23 } else { 27 }
        }
        None => crate::common::UNMAPPED_REG,
    };

    // PAL shadows exist for the integer file only. CALL_PAL runs its
    // linkage in the mode it is entering, so it shadows too.
    let pal_mode = ctx.pc.pal() || ins.format == InsFormat::Pcd;
    if !ins.src1_float {
        ins.a_src1 = shadow_register(ins.a_src1, pal_mode);
    }
    if !ins.src2_float {
        ins.a_src2 = shadow_register(ins.a_src2, pal_mode);
    }
    if !ins.dest_float {
        ins.a_dest = shadow_register(ins.a_dest, pal_mode);
    }

    ins.src1 = regs.source(ins.a_src1, ins.src1_float);
    ins.src2 = regs.source(ins.a_src2, ins.src2_float);
    ins.rename = regs.rename_dest(ins.a_dest, ins.dest_float)?;

    Ok(ins)
}
