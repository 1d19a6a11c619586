//! Table-driven decode checks: operation typing, queue selection, and
//! register roles across the opcode map.

use rstest::rstest;

use axpsim_core::isa::format::{InsFormat, OpType, format_of, op_type_of, refine_op_type};
use axpsim_core::isa::instruction::InsWord;
use axpsim_core::isa::pipeline::{IssueTarget, resolve_queue};
use axpsim_core::isa::registers::{RegSelector, decode_registers};

#[rstest]
#[case(0x08, InsFormat::Mem)] // LDA
#[case(0x10, InsFormat::Opr)] // INTA
#[case(0x16, InsFormat::FP)] // FLTI
#[case(0x18, InsFormat::Mfc)] // MISC
#[case(0x1a, InsFormat::Mbr)] // JMP
#[case(0x1d, InsFormat::Pal)] // HW_MTPR
#[case(0x30, InsFormat::Bra)] // BR
#[case(0x31, InsFormat::FPBra)] // FBEQ
#[case(0x05, InsFormat::Res)]
fn formats(#[case] opcode: u8, #[case] expected: InsFormat) {
    assert_eq!(format_of(opcode), expected);
}

#[rstest]
#[case(0x0a, OpType::Load)] // LDBU
#[case(0x2d, OpType::Store)] // STQ
#[case(0x08, OpType::Arith)] // LDA computes, never touches memory
#[case(0x39, OpType::Branch)] // BEQ
#[case(0x1e, OpType::Branch)] // HW_RET
#[case(0x12, OpType::Logic)] // INTS
#[case(0x13, OpType::Arith)] // INTM
fn base_operation_types(#[case] opcode: u8, #[case] expected: OpType) {
    assert_eq!(op_type_of(opcode), expected);
}

#[rstest]
#[case(0x10, 0x0f, OpType::Logic)] // CMPBGE
#[case(0x10, 0x20, OpType::Arith)] // ADDQ
#[case(0x11, 0x61, OpType::Oper)] // AMASK
#[case(0x16, 0x0a5, OpType::Logic)] // CMPTEQ
#[case(0x17, 0x024, OpType::Load)] // MT_FPCR
#[case(0x18, 0xc000, OpType::Load)] // RPCC
#[case(0x18, 0x4000, OpType::Store)] // MB
fn refined_operation_types(#[case] opcode: u8, #[case] func: u32, #[case] expected: OpType) {
    assert_eq!(refine_op_type(opcode, func), expected);
}

#[rstest]
#[case(0x29, 0, IssueTarget::Iq)] // LDQ
#[case(0x23, 0, IssueTarget::Iq)] // LDT: address computes in integer pipes
#[case(0x16, 0x0a0, IssueTarget::Fq)] // ADDT
#[case(0x32, 0, IssueTarget::Fq)] // FBLT
#[case(0x14, 0x024, IssueTarget::Iq)] // ITOFT reads the integer file
#[case(0x14, 0x00b, IssueTarget::Fq)] // SQRTS
#[case(0x1c, 0x70, IssueTarget::Fq)] // FTOIT reads the floating file
#[case(0x1c, 0x32, IssueTarget::Iq)] // CTLZ
fn queue_selection(#[case] opcode: u8, #[case] func: u32, #[case] expected: IssueTarget) {
    assert_eq!(resolve_queue(opcode, func), expected);
}

#[rstest]
// LDQ R1, (R2): Ra is the destination, Rb the base.
#[case((0x29u32 << 26) | (1 << 21) | (2 << 16), RegSelector::Ra, RegSelector::Rb, RegSelector::None)]
// STQ R1, (R2): Ra is data, Rb the base, no destination.
#[case((0x2du32 << 26) | (1 << 21) | (2 << 16), RegSelector::None, RegSelector::Ra, RegSelector::Rb)]
// JMP R3, (R4): Ra links, Rb is the target.
#[case((0x1au32 << 26) | (3 << 21) | (4 << 16), RegSelector::Ra, RegSelector::Rb, RegSelector::None)]
// LDT F1, (R2): floating destination, integer base.
#[case((0x23u32 << 26) | (1 << 21) | (2 << 16), RegSelector::Fa, RegSelector::Rb, RegSelector::None)]
fn register_roles(
    #[case] word: u32,
    #[case] dest: RegSelector,
    #[case] src1: RegSelector,
    #[case] src2: RegSelector,
) {
    let usage = decode_registers(InsWord(word));
    assert_eq!(usage.dest, dest);
    assert_eq!(usage.src1, src1);
    assert_eq!(usage.src2, src2);
}
