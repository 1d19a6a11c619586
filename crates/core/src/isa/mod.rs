//! Alpha AXP instruction-set definitions.
//!
//! Contains the pieces of the ISA the front end needs: raw-word field
//! extraction, the major-opcode tables (format, operation type, register
//! usage), and execution-pipe/issue-queue assignment.

/// Instruction formats and operation-type classification.
pub mod format;

/// Raw instruction-word field accessors.
pub mod instruction;

/// Major opcode and function-code constants.
pub mod opcodes;

/// Execution-pipe assignment and issue-queue selection.
pub mod pipeline;

/// Architectural-register usage decoding.
pub mod registers;

pub use format::{InsFormat, OpType};
pub use instruction::InsWord;
pub use pipeline::{IssueTarget, PipeSet};
pub use registers::{RegSelector, RegisterUse};
