//! The instruction-issue core.
//!
//! Components in dependency order: the VPC ring, the tournament branch
//! predictor, the instruction cache and translation buffer, register
//! renaming, the reorder buffer and issue queues, internal processor
//! registers, event intake, decode, and finally the driver that ties
//! them together.

/// Instruction decode and register rename.
pub mod decode;

/// Exception and interrupt intake.
pub mod events;

/// The Ibox driver: fetch, dispatch, and retirement.
pub mod ibox;

/// Two-way set-associative instruction cache.
pub mod icache;

/// Internal processor registers.
pub mod ipr;

/// Instruction translation buffer.
pub mod itb;

/// Tournament branch predictor.
pub mod predictor;

/// Counted issue queues.
pub mod queue;

/// Physical register files and renaming.
pub mod regfile;

/// Reorder buffer.
pub mod rob;

/// Ring of in-flight virtual program counters.
pub mod vpc;

pub use ibox::{Ibox, StepOutcome};
pub use ipr::IprFile;
