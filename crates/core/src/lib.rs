//! Alpha AXP 21264 (EV6) instruction-issue core emulator.
//!
//! This crate implements the front end of an out-of-order Alpha CPU:
//! 1. **Fetch:** virtual-PC stream, two-way instruction cache, and
//!    instruction translation buffer.
//! 2. **Predict:** the 21264 tournament predictor (local, global,
//!    choice), trained only on committed branch outcomes.
//! 3. **Decode/rename:** format classification, architectural-register
//!    extraction with PAL-shadow substitution, and renaming onto the
//!    physical register files through ring free-lists.
//! 4. **Dispatch:** reorder-buffer allocation and insertion into the
//!    integer and floating issue queues.
//! 5. **Retire:** the in-order sweep that commits values, trains the
//!    predictor, hands stores to the memory box, applies IPR moves, and
//!    redirects into PAL code on faults.
//!
//! Execution, memory, and the second-level cache are external
//! collaborators reached through the traits in [`sim::ports`].

/// Common types: constants, program counters, faults.
pub mod common;

/// Front-end configuration.
pub mod config;

/// The instruction-issue core.
pub mod core;

/// Alpha instruction-set definitions.
pub mod isa;

/// Simulation assembly: ports and the threaded CPU.
pub mod sim;

/// Statistics collection and reporting.
pub mod stats;

pub use crate::common::{CoreError, Fault, MajorType, VirtPc};
pub use crate::config::Config;
pub use crate::core::{Ibox, IprFile, StepOutcome};
pub use crate::sim::Cpu;
