//! Common types shared across the front end.
//!
//! This module provides the building blocks every other component leans on:
//! 1. **Constants:** EV6 architectural numbers (queue depths, register
//!    counts, cache geometry).
//! 2. **Program counters:** the flagged virtual PC and PAL entry-point
//!    composition for both supported PC layouts.
//! 3. **Errors:** the architectural fault taxonomy and the fatal
//!    emulator-error enum.

/// EV6 architectural constants.
pub mod constants;

/// Fault taxonomy and fatal errors.
pub mod error;

/// Virtual PC and PAL PC composition.
pub mod pc;

pub use constants::UNMAPPED_REG;
pub use error::{CoreError, Fault};
pub use pc::{MajorType, VirtPc};
