//! Core configuration.
//!
//! Most of the front end's geometry is architectural and lives in
//! `common::constants`; what varies between deployments is here:
//! 1. **CPU generation:** selects the PAL PC bit layout.
//! 2. **Reset state:** PAL base address and CALL_PAL linkage register.
//! 3. **Predictor sizing:** table widths in bits, defaulting to the
//!    hardware's 10/10/12 geometry.
//!
//! Everything derives `Deserialize` so a harness can supply JSON; the
//! defaults reproduce the chip.

use serde::Deserialize;

use crate::common::pc::MajorType;

/// Baseline values reproducing the EV6.
mod defaults {
    /// Local history table size (log2, 1024 entries of 10-bit history).
    pub const LOCAL_HISTORY_BITS: usize = 10;

    /// Local predictor table size (log2, 1024 3-bit counters).
    pub const LOCAL_PRED_BITS: usize = 10;

    /// Global/choice predictor table size (log2, 4096 2-bit counters).
    pub const GLOBAL_BITS: usize = 12;

    /// Reset PAL base address.
    pub const PAL_BASE: u64 = 0;

    /// Reset PC after wakeup.
    pub const RESET_PC: u64 = 0;
}

/// Tournament predictor table sizing.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Local history table size in bits of index.
    pub local_history_bits: usize,
    /// Local predictor table size in bits of index.
    pub local_pred_bits: usize,
    /// Global and choice table size in bits of index.
    pub global_bits: usize,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            local_history_bits: defaults::LOCAL_HISTORY_BITS,
            local_pred_bits: defaults::LOCAL_PRED_BITS,
            global_bits: defaults::GLOBAL_BITS,
        }
    }
}

/// Front-end configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CPU generation being emulated.
    pub major_type: MajorType,
    /// PAL base address at reset.
    pub pal_base: u64,
    /// PC the core starts fetching from.
    pub reset_pc: u64,
    /// CALL_PAL links through R23 instead of R27 at reset.
    pub call_pal_r23: bool,
    /// Predictor table sizing.
    pub predictor: PredictorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            major_type: MajorType::Ev6,
            pal_base: defaults::PAL_BASE,
            reset_pc: defaults::RESET_PC,
            call_pal_r23: false,
            predictor: PredictorConfig::default(),
        }
    }
}
