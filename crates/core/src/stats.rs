//! Front-end statistics collection and reporting.
//!
//! Tracks what the issue core did: fetch outcomes, dispatch volume per
//! queue, retirement, branch-prediction accuracy, and event traffic.
//! `print` emits a sectioned text report; `print_sections` selects
//! sections by name.

/// Counters for the instruction-issue core.
#[derive(Debug, Clone, Copy, Default)]
pub struct IboxStats {
    /// Fetch probes that hit the I-cache.
    pub icache_hits: u64,
    /// Fetch probes that found the set occupied by another tag.
    pub icache_misses: u64,
    /// Fetch probes that found no valid line in the set.
    pub icache_way_misses: u64,
    /// Miss-address-file requests submitted to the Cbox.
    pub maf_requests: u64,

    /// Instructions dispatched into the ROB.
    pub dispatched: u64,
    /// Instructions completed at dispatch without queueing.
    pub noops_completed: u64,
    /// Instructions dispatched to the integer queue.
    pub iq_dispatched: u64,
    /// Instructions dispatched to the floating queue.
    pub fq_dispatched: u64,
    /// Instructions retired in order.
    pub retired: u64,
    /// Instructions squashed by flushes.
    pub flushed: u64,

    /// Branches that consulted the predictor.
    pub branches_predicted: u64,
    /// Branches predicted taken.
    pub predicted_taken: u64,
    /// Branches whose committed direction disagreed with the prediction.
    pub mispredicts: u64,
    /// Front-end redirects onto a predicted-taken target.
    pub fetch_redirects: u64,

    /// Events recorded into the IPRs.
    pub events_recorded: u64,
    /// Events swallowed while an earlier one was pending.
    pub events_swallowed: u64,
    /// ITB fills committed via HW_MTPR retirement.
    pub itb_fills: u64,
}

/// Section names accepted by [`IboxStats::print_sections`].
pub const STATS_SECTIONS: &[&str] = &["fetch", "dispatch", "branch", "events"];

impl IboxStats {
    /// Prints the requested sections to stdout; an empty slice prints all.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);

        println!("\n==========================================================");
        println!("AXP 21264 ISSUE CORE STATISTICS");
        println!("==========================================================");
        if want("fetch") {
            let probes = self.icache_hits + self.icache_misses + self.icache_way_misses;
            let hit_rate = if probes > 0 {
                100.0 * self.icache_hits as f64 / probes as f64
            } else {
                0.0
            };
            println!("FETCH");
            println!("  icache.probes          {probes}");
            println!("  icache.hits            {} ({hit_rate:.2}%)", self.icache_hits);
            println!("  icache.misses          {}", self.icache_misses);
            println!("  icache.way_misses      {}", self.icache_way_misses);
            println!("  cbox.maf_requests      {}", self.maf_requests);
            println!("----------------------------------------------------------");
        }
        if want("dispatch") {
            println!("DISPATCH / RETIRE");
            println!("  dispatched             {}", self.dispatched);
            println!("  queue.iq               {}", self.iq_dispatched);
            println!("  queue.fq               {}", self.fq_dispatched);
            println!("  completed_at_dispatch  {}", self.noops_completed);
            println!("  retired                {}", self.retired);
            println!("  flushed                {}", self.flushed);
            println!("----------------------------------------------------------");
        }
        if want("branch") {
            let accuracy = if self.branches_predicted > 0 {
                100.0 * (self.branches_predicted - self.mispredicts) as f64
                    / self.branches_predicted as f64
            } else {
                0.0
            };
            println!("BRANCH PREDICTION");
            println!("  bp.lookups             {}", self.branches_predicted);
            println!("  bp.predicted_taken     {}", self.predicted_taken);
            println!("  bp.mispredicts         {}", self.mispredicts);
            println!("  bp.accuracy            {accuracy:.2}%");
            println!("  fetch.redirects        {}", self.fetch_redirects);
            println!("----------------------------------------------------------");
        }
        if want("events") {
            println!("EVENTS");
            println!("  recorded               {}", self.events_recorded);
            println!("  swallowed              {}", self.events_swallowed);
            println!("  itb.fills              {}", self.itb_fills);
        }
        println!("==========================================================");
    }

    /// Prints every section.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
