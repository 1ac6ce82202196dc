//! Per-tick performance and activity counters.

use std::time::Duration;

/// What one tick did, for status lines and tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickMetrics {
    /// The tick counter value this tick ran as.
    pub tick: u64,
    /// Propagation passes executed (at least 1, bounded by config).
    pub passes: u32,
    /// Source cells found by the root scan.
    pub roots: usize,
    /// Cells processed across all passes, including re-visits of the
    /// same cell in later passes.
    pub cells_visited: u64,
    /// Macro invocations expanded.
    pub macros_expanded: u32,
    /// Elements still waiting for inputs when the pass budget ran out
    /// (settled to defaults by the final sweep).
    pub starved_elements: usize,
    /// Wall-clock duration of the tick.
    pub duration: Duration,
}
