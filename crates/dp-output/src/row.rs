//! Plain data row types written by output backends.

use dp_sim::AgentRecord;

/// Final statistics for one philosopher, flattened for writing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsRow {
    pub id:                u32,
    /// Longest wait between becoming hungry and eating, in seconds.
    pub max_hungry_secs:   f64,
    pub eat_count:         u64,
}

impl From<&AgentRecord> for StatsRow {
    fn from(r: &AgentRecord) -> Self {
        Self {
            id:              r.id.0,
            max_hungry_secs: r.max_hungry_secs(),
            eat_count:       r.eat_count,
        }
    }
}

/// Rows for every record, in the order given.
pub fn stats_rows(records: &[AgentRecord]) -> Vec<StatsRow> {
    records.iter().map(StatsRow::from).collect()
}
