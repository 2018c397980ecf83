// Session statistics for tool execution
//
// The executor only ever writes these counters; display belongs to the caller.

use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct Stats {
    /// Total tool calls attempted, including rejected and cancelled ones.
    pub tool_calls: u64,
    /// Failures during execution. Unknown tools and denials do not count.
    pub tool_errors: u64,
    /// Wall-clock time spent inside tool execution.
    pub tool_time_spent: Duration,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-line summary for the end of a batch.
    pub fn summary(&self) -> String {
        format!(
            "Tool calls: {} ({} errors, {:.1}s spent)",
            self.tool_calls,
            self.tool_errors,
            self.tool_time_spent.as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_start_at_zero() {
        let stats = Stats::new();
        assert_eq!(stats.tool_calls, 0);
        assert_eq!(stats.tool_errors, 0);
        assert_eq!(stats.tool_time_spent, Duration::ZERO);
    }

    #[test]
    fn test_summary_mentions_counts() {
        let stats = Stats {
            tool_calls: 3,
            tool_errors: 1,
            tool_time_spent: Duration::from_millis(1500),
        };
        let summary = stats.summary();
        assert!(summary.contains("3"));
        assert!(summary.contains("1 errors"));
    }
}
