// Ledger behavior flags

/// Runtime behavior flags for the ledger
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerConfig {
    /// Reject run status transitions outside the normal lifecycle instead
    /// of logging them. Off by default: automation that reports statuses
    /// out of order should still be recorded.
    pub strict_transitions: bool,
}

impl LedgerConfig {
    /// Build from environment variables (DEVLOG_STRICT_RUNS=1 or true)
    pub fn from_env() -> Self {
        let strict_transitions = std::env::var("DEVLOG_STRICT_RUNS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        Self { strict_transitions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_permissive() {
        assert!(!LedgerConfig::default().strict_transitions);
    }
}
