//! Dashboard configuration.

use serde::{Deserialize, Serialize};

use ginko_session::DEFAULT_SESSION_TICKS;

/// Default loan approval delay, in ticks of the cooperative clock.
pub const DEFAULT_LOAN_DELAY_TICKS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Session length: ticks of inactivity before the session expires.
    pub session_ticks: u32,
    /// Simulated loan approval delay, in ticks.
    pub loan_delay_ticks: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            session_ticks: DEFAULT_SESSION_TICKS,
            loan_delay_ticks: DEFAULT_LOAN_DELAY_TICKS,
        }
    }
}

impl DashboardConfig {
    /// Read overrides from `GINKO_SESSION_TICKS` / `GINKO_LOAN_DELAY_TICKS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            session_ticks: env_ticks("GINKO_SESSION_TICKS", defaults.session_ticks),
            loan_delay_ticks: env_ticks("GINKO_LOAN_DELAY_TICKS", defaults.loan_delay_ticks),
        }
    }
}

fn env_ticks(var: &str, default: u32) -> u32 {
    match std::env::var(var) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(var, %raw, "ignoring non-numeric tick override");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_timings() {
        let config = DashboardConfig::default();
        assert_eq!(config.session_ticks, 120);
        assert_eq!(config.loan_delay_ticks, 3);
    }
}
