use crate::metrics::Metrics;
use crate::passage::Tier;
use crate::time_series::WpmSeries;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FinishReason {
    /// Every letter of the passage was typed
    Exhausted,
    /// The countdown reached zero
    Expired,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub tier: Tier,
    pub duration_secs: u64,
    pub started_at: Option<Duration>,
    pub elapsed_secs: f64,
    pub state: SessionState,
}

impl Session {
    pub fn new(tier: Tier, duration_secs: u64) -> Self {
        Self {
            tier,
            duration_secs,
            started_at: None,
            elapsed_secs: 0.0,
            state: SessionState::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }
}

/// Frozen outcome of a finished session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionResult {
    pub tier: Tier,
    pub duration_secs: u64,
    pub elapsed_secs: f64,
    pub finished_by: FinishReason,
    pub metrics: Metrics,
    pub best_streak: u32,
    pub wpm_series: WpmSeries,
    pub wpm_std_dev: f64,
    pub completed_at: DateTime<Local>,
}

impl SessionResult {
    /// One-line summary suitable for reading aloud
    pub fn announcement(&self) -> String {
        format!(
            "Session complete. {} words per minute, {} percent accuracy.",
            self.metrics.wpm, self.metrics.accuracy_percent
        )
    }
}
