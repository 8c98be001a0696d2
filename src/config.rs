use crate::error::{EngineError, Result};
use crate::passage::Tier;
use crate::typing_policy::TypingPolicy;
use serde::{Deserialize, Serialize};

/// Session settings, read once when a session is created. Nothing here is
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub tier: Tier,
    pub duration_secs: u64,
    #[serde(default)]
    pub policy: TypingPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tier: Tier::Medium,
            duration_secs: 30,
            policy: TypingPolicy::Advance,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        validate_duration(self.duration_secs)
    }
}

pub fn validate_duration(duration_secs: u64) -> Result<()> {
    if duration_secs == 0 {
        return Err(EngineError::InvalidDuration(duration_secs));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.tier, Tier::Medium);
        assert_eq!(cfg.duration_secs, 30);
        assert_eq!(cfg.policy, TypingPolicy::Advance);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_zero_duration_rejected() {
        let cfg = Config {
            duration_secs: 0,
            ..Config::default()
        };
        assert_matches!(cfg.validate(), Err(EngineError::InvalidDuration(0)));
    }

    #[test]
    fn test_policy_defaults_when_absent() {
        let cfg: Config = serde_json::from_str(r#"{ "tier": "easy", "duration_secs": 15 }"#).unwrap();
        assert_eq!(cfg.tier, Tier::Easy);
        assert_eq!(cfg.duration_secs, 15);
        assert_eq!(cfg.policy, TypingPolicy::Advance);
    }

    #[test]
    fn test_strict_policy_from_json() {
        let cfg: Config = serde_json::from_str(
            r#"{ "tier": "hard", "duration_secs": 60, "policy": "strict" }"#,
        )
        .unwrap();
        assert_eq!(cfg.policy, TypingPolicy::Strict);
    }
}
