//! Store configuration, handed over by the page at boot as a JSON string.
//!
//! Every field has a default, so `{}` (or an empty string) yields the same
//! values the app has always used.

use serde::{Deserialize, Serialize};

use crate::error::{ProgressError, Result};

/// XP amounts and thresholds applied by the store and the reward rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// XP a learner starts with after logging in.
    pub login_xp: u32,
    /// Bonus for unlocking any badge.
    pub badge_xp: u32,
    /// Bonus for completing a challenge.
    pub challenge_xp: u32,
    /// Bonus for reaching the end of a lesson.
    pub lesson_xp: u32,
    /// Streak length that unlocks the streak badge.
    pub streak_badge_days: u32,
    /// Quiz/game XP at or above `top_tier_percent`.
    pub top_tier_xp: u32,
    /// Quiz/game XP at or above `mid_tier_percent`.
    pub mid_tier_xp: u32,
    /// Quiz/game XP below the mid tier.
    pub base_tier_xp: u32,
    /// Score needed for the top tier and for score badges.
    pub top_tier_percent: u32,
    pub mid_tier_percent: u32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            login_xp: 10,
            badge_xp: 50,
            challenge_xp: 30,
            lesson_xp: 20,
            streak_badge_days: 3,
            top_tier_xp: 50,
            mid_tier_xp: 30,
            base_tier_xp: 10,
            top_tier_percent: 80,
            mid_tier_percent: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// localStorage key holding the progress snapshot.
    pub storage_key: String,
    /// `EnvFilter` directive for the console logger.
    pub log_filter: String,
    pub rewards: RewardConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: "userData".to_string(),
            log_filter: "info".to_string(),
            rewards: RewardConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Parse config JSON. Blank input gives the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json).map_err(|e| ProgressError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_gives_defaults() {
        let config = StoreConfig::from_json("  ").unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.storage_key, "userData");
        assert_eq!(config.rewards.badge_xp, 50);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config =
            StoreConfig::from_json(r#"{"log_filter":"debug","rewards":{"badge_xp":75}}"#).unwrap();
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.rewards.badge_xp, 75);
        assert_eq!(config.rewards.challenge_xp, 30);
        assert_eq!(config.storage_key, "userData");
        assert_eq!(config.rewards.top_tier_xp, 50);
    }

    #[test]
    fn tier_amounts_are_configurable() {
        let config = StoreConfig::from_json(
            r#"{"rewards":{"top_tier_xp":100,"mid_tier_percent":50}}"#,
        )
        .unwrap();
        assert_eq!(config.rewards.top_tier_xp, 100);
        assert_eq!(config.rewards.mid_tier_percent, 50);
        assert_eq!(config.rewards.mid_tier_xp, 30);
        assert_eq!(config.rewards.top_tier_percent, 80);
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = StoreConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ProgressError::Config(_)));
    }
}
