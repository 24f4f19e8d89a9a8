use crate::battle::ai::AiTier;
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// When a move's PP is spent relative to its accuracy roll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PpPolicy {
    /// PP is spent before the accuracy roll, so a miss still costs PP.
    #[default]
    DeductBeforeAccuracy,
    /// PP is spent only once the move connects.
    DeductOnHit,
}

/// Per-battle settings, fixed for the battle's duration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub ai_tier: AiTier,
    pub pp_policy: PpPolicy,
    /// Seed for the battle RNG. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl BattleConfig {
    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&content)
    }

    pub fn with_tier(mut self, ai_tier: AiTier) -> Self {
        self.ai_tier = ai_tier;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_pp_policy(mut self, pp_policy: PpPolicy) -> Self {
        self.pp_policy = pp_policy;
        self
    }
}
