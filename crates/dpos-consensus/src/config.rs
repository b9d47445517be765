// DPoS protocol parameters
//
// SAFETY INVARIANTS:
// 1. Parameters are fixed for the lifetime of a node; every honest node must use the same values
// 2. A config that fails validation is never constructed
// 3. Loading from YAML or JSON runs the same validation as `new`

use chrono::Duration;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SIGN_TOLERANCE_MS: u64 = 5_000;
pub const DEFAULT_INACTIVE_ELIMINATE_COUNT: usize = 1;

/// Protocol parameters shared by the evidence validators and the view-change
/// state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DposConfig {
    /// Time an arbitrator waits for a proposal before changing view.
    pub sign_tolerance_ms: u64,

    /// Most arbitrators a single inactivity accusation may name.
    pub inactive_eliminate_count: usize,

    /// Largest view offset a proposal may carry.
    pub max_view_offset: u32,
}

impl DposConfig {
    /// Create a new DPoS configuration.
    ///
    /// # Arguments
    /// * `sign_tolerance_ms` - Must be positive
    /// * `inactive_eliminate_count` - Must be positive
    /// * `max_view_offset` - Upper bound accepted for `DposProposal::view_offset`
    pub fn new(
        sign_tolerance_ms: u64,
        inactive_eliminate_count: usize,
        max_view_offset: u32,
    ) -> Result<Self, String> {
        let config = DposConfig {
            sign_tolerance_ms,
            inactive_eliminate_count,
            max_view_offset,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.sign_tolerance_ms == 0 {
            return Err("sign_tolerance_ms must be > 0".to_string());
        }
        if self.sign_tolerance_ms > i64::MAX as u64 {
            return Err("sign_tolerance_ms is out of range".to_string());
        }
        if self.inactive_eliminate_count == 0 {
            return Err("inactive_eliminate_count must be > 0".to_string());
        }
        Ok(())
    }

    pub fn sign_tolerance(&self) -> Duration {
        Duration::milliseconds(self.sign_tolerance_ms as i64)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, String> {
        let config: DposConfig =
            serde_yaml::from_str(s).map_err(|e| format!("invalid YAML config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self, String> {
        let config: DposConfig =
            serde_json::from_str(s).map_err(|e| format!("invalid JSON config: {}", e))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for DposConfig {
    fn default() -> Self {
        DposConfig {
            sign_tolerance_ms: DEFAULT_SIGN_TOLERANCE_MS,
            inactive_eliminate_count: DEFAULT_INACTIVE_ELIMINATE_COUNT,
            max_view_offset: u32::MAX,
        }
    }
}
