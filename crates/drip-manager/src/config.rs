//! Deployment configuration.
//!
//! [`ManagerConfig`] defaults to the reference deployment and can be layered
//! from `DRIP_*` environment variables or a JSON file.

use std::path::Path;

use drip_core::constants::{
    unit, DEFAULT_CHECKPOINT_GATE_SECS, DEFAULT_FLOOR_TOKENS, DEFAULT_PAYOUT_GATE_SECS,
    DEFAULT_SCHEDULE_WEEKS, DEFAULT_TOKEN_DECIMALS,
};
use drip_core::state::ScheduleParams;
use drip_core::types::{Address, Amount, AssetId};
use serde::{Deserialize, Serialize};

use crate::manager::Deployment;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid number: {value:?}")]
    InvalidVar { var: &'static str, value: String },
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Schedule configuration for one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManagerConfig {
    /// Number of weekly payouts.
    pub weeks: u32,
    pub payout_gate_secs: u64,
    pub checkpoint_gate_secs: u64,
    /// Final weekly payout, in whole tokens.
    pub floor: u64,
    /// Decimals of the reward token.
    pub decimals: u8,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            weeks: DEFAULT_SCHEDULE_WEEKS,
            payout_gate_secs: DEFAULT_PAYOUT_GATE_SECS,
            checkpoint_gate_secs: DEFAULT_CHECKPOINT_GATE_SECS,
            floor: DEFAULT_FLOOR_TOKENS,
            decimals: DEFAULT_TOKEN_DECIMALS,
        }
    }
}

impl ManagerConfig {
    /// Defaults overridden by any `DRIP_*` variable present in the process
    /// environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an explicit variable lookup.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(v) = parse_var(&lookup, "DRIP_WEEKS")? {
            cfg.weeks = v;
        }
        if let Some(v) = parse_var(&lookup, "DRIP_PAYOUT_GATE_SECS")? {
            cfg.payout_gate_secs = v;
        }
        if let Some(v) = parse_var(&lookup, "DRIP_CHECKPOINT_GATE_SECS")? {
            cfg.checkpoint_gate_secs = v;
        }
        if let Some(v) = parse_var(&lookup, "DRIP_FLOOR")? {
            cfg.floor = v;
        }
        if let Some(v) = parse_var(&lookup, "DRIP_DECIMALS")? {
            cfg.decimals = v;
        }
        Ok(cfg)
    }

    /// Parse a JSON object; absent fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.weeks == 0 {
            return Err(ConfigError::Invalid("weeks must be at least 1".into()));
        }
        if self.payout_gate_secs == 0 || self.checkpoint_gate_secs == 0 {
            return Err(ConfigError::Invalid("gates must be non-zero".into()));
        }
        if self.payout_gate_secs < self.checkpoint_gate_secs {
            return Err(ConfigError::Invalid(format!(
                "payout gate ({}s) shorter than checkpoint gate ({}s)",
                self.payout_gate_secs, self.checkpoint_gate_secs
            )));
        }
        if self.floor == 0 {
            return Err(ConfigError::Invalid("floor must be non-zero".into()));
        }
        self.floor_amount().map(|_| ())
    }

    /// `10^decimals` base units per token.
    pub fn unit(&self) -> Result<Amount, ConfigError> {
        unit(self.decimals)
            .ok_or_else(|| ConfigError::Invalid(format!("{} decimals overflow", self.decimals)))
    }

    /// Floor in base units.
    pub fn floor_amount(&self) -> Result<Amount, ConfigError> {
        Amount::from(self.floor)
            .checked_mul(self.unit()?)
            .ok_or_else(|| ConfigError::Invalid("floor overflows base units".into()))
    }

    pub fn schedule_params(&self) -> Result<ScheduleParams, ConfigError> {
        Ok(ScheduleParams {
            payout_gate: self.payout_gate_secs,
            checkpoint_gate: self.checkpoint_gate_secs,
            floor: self.floor_amount()?,
        })
    }

    /// Validated [`Deployment`] for this schedule.
    pub fn deployment(
        &self,
        address: Address,
        owner: Address,
        reward_asset: AssetId,
        destination: Address,
    ) -> Result<Deployment, ConfigError> {
        self.validate()?;
        Ok(Deployment {
            address,
            owner,
            reward_asset,
            destination,
            weeks: self.weeks,
            schedule: self.schedule_params()?,
        })
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVar { var, value }),
    }
}
