use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::{DEFAULT_TRIALS, MAX_TRIALS, MIN_TRIALS, NUMBER_RANGE, TOTAL_TICKETS};
use crate::error::{ConfigurationError, LotteryError, Result};
use crate::format::LotteryFormat;

/// Settings for a lottery session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LotteryConfig {
    pub league_name: String,
    pub draft_year: u16,
    pub number_range: u8,
    pub total_tickets: u32,

    /// Trials for a simulation run when none is requested
    pub simulation_trials: usize,

    /// Fixed seed for reproducible sessions; entropy when absent
    pub seed: Option<u64>,
}

impl Default for LotteryConfig {
    fn default() -> Self {
        LotteryConfig {
            league_name: "My League".to_string(),
            draft_year: 2025,
            number_range: NUMBER_RANGE,
            total_tickets: TOTAL_TICKETS,
            simulation_trials: DEFAULT_TRIALS,
            seed: None,
        }
    }
}

impl LotteryConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LotteryConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| LotteryError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn format(&self) -> LotteryFormat {
        LotteryFormat::new(self.number_range, self.total_tickets)
    }

    pub fn validate(&self) -> Result<()> {
        self.format().validate()?;
        validate_trials(self.simulation_trials)
    }
}

/// Check a requested simulation size against the accepted range.
pub fn validate_trials(trials: usize) -> Result<()> {
    if !(MIN_TRIALS..=MAX_TRIALS).contains(&trials) {
        return Err(ConfigurationError::TrialCount {
            requested: trials,
            min: MIN_TRIALS,
            max: MAX_TRIALS,
        }
        .into());
    }
    Ok(())
}
