use serde::{Deserialize, Serialize};

use crate::combination::{all_combinations, universe_size, Combination};
use crate::constants::{COMBINATION_SIZE, MAX_NUMBER_RANGE, NUMBER_RANGE, TOTAL_TICKETS};
use crate::error::{ConfigurationError, Result};

/// Shape of a lottery: which balls exist and how many tickets are sold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotteryFormat {
    /// Balls are numbered 1..=number_range
    pub number_range: u8,

    /// Tickets that must be handed out, one combination each
    pub total_tickets: u32,
}

impl Default for LotteryFormat {
    fn default() -> Self {
        LotteryFormat {
            number_range: NUMBER_RANGE,
            total_tickets: TOTAL_TICKETS,
        }
    }
}

impl LotteryFormat {
    pub fn new(number_range: u8, total_tickets: u32) -> Self {
        LotteryFormat {
            number_range,
            total_tickets,
        }
    }

    pub fn universe_size(&self) -> u64 {
        universe_size(self.number_range)
    }

    pub fn universe(&self) -> Vec<Combination> {
        all_combinations(self.number_range)
    }

    /// Check that a ticket of this format exists and every ticket can get its own combination.
    pub fn validate(&self) -> Result<()> {
        if (self.number_range as usize) < COMBINATION_SIZE || self.number_range > MAX_NUMBER_RANGE {
            return Err(ConfigurationError::NumberRange {
                range: self.number_range,
            }
            .into());
        }
        let available = self.universe_size();
        if self.total_tickets as u64 > available {
            return Err(ConfigurationError::InsufficientCombinations {
                demand: self.total_tickets as u64,
                available,
            }
            .into());
        }
        Ok(())
    }
}
