use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::constants::{round_to, MAX_TEAMS, MIN_TEAMS, SHARE_DECIMALS};
use crate::error::{ConfigurationError, Result};
use crate::format::LotteryFormat;

/// Index of a team within its roster.
pub type TeamId = usize;

/// League member holding lottery tickets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,

    /// Combinations this team will hold, one per ticket
    pub tickets: u32,
}

impl Team {
    pub fn new(name: String, tickets: u32) -> Self {
        Team { name, tickets }
    }

    /// Percentage of `total_tickets` owned by this team, to two decimals.
    pub fn share(&self, total_tickets: u32) -> f64 {
        if total_tickets == 0 {
            return 0.0;
        }
        round_to(self.tickets as f64 / total_tickets as f64 * 100.0, SHARE_DECIMALS)
    }
}

/// Check a ticket table against a lottery format.
///
/// Every team needs a non-empty unique name and at least one ticket, and the
/// tickets must add up to exactly the format's total.
pub fn validate_tickets(teams: &[Team], format: &LotteryFormat) -> Result<()> {
    format.validate()?;

    let mut seen = HashSet::new();
    for team in teams {
        if team.name.trim().is_empty() {
            return Err(ConfigurationError::EmptyTeamName.into());
        }
        if team.tickets == 0 {
            return Err(ConfigurationError::ZeroTickets {
                team: team.name.clone(),
            }
            .into());
        }
        if !seen.insert(team.name.as_str()) {
            return Err(ConfigurationError::DuplicateTeam {
                team: team.name.clone(),
            }
            .into());
        }
    }

    let found: u64 = teams.iter().map(|t| t.tickets as u64).sum();
    if found != format.total_tickets as u64 {
        return Err(ConfigurationError::TicketSum {
            found,
            expected: format.total_tickets,
        }
        .into());
    }

    Ok(())
}

/// Validated roster of a configured league.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct League {
    teams: Vec<Team>,
    format: LotteryFormat,
}

impl League {
    /// Build a league from raw team entries.
    ///
    /// Entries with blank names are skipped, as unnamed rows in a setup form
    /// are. The remaining teams must number between two and thirty and pass
    /// [`validate_tickets`].
    pub fn new(entries: Vec<Team>, format: LotteryFormat) -> Result<Self> {
        let teams: Vec<Team> = entries
            .into_iter()
            .filter(|t| !t.name.trim().is_empty())
            .map(|t| Team::new(t.name.trim().to_string(), t.tickets))
            .collect();

        if teams.len() < MIN_TEAMS {
            return Err(ConfigurationError::TooFewTeams {
                found: teams.len(),
                minimum: MIN_TEAMS,
            }
            .into());
        }
        if teams.len() > MAX_TEAMS {
            return Err(ConfigurationError::TooManyTeams {
                found: teams.len(),
                maximum: MAX_TEAMS,
            }
            .into());
        }
        validate_tickets(&teams, &format)?;

        Ok(League { teams, format })
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn format(&self) -> &LotteryFormat {
        &self.format
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }
}
