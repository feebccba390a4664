use thiserror::Error;

use crate::combination::Combination;

/// Why a league, format or simulation request was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Total tickets = {found}, must be exactly {expected}")]
    TicketSum { found: u64, expected: u32 },

    #[error("At least {minimum} named teams are required, got {found}")]
    TooFewTeams { found: usize, minimum: usize },

    #[error("At most {maximum} teams are supported, got {found}")]
    TooManyTeams { found: usize, maximum: usize },

    #[error("Not enough unique combinations: {demand} tickets, {available} combinations")]
    InsufficientCombinations { demand: u64, available: u64 },

    #[error("Team {team} has no tickets")]
    ZeroTickets { team: String },

    #[error("Team {team} is listed more than once")]
    DuplicateTeam { team: String },

    #[error("Team names must not be empty")]
    EmptyTeamName,

    #[error("Trial count {requested} outside {min}..={max}")]
    TrialCount { requested: usize, min: usize, max: usize },

    #[error("Number range {range} is outside 4..={}", crate::constants::MAX_NUMBER_RANGE)]
    NumberRange { range: u8 },

    #[error("No teams have been applied")]
    NoTeams,
}

/// Errors surfaced by every lottery operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LotteryError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Invalid combination: {reason}")]
    InvalidCombination { reason: String },

    #[error("Combination {combination} not found or already removed")]
    CombinationNotFound { combination: Combination },

    #[error("No combinations left in the pool")]
    PoolExhausted,

    #[error("Team {team} already has a pick assigned")]
    TeamAlreadyPicked { team: String },

    #[error("Simulation cancelled after {completed_trials} trials")]
    Cancelled { completed_trials: usize },

    #[error("Export error: {0}")]
    Export(String),

    #[error("Config parse error: {0}")]
    Config(String),
}

impl LotteryError {
    /// Whether the session is still usable after this error.
    ///
    /// `PoolExhausted` is recoverable: it only signals that the round is
    /// complete. It is not retryable, so callers should not repeat the draw
    /// automatically (see [`LotteryError::is_retryable`]).
    pub fn is_recoverable(&self) -> bool {
        match self {
            LotteryError::CombinationNotFound { .. } => true,
            LotteryError::InvalidCombination { .. } => true,
            LotteryError::Cancelled { .. } => true,
            LotteryError::PoolExhausted => true,
            LotteryError::TeamAlreadyPicked { .. } => false, // pool invariant broken
            _ => false,
        }
    }

    /// Whether repeating the operation, possibly with different input, can succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            LotteryError::PoolExhausted => false,
            other => other.is_recoverable(),
        }
    }
}

impl From<csv::Error> for LotteryError {
    fn from(e: csv::Error) -> Self {
        LotteryError::Export(e.to_string())
    }
}

impl From<std::io::Error> for LotteryError {
    fn from(e: std::io::Error) -> Self {
        LotteryError::Export(e.to_string())
    }
}

impl From<serde_json::Error> for LotteryError {
    fn from(e: serde_json::Error) -> Self {
        LotteryError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LotteryError>;
