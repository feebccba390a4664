//! Draft Lottery - fantasy draft lottery engine.
//!
//! Deals a fixed pool of 4-number combinations to teams by ticket count,
//! resolves drawn combinations into a draft order and estimates per-pick
//! odds by Monte Carlo simulation. Python bindings are available behind the
//! `python` feature.

pub mod allocation;
pub mod combination;
pub mod config;
pub mod constants;
pub mod draw;
pub mod error;
pub mod export;
pub mod format;
pub mod pool;
pub mod rng;
pub mod seeding;
pub mod session;
pub mod simulation;
pub mod team;

#[cfg(feature = "python")]
mod python;

pub use allocation::{allocate, allocate_seeded, allocate_with_format, AssignedCombination, Assignment};
pub use combination::{all_combinations, universe_size, Combination};
pub use config::LotteryConfig;
pub use constants::{
    COMBINATION_SIZE, DEFAULT_TRIALS, MAX_NUMBER_RANGE, MAX_TRIALS, MIN_TRIALS, NUMBER_RANGE, TOTAL_TICKETS,
};
pub use draw::{DrawnEvent, LotteryRound, RoundStatus, TeamStanding};
pub use error::{ConfigurationError, LotteryError, Result};
pub use format::LotteryFormat;
pub use pool::RemainingPool;
pub use rng::{rng_from_seed, LotteryRng};
pub use seeding::{delta, draft_summary, seed_map, PickSummary};
pub use session::{DrawOutcome, LotterySession};
pub use simulation::{
    estimate, estimate_cancellable, estimate_parallel, estimate_seeded, estimate_with_format, OddsTable,
};
pub use team::{League, Team, TeamId};
