use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::allocation::deal;
use crate::combination::Combination;
use crate::constants::{round_to, PERCENT_DECIMALS};
use crate::error::{ConfigurationError, LotteryError, Result};
use crate::format::LotteryFormat;
use crate::pool::RemainingPool;
use crate::rng::rng_from_seed;
use crate::team::{validate_tickets, Team};

/// Trials handed to each rayon task in [`estimate_parallel`].
const PARALLEL_CHUNK: usize = 1_000;

/// Estimated chance (%) of every team landing every pick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OddsTable {
    teams: Vec<String>,
    /// `percents[team][pick - 1]`
    percents: Vec<Vec<f64>>,
    trials: usize,
}

impl OddsTable {
    fn from_counts(teams: &[Team], counts: &[Vec<u64>], trials: usize) -> Self {
        let percents = counts
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&c| round_to(c as f64 / trials as f64 * 100.0, PERCENT_DECIMALS))
                    .collect()
            })
            .collect();
        OddsTable {
            teams: teams.iter().map(|t| t.name.clone()).collect(),
            percents,
            trials,
        }
    }

    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Number of pick positions, one per team.
    pub fn picks(&self) -> usize {
        self.teams.len()
    }

    /// Chance (%) of `team` receiving pick `pick` (1-based).
    pub fn get(&self, team: &str, pick: usize) -> Option<f64> {
        self.row(team)?.get(pick.checked_sub(1)?).copied()
    }

    /// Chances for picks 1..=picks of one team.
    pub fn row(&self, team: &str) -> Option<&[f64]> {
        let idx = self.teams.iter().position(|t| t == team)?;
        Some(&self.percents[idx])
    }

    pub fn team_total(&self, team: &str) -> Option<f64> {
        self.row(team).map(|row| row.iter().sum())
    }

    pub fn pick_total(&self, pick: usize) -> Option<f64> {
        let idx = pick.checked_sub(1).filter(|&i| i < self.picks())?;
        Some(self.percents.iter().map(|row| row[idx]).sum())
    }

    /// Normal-approximation interval (%) for one estimate at `level` confidence.
    pub fn confidence_interval(&self, team: &str, pick: usize, level: f64) -> Option<(f64, f64)> {
        if !(level > 0.0 && level < 1.0) || self.trials == 0 {
            return None;
        }
        let p = self.get(team, pick)? / 100.0;
        let z = Normal::new(0.0, 1.0).ok()?.inverse_cdf(0.5 + level / 2.0);
        let half_width = z * (p * (1.0 - p) / self.trials as f64).sqrt();
        Some((
            (p - half_width).max(0.0) * 100.0,
            (p + half_width).min(1.0) * 100.0,
        ))
    }
}

/// Reusable buffers for running trials over one roster.
struct Estimator {
    universe: Vec<Combination>,
    tickets: Vec<u32>,
    pool: RemainingPool,
    /// `counts[team][pick - 1]`
    counts: Vec<Vec<u64>>,
}

impl Estimator {
    fn new(teams: &[Team], format: &LotteryFormat) -> Self {
        let n = teams.len();
        Estimator {
            universe: format.universe(),
            tickets: teams.iter().map(|t| t.tickets).collect(),
            pool: RemainingPool::default(),
            counts: vec![vec![0; n]; n],
        }
    }

    /// Deal a fresh assignment and draw until every team has a pick.
    fn trial<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let rows = deal(&mut self.universe, &self.tickets, rng);
        self.pool.refill(&rows, self.tickets.len(), self.universe.len());

        for pick in 0..self.tickets.len() {
            let Some((_, team)) = self.pool.sample(rng) else {
                break;
            };
            self.counts[team][pick] += 1;
            self.pool.remove_team(team);
        }
    }
}

fn check_inputs(teams: &[Team], format: &LotteryFormat, trials: usize) -> Result<()> {
    validate_tickets(teams, format)?;
    if trials == 0 {
        return Err(ConfigurationError::TrialCount {
            requested: 0,
            min: 1,
            max: usize::MAX,
        }
        .into());
    }
    Ok(())
}

pub(crate) fn run<R: Rng + ?Sized>(
    teams: &[Team],
    format: &LotteryFormat,
    trials: usize,
    rng: &mut R,
    cancel: Option<&AtomicBool>,
) -> Result<OddsTable> {
    check_inputs(teams, format, trials)?;

    let start = Instant::now();
    log::info!("Simulating {} lotteries for {} teams", trials, teams.len());

    let mut estimator = Estimator::new(teams, format);
    for completed in 0..trials {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            log::info!("Simulation cancelled after {} of {} trials", completed, trials);
            return Err(LotteryError::Cancelled {
                completed_trials: completed,
            });
        }
        estimator.trial(rng);
    }

    log::info!(
        "Simulation done ({} runs) in {:.1}s",
        trials,
        start.elapsed().as_secs_f64()
    );
    Ok(OddsTable::from_counts(teams, &estimator.counts, trials))
}

/// Estimate per-pick odds for the default lottery by repeated simulation.
///
/// Every trial deals a fresh assignment and draws until each team has a pick.
/// Nothing outside the returned table is touched.
pub fn estimate<R: Rng + ?Sized>(teams: &[Team], trials: usize, rng: &mut R) -> Result<OddsTable> {
    run(teams, &LotteryFormat::default(), trials, rng, None)
}

pub fn estimate_with_format<R: Rng + ?Sized>(
    teams: &[Team],
    format: &LotteryFormat,
    trials: usize,
    rng: &mut R,
) -> Result<OddsTable> {
    run(teams, format, trials, rng, None)
}

/// [`estimate`] with an optional seed.
pub fn estimate_seeded(teams: &[Team], trials: usize, seed: Option<u64>) -> Result<OddsTable> {
    let mut rng = rng_from_seed(seed);
    estimate(teams, trials, &mut rng)
}

/// [`estimate`] that stops between trials once `cancel` is set.
///
/// A cancelled run returns [`LotteryError::Cancelled`] and no partial table.
pub fn estimate_cancellable<R: Rng + ?Sized>(
    teams: &[Team],
    trials: usize,
    rng: &mut R,
    cancel: &AtomicBool,
) -> Result<OddsTable> {
    run(teams, &LotteryFormat::default(), trials, rng, Some(cancel))
}

/// Run trials across the rayon pool.
///
/// Each trial gets its own generator seeded from a master stream, so the
/// result depends only on `seed`, not on how trials land on threads.
pub fn estimate_parallel(teams: &[Team], trials: usize, seed: Option<u64>) -> Result<OddsTable> {
    let format = LotteryFormat::default();
    check_inputs(teams, &format, trials)?;

    let start = Instant::now();
    let mut master = rng_from_seed(seed);
    let seeds: Vec<u64> = (0..trials).map(|_| master.gen::<u64>()).collect();

    let n = teams.len();
    let counts = seeds
        .par_chunks(PARALLEL_CHUNK)
        .map(|chunk| {
            let mut estimator = Estimator::new(teams, &format);
            for &trial_seed in chunk {
                let mut rng = ChaCha8Rng::seed_from_u64(trial_seed);
                estimator.trial(&mut rng);
            }
            estimator.counts
        })
        .reduce(
            || vec![vec![0; n]; n],
            |mut acc, part| {
                for (acc_row, part_row) in acc.iter_mut().zip(&part) {
                    for (a, p) in acc_row.iter_mut().zip(part_row) {
                        *a += p;
                    }
                }
                acc
            },
        );

    log::info!(
        "Parallel simulation done ({} runs) in {:.1}s",
        trials,
        start.elapsed().as_secs_f64()
    );
    Ok(OddsTable::from_counts(teams, &counts, trials))
}
