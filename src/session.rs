use serde::Serialize;
use std::sync::atomic::AtomicBool;

use crate::allocation::{allocate_with_format, Assignment};
use crate::combination::Combination;
use crate::config::{validate_trials, LotteryConfig};
use crate::constants::COMBINATION_SIZE;
use crate::draw::{DrawnEvent, LotteryRound, RoundStatus, TeamStanding};
use crate::error::{ConfigurationError, LotteryError, Result};
use crate::rng::{rng_from_seed, LotteryRng};
use crate::seeding::{draft_summary, seed_map, PickSummary};
use crate::simulation::{self, OddsTable};
use crate::team::{League, Team};

/// Everything known about a pick right after it was drawn.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DrawOutcome {
    pub combination: Combination,
    pub team: String,
    pub pick: usize,
    pub original_tickets: u32,

    /// Original ticket share (%), two decimals
    pub original_share: f64,

    pub seed: usize,

    /// Seed minus pick; positive when the team moved up
    pub delta: i64,

    /// Simulated chance (%) of this team landing this pick, if a simulation ran
    pub simulated_odds: Option<f64>,
}

/// One league's lottery from setup to final pick.
///
/// Owns the roster, the current assignment and round, the last simulated odds
/// and the random source. Applying a new roster or restarting replaces the
/// assignment and forgets every draw.
pub struct LotterySession {
    config: LotteryConfig,
    league: Option<League>,
    round: Option<LotteryRound>,
    odds: Option<OddsTable>,
    rng: LotteryRng,
}

impl LotterySession {
    pub fn new(config: LotteryConfig) -> Result<Self> {
        config.validate()?;
        let rng = rng_from_seed(config.seed);
        Ok(LotterySession {
            config,
            league: None,
            round: None,
            odds: None,
            rng,
        })
    }

    pub fn config(&self) -> &LotteryConfig {
        &self.config
    }

    pub fn league(&self) -> Option<&League> {
        self.league.as_ref()
    }

    pub fn teams(&self) -> &[Team] {
        self.league.as_ref().map(|l| l.teams()).unwrap_or_default()
    }

    pub fn round(&self) -> Option<&LotteryRound> {
        self.round.as_ref()
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        self.round.as_ref().map(|r| r.assignment())
    }

    pub fn odds(&self) -> Option<&OddsTable> {
        self.odds.as_ref()
    }

    /// Validate a roster, deal its combinations and start a fresh round.
    ///
    /// On error the session keeps its previous roster and round untouched.
    pub fn apply_teams(&mut self, entries: Vec<Team>) -> Result<&Assignment> {
        let league = League::new(entries, self.config.format())?;
        let assignment = allocate_with_format(league.teams(), *league.format(), &mut self.rng)?;

        log::info!(
            "Teams applied: {} teams, {} combinations assigned",
            league.len(),
            assignment.len()
        );

        self.league = Some(league);
        self.odds = None;
        Ok(self.round.insert(LotteryRound::new(assignment)).assignment())
    }

    /// Deal a new assignment for the same teams and start over.
    pub fn restart(&mut self) -> Result<&Assignment> {
        let league = self.league.as_ref().ok_or(ConfigurationError::NoTeams)?;
        let assignment = allocate_with_format(league.teams(), *league.format(), &mut self.rng)?;

        log::info!("Lottery restarted with {} teams", league.len());

        self.odds = None;
        Ok(self.round.insert(LotteryRound::new(assignment)).assignment())
    }

    /// Undo every draw but keep the current assignment.
    pub fn reset_draws(&mut self) -> Result<()> {
        self.round_mut()?.reset();
        log::debug!("Draws reset");
        Ok(())
    }

    /// Forget teams, assignment, draws and odds.
    pub fn clear(&mut self) {
        self.league = None;
        self.round = None;
        self.odds = None;
        log::info!("Session cleared");
    }

    fn round_mut(&mut self) -> Result<&mut LotteryRound> {
        self.round
            .as_mut()
            .ok_or(LotteryError::from(ConfigurationError::NoTeams))
    }

    /// Award a pick for numbers drawn by hand, in any order.
    pub fn draw_manual(&mut self, numbers: [u8; COMBINATION_SIZE]) -> Result<DrawOutcome> {
        let combination = Combination::new(numbers, self.config.number_range)?;
        self.draw_combination(combination)
    }

    pub fn draw_combination(&mut self, combination: Combination) -> Result<DrawOutcome> {
        let event = self.round_mut()?.resolve(combination)?;
        Ok(self.outcome(event))
    }

    /// Award a pick for a combination chosen at random from the pool.
    pub fn draw_random(&mut self) -> Result<DrawOutcome> {
        let round = self.round.as_mut().ok_or(ConfigurationError::NoTeams)?;
        let event = round.resolve_random(&mut self.rng)?;
        Ok(self.outcome(event))
    }

    fn outcome(&self, event: DrawnEvent) -> DrawOutcome {
        let teams = self.teams();
        let total = self.config.total_tickets;
        let seed = seed_map(teams).get(&event.team).copied().unwrap_or(event.pick);
        let original_share = teams
            .iter()
            .find(|t| t.name == event.team)
            .map_or(0.0, |t| t.share(total));
        let simulated_odds = self.odds.as_ref().and_then(|o| o.get(&event.team, event.pick));

        DrawOutcome {
            combination: event.combination,
            team: event.team,
            pick: event.pick,
            original_tickets: event.original_tickets,
            original_share,
            seed,
            delta: seed as i64 - event.pick as i64,
            simulated_odds,
        }
    }

    /// Simulate the lottery for the applied roster and keep the resulting odds.
    ///
    /// Uses the configured trial count when `trials` is `None`. The live round
    /// is not touched.
    pub fn run_simulation(&mut self, trials: Option<usize>) -> Result<&OddsTable> {
        self.simulate(trials, None)
    }

    /// [`LotterySession::run_simulation`] that stops between trials once
    /// `cancel` is set. A cancelled run keeps the previous odds.
    pub fn run_simulation_cancellable(
        &mut self,
        trials: Option<usize>,
        cancel: &AtomicBool,
    ) -> Result<&OddsTable> {
        self.simulate(trials, Some(cancel))
    }

    fn simulate(&mut self, trials: Option<usize>, cancel: Option<&AtomicBool>) -> Result<&OddsTable> {
        let trials = trials.unwrap_or(self.config.simulation_trials);
        validate_trials(trials)?;
        let league = self.league.as_ref().ok_or(ConfigurationError::NoTeams)?;

        let table = simulation::run(league.teams(), league.format(), trials, &mut self.rng, cancel)?;
        Ok(self.odds.insert(table))
    }

    pub fn status(&self) -> Option<RoundStatus> {
        self.round.as_ref().map(|r| r.status())
    }

    pub fn draft_order(&self) -> Vec<&str> {
        self.round.as_ref().map_or_else(Vec::new, |r| r.draft_order())
    }

    pub fn events(&self) -> &[DrawnEvent] {
        self.round.as_ref().map(|r| r.events()).unwrap_or_default()
    }

    pub fn standings(&self) -> Vec<TeamStanding> {
        self.round.as_ref().map_or_else(Vec::new, |r| r.standings())
    }

    /// Seed comparison for every pick made so far.
    pub fn draft_summary(&self) -> Vec<PickSummary> {
        draft_summary(self.teams(), &self.draft_order(), self.odds.as_ref())
    }

    /// Headline for the draft ceremony, e.g. "My League 2025".
    pub fn title(&self) -> String {
        format!("{} {}", self.config.league_name, self.config.draft_year)
    }
}
