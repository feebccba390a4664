use rand::Rng;
use serde::Serialize;

use crate::allocation::Assignment;
use crate::combination::Combination;
use crate::constants::{round_to, PERCENT_DECIMALS};
use crate::error::{LotteryError, Result};
use crate::pool::RemainingPool;
use crate::team::TeamId;

/// Progress of a lottery round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RoundStatus {
    /// Nothing drawn yet
    Idle,
    InProgress,
    /// Every team has its pick
    Complete,
}

/// Record of one successful draw.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DrawnEvent {
    #[serde(rename = "Combination")]
    pub combination: Combination,

    #[serde(rename = "Team")]
    pub team: String,

    #[serde(rename = "Original_Tickets")]
    pub original_tickets: u32,

    #[serde(rename = "Pick")]
    pub pick: usize,
}

/// A team's live position while the round is running.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TeamStanding {
    pub team: String,

    /// Combinations still in the pool
    pub remaining: usize,

    /// Chance (%) that the next draw lands on this team
    pub chance: f64,
}

/// One round of drawing combinations out of an assignment.
///
/// Drawing a combination awards the next pick to its holder and eliminates
/// every other combination that team holds, so no team can be drawn twice.
#[derive(Clone, Debug)]
pub struct LotteryRound {
    assignment: Assignment,
    pool: RemainingPool,
    draft_order: Vec<TeamId>,
    events: Vec<DrawnEvent>,
}

impl LotteryRound {
    pub fn new(assignment: Assignment) -> Self {
        let pool = RemainingPool::new(
            assignment.entries(),
            assignment.teams().len(),
            assignment.format().universe_size() as usize,
        );
        LotteryRound {
            assignment,
            pool,
            draft_order: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Put every combination back and forget the draws so far.
    pub fn reset(&mut self) {
        self.pool.refill(
            self.assignment.entries(),
            self.assignment.teams().len(),
            self.assignment.format().universe_size() as usize,
        );
        self.draft_order.clear();
        self.events.clear();
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn status(&self) -> RoundStatus {
        match self.draft_order.len() {
            0 => RoundStatus::Idle,
            n if n >= self.assignment.teams().len() => RoundStatus::Complete,
            _ => RoundStatus::InProgress,
        }
    }

    /// Awarded teams, first pick first.
    pub fn draft_order(&self) -> Vec<&str> {
        self.draft_order
            .iter()
            .map(|&id| self.assignment.teams()[id].name.as_str())
            .collect()
    }

    pub fn events(&self) -> &[DrawnEvent] {
        &self.events
    }

    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    pub fn remaining_for(&self, team: &str) -> usize {
        self.assignment
            .team_id(team)
            .map_or(0, |id| self.pool.remaining_for(id))
    }

    pub fn contains(&self, combination: &Combination) -> bool {
        self.pool.contains(combination)
    }

    /// Award the next pick to whoever holds `combination`.
    ///
    /// Nothing changes when the combination is not in the pool.
    pub fn resolve(&mut self, combination: Combination) -> Result<DrawnEvent> {
        let team = self
            .pool
            .team_of(&combination)
            .ok_or(LotteryError::CombinationNotFound { combination })?;
        self.award(combination, team)
    }

    /// Draw a uniformly random combination from the pool and resolve it.
    pub fn resolve_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<DrawnEvent> {
        let (combination, team) = self.pool.sample(rng).ok_or(LotteryError::PoolExhausted)?;
        self.award(combination, team)
    }

    fn award(&mut self, combination: Combination, team: TeamId) -> Result<DrawnEvent> {
        let holder = &self.assignment.teams()[team];

        if self.draft_order.contains(&team) {
            log::error!(
                "Combination {} resolved to {} who already holds a pick; pool is inconsistent",
                combination,
                holder.name
            );
            return Err(LotteryError::TeamAlreadyPicked {
                team: holder.name.clone(),
            });
        }

        self.draft_order.push(team);
        let event = DrawnEvent {
            combination,
            team: holder.name.clone(),
            original_tickets: holder.tickets,
            pick: self.draft_order.len(),
        };
        let removed = self.pool.remove_team(team);
        self.events.push(event.clone());

        log::info!(
            "Pick {}: {} ({}), {} combinations removed, {} left",
            event.pick,
            event.team,
            combination,
            removed,
            self.pool.len()
        );

        Ok(event)
    }

    /// Current chance of every team to be drawn next, best first.
    pub fn standings(&self) -> Vec<TeamStanding> {
        let total = self.pool.len();
        let mut rows: Vec<TeamStanding> = self
            .assignment
            .teams()
            .iter()
            .enumerate()
            .map(|(id, team)| {
                let remaining = self.pool.remaining_for(id);
                let chance = if total > 0 {
                    round_to(remaining as f64 / total as f64 * 100.0, PERCENT_DECIMALS)
                } else {
                    0.0
                };
                TeamStanding {
                    team: team.name.clone(),
                    remaining,
                    chance,
                }
            })
            .collect();

        // Stable sort keeps roster order among equal chances
        rows.sort_by(|a, b| b.chance.total_cmp(&a.chance));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::{allocate, allocate_seeded};
    use crate::team::Team;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn make_round(entries: &[(&str, u32)], seed: u64) -> LotteryRound {
        let teams: Vec<Team> = entries
            .iter()
            .map(|(name, tickets)| Team::new(name.to_string(), *tickets))
            .collect();
        LotteryRound::new(allocate_seeded(&teams, Some(seed)).unwrap())
    }

    #[test]
    fn test_whole_team_elimination() {
        let mut round = make_round(&[("A", 500), ("B", 300), ("C", 200)], 5);
        let b_combos = round.assignment().combinations_for("B");

        let event = round.resolve(b_combos[0]).unwrap();
        assert_eq!(event.team, "B");
        assert_eq!(event.pick, 1);
        assert_eq!(event.original_tickets, 300);

        assert_eq!(round.remaining_for("B"), 0);
        assert_eq!(round.remaining(), 700);
        for combo in &b_combos[1..] {
            assert_eq!(
                round.resolve(*combo),
                Err(LotteryError::CombinationNotFound { combination: *combo })
            );
        }
        assert_eq!(round.draft_order(), vec!["B"]);
        assert_eq!(round.status(), RoundStatus::InProgress);
    }

    #[test]
    fn test_failed_draw_changes_nothing() {
        let mut round = make_round(&[("A", 1000)], 9);
        let unassigned = round.assignment().unassigned()[0];

        assert!(matches!(
            round.resolve(unassigned),
            Err(LotteryError::CombinationNotFound { .. })
        ));
        assert_eq!(round.remaining(), 1000);
        assert!(round.events().is_empty());
        assert_eq!(round.status(), RoundStatus::Idle);
    }

    #[test]
    fn test_single_team_scenario() {
        let mut round = make_round(&[("A", 1000)], 13);
        let held = round.assignment().combinations_for("A");
        let event = round.resolve(held[17]).unwrap();
        assert_eq!((event.team.as_str(), event.pick), ("A", 1));
        assert!(round.remaining() == 0);
        assert_eq!(round.status(), RoundStatus::Complete);
    }

    #[test]
    fn test_random_draws_until_exhausted() {
        let mut round = make_round(&[("A", 250), ("B", 250), ("C", 200), ("D", 300)], 21);
        let mut rng = ChaCha8Rng::seed_from_u64(99);

        let mut picks = 0;
        loop {
            match round.resolve_random(&mut rng) {
                Ok(event) => {
                    picks += 1;
                    assert_eq!(event.pick, picks);
                    assert_eq!(round.remaining_for(&event.team), 0);
                }
                Err(e) => {
                    assert_eq!(e, LotteryError::PoolExhausted);
                    break;
                }
            }
        }

        let mut order: Vec<&str> = round.draft_order();
        assert_eq!(order.len(), 4);
        order.sort_unstable();
        assert_eq!(order, vec!["A", "B", "C", "D"]);
        assert_eq!(round.status(), RoundStatus::Complete);
        assert_eq!(round.events().len(), 4);
    }

    #[test]
    fn test_team_already_picked_is_rejected() {
        let teams = vec![Team::new("A".to_string(), 600), Team::new("B".to_string(), 400)];
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut round = LotteryRound::new(allocate(&teams, &mut rng).unwrap());

        let a_combos = round.assignment().combinations_for("A");
        round.resolve(a_combos[0]).unwrap();

        // Force the broken state the pool normally makes impossible
        let a_id = round.assignment().team_id("A").unwrap();
        let entries: Vec<_> = round.assignment().entries().to_vec();
        round.pool.refill(&entries, 2, 1001);
        assert_eq!(round.pool.team_of(&a_combos[1]), Some(a_id));

        let before = round.remaining();
        assert_eq!(
            round.resolve(a_combos[1]),
            Err(LotteryError::TeamAlreadyPicked { team: "A".to_string() })
        );
        assert_eq!(round.remaining(), before);
        assert_eq!(round.draft_order(), vec!["A"]);
    }

    #[test]
    fn test_standings() {
        let mut round = make_round(&[("A", 500), ("B", 300), ("C", 200)], 8);
        let standings = round.standings();
        assert_eq!(standings[0].team, "A");
        assert!((standings[0].chance - 50.0).abs() < 1e-10);

        let a_combo = round.assignment().combinations_for("A")[0];
        round.resolve(a_combo).unwrap();
        let standings = round.standings();
        assert_eq!(standings[0].team, "B");
        assert!((standings[0].chance - 60.0).abs() < 1e-10);
        assert!((standings[1].chance - 40.0).abs() < 1e-10);
        assert_eq!(standings[2].remaining, 0);
        assert_eq!(standings[2].chance, 0.0);
    }

    #[test]
    fn test_reset() {
        let mut round = make_round(&[("A", 500), ("B", 500)], 2);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        round.resolve_random(&mut rng).unwrap();
        round.reset();
        assert_eq!(round.remaining(), 1000);
        assert_eq!(round.status(), RoundStatus::Idle);
        assert!(round.events().is_empty());
    }
}
