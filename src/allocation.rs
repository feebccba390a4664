use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::combination::Combination;
use crate::error::Result;
use crate::format::LotteryFormat;
use crate::rng::rng_from_seed;
use crate::team::{validate_tickets, Team, TeamId};

/// One row of the assignment table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AssignedCombination {
    #[serde(rename = "Combination")]
    pub combination: Combination,

    #[serde(rename = "Team")]
    pub team: String,
}

/// Which team holds which combination for one lottery round.
///
/// Each team holds exactly as many combinations as it has tickets and no
/// combination is held twice. Combinations left over when the universe is
/// larger than the ticket total belong to nobody.
#[derive(Clone, Debug)]
pub struct Assignment {
    format: LotteryFormat,
    teams: Vec<Team>,
    rows: Vec<(Combination, TeamId)>,
    /// Owner of each combination, indexed by combination rank
    owners: Vec<Option<TeamId>>,
}

impl Assignment {
    fn from_rows(format: LotteryFormat, teams: Vec<Team>, rows: Vec<(Combination, TeamId)>) -> Self {
        let mut owners = vec![None; format.universe_size() as usize];
        for &(combo, team) in &rows {
            owners[combo.rank()] = Some(team);
        }
        Assignment {
            format,
            teams,
            rows,
            owners,
        }
    }

    pub fn format(&self) -> &LotteryFormat {
        &self.format
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Assigned combinations in dealing order, with their team ids.
    pub fn entries(&self) -> &[(Combination, TeamId)] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The assignment as a table of named rows.
    pub fn rows(&self) -> Vec<AssignedCombination> {
        self.rows
            .iter()
            .map(|&(combination, team)| AssignedCombination {
                combination,
                team: self.teams[team].name.clone(),
            })
            .collect()
    }

    pub fn owner(&self, combination: &Combination) -> Option<&Team> {
        self.owners
            .get(combination.rank())
            .copied()
            .flatten()
            .map(|id| &self.teams[id])
    }

    pub fn team_id(&self, name: &str) -> Option<TeamId> {
        self.teams.iter().position(|t| t.name == name)
    }

    pub fn combinations_for(&self, name: &str) -> Vec<Combination> {
        match self.team_id(name) {
            Some(id) => self
                .rows
                .iter()
                .filter(|&&(_, team)| team == id)
                .map(|&(combo, _)| combo)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Combinations of the universe no team holds.
    pub fn unassigned(&self) -> Vec<Combination> {
        self.format
            .universe()
            .into_iter()
            .filter(|c| self.owners[c.rank()].is_none())
            .collect()
    }
}

/// Shuffle `universe` and deal consecutive blocks to each team in order.
///
/// Team `i` receives the `tickets[i]` combinations following the blocks of
/// teams `0..i`. Callers guarantee the tickets fit inside the universe.
pub(crate) fn deal<R: Rng + ?Sized>(
    universe: &mut [Combination],
    tickets: &[u32],
    rng: &mut R,
) -> Vec<(Combination, TeamId)> {
    universe.shuffle(rng);

    let mut rows = Vec::with_capacity(tickets.iter().map(|&t| t as usize).sum());
    let mut combos = universe.iter();
    for (team, &count) in tickets.iter().enumerate() {
        for combo in combos.by_ref().take(count as usize) {
            rows.push((*combo, team));
        }
    }
    rows
}

/// Assign combinations of the default 14-ball, 1000-ticket lottery.
pub fn allocate<R: Rng + ?Sized>(teams: &[Team], rng: &mut R) -> Result<Assignment> {
    allocate_with_format(teams, LotteryFormat::default(), rng)
}

/// Assign combinations to teams in proportion to their tickets.
///
/// Fails without consuming randomness when the tickets do not add up to the
/// format's total or cannot all receive a distinct combination.
pub fn allocate_with_format<R: Rng + ?Sized>(
    teams: &[Team],
    format: LotteryFormat,
    rng: &mut R,
) -> Result<Assignment> {
    validate_tickets(teams, &format)?;

    let mut universe = format.universe();
    let tickets: Vec<u32> = teams.iter().map(|t| t.tickets).collect();
    let rows = deal(&mut universe, &tickets, rng);

    log::debug!(
        "Assigned {} of {} combinations to {} teams",
        rows.len(),
        universe.len(),
        teams.len()
    );

    Ok(Assignment::from_rows(format, teams.to_vec(), rows))
}

/// [`allocate`] with an optional seed for reproducible tables.
pub fn allocate_seeded(teams: &[Team], seed: Option<u64>) -> Result<Assignment> {
    let mut rng = rng_from_seed(seed);
    allocate(teams, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigurationError, LotteryError};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::{HashMap, HashSet};

    fn make_teams(entries: &[(&str, u32)]) -> Vec<Team> {
        entries
            .iter()
            .map(|(name, tickets)| Team::new(name.to_string(), *tickets))
            .collect()
    }

    #[test]
    fn test_allocation_complete() {
        let teams = make_teams(&[("A", 250), ("B", 200), ("C", 150), ("D", 400)]);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let assignment = allocate(&teams, &mut rng).unwrap();

        assert_eq!(assignment.len(), 1000);

        let unique: HashSet<_> = assignment.entries().iter().map(|(c, _)| *c).collect();
        assert_eq!(unique.len(), 1000);

        let mut counts: HashMap<String, u32> = HashMap::new();
        for row in assignment.rows() {
            *counts.entry(row.team).or_insert(0) += 1;
        }
        for team in &teams {
            assert_eq!(counts[&team.name], team.tickets);
        }
    }

    #[test]
    fn test_allocation_deterministic() {
        let teams = make_teams(&[("A", 600), ("B", 400)]);
        let first = allocate_seeded(&teams, Some(42)).unwrap();
        let second = allocate_seeded(&teams, Some(42)).unwrap();
        assert_eq!(first.rows(), second.rows());
    }

    #[test]
    fn test_rejects_wrong_sum() {
        let teams = make_teams(&[("A", 600), ("B", 401)]);
        let err = allocate_seeded(&teams, Some(1)).unwrap_err();
        assert_eq!(
            err,
            LotteryError::Configuration(ConfigurationError::TicketSum { found: 1001, expected: 1000 })
        );
    }

    #[test]
    fn test_rejects_demand_beyond_universe() {
        let teams = make_teams(&[("A", 600), ("B", 400)]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = allocate_with_format(&teams, LotteryFormat::new(12, 1000), &mut rng).unwrap_err();
        assert!(matches!(
            err,
            LotteryError::Configuration(ConfigurationError::InsufficientCombinations { .. })
        ));
    }

    #[test]
    fn test_single_team_leaves_one_unassigned() {
        let teams = make_teams(&[("A", 1000)]);
        let assignment = allocate_seeded(&teams, Some(3)).unwrap();

        assert_eq!(assignment.len(), 1000);
        let unassigned = assignment.unassigned();
        assert_eq!(unassigned.len(), 1);
        assert!(assignment.owner(&unassigned[0]).is_none());

        let held = assignment.combinations_for("A");
        assert_eq!(held.len(), 1000);
        assert_eq!(assignment.owner(&held[0]).map(|t| t.name.as_str()), Some("A"));
    }

    proptest! {
        #[test]
        fn prop_every_team_gets_its_tickets(
            cuts in proptest::collection::btree_set(1u32..1000, 1..8),
            seed in any::<u64>()
        ) {
            let mut bounds: Vec<u32> = vec![0];
            bounds.extend(cuts.iter().copied());
            bounds.push(1000);
            let teams: Vec<Team> = bounds
                .windows(2)
                .enumerate()
                .map(|(i, w)| Team::new(format!("T{}", i), w[1] - w[0]))
                .collect();

            let assignment = allocate_seeded(&teams, Some(seed)).unwrap();
            prop_assert_eq!(assignment.len(), 1000);
            for team in &teams {
                prop_assert_eq!(assignment.combinations_for(&team.name).len(), team.tickets as usize);
            }
        }
    }
}
