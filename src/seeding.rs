use serde::Serialize;
use std::collections::HashMap;

use crate::simulation::OddsTable;
use crate::team::Team;

/// Rank (1 = most tickets) of every team.
///
/// Teams with equal tickets are ordered by name so the ranking never depends
/// on the order the roster was entered in.
pub fn seed_map(teams: &[Team]) -> HashMap<String, usize> {
    let mut sorted: Vec<&Team> = teams.iter().collect();
    sorted.sort_by(|a, b| b.tickets.cmp(&a.tickets).then_with(|| a.name.cmp(&b.name)));

    sorted
        .into_iter()
        .enumerate()
        .map(|(idx, team)| (team.name.clone(), idx + 1))
        .collect()
}

/// How many places `team` moved relative to its seed when drafting at `pick`.
///
/// Positive means the team drafts earlier than its tickets predicted.
pub fn delta(seeds: &HashMap<String, usize>, team: &str, pick: usize) -> Option<i64> {
    seeds.get(team).map(|&seed| seed as i64 - pick as i64)
}

/// One line of the draft order with its seed comparison.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PickSummary {
    pub pick: usize,
    pub team: String,
    pub seed: usize,
    pub delta: i64,

    /// Pre-draw simulated chance (%) of this team landing this pick
    pub simulated_odds: Option<f64>,
}

/// Seed, delta and simulated odds for every pick made so far.
///
/// Teams missing from the roster are skipped.
pub fn draft_summary(teams: &[Team], draft_order: &[&str], odds: Option<&OddsTable>) -> Vec<PickSummary> {
    let seeds = seed_map(teams);

    draft_order
        .iter()
        .enumerate()
        .filter_map(|(idx, &team)| {
            let pick = idx + 1;
            let seed = *seeds.get(team)?;
            Some(PickSummary {
                pick,
                team: team.to_string(),
                seed,
                delta: seed as i64 - pick as i64,
                simulated_odds: odds.and_then(|table| table.get(team, pick)),
            })
        })
        .collect()
}
