use rand::Rng;

use crate::combination::Combination;
use crate::team::TeamId;

/// Combinations still in play, indexed both by combination and by team.
///
/// Lookups go through the combination rank, and a drawn team's whole stake is
/// removed by walking that team's own list, so eliminating a team costs time
/// proportional to what it still holds rather than to the pool size.
#[derive(Clone, Debug, Default)]
pub struct RemainingPool {
    entries: Vec<(Combination, TeamId)>,
    /// Position in `entries`, indexed by combination rank
    slots: Vec<Option<usize>>,
    by_team: Vec<Vec<Combination>>,
}

impl RemainingPool {
    pub fn new(rows: &[(Combination, TeamId)], team_count: usize, universe_size: usize) -> Self {
        let mut pool = RemainingPool::default();
        pool.refill(rows, team_count, universe_size);
        pool
    }

    /// Replace the contents, keeping allocated buffers.
    pub fn refill(&mut self, rows: &[(Combination, TeamId)], team_count: usize, universe_size: usize) {
        self.entries.clear();
        self.slots.clear();
        self.slots.resize(universe_size, None);
        self.by_team.iter_mut().for_each(Vec::clear);
        self.by_team.resize_with(team_count, Vec::new);

        for &(combo, team) in rows {
            self.slots[combo.rank()] = Some(self.entries.len());
            self.entries.push((combo, team));
            self.by_team[team].push(combo);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn team_of(&self, combination: &Combination) -> Option<TeamId> {
        let idx = self.slots.get(combination.rank()).copied().flatten()?;
        Some(self.entries[idx].1)
    }

    pub fn contains(&self, combination: &Combination) -> bool {
        self.team_of(combination).is_some()
    }

    /// Combinations `team` still holds.
    pub fn remaining_for(&self, team: TeamId) -> usize {
        self.by_team.get(team).map_or(0, Vec::len)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Combination, TeamId)> {
        self.entries.iter()
    }

    /// A uniformly chosen remaining combination and its holder.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(Combination, TeamId)> {
        if self.entries.is_empty() {
            return None;
        }
        Some(self.entries[rng.gen_range(0..self.entries.len())])
    }

    /// Drop every combination `team` holds. Returns how many were removed.
    pub fn remove_team(&mut self, team: TeamId) -> usize {
        let Some(held) = self.by_team.get_mut(team) else {
            return 0;
        };
        let removed = held.len();

        for combo in held.drain(..) {
            let Some(idx) = self.slots[combo.rank()].take() else {
                continue;
            };
            self.entries.swap_remove(idx);
            if let Some(&(moved, _)) = self.entries.get(idx) {
                self.slots[moved.rank()] = Some(idx);
            }
        }

        removed
    }
}
