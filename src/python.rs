//! Python bindings for the lottery UI.

use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use std::collections::HashMap;

use crate::allocation;
use crate::combination::all_combinations;
use crate::config::LotteryConfig;
use crate::constants::{COMBINATION_SIZE, DEFAULT_TRIALS, NUMBER_RANGE};
use crate::error::LotteryError;
use crate::export;
use crate::seeding;
use crate::session::{DrawOutcome, LotterySession};
use crate::simulation::{self, OddsTable};
use crate::team::Team;

/// (combination, team, pick, original tickets, original share %, seed, delta, simulated %)
type PyDrawOutcome = (String, String, usize, u32, f64, usize, i64, Option<f64>);

fn to_py_err(e: LotteryError) -> PyErr {
    match e {
        LotteryError::Configuration(_)
        | LotteryError::InvalidCombination { .. }
        | LotteryError::Config(_) => PyValueError::new_err(e.to_string()),
        LotteryError::CombinationNotFound { .. } => PyKeyError::new_err(e.to_string()),
        _ => PyRuntimeError::new_err(e.to_string()),
    }
}

fn to_teams(entries: Vec<(String, u32)>) -> Vec<Team> {
    entries
        .into_iter()
        .map(|(name, tickets)| Team::new(name, tickets))
        .collect()
}

fn odds_to_map(odds: &OddsTable) -> HashMap<String, Vec<f64>> {
    odds.teams()
        .iter()
        .filter_map(|team| Some((team.clone(), odds.row(team)?.to_vec())))
        .collect()
}

fn outcome_tuple(o: DrawOutcome) -> PyDrawOutcome {
    (
        o.combination.to_string(),
        o.team,
        o.pick,
        o.original_tickets,
        o.original_share,
        o.seed,
        o.delta,
        o.simulated_odds,
    )
}

/// Lottery session held by the UI between interactions.
#[pyclass(name = "LotterySession")]
pub struct PyLotterySession {
    inner: LotterySession,
}

#[pymethods]
impl PyLotterySession {
    /// Create a session from an optional JSON config.
    #[new]
    #[pyo3(signature = (config_json = None))]
    fn new(config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => LotteryConfig::from_json(json).map_err(to_py_err)?,
            None => LotteryConfig::default(),
        };
        let inner = LotterySession::new(config).map_err(to_py_err)?;
        Ok(PyLotterySession { inner })
    }

    /// Apply (name, tickets) pairs. Returns the number of assigned combinations.
    fn apply_teams(&mut self, teams: Vec<(String, u32)>) -> PyResult<usize> {
        self.inner
            .apply_teams(to_teams(teams))
            .map(|a| a.len())
            .map_err(to_py_err)
    }

    fn restart(&mut self) -> PyResult<()> {
        self.inner.restart().map(|_| ()).map_err(to_py_err)
    }

    fn reset_draws(&mut self) -> PyResult<()> {
        self.inner.reset_draws().map_err(to_py_err)
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn draw_manual(&mut self, numbers: [u8; COMBINATION_SIZE]) -> PyResult<PyDrawOutcome> {
        self.inner
            .draw_manual(numbers)
            .map(outcome_tuple)
            .map_err(to_py_err)
    }

    fn draw_random(&mut self) -> PyResult<PyDrawOutcome> {
        self.inner.draw_random().map(outcome_tuple).map_err(to_py_err)
    }

    /// Run the Monte Carlo estimate without holding the GIL.
    #[pyo3(signature = (trials = None))]
    fn run_simulation(&mut self, py: Python<'_>, trials: Option<usize>) -> PyResult<HashMap<String, Vec<f64>>> {
        let inner = &mut self.inner;
        py.allow_threads(|| inner.run_simulation(trials).map(odds_to_map))
            .map_err(to_py_err)
    }

    fn odds(&self) -> Option<HashMap<String, Vec<f64>>> {
        self.inner.odds().map(odds_to_map)
    }

    fn teams(&self) -> Vec<(String, u32)> {
        self.inner
            .teams()
            .iter()
            .map(|t| (t.name.clone(), t.tickets))
            .collect()
    }

    fn draft_order(&self) -> Vec<String> {
        self.inner.draft_order().into_iter().map(String::from).collect()
    }

    /// (team, remaining combinations, current chance %) best first.
    fn standings(&self) -> Vec<(String, usize, f64)> {
        self.inner
            .standings()
            .into_iter()
            .map(|s| (s.team, s.remaining, s.chance))
            .collect()
    }

    fn remaining(&self) -> usize {
        self.inner.round().map_or(0, |r| r.remaining())
    }

    /// (pick, team, seed, delta, simulated %) for every pick so far.
    fn draft_summary(&self) -> Vec<(usize, String, usize, i64, Option<f64>)> {
        self.inner
            .draft_summary()
            .into_iter()
            .map(|s| (s.pick, s.team, s.seed, s.delta, s.simulated_odds))
            .collect()
    }

    fn assignment_csv(&self) -> PyResult<String> {
        match self.inner.assignment() {
            Some(a) => export::assignment_csv(a).map_err(to_py_err),
            None => Ok(String::new()),
        }
    }

    fn events_csv(&self) -> PyResult<String> {
        export::events_csv(self.inner.events()).map_err(to_py_err)
    }

    fn odds_csv(&self) -> PyResult<Option<String>> {
        self.inner
            .odds()
            .map(export::odds_csv)
            .transpose()
            .map_err(to_py_err)
    }

    fn draft_order_document(&self) -> String {
        export::draft_order_document(&self.inner.draft_order())
    }

    fn title(&self) -> String {
        self.inner.title()
    }

    fn __repr__(&self) -> String {
        format!(
            "LotterySession({} teams, {} picks)",
            self.inner.teams().len(),
            self.inner.draft_order().len()
        )
    }
}

/// Assign combinations to (name, tickets) pairs.
#[pyfunction]
#[pyo3(signature = (teams, seed = None))]
fn allocate(teams: Vec<(String, u32)>, seed: Option<u64>) -> PyResult<Vec<(String, String)>> {
    let assignment = allocation::allocate_seeded(&to_teams(teams), seed).map_err(to_py_err)?;
    Ok(assignment
        .rows()
        .into_iter()
        .map(|row| (row.combination.to_string(), row.team))
        .collect())
}

/// Per-pick odds (%) for each team.
#[pyfunction]
#[pyo3(signature = (teams, trials = DEFAULT_TRIALS, seed = None, parallel = false))]
fn estimate(
    py: Python<'_>,
    teams: Vec<(String, u32)>,
    trials: usize,
    seed: Option<u64>,
    parallel: bool,
) -> PyResult<HashMap<String, Vec<f64>>> {
    let teams = to_teams(teams);
    py.allow_threads(|| {
        if parallel {
            simulation::estimate_parallel(&teams, trials, seed)
        } else {
            simulation::estimate_seeded(&teams, trials, seed)
        }
    })
    .map(|odds| odds_to_map(&odds))
    .map_err(to_py_err)
}

#[pyfunction]
fn seed_map(teams: Vec<(String, u32)>) -> HashMap<String, usize> {
    seeding::seed_map(&to_teams(teams))
}

#[pyfunction]
#[pyo3(name = "all_combinations")]
fn py_all_combinations() -> Vec<String> {
    all_combinations(NUMBER_RANGE)
        .iter()
        .map(|c| c.to_string())
        .collect()
}

/// Python module definition
#[pymodule]
fn draft_lottery(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyLotterySession>()?;

    m.add_function(wrap_pyfunction!(allocate, m)?)?;
    m.add_function(wrap_pyfunction!(estimate, m)?)?;
    m.add_function(wrap_pyfunction!(seed_map, m)?)?;
    m.add_function(wrap_pyfunction!(py_all_combinations, m)?)?;

    m.add("NUMBER_RANGE", NUMBER_RANGE)?;
    m.add("TOTAL_TICKETS", crate::constants::TOTAL_TICKETS)?;
    m.add("DEFAULT_TRIALS", DEFAULT_TRIALS)?;

    Ok(())
}
