use super::neighborhood::one_flip;
use super::state::State;
use anyhow::{anyhow, Result};
use tracing::{debug, trace};

/// Circular buffer of recently accepted objectives, indexed by the number
/// of accepted moves modulo its length.
#[derive(Clone, Debug, PartialEq)]
pub struct History {
    costs: Vec<i64>,
}

impl History {
    pub fn new(len: usize, initial: i64) -> Result<Self> {
        if len == 0 {
            return Err(anyhow!("history_length must be at least 1"));
        }
        Ok(Self { costs: vec![initial; len] })
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    #[inline(always)]
    pub fn slot(&self, accepted: usize) -> usize {
        accepted % self.costs.len()
    }

    #[inline(always)]
    pub fn get(&self, slot: usize) -> i64 {
        self.costs[slot]
    }

    #[inline(always)]
    fn set(&mut self, slot: usize, cost: i64) {
        self.costs[slot] = cost;
    }

    pub fn costs(&self) -> &[i64] {
        &self.costs
    }
}

/// Late Acceptance Hill Climbing over the one-flip neighborhood.
///
/// Each sweep enumerates the neighborhood of the state current at the start
/// of the sweep, while every acceptance test compares against the live
/// current objective and the history slot of the live acceptance count.
pub struct Lahc<'a> {
    current: State<'a>,
    best: State<'a>,
    history: History,
    accepted: usize,
    sweeps: usize,
}

impl<'a> Lahc<'a> {
    pub fn new(initial: State<'a>, history_length: usize) -> Result<Self> {
        if !initial.is_feasible() {
            return Err(anyhow!("LAHC must start from a feasible state"));
        }
        let history = History::new(history_length, initial.objective())?;
        Ok(Self {
            best: initial.clone(),
            current: initial,
            history,
            accepted: 0,
            sweeps: 0,
        })
    }

    /// Runs one full sweep. Returns whether the best state improved.
    pub fn sweep(&mut self) -> bool {
        let base = self.current.clone();
        let mut improved = false;
        for candidate in one_flip(&base) {
            // infeasible candidates report a negative objective
            let cost = candidate.objective();
            if cost <= 0 {
                continue;
            }
            let v = self.history.slot(self.accepted);
            if cost >= self.current.objective() || cost >= self.history.get(v) {
                trace!(sweep = self.sweeps, accepted = self.accepted, cost, "accepted move");
                self.history.set(v, cost);
                self.accepted += 1;
                if cost > self.best.objective() {
                    self.best = candidate.clone();
                    improved = true;
                }
                self.current = candidate;
            }
        }
        if improved {
            debug!(sweep = self.sweeps, objective = self.best.objective(), "new best");
        }
        self.sweeps += 1;
        improved
    }

    pub fn current(&self) -> &State<'a> {
        &self.current
    }

    pub fn best(&self) -> &State<'a> {
        &self.best
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Number of accepted moves so far.
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    pub fn into_best(self) -> State<'a> {
        self.best
    }
}

/// Runs exactly `iteration_limit` sweeps from `initial` and returns the best
/// state seen.
pub fn optimize<'a>(
    initial: State<'a>,
    history_length: usize,
    iteration_limit: usize,
) -> Result<State<'a>> {
    let mut lahc = Lahc::new(initial, history_length)?;
    for _ in 0..iteration_limit {
        lahc.sweep();
    }
    Ok(lahc.into_best())
}
