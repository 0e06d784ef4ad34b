use super::construct::build_initial_solution_with;
use super::local_search::Lahc;
use super::params::Params;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tkp_challenges::temporal_knapsack::*;
use tracing::info;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub initial_objective: i64,
    pub objective: i64,
    pub accepted_moves: usize,
    pub solution: Solution,
}

pub struct Solver;

impl Solver {
    pub fn solve(
        challenge: &Challenge,
        save_solution: Option<&dyn Fn(&Solution) -> Result<()>>,
        hyperparameters: &Option<Map<String, Value>>,
    ) -> Result<Solution> {
        let params = Params::initialize(hyperparameters)?;
        let summary = Self::run(challenge, &params, save_solution)?;
        Ok(summary.solution)
    }

    /// Constructs, then improves with LAHC. `save_solution` receives the
    /// initial solution and the best one after every improving sweep.
    pub fn run(
        challenge: &Challenge,
        params: &Params,
        save_solution: Option<&dyn Fn(&Solution) -> Result<()>>,
    ) -> Result<RunSummary> {
        params.validate()?;
        let initial = build_initial_solution_with(
            challenge,
            params.strategy,
            params.seed,
            params.stop_at_first_conflict,
        )?;
        let initial_objective = initial.objective();
        if let Some(save) = save_solution {
            save(&initial.to_solution())?;
        }

        let mut lahc = Lahc::new(initial, params.history_length)?;
        for _ in 0..params.iteration_limit {
            if lahc.sweep() {
                if let Some(save) = save_solution {
                    save(&lahc.best().to_solution())?;
                }
            }
        }

        let accepted_moves = lahc.accepted();
        let best = lahc.into_best();
        info!(
            num_bids = challenge.num_bids,
            initial_objective,
            objective = best.objective(),
            accepted_moves,
            "lahc finished"
        );
        Ok(RunSummary {
            initial_objective,
            objective: best.objective(),
            accepted_moves,
            solution: best.to_solution(),
        })
    }
}
