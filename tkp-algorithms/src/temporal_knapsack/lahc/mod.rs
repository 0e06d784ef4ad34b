use anyhow::Result;
use serde_json::{Map, Value};
mod params;
mod state;
mod construct;
mod neighborhood;
mod local_search;
mod solver;
pub use params::{Params, Strategy};
pub use state::{State, INFEASIBLE};
pub use construct::{build_initial_solution, build_initial_solution_with, greedy_by_price, randomized_insertion};
pub use neighborhood::{one_flip, OneFlip};
pub use local_search::{optimize, History, Lahc};
pub use solver::{RunSummary, Solver};
use tkp_challenges::temporal_knapsack::*;

pub fn solve_challenge(
    challenge: &Challenge,
    save_solution: &dyn Fn(&Solution) -> Result<()>,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<()> {
    Solver::solve(challenge, Some(save_solution), hyperparameters)?;
    Ok(())
}

pub fn help() {
    println!("Late Acceptance Hill Climbing over single bid flips.");
    println!();
    println!("Hyperparameters (JSON object, all optional):");
    println!("  history_length          late acceptance history length (default 10, >= 1)");
    println!("  iteration_limit         number of full neighborhood sweeps (default 100)");
    println!("  strategy                \"greedy\" or \"random\" initial solution (default greedy)");
    println!("  seed                    u64 seed, required by the random strategy");
    println!("  stop_at_first_conflict  random construction stops at the first misfit (default false)");
}
