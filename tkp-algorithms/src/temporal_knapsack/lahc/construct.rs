use super::params::Strategy;
use super::state::State;
use anyhow::{anyhow, Result};
use rand::{rngs::SmallRng, seq::SliceRandom, Rng, SeedableRng};
use tkp_challenges::temporal_knapsack::Challenge;

/// Builds a feasible starting state.
///
/// `seed` is required for [`Strategy::Random`] and ignored otherwise.
pub fn build_initial_solution<'a>(
    ch: &'a Challenge,
    strategy: Strategy,
    seed: Option<u64>,
) -> Result<State<'a>> {
    build_initial_solution_with(ch, strategy, seed, false)
}

pub fn build_initial_solution_with<'a>(
    ch: &'a Challenge,
    strategy: Strategy,
    seed: Option<u64>,
    stop_at_first_conflict: bool,
) -> Result<State<'a>> {
    let mut state = State::new_empty(ch);
    match strategy {
        Strategy::Greedy => greedy_by_price(&mut state),
        Strategy::Random => {
            let seed = seed.ok_or_else(|| anyhow!("Random construction requires a seed"))?;
            let mut rng = SmallRng::seed_from_u64(seed);
            randomized_insertion(&mut state, &mut rng, stop_at_first_conflict);
        }
    }
    // the empty selection is always feasible, anything else is a bug
    debug_assert!(state.is_feasible(), "Initial solution violates capacity");
    Ok(state)
}

/// Visits bids by descending price (stable on bid index) and keeps every
/// bid that fits next to the ones already kept.
pub fn greedy_by_price(state: &mut State) {
    let ch = state.ch;
    let mut by_price: Vec<usize> = (0..ch.num_bids).collect();
    by_price.sort_by(|&a, &b| ch.prices[b].cmp(&ch.prices[a]));

    for i in by_price {
        if ch.demands[i] > ch.capacity {
            continue;
        }
        state.try_add_item(i);
    }
}

/// Visits bids in an order drawn from `rng`. With `stop_at_first_conflict`
/// the construction ends at the first bid that does not fit, otherwise that
/// bid is skipped.
pub fn randomized_insertion<R: Rng>(state: &mut State, rng: &mut R, stop_at_first_conflict: bool) {
    let ch = state.ch;
    let mut order: Vec<usize> = (0..ch.num_bids).collect();
    order.shuffle(rng);

    for i in order {
        let fits = ch.demands[i] <= ch.capacity && state.try_add_item(i);
        if !fits && stop_at_first_conflict {
            break;
        }
    }
}
