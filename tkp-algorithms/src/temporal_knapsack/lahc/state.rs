use tkp_challenges::temporal_knapsack::*;

/// Objective reported by a state whose demand exceeds capacity somewhere.
pub const INFEASIBLE: i64 = -1;

/// A selection of bids plus everything needed for incremental flips.
///
/// `time_demand` and `total_price` always match `selected_bit` exactly, even
/// while the state is infeasible, so flipping the same bid twice restores
/// the state bit for bit. `overloaded` counts time units above capacity.
#[derive(Clone, Debug)]
pub struct State<'a> {
    pub ch: &'a Challenge,
    pub selected_bit: Vec<bool>,
    pub time_demand: Vec<u64>,
    pub total_price: i64,
    pub overloaded: usize,
}

impl<'a> State<'a> {
    pub fn new_empty(ch: &'a Challenge) -> Self {
        Self {
            ch,
            selected_bit: vec![false; ch.num_bids],
            time_demand: vec![0; ch.horizon],
            total_price: 0,
            overloaded: 0,
        }
    }

    #[inline(always)]
    pub fn is_feasible(&self) -> bool {
        self.overloaded == 0
    }

    /// Total price of the selection, or [`INFEASIBLE`].
    #[inline(always)]
    pub fn objective(&self) -> i64 {
        if self.is_feasible() {
            self.total_price
        } else {
            INFEASIBLE
        }
    }

    pub fn selected_items(&self) -> Vec<usize> {
        (0..self.ch.num_bids).filter(|&i| self.selected_bit[i]).collect()
    }

    pub fn to_solution(&self) -> Solution {
        Solution { items: self.selected_items() }
    }

    #[inline(always)]
    fn capacity(&self) -> u64 {
        self.ch.capacity as u64
    }

    #[inline(always)]
    pub fn add_item(&mut self, i: usize) {
        let demand = self.ch.demands[i] as u64;
        let cap = self.capacity();
        for t in self.ch.interval(i) {
            let before = self.time_demand[t];
            self.time_demand[t] = before + demand;
            if before <= cap && before + demand > cap {
                self.overloaded += 1;
            }
        }
        self.total_price += self.ch.prices[i] as i64;
        self.selected_bit[i] = true;
    }

    #[inline(always)]
    pub fn remove_item(&mut self, i: usize) {
        let demand = self.ch.demands[i] as u64;
        let cap = self.capacity();
        for t in self.ch.interval(i) {
            let before = self.time_demand[t];
            self.time_demand[t] = before - demand;
            if before > cap && before - demand <= cap {
                self.overloaded -= 1;
            }
        }
        self.total_price -= self.ch.prices[i] as i64;
        self.selected_bit[i] = false;
    }

    pub fn flip(&mut self, i: usize) {
        if self.selected_bit[i] {
            self.remove_item(i);
        } else {
            self.add_item(i);
        }
    }

    /// Adds bid `i` only if every time unit of its interval stays within
    /// capacity. On a violation the units already incremented are rolled
    /// back and the state is left untouched.
    pub fn try_add_item(&mut self, i: usize) -> bool {
        debug_assert!(self.is_feasible() && !self.selected_bit[i]);
        let demand = self.ch.demands[i] as u64;
        let cap = self.capacity();
        let interval = self.ch.interval(i);
        for t in interval.clone() {
            self.time_demand[t] += demand;
            if self.time_demand[t] > cap {
                for u in (interval.start..=t).rev() {
                    self.time_demand[u] -= demand;
                }
                return false;
            }
        }
        self.total_price += self.ch.prices[i] as i64;
        self.selected_bit[i] = true;
        true
    }
}
