mod err;
pub use err::MalformedInstanceError;

use anyhow::{anyhow, Result};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt, ops::Range, str::FromStr};

/// Parameters for [`Challenge::generate_instance`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Track {
    pub num_bids: usize,
    pub horizon: u32,
    pub capacity: u32,
    pub max_price: u32,
    pub max_demand: u32,
    pub max_duration: u32,
}

impl Default for Track {
    fn default() -> Self {
        Self {
            num_bids: 100,
            horizon: 50,
            capacity: 100,
            max_price: 1000,
            max_demand: 40,
            max_duration: 10,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Solution {
    pub items: Vec<usize>,
}

impl Solution {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }
}

/// A Temporal Knapsack instance.
///
/// Bid intervals are stored 0-indexed and half-open: bid `i` occupies the
/// time units `starts[i]..finishes[i]`. The instance file uses 1-indexed
/// inclusive times, `from_rows` and `Display` convert between the two.
/// Serde goes through the same rows so a deserialized instance is validated.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(into = "ChallengeRows", try_from = "ChallengeRows")]
pub struct Challenge {
    pub num_bids: usize,
    pub capacity: u32,
    pub prices: Vec<u32>,
    pub demands: Vec<u32>,
    pub starts: Vec<usize>,
    pub finishes: Vec<usize>,
    pub horizon: usize,
}

impl Challenge {
    /// Builds an instance from `price demand start finish` rows with
    /// 1-indexed inclusive times.
    pub fn from_rows(
        num_bids: usize,
        capacity: u32,
        rows: &[[u32; 4]],
    ) -> Result<Self, MalformedInstanceError> {
        if rows.len() != num_bids {
            return Err(MalformedInstanceError::BidCountMismatch {
                expected: num_bids,
                found: rows.len(),
            });
        }

        let mut prices = Vec::with_capacity(num_bids);
        let mut demands = Vec::with_capacity(num_bids);
        let mut starts = Vec::with_capacity(num_bids);
        let mut finishes = Vec::with_capacity(num_bids);
        for (bid, &[price, demand, start, finish]) in rows.iter().enumerate() {
            if start == 0 {
                return Err(MalformedInstanceError::ZeroStart { bid });
            }
            if start > finish {
                return Err(MalformedInstanceError::InvertedInterval { bid, start, finish });
            }
            prices.push(price);
            demands.push(demand);
            starts.push(start as usize - 1);
            finishes.push(finish as usize);
        }

        let horizon = finishes.iter().copied().max().unwrap_or(0);
        Ok(Self {
            num_bids,
            capacity,
            prices,
            demands,
            starts,
            finishes,
            horizon,
        })
    }

    pub fn generate_instance(seed: &[u8; 32], track: &Track) -> Result<Self> {
        if track.horizon == 0 || track.max_duration == 0 {
            return Err(anyhow!("horizon and max_duration must be at least 1"));
        }
        if track.max_price == 0 || track.max_demand == 0 {
            return Err(anyhow!("max_price and max_demand must be at least 1"));
        }
        let mut rng = SmallRng::from_seed(seed.clone());

        let rows: Vec<[u32; 4]> = (0..track.num_bids)
            .map(|_| {
                let start = rng.gen_range(1..=track.horizon);
                let duration = rng.gen_range(1..=track.max_duration);
                let finish = (start + duration - 1).min(track.horizon);
                let demand = rng.gen_range(1..=track.max_demand);
                let price = rng.gen_range(1..=track.max_price);
                [price, demand, start, finish]
            })
            .collect();

        Ok(Self::from_rows(track.num_bids, track.capacity, &rows)?)
    }

    /// Time units occupied by `bid`, 0-indexed.
    #[inline]
    pub fn interval(&self, bid: usize) -> Range<usize> {
        self.starts[bid]..self.finishes[bid]
    }

    /// Recomputes the per-time-unit demand of a selection from scratch.
    pub fn time_demand_profile(&self, selected: &[bool]) -> Vec<u64> {
        let mut profile = vec![0u64; self.horizon];
        for bid in (0..self.num_bids).filter(|&i| selected[i]) {
            for t in self.interval(bid) {
                profile[t] += self.demands[bid] as u64;
            }
        }
        profile
    }

    pub fn evaluate_total_price(&self, solution: &Solution) -> Result<i64> {
        let selected_items: HashSet<usize> = solution.items.iter().cloned().collect();
        if selected_items.len() != solution.items.len() {
            return Err(anyhow!("Duplicate bids selected."));
        }

        let mut selected = vec![false; self.num_bids];
        for &bid in &solution.items {
            if bid >= self.num_bids {
                return Err(anyhow!("Bid ({}) is out of bounds", bid));
            }
            selected[bid] = true;
        }

        let profile = self.time_demand_profile(&selected);
        if let Some((t, &demand)) = profile
            .iter()
            .enumerate()
            .find(|&(_, &demand)| demand > self.capacity as u64)
        {
            return Err(anyhow!(
                "Demand ({}) at time {} exceeded capacity ({})",
                demand,
                t + 1,
                self.capacity
            ));
        }

        Ok(solution
            .items
            .iter()
            .map(|&bid| self.prices[bid] as i64)
            .sum())
    }

    pub fn verify_solution(&self, solution: &Solution) -> Result<()> {
        self.evaluate_total_price(solution).map(|_| ())
    }

    fn row(&self, bid: usize) -> [u32; 4] {
        [
            self.prices[bid],
            self.demands[bid],
            self.starts[bid] as u32 + 1,
            self.finishes[bid] as u32,
        ]
    }
}

/// Serialized form of a [`Challenge`]: the rows of the instance file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChallengeRows {
    pub capacity: u32,
    pub bids: Vec<[u32; 4]>,
}

impl From<Challenge> for ChallengeRows {
    fn from(challenge: Challenge) -> Self {
        Self {
            capacity: challenge.capacity,
            bids: (0..challenge.num_bids).map(|bid| challenge.row(bid)).collect(),
        }
    }
}

impl TryFrom<ChallengeRows> for Challenge {
    type Error = MalformedInstanceError;

    fn try_from(rows: ChallengeRows) -> Result<Self, Self::Error> {
        Challenge::from_rows(rows.bids.len(), rows.capacity, &rows.bids)
    }
}

impl FromStr for Challenge {
    type Err = MalformedInstanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines().enumerate().map(|(idx, line)| (idx + 1, line));

        let mut header = |field: &'static str| -> Result<u32, MalformedInstanceError> {
            let (line, text) = lines
                .next()
                .ok_or(MalformedInstanceError::MissingHeader(field))?;
            parse_field(line, text.trim())
        };
        let num_bids = header("bid count")? as usize;
        let capacity = header("capacity")?;

        let mut rows = Vec::new();
        for (line, text) in lines {
            if text.trim().is_empty() {
                continue;
            }
            // anything past the fourth field is ignored
            let tokens: Vec<&str> = text.split_whitespace().take(4).collect();
            if tokens.len() < 4 {
                return Err(MalformedInstanceError::ShortRow {
                    line,
                    fields: tokens.len(),
                });
            }
            let mut row = [0u32; 4];
            for (field, token) in row.iter_mut().zip(tokens) {
                *field = parse_field(line, token)?;
            }
            rows.push(row);
        }

        Self::from_rows(num_bids, capacity, &rows)
    }
}

fn parse_field(line: usize, token: &str) -> Result<u32, MalformedInstanceError> {
    token
        .parse::<u32>()
        .map_err(|_| MalformedInstanceError::InvalidInteger {
            line,
            token: token.to_string(),
        })
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.num_bids)?;
        writeln!(f, "{}", self.capacity)?;
        for bid in 0..self.num_bids {
            let [price, demand, start, finish] = self.row(bid);
            writeln!(f, "{} {} {} {}", price, demand, start, finish)?;
        }
        Ok(())
    }
}
