use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// How the initial solution is built.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Descending price, ties broken by bid index.
    Greedy,
    /// Seeded random order.
    Random,
}

impl FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "greedy" => Ok(Strategy::Greedy),
            "random" => Ok(Strategy::Random),
            _ => Err(anyhow!("Unknown strategy '{}', expected greedy or random", s)),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Params {
    /// Length of the late acceptance history
    pub history_length: usize,

    /// Number of full one-flip sweeps
    pub iteration_limit: usize,

    pub strategy: Strategy,

    /// Seed for the random construction
    pub seed: Option<u64>,

    /// Random construction gives up at the first bid that does not fit
    pub stop_at_first_conflict: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            history_length: 10,
            iteration_limit: 100,
            strategy: Strategy::Greedy,
            seed: None,
            stop_at_first_conflict: false,
        }
    }
}

impl Params {
    /// Reads known keys from `h`. A key that is present with the wrong json
    /// type is an error; `null` counts as absent.
    pub fn initialize(h: &Option<Map<String, Value>>) -> Result<Self> {
        let mut p = Self::default();
        if let Some(m) = h {
            if let Some(v) = field(m, "history_length", Value::as_u64)? { p.history_length = v as usize; }
            if let Some(v) = field(m, "iteration_limit", Value::as_u64)? { p.iteration_limit = v as usize; }
            if let Some(v) = field(m, "strategy", Value::as_str)? { p.strategy = v.parse()?; }
            if let Some(v) = field(m, "seed", Value::as_u64)? { p.seed = Some(v); }
            if let Some(v) = field(m, "stop_at_first_conflict", Value::as_bool)? { p.stop_at_first_conflict = v; }
        }
        p.validate()?;
        Ok(p)
    }

    pub fn validate(&self) -> Result<()> {
        if self.history_length == 0 {
            return Err(anyhow!("history_length must be at least 1"));
        }
        if self.strategy == Strategy::Random && self.seed.is_none() {
            return Err(anyhow!("Random construction requires a seed"));
        }
        Ok(())
    }
}

fn field<'a, T>(
    m: &'a Map<String, Value>,
    key: &str,
    get: impl Fn(&'a Value) -> Option<T>,
) -> Result<Option<T>> {
    match m.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => get(v)
            .map(Some)
            .ok_or_else(|| anyhow!("Invalid value for hyperparameter '{}': {}", key, v)),
    }
}
