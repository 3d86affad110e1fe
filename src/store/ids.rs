//! Deal identifier generation.
//!
//! Ids have the form `D` followed by a four-digit number. Both strategies
//! probe the store so a generated id never collides with an existing deal.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::repository::{DealStore, StoreError};

const MIN_ID: u32 = 1000;
const MAX_ID: u32 = 9999;
/// Random draws tried before falling back to a linear scan.
const RANDOM_ATTEMPTS: usize = 64;

/// How new deal ids are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdStrategy {
    /// Seeded random four-digit numbers.
    Random,
    /// Counting up from `D1000`.
    Sequential,
}

impl IdStrategy {
    pub const NAMES: &[&str] = &["random", "sequential"];
}

impl FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Self::Random),
            "sequential" => Ok(Self::Sequential),
            other => Err(format!(
                "unknown id strategy \"{other}\", available: {}",
                Self::NAMES.join(", ")
            )),
        }
    }
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => f.write_str("random"),
            Self::Sequential => f.write_str("sequential"),
        }
    }
}

/// Stateful deal id source.
pub enum DealIdGenerator {
    Random(StdRng),
    Sequential { next: u32 },
}

impl DealIdGenerator {
    /// Creates a generator for `strategy`; `seed` only affects `Random`.
    pub fn new(strategy: IdStrategy, seed: u64) -> Self {
        match strategy {
            IdStrategy::Random => Self::Random(StdRng::seed_from_u64(seed)),
            IdStrategy::Sequential => Self::Sequential { next: MIN_ID },
        }
    }

    /// Returns an id not currently present in `store`.
    ///
    /// # Errors
    ///
    /// Propagates store failures, and returns `StoreError::IdSpaceExhausted`
    /// when every id in `D1000..=D9999` is taken (or, for the sequential
    /// strategy, every id above the counter).
    pub fn next_id(&mut self, store: &dyn DealStore) -> Result<String, StoreError> {
        match self {
            Self::Random(rng) => {
                for _ in 0..RANDOM_ATTEMPTS {
                    let id = format_id(rng.random_range(MIN_ID..=MAX_ID));
                    if !store.contains_deal(&id)? {
                        return Ok(id);
                    }
                }
                for n in MIN_ID..=MAX_ID {
                    let id = format_id(n);
                    if !store.contains_deal(&id)? {
                        return Ok(id);
                    }
                }
                Err(StoreError::IdSpaceExhausted {
                    probed: RANDOM_ATTEMPTS + (MAX_ID - MIN_ID + 1) as usize,
                })
            }
            Self::Sequential { next } => {
                let start = *next;
                while *next <= MAX_ID {
                    let id = format_id(*next);
                    *next += 1;
                    if !store.contains_deal(&id)? {
                        return Ok(id);
                    }
                }
                Err(StoreError::IdSpaceExhausted {
                    probed: (MAX_ID + 1 - start) as usize,
                })
            }
        }
    }
}

fn format_id(n: u32) -> String {
    format!("D{n}")
}
