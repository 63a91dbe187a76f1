//! Human-readable order identifiers: `ORD-<YYYYMMDD>-<NNNNN>`.
//!
//! Generation is a pure function of an instant and a random source. The
//! generator does not guarantee uniqueness; the order store rejects
//! duplicates and checkout retries with a fresh id.

use crate::ids::OrderId;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Prefix shared by every order id.
pub const ORDER_ID_PREFIX: &str = "ORD";

/// Smallest random suffix.
pub const SUFFIX_MIN: u32 = 10_000;

/// Largest random suffix.
pub const SUFFIX_MAX: u32 = 99_999;

/// Build an order id for the UTC date of `now` with a uniform random
/// five-digit suffix.
pub fn generate_order_id<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> OrderId {
    let suffix = rng.gen_range(SUFFIX_MIN..=SUFFIX_MAX);
    OrderId::new(format!(
        "{}-{}-{}",
        ORDER_ID_PREFIX,
        now.format("%Y%m%d"),
        suffix
    ))
}

/// Check that a string has the order id shape.
pub fn is_valid_order_id(id: &str) -> bool {
    let mut parts = id.split('-');
    let (Some(prefix), Some(date), Some(suffix), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    prefix == ORDER_ID_PREFIX
        && date.len() == 8
        && date.bytes().all(|b| b.is_ascii_digit())
        && suffix.len() == 5
        && suffix
            .parse::<u32>()
            .is_ok_and(|n| (SUFFIX_MIN..=SUFFIX_MAX).contains(&n))
}

/// Supplies order ids to checkout.
pub trait OrderIdSource: Send + Sync {
    fn next_id(&self, now: DateTime<Utc>) -> OrderId;
}

/// Ids drawn from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOrderIds;

impl OrderIdSource for RandomOrderIds {
    fn next_id(&self, now: DateTime<Utc>) -> OrderId {
        generate_order_id(now, &mut rand::thread_rng())
    }
}

/// Reproducible ids from a seeded RNG.
#[derive(Debug)]
pub struct SeededOrderIds {
    rng: Mutex<StdRng>,
}

impl SeededOrderIds {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl OrderIdSource for SeededOrderIds {
    fn next_id(&self, now: DateTime<Utc>) -> OrderId {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        generate_order_id(now, &mut *rng)
    }
}
