use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use common::Source;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use uuid::Uuid;

use crate::error::Result;

pub(crate) const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub(crate) const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

const SECONDS_PER_DAY: i64 = 86_400;

/// A fixed menu of values drawn with integer weights.
#[derive(Debug, Clone)]
pub(crate) struct Weighted<T> {
    items: Vec<T>,
    index: WeightedIndex<u32>,
}

impl<T: Copy> Weighted<T> {
    pub(crate) fn new(entries: &[(T, u32)]) -> Result<Self> {
        let index = WeightedIndex::new(entries.iter().map(|(_, weight)| *weight))?;
        Ok(Weighted {
            items: entries.iter().map(|(item, _)| *item).collect(),
            index,
        })
    }

    pub(crate) fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.items[self.index.sample(rng)]
    }
}

/// Uniform pick from a non-empty constant slice.
pub(crate) fn pick<T: Copy, R: Rng + ?Sized>(rng: &mut R, items: &[T]) -> T {
    items[rng.random_range(0..items.len())]
}

pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn uniform_amount<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    round_cents(rng.random_range(lo..=hi))
}

/// Card purchase amounts. The mode lies past `high`, so the draw always takes
/// the rising branch: values stay in `[5, ~132.38]` with a long upper tail.
pub(crate) fn purchase_amount<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    round_cents(triangular(rng, 5.0, 60.0, 300.0))
}

/// Triangular draw with the usual inverse-CDF formula. A `mode` outside
/// `[low, high]` is not clamped; it stretches the distribution instead.
pub(crate) fn triangular<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64, mode: f64) -> f64 {
    let mut u: f64 = rng.random();
    let mut c = (mode - low) / (high - low);
    let (mut low, mut high) = (low, high);
    if u > c {
        u = 1.0 - u;
        c = 1.0 - c;
        std::mem::swap(&mut low, &mut high);
    }
    low + (high - low) * (u * c).sqrt()
}

/// Flips the sign of `magnitude` with probability one half.
pub(crate) fn either_sign<R: Rng + ?Sized>(rng: &mut R, magnitude: f64) -> f64 {
    if rng.random_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}

pub(crate) fn digits<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

pub(crate) fn chars_from<R: Rng + ?Sized>(rng: &mut R, alphabet: &[u8], len: usize) -> String {
    (0..len).map(|_| char::from(pick(rng, alphabet))).collect()
}

/// Version 4 UUID drawn from `rng`, so ids are reproducible under a seed.
pub(crate) fn uuid<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.random()).into_uuid()
}

/// Leading `len` characters of a hyphenated UUID.
pub(crate) fn short_id<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    let mut id = uuid(rng).hyphenated().to_string();
    id.truncate(len);
    id
}

/// A uniformly chosen whole second within `day`.
pub(crate) fn timestamp_in_day<R: Rng + ?Sized>(rng: &mut R, day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN) + TimeDelta::seconds(rng.random_range(0..SECONDS_PER_DAY))
}

/// Seed of the RNG stream owned by one `(day, source)` partition.
pub fn partition_seed(seed: u64, day: NaiveDate, source: Source) -> u64 {
    let day_ordinal = u64::from(day.num_days_from_ce().unsigned_abs());
    seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ (day_ordinal << 3) ^ source.index() as u64
}
