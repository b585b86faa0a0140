//! Per-source synthetic record generation.
//!
//! A [`RecordGenerator`] owns one RNG stream. Streams are keyed by
//! `(seed, day, source)`, so a partition's content does not depend on which
//! other partitions are produced, or in which order.

mod billing;
mod crm;
mod erp;
mod payments;
mod sampling;
mod support;

use chrono::NaiveDate;
use common::{BaseFields, CURRENCY, EventBody, EventRecord, Source};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;

pub use sampling::partition_seed;
pub(crate) use sampling::Weighted;

pub(crate) const COUNTRIES: &[&str] = &["US", "CA", "GB", "DE", "FR", "IN", "AU", "SG"];

/// Weighted draws shared by the source generators, built once per generator.
#[derive(Debug, Clone)]
pub(crate) struct Tables {
    payments: payments::Tables,
    billing: billing::Tables,
    crm: crm::Tables,
    support: support::Tables,
}

impl Tables {
    fn new() -> Result<Self> {
        Ok(Tables {
            payments: payments::Tables::new()?,
            billing: billing::Tables::new()?,
            crm: crm::Tables::new()?,
            support: support::Tables::new()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RecordGenerator {
    rng: StdRng,
    tables: Tables,
}

impl RecordGenerator {
    pub fn new(seed: u64) -> Result<Self> {
        Ok(RecordGenerator {
            rng: StdRng::seed_from_u64(seed),
            tables: Tables::new()?,
        })
    }

    /// Generator for the stream of one `(day, source)` partition.
    pub fn for_partition(seed: u64, day: NaiveDate, source: Source) -> Result<Self> {
        Self::new(partition_seed(seed, day, source))
    }

    pub fn record(&mut self, day: NaiveDate, source: Source) -> EventRecord {
        let base = self.base(day, source);
        let rng = &mut self.rng;
        let body = match source {
            Source::Payments => payments::generate(rng, &self.tables.payments),
            Source::Billing => billing::generate(rng, &self.tables.billing, day),
            Source::Crm => EventBody::Crm(crm::generate(rng, &self.tables.crm)),
            Source::Erp => EventBody::Erp(erp::generate(rng)),
            Source::Support => EventBody::Support(support::generate(rng, &self.tables.support)),
        };
        EventRecord { base, body }
    }

    fn base(&mut self, day: NaiveDate, source: Source) -> BaseFields {
        let rng = &mut self.rng;
        BaseFields {
            event_id: sampling::uuid(rng),
            user_id: rng.random_range(1_000..=500_000),
            currency: CURRENCY.to_string(),
            source_system: source,
            timestamp: sampling::timestamp_in_day(rng, day),
        }
    }
}
