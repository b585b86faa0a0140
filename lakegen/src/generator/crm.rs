use common::{CrmEvent, CrmEventType};
use rand::Rng;

use super::sampling::pick;
use super::{COUNTRIES, Weighted};
use crate::error::Result;

const EVENT_TYPES: [(CrmEventType, u32); 7] = [
    (CrmEventType::KycVerified, 25),
    (CrmEventType::KycPending, 10),
    (CrmEventType::KycRefreshDue, 5),
    (CrmEventType::AddressUpdate, 20),
    (CrmEventType::PhoneUpdate, 15),
    (CrmEventType::AccountLocked, 5),
    (CrmEventType::Login, 20),
];

const KYC_STATUSES: &[&str] = &["pending", "verified", "refresh_due", "blocked"];

/// Share of customers flagged as politically exposed.
const PEP_PROBABILITY: f64 = 0.25;

#[derive(Debug, Clone)]
pub(super) struct Tables {
    event_type: Weighted<CrmEventType>,
}

impl Tables {
    pub(super) fn new() -> Result<Self> {
        Ok(Tables {
            event_type: Weighted::new(&EVENT_TYPES)?,
        })
    }
}

pub(super) fn generate<R: Rng + ?Sized>(rng: &mut R, tables: &Tables) -> CrmEvent {
    CrmEvent {
        event_type: tables.event_type.sample(rng),
        amount: 0.0,
        kyc_status: pick(rng, KYC_STATUSES),
        risk_score: rng.random_range(1..=99),
        pep_flag: rng.random_bool(PEP_PROBABILITY),
        ip: format!(
            "192.168.{}.{}",
            rng.random_range(0..=255u8),
            rng.random_range(0..=255u8)
        ),
        country: pick(rng, COUNTRIES),
    }
}
