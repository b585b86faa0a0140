use chrono::{NaiveDate, TimeDelta};
use common::{BillingEvent, BillingEventType, BillingStatus, EventBody};
use rand::Rng;

use super::Weighted;
use super::sampling::{pick, round_cents, short_id, timestamp_in_day, uniform_amount};
use crate::error::Result;

const STATUSES: [(BillingStatus, u32); 4] = [
    (BillingStatus::Open, 40),
    (BillingStatus::Paid, 45),
    (BillingStatus::Overdue, 10),
    (BillingStatus::Refunded, 5),
];

const PAYMENT_TERMS_DAYS: &[i64] = &[7, 14, 30];
/// Share of the invoice settled when it is neither paid nor refunded.
const PARTIAL_SHARES: &[f64] = &[0.0, 0.25, 0.5, 0.75];
const TAX_RATES: &[f64] = &[0.0, 0.05, 0.07, 0.1];

#[derive(Debug, Clone)]
pub(super) struct Tables {
    status: Weighted<BillingStatus>,
}

impl Tables {
    pub(super) fn new() -> Result<Self> {
        Ok(Tables {
            status: Weighted::new(&STATUSES)?,
        })
    }
}

pub(super) fn generate<R: Rng + ?Sized>(rng: &mut R, tables: &Tables, day: NaiveDate) -> EventBody {
    let status = tables.status.sample(rng);
    let invoice_id = format!("INV-{}", short_id(rng, 8));
    let invoice_date = timestamp_in_day(rng, day);
    let due_date = invoice_date + TimeDelta::days(pick(rng, PAYMENT_TERMS_DAYS));
    let total = uniform_amount(rng, 20.0, 2_000.0);
    let paid = match status {
        BillingStatus::Paid | BillingStatus::Refunded => total,
        BillingStatus::Open | BillingStatus::Overdue => {
            round_cents(total * pick(rng, PARTIAL_SHARES))
        }
    };
    let event_type = pick(rng, BillingEventType::ALL);

    EventBody::Billing(BillingEvent {
        event_type,
        invoice_id,
        invoice_date,
        due_date,
        status,
        amount: match event_type {
            BillingEventType::RefundIssued => -paid,
            BillingEventType::InvoiceIssued | BillingEventType::InvoicePaid => total,
        },
        amount_due: round_cents((total - paid).max(0.0)),
        amount_paid: paid,
        tax_rate: pick(rng, TAX_RATES),
        line_count: rng.random_range(1..=5),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_invoice_arithmetic() {
        let mut rng = StdRng::seed_from_u64(42);
        let tables = Tables::new().unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();

        for _ in 0..3_000 {
            let EventBody::Billing(bill) = generate(&mut rng, &tables, day) else {
                panic!("billing generator produced a foreign body");
            };
            assert!(bill.invoice_id.starts_with("INV-"));
            assert_eq!(bill.invoice_id.len(), 12);
            assert_eq!(bill.invoice_date.date(), day);

            let terms = (bill.due_date - bill.invoice_date).num_days();
            assert!(PAYMENT_TERMS_DAYS.contains(&terms));

            assert!(bill.amount_due >= 0.0);
            assert!(bill.amount_paid >= 0.0);
            if matches!(bill.status, BillingStatus::Paid | BillingStatus::Refunded) {
                assert_eq!(bill.amount_due, 0.0);
            }
            match bill.event_type {
                BillingEventType::RefundIssued => assert_eq!(bill.amount, -bill.amount_paid),
                _ => {
                    assert!(bill.amount >= 20.0);
                    let settled = bill.amount_paid + bill.amount_due;
                    assert!((settled - bill.amount).abs() < 0.011);
                }
            }
            assert!((1..=5).contains(&bill.line_count));
        }
    }
}
