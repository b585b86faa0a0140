use common::ErpPosting;
use rand::Rng;

use super::sampling::{pick, uniform_amount};

const EVENT_TYPE: &str = "gl_posting";

const JOURNALS: &[&str] = &[
    "payments_settlement",
    "card_interchange",
    "fees_accrual",
    "refunds",
    "chargebacks",
    "revenue_recognition",
];
const GL_ACCOUNTS: &[&str] = &[
    "1000-Cash",
    "1100-Receivables",
    "2000-DepositsLiability",
    "4000-InterchangeRevenue",
    "5000-FeesExpense",
    "5100-Refunds",
];
const ENTITIES: &[&str] = &["HQ", "NYC", "SFO", "LON"];
const POSTERS: &[&str] = &["batch_job", "integration", "analyst"];

/// One side of a journal line; the other side is zero.
pub(super) fn generate<R: Rng + ?Sized>(rng: &mut R) -> ErpPosting {
    let journal_type = pick(rng, JOURNALS);
    let gl_account = pick(rng, GL_ACCOUNTS);
    let amount = uniform_amount(rng, 5.0, 5_000.0);
    let (debit, credit) = if rng.random_bool(0.5) {
        (amount, 0.0)
    } else {
        (0.0, amount)
    };

    ErpPosting {
        event_type: EVENT_TYPE,
        journal_type,
        gl_account,
        debit,
        credit,
        amount,
        entity: pick(rng, ENTITIES),
        posted_by: pick(rng, POSTERS),
    }
}
