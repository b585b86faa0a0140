use common::{
    AchPayment, CardPayment, EventBody, Merchant, PaymentKind, PaymentStatus, WireTransfer,
    ZellePayment,
};
use rand::Rng;

use super::sampling::{
    ALPHANUMERIC, UPPERCASE, chars_from, digits, either_sign, pick, purchase_amount, round_cents,
    short_id, uniform_amount,
};
use super::{COUNTRIES, Weighted};
use crate::error::Result;

const CHANNELS: [(PaymentKind, u32); 6] = [
    (PaymentKind::AchCredit, 20),
    (PaymentKind::AchDebit, 20),
    (PaymentKind::WireTransfer, 10),
    (PaymentKind::CardAuth, 25),
    (PaymentKind::CardSettlement, 20),
    (PaymentKind::ZellePayment, 5),
];

const STATUSES: [(PaymentStatus, u32); 3] = [
    (PaymentStatus::Posted, 80),
    (PaymentStatus::Pending, 17),
    (PaymentStatus::Failed, 3),
];

const CARD_NETWORKS: &[&str] = &["VISA", "MASTERCARD", "AMEX"];
const POS_ENTRY_MODES: &[&str] = &["chip", "contactless", "magstripe", "ecommerce"];
const DECLINE_REASONS: &[&str] = &["insufficient_funds", "suspected_fraud", "do_not_honor"];
const MERCHANT_NAMES: &[&str] = &[
    "Acme Stores",
    "MetroMart",
    "Cafe Aurora",
    "TechHub",
    "TelcoMax",
    "Global ATM",
];
/// Merchant category codes with their display category.
const MCCS: &[(&str, &str)] = &[
    ("5411", "Grocery"),
    ("5812", "Restaurant"),
    ("5732", "Electronics"),
    ("4814", "Telecom"),
    ("5999", "Specialty Retail"),
    ("6011", "ATM"),
];
const ACH_COUNTERPARTIES: &[&str] = &["Payroll Inc", "Utility Co", "John Smith", "Jane Doe"];
const BIC_COUNTRIES: &[&str] = &["US", "GB", "DE", "FR", "CA", "IN", "AU", "SG"];
const ZELLE_ALIASES: &[&str] = &["+1-202-555-0101", "friend@example.com", "$roommate"];

const WIRE_FEE_RATE: f64 = 0.003;

#[derive(Debug, Clone)]
pub(super) struct Tables {
    channel: Weighted<PaymentKind>,
    status: Weighted<PaymentStatus>,
}

impl Tables {
    pub(super) fn new() -> Result<Self> {
        Ok(Tables {
            channel: Weighted::new(&CHANNELS)?,
            status: Weighted::new(&STATUSES)?,
        })
    }
}

pub(super) fn generate<R: Rng + ?Sized>(rng: &mut R, tables: &Tables) -> EventBody {
    let kind = tables.channel.sample(rng);
    let status = tables.status.sample(rng);

    match kind {
        PaymentKind::CardAuth | PaymentKind::CardSettlement => {
            EventBody::Card(card(rng, kind, status))
        }
        PaymentKind::AchCredit | PaymentKind::AchDebit => EventBody::Ach(ach(rng, kind, status)),
        PaymentKind::WireTransfer => EventBody::Wire(wire(rng, status)),
        PaymentKind::ZellePayment => EventBody::Zelle(zelle(rng, status)),
    }
}

fn card<R: Rng + ?Sized>(rng: &mut R, kind: PaymentKind, status: PaymentStatus) -> CardPayment {
    let failed = status == PaymentStatus::Failed;
    CardPayment {
        event_type: kind,
        amount: purchase_amount(rng),
        card_network: pick(rng, CARD_NETWORKS),
        pan_last4: digits(rng, 4),
        card_present: rng.random_bool(0.5),
        pos_entry_mode: pick(rng, POS_ENTRY_MODES),
        merchant: merchant(rng),
        approval_code: (!failed).then(|| short_id(rng, 6)),
        decline_reason: failed.then(|| pick(rng, DECLINE_REASONS)),
        status,
    }
}

fn merchant<R: Rng + ?Sized>(rng: &mut R) -> Merchant {
    let (mcc, category) = pick(rng, MCCS);
    Merchant {
        merchant_id: short_id(rng, 8),
        merchant_name: pick(rng, MERCHANT_NAMES),
        merchant_country: pick(rng, COUNTRIES),
        mcc,
        category,
    }
}

fn ach<R: Rng + ?Sized>(rng: &mut R, kind: PaymentKind, status: PaymentStatus) -> AchPayment {
    let magnitude = uniform_amount(rng, 5.0, 2_000.0);
    AchPayment {
        event_type: kind,
        amount: if kind == PaymentKind::AchDebit {
            -magnitude
        } else {
            magnitude
        },
        routing_number: digits(rng, 9),
        account_last4: digits(rng, 4),
        counterparty_name: pick(rng, ACH_COUNTERPARTIES),
        trace_number: short_id(rng, 12),
        status,
    }
}

fn wire<R: Rng + ?Sized>(rng: &mut R, status: PaymentStatus) -> WireTransfer {
    let magnitude = uniform_amount(rng, 100.0, 10_000.0);
    WireTransfer {
        event_type: PaymentKind::WireTransfer,
        amount: either_sign(rng, magnitude),
        swift_bic: swift_bic(rng),
        iban_masked: format!("****{}", chars_from(rng, ALPHANUMERIC, 10)),
        is_international: rng.random_bool(0.5),
        fees: round_cents(magnitude * WIRE_FEE_RATE),
        status,
    }
}

/// Bank code, country code, then a two character location code.
fn swift_bic<R: Rng + ?Sized>(rng: &mut R) -> String {
    let bank = chars_from(rng, UPPERCASE, 4);
    let country = pick(rng, BIC_COUNTRIES);
    let location = chars_from(rng, ALPHANUMERIC, 2);
    format!("{bank}{country}{location}")
}

fn zelle<R: Rng + ?Sized>(rng: &mut R, status: PaymentStatus) -> ZellePayment {
    let magnitude = uniform_amount(rng, 5.0, 500.0);
    ZellePayment {
        event_type: PaymentKind::ZellePayment,
        amount: either_sign(rng, magnitude),
        counterparty_alias: pick(rng, ZELLE_ALIASES),
        status,
    }
}
