//! Raw-zone event records.
//!
//! A record is a flat JSON object: the shared [`BaseFields`] followed by the
//! fields of one source-specific body. Every body carries `event_type` and
//! `amount`, so downstream readers can rely on both keys being present.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::source::Source;

/// Every event is booked in a single currency.
pub const CURRENCY: &str = "USD";

/// Second-precision UTC timestamps rendered as `YYYY-MM-DDTHH:MM:SSZ`.
pub mod zulu {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&ts.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseFields {
    pub event_id: Uuid,
    pub user_id: u32,
    pub currency: String,
    pub source_system: Source,
    #[serde(with = "zulu")]
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    #[serde(flatten)]
    pub base: BaseFields,
    #[serde(flatten)]
    pub body: EventBody,
}

impl EventRecord {
    pub fn event_type(&self) -> &'static str {
        self.body.event_type()
    }

    pub fn amount(&self) -> f64 {
        self.body.amount()
    }

    /// One JSONL line, without the trailing newline.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventBody {
    Card(CardPayment),
    Ach(AchPayment),
    Wire(WireTransfer),
    Zelle(ZellePayment),
    Billing(BillingEvent),
    Crm(CrmEvent),
    Erp(ErpPosting),
    Support(SupportTicket),
}

impl EventBody {
    pub fn event_type(&self) -> &'static str {
        match self {
            EventBody::Card(body) => body.event_type.as_str(),
            EventBody::Ach(body) => body.event_type.as_str(),
            EventBody::Wire(body) => body.event_type.as_str(),
            EventBody::Zelle(body) => body.event_type.as_str(),
            EventBody::Billing(body) => body.event_type.as_str(),
            EventBody::Crm(body) => body.event_type.as_str(),
            EventBody::Erp(body) => body.event_type,
            EventBody::Support(body) => body.event_type,
        }
    }

    pub fn amount(&self) -> f64 {
        match self {
            EventBody::Card(body) => body.amount,
            EventBody::Ach(body) => body.amount,
            EventBody::Wire(body) => body.amount,
            EventBody::Zelle(body) => body.amount,
            EventBody::Billing(body) => body.amount,
            EventBody::Crm(body) => body.amount,
            EventBody::Erp(body) => body.amount,
            EventBody::Support(body) => body.amount,
        }
    }
}

wire_enum! {
    /// Payment channels, named after the event type they emit.
    pub enum PaymentKind {
        AchCredit => "ach_credit",
        AchDebit => "ach_debit",
        WireTransfer => "wire_transfer",
        CardAuth => "card_auth",
        CardSettlement => "card_settlement",
        ZellePayment => "zelle_payment",
    }
}

wire_enum! {
    pub enum PaymentStatus {
        Posted => "posted",
        Pending => "pending",
        Failed => "failed",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Merchant {
    pub merchant_id: String,
    pub merchant_name: &'static str,
    pub merchant_country: &'static str,
    pub mcc: &'static str,
    pub category: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardPayment {
    pub event_type: PaymentKind,
    pub amount: f64,
    pub card_network: &'static str,
    pub pan_last4: String,
    pub card_present: bool,
    pub pos_entry_mode: &'static str,
    #[serde(flatten)]
    pub merchant: Merchant,
    pub approval_code: Option<String>,
    pub decline_reason: Option<&'static str>,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchPayment {
    pub event_type: PaymentKind,
    /// Negative for debits.
    pub amount: f64,
    pub routing_number: String,
    pub account_last4: String,
    pub counterparty_name: &'static str,
    pub trace_number: String,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireTransfer {
    pub event_type: PaymentKind,
    /// Positive for incoming wires, negative for outgoing.
    pub amount: f64,
    pub swift_bic: String,
    pub iban_masked: String,
    pub is_international: bool,
    pub fees: f64,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZellePayment {
    pub event_type: PaymentKind,
    pub amount: f64,
    pub counterparty_alias: &'static str,
    pub status: PaymentStatus,
}

wire_enum! {
    pub enum BillingEventType {
        InvoiceIssued => "invoice_issued",
        InvoicePaid => "invoice_paid",
        RefundIssued => "refund_issued",
    }
}

wire_enum! {
    pub enum BillingStatus {
        Open => "open",
        Paid => "paid",
        Overdue => "overdue",
        Refunded => "refunded",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingEvent {
    pub event_type: BillingEventType,
    pub invoice_id: String,
    #[serde(with = "zulu")]
    pub invoice_date: NaiveDateTime,
    #[serde(with = "zulu")]
    pub due_date: NaiveDateTime,
    pub status: BillingStatus,
    /// Invoice total, or the negated paid amount for refunds.
    pub amount: f64,
    pub amount_due: f64,
    pub amount_paid: f64,
    pub tax_rate: f64,
    pub line_count: u8,
}

wire_enum! {
    pub enum CrmEventType {
        KycVerified => "kyc_verified",
        KycPending => "kyc_pending",
        KycRefreshDue => "kyc_refresh_due",
        AddressUpdate => "address_update",
        PhoneUpdate => "phone_update",
        AccountLocked => "account_locked",
        Login => "login",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrmEvent {
    pub event_type: CrmEventType,
    pub amount: f64,
    pub kyc_status: &'static str,
    pub risk_score: u8,
    pub pep_flag: bool,
    pub ip: String,
    pub country: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErpPosting {
    pub event_type: &'static str,
    pub journal_type: &'static str,
    pub gl_account: &'static str,
    pub debit: f64,
    pub credit: f64,
    /// Magnitude of whichever side was posted.
    pub amount: f64,
    pub entity: &'static str,
    pub posted_by: &'static str,
}

wire_enum! {
    pub enum TicketStatus {
        Open => "open",
        InProgress => "in_progress",
        Resolved => "resolved",
        Closed => "closed",
    }
}

impl TicketStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TicketStatus::Resolved | TicketStatus::Closed)
    }
}

wire_enum! {
    pub enum TicketPriority {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupportTicket {
    pub event_type: &'static str,
    pub amount: f64,
    pub ticket_id: String,
    pub category: &'static str,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub channel: &'static str,
}
