#[macro_use]
mod macros;

pub mod event;
pub mod source;

pub use event::{
    AchPayment, BaseFields, BillingEvent, BillingEventType, BillingStatus, CURRENCY, CardPayment,
    CrmEvent, CrmEventType, ErpPosting, EventBody, EventRecord, Merchant, PaymentKind,
    PaymentStatus, SupportTicket, TicketPriority, TicketStatus, WireTransfer, ZellePayment, zulu,
};
pub use source::{Source, UnknownSource};
