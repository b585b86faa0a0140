use common::{SupportTicket, TicketPriority, TicketStatus};
use rand::Rng;

use super::Weighted;
use super::sampling::{pick, short_id};
use crate::error::Result;

const PRIORITIES: [(TicketPriority, u32); 4] = [
    (TicketPriority::Low, 50),
    (TicketPriority::Medium, 30),
    (TicketPriority::High, 15),
    (TicketPriority::Urgent, 5),
];

const STATUSES: [(TicketStatus, u32); 4] = [
    (TicketStatus::Open, 20),
    (TicketStatus::InProgress, 30),
    (TicketStatus::Resolved, 35),
    (TicketStatus::Closed, 15),
];

const CATEGORIES: &[&str] = &[
    "chargeback",
    "card_stolen",
    "login_issue",
    "payment_failed",
    "address_change",
    "refund_request",
];
const CHANNELS: &[&str] = &["phone", "email", "in_app", "chat"];

#[derive(Debug, Clone)]
pub(super) struct Tables {
    priority: Weighted<TicketPriority>,
    status: Weighted<TicketStatus>,
}

impl Tables {
    pub(super) fn new() -> Result<Self> {
        Ok(Tables {
            priority: Weighted::new(&PRIORITIES)?,
            status: Weighted::new(&STATUSES)?,
        })
    }
}

pub(super) fn generate<R: Rng + ?Sized>(rng: &mut R, tables: &Tables) -> SupportTicket {
    let category = pick(rng, CATEGORIES);
    let priority = tables.priority.sample(rng);
    let status = tables.status.sample(rng);

    SupportTicket {
        event_type: if status.is_terminal() {
            "ticket_closed"
        } else {
            "ticket_opened"
        },
        amount: 0.0,
        ticket_id: format!("TCK-{}", short_id(rng, 8)),
        category,
        priority,
        status,
        channel: pick(rng, CHANNELS),
    }
}
