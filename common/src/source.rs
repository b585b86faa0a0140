use std::str::FromStr;

use thiserror::Error;

wire_enum! {
    /// Upstream system an event is attributed to. Declaration order is the
    /// canonical order used for splitting and listing.
    pub enum Source {
        Payments => "payments",
        Billing => "billing",
        Crm => "crm",
        Erp => "erp",
        Support => "support",
    }
}

impl Source {
    /// Position in the canonical order.
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown source `{0}`, expected one of: payments, billing, crm, erp, support")]
pub struct UnknownSource(pub String);

impl FromStr for Source {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Source::ALL
            .iter()
            .copied()
            .find(|source| source.as_str() == wanted)
            .ok_or_else(|| UnknownSource(s.to_string()))
    }
}
