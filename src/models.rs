use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Monetary amounts are kept in integer cents so values can be compared exactly.
pub type Cents = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    Refunded,
    NotRefunded,
}

impl RefundStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RefundStatus::Refunded => "refunded",
            RefundStatus::NotRefunded => "not_refunded",
        }
    }

    pub fn from(s: &str) -> Option<Self> {
        match s {
            "refunded" => Some(RefundStatus::Refunded),
            "not_refunded" => Some(RefundStatus::NotRefunded),
            _ => None,
        }
    }

    pub fn from_flag(refunded: bool) -> Self {
        if refunded {
            RefundStatus::Refunded
        } else {
            RefundStatus::NotRefunded
        }
    }

    pub fn is_refunded(&self) -> bool {
        matches!(self, RefundStatus::Refunded)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recruiter {
    pub id: String,
    pub name: String,
    /// Inactive recruiters are kept so their history still shows up in analytics
    pub active: bool,
}

/// A betting house being tracked
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bet {
    pub id: String,
    pub name: String,
}

/// A planned campaign of registrations for one bet
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    pub id: String,
    pub bet_id: String,
    pub created_at: DateTime<FixedOffset>,
    pub observation: Option<String>,
}

/// Planned number of registrations at one value inside a lot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LotItem {
    pub id: String,
    pub lot_id: String,
    pub value_cents: Cents,
    pub planned_quantity: i64,
}

/// One recorded "banca". `timestamp` never changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: String,
    pub timestamp: DateTime<FixedOffset>,
    pub recruiter_id: String,
    pub bet_id: String,
    pub value_cents: Cents,
    pub refund: RefundStatus,
    pub observation: Option<String>,
    pub lot_id: Option<String>,
}

impl Registration {
    pub fn is_refunded(&self) -> bool {
        self.refund.is_refunded()
    }
}

/// Fields a caller supplies when creating or editing a registration.
/// Identity and timestamp are owned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationDraft {
    pub recruiter_id: String,
    pub bet_id: String,
    pub value_cents: Cents,
    pub refund: RefundStatus,
    pub observation: Option<String>,
    pub lot_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LotItemDraft {
    pub value_cents: Cents,
    pub planned_quantity: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LotDraft {
    pub bet_id: String,
    pub observation: Option<String>,
    pub items: Vec<LotItemDraft>,
}

/// Partial update for a recruiter; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecruiterUpdate {
    pub name: Option<String>,
    pub active: Option<bool>,
}
