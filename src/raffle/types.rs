use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::entity::sea_orm_active_enums::{
    EventStatus, PaymentStatus, RecordStatus, SlotStatus,
};

use super::error::RaffleError;

pub type BettorId = i64;
pub type EventId = i64;
pub type SlotId = i64;
pub type FixedId = i64;
pub type PaymentId = i64;
pub type TicketId = i64;

/// Number of slots in every event pool ("000" through "999").
pub const POOL_SIZE: u16 = 1000;

/// Validated three-digit pool number. Zero-padding is owned by this type so
/// "42" can never leak into the database next to "042".
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotNumber(String);

impl SlotNumber {
    pub fn new(raw: &str) -> Result<Self, RaffleError> {
        if raw.len() == 3 && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw.to_owned()))
        } else {
            Err(RaffleError::validation(format!(
                "number must be three digits between 000 and 999, got {raw:?}"
            )))
        }
    }

    pub fn from_index(index: u16) -> Result<Self, RaffleError> {
        if index < POOL_SIZE {
            Ok(Self(format!("{index:03}")))
        } else {
            Err(RaffleError::validation(format!(
                "pool index out of range: {index}"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SlotNumber {
    type Error = RaffleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<SlotNumber> for String {
    fn from(value: SlotNumber) -> Self {
        value.0
    }
}

#[derive(Clone, Debug)]
pub struct NewBettor {
    pub full_name: String,
    pub nickname: String,
    pub area_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Partial update; only present fields are written. This replaces the
/// original's dynamically assembled SET clause with an explicit structure.
#[derive(Clone, Debug, Default)]
pub struct BettorPatch {
    pub full_name: Option<String>,
    pub area_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub status: Option<RecordStatus>,
}

#[derive(Clone, Debug, Default)]
pub struct BettorFilter {
    /// Case-insensitive substring on the full name.
    pub name: Option<String>,
    /// Case-insensitive substring on the nickname.
    pub nickname: Option<String>,
    pub status: Option<RecordStatus>,
    /// Shortcut for `status = Active` when no explicit status is given.
    pub only_active: bool,
}

#[derive(Clone, Debug)]
pub struct NewEvent {
    pub name: String,
    pub kind: String,
    pub announcement_date: chrono::NaiveDate,
    pub ticket_price: f64,
    pub prize: f64,
    pub floor_prize: Option<f64>,
    pub result_number: Option<String>,
    pub description: Option<String>,
    pub draw_reference: Option<String>,
    pub status: EventStatus,
}

#[derive(Clone, Debug, Default)]
pub struct EventPatch {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub announcement_date: Option<chrono::NaiveDate>,
    pub ticket_price: Option<f64>,
    pub prize: Option<f64>,
    pub floor_prize: Option<f64>,
    pub result_number: Option<String>,
    pub description: Option<String>,
    pub draw_reference: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    /// Case-insensitive substring matched against name or kind.
    pub text: Option<String>,
    pub only_active: bool,
}

#[derive(Clone, Debug)]
pub struct NewFixedAssignment {
    pub nickname: String,
    pub number: SlotNumber,
    pub group: Option<String>,
    pub status: RecordStatus,
}

#[derive(Clone, Debug, Default)]
pub struct FixedPatch {
    pub nickname: Option<String>,
    pub number: Option<SlotNumber>,
    pub group: Option<String>,
    pub status: Option<RecordStatus>,
}

#[derive(Clone, Debug, Default)]
pub struct FixedFilter {
    pub nickname: Option<String>,
    pub status: Option<RecordStatus>,
    /// Case-insensitive substring on the group label.
    pub group: Option<String>,
    pub number: Option<SlotNumber>,
}

#[derive(Clone, Debug)]
pub struct NewTicket {
    pub number: String,
    pub kind: String,
    pub batch: Option<String>,
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct TicketFilter {
    pub number: Option<String>,
    pub kind: Option<String>,
    pub status: Option<String>,
    pub batch: Option<String>,
    pub range: DateRange,
}

#[derive(Clone, Debug, Default)]
pub struct PaymentFilter {
    pub nickname: Option<String>,
    pub status: Option<PaymentStatus>,
    pub method: Option<String>,
    pub range: DateRange,
}

/// Half-open on neither side; both bounds are inclusive when present.
#[derive(Clone, Copy, Debug, Default)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| at >= from) && self.to.map_or(true, |to| at <= to)
    }
}

/// Parameters for one payment covering one or more reserved numbers.
#[derive(Clone, Debug)]
pub struct RegisterPayment {
    pub reference: String,
    pub nickname: String,
    pub amount: f64,
    pub method: String,
    pub notes: Option<String>,
    pub event_id: EventId,
    pub numbers: Vec<SlotNumber>,
}

/// Outcome of applying fixed assignments to an event pool. Per-item failures
/// are carried here instead of aborting the batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: u32,
    pub skipped: u32,
    /// Raw number text and failure reason. The raw text survives here because
    /// a malformed number is itself a reportable failure.
    pub failed: Vec<(String, String)>,
}

/// Outcome of event initialization: the pool itself is all-or-nothing, the
/// fixed-assignment pass on top of it is best-effort.
#[derive(Clone, Debug, Default)]
pub struct InitReport {
    pub slots_created: u16,
    pub fixed_applied: u32,
    pub fixed_failed: Vec<(String, String)>,
}

#[derive(Clone, Debug)]
pub struct TopBettor {
    pub nickname: String,
    pub full_name: String,
    pub slot_count: u64,
}

/// A reserved slot joined with its event, as shown on the payment screen.
#[derive(Clone, Debug)]
pub struct ReservedSlot {
    pub slot_id: SlotId,
    pub event_id: EventId,
    pub event_name: String,
    pub number: SlotNumber,
    pub ticket_price: f64,
    pub reserved_at: Option<DateTime<Utc>>,
}

/// One line of a bettor's recent play history.
#[derive(Clone, Debug)]
pub struct SlotHistoryEntry {
    pub number: SlotNumber,
    pub event_name: String,
    pub status: SlotStatus,
    pub sold_at: Option<DateTime<Utc>>,
}
