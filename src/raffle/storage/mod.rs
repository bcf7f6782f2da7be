use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::db::entity::sea_orm_active_enums::{
    EventStatus, PaymentStatus, RecordStatus, SlotStatus,
};
use crate::db::entity::{bettors, events, fixed_assignments, payments, tickets, users};

use super::error::RaffleError;
use super::types::{
    BettorFilter, BettorId, BettorPatch, DateRange, EventFilter, EventId, EventPatch, FixedFilter,
    FixedId, FixedPatch, NewBettor, NewEvent, NewFixedAssignment, NewTicket, PaymentFilter,
    PaymentId, ReservedSlot, SlotHistoryEntry, SlotId, SlotNumber, TicketFilter, TicketId,
    TopBettor,
};

/// Storage backend seam. Every workflow runs against one transaction obtained
/// from `begin`, committed on full success and rolled back otherwise.
#[async_trait]
pub trait RaffleStorage: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn RaffleTxn + Send>, RaffleError>;
}

#[async_trait]
pub trait RaffleTxn: Send {
    // Bettors
    async fn insert_bettor(&mut self, bettor: NewBettor) -> Result<BettorId, RaffleError>;
    async fn update_bettor(
        &mut self,
        nickname: &str,
        patch: &BettorPatch,
    ) -> Result<u64, RaffleError>;
    async fn find_bettor(&mut self, nickname: &str)
        -> Result<Option<bettors::Model>, RaffleError>;
    async fn search_bettors(
        &mut self,
        filter: &BettorFilter,
    ) -> Result<Vec<bettors::Model>, RaffleError>;
    async fn count_active_bettors(&mut self) -> Result<u64, RaffleError>;

    // Events
    async fn insert_event(&mut self, event: NewEvent) -> Result<EventId, RaffleError>;
    async fn update_event(&mut self, id: EventId, patch: &EventPatch) -> Result<u64, RaffleError>;
    async fn set_event_status(
        &mut self,
        id: EventId,
        status: EventStatus,
    ) -> Result<u64, RaffleError>;
    async fn load_event(&mut self, id: EventId) -> Result<Option<events::Model>, RaffleError>;
    async fn list_events(&mut self, filter: &EventFilter)
        -> Result<Vec<events::Model>, RaffleError>;
    async fn count_events_by_status(&mut self) -> Result<Vec<(EventStatus, u64)>, RaffleError>;

    // Pool slots
    async fn count_event_slots(&mut self, event_id: EventId) -> Result<u64, RaffleError>;
    async fn insert_slot(&mut self, slot: NewSlot) -> Result<SlotId, RaffleError>;
    async fn load_slot(
        &mut self,
        event_id: EventId,
        number: &SlotNumber,
    ) -> Result<Option<crate::db::entity::slots::Model>, RaffleError>;
    async fn set_slot_reserved(
        &mut self,
        slot_id: SlotId,
        nickname: &str,
        at: DateTime<Utc>,
    ) -> Result<(), RaffleError>;
    async fn set_slot_available(&mut self, slot_id: SlotId) -> Result<(), RaffleError>;
    async fn set_slot_sold(&mut self, slot_id: SlotId, at: DateTime<Utc>)
        -> Result<(), RaffleError>;
    async fn list_event_slots(
        &mut self,
        event_id: EventId,
    ) -> Result<Vec<crate::db::entity::slots::Model>, RaffleError>;
    async fn list_bettor_slots(
        &mut self,
        event_id: EventId,
        nickname: &str,
    ) -> Result<Vec<crate::db::entity::slots::Model>, RaffleError>;
    async fn list_reserved_by_bettor(
        &mut self,
        nickname: &str,
    ) -> Result<Vec<ReservedSlot>, RaffleError>;
    async fn slot_status_counts(
        &mut self,
        event_id: EventId,
    ) -> Result<Vec<(SlotStatus, u64)>, RaffleError>;
    async fn top_bettors(
        &mut self,
        event_id: EventId,
        limit: u64,
    ) -> Result<Vec<TopBettor>, RaffleError>;
    async fn count_bettor_slots(&mut self, nickname: &str) -> Result<u64, RaffleError>;
    async fn recent_bettor_slots(
        &mut self,
        nickname: &str,
        limit: u64,
    ) -> Result<Vec<SlotHistoryEntry>, RaffleError>;

    // Fixed assignments
    async fn insert_fixed(&mut self, fixed: NewFixedAssignment) -> Result<FixedId, RaffleError>;
    async fn update_fixed(&mut self, id: FixedId, patch: &FixedPatch) -> Result<u64, RaffleError>;
    async fn find_fixed(
        &mut self,
        id: FixedId,
    ) -> Result<Option<fixed_assignments::Model>, RaffleError>;
    async fn search_fixed(
        &mut self,
        filter: &FixedFilter,
    ) -> Result<Vec<fixed_assignments::Model>, RaffleError>;
    async fn batch_update_fixed_status(
        &mut self,
        nickname: Option<&str>,
        group: Option<&str>,
        status: RecordStatus,
    ) -> Result<u64, RaffleError>;

    // Payments
    async fn insert_payment(&mut self, payment: NewPayment) -> Result<PaymentId, RaffleError>;
    async fn set_payment_status(
        &mut self,
        id: PaymentId,
        status: PaymentStatus,
    ) -> Result<u64, RaffleError>;
    async fn find_payment(&mut self, id: PaymentId)
        -> Result<Option<PaymentDetail>, RaffleError>;
    async fn search_payments(
        &mut self,
        filter: &PaymentFilter,
    ) -> Result<Vec<PaymentDetail>, RaffleError>;
    async fn payments_total(&mut self, range: &DateRange) -> Result<f64, RaffleError>;
    async fn payments_total_by_bettor(&mut self, nickname: &str) -> Result<f64, RaffleError>;

    // Tickets
    async fn insert_ticket(&mut self, ticket: NewTicket) -> Result<TicketId, RaffleError>;
    async fn search_tickets(
        &mut self,
        filter: &TicketFilter,
    ) -> Result<Vec<tickets::Model>, RaffleError>;
    async fn ticket_status_counts(&mut self) -> Result<Vec<(String, u64)>, RaffleError>;
    async fn ticket_type_counts(&mut self) -> Result<Vec<(String, u64)>, RaffleError>;

    // Users
    async fn find_active_user(
        &mut self,
        username: &str,
    ) -> Result<Option<users::Model>, RaffleError>;

    async fn commit(self: Box<Self>) -> Result<(), RaffleError>;
    async fn rollback(self: Box<Self>);
}

#[derive(Clone, Debug)]
pub struct NewSlot {
    pub event_id: EventId,
    pub number: SlotNumber,
    pub status: SlotStatus,
    pub nickname: Option<String>,
    pub reserved_at: Option<DateTime<Utc>>,
}

impl NewSlot {
    /// Untouched pool slot, as bulk-created during event initialization.
    pub fn available(event_id: EventId, number: SlotNumber) -> Self {
        Self {
            event_id,
            number,
            status: SlotStatus::Available,
            nickname: None,
            reserved_at: None,
        }
    }

    /// Slot born reserved, used when applying a fixed assignment.
    pub fn reserved(
        event_id: EventId,
        number: SlotNumber,
        nickname: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id,
            number,
            status: SlotStatus::Reserved,
            nickname: Some(nickname.into()),
            reserved_at: Some(at),
        }
    }
}

#[derive(Clone, Debug)]
pub struct NewPayment {
    pub reference: String,
    pub nickname: String,
    pub amount: f64,
    pub method: String,
    pub status: PaymentStatus,
    pub notes: Option<String>,
    pub registered_at: DateTime<Utc>,
}

/// A payment row joined with its bettor's full name.
#[derive(Clone, Debug)]
pub struct PaymentDetail {
    pub payment: payments::Model,
    pub bettor_name: String,
}

pub mod in_memory;
pub mod sea_orm;

pub use in_memory::InMemoryRaffleStorage;
pub use sea_orm::SeaOrmRaffleStorage;
