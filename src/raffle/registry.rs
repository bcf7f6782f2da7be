use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::auth::{AuthContext, Role};
use crate::db::entity::sea_orm_active_enums::{EventStatus, PaymentStatus, RecordStatus};
use crate::db::entity::{bettors, events, fixed_assignments, tickets};

use super::error::RaffleError;
use super::storage::{
    InMemoryRaffleStorage, PaymentDetail, RaffleStorage, SeaOrmRaffleStorage,
};
use super::types::{
    BettorFilter, BettorId, BettorPatch, EventFilter, EventId, EventPatch, FixedFilter, FixedId,
    FixedPatch, NewBettor, NewEvent, NewFixedAssignment, NewTicket, PaymentFilter, PaymentId,
    TicketFilter, TicketId,
};
use super::validation::{validate_new_bettor, validate_new_event};

const LOG_TARGET: &str = "raffle::registry";

/// Entity bookkeeping: create, patch, and search for each record type.
/// Unlike the pool workflows, every call here touches a single entity, so
/// each runs in its own short transaction.
#[async_trait]
pub trait RaffleRegistry: Send + Sync {
    // Bettors
    async fn create_bettor(
        &self,
        auth: &AuthContext,
        bettor: NewBettor,
    ) -> Result<BettorId, RaffleError>;
    async fn update_bettor(
        &self,
        auth: &AuthContext,
        nickname: &str,
        patch: BettorPatch,
    ) -> Result<u64, RaffleError>;
    async fn deactivate_bettor(
        &self,
        auth: &AuthContext,
        nickname: &str,
    ) -> Result<u64, RaffleError>;
    async fn get_bettor(&self, nickname: &str) -> Result<Option<bettors::Model>, RaffleError>;
    async fn search_bettors(
        &self,
        filter: BettorFilter,
    ) -> Result<Vec<bettors::Model>, RaffleError>;

    // Events
    async fn create_event(
        &self,
        auth: &AuthContext,
        event: NewEvent,
    ) -> Result<EventId, RaffleError>;
    async fn update_event(
        &self,
        auth: &AuthContext,
        id: EventId,
        patch: EventPatch,
    ) -> Result<u64, RaffleError>;
    async fn set_event_status(
        &self,
        auth: &AuthContext,
        id: EventId,
        status: EventStatus,
    ) -> Result<u64, RaffleError>;
    async fn get_event(&self, id: EventId) -> Result<Option<events::Model>, RaffleError>;
    async fn list_events(&self, filter: EventFilter) -> Result<Vec<events::Model>, RaffleError>;
    /// First active event in name order, the default selection on screens
    /// that need one.
    async fn first_active_event(&self) -> Result<Option<events::Model>, RaffleError>;

    // Fixed assignments
    async fn create_fixed(
        &self,
        auth: &AuthContext,
        fixed: NewFixedAssignment,
    ) -> Result<FixedId, RaffleError>;
    async fn update_fixed(
        &self,
        auth: &AuthContext,
        id: FixedId,
        patch: FixedPatch,
    ) -> Result<u64, RaffleError>;
    async fn search_fixed(
        &self,
        filter: FixedFilter,
    ) -> Result<Vec<fixed_assignments::Model>, RaffleError>;
    async fn batch_update_fixed_status(
        &self,
        auth: &AuthContext,
        owner: Option<&str>,
        group: Option<&str>,
        status: RecordStatus,
    ) -> Result<u64, RaffleError>;

    // Payments
    async fn set_payment_status(
        &self,
        auth: &AuthContext,
        id: PaymentId,
        status: PaymentStatus,
    ) -> Result<u64, RaffleError>;
    async fn get_payment(&self, id: PaymentId) -> Result<Option<PaymentDetail>, RaffleError>;
    async fn search_payments(
        &self,
        filter: PaymentFilter,
    ) -> Result<Vec<PaymentDetail>, RaffleError>;

    // Tickets
    async fn create_ticket(
        &self,
        auth: &AuthContext,
        ticket: NewTicket,
    ) -> Result<TicketId, RaffleError>;
    async fn search_tickets(
        &self,
        filter: TicketFilter,
    ) -> Result<Vec<tickets::Model>, RaffleError>;
    /// Tickets still carrying the default "Disponível" status.
    async fn available_tickets(&self) -> Result<Vec<tickets::Model>, RaffleError>;
}

#[derive(Clone)]
pub struct RaffleRegistryFactory {
    storage: Arc<dyn RaffleStorage>,
}

impl RaffleRegistryFactory {
    pub fn new(storage: Arc<dyn RaffleStorage>) -> Self {
        Self { storage }
    }

    pub fn from_sea_orm(connection: DatabaseConnection) -> Self {
        Self::new(Arc::new(SeaOrmRaffleStorage::new(connection)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRaffleStorage::new()))
    }
}

macro_rules! in_txn {
    ($self:ident, $txn:ident, $body:expr) => {{
        let mut $txn = $self.storage.begin().await?;
        let result = async { $body }.await;
        match result {
            Ok(value) => {
                $txn.commit().await?;
                Ok(value)
            }
            Err(err) => {
                $txn.rollback().await;
                Err(err)
            }
        }
    }};
}

#[async_trait]
impl RaffleRegistry for RaffleRegistryFactory {
    async fn create_bettor(
        &self,
        auth: &AuthContext,
        bettor: NewBettor,
    ) -> Result<BettorId, RaffleError> {
        auth.require(Role::Assistente)?;
        validate_new_bettor(&bettor)?;
        let nickname = bettor.nickname.clone();
        let id = in_txn!(self, txn, {
            if txn.find_bettor(&bettor.nickname).await?.is_some() {
                return Err(RaffleError::validation(format!(
                    "nickname already registered: {}",
                    bettor.nickname
                )));
            }
            txn.insert_bettor(bettor).await
        })?;
        info!(target: LOG_TARGET, nickname = %nickname, id, "bettor registered");
        Ok(id)
    }

    async fn update_bettor(
        &self,
        auth: &AuthContext,
        nickname: &str,
        patch: BettorPatch,
    ) -> Result<u64, RaffleError> {
        auth.require(Role::Assistente)?;
        in_txn!(self, txn, txn.update_bettor(nickname, &patch).await)
    }

    async fn deactivate_bettor(
        &self,
        auth: &AuthContext,
        nickname: &str,
    ) -> Result<u64, RaffleError> {
        auth.require(Role::Assistente)?;
        let patch = BettorPatch {
            status: Some(RecordStatus::Inactive),
            ..Default::default()
        };
        in_txn!(self, txn, txn.update_bettor(nickname, &patch).await)
    }

    async fn get_bettor(&self, nickname: &str) -> Result<Option<bettors::Model>, RaffleError> {
        in_txn!(self, txn, txn.find_bettor(nickname).await)
    }

    async fn search_bettors(
        &self,
        filter: BettorFilter,
    ) -> Result<Vec<bettors::Model>, RaffleError> {
        in_txn!(self, txn, txn.search_bettors(&filter).await)
    }

    async fn create_event(
        &self,
        auth: &AuthContext,
        event: NewEvent,
    ) -> Result<EventId, RaffleError> {
        auth.require(Role::Administrador)?;
        validate_new_event(&event)?;
        let name = event.name.clone();
        let id = in_txn!(self, txn, txn.insert_event(event).await)?;
        info!(target: LOG_TARGET, name = %name, id, "event registered");
        Ok(id)
    }

    async fn update_event(
        &self,
        auth: &AuthContext,
        id: EventId,
        patch: EventPatch,
    ) -> Result<u64, RaffleError> {
        auth.require(Role::Administrador)?;
        in_txn!(self, txn, txn.update_event(id, &patch).await)
    }

    async fn set_event_status(
        &self,
        auth: &AuthContext,
        id: EventId,
        status: EventStatus,
    ) -> Result<u64, RaffleError> {
        auth.require(Role::Administrador)?;
        in_txn!(self, txn, txn.set_event_status(id, status).await)
    }

    async fn get_event(&self, id: EventId) -> Result<Option<events::Model>, RaffleError> {
        in_txn!(self, txn, txn.load_event(id).await)
    }

    async fn list_events(&self, filter: EventFilter) -> Result<Vec<events::Model>, RaffleError> {
        in_txn!(self, txn, txn.list_events(&filter).await)
    }

    async fn first_active_event(&self) -> Result<Option<events::Model>, RaffleError> {
        in_txn!(self, txn, {
            let active = txn
                .list_events(&EventFilter {
                    text: None,
                    only_active: true,
                })
                .await?;
            Ok(active.into_iter().next())
        })
    }

    async fn create_fixed(
        &self,
        auth: &AuthContext,
        fixed: NewFixedAssignment,
    ) -> Result<FixedId, RaffleError> {
        auth.require(Role::Assistente)?;
        if fixed.nickname.trim().is_empty() {
            return Err(RaffleError::validation("nickname is required"));
        }
        in_txn!(self, txn, txn.insert_fixed(fixed).await)
    }

    async fn update_fixed(
        &self,
        auth: &AuthContext,
        id: FixedId,
        patch: FixedPatch,
    ) -> Result<u64, RaffleError> {
        auth.require(Role::Assistente)?;
        in_txn!(self, txn, txn.update_fixed(id, &patch).await)
    }

    async fn search_fixed(
        &self,
        filter: FixedFilter,
    ) -> Result<Vec<fixed_assignments::Model>, RaffleError> {
        in_txn!(self, txn, txn.search_fixed(&filter).await)
    }

    async fn batch_update_fixed_status(
        &self,
        auth: &AuthContext,
        owner: Option<&str>,
        group: Option<&str>,
        status: RecordStatus,
    ) -> Result<u64, RaffleError> {
        auth.require(Role::Administrador)?;
        let affected = in_txn!(
            self,
            txn,
            txn.batch_update_fixed_status(owner, group, status).await
        )?;
        info!(target: LOG_TARGET, affected, ?status, "fixed assignments batch-updated");
        Ok(affected)
    }

    async fn set_payment_status(
        &self,
        auth: &AuthContext,
        id: PaymentId,
        status: PaymentStatus,
    ) -> Result<u64, RaffleError> {
        auth.require(Role::Assistente)?;
        in_txn!(self, txn, txn.set_payment_status(id, status).await)
    }

    async fn get_payment(&self, id: PaymentId) -> Result<Option<PaymentDetail>, RaffleError> {
        in_txn!(self, txn, txn.find_payment(id).await)
    }

    async fn search_payments(
        &self,
        filter: PaymentFilter,
    ) -> Result<Vec<PaymentDetail>, RaffleError> {
        in_txn!(self, txn, txn.search_payments(&filter).await)
    }

    async fn create_ticket(
        &self,
        auth: &AuthContext,
        ticket: NewTicket,
    ) -> Result<TicketId, RaffleError> {
        auth.require(Role::Assistente)?;
        if ticket.number.trim().is_empty() {
            return Err(RaffleError::validation("ticket number is required"));
        }
        in_txn!(self, txn, txn.insert_ticket(ticket).await)
    }

    async fn search_tickets(
        &self,
        filter: TicketFilter,
    ) -> Result<Vec<tickets::Model>, RaffleError> {
        in_txn!(self, txn, txn.search_tickets(&filter).await)
    }

    async fn available_tickets(&self) -> Result<Vec<tickets::Model>, RaffleError> {
        let filter = TicketFilter {
            status: Some("Disponível".to_owned()),
            ..Default::default()
        };
        in_txn!(self, txn, txn.search_tickets(&filter).await)
    }
}
