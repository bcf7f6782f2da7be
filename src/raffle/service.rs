use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::auth::{AuthContext, Role};
use crate::db::entity::sea_orm_active_enums::{PaymentStatus, RecordStatus, SlotStatus};

use super::error::RaffleError;
use super::storage::{
    InMemoryRaffleStorage, NewPayment, NewSlot, RaffleStorage, RaffleTxn, SeaOrmRaffleStorage,
};
use super::types::{
    ApplyReport, EventId, FixedFilter, InitReport, PaymentId, RegisterPayment, SlotId, SlotNumber,
    POOL_SIZE,
};
use super::validation::validate_payment;

const LOG_TARGET: &str = "raffle::service";

/// Method recorded on the placeholder payments that back fixed assignments.
const FIXED_PAYMENT_METHOD: &str = "FIXO";

/// The stateful pool workflows. Each call runs in a single storage
/// transaction: full success commits, any failure rolls everything back.
#[async_trait]
pub trait RaffleService: Send + Sync {
    /// Creates the 1000-slot pool for an event and seeds active fixed
    /// assignments on top of it. Fails if the pool already exists.
    async fn initialize_event(
        &self,
        auth: &AuthContext,
        event_id: EventId,
    ) -> Result<InitReport, RaffleError>;

    /// Marks a number as reserved for a bettor. Re-reserving an already
    /// reserved number moves it to the new owner; a sold number is refused.
    async fn reserve_number(
        &self,
        auth: &AuthContext,
        event_id: EventId,
        number: SlotNumber,
        nickname: &str,
    ) -> Result<SlotId, RaffleError>;

    /// Returns a slot to the free pool, clearing owner and reservation
    /// timestamp. Cancelling a number that was never pooled is a no-op.
    async fn cancel_reservation(
        &self,
        auth: &AuthContext,
        event_id: EventId,
        number: SlotNumber,
    ) -> Result<Option<SlotId>, RaffleError>;

    /// Records one payment covering one or more numbers and marks them all
    /// sold. Every number must currently be reserved under the paying
    /// nickname, otherwise nothing is written.
    async fn register_payment(
        &self,
        auth: &AuthContext,
        params: RegisterPayment,
    ) -> Result<PaymentId, RaffleError>;

    /// Reserves slots for active fixed assignments matching the optional
    /// owner and group filters. Per-assignment outcomes are reported instead
    /// of aborting the batch.
    async fn apply_fixed_assignments(
        &self,
        auth: &AuthContext,
        event_id: EventId,
        owner: Option<&str>,
        group: Option<&str>,
    ) -> Result<ApplyReport, RaffleError>;
}

#[derive(Clone)]
pub struct RaffleServiceFactory {
    storage: Arc<dyn RaffleStorage>,
}

impl RaffleServiceFactory {
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

/// Seeds one fixed assignment into a freshly created pool: the slot flips to
/// reserved and a zero-value placeholder payment records the comp.
async fn seed_fixed_assignment(
    txn: &mut dyn RaffleTxn,
    event_id: EventId,
    nickname: &str,
    raw_number: &str,
) -> Result<SlotNumber, RaffleError> {
    let number = SlotNumber::new(raw_number)?;
    let slot = txn
        .load_slot(event_id, &number)
        .await?
        .ok_or(RaffleError::NotFound("slot"))?;
    let now = Utc::now();
    txn.set_slot_reserved(slot.id, nickname, now).await?;
    txn.insert_payment(NewPayment {
        reference: format!("FIXO-{event_id}-{number}"),
        nickname: nickname.to_owned(),
        amount: 0.0,
        method: FIXED_PAYMENT_METHOD.to_owned(),
        status: PaymentStatus::Confirmed,
        notes: None,
        registered_at: now,
    })
    .await?;
    Ok(number)
}

#[async_trait]
impl RaffleService for RaffleServiceFactory {
    async fn initialize_event(
        &self,
        auth: &AuthContext,
        event_id: EventId,
    ) -> Result<InitReport, RaffleError> {
        auth.require(Role::Administrador)?;

        let mut txn = self.storage.begin().await?;
        let result = async {
            txn.load_event(event_id)
                .await?
                .ok_or(RaffleError::NotFound("event"))?;

            if txn.count_event_slots(event_id).await? > 0 {
                return Err(RaffleError::AlreadyInitialized(event_id));
            }

            for index in 0..POOL_SIZE {
                let number = SlotNumber::from_index(index)?;
                txn.insert_slot(NewSlot::available(event_id, number)).await?;
            }

            let mut report = InitReport {
                slots_created: POOL_SIZE,
                ..Default::default()
            };

            let fixed = txn
                .search_fixed(&FixedFilter {
                    status: Some(RecordStatus::Active),
                    ..Default::default()
                })
                .await?;
            for assignment in fixed {
                match seed_fixed_assignment(
                    txn.as_mut(),
                    event_id,
                    &assignment.apelido,
                    &assignment.numero,
                )
                .await
                {
                    Ok(_) => report.fixed_applied += 1,
                    // A storage failure poisons the transaction; anything
                    // else is a bad assignment row and is reported per item.
                    Err(RaffleError::Database(err)) => return Err(RaffleError::Database(err)),
                    Err(err) => {
                        report
                            .fixed_failed
                            .push((assignment.numero.clone(), err.to_string()));
                    }
                }
            }

            Ok(report)
        }
        .await;

        match result {
            Ok(report) => {
                txn.commit().await?;
                info!(
                    target: LOG_TARGET,
                    event_id,
                    fixed_applied = report.fixed_applied,
                    fixed_failed = report.fixed_failed.len(),
                    "event pool initialized"
                );
                Ok(report)
            }
            Err(err) => {
                txn.rollback().await;
                Err(err)
            }
        }
    }

    async fn reserve_number(
        &self,
        auth: &AuthContext,
        event_id: EventId,
        number: SlotNumber,
        nickname: &str,
    ) -> Result<SlotId, RaffleError> {
        auth.require(Role::Assistente)?;
        if nickname.trim().is_empty() {
            return Err(RaffleError::validation("nickname is required"));
        }

        let mut txn = self.storage.begin().await?;
        let result = async {
            txn.load_event(event_id)
                .await?
                .ok_or(RaffleError::NotFound("event"))?;

            match txn.load_slot(event_id, &number).await? {
                Some(slot) if slot.status == SlotStatus::Sold => {
                    Err(RaffleError::SlotSold(number.to_string()))
                }
                Some(slot) => {
                    txn.set_slot_reserved(slot.id, nickname, Utc::now()).await?;
                    Ok(slot.id)
                }
                None => {
                    txn.insert_slot(NewSlot::reserved(event_id, number.clone(), nickname, Utc::now()))
                        .await
                }
            }
        }
        .await;

        match result {
            Ok(slot_id) => {
                txn.commit().await?;
                info!(target: LOG_TARGET, event_id, number = %number, nickname, "number reserved");
                Ok(slot_id)
            }
            Err(err) => {
                txn.rollback().await;
                Err(err)
            }
        }
    }

    async fn cancel_reservation(
        &self,
        auth: &AuthContext,
        event_id: EventId,
        number: SlotNumber,
    ) -> Result<Option<SlotId>, RaffleError> {
        auth.require(Role::Assistente)?;

        let mut txn = self.storage.begin().await?;
        let result = async {
            match txn.load_slot(event_id, &number).await? {
                Some(slot) if slot.status == SlotStatus::Sold => {
                    Err(RaffleError::SlotSold(number.to_string()))
                }
                Some(slot) => {
                    txn.set_slot_available(slot.id).await?;
                    Ok(Some(slot.id))
                }
                None => Ok(None),
            }
        }
        .await;

        match result {
            Ok(slot_id) => {
                txn.commit().await?;
                info!(target: LOG_TARGET, event_id, number = %number, "reservation cancelled");
                Ok(slot_id)
            }
            Err(err) => {
                txn.rollback().await;
                Err(err)
            }
        }
    }

    async fn register_payment(
        &self,
        auth: &AuthContext,
        params: RegisterPayment,
    ) -> Result<PaymentId, RaffleError> {
        auth.require(Role::Assistente)?;
        validate_payment(&params)?;

        let mut txn = self.storage.begin().await?;
        let result = async {
            let mut slot_ids = Vec::with_capacity(params.numbers.len());
            for number in &params.numbers {
                let slot = txn
                    .load_slot(params.event_id, number)
                    .await?
                    .ok_or_else(|| RaffleError::SlotUnavailable(number.to_string()))?;
                let owned_by_payer = slot.status == SlotStatus::Reserved
                    && slot.apelido.as_deref() == Some(params.nickname.as_str());
                if !owned_by_payer {
                    return Err(RaffleError::SlotUnavailable(number.to_string()));
                }
                slot_ids.push(slot.id);
            }

            let now = Utc::now();
            let payment_id = txn
                .insert_payment(NewPayment {
                    reference: params.reference.clone(),
                    nickname: params.nickname.clone(),
                    amount: params.amount,
                    method: params.method.clone(),
                    status: PaymentStatus::Confirmed,
                    notes: params.notes.clone(),
                    registered_at: now,
                })
                .await?;

            for slot_id in slot_ids {
                txn.set_slot_sold(slot_id, now).await?;
            }

            Ok(payment_id)
        }
        .await;

        match result {
            Ok(payment_id) => {
                txn.commit().await?;
                info!(
                    target: LOG_TARGET,
                    event_id = params.event_id,
                    nickname = %params.nickname,
                    numbers = params.numbers.len(),
                    amount = params.amount,
                    "payment registered"
                );
                Ok(payment_id)
            }
            Err(err) => {
                txn.rollback().await;
                Err(err)
            }
        }
    }

    async fn apply_fixed_assignments(
        &self,
        auth: &AuthContext,
        event_id: EventId,
        owner: Option<&str>,
        group: Option<&str>,
    ) -> Result<ApplyReport, RaffleError> {
        auth.require(Role::Administrador)?;

        let mut txn = self.storage.begin().await?;
        let result = async {
            txn.load_event(event_id)
                .await?
                .ok_or(RaffleError::NotFound("event"))?;

            let fixed = txn
                .search_fixed(&FixedFilter {
                    nickname: owner.map(str::to_owned),
                    group: group.map(str::to_owned),
                    status: Some(RecordStatus::Active),
                    number: None,
                })
                .await?;

            let mut report = ApplyReport::default();
            for assignment in fixed {
                let number = match SlotNumber::new(&assignment.numero) {
                    Ok(number) => number,
                    Err(err) => {
                        report
                            .failed
                            .push((assignment.numero.clone(), err.to_string()));
                        continue;
                    }
                };
                if txn.load_slot(event_id, &number).await?.is_some() {
                    report.skipped += 1;
                    continue;
                }
                match txn
                    .insert_slot(NewSlot::reserved(
                        event_id,
                        number.clone(),
                        assignment.apelido.clone(),
                        Utc::now(),
                    ))
                    .await
                {
                    Ok(_) => report.applied += 1,
                    Err(RaffleError::Database(err)) => return Err(RaffleError::Database(err)),
                    Err(err) => report
                        .failed
                        .push((assignment.numero.clone(), err.to_string())),
                }
            }

            Ok(report)
        }
        .await;

        match result {
            Ok(report) => {
                txn.commit().await?;
                info!(
                    target: LOG_TARGET,
                    event_id,
                    applied = report.applied,
                    skipped = report.skipped,
                    failed = report.failed.len(),
                    "fixed assignments applied"
                );
                Ok(report)
            }
            Err(err) => {
                txn.rollback().await;
                Err(err)
            }
        }
    }
}
