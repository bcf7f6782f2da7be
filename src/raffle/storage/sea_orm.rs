use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, EntityTrait,
    JoinType, NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    TransactionTrait,
};

use crate::db::entity::sea_orm_active_enums::{
    EventStatus, PaymentStatus, RecordStatus, SlotStatus,
};
use crate::db::entity::{bettors, events, fixed_assignments, payments, slots, tickets, users};

use super::super::error::RaffleError;
use super::super::types::{
    BettorFilter, BettorId, BettorPatch, DateRange, EventFilter, EventId, EventPatch, FixedFilter,
    FixedId, FixedPatch, NewBettor, NewEvent, NewFixedAssignment, NewTicket, PaymentFilter,
    PaymentId, ReservedSlot, SlotHistoryEntry, SlotId, SlotNumber, TicketFilter, TicketId,
    TopBettor,
};
use super::{NewPayment, NewSlot, PaymentDetail, RaffleStorage, RaffleTxn};

pub struct SeaOrmRaffleStorage {
    connection: DatabaseConnection,
}

impl SeaOrmRaffleStorage {
    pub fn new(connection: DatabaseConnection) -> Self {
        Self { connection }
    }
}

pub struct SeaOrmRaffleTxn {
    txn: DatabaseTransaction,
}

#[async_trait]
impl RaffleStorage for SeaOrmRaffleStorage {
    async fn begin(&self) -> Result<Box<dyn RaffleTxn + Send>, RaffleError> {
        let txn = self.connection.begin().await?;
        Ok(Box::new(SeaOrmRaffleTxn { txn }))
    }
}

fn like_pattern(needle: &str) -> String {
    format!("%{needle}%")
}

#[async_trait]
impl RaffleTxn for SeaOrmRaffleTxn {
    async fn insert_bettor(&mut self, bettor: NewBettor) -> Result<BettorId, RaffleError> {
        let model = bettors::ActiveModel {
            full_name: Set(bettor.full_name),
            nickname: Set(bettor.nickname),
            area_code: Set(bettor.area_code),
            phone: Set(bettor.phone),
            email: Set(bettor.email),
            address: Set(bettor.address),
            status: Set(RecordStatus::Active),
            ..Default::default()
        };
        let inserted = model.insert(&self.txn).await?;
        Ok(inserted.id)
    }

    async fn update_bettor(
        &mut self,
        nickname: &str,
        patch: &BettorPatch,
    ) -> Result<u64, RaffleError> {
        let values = bettors::ActiveModel {
            id: NotSet,
            full_name: patch.full_name.clone().map_or(NotSet, Set),
            nickname: NotSet,
            area_code: patch.area_code.clone().map_or(NotSet, |v| Set(Some(v))),
            phone: patch.phone.clone().map_or(NotSet, |v| Set(Some(v))),
            email: patch.email.clone().map_or(NotSet, |v| Set(Some(v))),
            address: patch.address.clone().map_or(NotSet, |v| Set(Some(v))),
            status: patch.status.map_or(NotSet, Set),
        };
        let result = bettors::Entity::update_many()
            .set(values)
            .filter(bettors::Column::Nickname.eq(nickname))
            .exec(&self.txn)
            .await?;
        Ok(result.rows_affected)
    }

    async fn find_bettor(
        &mut self,
        nickname: &str,
    ) -> Result<Option<bettors::Model>, RaffleError> {
        Ok(bettors::Entity::find()
            .filter(bettors::Column::Nickname.eq(nickname))
            .one(&self.txn)
            .await?)
    }

    async fn search_bettors(
        &mut self,
        filter: &BettorFilter,
    ) -> Result<Vec<bettors::Model>, RaffleError> {
        let mut query = bettors::Entity::find();
        if let Some(name) = &filter.name {
            query = query.filter(
                Expr::col((bettors::Entity, bettors::Column::FullName))
                    .ilike(like_pattern(name)),
            );
        }
        if let Some(nickname) = &filter.nickname {
            query = query.filter(
                Expr::col((bettors::Entity, bettors::Column::Nickname))
                    .ilike(like_pattern(nickname)),
            );
        }
        match filter.status {
            Some(status) => query = query.filter(bettors::Column::Status.eq(status)),
            None if filter.only_active => {
                query = query.filter(bettors::Column::Status.eq(RecordStatus::Active));
            }
            None => {}
        }
        Ok(query
            .order_by_asc(bettors::Column::FullName)
            .all(&self.txn)
            .await?)
    }

    async fn count_active_bettors(&mut self) -> Result<u64, RaffleError> {
        Ok(bettors::Entity::find()
            .filter(bettors::Column::Status.eq(RecordStatus::Active))
            .count(&self.txn)
            .await?)
    }

    async fn insert_event(&mut self, event: NewEvent) -> Result<EventId, RaffleError> {
        let model = events::ActiveModel {
            name: Set(event.name),
            kind: Set(event.kind),
            announcement_date: Set(event.announcement_date),
            ticket_price: Set(event.ticket_price),
            prize: Set(event.prize),
            floor_prize: Set(event.floor_prize),
            result_number: Set(event.result_number),
            description: Set(event.description),
            draw_reference: Set(event.draw_reference),
            status: Set(event.status),
            ..Default::default()
        };
        let inserted = model.insert(&self.txn).await?;
        Ok(inserted.id)
    }

    async fn update_event(&mut self, id: EventId, patch: &EventPatch) -> Result<u64, RaffleError> {
        let values = events::ActiveModel {
            id: NotSet,
            name: patch.name.clone().map_or(NotSet, Set),
            kind: patch.kind.clone().map_or(NotSet, Set),
            announcement_date: patch.announcement_date.map_or(NotSet, Set),
            ticket_price: patch.ticket_price.map_or(NotSet, Set),
            prize: patch.prize.map_or(NotSet, Set),
            floor_prize: patch.floor_prize.map_or(NotSet, |v| Set(Some(v))),
            result_number: patch.result_number.clone().map_or(NotSet, |v| Set(Some(v))),
            description: patch.description.clone().map_or(NotSet, |v| Set(Some(v))),
            draw_reference: patch
                .draw_reference
                .clone()
                .map_or(NotSet, |v| Set(Some(v))),
            status: NotSet,
        };
        let result = events::Entity::update_many()
            .set(values)
            .filter(events::Column::Id.eq(id))
            .exec(&self.txn)
            .await?;
        Ok(result.rows_affected)
    }

    async fn set_event_status(
        &mut self,
        id: EventId,
        status: EventStatus,
    ) -> Result<u64, RaffleError> {
        let result = events::Entity::update_many()
            .col_expr(events::Column::Status, Expr::value(status))
            .filter(events::Column::Id.eq(id))
            .exec(&self.txn)
            .await?;
        Ok(result.rows_affected)
    }

    async fn load_event(&mut self, id: EventId) -> Result<Option<events::Model>, RaffleError> {
        Ok(events::Entity::find_by_id(id).one(&self.txn).await?)
    }

    async fn list_events(
        &mut self,
        filter: &EventFilter,
    ) -> Result<Vec<events::Model>, RaffleError> {
        let mut query = events::Entity::find();
        if let Some(text) = &filter.text {
            let pattern = like_pattern(text);
            query = query.filter(
                Condition::any()
                    .add(Expr::col((events::Entity, events::Column::Name)).ilike(pattern.clone()))
                    .add(Expr::col((events::Entity, events::Column::Kind)).ilike(pattern)),
            );
        }
        if filter.only_active {
            query = query.filter(events::Column::Status.eq(EventStatus::Active));
        }
        Ok(query
            .order_by_asc(events::Column::Name)
            .all(&self.txn)
            .await?)
    }

    async fn count_events_by_status(&mut self) -> Result<Vec<(EventStatus, u64)>, RaffleError> {
        let rows: Vec<(EventStatus, i64)> = events::Entity::find()
            .select_only()
            .column(events::Column::Status)
            .column_as(events::Column::Id.count(), "count")
            .group_by(events::Column::Status)
            .into_tuple()
            .all(&self.txn)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(status, count)| (status, count as u64))
            .collect())
    }

    async fn count_event_slots(&mut self, event_id: EventId) -> Result<u64, RaffleError> {
        Ok(slots::Entity::find()
            .filter(slots::Column::EventoId.eq(event_id))
            .count(&self.txn)
            .await?)
    }

    async fn insert_slot(&mut self, slot: NewSlot) -> Result<SlotId, RaffleError> {
        let model = slots::ActiveModel {
            evento_id: Set(slot.event_id),
            numero: Set(slot.number.as_str().to_owned()),
            status: Set(slot.status),
            apelido: Set(slot.nickname),
            data_reserva: Set(slot.reserved_at),
            data_venda: Set(None),
            ..Default::default()
        };
        let inserted = model.insert(&self.txn).await?;
        Ok(inserted.id)
    }

    async fn load_slot(
        &mut self,
        event_id: EventId,
        number: &SlotNumber,
    ) -> Result<Option<slots::Model>, RaffleError> {
        Ok(slots::Entity::find()
            .filter(slots::Column::EventoId.eq(event_id))
            .filter(slots::Column::Numero.eq(number.as_str()))
            .one(&self.txn)
            .await?)
    }

    async fn set_slot_reserved(
        &mut self,
        slot_id: SlotId,
        nickname: &str,
        at: DateTime<Utc>,
    ) -> Result<(), RaffleError> {
        let values = slots::ActiveModel {
            status: Set(SlotStatus::Reserved),
            apelido: Set(Some(nickname.to_owned())),
            data_reserva: Set(Some(at)),
            ..Default::default()
        };
        let result = slots::Entity::update_many()
            .set(values)
            .filter(slots::Column::Id.eq(slot_id))
            .exec(&self.txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(RaffleError::NotFound("slot"));
        }
        Ok(())
    }

    async fn set_slot_available(&mut self, slot_id: SlotId) -> Result<(), RaffleError> {
        let values = slots::ActiveModel {
            status: Set(SlotStatus::Available),
            apelido: Set(None),
            data_reserva: Set(None),
            ..Default::default()
        };
        let result = slots::Entity::update_many()
            .set(values)
            .filter(slots::Column::Id.eq(slot_id))
            .exec(&self.txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(RaffleError::NotFound("slot"));
        }
        Ok(())
    }

    async fn set_slot_sold(
        &mut self,
        slot_id: SlotId,
        at: DateTime<Utc>,
    ) -> Result<(), RaffleError> {
        let values = slots::ActiveModel {
            status: Set(SlotStatus::Sold),
            data_venda: Set(Some(at)),
            ..Default::default()
        };
        let result = slots::Entity::update_many()
            .set(values)
            .filter(slots::Column::Id.eq(slot_id))
            .exec(&self.txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(RaffleError::NotFound("slot"));
        }
        Ok(())
    }

    async fn list_event_slots(
        &mut self,
        event_id: EventId,
    ) -> Result<Vec<slots::Model>, RaffleError> {
        Ok(slots::Entity::find()
            .filter(slots::Column::EventoId.eq(event_id))
            .order_by_asc(slots::Column::Numero)
            .all(&self.txn)
            .await?)
    }

    async fn list_bettor_slots(
        &mut self,
        event_id: EventId,
        nickname: &str,
    ) -> Result<Vec<slots::Model>, RaffleError> {
        Ok(slots::Entity::find()
            .filter(slots::Column::EventoId.eq(event_id))
            .filter(slots::Column::Apelido.eq(nickname))
            .order_by_asc(slots::Column::Numero)
            .all(&self.txn)
            .await?)
    }

    async fn list_reserved_by_bettor(
        &mut self,
        nickname: &str,
    ) -> Result<Vec<ReservedSlot>, RaffleError> {
        let rows: Vec<(i64, i64, String, String, f64, Option<DateTime<Utc>>)> =
            slots::Entity::find()
                .join(JoinType::InnerJoin, slots::Relation::Event.def())
                .filter(slots::Column::Status.eq(SlotStatus::Reserved))
                .filter(slots::Column::Apelido.eq(nickname))
                .select_only()
                .column(slots::Column::Id)
                .column(slots::Column::EventoId)
                .column_as(events::Column::Name, "event_name")
                .column(slots::Column::Numero)
                .column_as(events::Column::TicketPrice, "ticket_price")
                .column(slots::Column::DataReserva)
                .order_by_asc(events::Column::Name)
                .order_by_asc(slots::Column::Numero)
                .into_tuple()
                .all(&self.txn)
                .await?;
        rows.into_iter()
            .map(
                |(slot_id, event_id, event_name, numero, ticket_price, reserved_at)| {
                    Ok(ReservedSlot {
                        slot_id,
                        event_id,
                        event_name,
                        number: SlotNumber::new(&numero)?,
                        ticket_price,
                        reserved_at,
                    })
                },
            )
            .collect()
    }

    async fn slot_status_counts(
        &mut self,
        event_id: EventId,
    ) -> Result<Vec<(SlotStatus, u64)>, RaffleError> {
        let rows: Vec<(SlotStatus, i64)> = slots::Entity::find()
            .filter(slots::Column::EventoId.eq(event_id))
            .select_only()
            .column(slots::Column::Status)
            .column_as(slots::Column::Id.count(), "count")
            .group_by(slots::Column::Status)
            .into_tuple()
            .all(&self.txn)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(status, count)| (status, count as u64))
            .collect())
    }

    async fn top_bettors(
        &mut self,
        event_id: EventId,
        limit: u64,
    ) -> Result<Vec<TopBettor>, RaffleError> {
        let rows: Vec<(String, String, i64)> = slots::Entity::find()
            .join(JoinType::InnerJoin, slots::Relation::Bettor.def())
            .filter(slots::Column::EventoId.eq(event_id))
            .select_only()
            .column(slots::Column::Apelido)
            .column_as(bettors::Column::FullName, "full_name")
            .column_as(slots::Column::Id.count(), "slot_count")
            .group_by(slots::Column::Apelido)
            .group_by(bettors::Column::FullName)
            .order_by_desc(Expr::col(slots::Column::Id).count())
            .limit(limit)
            .into_tuple()
            .all(&self.txn)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(nickname, full_name, slot_count)| TopBettor {
                nickname,
                full_name,
                slot_count: slot_count as u64,
            })
            .collect())
    }

    async fn count_bettor_slots(&mut self, nickname: &str) -> Result<u64, RaffleError> {
        Ok(slots::Entity::find()
            .filter(slots::Column::Apelido.eq(nickname))
            .count(&self.txn)
            .await?)
    }

    async fn recent_bettor_slots(
        &mut self,
        nickname: &str,
        limit: u64,
    ) -> Result<Vec<SlotHistoryEntry>, RaffleError> {
        let rows: Vec<(String, String, SlotStatus, Option<DateTime<Utc>>)> = slots::Entity::find()
            .join(JoinType::InnerJoin, slots::Relation::Event.def())
            .filter(slots::Column::Apelido.eq(nickname))
            .select_only()
            .column(slots::Column::Numero)
            .column_as(events::Column::Name, "event_name")
            .column(slots::Column::Status)
            .column(slots::Column::DataVenda)
            .order_by_desc(slots::Column::DataVenda)
            .limit(limit)
            .into_tuple()
            .all(&self.txn)
            .await?;
        rows.into_iter()
            .map(|(numero, event_name, status, sold_at)| {
                Ok(SlotHistoryEntry {
                    number: SlotNumber::new(&numero)?,
                    event_name,
                    status,
                    sold_at,
                })
            })
            .collect()
    }

    async fn insert_fixed(&mut self, fixed: NewFixedAssignment) -> Result<FixedId, RaffleError> {
        let model = fixed_assignments::ActiveModel {
            apelido: Set(fixed.nickname),
            numero: Set(fixed.number.as_str().to_owned()),
            grupo: Set(fixed.group),
            status: Set(fixed.status),
            data_registro: Set(Utc::now()),
            ..Default::default()
        };
        let inserted = model.insert(&self.txn).await?;
        Ok(inserted.id)
    }

    async fn update_fixed(&mut self, id: FixedId, patch: &FixedPatch) -> Result<u64, RaffleError> {
        let values = fixed_assignments::ActiveModel {
            id: NotSet,
            apelido: patch.nickname.clone().map_or(NotSet, Set),
            numero: patch
                .number
                .as_ref()
                .map_or(NotSet, |n| Set(n.as_str().to_owned())),
            grupo: patch.group.clone().map_or(NotSet, |v| Set(Some(v))),
            status: patch.status.map_or(NotSet, Set),
            data_registro: NotSet,
        };
        let result = fixed_assignments::Entity::update_many()
            .set(values)
            .filter(fixed_assignments::Column::Id.eq(id))
            .exec(&self.txn)
            .await?;
        Ok(result.rows_affected)
    }

    async fn find_fixed(
        &mut self,
        id: FixedId,
    ) -> Result<Option<fixed_assignments::Model>, RaffleError> {
        Ok(fixed_assignments::Entity::find_by_id(id)
            .one(&self.txn)
            .await?)
    }

    async fn search_fixed(
        &mut self,
        filter: &FixedFilter,
    ) -> Result<Vec<fixed_assignments::Model>, RaffleError> {
        let mut query = fixed_assignments::Entity::find();
        if let Some(nickname) = &filter.nickname {
            query = query.filter(fixed_assignments::Column::Apelido.eq(nickname));
        }
        if let Some(status) = filter.status {
            query = query.filter(fixed_assignments::Column::Status.eq(status));
        }
        if let Some(group) = &filter.group {
            query = query.filter(
                Expr::col((fixed_assignments::Entity, fixed_assignments::Column::Grupo))
                    .ilike(like_pattern(group)),
            );
        }
        if let Some(number) = &filter.number {
            query = query.filter(fixed_assignments::Column::Numero.eq(number.as_str()));
        }
        Ok(query
            .order_by_asc(fixed_assignments::Column::Apelido)
            .order_by_asc(fixed_assignments::Column::Numero)
            .all(&self.txn)
            .await?)
    }

    async fn batch_update_fixed_status(
        &mut self,
        nickname: Option<&str>,
        group: Option<&str>,
        status: RecordStatus,
    ) -> Result<u64, RaffleError> {
        let mut update = fixed_assignments::Entity::update_many()
            .col_expr(fixed_assignments::Column::Status, Expr::value(status));
        if let Some(nickname) = nickname {
            update = update.filter(fixed_assignments::Column::Apelido.eq(nickname));
        }
        if let Some(group) = group {
            update = update.filter(
                Expr::col((fixed_assignments::Entity, fixed_assignments::Column::Grupo))
                    .ilike(like_pattern(group)),
            );
        }
        let result = update.exec(&self.txn).await?;
        Ok(result.rows_affected)
    }

    async fn insert_payment(&mut self, payment: NewPayment) -> Result<PaymentId, RaffleError> {
        let model = payments::ActiveModel {
            numero: Set(payment.reference),
            apelido: Set(payment.nickname),
            valor: Set(payment.amount),
            metodo: Set(payment.method),
            status: Set(payment.status),
            observacoes: Set(payment.notes),
            data_registro: Set(payment.registered_at),
            ..Default::default()
        };
        let inserted = model.insert(&self.txn).await?;
        Ok(inserted.id)
    }

    async fn set_payment_status(
        &mut self,
        id: PaymentId,
        status: PaymentStatus,
    ) -> Result<u64, RaffleError> {
        let result = payments::Entity::update_many()
            .col_expr(payments::Column::Status, Expr::value(status))
            .filter(payments::Column::Id.eq(id))
            .exec(&self.txn)
            .await?;
        Ok(result.rows_affected)
    }

    async fn find_payment(
        &mut self,
        id: PaymentId,
    ) -> Result<Option<PaymentDetail>, RaffleError> {
        let row = payments::Entity::find_by_id(id)
            .find_also_related(bettors::Entity)
            .one(&self.txn)
            .await?;
        Ok(row.map(|(payment, bettor)| PaymentDetail {
            payment,
            bettor_name: bettor.map(|b| b.full_name).unwrap_or_default(),
        }))
    }

    async fn search_payments(
        &mut self,
        filter: &PaymentFilter,
    ) -> Result<Vec<PaymentDetail>, RaffleError> {
        let mut query = payments::Entity::find().find_also_related(bettors::Entity);
        if let Some(nickname) = &filter.nickname {
            query = query.filter(payments::Column::Apelido.eq(nickname));
        }
        if let Some(status) = filter.status {
            query = query.filter(payments::Column::Status.eq(status));
        }
        if let Some(method) = &filter.method {
            query = query.filter(payments::Column::Metodo.eq(method));
        }
        if let Some(from) = filter.range.from {
            query = query.filter(payments::Column::DataRegistro.gte(from));
        }
        if let Some(to) = filter.range.to {
            query = query.filter(payments::Column::DataRegistro.lte(to));
        }
        let rows = query
            .order_by_desc(payments::Column::DataRegistro)
            .all(&self.txn)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(payment, bettor)| PaymentDetail {
                payment,
                bettor_name: bettor.map(|b| b.full_name).unwrap_or_default(),
            })
            .collect())
    }

    async fn payments_total(&mut self, range: &DateRange) -> Result<f64, RaffleError> {
        let mut query = payments::Entity::find();
        if let Some(from) = range.from {
            query = query.filter(payments::Column::DataRegistro.gte(from));
        }
        if let Some(to) = range.to {
            query = query.filter(payments::Column::DataRegistro.lte(to));
        }
        let total: Option<Option<f64>> = query
            .select_only()
            .column_as(payments::Column::Valor.sum(), "total")
            .into_tuple()
            .one(&self.txn)
            .await?;
        Ok(total.flatten().unwrap_or(0.0))
    }

    async fn payments_total_by_bettor(&mut self, nickname: &str) -> Result<f64, RaffleError> {
        let total: Option<Option<f64>> = payments::Entity::find()
            .filter(payments::Column::Apelido.eq(nickname))
            .select_only()
            .column_as(payments::Column::Valor.sum(), "total")
            .into_tuple()
            .one(&self.txn)
            .await?;
        Ok(total.flatten().unwrap_or(0.0))
    }

    async fn insert_ticket(&mut self, ticket: NewTicket) -> Result<TicketId, RaffleError> {
        let model = tickets::ActiveModel {
            numero: Set(ticket.number),
            tipo: Set(ticket.kind),
            lote: Set(ticket.batch),
            status: Set(ticket.status),
            observacoes: Set(ticket.notes),
            data_cadastro: Set(Utc::now()),
            ..Default::default()
        };
        let inserted = model.insert(&self.txn).await?;
        Ok(inserted.id)
    }

    async fn search_tickets(
        &mut self,
        filter: &TicketFilter,
    ) -> Result<Vec<tickets::Model>, RaffleError> {
        let mut query = tickets::Entity::find();
        if let Some(number) = &filter.number {
            query = query.filter(
                Expr::col((tickets::Entity, tickets::Column::Numero)).ilike(like_pattern(number)),
            );
        }
        if let Some(kind) = &filter.kind {
            query = query.filter(tickets::Column::Tipo.eq(kind));
        }
        if let Some(status) = &filter.status {
            query = query.filter(tickets::Column::Status.eq(status));
        }
        if let Some(batch) = &filter.batch {
            query = query.filter(
                Expr::col((tickets::Entity, tickets::Column::Lote)).ilike(like_pattern(batch)),
            );
        }
        if let Some(from) = filter.range.from {
            query = query.filter(tickets::Column::DataCadastro.gte(from));
        }
        if let Some(to) = filter.range.to {
            query = query.filter(tickets::Column::DataCadastro.lte(to));
        }
        Ok(query
            .order_by_desc(tickets::Column::DataCadastro)
            .all(&self.txn)
            .await?)
    }

    async fn ticket_status_counts(&mut self) -> Result<Vec<(String, u64)>, RaffleError> {
        let rows: Vec<(String, i64)> = tickets::Entity::find()
            .select_only()
            .column(tickets::Column::Status)
            .column_as(tickets::Column::Id.count(), "count")
            .group_by(tickets::Column::Status)
            .into_tuple()
            .all(&self.txn)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(status, count)| (status, count as u64))
            .collect())
    }

    async fn ticket_type_counts(&mut self) -> Result<Vec<(String, u64)>, RaffleError> {
        let rows: Vec<(String, i64)> = tickets::Entity::find()
            .select_only()
            .column(tickets::Column::Tipo)
            .column_as(tickets::Column::Id.count(), "count")
            .group_by(tickets::Column::Tipo)
            .order_by_desc(Expr::col(tickets::Column::Id).count())
            .into_tuple()
            .all(&self.txn)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(kind, count)| (kind, count as u64))
            .collect())
    }

    async fn find_active_user(
        &mut self,
        username: &str,
    ) -> Result<Option<users::Model>, RaffleError> {
        Ok(users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .filter(users::Column::Ativo.eq(true))
            .one(&self.txn)
            .await?)
    }

    async fn commit(self: Box<Self>) -> Result<(), RaffleError> {
        self.txn.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) {
        let _ = self.txn.rollback().await;
    }
}
