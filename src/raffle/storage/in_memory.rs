use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use sea_orm::DbErr;

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

/// In-process backend used by the workflow tests and demos. A transaction
/// clones the whole state, mutates the clone, and swaps it back on commit, so
/// rollback is literal.
pub struct InMemoryRaffleStorage {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Clone)]
struct Inner {
    bettors: Vec<bettors::Model>,
    events: Vec<events::Model>,
    slots: Vec<slots::Model>,
    fixed: Vec<fixed_assignments::Model>,
    payments: Vec<payments::Model>,
    tickets: Vec<tickets::Model>,
    users: Vec<users::Model>,
    next_id: i64,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            bettors: Vec::new(),
            events: Vec::new(),
            slots: Vec::new(),
            fixed: Vec::new(),
            payments: Vec::new(),
            tickets: Vec::new(),
            users: Vec::new(),
            next_id: 1,
        }
    }
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl InMemoryRaffleStorage {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Test hook: user accounts have no write path through the transaction
    /// trait, so tests plant them directly.
    pub fn seed_user(&self, user: users::Model) {
        self.inner.lock().users.push(user);
    }
}

impl Default for InMemoryRaffleStorage {
    fn default() -> Self {
        Self::new()
    }
}

pub struct InMemoryRaffleTxn {
    shared: Arc<Mutex<Inner>>,
    state: Inner,
}

#[async_trait]
impl RaffleStorage for InMemoryRaffleStorage {
    async fn begin(&self) -> Result<Box<dyn RaffleTxn + Send>, RaffleError> {
        let state = self.inner.lock().clone();
        Ok(Box::new(InMemoryRaffleTxn {
            shared: Arc::clone(&self.inner),
            state,
        }))
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn duplicate(what: &str) -> RaffleError {
    RaffleError::Database(DbErr::Custom(format!("duplicate key: {what}")))
}

#[async_trait]
impl RaffleTxn for InMemoryRaffleTxn {
    async fn insert_bettor(&mut self, bettor: NewBettor) -> Result<BettorId, RaffleError> {
        if self
            .state
            .bettors
            .iter()
            .any(|b| b.nickname == bettor.nickname)
        {
            return Err(duplicate("apostadores.apelido"));
        }
        let id = self.state.next_id();
        self.state.bettors.push(bettors::Model {
            id,
            full_name: bettor.full_name,
            nickname: bettor.nickname,
            area_code: bettor.area_code,
            phone: bettor.phone,
            email: bettor.email,
            address: bettor.address,
            status: RecordStatus::Active,
        });
        Ok(id)
    }

    async fn update_bettor(
        &mut self,
        nickname: &str,
        patch: &BettorPatch,
    ) -> Result<u64, RaffleError> {
        let mut affected = 0;
        for bettor in self
            .state
            .bettors
            .iter_mut()
            .filter(|b| b.nickname == nickname)
        {
            if let Some(full_name) = &patch.full_name {
                bettor.full_name = full_name.clone();
            }
            if let Some(area_code) = &patch.area_code {
                bettor.area_code = Some(area_code.clone());
            }
            if let Some(phone) = &patch.phone {
                bettor.phone = Some(phone.clone());
            }
            if let Some(email) = &patch.email {
                bettor.email = Some(email.clone());
            }
            if let Some(address) = &patch.address {
                bettor.address = Some(address.clone());
            }
            if let Some(status) = patch.status {
                bettor.status = status;
            }
            affected += 1;
        }
        Ok(affected)
    }

    async fn find_bettor(
        &mut self,
        nickname: &str,
    ) -> Result<Option<bettors::Model>, RaffleError> {
        Ok(self
            .state
            .bettors
            .iter()
            .find(|b| b.nickname == nickname)
            .cloned())
    }

    async fn search_bettors(
        &mut self,
        filter: &BettorFilter,
    ) -> Result<Vec<bettors::Model>, RaffleError> {
        let mut rows: Vec<_> = self
            .state
            .bettors
            .iter()
            .filter(|b| {
                filter
                    .name
                    .as_deref()
                    .map_or(true, |n| contains_ci(&b.full_name, n))
                    && filter
                        .nickname
                        .as_deref()
                        .map_or(true, |n| contains_ci(&b.nickname, n))
                    && match filter.status {
                        Some(status) => b.status == status,
                        None => !filter.only_active || b.status == RecordStatus::Active,
                    }
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(rows)
    }

    async fn count_active_bettors(&mut self) -> Result<u64, RaffleError> {
        Ok(self
            .state
            .bettors
            .iter()
            .filter(|b| b.status == RecordStatus::Active)
            .count() as u64)
    }

    async fn insert_event(&mut self, event: NewEvent) -> Result<EventId, RaffleError> {
        let id = self.state.next_id();
        self.state.events.push(events::Model {
            id,
            name: event.name,
            kind: event.kind,
            announcement_date: event.announcement_date,
            ticket_price: event.ticket_price,
            prize: event.prize,
            floor_prize: event.floor_prize,
            result_number: event.result_number,
            description: event.description,
            draw_reference: event.draw_reference,
            status: event.status,
        });
        Ok(id)
    }

    async fn update_event(&mut self, id: EventId, patch: &EventPatch) -> Result<u64, RaffleError> {
        let Some(event) = self.state.events.iter_mut().find(|e| e.id == id) else {
            return Ok(0);
        };
        if let Some(name) = &patch.name {
            event.name = name.clone();
        }
        if let Some(kind) = &patch.kind {
            event.kind = kind.clone();
        }
        if let Some(date) = patch.announcement_date {
            event.announcement_date = date;
        }
        if let Some(price) = patch.ticket_price {
            event.ticket_price = price;
        }
        if let Some(prize) = patch.prize {
            event.prize = prize;
        }
        if let Some(floor) = patch.floor_prize {
            event.floor_prize = Some(floor);
        }
        if let Some(result) = &patch.result_number {
            event.result_number = Some(result.clone());
        }
        if let Some(description) = &patch.description {
            event.description = Some(description.clone());
        }
        if let Some(reference) = &patch.draw_reference {
            event.draw_reference = Some(reference.clone());
        }
        Ok(1)
    }

    async fn set_event_status(
        &mut self,
        id: EventId,
        status: EventStatus,
    ) -> Result<u64, RaffleError> {
        match self.state.events.iter_mut().find(|e| e.id == id) {
            Some(event) => {
                event.status = status;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn load_event(&mut self, id: EventId) -> Result<Option<events::Model>, RaffleError> {
        Ok(self.state.events.iter().find(|e| e.id == id).cloned())
    }

    async fn list_events(
        &mut self,
        filter: &EventFilter,
    ) -> Result<Vec<events::Model>, RaffleError> {
        let mut rows: Vec<_> = self
            .state
            .events
            .iter()
            .filter(|e| {
                filter
                    .text
                    .as_deref()
                    .map_or(true, |t| contains_ci(&e.name, t) || contains_ci(&e.kind, t))
                    && (!filter.only_active || e.status == EventStatus::Active)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn count_events_by_status(&mut self) -> Result<Vec<(EventStatus, u64)>, RaffleError> {
        let mut counts: Vec<(EventStatus, u64)> = Vec::new();
        for event in &self.state.events {
            match counts.iter_mut().find(|(status, _)| *status == event.status) {
                Some((_, count)) => *count += 1,
                None => counts.push((event.status, 1)),
            }
        }
        Ok(counts)
    }

    async fn count_event_slots(&mut self, event_id: EventId) -> Result<u64, RaffleError> {
        Ok(self
            .state
            .slots
            .iter()
            .filter(|s| s.evento_id == event_id)
            .count() as u64)
    }

    async fn insert_slot(&mut self, slot: NewSlot) -> Result<SlotId, RaffleError> {
        if self
            .state
            .slots
            .iter()
            .any(|s| s.evento_id == slot.event_id && s.numero == slot.number.as_str())
        {
            return Err(duplicate("jogos.evento_id_numero"));
        }
        let id = self.state.next_id();
        self.state.slots.push(slots::Model {
            id,
            evento_id: slot.event_id,
            numero: slot.number.as_str().to_owned(),
            status: slot.status,
            apelido: slot.nickname,
            data_reserva: slot.reserved_at,
            data_venda: None,
        });
        Ok(id)
    }

    async fn load_slot(
        &mut self,
        event_id: EventId,
        number: &SlotNumber,
    ) -> Result<Option<slots::Model>, RaffleError> {
        Ok(self
            .state
            .slots
            .iter()
            .find(|s| s.evento_id == event_id && s.numero == number.as_str())
            .cloned())
    }

    async fn set_slot_reserved(
        &mut self,
        slot_id: SlotId,
        nickname: &str,
        at: DateTime<Utc>,
    ) -> Result<(), RaffleError> {
        let slot = self
            .state
            .slots
            .iter_mut()
            .find(|s| s.id == slot_id)
            .ok_or(RaffleError::NotFound("slot"))?;
        slot.status = SlotStatus::Reserved;
        slot.apelido = Some(nickname.to_owned());
        slot.data_reserva = Some(at);
        Ok(())
    }

    async fn set_slot_available(&mut self, slot_id: SlotId) -> Result<(), RaffleError> {
        let slot = self
            .state
            .slots
            .iter_mut()
            .find(|s| s.id == slot_id)
            .ok_or(RaffleError::NotFound("slot"))?;
        slot.status = SlotStatus::Available;
        slot.apelido = None;
        slot.data_reserva = None;
        Ok(())
    }

    async fn set_slot_sold(
        &mut self,
        slot_id: SlotId,
        at: DateTime<Utc>,
    ) -> Result<(), RaffleError> {
        let slot = self
            .state
            .slots
            .iter_mut()
            .find(|s| s.id == slot_id)
            .ok_or(RaffleError::NotFound("slot"))?;
        slot.status = SlotStatus::Sold;
        slot.data_venda = Some(at);
        Ok(())
    }

    async fn list_event_slots(
        &mut self,
        event_id: EventId,
    ) -> Result<Vec<slots::Model>, RaffleError> {
        let mut rows: Vec<_> = self
            .state
            .slots
            .iter()
            .filter(|s| s.evento_id == event_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.numero.cmp(&b.numero));
        Ok(rows)
    }

    async fn list_bettor_slots(
        &mut self,
        event_id: EventId,
        nickname: &str,
    ) -> Result<Vec<slots::Model>, RaffleError> {
        let mut rows: Vec<_> = self
            .state
            .slots
            .iter()
            .filter(|s| s.evento_id == event_id && s.apelido.as_deref() == Some(nickname))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.numero.cmp(&b.numero));
        Ok(rows)
    }

    async fn list_reserved_by_bettor(
        &mut self,
        nickname: &str,
    ) -> Result<Vec<ReservedSlot>, RaffleError> {
        let mut rows: Vec<ReservedSlot> = Vec::new();
        for slot in self.state.slots.iter().filter(|s| {
            s.status == SlotStatus::Reserved && s.apelido.as_deref() == Some(nickname)
        }) {
            let Some(event) = self.state.events.iter().find(|e| e.id == slot.evento_id) else {
                continue;
            };
            rows.push(ReservedSlot {
                slot_id: slot.id,
                event_id: event.id,
                event_name: event.name.clone(),
                number: SlotNumber::new(&slot.numero)?,
                ticket_price: event.ticket_price,
                reserved_at: slot.data_reserva,
            });
        }
        rows.sort_by(|a, b| (&a.event_name, &a.number).cmp(&(&b.event_name, &b.number)));
        Ok(rows)
    }

    async fn slot_status_counts(
        &mut self,
        event_id: EventId,
    ) -> Result<Vec<(SlotStatus, u64)>, RaffleError> {
        let mut counts: Vec<(SlotStatus, u64)> = Vec::new();
        for slot in self.state.slots.iter().filter(|s| s.evento_id == event_id) {
            match counts.iter_mut().find(|(status, _)| *status == slot.status) {
                Some((_, count)) => *count += 1,
                None => counts.push((slot.status, 1)),
            }
        }
        Ok(counts)
    }

    async fn top_bettors(
        &mut self,
        event_id: EventId,
        limit: u64,
    ) -> Result<Vec<TopBettor>, RaffleError> {
        let mut tallies: Vec<TopBettor> = Vec::new();
        for slot in self.state.slots.iter().filter(|s| s.evento_id == event_id) {
            let Some(nickname) = slot.apelido.as_deref() else {
                continue;
            };
            let Some(bettor) = self.state.bettors.iter().find(|b| b.nickname == nickname) else {
                continue;
            };
            match tallies.iter_mut().find(|t| t.nickname == nickname) {
                Some(tally) => tally.slot_count += 1,
                None => tallies.push(TopBettor {
                    nickname: nickname.to_owned(),
                    full_name: bettor.full_name.clone(),
                    slot_count: 1,
                }),
            }
        }
        tallies.sort_by(|a, b| b.slot_count.cmp(&a.slot_count));
        tallies.truncate(limit as usize);
        Ok(tallies)
    }

    async fn count_bettor_slots(&mut self, nickname: &str) -> Result<u64, RaffleError> {
        Ok(self
            .state
            .slots
            .iter()
            .filter(|s| s.apelido.as_deref() == Some(nickname))
            .count() as u64)
    }

    async fn recent_bettor_slots(
        &mut self,
        nickname: &str,
        limit: u64,
    ) -> Result<Vec<SlotHistoryEntry>, RaffleError> {
        let mut rows: Vec<SlotHistoryEntry> = Vec::new();
        for slot in self
            .state
            .slots
            .iter()
            .filter(|s| s.apelido.as_deref() == Some(nickname))
        {
            let Some(event) = self.state.events.iter().find(|e| e.id == slot.evento_id) else {
                continue;
            };
            rows.push(SlotHistoryEntry {
                number: SlotNumber::new(&slot.numero)?,
                event_name: event.name.clone(),
                status: slot.status,
                sold_at: slot.data_venda,
            });
        }
        rows.sort_by(|a, b| b.sold_at.cmp(&a.sold_at));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn insert_fixed(&mut self, fixed: NewFixedAssignment) -> Result<FixedId, RaffleError> {
        let id = self.state.next_id();
        self.state.fixed.push(fixed_assignments::Model {
            id,
            apelido: fixed.nickname,
            numero: fixed.number.as_str().to_owned(),
            grupo: fixed.group,
            status: fixed.status,
            data_registro: Utc::now(),
        });
        Ok(id)
    }

    async fn update_fixed(&mut self, id: FixedId, patch: &FixedPatch) -> Result<u64, RaffleError> {
        let Some(fixed) = self.state.fixed.iter_mut().find(|f| f.id == id) else {
            return Ok(0);
        };
        if let Some(nickname) = &patch.nickname {
            fixed.apelido = nickname.clone();
        }
        if let Some(number) = &patch.number {
            fixed.numero = number.as_str().to_owned();
        }
        if let Some(group) = &patch.group {
            fixed.grupo = Some(group.clone());
        }
        if let Some(status) = patch.status {
            fixed.status = status;
        }
        Ok(1)
    }

    async fn find_fixed(
        &mut self,
        id: FixedId,
    ) -> Result<Option<fixed_assignments::Model>, RaffleError> {
        Ok(self.state.fixed.iter().find(|f| f.id == id).cloned())
    }

    async fn search_fixed(
        &mut self,
        filter: &FixedFilter,
    ) -> Result<Vec<fixed_assignments::Model>, RaffleError> {
        let mut rows: Vec<_> = self
            .state
            .fixed
            .iter()
            .filter(|f| {
                filter
                    .nickname
                    .as_deref()
                    .map_or(true, |n| f.apelido == n)
                    && filter.status.map_or(true, |s| f.status == s)
                    && filter
                        .group
                        .as_deref()
                        .map_or(true, |g| f.grupo.as_deref().is_some_and(|fg| contains_ci(fg, g)))
                    && filter
                        .number
                        .as_ref()
                        .map_or(true, |n| f.numero == n.as_str())
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| (&a.apelido, &a.numero).cmp(&(&b.apelido, &b.numero)));
        Ok(rows)
    }

    async fn batch_update_fixed_status(
        &mut self,
        nickname: Option<&str>,
        group: Option<&str>,
        status: RecordStatus,
    ) -> Result<u64, RaffleError> {
        let mut affected = 0;
        for fixed in self.state.fixed.iter_mut().filter(|f| {
            nickname.map_or(true, |n| f.apelido == n)
                && group.map_or(true, |g| f.grupo.as_deref().is_some_and(|fg| contains_ci(fg, g)))
        }) {
            fixed.status = status;
            affected += 1;
        }
        Ok(affected)
    }

    async fn insert_payment(&mut self, payment: NewPayment) -> Result<PaymentId, RaffleError> {
        let id = self.state.next_id();
        self.state.payments.push(payments::Model {
            id,
            numero: payment.reference,
            apelido: payment.nickname,
            valor: payment.amount,
            metodo: payment.method,
            status: payment.status,
            observacoes: payment.notes,
            data_registro: payment.registered_at,
        });
        Ok(id)
    }

    async fn set_payment_status(
        &mut self,
        id: PaymentId,
        status: PaymentStatus,
    ) -> Result<u64, RaffleError> {
        match self.state.payments.iter_mut().find(|p| p.id == id) {
            Some(payment) => {
                payment.status = status;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn find_payment(
        &mut self,
        id: PaymentId,
    ) -> Result<Option<PaymentDetail>, RaffleError> {
        let Some(payment) = self.state.payments.iter().find(|p| p.id == id).cloned() else {
            return Ok(None);
        };
        let bettor_name = self
            .state
            .bettors
            .iter()
            .find(|b| b.nickname == payment.apelido)
            .map(|b| b.full_name.clone())
            .unwrap_or_default();
        Ok(Some(PaymentDetail {
            payment,
            bettor_name,
        }))
    }

    async fn search_payments(
        &mut self,
        filter: &PaymentFilter,
    ) -> Result<Vec<PaymentDetail>, RaffleError> {
        let mut rows: Vec<PaymentDetail> = Vec::new();
        for payment in self.state.payments.iter().filter(|p| {
            filter.nickname.as_deref().map_or(true, |n| p.apelido == n)
                && filter.status.map_or(true, |s| p.status == s)
                && filter.method.as_deref().map_or(true, |m| p.metodo == m)
                && filter.range.contains(p.data_registro)
        }) {
            let bettor_name = self
                .state
                .bettors
                .iter()
                .find(|b| b.nickname == payment.apelido)
                .map(|b| b.full_name.clone())
                .unwrap_or_default();
            rows.push(PaymentDetail {
                payment: payment.clone(),
                bettor_name,
            });
        }
        rows.sort_by(|a, b| b.payment.data_registro.cmp(&a.payment.data_registro));
        Ok(rows)
    }

    async fn payments_total(&mut self, range: &DateRange) -> Result<f64, RaffleError> {
        Ok(self
            .state
            .payments
            .iter()
            .filter(|p| range.contains(p.data_registro))
            .map(|p| p.valor)
            .sum())
    }

    async fn payments_total_by_bettor(&mut self, nickname: &str) -> Result<f64, RaffleError> {
        Ok(self
            .state
            .payments
            .iter()
            .filter(|p| p.apelido == nickname)
            .map(|p| p.valor)
            .sum())
    }

    async fn insert_ticket(&mut self, ticket: NewTicket) -> Result<TicketId, RaffleError> {
        let id = self.state.next_id();
        self.state.tickets.push(tickets::Model {
            id,
            numero: ticket.number,
            tipo: ticket.kind,
            lote: ticket.batch,
            status: ticket.status,
            observacoes: ticket.notes,
            data_cadastro: Utc::now(),
        });
        Ok(id)
    }

    async fn search_tickets(
        &mut self,
        filter: &TicketFilter,
    ) -> Result<Vec<tickets::Model>, RaffleError> {
        let mut rows: Vec<_> = self
            .state
            .tickets
            .iter()
            .filter(|t| {
                filter
                    .number
                    .as_deref()
                    .map_or(true, |n| contains_ci(&t.numero, n))
                    && filter.kind.as_deref().map_or(true, |k| t.tipo == k)
                    && filter.status.as_deref().map_or(true, |s| t.status == s)
                    && filter
                        .batch
                        .as_deref()
                        .map_or(true, |b| t.lote.as_deref().is_some_and(|tl| contains_ci(tl, b)))
                    && filter.range.contains(t.data_cadastro)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.data_cadastro.cmp(&a.data_cadastro));
        Ok(rows)
    }

    async fn ticket_status_counts(&mut self) -> Result<Vec<(String, u64)>, RaffleError> {
        let mut counts: Vec<(String, u64)> = Vec::new();
        for ticket in &self.state.tickets {
            match counts.iter_mut().find(|(status, _)| *status == ticket.status) {
                Some((_, count)) => *count += 1,
                None => counts.push((ticket.status.clone(), 1)),
            }
        }
        Ok(counts)
    }

    async fn ticket_type_counts(&mut self) -> Result<Vec<(String, u64)>, RaffleError> {
        let mut counts: Vec<(String, u64)> = Vec::new();
        for ticket in &self.state.tickets {
            match counts.iter_mut().find(|(kind, _)| *kind == ticket.tipo) {
                Some((_, count)) => *count += 1,
                None => counts.push((ticket.tipo.clone(), 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(counts)
    }

    async fn find_active_user(
        &mut self,
        username: &str,
    ) -> Result<Option<users::Model>, RaffleError> {
        Ok(self
            .state
            .users
            .iter()
            .find(|u| u.username == username && u.ativo)
            .cloned())
    }

    async fn commit(self: Box<Self>) -> Result<(), RaffleError> {
        *self.shared.lock() = self.state;
        Ok(())
    }

    async fn rollback(self: Box<Self>) {}
}
