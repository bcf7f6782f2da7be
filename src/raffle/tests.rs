use std::sync::Arc;

use anyhow::Result;
use chrono::{NaiveDate, TimeZone};

use crate::auth::{authenticate, hash_password, AuthContext, Role};
use crate::db::entity::sea_orm_active_enums::{
    EventStatus, PaymentStatus, RecordStatus, SlotStatus,
};
use crate::db::entity::users;

use super::registry::{RaffleRegistry, RaffleRegistryFactory};
use super::reports::{RaffleReports, RaffleReportsFactory};
use super::service::{RaffleService, RaffleServiceFactory};
use super::storage::{InMemoryRaffleStorage, RaffleStorage};
use super::types::{
    BettorPatch, EventId, EventPatch, FixedFilter, FixedPatch, NewBettor, NewEvent,
    NewFixedAssignment,
    PaymentFilter, RegisterPayment, SlotNumber, POOL_SIZE,
};
use super::RaffleError;

fn admin() -> AuthContext {
    AuthContext {
        user_id: 1,
        username: "admin".into(),
        role: Role::Administrador,
        nickname: None,
    }
}

fn assistant() -> AuthContext {
    AuthContext {
        user_id: 2,
        username: "clerk".into(),
        role: Role::Assistente,
        nickname: None,
    }
}

fn bettor_only() -> AuthContext {
    AuthContext {
        user_id: 3,
        username: "joao".into(),
        role: Role::Apostador,
        nickname: Some("joao".into()),
    }
}

struct Harness {
    storage: Arc<InMemoryRaffleStorage>,
    service: RaffleServiceFactory,
    registry: RaffleRegistryFactory,
    reports: RaffleReportsFactory,
}

impl Harness {
    fn new() -> Self {
        let storage = Arc::new(InMemoryRaffleStorage::new());
        let shared: Arc<dyn RaffleStorage> = storage.clone();
        Self {
            storage,
            service: RaffleServiceFactory::new(shared.clone()),
            registry: RaffleRegistryFactory::new(shared.clone()),
            reports: RaffleReportsFactory::new(shared),
        }
    }

    async fn create_event(&self) -> Result<EventId> {
        let id = self
            .registry
            .create_event(
                &admin(),
                NewEvent {
                    name: "Rifa de Natal".into(),
                    kind: "Milhar".into(),
                    announcement_date: NaiveDate::from_ymd_opt(2024, 12, 20)
                        .ok_or_else(|| anyhow::anyhow!("bad date"))?,
                    ticket_price: 10.0,
                    prize: 1000.0,
                    floor_prize: None,
                    result_number: None,
                    description: None,
                    draw_reference: None,
                    status: EventStatus::Active,
                },
            )
            .await?;
        Ok(id)
    }

    async fn create_bettor(&self, name: &str, nickname: &str) -> Result<()> {
        self.registry
            .create_bettor(
                &assistant(),
                NewBettor {
                    full_name: name.into(),
                    nickname: nickname.into(),
                    area_code: Some("11".into()),
                    phone: Some("987654321".into()),
                    email: None,
                    address: None,
                },
            )
            .await?;
        Ok(())
    }

    async fn slot_status(
        &self,
        event_id: EventId,
        number: &str,
    ) -> Result<Option<(SlotStatus, Option<String>)>> {
        let mut txn = self.storage.begin().await?;
        let slot = txn.load_slot(event_id, &SlotNumber::new(number)?).await?;
        txn.commit().await?;
        Ok(slot.map(|s| (s.status, s.apelido)))
    }
}

fn payment(event_id: EventId, nickname: &str, numbers: &[&str]) -> Result<RegisterPayment> {
    Ok(RegisterPayment {
        reference: format!("PAG-{}", uuid::Uuid::new_v4()),
        nickname: nickname.into(),
        amount: 10.0,
        method: "PIX".into(),
        notes: None,
        event_id,
        numbers: numbers
            .iter()
            .map(|n| SlotNumber::new(n))
            .collect::<Result<_, _>>()?,
    })
}

#[tokio::test]
async fn initialization_creates_the_full_pool() -> Result<()> {
    let harness = Harness::new();
    let event_id = harness.create_event().await?;

    let report = harness.service.initialize_event(&admin(), event_id).await?;
    assert_eq!(report.slots_created, POOL_SIZE);
    assert_eq!(report.fixed_applied, 0);

    let mut txn = harness.storage.begin().await?;
    let slots = txn.list_event_slots(event_id).await?;
    txn.commit().await?;
    assert_eq!(slots.len(), POOL_SIZE as usize);
    assert_eq!(slots.first().map(|s| s.numero.as_str()), Some("000"));
    assert_eq!(slots.last().map(|s| s.numero.as_str()), Some("999"));
    assert!(slots.iter().all(|s| s.status == SlotStatus::Available));
    Ok(())
}

#[tokio::test]
async fn initialization_seeds_active_fixed_assignments() -> Result<()> {
    let harness = Harness::new();
    let event_id = harness.create_event().await?;
    harness.create_bettor("Ana Souza", "ana").await?;
    harness
        .registry
        .create_fixed(
            &assistant(),
            NewFixedAssignment {
                nickname: "ana".into(),
                number: SlotNumber::new("007")?,
                group: Some("familia".into()),
                status: RecordStatus::Active,
            },
        )
        .await?;

    let report = harness.service.initialize_event(&admin(), event_id).await?;
    assert_eq!(report.fixed_applied, 1);
    assert!(report.fixed_failed.is_empty());

    assert_eq!(
        harness.slot_status(event_id, "007").await?,
        Some((SlotStatus::Reserved, Some("ana".into())))
    );

    // The comp is backed by a zero-value placeholder payment.
    let placeholders = harness
        .registry
        .search_payments(PaymentFilter {
            nickname: Some("ana".into()),
            method: Some("FIXO".into()),
            ..Default::default()
        })
        .await?;
    assert_eq!(placeholders.len(), 1);
    assert_eq!(placeholders[0].payment.valor, 0.0);
    Ok(())
}

#[tokio::test]
async fn double_initialization_fails_and_keeps_the_pool() -> Result<()> {
    let harness = Harness::new();
    let event_id = harness.create_event().await?;
    harness.service.initialize_event(&admin(), event_id).await?;
    harness
        .service
        .reserve_number(&assistant(), event_id, SlotNumber::new("042")?, "joao")
        .await?;

    let err = harness
        .service
        .initialize_event(&admin(), event_id)
        .await
        .unwrap_err();
    assert!(matches!(err, RaffleError::AlreadyInitialized(id) if id == event_id));

    // Nothing from the failed attempt leaked through.
    let mut txn = harness.storage.begin().await?;
    let slots = txn.list_event_slots(event_id).await?;
    txn.commit().await?;
    assert_eq!(slots.len(), POOL_SIZE as usize);
    assert_eq!(
        harness.slot_status(event_id, "042").await?,
        Some((SlotStatus::Reserved, Some("joao".into())))
    );
    Ok(())
}

#[tokio::test]
async fn reservation_marks_the_slot_for_the_bettor() -> Result<()> {
    let harness = Harness::new();
    let event_id = harness.create_event().await?;
    harness.service.initialize_event(&admin(), event_id).await?;

    harness
        .service
        .reserve_number(&assistant(), event_id, SlotNumber::new("042")?, "joao")
        .await?;
    assert_eq!(
        harness.slot_status(event_id, "042").await?,
        Some((SlotStatus::Reserved, Some("joao".into())))
    );
    Ok(())
}

#[tokio::test]
async fn re_reservation_moves_the_slot_to_the_new_owner() -> Result<()> {
    let harness = Harness::new();
    let event_id = harness.create_event().await?;
    harness.service.initialize_event(&admin(), event_id).await?;

    let number = SlotNumber::new("042")?;
    harness
        .service
        .reserve_number(&assistant(), event_id, number.clone(), "joao")
        .await?;
    harness
        .service
        .reserve_number(&assistant(), event_id, number, "maria")
        .await?;
    assert_eq!(
        harness.slot_status(event_id, "042").await?,
        Some((SlotStatus::Reserved, Some("maria".into())))
    );
    Ok(())
}

#[tokio::test]
async fn cancellation_returns_the_slot_to_the_pool() -> Result<()> {
    let harness = Harness::new();
    let event_id = harness.create_event().await?;
    harness.service.initialize_event(&admin(), event_id).await?;

    let number = SlotNumber::new("042")?;
    harness
        .service
        .reserve_number(&assistant(), event_id, number.clone(), "joao")
        .await?;
    let cancelled = harness
        .service
        .cancel_reservation(&assistant(), event_id, number)
        .await?;
    assert!(cancelled.is_some());
    assert_eq!(
        harness.slot_status(event_id, "042").await?,
        Some((SlotStatus::Available, None))
    );
    Ok(())
}

#[tokio::test]
async fn cancelling_an_unknown_pair_is_a_no_op() -> Result<()> {
    let harness = Harness::new();
    let event_id = harness.create_event().await?;

    let cancelled = harness
        .service
        .cancel_reservation(&assistant(), event_id, SlotNumber::new("123")?)
        .await?;
    assert!(cancelled.is_none());
    Ok(())
}

#[tokio::test]
async fn payment_over_a_foreign_reservation_writes_nothing() -> Result<()> {
    let harness = Harness::new();
    let event_id = harness.create_event().await?;
    harness.service.initialize_event(&admin(), event_id).await?;
    harness
        .service
        .reserve_number(&assistant(), event_id, SlotNumber::new("042")?, "joao")
        .await?;

    // 043 is still available, so the batch must fail as a whole.
    let err = harness
        .service
        .register_payment(&assistant(), payment(event_id, "joao", &["042", "043"])?)
        .await
        .unwrap_err();
    assert!(matches!(err, RaffleError::SlotUnavailable(ref n) if n == "043"));

    assert_eq!(
        harness.slot_status(event_id, "042").await?,
        Some((SlotStatus::Reserved, Some("joao".into())))
    );
    let payments = harness
        .registry
        .search_payments(PaymentFilter::default())
        .await?;
    assert!(payments.is_empty());
    Ok(())
}

#[tokio::test]
async fn full_cycle_reserve_pay_and_sell() -> Result<()> {
    let harness = Harness::new();
    let event_id = harness.create_event().await?;
    harness.create_bettor("João Pereira", "joao").await?;
    harness.service.initialize_event(&admin(), event_id).await?;
    harness
        .service
        .reserve_number(&assistant(), event_id, SlotNumber::new("042")?, "joao")
        .await?;

    harness
        .service
        .register_payment(&assistant(), payment(event_id, "joao", &["042"])?)
        .await?;

    let mut txn = harness.storage.begin().await?;
    let slot = txn
        .load_slot(event_id, &SlotNumber::new("042")?)
        .await?
        .ok_or_else(|| anyhow::anyhow!("slot missing"))?;
    txn.commit().await?;
    assert_eq!(slot.status, SlotStatus::Sold);
    assert!(slot.data_venda.is_some());

    let payments = harness
        .registry
        .search_payments(PaymentFilter {
            nickname: Some("joao".into()),
            ..Default::default()
        })
        .await?;
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].payment.valor, 10.0);
    assert_eq!(payments[0].payment.metodo, "PIX");
    assert_eq!(payments[0].bettor_name, "João Pereira");
    Ok(())
}

#[tokio::test]
async fn sold_slots_refuse_new_reservations() -> Result<()> {
    let harness = Harness::new();
    let event_id = harness.create_event().await?;
    harness.service.initialize_event(&admin(), event_id).await?;
    let number = SlotNumber::new("042")?;
    harness
        .service
        .reserve_number(&assistant(), event_id, number.clone(), "joao")
        .await?;
    harness
        .service
        .register_payment(&assistant(), payment(event_id, "joao", &["042"])?)
        .await?;

    let err = harness
        .service
        .reserve_number(&assistant(), event_id, number, "maria")
        .await
        .unwrap_err();
    assert!(matches!(err, RaffleError::SlotSold(ref n) if n == "042"));
    assert_eq!(
        harness.slot_status(event_id, "042").await?,
        Some((SlotStatus::Sold, Some("joao".into())))
    );
    Ok(())
}

#[tokio::test]
async fn sold_slots_refuse_cancellation() -> Result<()> {
    let harness = Harness::new();
    let event_id = harness.create_event().await?;
    harness.service.initialize_event(&admin(), event_id).await?;
    let number = SlotNumber::new("042")?;
    harness
        .service
        .reserve_number(&assistant(), event_id, number.clone(), "joao")
        .await?;
    harness
        .service
        .register_payment(&assistant(), payment(event_id, "joao", &["042"])?)
        .await?;

    let err = harness
        .service
        .cancel_reservation(&assistant(), event_id, number)
        .await
        .unwrap_err();
    assert!(matches!(err, RaffleError::SlotSold(ref n) if n == "042"));
    assert_eq!(
        harness.slot_status(event_id, "042").await?,
        Some((SlotStatus::Sold, Some("joao".into())))
    );
    Ok(())
}

#[tokio::test]
async fn bulk_apply_skips_already_pooled_numbers() -> Result<()> {
    let harness = Harness::new();
    let event_id = harness.create_event().await?;
    for (name, nickname, number) in [
        ("Ana Souza", "ana", "007"),
        ("Bob Lima", "bob", "013"),
    ] {
        harness.create_bettor(name, nickname).await?;
        harness
            .registry
            .create_fixed(
                &assistant(),
                NewFixedAssignment {
                    nickname: nickname.into(),
                    number: SlotNumber::new(number)?,
                    group: None,
                    status: RecordStatus::Active,
                },
            )
            .await?;
    }
    // 007 enters the pool ahead of the batch.
    harness
        .service
        .reserve_number(&assistant(), event_id, SlotNumber::new("007")?, "carla")
        .await?;

    let report = harness
        .service
        .apply_fixed_assignments(&admin(), event_id, None, None)
        .await?;
    assert_eq!(report.applied, 1);
    assert_eq!(report.skipped, 1);
    assert!(report.failed.is_empty());
    assert_eq!(
        harness.slot_status(event_id, "013").await?,
        Some((SlotStatus::Reserved, Some("bob".into())))
    );
    Ok(())
}

#[tokio::test]
async fn privileged_workflows_refuse_low_roles() -> Result<()> {
    let harness = Harness::new();
    let event_id = harness.create_event().await?;

    let err = harness
        .service
        .initialize_event(&assistant(), event_id)
        .await
        .unwrap_err();
    assert!(matches!(err, RaffleError::Forbidden(_)));

    let err = harness
        .service
        .reserve_number(&bettor_only(), event_id, SlotNumber::new("042")?, "joao")
        .await
        .unwrap_err();
    assert!(matches!(err, RaffleError::Forbidden(_)));
    Ok(())
}

#[tokio::test]
async fn event_summary_tracks_occupancy_and_takings() -> Result<()> {
    let harness = Harness::new();
    let event_id = harness.create_event().await?;
    harness.create_bettor("João Pereira", "joao").await?;
    harness.service.initialize_event(&admin(), event_id).await?;
    for number in ["001", "002", "003"] {
        harness
            .service
            .reserve_number(&assistant(), event_id, SlotNumber::new(number)?, "joao")
            .await?;
    }
    harness
        .service
        .register_payment(&assistant(), payment(event_id, "joao", &["001", "002"])?)
        .await?;

    let summary = harness.reports.event_summary(event_id).await?;
    assert_eq!(summary.total_slots, POOL_SIZE as u64);
    assert_eq!(summary.sold, 2);
    assert_eq!(summary.reserved, 1);
    assert_eq!(summary.available, POOL_SIZE as u64 - 3);
    assert_eq!(summary.total_raised, 20.0);
    assert_eq!(summary.top_bettors.first().map(|t| t.slot_count), Some(3));
    Ok(())
}

#[tokio::test]
async fn monthly_report_breaks_down_by_method_and_bettor() -> Result<()> {
    let harness = Harness::new();
    let event_id = harness.create_event().await?;
    harness.create_bettor("João Pereira", "joao").await?;
    harness.create_bettor("Maria da Silva", "maria").await?;
    harness.service.initialize_event(&admin(), event_id).await?;
    for (nickname, number) in [("joao", "010"), ("maria", "020")] {
        harness
            .service
            .reserve_number(&assistant(), event_id, SlotNumber::new(number)?, nickname)
            .await?;
        harness
            .service
            .register_payment(&assistant(), payment(event_id, nickname, &[number])?)
            .await?;
    }

    let now = chrono::Utc::now();
    use chrono::Datelike;
    let report = harness
        .reports
        .monthly_report(now.year(), now.month())
        .await?;
    assert_eq!(report.total, 20.0);
    assert_eq!(report.by_method.len(), 1);
    assert_eq!(report.by_method[0].method, "PIX");
    assert_eq!(report.by_method[0].share_pct, 100.0);
    assert_eq!(report.by_bettor.len(), 2);
    assert_eq!(report.by_bettor[0].share_pct, 50.0);
    Ok(())
}

#[tokio::test]
async fn bettor_dashboard_collects_reservations_across_events() -> Result<()> {
    let harness = Harness::new();
    let event_id = harness.create_event().await?;
    harness.create_bettor("João Pereira", "joao").await?;
    harness.service.initialize_event(&admin(), event_id).await?;
    harness
        .service
        .reserve_number(&assistant(), event_id, SlotNumber::new("042")?, "joao")
        .await?;

    let dashboard = harness.reports.bettor_dashboard("joao").await?;
    assert_eq!(dashboard.active_bettors, 1);
    assert_eq!(dashboard.slot_count, 1);
    assert_eq!(dashboard.reserved.len(), 1);
    assert_eq!(dashboard.reserved[0].ticket_price, 10.0);
    assert_eq!(dashboard.reserved[0].event_name, "Rifa de Natal");
    Ok(())
}

#[tokio::test]
async fn authentication_checks_hash_and_activity() -> Result<()> {
    let harness = Harness::new();
    harness.storage.seed_user(users::Model {
        id: 10,
        username: "gerente".into(),
        password_hash: hash_password("segredo"),
        perfil: "Administrador".into(),
        apelido: None,
        ativo: true,
    });
    harness.storage.seed_user(users::Model {
        id: 11,
        username: "antigo".into(),
        password_hash: hash_password("segredo"),
        perfil: "Assistente".into(),
        apelido: None,
        ativo: false,
    });

    let ctx = authenticate(harness.storage.as_ref(), "gerente", "segredo")
        .await?
        .ok_or_else(|| anyhow::anyhow!("expected a login"))?;
    assert_eq!(ctx.role, Role::Administrador);
    assert_eq!(ctx.username, "gerente");

    assert!(authenticate(harness.storage.as_ref(), "gerente", "errado")
        .await?
        .is_none());
    assert!(authenticate(harness.storage.as_ref(), "antigo", "segredo")
        .await?
        .is_none());
    Ok(())
}

#[tokio::test]
async fn ticket_stats_count_by_status_and_type() -> Result<()> {
    use super::types::NewTicket;

    let harness = Harness::new();
    for (number, kind, status) in [
        ("B-001", "Fisico", "Disponível"),
        ("B-002", "Fisico", "Vendido"),
        ("B-003", "Digital", "Disponível"),
    ] {
        harness
            .registry
            .create_ticket(
                &assistant(),
                NewTicket {
                    number: number.into(),
                    kind: kind.into(),
                    batch: Some("L1".into()),
                    status: status.into(),
                    notes: None,
                },
            )
            .await?;
    }

    let available = harness.registry.available_tickets().await?;
    assert_eq!(available.len(), 2);

    let stats = harness.reports.ticket_stats().await?;
    assert_eq!(stats.total, 3);
    let available_share = stats
        .by_status
        .iter()
        .find(|row| row.status == "Disponível")
        .map(|row| row.share_pct);
    assert_eq!(available_share, Some(2.0 / 3.0 * 100.0));
    assert_eq!(stats.by_type.first().map(|(kind, _)| kind.as_str()), Some("Fisico"));
    Ok(())
}

#[tokio::test]
async fn ranged_totals_and_event_counters_add_up() -> Result<()> {
    use super::types::DateRange;

    let harness = Harness::new();
    let event_id = harness.create_event().await?;
    harness.create_bettor("João Pereira", "joao").await?;
    harness.service.initialize_event(&admin(), event_id).await?;
    for number in ["100", "200"] {
        harness
            .service
            .reserve_number(&assistant(), event_id, SlotNumber::new(number)?, "joao")
            .await?;
    }
    harness
        .service
        .register_payment(&assistant(), payment(event_id, "joao", &["100"])?)
        .await?;
    harness
        .service
        .register_payment(&assistant(), payment(event_id, "joao", &["200"])?)
        .await?;

    let total = harness
        .reports
        .payments_total(DateRange { from: None, to: None })
        .await?;
    assert_eq!(total, 20.0);

    let before_everything = DateRange {
        from: None,
        to: chrono::Utc
            .with_ymd_and_hms(2000, 1, 1, 0, 0, 0)
            .single(),
    };
    assert_eq!(harness.reports.payments_total(before_everything).await?, 0.0);

    let counters = harness.reports.event_counters().await?;
    assert_eq!(counters.total, 1);
    assert_eq!(counters.by_status, vec![(EventStatus::Active, 1)]);
    Ok(())
}

#[tokio::test]
async fn duplicate_nicknames_are_rejected() -> Result<()> {
    let harness = Harness::new();
    harness.create_bettor("João Pereira", "joao").await?;
    let err = harness.create_bettor("Outro João", "joao").await;
    assert!(err.is_err());

    let found = harness
        .registry
        .get_bettor("joao")
        .await?
        .ok_or_else(|| anyhow::anyhow!("bettor missing"))?;
    assert_eq!(found.full_name, "João Pereira");
    Ok(())
}

#[tokio::test]
async fn bettor_patch_leaves_absent_fields_alone() -> Result<()> {
    let harness = Harness::new();
    harness.create_bettor("Maria Souza", "maria").await?;

    let affected = harness
        .registry
        .update_bettor(
            &assistant(),
            "maria",
            BettorPatch {
                phone: Some("911111111".into()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(affected, 1);

    let bettor = harness
        .registry
        .get_bettor("maria")
        .await?
        .ok_or_else(|| anyhow::anyhow!("bettor missing"))?;
    assert_eq!(bettor.phone.as_deref(), Some("911111111"));
    assert_eq!(bettor.full_name, "Maria Souza");
    assert_eq!(bettor.area_code.as_deref(), Some("11"));
    assert_eq!(bettor.status, RecordStatus::Active);

    harness
        .registry
        .deactivate_bettor(&assistant(), "maria")
        .await?;
    let bettor = harness
        .registry
        .get_bettor("maria")
        .await?
        .ok_or_else(|| anyhow::anyhow!("bettor missing"))?;
    assert_eq!(bettor.status, RecordStatus::Inactive);
    assert_eq!(bettor.phone.as_deref(), Some("911111111"));
    Ok(())
}

#[tokio::test]
async fn event_patch_leaves_absent_fields_alone() -> Result<()> {
    let harness = Harness::new();
    let event_id = harness.create_event().await?;

    let affected = harness
        .registry
        .update_event(
            &admin(),
            event_id,
            EventPatch {
                ticket_price: Some(12.5),
                result_number: Some("777".into()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(affected, 1);

    let event = harness
        .registry
        .get_event(event_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("event missing"))?;
    assert_eq!(event.ticket_price, 12.5);
    assert_eq!(event.result_number.as_deref(), Some("777"));
    assert_eq!(event.name, "Rifa de Natal");
    assert_eq!(event.prize, 1000.0);
    assert_eq!(event.status, EventStatus::Active);

    harness
        .registry
        .set_event_status(&admin(), event_id, EventStatus::Completed)
        .await?;
    let event = harness
        .registry
        .get_event(event_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("event missing"))?;
    assert_eq!(event.status, EventStatus::Completed);
    assert_eq!(event.ticket_price, 12.5);
    Ok(())
}

#[tokio::test]
async fn fixed_batch_update_honors_owner_and_group_filters() -> Result<()> {
    let harness = Harness::new();
    for (nickname, number, group) in [("ana", "007", "G1"), ("ana", "013", "G2"), ("bob", "021", "G1")]
    {
        harness
            .registry
            .create_fixed(
                &assistant(),
                NewFixedAssignment {
                    nickname: nickname.into(),
                    number: SlotNumber::new(number)?,
                    group: Some(group.into()),
                    status: RecordStatus::Active,
                },
            )
            .await?;
    }

    let affected = harness
        .registry
        .batch_update_fixed_status(&admin(), Some("ana"), Some("G1"), RecordStatus::Inactive)
        .await?;
    assert_eq!(affected, 1);

    let inactive = harness
        .registry
        .search_fixed(FixedFilter {
            status: Some(RecordStatus::Inactive),
            ..Default::default()
        })
        .await?;
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0].apelido, "ana");
    assert_eq!(inactive[0].numero, "007");

    let target = inactive[0].id;
    harness
        .registry
        .update_fixed(
            &assistant(),
            target,
            FixedPatch {
                group: Some("G9".into()),
                ..Default::default()
            },
        )
        .await?;
    let patched = harness
        .registry
        .search_fixed(FixedFilter {
            status: Some(RecordStatus::Inactive),
            ..Default::default()
        })
        .await?;
    assert_eq!(patched[0].grupo.as_deref(), Some("G9"));
    assert_eq!(patched[0].apelido, "ana");
    assert_eq!(patched[0].numero, "007");
    Ok(())
}

#[tokio::test]
async fn payment_status_updates_in_place() -> Result<()> {
    let harness = Harness::new();
    let event_id = harness.create_event().await?;
    harness.create_bettor("João Pereira", "joao").await?;
    harness.service.initialize_event(&admin(), event_id).await?;
    harness
        .service
        .reserve_number(&assistant(), event_id, SlotNumber::new("042")?, "joao")
        .await?;
    let payment_id = harness
        .service
        .register_payment(&assistant(), payment(event_id, "joao", &["042"])?)
        .await?;

    let affected = harness
        .registry
        .set_payment_status(&assistant(), payment_id, PaymentStatus::Cancelled)
        .await?;
    assert_eq!(affected, 1);

    let detail = harness
        .registry
        .get_payment(payment_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("payment missing"))?;
    assert_eq!(detail.payment.status, PaymentStatus::Cancelled);
    assert_eq!(detail.payment.valor, 10.0);
    assert_eq!(detail.bettor_name, "João Pereira");
    Ok(())
}
