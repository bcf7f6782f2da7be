use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::DatabaseConnection;

use crate::db::entity::events;
use crate::db::entity::sea_orm_active_enums::{EventStatus, SlotStatus};

use super::error::RaffleError;
use super::storage::{InMemoryRaffleStorage, RaffleStorage, SeaOrmRaffleStorage};
use super::types::{
    DateRange, EventId, PaymentFilter, ReservedSlot, SlotHistoryEntry, TopBettor,
};

/// Pool occupancy and takings for one event.
#[derive(Clone, Debug)]
pub struct EventSummary {
    pub event: events::Model,
    pub total_slots: u64,
    pub available: u64,
    pub reserved: u64,
    pub sold: u64,
    /// Sold slot count times the event's ticket price.
    pub total_raised: f64,
    pub top_bettors: Vec<TopBettor>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodTotal {
    pub method: String,
    pub total: f64,
    pub share_pct: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BettorTotal {
    pub nickname: String,
    pub bettor_name: String,
    pub total: f64,
    pub share_pct: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DailyTotal {
    pub day: NaiveDate,
    pub payments: u64,
    pub total: f64,
}

/// One month of payments consolidated by day, method, and bettor.
#[derive(Clone, Debug)]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub total: f64,
    pub by_day: Vec<DailyTotal>,
    pub by_method: Vec<MethodTotal>,
    pub by_bettor: Vec<BettorTotal>,
}

#[derive(Clone, Debug)]
pub struct BettorDashboard {
    pub active_bettors: u64,
    pub slot_count: u64,
    pub total_paid: f64,
    pub reserved: Vec<ReservedSlot>,
    pub recent: Vec<SlotHistoryEntry>,
}

#[derive(Clone, Debug)]
pub struct TicketStatusCount {
    pub status: String,
    pub count: u64,
    pub share_pct: f64,
}

#[derive(Clone, Debug)]
pub struct TicketStats {
    pub total: u64,
    pub by_status: Vec<TicketStatusCount>,
    pub by_type: Vec<(String, u64)>,
}

#[derive(Clone, Debug)]
pub struct EventCounters {
    pub total: u64,
    pub by_status: Vec<(EventStatus, u64)>,
}

/// Read-only aggregations over the pool, payments, and tickets. Row filtering
/// happens in storage; grouping and percentages happen here so both backends
/// share the arithmetic.
#[async_trait]
pub trait RaffleReports: Send + Sync {
    async fn event_summary(&self, event_id: EventId) -> Result<EventSummary, RaffleError>;
    async fn payments_total(&self, range: DateRange) -> Result<f64, RaffleError>;
    async fn monthly_report(&self, year: i32, month: u32) -> Result<MonthlyReport, RaffleError>;
    async fn bettor_dashboard(&self, nickname: &str) -> Result<BettorDashboard, RaffleError>;
    async fn ticket_stats(&self) -> Result<TicketStats, RaffleError>;
    async fn event_counters(&self) -> Result<EventCounters, RaffleError>;
}

#[derive(Clone)]
pub struct RaffleReportsFactory {
    storage: Arc<dyn RaffleStorage>,
}

impl RaffleReportsFactory {
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

const TOP_BETTOR_LIMIT: u64 = 10;
const RECENT_SLOT_LIMIT: u64 = 20;

fn month_range(year: i32, month: u32) -> Result<DateRange, RaffleError> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| RaffleError::validation(format!("invalid month: {year}-{month:02}")))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| RaffleError::validation(format!("invalid month: {year}-{month:02}")))?;
    let start_at = Utc.from_utc_datetime(&start.and_time(chrono::NaiveTime::MIN));
    let end_at = Utc.from_utc_datetime(&next.and_time(chrono::NaiveTime::MIN))
        - chrono::Duration::seconds(1);
    Ok(DateRange {
        from: Some(start_at),
        to: Some(end_at),
    })
}

fn share(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

#[async_trait]
impl RaffleReports for RaffleReportsFactory {
    async fn event_summary(&self, event_id: EventId) -> Result<EventSummary, RaffleError> {
        let mut txn = self.storage.begin().await?;
        let result = async {
            let event = txn
                .load_event(event_id)
                .await?
                .ok_or(RaffleError::NotFound("event"))?;
            let counts = txn.slot_status_counts(event_id).await?;
            let top_bettors = txn.top_bettors(event_id, TOP_BETTOR_LIMIT).await?;

            let count_of = |status: SlotStatus| {
                counts
                    .iter()
                    .find(|(s, _)| *s == status)
                    .map_or(0, |(_, count)| *count)
            };
            let available = count_of(SlotStatus::Available);
            let reserved = count_of(SlotStatus::Reserved);
            let sold = count_of(SlotStatus::Sold);

            Ok(EventSummary {
                total_raised: sold as f64 * event.ticket_price,
                event,
                total_slots: available + reserved + sold,
                available,
                reserved,
                sold,
                top_bettors,
            })
        }
        .await;
        match result {
            Ok(summary) => {
                txn.commit().await?;
                Ok(summary)
            }
            Err(err) => {
                txn.rollback().await;
                Err(err)
            }
        }
    }

    async fn payments_total(&self, range: DateRange) -> Result<f64, RaffleError> {
        let mut txn = self.storage.begin().await?;
        let result = txn.payments_total(&range).await;
        match result {
            Ok(total) => {
                txn.commit().await?;
                Ok(total)
            }
            Err(err) => {
                txn.rollback().await;
                Err(err)
            }
        }
    }

    async fn monthly_report(&self, year: i32, month: u32) -> Result<MonthlyReport, RaffleError> {
        let range = month_range(year, month)?;
        let mut txn = self.storage.begin().await?;
        let result = txn
            .search_payments(&PaymentFilter {
                range,
                ..Default::default()
            })
            .await;
        let rows = match result {
            Ok(rows) => {
                txn.commit().await?;
                rows
            }
            Err(err) => {
                txn.rollback().await;
                return Err(err);
            }
        };

        let total: f64 = rows.iter().map(|r| r.payment.valor).sum();

        let mut days: BTreeMap<NaiveDate, (u64, f64)> = BTreeMap::new();
        let mut methods: BTreeMap<String, f64> = BTreeMap::new();
        let mut bettors: BTreeMap<String, (String, f64)> = BTreeMap::new();
        for row in &rows {
            let day = row.payment.data_registro.date_naive();
            let entry = days.entry(day).or_default();
            entry.0 += 1;
            entry.1 += row.payment.valor;
            *methods.entry(row.payment.metodo.clone()).or_default() += row.payment.valor;
            let bettor = bettors
                .entry(row.payment.apelido.clone())
                .or_insert_with(|| (row.bettor_name.clone(), 0.0));
            bettor.1 += row.payment.valor;
        }

        let by_day = days
            .into_iter()
            .map(|(day, (payments, day_total))| DailyTotal {
                day,
                payments,
                total: day_total,
            })
            .collect();
        let mut by_method: Vec<_> = methods
            .into_iter()
            .map(|(method, method_total)| MethodTotal {
                method,
                total: method_total,
                share_pct: share(method_total, total),
            })
            .collect();
        by_method.sort_by(|a, b| b.total.total_cmp(&a.total));
        let mut by_bettor: Vec<_> = bettors
            .into_iter()
            .map(|(nickname, (bettor_name, bettor_total))| BettorTotal {
                nickname,
                bettor_name,
                total: bettor_total,
                share_pct: share(bettor_total, total),
            })
            .collect();
        by_bettor.sort_by(|a, b| b.total.total_cmp(&a.total));

        Ok(MonthlyReport {
            year,
            month,
            total,
            by_day,
            by_method,
            by_bettor,
        })
    }

    async fn bettor_dashboard(&self, nickname: &str) -> Result<BettorDashboard, RaffleError> {
        let mut txn = self.storage.begin().await?;
        let result = async {
            txn.find_bettor(nickname)
                .await?
                .ok_or(RaffleError::NotFound("bettor"))?;
            let active_bettors = txn.count_active_bettors().await?;
            let slot_count = txn.count_bettor_slots(nickname).await?;
            let total_paid = txn.payments_total_by_bettor(nickname).await?;
            let reserved = txn.list_reserved_by_bettor(nickname).await?;
            let recent = txn.recent_bettor_slots(nickname, RECENT_SLOT_LIMIT).await?;
            Ok(BettorDashboard {
                active_bettors,
                slot_count,
                total_paid,
                reserved,
                recent,
            })
        }
        .await;
        match result {
            Ok(dashboard) => {
                txn.commit().await?;
                Ok(dashboard)
            }
            Err(err) => {
                txn.rollback().await;
                Err(err)
            }
        }
    }

    async fn ticket_stats(&self) -> Result<TicketStats, RaffleError> {
        let mut txn = self.storage.begin().await?;
        let result = async {
            let by_status = txn.ticket_status_counts().await?;
            let by_type = txn.ticket_type_counts().await?;
            Ok((by_status, by_type))
        }
        .await;
        let (by_status, by_type) = match result {
            Ok(value) => {
                txn.commit().await?;
                value
            }
            Err(err) => {
                txn.rollback().await;
                return Err(err);
            }
        };

        let total: u64 = by_status.iter().map(|(_, count)| count).sum();
        let by_status = by_status
            .into_iter()
            .map(|(status, count)| TicketStatusCount {
                status,
                count,
                share_pct: share(count as f64, total as f64),
            })
            .collect();
        Ok(TicketStats {
            total,
            by_status,
            by_type,
        })
    }

    async fn event_counters(&self) -> Result<EventCounters, RaffleError> {
        let mut txn = self.storage.begin().await?;
        let result = txn.count_events_by_status().await;
        let by_status = match result {
            Ok(rows) => {
                txn.commit().await?;
                rows
            }
            Err(err) => {
                txn.rollback().await;
                return Err(err);
            }
        };
        Ok(EventCounters {
            total: by_status.iter().map(|(_, count)| count).sum(),
            by_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_range_covers_december_rollover() -> anyhow::Result<()> {
        let range = month_range(2024, 12)?;
        let from = range.from.ok_or_else(|| anyhow::anyhow!("missing from"))?;
        let to = range.to.ok_or_else(|| anyhow::anyhow!("missing to"))?;
        assert_eq!(from.date_naive(), NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(to.date_naive(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        Ok(())
    }

    #[test]
    fn month_range_rejects_month_zero() {
        assert!(month_range(2024, 0).is_err());
    }

    #[test]
    fn share_of_zero_total_is_zero() {
        assert_eq!(share(10.0, 0.0), 0.0);
    }
}
