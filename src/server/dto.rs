use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::ActiveEnum;
use serde::{Deserialize, Serialize};

use crate::auth::{AuthContext, Role};
use crate::db::entity::{bettors, events, slots};
use crate::raffle::reports::{EventCounters, EventSummary, MonthlyReport, TicketStats};
use crate::raffle::{ApplyReport, InitReport, TopBettor};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub nickname: Option<String>,
}

impl From<AuthContext> for LoginResponse {
    fn from(ctx: AuthContext) -> Self {
        Self {
            user_id: ctx.user_id,
            username: ctx.username,
            role: ctx.role,
            nickname: ctx.nickname,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: i64,
    pub name: String,
    pub kind: String,
    pub announcement_date: NaiveDate,
    pub ticket_price: f64,
    pub prize: f64,
    pub floor_prize: Option<f64>,
    pub result_number: Option<String>,
    pub status: String,
}

impl From<events::Model> for EventResponse {
    fn from(event: events::Model) -> Self {
        Self {
            id: event.id,
            name: event.name,
            kind: event.kind,
            announcement_date: event.announcement_date,
            ticket_price: event.ticket_price,
            prize: event.prize,
            floor_prize: event.floor_prize,
            result_number: event.result_number,
            status: event.status.to_value(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SlotResponse {
    pub number: String,
    pub status: String,
    pub nickname: Option<String>,
    pub reserved_at: Option<DateTime<Utc>>,
    pub sold_at: Option<DateTime<Utc>>,
}

impl From<slots::Model> for SlotResponse {
    fn from(slot: slots::Model) -> Self {
        Self {
            number: slot.numero,
            status: slot.status.to_value(),
            nickname: slot.apelido,
            reserved_at: slot.data_reserva,
            sold_at: slot.data_venda,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BettorResponse {
    pub nickname: String,
    pub full_name: String,
    pub area_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: String,
}

impl From<bettors::Model> for BettorResponse {
    fn from(bettor: bettors::Model) -> Self {
        Self {
            nickname: bettor.nickname,
            full_name: bettor.full_name,
            area_code: bettor.area_code,
            phone: bettor.phone,
            email: bettor.email,
            status: bettor.status.to_value(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReserveRequest {
    pub number: String,
    pub nickname: String,
}

#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub number: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub reference: String,
    pub nickname: String,
    pub amount: f64,
    pub method: String,
    pub notes: Option<String>,
    pub numbers: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApplyFixedRequest {
    pub owner: Option<String>,
    pub group: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InitResponse {
    pub slots_created: u16,
    pub fixed_applied: u32,
    pub fixed_failed: Vec<FailedItem>,
}

#[derive(Debug, Serialize)]
pub struct FailedItem {
    pub number: String,
    pub reason: String,
}

impl From<InitReport> for InitResponse {
    fn from(report: InitReport) -> Self {
        Self {
            slots_created: report.slots_created,
            fixed_applied: report.fixed_applied,
            fixed_failed: report
                .fixed_failed
                .into_iter()
                .map(|(number, reason)| FailedItem { number, reason })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub applied: u32,
    pub skipped: u32,
    pub failed: Vec<FailedItem>,
}

impl From<ApplyReport> for ApplyResponse {
    fn from(report: ApplyReport) -> Self {
        Self {
            applied: report.applied,
            skipped: report.skipped,
            failed: report
                .failed
                .into_iter()
                .map(|(number, reason)| FailedItem { number, reason })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TopBettorResponse {
    pub nickname: String,
    pub full_name: String,
    pub slot_count: u64,
}

impl From<TopBettor> for TopBettorResponse {
    fn from(top: TopBettor) -> Self {
        Self {
            nickname: top.nickname,
            full_name: top.full_name,
            slot_count: top.slot_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventSummaryResponse {
    pub event: EventResponse,
    pub total_slots: u64,
    pub available: u64,
    pub reserved: u64,
    pub sold: u64,
    pub total_raised: f64,
    pub top_bettors: Vec<TopBettorResponse>,
}

impl From<EventSummary> for EventSummaryResponse {
    fn from(summary: EventSummary) -> Self {
        Self {
            event: summary.event.into(),
            total_slots: summary.total_slots,
            available: summary.available,
            reserved: summary.reserved,
            sold: summary.sold,
            total_raised: summary.total_raised,
            top_bettors: summary.top_bettors.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MonthlyReportResponse {
    pub year: i32,
    pub month: u32,
    pub total: f64,
    pub by_day: Vec<DailyRow>,
    pub by_method: Vec<ShareRow>,
    pub by_bettor: Vec<ShareRow>,
}

#[derive(Debug, Serialize)]
pub struct DailyRow {
    pub day: NaiveDate,
    pub payments: u64,
    pub total: f64,
}

#[derive(Debug, Serialize)]
pub struct ShareRow {
    pub label: String,
    pub total: f64,
    pub share_pct: f64,
}

impl From<MonthlyReport> for MonthlyReportResponse {
    fn from(report: MonthlyReport) -> Self {
        Self {
            year: report.year,
            month: report.month,
            total: report.total,
            by_day: report
                .by_day
                .into_iter()
                .map(|row| DailyRow {
                    day: row.day,
                    payments: row.payments,
                    total: row.total,
                })
                .collect(),
            by_method: report
                .by_method
                .into_iter()
                .map(|row| ShareRow {
                    label: row.method,
                    total: row.total,
                    share_pct: row.share_pct,
                })
                .collect(),
            by_bettor: report
                .by_bettor
                .into_iter()
                .map(|row| ShareRow {
                    label: row.bettor_name,
                    total: row.total,
                    share_pct: row.share_pct,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TicketStatsResponse {
    pub total: u64,
    pub by_status: Vec<ShareRow>,
    pub by_type: Vec<CountRow>,
}

#[derive(Debug, Serialize)]
pub struct CountRow {
    pub label: String,
    pub count: u64,
}

impl From<TicketStats> for TicketStatsResponse {
    fn from(stats: TicketStats) -> Self {
        Self {
            total: stats.total,
            by_status: stats
                .by_status
                .into_iter()
                .map(|row| ShareRow {
                    label: row.status,
                    total: row.count as f64,
                    share_pct: row.share_pct,
                })
                .collect(),
            by_type: stats
                .by_type
                .into_iter()
                .map(|(label, count)| CountRow { label, count })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventCountersResponse {
    pub total: u64,
    pub by_status: Vec<CountRow>,
}

impl From<EventCounters> for EventCountersResponse {
    fn from(counters: EventCounters) -> Self {
        Self {
            total: counters.total,
            by_status: counters
                .by_status
                .into_iter()
                .map(|(status, count)| CountRow {
                    label: status.to_value(),
                    count,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WhatsAppLinkResponse {
    pub link: String,
    pub message: String,
}
