pub mod bootstrap;
pub mod dto;
pub mod error;
pub mod logging;

use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::http::{header, HeaderMap};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{middleware, Extension, Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::auth::{authenticate, AuthContext};
use crate::db::entity::sea_orm_active_enums::SlotStatus;
use crate::export;
use crate::raffle::storage::RaffleStorage;
use crate::raffle::{
    BettorFilter, EventFilter, PaymentFilter, RaffleRegistry, RaffleReports, RaffleService,
    RegisterPayment, SlotNumber,
};
use crate::whatsapp;

use dto::{
    ApplyFixedRequest, ApplyResponse, BettorResponse, CancelRequest, EventCountersResponse,
    EventResponse, EventSummaryResponse, InitResponse, LoginRequest, LoginResponse,
    MonthlyReportResponse,
    PaymentRequest, ReserveRequest, SlotResponse, TicketStatsResponse, WhatsAppLinkResponse,
};
use error::ApiError;

pub struct ServerContext {
    pub storage: Arc<dyn RaffleStorage>,
    pub service: Arc<dyn RaffleService>,
    pub registry: Arc<dyn RaffleRegistry>,
    pub reports: Arc<dyn RaffleReports>,
}

/// Axum facade over the raffle services.
pub struct RaffleServer {
    router: Router,
}

impl RaffleServer {
    pub fn new(context: Arc<ServerContext>) -> Self {
        let router = Router::new()
            .route("/health", get(health))
            .route("/login", post(login))
            .route("/events", get(list_events))
            .route("/events/:event_id", get(get_event))
            .route("/events/:event_id/summary", get(event_summary))
            .route("/events/:event_id/slots", get(list_slots))
            .route("/events/:event_id/slots/export", get(export_slots))
            .route("/events/:event_id/initialize", post(initialize_event))
            .route("/events/:event_id/reserve", post(reserve_number))
            .route("/events/:event_id/cancel", post(cancel_reservation))
            .route("/events/:event_id/payments", post(register_payment))
            .route("/events/:event_id/fixed/apply", post(apply_fixed))
            .route("/bettors", get(search_bettors))
            .route("/bettors/:nickname/whatsapp", get(whatsapp_link))
            .route("/payments/export", get(export_payments))
            .route("/reports/monthly/:year/:month", get(monthly_report))
            .route("/reports/tickets", get(ticket_stats))
            .route("/reports/events", get(event_counters))
            .layer(middleware::from_fn(logging::log_requests))
            .layer(CorsLayer::permissive())
            .layer(Extension(context));

        Self { router }
    }

    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Per-request credential check. The original kept a logged-in session; here
/// every privileged call proves itself, so the server stays stateless.
async fn require_auth(
    context: &ServerContext,
    headers: &HeaderMap,
) -> Result<AuthContext, ApiError> {
    let username = headers
        .get("x-username")
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;
    let password = headers
        .get("x-password")
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;
    authenticate(context.storage.as_ref(), username, password)
        .await?
        .ok_or(ApiError::Unauthorized)
}

async fn health() -> &'static str {
    "ok"
}

async fn login(
    Extension(context): Extension<Arc<ServerContext>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let ctx = authenticate(
        context.storage.as_ref(),
        &request.username,
        &request.password,
    )
    .await?
    .ok_or(ApiError::Unauthorized)?;
    Ok(Json(ctx.into()))
}

#[derive(Debug, Default, Deserialize)]
struct EventQuery {
    text: Option<String>,
    #[serde(default)]
    active: bool,
}

async fn list_events(
    Extension(context): Extension<Arc<ServerContext>>,
    Query(query): Query<EventQuery>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let events = context
        .registry
        .list_events(EventFilter {
            text: query.text,
            only_active: query.active,
        })
        .await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

async fn get_event(
    Extension(context): Extension<Arc<ServerContext>>,
    Path(event_id): Path<i64>,
) -> Result<Json<EventResponse>, ApiError> {
    let event = context
        .registry
        .get_event(event_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(event.into()))
}

async fn event_summary(
    Extension(context): Extension<Arc<ServerContext>>,
    Path(event_id): Path<i64>,
) -> Result<Json<EventSummaryResponse>, ApiError> {
    let summary = context.reports.event_summary(event_id).await?;
    Ok(Json(summary.into()))
}

async fn list_slots(
    Extension(context): Extension<Arc<ServerContext>>,
    Path(event_id): Path<i64>,
) -> Result<Json<Vec<SlotResponse>>, ApiError> {
    let mut txn = context.storage.begin().await.map_err(ApiError::from)?;
    let result = txn.list_event_slots(event_id).await;
    match result {
        Ok(slots) => {
            txn.commit().await?;
            Ok(Json(slots.into_iter().map(Into::into).collect()))
        }
        Err(err) => {
            txn.rollback().await;
            Err(err.into())
        }
    }
}

async fn export_slots(
    Extension(context): Extension<Arc<ServerContext>>,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let mut txn = context.storage.begin().await.map_err(ApiError::from)?;
    let result = txn.list_event_slots(event_id).await;
    let slots = match result {
        Ok(slots) => {
            txn.commit().await?;
            slots
        }
        Err(err) => {
            txn.rollback().await;
            return Err(err.into());
        }
    };
    Ok((
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        export::slots_csv(&slots),
    ))
}

async fn initialize_event(
    Extension(context): Extension<Arc<ServerContext>>,
    Path(event_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<InitResponse>, ApiError> {
    let auth = require_auth(&context, &headers).await?;
    let report = context.service.initialize_event(&auth, event_id).await?;
    Ok(Json(report.into()))
}

async fn reserve_number(
    Extension(context): Extension<Arc<ServerContext>>,
    Path(event_id): Path<i64>,
    headers: HeaderMap,
    Json(request): Json<ReserveRequest>,
) -> Result<Json<SlotResponse>, ApiError> {
    let auth = require_auth(&context, &headers).await?;
    let number = SlotNumber::new(&request.number)?;
    context
        .service
        .reserve_number(&auth, event_id, number.clone(), &request.nickname)
        .await?;

    let mut txn = context.storage.begin().await.map_err(ApiError::from)?;
    let result = txn.load_slot(event_id, &number).await;
    match result {
        Ok(slot) => {
            txn.commit().await?;
            slot.map(|s| Json(s.into())).ok_or(ApiError::NotFound)
        }
        Err(err) => {
            txn.rollback().await;
            Err(err.into())
        }
    }
}

async fn cancel_reservation(
    Extension(context): Extension<Arc<ServerContext>>,
    Path(event_id): Path<i64>,
    headers: HeaderMap,
    Json(request): Json<CancelRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let auth = require_auth(&context, &headers).await?;
    let number = SlotNumber::new(&request.number)?;
    let cancelled = context
        .service
        .cancel_reservation(&auth, event_id, number)
        .await?;
    Ok(Json(serde_json::json!({ "cancelled": cancelled.is_some() })))
}

async fn register_payment(
    Extension(context): Extension<Arc<ServerContext>>,
    Path(event_id): Path<i64>,
    headers: HeaderMap,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let auth = require_auth(&context, &headers).await?;
    let numbers = request
        .numbers
        .iter()
        .map(|n| SlotNumber::new(n))
        .collect::<Result<Vec<_>, _>>()?;
    let payment_id = context
        .service
        .register_payment(
            &auth,
            RegisterPayment {
                reference: request.reference,
                nickname: request.nickname,
                amount: request.amount,
                method: request.method,
                notes: request.notes,
                event_id,
                numbers,
            },
        )
        .await?;
    Ok(Json(serde_json::json!({ "payment_id": payment_id })))
}

async fn apply_fixed(
    Extension(context): Extension<Arc<ServerContext>>,
    Path(event_id): Path<i64>,
    headers: HeaderMap,
    Json(request): Json<ApplyFixedRequest>,
) -> Result<Json<ApplyResponse>, ApiError> {
    let auth = require_auth(&context, &headers).await?;
    let report = context
        .service
        .apply_fixed_assignments(
            &auth,
            event_id,
            request.owner.as_deref(),
            request.group.as_deref(),
        )
        .await?;
    Ok(Json(report.into()))
}

#[derive(Debug, Default, Deserialize)]
struct BettorQuery {
    name: Option<String>,
    nickname: Option<String>,
    #[serde(default)]
    active: bool,
}

async fn search_bettors(
    Extension(context): Extension<Arc<ServerContext>>,
    Query(query): Query<BettorQuery>,
) -> Result<Json<Vec<BettorResponse>>, ApiError> {
    let bettors = context
        .registry
        .search_bettors(BettorFilter {
            name: query.name,
            nickname: query.nickname,
            status: None,
            only_active: query.active,
        })
        .await?;
    Ok(Json(bettors.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Deserialize)]
struct WhatsAppQuery {
    event_id: i64,
    number: String,
}

async fn whatsapp_link(
    Extension(context): Extension<Arc<ServerContext>>,
    Path(nickname): Path<String>,
    Query(query): Query<WhatsAppQuery>,
) -> Result<Json<WhatsAppLinkResponse>, ApiError> {
    let bettor = context
        .registry
        .get_bettor(&nickname)
        .await?
        .ok_or(ApiError::NotFound)?;
    let event = context
        .registry
        .get_event(query.event_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let number = SlotNumber::new(&query.number)?;

    let mut txn = context.storage.begin().await.map_err(ApiError::from)?;
    let result = txn.load_slot(query.event_id, &number).await;
    let status = match result {
        Ok(slot) => {
            txn.commit().await?;
            slot.map(|s| s.status).unwrap_or(SlotStatus::Available)
        }
        Err(err) => {
            txn.rollback().await;
            return Err(err.into());
        }
    };

    let message = whatsapp::slot_status_message(&bettor, &number, &event.name, status);
    let link = whatsapp::deep_link(&bettor, &message)
        .ok_or_else(|| ApiError::bad_request("bettor has no usable phone number"))?;
    Ok(Json(WhatsAppLinkResponse { link, message }))
}

#[derive(Debug, Default, Deserialize)]
struct PaymentQuery {
    nickname: Option<String>,
    method: Option<String>,
}

async fn export_payments(
    Extension(context): Extension<Arc<ServerContext>>,
    Query(query): Query<PaymentQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = context
        .registry
        .search_payments(PaymentFilter {
            nickname: query.nickname,
            method: query.method,
            ..Default::default()
        })
        .await?;
    Ok((
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        export::payments_csv(&payments),
    ))
}

async fn monthly_report(
    Extension(context): Extension<Arc<ServerContext>>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<MonthlyReportResponse>, ApiError> {
    let report = context.reports.monthly_report(year, month).await?;
    Ok(Json(report.into()))
}

async fn ticket_stats(
    Extension(context): Extension<Arc<ServerContext>>,
) -> Result<Json<TicketStatsResponse>, ApiError> {
    let stats = context.reports.ticket_stats().await?;
    Ok(Json(stats.into()))
}

async fn event_counters(
    Extension(context): Extension<Arc<ServerContext>>,
) -> Result<Json<EventCountersResponse>, ApiError> {
    let counters = context.reports.event_counters().await?;
    Ok(Json(counters.into()))
}
