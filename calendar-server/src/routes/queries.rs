//! Day, week and month listings

use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::Response,
    routing::get,
};
use calendar_core::period::parse_query_date;
use calendar_core::{CalendarError, Period};
use tracing::info;

use crate::routes::dto::{DateQuery, Envelope, EventsResponse};
use crate::routes::{AppError, query, write_json};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events_for_day", get(events_for_day))
        .route("/events_for_week", get(events_for_week))
        .route("/events_for_month", get(events_for_month))
}

/// GET /events_for_day?date=YYYY-MM-DD
async fn events_for_day(
    State(state): State<AppState>,
    params: Result<Query<DateQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    events_for(&state, Period::Day, params, "handlers.event.get_for_day")
}

/// GET /events_for_week?date=YYYY-MM-DD - ISO week containing the date
async fn events_for_week(
    State(state): State<AppState>,
    params: Result<Query<DateQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    events_for(&state, Period::Week, params, "handlers.event.get_for_week")
}

/// GET /events_for_month?date=YYYY-MM-DD
async fn events_for_month(
    State(state): State<AppState>,
    params: Result<Query<DateQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    events_for(&state, Period::Month, params, "handlers.event.get_for_month")
}

fn events_for(
    state: &AppState,
    period: Period,
    params: Result<Query<DateQuery>, QueryRejection>,
    op: &'static str,
) -> Result<Response, AppError> {
    let raw = query(op, params)?
        .date
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::new(op, CalendarError::Validation("missing date parameter".into())))?;
    let date = parse_query_date(&raw).map_err(AppError::at(op))?;

    let events = state.events.list_in(period, date).map_err(AppError::at(op))?;

    info!(op, period = period.name(), %date, count = events.len(), "events listed");

    Ok(write_json(
        StatusCode::OK,
        &EventsResponse {
            envelope: Envelope::ok(),
            events,
        },
    ))
}
