//! Event CRUD endpoints

use axum::{
    Router,
    body::Bytes,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::Response,
    routing::{get, post},
};
use calendar_core::{CalendarError, EventId};
use tracing::info;

use crate::routes::dto::{
    CreateEventRequest, CreateEventResponse, DeleteEventRequest, Envelope, EventIdResponse,
    EventResponse, EventsResponse, IdQuery, UpdateEventRequest, decode,
};
use crate::routes::{AppError, query, write_json};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create_event", post(create_event))
        .route("/update_event", post(update_event))
        .route("/delete_event", post(delete_event).delete(delete_event))
        .route("/event", get(get_event))
        .route("/events", get(list_events))
}

/// POST /create_event - Add a new event; the store assigns its id
async fn create_event(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    const OP: &str = "handlers.event.add";

    let req: CreateEventRequest = decode(&body).map_err(AppError::at(OP))?;
    let event = req.into_event().map_err(AppError::at(OP))?;
    let stored = state.events.add(event).map_err(AppError::at(OP))?;

    info!(op = OP, id = stored.id, title = %stored.title, "event added");

    Ok(write_json(
        StatusCode::OK,
        &CreateEventResponse {
            envelope: Envelope::ok(),
            title: stored.title,
            id: stored.id,
        },
    ))
}

/// POST /update_event - Replace an existing event
async fn update_event(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    const OP: &str = "handlers.event.update";

    let req: UpdateEventRequest = decode(&body).map_err(AppError::at(OP))?;
    let event = req.into_event().map_err(AppError::at(OP))?;
    let id = event.id;
    state.events.update(event).map_err(AppError::at(OP))?;

    info!(op = OP, id, "event updated");

    Ok(write_json(
        StatusCode::OK,
        &EventIdResponse {
            envelope: Envelope::ok(),
            id,
        },
    ))
}

/// POST|DELETE /delete_event - Remove an event
async fn delete_event(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    const OP: &str = "handlers.event.delete";

    let req: DeleteEventRequest = decode(&body).map_err(AppError::at(OP))?;
    let id = req.into_id().map_err(AppError::at(OP))?;
    state.events.delete(id).map_err(AppError::at(OP))?;

    info!(op = OP, id, "event deleted");

    Ok(write_json(
        StatusCode::OK,
        &EventIdResponse {
            envelope: Envelope::ok(),
            id,
        },
    ))
}

/// GET /event?id=N - Fetch one event
async fn get_event(
    State(state): State<AppState>,
    params: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    const OP: &str = "handlers.event.get";

    let params = query(OP, params)?;
    let id = parse_id(params.id.as_deref()).map_err(AppError::at(OP))?;
    let event = state.events.get(id).map_err(AppError::at(OP))?;

    Ok(write_json(
        StatusCode::OK,
        &EventResponse {
            envelope: Envelope::ok(),
            event,
        },
    ))
}

/// GET /events - List every stored event
async fn list_events(State(state): State<AppState>) -> Result<Response, AppError> {
    const OP: &str = "handlers.event.list";

    let events = state.events.list().map_err(AppError::at(OP))?;
    info!(op = OP, count = events.len(), "events listed");

    Ok(write_json(
        StatusCode::OK,
        &EventsResponse {
            envelope: Envelope::ok(),
            events,
        },
    ))
}

fn parse_id(raw: Option<&str>) -> Result<EventId, CalendarError> {
    let raw = raw
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CalendarError::Validation("missing id parameter".into()))?;

    match raw.parse::<EventId>() {
        Ok(id) if id != 0 => Ok(id),
        _ => Err(CalendarError::Validation("invalid id format".into())),
    }
}
