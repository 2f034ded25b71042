pub mod dto;
pub mod events;
pub mod queries;


use std::time::Duration;

use axum::{
    Router,
    body::Body,
    extract::{Query, rejection::QueryRejection},
    http::{HeaderValue, Request, StatusCode, header},
    middleware::map_response,
    response::{IntoResponse, Response},
};
use calendar_core::CalendarError;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{Span, error, info_span, warn};

use crate::routes::dto::Envelope;
use crate::state::AppState;

static REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the full application: all endpoints plus request id, tracing,
/// timeout and CORS middleware.
pub fn app(state: AppState, request_timeout: Duration) -> Router {
    let routes = Router::new()
        .merge(events::router())
        .merge(queries::router())
        .with_state(state);

    with_middleware(routes, request_timeout)
}

fn with_middleware(routes: Router, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(map_response(timeout_envelope))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                request_timeout,
            ))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(cors),
    )
}

/// The timeout layer answers with an empty body; give it the error envelope.
async fn timeout_envelope(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }

    warn!("request timed out");
    write_json(
        StatusCode::REQUEST_TIMEOUT,
        &Envelope::error("request timed out"),
    )
}

fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

/// Serialize `body` as a JSON response.
///
/// Serialization failures are logged and turned into a bare 500; the client
/// never sees the encoder's message.
pub fn write_json<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            bytes,
        )
            .into_response(),
        Err(e) => {
            let err = CalendarError::Encode(e.to_string());
            error!(error = %err, "failed to write response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Unwrap a query string extraction, turning axum's plain-text rejection
/// (e.g. a repeated parameter) into a validation error.
pub fn query<T>(
    op: &'static str,
    extracted: Result<Query<T>, QueryRejection>,
) -> Result<T, AppError> {
    match extracted {
        Ok(Query(value)) => Ok(value),
        Err(rejection) => {
            warn!(op, rejection = %rejection.body_text(), "rejected query string");
            Err(AppError::new(
                op,
                CalendarError::Validation("invalid query parameters".into()),
            ))
        }
    }
}

/// A failed request: the error plus the handler operation it came from.
///
/// Logged and rendered as an error envelope when turned into a response.
#[derive(Debug)]
pub struct AppError {
    op: &'static str,
    err: CalendarError,
}

impl AppError {
    pub fn new(op: &'static str, err: CalendarError) -> Self {
        AppError { op, err }
    }

    /// For `map_err`: tag errors with the handler operation.
    pub fn at(op: &'static str) -> impl Fn(CalendarError) -> AppError {
        move |err| AppError::new(op, err)
    }

    fn status(&self) -> StatusCode {
        match self.err {
            CalendarError::NotFound { .. } => StatusCode::NOT_FOUND,
            CalendarError::Validation(_) | CalendarError::Decode(_) => StatusCode::BAD_REQUEST,
            CalendarError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client. Storage details stay in the logs.
    fn client_message(&self) -> String {
        match &self.err {
            CalendarError::NotFound { id: Some(id), .. } => format!("event {id} not found"),
            CalendarError::NotFound { id: None, .. } => "event not found".to_string(),
            CalendarError::Encode(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(op = self.op, error = %self.err, "request failed");
        } else {
            warn!(op = self.op, error = %self.err, "bad request");
        }

        write_json(status, &Envelope::error(self.client_message()))
    }
}
