//! Request and response bodies.
//!
//! Request fields are all optional at the serde level so a missing field is
//! reported as a validation error (`field title is a required field`) rather
//! than a decode error.

use calendar_core::period::parse_timestamp;
use calendar_core::{CalendarError, CalendarResult, Event, EventId};
use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

// =============================================================================
// Envelope
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    Error,
}

/// Status block embedded in every JSON response.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn ok() -> Self {
        Envelope {
            status: Status::Ok,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Envelope {
            status: Status::Error,
            error: Some(message.into()),
        }
    }
}

// =============================================================================
// Decoding and validation
// =============================================================================

/// Decode a JSON request body.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> CalendarResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(CalendarError::Decode("request body is empty".into()));
    }

    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "request body rejected");
        CalendarError::Decode("failed to decode request body".into())
    })
}

/// Collects per-field problems so a request reports all of them at once.
#[derive(Default)]
struct FieldErrors(Vec<String>);

impl FieldErrors {
    fn required(&mut self, field: &str) {
        self.0.push(format!("field {field} is a required field"));
    }

    fn text(&mut self, field: &str, value: Option<String>) -> String {
        match value {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                self.required(field);
                String::new()
            }
        }
    }

    fn id(&mut self, field: &str, value: Option<EventId>) -> EventId {
        match value {
            Some(v) if v != 0 => v,
            _ => {
                self.required(field);
                0
            }
        }
    }

    fn timestamp(&mut self, field: &str, value: Option<String>) -> Option<DateTime<FixedOffset>> {
        let raw = match value {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                self.required(field);
                return None;
            }
        };

        match parse_timestamp(raw.trim()) {
            Ok(ts) => Some(ts),
            Err(_) => {
                self.0.push(format!(
                    "field {field} is not a valid RFC 3339 timestamp or YYYY-MM-DD date"
                ));
                None
            }
        }
    }

    fn finish(self) -> CalendarResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(CalendarError::Validation(self.0.join(", ")))
        }
    }
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CreateEventRequest {
    pub date: Option<String>,
    pub title: Option<String>,
    pub desc: Option<String>,
    #[serde(rename = "userUUID")]
    pub owner_id: Option<u64>,
}

impl CreateEventRequest {
    /// Check required fields and build an unassigned event.
    pub fn into_event(self) -> CalendarResult<Event> {
        let mut errors = FieldErrors::default();
        let date = errors.timestamp("date", self.date);
        let title = errors.text("title", self.title);
        let desc = errors.text("desc", self.desc);
        errors.finish()?;

        let date = date.ok_or_else(|| CalendarError::Validation("field date is a required field".into()))?;
        Ok(Event::new(self.owner_id.unwrap_or_default(), date, title, desc))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateEventRequest {
    #[serde(rename = "UUID")]
    pub id: Option<EventId>,
    #[serde(rename = "userUUID")]
    pub owner_id: Option<u64>,
    pub date: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl UpdateEventRequest {
    /// Check required fields and build the replacement event.
    pub fn into_event(self) -> CalendarResult<Event> {
        let mut errors = FieldErrors::default();
        let id = errors.id("UUID", self.id);
        let owner_id = errors.id("userUUID", self.owner_id);
        let date = errors.timestamp("date", self.date);
        let title = errors.text("title", self.title);
        let description = errors.text("description", self.description);
        errors.finish()?;

        let date = date.ok_or_else(|| CalendarError::Validation("field date is a required field".into()))?;
        Ok(Event {
            id,
            owner_id,
            date,
            title,
            description,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteEventRequest {
    #[serde(rename = "UUID")]
    pub id: Option<EventId>,
}

impl DeleteEventRequest {
    pub fn into_id(self) -> CalendarResult<EventId> {
        let mut errors = FieldErrors::default();
        let id = errors.id("UUID", self.id);
        errors.finish()?;
        Ok(id)
    }
}

/// `?date=YYYY-MM-DD` for the bucketed queries.
#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

/// `?id=N` for single-event lookup.
#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Serialize)]
pub struct CreateEventResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
    pub title: String,
    #[serde(rename = "UUID")]
    pub id: EventId,
}

/// Body for update and delete: the id that was touched.
#[derive(Debug, Serialize)]
pub struct EventIdResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(rename = "UUID")]
    pub id: EventId,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(rename = "Event")]
    pub event: Event,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(rename = "Events")]
    pub events: Vec<Event>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_empty_body() {
        let err = decode::<CreateEventRequest>(b"").unwrap_err();
        assert_eq!(err, CalendarError::Decode("request body is empty".into()));

        let err = decode::<CreateEventRequest>(b"  \n").unwrap_err();
        assert_eq!(err, CalendarError::Decode("request body is empty".into()));
    }

    #[test]
    fn test_decode_malformed_body() {
        let err = decode::<CreateEventRequest>(b"{\"title\": ").unwrap_err();
        assert_eq!(
            err,
            CalendarError::Decode("failed to decode request body".into())
        );
    }

    #[test]
    fn test_create_reports_every_missing_field() {
        let err = CreateEventRequest::default().into_event().unwrap_err();
        assert_eq!(
            err,
            CalendarError::Validation(
                "field date is a required field, field title is a required field, \
                 field desc is a required field"
                    .into()
            )
        );
    }

    #[test]
    fn test_create_rejects_blank_strings() {
        let req = CreateEventRequest {
            date: Some("2024-03-04".into()),
            title: Some("   ".into()),
            desc: Some("daily".into()),
            owner_id: None,
        };
        let err = req.into_event().unwrap_err();
        assert_eq!(
            err,
            CalendarError::Validation("field title is a required field".into())
        );
    }

    #[test]
    fn test_create_builds_unassigned_event() {
        let req: CreateEventRequest = decode(
            br#"{"date": "2024-03-04T09:00:00+03:00", "title": "standup", "desc": "daily"}"#,
        )
        .unwrap();

        let event = req.into_event().unwrap();

        assert!(event.is_unassigned());
        assert_eq!(event.owner_id, 0);
        assert_eq!(event.title, "standup");
        assert_eq!(event.description, "daily");
        assert_eq!(event.date.to_rfc3339(), "2024-03-04T09:00:00+03:00");
    }

    #[test]
    fn test_create_rejects_bad_date() {
        let req = CreateEventRequest {
            date: Some("next tuesday".into()),
            title: Some("standup".into()),
            desc: Some("daily".into()),
            owner_id: None,
        };
        let err = req.into_event().unwrap_err();
        assert_eq!(
            err,
            CalendarError::Validation(
                "field date is not a valid RFC 3339 timestamp or YYYY-MM-DD date".into()
            )
        );
    }

    #[test]
    fn test_update_requires_non_zero_ids() {
        let req: UpdateEventRequest = decode(
            br#"{"UUID": 0, "date": "2024-03-04", "title": "t", "description": "d"}"#,
        )
        .unwrap();

        let err = req.into_event().unwrap_err();

        assert_eq!(
            err,
            CalendarError::Validation(
                "field UUID is a required field, field userUUID is a required field".into()
            )
        );
    }

    #[test]
    fn test_update_builds_full_event() {
        let req: UpdateEventRequest = decode(
            br#"{"UUID": 4, "userUUID": 9, "date": "2024-03-04T10:00:00Z",
                 "title": "t", "description": "d"}"#,
        )
        .unwrap();

        let event = req.into_event().unwrap();

        assert_eq!(event.id, 4);
        assert_eq!(event.owner_id, 9);
        assert_eq!(event.description, "d");
    }

    #[test]
    fn test_delete_requires_id() {
        assert!(DeleteEventRequest::default().into_id().is_err());
        assert_eq!(DeleteEventRequest { id: Some(3) }.into_id().unwrap(), 3);
    }

    #[test]
    fn test_envelope_shapes() {
        let ok = serde_json::to_value(Envelope::ok()).unwrap();
        assert_eq!(ok, serde_json::json!({"status": "OK"}));

        let err = serde_json::to_value(Envelope::error("boom")).unwrap();
        assert_eq!(err, serde_json::json!({"status": "Error", "error": "boom"}));
    }

    #[test]
    fn test_create_response_flattens_envelope() {
        let body = CreateEventResponse {
            envelope: Envelope::ok(),
            title: "standup".into(),
            id: 1,
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({"status": "OK", "title": "standup", "UUID": 1})
        );
    }
}
