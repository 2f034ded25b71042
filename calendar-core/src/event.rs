//! The calendar event record.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Store-assigned event identifier. Zero means "not assigned yet".
pub type EventId = u64;

/// A calendar event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "UUID")]
    pub id: EventId,
    /// Owning user. Not checked against any user registry.
    #[serde(rename = "userUUID")]
    pub owner_id: u64,
    /// When the event happens. The offset is kept so day/week/month
    /// bucketing sees the same calendar date the client sent.
    pub date: DateTime<FixedOffset>,
    pub title: String,
    pub description: String,
}

impl Event {
    /// Create an event without an id; the store assigns one on insert.
    pub fn new(
        owner_id: u64,
        date: DateTime<FixedOffset>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Event {
            id: 0,
            owner_id,
            date,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn is_unassigned(&self) -> bool {
        self.id == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_event_is_unassigned() {
        let date = DateTime::parse_from_rfc3339("2024-03-04T09:30:00+03:00").unwrap();
        let event = Event::new(7, date, "standup", "daily");
        assert!(event.is_unassigned());
        assert_eq!(event.owner_id, 7);
    }

    #[test]
    fn test_json_field_names() {
        let date = DateTime::parse_from_rfc3339("2024-03-04T09:30:00+03:00").unwrap();
        let mut event = Event::new(7, date, "standup", "daily");
        event.id = 3;

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["UUID"], 3);
        assert_eq!(value["userUUID"], 7);
        assert_eq!(value["date"], "2024-03-04T09:30:00+03:00");
        assert_eq!(value["title"], "standup");
        assert_eq!(value["description"], "daily");
    }
}
