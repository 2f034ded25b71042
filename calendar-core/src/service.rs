//! Service layer between the HTTP handlers and storage.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::CalendarResult;
use crate::event::{Event, EventId};
use crate::period::Period;
use crate::storage::{EventStorage, InMemoryStorage};

/// Cheap-to-clone handle over an event store. Every call is forwarded as-is.
#[derive(Clone)]
pub struct EventService {
    storage: Arc<dyn EventStorage>,
}

impl EventService {
    pub fn new(storage: Arc<dyn EventStorage>) -> Self {
        EventService { storage }
    }

    /// Service over a fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStorage::new()))
    }

    pub fn add(&self, event: Event) -> CalendarResult<Event> {
        self.storage.add(event)
    }

    pub fn update(&self, event: Event) -> CalendarResult<()> {
        self.storage.update(event)
    }

    pub fn delete(&self, id: EventId) -> CalendarResult<()> {
        self.storage.delete(id)
    }

    pub fn get(&self, id: EventId) -> CalendarResult<Event> {
        self.storage.get(id)
    }

    pub fn list(&self) -> CalendarResult<Vec<Event>> {
        self.storage.list()
    }

    pub fn list_by_day(&self, date: NaiveDate) -> CalendarResult<Vec<Event>> {
        self.storage.list_by_day(date)
    }

    pub fn list_by_week(&self, date: NaiveDate) -> CalendarResult<Vec<Event>> {
        self.storage.list_by_week(date)
    }

    pub fn list_by_month(&self, date: NaiveDate) -> CalendarResult<Vec<Event>> {
        self.storage.list_by_month(date)
    }

    pub fn list_in(&self, period: Period, date: NaiveDate) -> CalendarResult<Vec<Event>> {
        match period {
            Period::Day => self.list_by_day(date),
            Period::Week => self.list_by_week(date),
            Period::Month => self.list_by_month(date),
        }
    }
}
