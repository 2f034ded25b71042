//! Event storage.
//!
//! `EventStorage` is the seam between the service and whatever holds events.
//! `InMemoryStorage` is the only backend: a map plus an id counter behind one
//! mutex, living as long as the process.

use std::collections::HashMap;

use chrono::NaiveDate;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::{CalendarError, CalendarResult};
use crate::event::{Event, EventId};
use crate::period::Period;

/// Operations every event store provides.
pub trait EventStorage: Send + Sync {
    /// Insert or overwrite an event. An unassigned id (0) is replaced with the
    /// next free id. Returns the stored event.
    fn add(&self, event: Event) -> CalendarResult<Event>;

    /// Replace an existing event, keyed by `event.id`.
    fn update(&self, event: Event) -> CalendarResult<()>;

    fn delete(&self, id: EventId) -> CalendarResult<()>;

    fn get(&self, id: EventId) -> CalendarResult<Event>;

    fn list(&self) -> CalendarResult<Vec<Event>>;

    /// Events whose timestamp falls in the `period` around `anchor`.
    fn list_in(&self, period: Period, anchor: NaiveDate) -> CalendarResult<Vec<Event>>;

    fn list_by_day(&self, date: NaiveDate) -> CalendarResult<Vec<Event>> {
        self.list_in(Period::Day, date)
    }

    fn list_by_week(&self, date: NaiveDate) -> CalendarResult<Vec<Event>> {
        self.list_in(Period::Week, date)
    }

    fn list_by_month(&self, date: NaiveDate) -> CalendarResult<Vec<Event>> {
        self.list_in(Period::Month, date)
    }
}

#[derive(Default)]
struct Inner {
    events: HashMap<EventId, Event>,
    last_id: EventId,
}

impl Inner {
    /// Advance the counter past any id that is already taken by an
    /// explicitly-keyed insert.
    fn next_id(&mut self) -> EventId {
        loop {
            self.last_id += 1;
            if !self.events.contains_key(&self.last_id) {
                return self.last_id;
            }
        }
    }
}

/// In-memory event store.
#[derive(Default)]
pub struct InMemoryStorage {
    inner: Mutex<Inner>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner.lock().events.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().events.is_empty()
    }
}

impl EventStorage for InMemoryStorage {
    fn add(&self, mut event: Event) -> CalendarResult<Event> {
        let mut inner = self.inner.lock();

        if event.is_unassigned() {
            event.id = inner.next_id();
        }

        debug!(id = event.id, title = %event.title, "storing event");
        inner.events.insert(event.id, event.clone());

        Ok(event)
    }

    fn update(&self, event: Event) -> CalendarResult<()> {
        const OP: &str = "storage.update";
        let mut inner = self.inner.lock();

        let slot = inner
            .events
            .get_mut(&event.id)
            .ok_or_else(|| CalendarError::not_found(OP, event.id))?;

        debug!(id = event.id, "replacing event");
        *slot = event;

        Ok(())
    }

    fn delete(&self, id: EventId) -> CalendarResult<()> {
        const OP: &str = "storage.delete";
        let mut inner = self.inner.lock();

        inner
            .events
            .remove(&id)
            .ok_or_else(|| CalendarError::not_found(OP, id))?;

        debug!(id, "deleted event");
        Ok(())
    }

    fn get(&self, id: EventId) -> CalendarResult<Event> {
        const OP: &str = "storage.get";
        let inner = self.inner.lock();

        inner
            .events
            .get(&id)
            .cloned()
            .ok_or_else(|| CalendarError::not_found(OP, id))
    }

    fn list(&self) -> CalendarResult<Vec<Event>> {
        let inner = self.inner.lock();
        Ok(sorted(inner.events.values().cloned().collect()))
    }

    fn list_in(&self, period: Period, anchor: NaiveDate) -> CalendarResult<Vec<Event>> {
        let inner = self.inner.lock();

        let matching = inner
            .events
            .values()
            .filter(|event| period.contains(anchor, &event.date))
            .cloned()
            .collect();

        Ok(sorted(matching))
    }
}

/// Order by timestamp, then id, so responses are stable.
fn sorted(mut events: Vec<Event>) -> Vec<Event> {
    events.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
    events
}
