//! Core types for the calendar API.
//!
//! This crate provides everything the HTTP server needs below the routing layer:
//! - `Event`, the calendar entry stored and returned by the API
//! - `Period` and the date parsing helpers used for day/week/month queries
//! - `EventStorage` and its in-memory implementation
//! - `EventService`, the handle the server passes around

pub mod error;
pub mod event;
pub mod period;
pub mod service;
pub mod storage;

pub use error::{CalendarError, CalendarResult};
pub use event::{Event, EventId};
pub use period::Period;
pub use service::EventService;
pub use storage::{EventStorage, InMemoryStorage};
