//! Error types for calendar operations.

use thiserror::Error;

use crate::event::EventId;

/// Errors that can occur in calendar operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// The requested event does not exist. `op` names the failing operation.
    #[error("{op}: event not found{}", .id.map(|id| format!(" (id {id})")).unwrap_or_default())]
    NotFound {
        op: &'static str,
        id: Option<EventId>,
    },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Decode(String),

    #[error("failed to encode JSON: {0}")]
    Encode(String),
}

impl CalendarError {
    pub fn not_found(op: &'static str, id: EventId) -> Self {
        CalendarError::NotFound { op, id: Some(id) }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CalendarError::NotFound { .. })
    }
}

/// Result type alias for calendar operations.
pub type CalendarResult<T> = Result<T, CalendarError>;
