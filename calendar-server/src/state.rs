use calendar_core::EventService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub events: EventService,
}

impl AppState {
    pub fn new(events: EventService) -> Self {
        AppState { events }
    }
}
