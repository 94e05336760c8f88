//! Application state for dependency injection.

use std::sync::Arc;

use scheduling_service_lib::service::SchedulingService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub scheduler: Arc<dyn SchedulingService>,
}

impl AppState {
    /// Create new app state.
    pub fn new(scheduler: Arc<dyn SchedulingService>) -> Self {
        Self { scheduler }
    }
}
