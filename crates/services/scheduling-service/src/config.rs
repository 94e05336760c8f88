//! Scheduling service configuration.

use std::env;

use domain::DEFAULT_HORIZON_DAYS;

/// Default capacity of the notification queue.
const DEFAULT_NOTIFICATION_BUFFER: usize = 1024;

/// Scheduling service configuration.
#[derive(Debug, Clone)]
pub struct SchedulingServiceConfig {
    /// Days generated when a provider is onboarded without an explicit horizon
    pub horizon_days: u32,
    /// Whether booking/cancel events are forwarded to the notification worker
    pub notifications_enabled: bool,
    /// Capacity of the notification queue
    pub notification_buffer: usize,
}

impl SchedulingServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            horizon_days: env::var("SCHEDULING_HORIZON_DAYS")
                .ok()
                .and_then(|d| d.parse().ok())
                .filter(|d| *d > 0)
                .unwrap_or(DEFAULT_HORIZON_DAYS),
            notifications_enabled: env::var("SCHEDULING_NOTIFICATIONS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            notification_buffer: env::var("SCHEDULING_NOTIFICATION_BUFFER")
                .ok()
                .and_then(|b| b.parse().ok())
                .filter(|b| *b > 0)
                .unwrap_or(DEFAULT_NOTIFICATION_BUFFER),
        }
    }
}

impl Default for SchedulingServiceConfig {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            notifications_enabled: true,
            notification_buffer: DEFAULT_NOTIFICATION_BUFFER,
        }
    }
}
