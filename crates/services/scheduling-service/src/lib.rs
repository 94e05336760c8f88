//! Scheduling Service Library
//!
//! This crate owns provider availability calendars and client reservations.
//! It is embedded in the gateway process; all state is held in memory.

pub mod config;
pub mod notification;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use crate::config::SchedulingServiceConfig;
use crate::notification::{spawn_notification_worker, ChannelNotifier, DisabledNotifier, Notifier};
use crate::repository::{AvailabilityCalendar, ReservationStore};
use crate::service::{Scheduler, SchedulingService};

/// Build the scheduling service with in-memory stores.
///
/// When notifications are enabled the delivery worker is spawned on the
/// current Tokio runtime, so this must be called from inside one.
pub fn start_embedded(config: SchedulingServiceConfig) -> Arc<dyn SchedulingService> {
    let notifier: Arc<dyn Notifier> = if config.notifications_enabled {
        let (notifier, receiver) = ChannelNotifier::new(config.notification_buffer);
        spawn_notification_worker(receiver);
        Arc::new(notifier)
    } else {
        Arc::new(DisabledNotifier)
    };

    info!(
        horizon_days = config.horizon_days,
        notifications = config.notifications_enabled,
        "Scheduling service initialized"
    );

    Arc::new(Scheduler::new(
        Arc::new(AvailabilityCalendar::new()),
        Arc::new(ReservationStore::new()),
        notifier,
        config.horizon_days,
    ))
}
