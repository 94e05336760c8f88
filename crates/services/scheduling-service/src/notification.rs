//! Booking notifications.
//!
//! Events are handed to a [`Notifier`] after the scheduling change has been
//! committed. Delivery is fire-and-forget: a failing notifier is logged by the
//! caller and never undoes the booking or cancellation.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use common::{AppError, AppResult};
use domain::{ClientId, ProviderId, Reservation, ReservationId, ReservationStatus};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Scheduling change worth telling the parties about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SchedulingEvent {
    ReservationCreated {
        reservation_id: ReservationId,
        provider_id: ProviderId,
        client_id: ClientId,
        date: NaiveDate,
        start_times: Vec<NaiveTime>,
    },
    ReservationStatusChanged {
        reservation_id: ReservationId,
        provider_id: ProviderId,
        client_id: ClientId,
        status: ReservationStatus,
    },
}

impl SchedulingEvent {
    pub fn created(reservation: &Reservation) -> Self {
        SchedulingEvent::ReservationCreated {
            reservation_id: reservation.id,
            provider_id: reservation.provider_id,
            client_id: reservation.client_id,
            date: reservation.date,
            start_times: reservation.start_times(),
        }
    }

    pub fn status_changed(reservation: &Reservation) -> Self {
        SchedulingEvent::ReservationStatusChanged {
            reservation_id: reservation.id,
            provider_id: reservation.provider_id,
            client_id: reservation.client_id,
            status: reservation.status,
        }
    }

    pub fn reservation_id(&self) -> ReservationId {
        match self {
            SchedulingEvent::ReservationCreated { reservation_id, .. }
            | SchedulingEvent::ReservationStatusChanged { reservation_id, .. } => *reservation_id,
        }
    }
}

/// Notification collaborator.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait Notifier: Send + Sync {
    /// Hand off an event without waiting for delivery
    fn notify(&self, event: SchedulingEvent) -> AppResult<()>;
}

/// Notifier that queues events for a background worker
pub struct ChannelNotifier {
    sender: mpsc::Sender<SchedulingEvent>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiving end of its queue
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<SchedulingEvent>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, event: SchedulingEvent) -> AppResult<()> {
        self.sender.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => AppError::internal("notification queue is full"),
            mpsc::error::TrySendError::Closed(_) => {
                AppError::internal("notification worker has stopped")
            }
        })
    }
}

/// Notifier used when notifications are switched off
#[derive(Debug, Default)]
pub struct DisabledNotifier;

impl Notifier for DisabledNotifier {
    fn notify(&self, event: SchedulingEvent) -> AppResult<()> {
        debug!(reservation_id = %event.reservation_id(), "Notifications disabled, dropping event");
        Ok(())
    }
}

/// Drain the notification queue until every sender is gone.
///
/// Delivery channels (push, e-mail) are external; events are logged here.
pub fn spawn_notification_worker(mut receiver: mpsc::Receiver<SchedulingEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            deliver(&event);
        }
        debug!("Notification worker stopped");
    })
}

fn deliver(event: &SchedulingEvent) {
    match event {
        SchedulingEvent::ReservationCreated {
            reservation_id,
            provider_id,
            client_id,
            date,
            start_times,
        } => {
            info!(
                %reservation_id,
                %provider_id,
                %client_id,
                %date,
                slots = start_times.len(),
                "Notify: reservation created"
            );
        }
        SchedulingEvent::ReservationStatusChanged {
            reservation_id,
            provider_id,
            client_id,
            status,
        } => {
            info!(
                %reservation_id,
                %provider_id,
                %client_id,
                %status,
                "Notify: reservation status changed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::SessionType;
    use uuid::Uuid;

    fn reservation() -> Reservation {
        Reservation::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            SessionType::Chat,
        )
    }

    #[test]
    fn test_channel_notifier_queues_events() {
        let (notifier, mut receiver) = ChannelNotifier::new(4);
        let r = reservation();

        notifier.notify(SchedulingEvent::created(&r)).unwrap();

        let event = tokio_test::block_on(receiver.recv()).unwrap();
        assert_eq!(event.reservation_id(), r.id);
    }

    #[test]
    fn test_full_queue_reports_error() {
        let (notifier, _receiver) = ChannelNotifier::new(1);
        let r = reservation();

        notifier.notify(SchedulingEvent::created(&r)).unwrap();
        assert!(notifier.notify(SchedulingEvent::status_changed(&r)).is_err());
    }

    #[test]
    fn test_closed_queue_reports_error() {
        let (notifier, receiver) = ChannelNotifier::new(1);
        drop(receiver);

        assert!(notifier
            .notify(SchedulingEvent::created(&reservation()))
            .is_err());
    }

    #[tokio::test]
    async fn test_worker_stops_when_senders_drop() {
        let (notifier, receiver) = ChannelNotifier::new(4);
        let handle = spawn_notification_worker(receiver);

        notifier
            .notify(SchedulingEvent::created(&reservation()))
            .unwrap();
        drop(notifier);

        handle.await.unwrap();
    }
}
