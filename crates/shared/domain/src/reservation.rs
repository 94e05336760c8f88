//! Reservation entity and its status lifecycle.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::ids::{ClientId, ProviderId, ReservationId, SlotId};

/// Reservation status.
///
/// ```text
/// PENDING ──> CANCELLED_BY_CLIENT      (terminal)
///         ├─> CANCELLED_BY_COUNSELOR   (terminal)
///         └─> COMPLETED ──> REPORT_COMPLETED (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum ReservationStatus {
    Pending,
    CancelledByClient,
    CancelledByCounselor,
    Completed,
    ReportCompleted,
}

impl ReservationStatus {
    /// No transition leaves a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::CancelledByClient
                | ReservationStatus::CancelledByCounselor
                | ReservationStatus::ReportCompleted
        )
    }

    /// Check whether the lifecycle allows moving to `next`
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;

        matches!(
            (self, next),
            (Pending, CancelledByClient)
                | (Pending, CancelledByCounselor)
                | (Pending, Completed)
                | (Completed, ReportCompleted)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "PENDING",
            ReservationStatus::CancelledByClient => "CANCELLED_BY_CLIENT",
            ReservationStatus::CancelledByCounselor => "CANCELLED_BY_COUNSELOR",
            ReservationStatus::Completed => "COMPLETED",
            ReservationStatus::ReportCompleted => "REPORT_COMPLETED",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of counseling session being booked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum SessionType {
    Chat,
    Voice,
    Video,
}

/// Back-reference to a slot granted to a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRef {
    pub slot_id: SlotId,
    pub start_time: NaiveTime,
}

/// A client's claim over one or more contiguous slots of a provider's day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub provider_id: ProviderId,
    pub client_id: ClientId,
    pub date: NaiveDate,
    pub session_type: SessionType,
    pub status: ReservationStatus,
    /// Granted slots, chronological once the booking is committed
    pub slots: Vec<SlotRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Create a pending reservation without any slots
    pub fn new(
        provider_id: ProviderId,
        client_id: ClientId,
        date: NaiveDate,
        session_type: SessionType,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ReservationId::new(),
            provider_id,
            client_id,
            date,
            session_type,
            status: ReservationStatus::Pending,
            slots: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `next`, enforcing the lifecycle
    pub fn transition_to(&mut self, next: ReservationStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Start times of the granted slots
    pub fn start_times(&self) -> Vec<NaiveTime> {
        self.slots.iter().map(|slot| slot.start_time).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use ReservationStatus::*;

    const ALL: [ReservationStatus; 5] = [
        Pending,
        CancelledByClient,
        CancelledByCounselor,
        Completed,
        ReportCompleted,
    ];

    fn reservation() -> Reservation {
        Reservation::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            SessionType::Video,
        )
    }

    #[test]
    fn test_new_reservation_is_pending() {
        let r = reservation();
        assert_eq!(r.status, Pending);
        assert!(r.slots.is_empty());
    }

    #[test]
    fn test_allowed_transitions() {
        for next in [CancelledByClient, CancelledByCounselor, Completed] {
            let mut r = reservation();
            assert!(r.transition_to(next).is_ok());
            assert_eq!(r.status, next);
        }

        let mut r = reservation();
        r.transition_to(Completed).unwrap();
        r.transition_to(ReportCompleted).unwrap();
        assert_eq!(r.status, ReportCompleted);
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for terminal in ALL.iter().filter(|s| s.is_terminal()) {
            for next in ALL {
                assert!(
                    !terminal.can_transition_to(next),
                    "{} -> {} must be rejected",
                    terminal,
                    next
                );
            }
        }
    }

    #[test]
    fn test_completed_is_not_terminal() {
        assert!(!Completed.is_terminal());
        assert!(!Completed.can_transition_to(CancelledByClient));
        assert!(Completed.can_transition_to(ReportCompleted));
    }

    #[test]
    fn test_rejected_transition_keeps_status() {
        let mut r = reservation();
        r.transition_to(CancelledByClient).unwrap();

        let err = r.transition_to(CancelledByCounselor).unwrap_err();

        assert_eq!(
            err,
            DomainError::InvalidTransition {
                from: CancelledByClient,
                to: CancelledByCounselor,
            }
        );
        assert_eq!(r.status, CancelledByClient);
    }

    #[test]
    fn test_status_serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&CancelledByCounselor).unwrap();
        assert_eq!(json, "\"CANCELLED_BY_COUNSELOR\"");
    }
}
