//! Domain-level errors.
//!
//! These errors represent scheduling rule violations. They are independent of
//! infrastructure concerns (HTTP, storage) and carry a stable code that callers
//! can match on.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::reservation::ReservationStatus;

/// Broad category of a domain error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
    Denied,
    Internal,
}

/// Domain-specific errors for scheduling rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Provider has no schedule for the date
    #[error("No schedule available on {0}")]
    UnavailableDate(NaiveDate),

    /// Day schedule has no slot starting at the time
    #[error("No slot available at {0}")]
    UnavailableTime(NaiveTime),

    /// Reservation does not exist
    #[error("Reservation not found")]
    ReservationNotFound,

    /// Slot is held by another reservation
    #[error("Time slot {0} is already reserved")]
    SlotOccupied(NaiveTime),

    /// Provider already has a schedule for the date
    #[error("Schedule for {0} already exists")]
    ScheduleExists(NaiveDate),

    /// Requested slots leave an hour gap
    #[error("Requested times are not contiguous")]
    DiscontinuousTime,

    /// Requested time list is empty, duplicated or off the hour grid
    #[error("Invalid time list: {0}")]
    InvalidTimeList(String),

    /// Generic input validation failure
    #[error("Validation error: {0}")]
    Validation(String),

    /// Removing a slot that holds an active reservation
    #[error("Time slot {0} holds an active reservation")]
    SlotDeletionDenied(NaiveTime),

    /// Status change not allowed by the reservation lifecycle
    #[error("Cannot change reservation status from {from} to {to}")]
    InvalidTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },

    /// Actor is not permitted to perform the operation
    #[error("Forbidden")]
    Forbidden,

    /// Internal domain error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    /// Create an invalid time list error
    pub fn invalid_times(msg: impl Into<String>) -> Self {
        DomainError::InvalidTimeList(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }

    /// Stable error code exposed to callers
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::UnavailableDate(_) => "UNAVAILABLE_DATE",
            DomainError::UnavailableTime(_) => "UNAVAILABLE_TIME",
            DomainError::ReservationNotFound => "RESERVATION_NOT_FOUND",
            DomainError::SlotOccupied(_) => "RESERVATION_TIMESLOT_OCCUPIED",
            DomainError::ScheduleExists(_) => "DAY_SCHEDULE_EXISTS",
            DomainError::DiscontinuousTime => "DISCONTINUOUS_TIME",
            DomainError::InvalidTimeList(_) => "INVALID_TIME_LIST",
            DomainError::Validation(_) => "VALIDATION_ERROR",
            DomainError::SlotDeletionDenied(_) => "TIMESLOT_DELETION_DENIED",
            DomainError::InvalidTransition { .. } => "INVALID_STATUS_TRANSITION",
            DomainError::Forbidden => "FORBIDDEN",
            DomainError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Category used to map the error onto transport status codes
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::UnavailableDate(_)
            | DomainError::UnavailableTime(_)
            | DomainError::ReservationNotFound => ErrorKind::NotFound,
            DomainError::SlotOccupied(_) | DomainError::ScheduleExists(_) => ErrorKind::Conflict,
            DomainError::DiscontinuousTime
            | DomainError::InvalidTimeList(_)
            | DomainError::Validation(_) => ErrorKind::Validation,
            DomainError::SlotDeletionDenied(_)
            | DomainError::InvalidTransition { .. }
            | DomainError::Forbidden => ErrorKind::Denied,
            DomainError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_kinds() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();

        let occupied = DomainError::SlotOccupied(nine);
        assert_eq!(occupied.code(), "RESERVATION_TIMESLOT_OCCUPIED");
        assert_eq!(occupied.kind(), ErrorKind::Conflict);

        let denied = DomainError::SlotDeletionDenied(nine);
        assert_eq!(denied.code(), "TIMESLOT_DELETION_DENIED");
        assert_eq!(denied.kind(), ErrorKind::Denied);

        assert_eq!(DomainError::DiscontinuousTime.kind(), ErrorKind::Validation);
        assert_eq!(DomainError::UnavailableTime(nine).kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_transition_message() {
        let err = DomainError::InvalidTransition {
            from: ReservationStatus::CancelledByClient,
            to: ReservationStatus::Completed,
        };
        assert_eq!(
            err.to_string(),
            "Cannot change reservation status from CANCELLED_BY_CLIENT to COMPLETED"
        );
    }
}
