//! Response shapes safe to hand to callers.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reservation::{Reservation, ReservationStatus, SessionType};
use crate::schedule::{DaySchedule, Slot};

/// Slot as seen by callers (occupant identity is not exposed)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SlotResponse {
    /// Slot start time
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "09:00:00"))]
    pub start_time: NaiveTime,
    /// Slot end time
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "09:50:00"))]
    pub end_time: NaiveTime,
    /// Whether the slot can still be booked
    pub available: bool,
}

impl From<&Slot> for SlotResponse {
    fn from(slot: &Slot) -> Self {
        Self {
            start_time: slot.start_time,
            end_time: slot.end_time,
            available: !slot.is_occupied(),
        }
    }
}

/// Availability of a provider on one date
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DayScheduleResponse {
    /// Provider identifier
    pub provider_id: Uuid,
    /// Calendar date
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2024-06-01"))]
    pub date: NaiveDate,
    /// Slots in chronological order
    pub slots: Vec<SlotResponse>,
}

impl From<&DaySchedule> for DayScheduleResponse {
    fn from(day: &DaySchedule) -> Self {
        Self {
            provider_id: day.provider_id,
            date: day.date,
            slots: day.slots.values().map(SlotResponse::from).collect(),
        }
    }
}

impl From<DaySchedule> for DayScheduleResponse {
    fn from(day: DaySchedule) -> Self {
        Self::from(&day)
    }
}

/// Reservation as returned to clients and counselors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReservationResponse {
    /// Reservation identifier
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub id: Uuid,
    /// Counselor providing the session
    pub provider_id: Uuid,
    /// Client who booked the session
    pub client_id: Uuid,
    /// Session date
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2024-06-01"))]
    pub date: NaiveDate,
    /// Granted slot start times
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<String>))]
    pub start_times: Vec<NaiveTime>,
    /// Session type
    pub session_type: SessionType,
    /// Current status
    pub status: ReservationStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last status change
    pub updated_at: DateTime<Utc>,
}

impl From<&Reservation> for ReservationResponse {
    fn from(reservation: &Reservation) -> Self {
        Self {
            id: reservation.id.as_uuid(),
            provider_id: reservation.provider_id,
            client_id: reservation.client_id,
            date: reservation.date,
            start_times: reservation.start_times(),
            session_type: reservation.session_type,
            status: reservation.status,
            created_at: reservation.created_at,
            updated_at: reservation.updated_at,
        }
    }
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        Self::from(&reservation)
    }
}
