//! Domain layer - Core scheduling entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! day schedules and slots, reservations and their lifecycle, and the time
//! helpers the slot allocator relies on.

pub mod actor;
pub mod constants;
pub mod error;
pub mod ids;
pub mod reservation;
pub mod response;
pub mod schedule;
pub mod time;

pub use actor::{Actor, ActorRole};
pub use constants::*;
pub use error::{DomainError, DomainResult, ErrorKind};
pub use ids::{ClientId, DayScheduleId, ProviderId, ReservationId, SlotId};
pub use reservation::{Reservation, ReservationStatus, SessionType, SlotRef};
pub use response::{DayScheduleResponse, ReservationResponse, SlotResponse};
pub use schedule::{CalendarGenerator, DaySchedule, Slot};
pub use time::{compare, TimeSetDiff};
