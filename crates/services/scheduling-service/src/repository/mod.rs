//! Repository layer for calendar and reservation storage.

mod calendar_store;
mod reservation_store;

pub use calendar_store::{AvailabilityCalendar, CalendarRepository, DayHandle, PutMode};
pub use reservation_store::{ReservationRepository, ReservationStore};

#[cfg(any(test, feature = "test-utils"))]
pub use calendar_store::MockCalendarRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use reservation_store::MockReservationRepository;
