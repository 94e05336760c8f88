//! Reservation status transitions and their slot side effects.

use domain::{ActorRole, DaySchedule, DomainResult, Reservation, ReservationStatus};

use super::allocator::SlotAllocator;

/// Drives a reservation through its lifecycle.
///
/// Entering a terminal status frees the reservation's slots in the same
/// critical section as the status change.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReservationLifecycle {
    allocator: SlotAllocator,
}

impl ReservationLifecycle {
    pub fn new(allocator: SlotAllocator) -> Self {
        Self { allocator }
    }

    /// Apply a status change; returns the number of slots freed
    pub fn transition(
        &self,
        reservation: &mut Reservation,
        day: &mut DaySchedule,
        next: ReservationStatus,
    ) -> DomainResult<usize> {
        reservation.transition_to(next)?;

        if next.is_terminal() {
            Ok(self.allocator.release(day, reservation))
        } else {
            Ok(0)
        }
    }

    /// Cancel on behalf of `role`; the role picks the cancellation variant
    pub fn cancel(
        &self,
        reservation: &mut Reservation,
        day: &mut DaySchedule,
        role: ActorRole,
    ) -> DomainResult<usize> {
        self.transition(reservation, day, role.cancellation_status())
    }

    /// Mark the session as held
    pub fn complete(&self, reservation: &mut Reservation, day: &mut DaySchedule) -> DomainResult<()> {
        self.transition(reservation, day, ReservationStatus::Completed)
            .map(|_| ())
    }

    /// Record that the counselor filed the session report
    pub fn submit_report(
        &self,
        reservation: &mut Reservation,
        day: &mut DaySchedule,
    ) -> DomainResult<()> {
        self.transition(reservation, day, ReservationStatus::ReportCompleted)
            .map(|_| ())
    }
}
