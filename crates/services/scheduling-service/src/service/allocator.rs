//! Slot allocation against a locked day schedule.
//!
//! Callers must hold the day's lock for the whole call; the allocator itself
//! only enforces occupancy and contiguity.

use chrono::NaiveTime;

use domain::time::{is_contiguous, validate_requested_times};
use domain::{DaySchedule, DomainError, DomainResult, Reservation, ReservationId, SlotRef};

/// Assigns and clears slot occupants.
#[derive(Debug, Default, Clone, Copy)]
pub struct SlotAllocator;

impl SlotAllocator {
    pub fn new() -> Self {
        Self
    }

    /// Grant `requested` start times to `reservation`.
    ///
    /// Slots are claimed in caller order. On any failure every slot claimed by
    /// this call is released again, so either all slots are granted or none.
    pub fn reserve(
        &self,
        day: &mut DaySchedule,
        requested: &[NaiveTime],
        reservation: &mut Reservation,
    ) -> DomainResult<()> {
        if day.provider_id != reservation.provider_id || day.date != reservation.date {
            return Err(DomainError::internal("reservation does not belong to this day"));
        }
        if !reservation.slots.is_empty() {
            return Err(DomainError::internal("reservation already holds slots"));
        }
        validate_requested_times(requested)?;

        let mut granted = Vec::with_capacity(requested.len());
        for &start in requested {
            match claim(day, start, reservation.id) {
                Ok(slot_ref) => granted.push(slot_ref),
                Err(err) => {
                    rollback(day, &granted, reservation.id);
                    return Err(err);
                }
            }
        }

        let mut sorted = requested.to_vec();
        sorted.sort_unstable();
        if !is_contiguous(&sorted) {
            rollback(day, &granted, reservation.id);
            return Err(DomainError::DiscontinuousTime);
        }

        granted.sort_by_key(|slot_ref| slot_ref.start_time);
        reservation.slots = granted;
        Ok(())
    }

    /// Clear the occupant of every slot the reservation holds.
    ///
    /// Slots that were removed or now belong to someone else are skipped.
    /// Returns the number of slots freed.
    pub fn release(&self, day: &mut DaySchedule, reservation: &Reservation) -> usize {
        let mut freed = 0;
        for slot_ref in &reservation.slots {
            if let Some(slot) = day.slot_mut(slot_ref.start_time) {
                if slot.occupant == Some(reservation.id) {
                    slot.occupant = None;
                    freed += 1;
                }
            }
        }
        freed
    }
}

fn claim(day: &mut DaySchedule, start: NaiveTime, owner: ReservationId) -> DomainResult<SlotRef> {
    let slot = day
        .slot_mut(start)
        .ok_or(DomainError::UnavailableTime(start))?;

    if slot.is_occupied() {
        return Err(DomainError::SlotOccupied(start));
    }

    slot.occupant = Some(owner);
    Ok(SlotRef {
        slot_id: slot.id,
        start_time: slot.start_time,
    })
}

fn rollback(day: &mut DaySchedule, granted: &[SlotRef], owner: ReservationId) {
    for slot_ref in granted {
        if let Some(slot) = day.slot_mut(slot_ref.start_time) {
            if slot.occupant == Some(owner) {
                slot.occupant = None;
            }
        }
    }
}
